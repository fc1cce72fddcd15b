use crate::lexer::tokens::TokenKind;

/// Represents the precedence of different expressions in ascending order.
/// For example, `PREC_EQUALITY` has lower precedence than `PREC_UNARY`
/// because `PREC_EQUALITY` appears earlier in the enum, and `PREC_UNARY`
/// appears after.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Precedence {
    PREC_NONE,
    PREC_ASSIGNMENT, // =
    PREC_OR,         // or
    PREC_AND,        // and
    PREC_EQUALITY,   // == !=
    PREC_COMPARISON, // < > <= >=
    PREC_TERM,       // + -
    PREC_FACTOR,     // * /
    PREC_UNARY,      // ! -
    PREC_CALL,       // . ()
    PREC_PRIMARY,
}

impl Precedence {
    /// Gets the Precedence variant associated with a given numeric value.
    pub fn get_by_val(val: u8) -> Precedence {
        match val {
            0 => Precedence::PREC_NONE,
            1 => Precedence::PREC_ASSIGNMENT,
            2 => Precedence::PREC_OR,
            3 => Precedence::PREC_AND,
            4 => Precedence::PREC_EQUALITY,
            5 => Precedence::PREC_COMPARISON,
            6 => Precedence::PREC_TERM,
            7 => Precedence::PREC_FACTOR,
            8 => Precedence::PREC_UNARY,
            9 => Precedence::PREC_CALL,
            10 => Precedence::PREC_PRIMARY,
            _ => Precedence::PREC_NONE, // Should never be reached
        }
    }

    /// The next-higher precedence level. Binary operators parse their
    /// right operand one level up, which makes them left-associative.
    pub fn one_higher(&self) -> Precedence {
        Precedence::get_by_val(*self as u8 + 1)
    }
}

/// The set of compiling functions that can be associated with a given
/// token.
pub enum ParseFn {
    CompileBinary,
    CompileGrouping,
    CompileLiteral,
    CompileLogicAnd,
    CompileLogicOr,
    CompileNumber,
    CompileString,
    CompileUnary,
    CompileVariable,
    NONE, // Do not call a parsing function
}

/// Wraps the parsing properties of a token so that they can be easily
/// accessed throughout the compiler.
pub struct ParseRule {
    pub prefix: ParseFn,
    pub infix: ParseFn,
    pub precedence: Precedence,
}

/// The parse rule for a given token kind. Rule lookup is a single match,
/// so Pratt dispatch stays O(1).
pub fn get_rule(kind: TokenKind) -> ParseRule {
    match kind {
        TokenKind::L_PAREN => ParseRule {
            prefix: ParseFn::CompileGrouping,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        TokenKind::MINUS => ParseRule {
            prefix: ParseFn::CompileUnary,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_TERM,
        },

        TokenKind::PLUS => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_TERM,
        },

        TokenKind::SLASH => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_FACTOR,
        },

        TokenKind::STAR => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_FACTOR,
        },

        TokenKind::LOGIC_NOT => ParseRule {
            prefix: ParseFn::CompileUnary,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        TokenKind::LOGIC_NOT_EQ => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_EQUALITY,
        },

        TokenKind::LOGIC_EQ => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_EQUALITY,
        },

        TokenKind::GREATER_THAN => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_COMPARISON,
        },

        TokenKind::GREATER_THAN_EQ => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_COMPARISON,
        },

        TokenKind::LESS_THAN => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_COMPARISON,
        },

        TokenKind::LESS_THAN_EQ => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileBinary,
            precedence: Precedence::PREC_COMPARISON,
        },

        TokenKind::IDENTIFIER => ParseRule {
            prefix: ParseFn::CompileVariable,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        TokenKind::STRING => ParseRule {
            prefix: ParseFn::CompileString,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        TokenKind::NUMBER => ParseRule {
            prefix: ParseFn::CompileNumber,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        TokenKind::LOGIC_AND => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileLogicAnd,
            precedence: Precedence::PREC_AND,
        },

        TokenKind::LOGIC_OR => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::CompileLogicOr,
            precedence: Precedence::PREC_OR,
        },

        TokenKind::FALSE | TokenKind::NIL | TokenKind::TRUE => ParseRule {
            prefix: ParseFn::CompileLiteral,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },

        // The rest of the tokens do not have a parse rule.
        _ => ParseRule {
            prefix: ParseFn::NONE,
            infix: ParseFn::NONE,
            precedence: Precedence::PREC_NONE,
        },
    }
}
