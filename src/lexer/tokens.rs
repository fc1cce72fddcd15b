/// A token that represents a single unit of SIMPL code.
#[derive(Clone)]
pub struct Token {
    /// The token's line number
    pub line_num: usize,
    /// The token's kind
    pub kind: TokenKind,
    /// The token's lexeme. For `ERROR` tokens this holds the error message.
    pub lexeme: String,
}

/// The kinds of tokens in a SIMPL program.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenKind {
    // Single-character tokens.
    COMMA,
    DOT,
    L_CURLY,
    L_PAREN,
    MINUS,
    PLUS,
    R_CURLY,
    R_PAREN,
    SEMICOLON,
    SLASH,
    STAR,

    // One or two character tokens.
    EQUALS,
    GREATER_THAN,
    GREATER_THAN_EQ,
    LESS_THAN,
    LESS_THAN_EQ,
    LOGIC_EQ,
    LOGIC_NOT,
    LOGIC_NOT_EQ,

    // Literals.
    IDENTIFIER,
    NUMBER,
    STRING,

    // Keywords.
    CLASS_KW,
    ELSE_KW,
    FALSE,
    FOR_KW,
    FUN_KW,
    IF_KW,
    LOGIC_AND,
    LOGIC_OR,
    NIL,
    PRINT_KW,
    RETURN_KW,
    SUPER_KW,
    THIS_KW,
    TRUE,
    VAR_KW,
    WHILE_KW,

    ERROR,
    EOF,
}

/// Maps a keyword string to a token kind.
///
/// # Parameters
/// - `id`: The identifier's string name.
///
/// # Returns
/// `TokenKind`: The kind of token matched for the given identifier name.
pub fn make_identifier_kind(id: &str) -> TokenKind {
    match id {
        "and" => TokenKind::LOGIC_AND,
        "class" => TokenKind::CLASS_KW,
        "else" => TokenKind::ELSE_KW,
        "false" => TokenKind::FALSE,
        "for" => TokenKind::FOR_KW,
        "fun" => TokenKind::FUN_KW,
        "if" => TokenKind::IF_KW,
        "nil" => TokenKind::NIL,
        "or" => TokenKind::LOGIC_OR,
        "print" => TokenKind::PRINT_KW,
        "return" => TokenKind::RETURN_KW,
        "super" => TokenKind::SUPER_KW,
        "this" => TokenKind::THIS_KW,
        "true" => TokenKind::TRUE,
        "var" => TokenKind::VAR_KW,
        "while" => TokenKind::WHILE_KW,
        _ => TokenKind::IDENTIFIER,
    }
}
