use crate::chunk::op_codes::OpCode;
use crate::compiler::precedence::{get_rule, ParseFn, Precedence};
use crate::compiler::Compiler;
use crate::lexer::tokens::{Token, TokenKind};
use crate::objects::{Object, Value};

impl<'a> Compiler<'a> {
    /// Compiles a full expression.
    pub(super) fn expression(&mut self) {
        self.parse_precedence(Precedence::PREC_ASSIGNMENT);
    }

    /// The Pratt driver. Compiles the prefix expression for the token
    /// just consumed, then keeps folding in infix operators for as long
    /// as they bind at least as tightly as `precedence`.
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();

        let prefix_rule = get_rule(self.previous.kind).prefix;
        if let ParseFn::NONE = prefix_rule {
            self.error("Expect expression.");
            return;
        }

        // Assignment binds loosest of all, so a target is only valid
        // when nothing tighter than an assignment is being parsed.
        let can_assign = precedence <= Precedence::PREC_ASSIGNMENT;
        self.exec_parse_fn(prefix_rule, can_assign);

        while precedence <= get_rule(self.current.kind).precedence {
            self.advance();
            let infix_rule = get_rule(self.previous.kind).infix;
            self.exec_parse_fn(infix_rule, can_assign);
        }

        // An '=' that no parse function consumed means the left-hand
        // side was not something that can be assigned to.
        if can_assign && self.matches(TokenKind::EQUALS) {
            self.error("Invalid assignment target.");
        }
    }

    /// Executes the compiling function named by a parse rule.
    fn exec_parse_fn(&mut self, func: ParseFn, can_assign: bool) {
        match func {
            ParseFn::CompileBinary => self.compile_binary(),
            ParseFn::CompileGrouping => self.compile_grouping(),
            ParseFn::CompileLiteral => self.compile_literal(),
            ParseFn::CompileLogicAnd => self.compile_logic_and(),
            ParseFn::CompileLogicOr => self.compile_logic_or(),
            ParseFn::CompileNumber => self.compile_number(),
            ParseFn::CompileString => self.compile_string(),
            ParseFn::CompileUnary => self.compile_unary(),
            ParseFn::CompileVariable => self.compile_variable(can_assign),
            ParseFn::NONE => unreachable!("Parse rules are checked before dispatch."),
        }
    }

    /// Compiles a numeric literal.
    fn compile_number(&mut self) {
        let value: f64 = match self.previous.lexeme.parse() {
            Ok(num) => num,
            Err(_) => {
                self.error("Invalid numeric literal.");
                return;
            }
        };

        self.emit_constant(Value::Number(value));
    }

    /// Compiles a string literal. The contents are interned, so equal
    /// literals load the same object.
    fn compile_string(&mut self) {
        // Trim the surrounding quotation marks.
        let lexeme = &self.previous.lexeme;
        let contents = &lexeme[1..lexeme.len() - 1];

        let string = self.heap.intern(contents);
        self.emit_constant(Value::Obj(Object::Str(string)));
    }

    /// Compiles a `nil`, `true`, or `false` literal.
    fn compile_literal(&mut self) {
        match self.previous.kind {
            TokenKind::FALSE => self.emit_op_code(OpCode::False),
            TokenKind::NIL => self.emit_op_code(OpCode::Nil),
            TokenKind::TRUE => self.emit_op_code(OpCode::True),
            _ => unreachable!("Only literal tokens reach this parse function."),
        }
    }

    /// Compiles a parenthesized expression.
    fn compile_grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::R_PAREN, "Expect ')' after expression.");
    }

    /// Compiles a unary expression. The operand is compiled first so its
    /// value is on the stack when the operator instruction executes.
    fn compile_unary(&mut self) {
        let operator = self.previous.kind;

        self.parse_precedence(Precedence::PREC_UNARY);

        match operator {
            TokenKind::LOGIC_NOT => self.emit_op_code(OpCode::Not),
            TokenKind::MINUS => self.emit_op_code(OpCode::Negate),
            _ => unreachable!("Only unary operators reach this parse function."),
        }
    }

    /// Compiles a binary expression. The right operand parses one
    /// precedence level up, which makes every binary operator
    /// left-associative. `!=`, `>=` and `<=` have no opcode of their
    /// own; each compiles to the opposite comparison plus `Not`.
    fn compile_binary(&mut self) {
        let operator = self.previous.kind;
        let rule = get_rule(operator);

        self.parse_precedence(rule.precedence.one_higher());

        match operator {
            TokenKind::LOGIC_NOT_EQ => {
                self.emit_op_code(OpCode::Equal);
                self.emit_op_code(OpCode::Not);
            }
            TokenKind::LOGIC_EQ => self.emit_op_code(OpCode::Equal),
            TokenKind::GREATER_THAN => self.emit_op_code(OpCode::Greater),
            TokenKind::GREATER_THAN_EQ => {
                self.emit_op_code(OpCode::Less);
                self.emit_op_code(OpCode::Not);
            }
            TokenKind::LESS_THAN => self.emit_op_code(OpCode::Less),
            TokenKind::LESS_THAN_EQ => {
                self.emit_op_code(OpCode::Greater);
                self.emit_op_code(OpCode::Not);
            }
            TokenKind::PLUS => self.emit_op_code(OpCode::Add),
            TokenKind::MINUS => self.emit_op_code(OpCode::Subtract),
            TokenKind::STAR => self.emit_op_code(OpCode::Multiply),
            TokenKind::SLASH => self.emit_op_code(OpCode::Divide),
            _ => unreachable!("Only binary operators reach this parse function."),
        }
    }

    /// Compiles a logical 'and' expression. When the left operand is
    /// falsey it stays on the stack as the result and the right operand
    /// is skipped; `JumpIfFalse` does not pop, so the skipped path keeps
    /// the value.
    fn compile_logic_and(&mut self) {
        let end_jump = self.emit_jump(OpCode::JumpIfFalse);

        self.emit_op_code(OpCode::Pop);
        self.parse_precedence(Precedence::PREC_AND);

        self.patch_jump(end_jump);
    }

    /// Compiles a logical 'or' expression. A truthy left operand jumps
    /// over the right operand and stays on the stack as the result.
    fn compile_logic_or(&mut self) {
        let else_jump = self.emit_jump(OpCode::JumpIfFalse);
        let end_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(else_jump);
        self.emit_op_code(OpCode::Pop);

        self.parse_precedence(Precedence::PREC_OR);
        self.patch_jump(end_jump);
    }

    /// Compiles an identifier expression: either a read of the variable
    /// or, when followed by '=' in an assignable position, a write.
    fn compile_variable(&mut self, can_assign: bool) {
        let name = self.previous.clone();
        self.named_variable(name, can_assign);
    }

    /// Emits the appropriate instruction to get or set a variable.
    /// Locals resolve to a stack slot; everything else goes through the
    /// globals table by name.
    fn named_variable(&mut self, name: Token, can_assign: bool) {
        let (get_op, set_op, arg) = match self.resolve_local(&name) {
            Some(slot) => (OpCode::GetLocal, OpCode::SetLocal, slot),
            None => {
                let idx = self.identifier_constant(&name);
                (OpCode::GetGlobal, OpCode::SetGlobal, idx)
            }
        };

        if can_assign && self.matches(TokenKind::EQUALS) {
            self.expression();
            self.emit_op_code_with_byte(set_op, arg);
        } else {
            self.emit_op_code_with_byte(get_op, arg);
        }
    }
}
