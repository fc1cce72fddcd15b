// Submodules
mod expressions;
mod precedence;
mod statements;

use crate::chunk::op_codes::OpCode;
use crate::chunk::Chunk;
use crate::lexer::tokens::{Token, TokenKind};
use crate::lexer::Lexer;
use crate::objects::{Heap, Object, Value};

/// The maximum number of local variables that can be in scope at once.
/// `GetLocal`/`SetLocal` address their slot with a single byte.
pub const MAX_LOCALS: usize = 256;

/// A local variable tracked by the compiler: the token that named it and
/// the scope depth it was declared at. A depth of `-1` marks a local
/// that has been declared but whose initializer is still being compiled.
struct Local {
    name: Token,
    depth: i32,
}

/// Represents the compiler and its internal state. The compiler is a
/// single-pass Pratt parser: it pulls tokens from the lexer and appends
/// bytecode to its chunk as a side effect of parsing.
pub struct Compiler<'a> {
    lexer: Lexer,
    previous: Token,
    current: Token,
    had_error: bool,
    is_in_panic: bool,
    chunk: Chunk,
    heap: &'a mut Heap,
    locals: Vec<Local>,
    scope_depth: i32,
}

impl<'a> Compiler<'a> {
    /// Compiles a source string into a chunk of bytecode instructions.
    /// String literals and identifier names are interned into the given
    /// heap so the chunk can be executed against it.
    ///
    /// # Returns
    /// `Result<Chunk, ()>` – The compiled chunk, or an error when one or
    /// more compile errors were reported.
    pub fn compile(src: &str, heap: &'a mut Heap) -> Result<Chunk, ()> {
        // Initialize the compiler
        let mut s = Self {
            lexer: Lexer::new(src),
            previous: Token {
                line_num: 0,
                kind: TokenKind::EOF,
                lexeme: String::new(),
            },
            current: Token {
                line_num: 0,
                kind: TokenKind::EOF,
                lexeme: String::new(),
            },
            had_error: false,
            is_in_panic: false,
            chunk: Chunk::new(),
            heap,
            locals: Vec::new(),
            scope_depth: 0,
        };

        // Start compiling the chunk
        s.advance();
        while !s.matches(TokenKind::EOF) {
            s.declaration();
        }

        s.emit_return();

        #[cfg(feature = "debug-bytecode")]
        if !s.had_error {
            s.chunk.disassemble("<script>");
        }

        if s.had_error {
            Err(())
        } else {
            Ok(s.chunk)
        }
    }

    /// Checks that the current token matches the token kind provided.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Checks that the current token matches the token kind provided.
    /// If the tokens match, the current token gets consumed and the
    /// function returns true. Otherwise the token is not consumed, and
    /// the function returns false.
    pub(super) fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances the compiler to the next token, reporting every `ERROR`
    /// token the lexer hands back along the way.
    pub(super) fn advance(&mut self) {
        self.previous = self.current.clone();

        loop {
            self.current = self.lexer.next_token();

            if self.current.kind != TokenKind::ERROR {
                break;
            }

            // The lexer stores the error message as the token's lexeme.
            let message = self.current.lexeme.clone();
            self.error_at_current(&message);
        }
    }

    /// Consumes the current token only if it is of a given kind.
    /// If the token does not match the kind, emits a compiler error.
    ///
    /// # Parameters
    /// - `kind`: The expected kind of the token to consume.
    /// - `message`: The error message to be displayed if the current
    ///   token does not match the provided kind.
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }

        self.error_at_current(message);
    }

    /// Emits a compiler error at the previous token.
    pub(super) fn error(&mut self, message: &str) {
        let token = self.previous.clone();
        self.error_at_token(token, message);
    }

    /// Emits a compiler error at the current token.
    pub(super) fn error_at_current(&mut self, message: &str) {
        let token = self.current.clone();
        self.error_at_token(token, message);
    }

    /// Emits a compiler error at the given token. While the compiler is
    /// panicking, further errors are swallowed until `synchronize` runs.
    fn error_at_token(&mut self, token: Token, message: &str) {
        if self.is_in_panic {
            return;
        }
        self.is_in_panic = true;

        eprint!("[line {}] Error", token.line_num);

        match token.kind {
            TokenKind::EOF => eprint!(" at end"),
            // An ERROR token's lexeme is the message itself, so there is
            // no source text to point at.
            TokenKind::ERROR => {}
            _ => eprint!(" at '{}'", token.lexeme),
        }

        eprintln!(": {}", message);
        self.had_error = true;
    }

    /// Synchronizes the compiler after it has found an error. This
    /// method helps minimize the number of cascading errors the compiler
    /// emits when it finds a parsing error. Tokens are discarded until a
    /// statement boundary is reached.
    pub(super) fn synchronize(&mut self) {
        self.is_in_panic = false;

        while self.current.kind != TokenKind::EOF {
            if self.previous.kind == TokenKind::SEMICOLON {
                return;
            }

            match self.current.kind {
                TokenKind::CLASS_KW
                | TokenKind::FUN_KW
                | TokenKind::VAR_KW
                | TokenKind::FOR_KW
                | TokenKind::IF_KW
                | TokenKind::WHILE_KW
                | TokenKind::PRINT_KW
                | TokenKind::RETURN_KW => {
                    return;
                }

                _ => {}
            }

            self.advance();
        }
    }

    /// Emits a byte instruction from an OpCode into the chunk's
    /// instruction list. The byte is recorded against the line of the
    /// previously consumed token.
    pub(super) fn emit_op_code(&mut self, instr: OpCode) {
        let line = self.previous.line_num;
        self.chunk.push_op_code(instr, line);
    }

    /// Emits a raw byte into the chunk's instruction list.
    pub(super) fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line_num;
        self.chunk.push_byte(byte, line);
    }

    /// Emits an instruction followed by its one-byte operand.
    pub(super) fn emit_op_code_with_byte(&mut self, instr: OpCode, byte: u8) {
        self.emit_op_code(instr);
        self.emit_byte(byte);
    }

    /// Emits a 16-bit short into the chunk's instruction list.
    pub(super) fn emit_short(&mut self, short: u16) {
        let line = self.previous.line_num;
        self.chunk.push_short(short, line);
    }

    /// Emits the instruction that terminates the chunk.
    pub(super) fn emit_return(&mut self) {
        self.emit_op_code(OpCode::Return);
    }

    /// Adds a value to the chunk's constant pool, reporting an error
    /// when the pool is full.
    ///
    /// # Returns
    /// `u8` – The index of the value in the pool.
    pub(super) fn make_constant(&mut self, value: Value) -> u8 {
        match self.chunk.add_constant(value) {
            Ok(idx) => idx,
            Err(()) => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    /// Emits a `Constant` instruction that loads the given value.
    pub(super) fn emit_constant(&mut self, value: Value) {
        let idx = self.make_constant(value);
        self.emit_op_code_with_byte(OpCode::Constant, idx);
    }

    /// Adds the name of an identifier token to the constant pool as an
    /// interned string.
    ///
    /// # Returns
    /// `u8` – The index of the name in the pool.
    pub(super) fn identifier_constant(&mut self, name: &Token) -> u8 {
        let name = self.heap.intern(&name.lexeme);
        self.make_constant(Value::Obj(Object::Str(name)))
    }

    /// Emits a jump instruction with a two-byte placeholder operand.
    ///
    /// # Returns
    /// `usize` – The offset of the placeholder, for `patch_jump`.
    pub(super) fn emit_jump(&mut self, instr: OpCode) -> usize {
        self.emit_op_code(instr);
        self.emit_short(0xFFFF);
        self.chunk.len() - 2
    }

    /// Overwrites the placeholder operand of a previously emitted jump
    /// so that it lands on the instruction about to be emitted.
    pub(super) fn patch_jump(&mut self, offset: usize) {
        // The operand itself occupies two bytes after `offset`.
        let jump = self.chunk.len() - offset - 2;

        if jump > u16::MAX as usize {
            self.error("Too much to jump over.");
        }

        let bytes = (jump as u16).to_be_bytes();
        self.chunk.modify_byte(offset, bytes[0]);
        self.chunk.modify_byte(offset + 1, bytes[1]);
    }

    /// Emits a `Loop` instruction that jumps backwards to `loop_start`.
    pub(super) fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op_code(OpCode::Loop);

        // +2 accounts for the operand bytes of the Loop instruction.
        let offset = self.chunk.len() - loop_start + 2;
        if offset > u16::MAX as usize {
            self.error("Loop body too large.");
        }

        self.emit_short(offset as u16);
    }
}
