use crate::chunk::op_codes::OpCode;
use crate::compiler::{Compiler, Local, MAX_LOCALS};
use crate::lexer::tokens::{Token, TokenKind};

impl<'a> Compiler<'a> {
    /// Compiles a single declaration: a variable declaration or any
    /// other statement. After an error, the compiler resynchronizes at
    /// the next statement boundary.
    pub(super) fn declaration(&mut self) {
        if self.matches(TokenKind::VAR_KW) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.is_in_panic {
            self.synchronize();
        }
    }

    /// Compiles a single statement.
    fn statement(&mut self) {
        if self.matches(TokenKind::PRINT_KW) {
            self.print_statement();
        } else if self.matches(TokenKind::FOR_KW) {
            self.for_statement();
        } else if self.matches(TokenKind::IF_KW) {
            self.if_statement();
        } else if self.matches(TokenKind::WHILE_KW) {
            self.while_statement();
        } else if self.matches(TokenKind::L_CURLY) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    /// Compiles a `var` declaration. Without an initializer the variable
    /// starts out as `nil`.
    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");

        if self.matches(TokenKind::EQUALS) {
            self.expression();
        } else {
            self.emit_op_code(OpCode::Nil);
        }

        self.consume(TokenKind::SEMICOLON, "Expect ';' after variable declaration.");

        self.define_variable(global);
    }

    /// Consumes a variable name and declares it in the current scope.
    ///
    /// # Returns
    /// `u8` – The constant-pool index of the name for globals; locals do
    /// not go through the pool, so inside a scope this is just 0.
    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::IDENTIFIER, message);

        self.declare_variable();
        if self.scope_depth > 0 {
            return 0;
        }

        let name = self.previous.clone();
        self.identifier_constant(&name)
    }

    /// Records a new local for the current scope. Globals are late
    /// bound, so at the top level there is nothing to do.
    fn declare_variable(&mut self) {
        if self.scope_depth == 0 {
            return;
        }

        let name = self.previous.clone();

        // Only the current scope can collide; the scan stops at the
        // first local that belongs to an enclosing scope.
        let mut already_declared = false;
        for local in self.locals.iter().rev() {
            if local.depth != -1 && local.depth < self.scope_depth {
                break;
            }

            if local.name.lexeme == name.lexeme {
                already_declared = true;
                break;
            }
        }

        if already_declared {
            self.error("Already a variable with this name in this scope.");
        }

        if self.locals.len() == MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }

        // Depth -1 guards the local until its initializer has been
        // compiled.
        self.locals.push(Local { name, depth: -1 });
    }

    /// Marks a declared variable as ready for use. For a local the
    /// initializer's result is already sitting in its stack slot, so no
    /// code is emitted; a global gets a `DefineGlobal` instruction.
    fn define_variable(&mut self, global: u8) {
        if self.scope_depth > 0 {
            self.mark_initialized();
            return;
        }

        self.emit_op_code_with_byte(OpCode::DefineGlobal, global);
    }

    /// Gives the most recent local the depth of the current scope,
    /// ending its declared-but-uninitialized state.
    fn mark_initialized(&mut self) {
        let depth = self.scope_depth;
        if let Some(local) = self.locals.last_mut() {
            local.depth = depth;
        }
    }

    /// Resolves a name against the locals in scope, innermost first.
    ///
    /// A local whose initializer is still being compiled does not shadow
    /// yet: the scan skips it and keeps looking for an enclosing binding
    /// with the same name, so `var x = x + 1;` inside a block reads the
    /// outer `x`. Only when no such binding exists is reading the
    /// uninitialized local an error.
    ///
    /// # Returns
    /// `Option<u8>` – The stack slot of the local, or `None` when the
    /// name does not resolve to a local at all.
    pub(super) fn resolve_local(&mut self, name: &Token) -> Option<u8> {
        let mut uninitialized = None;

        for (idx, local) in self.locals.iter().enumerate().rev() {
            if local.name.lexeme != name.lexeme {
                continue;
            }

            if local.depth == -1 {
                if uninitialized.is_none() {
                    uninitialized = Some(idx);
                }
                continue;
            }

            return Some(idx as u8);
        }

        if let Some(idx) = uninitialized {
            self.error("Can't read local variable in its own initializer.");
            return Some(idx as u8);
        }

        None
    }

    /// Compiles an expression statement: the expression's value is
    /// discarded once it has been computed.
    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::SEMICOLON, "Expect ';' after expression.");
        self.emit_op_code(OpCode::Pop);
    }

    /// Compiles a `print` statement.
    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::SEMICOLON, "Expect ';' after value.");
        self.emit_op_code(OpCode::Print);
    }

    /// Compiles the declarations of a block until its closing brace.
    fn block(&mut self) {
        while !self.check(TokenKind::R_CURLY) && !self.check(TokenKind::EOF) {
            self.declaration();
        }

        self.consume(TokenKind::R_CURLY, "Expected '}' after block.");
    }

    /// Opens a new block scope.
    pub(super) fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Closes the current block scope, popping every local that was
    /// declared inside it off the runtime stack.
    pub(super) fn end_scope(&mut self) {
        self.scope_depth -= 1;

        while self
            .locals
            .last()
            .map_or(false, |local| local.depth > self.scope_depth)
        {
            self.emit_op_code(OpCode::Pop);
            self.locals.pop();
        }
    }

    /// Compiles an `if` statement. `JumpIfFalse` leaves the condition on
    /// the stack, so each branch starts by popping it.
    fn if_statement(&mut self) {
        self.consume(TokenKind::L_PAREN, "Expect '(' after 'if'");
        self.expression();
        self.consume(TokenKind::R_PAREN, "Expect ')' after condition");

        let then_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op_code(OpCode::Pop);
        self.statement();

        let else_jump = self.emit_jump(OpCode::Jump);

        self.patch_jump(then_jump);
        self.emit_op_code(OpCode::Pop);

        if self.matches(TokenKind::ELSE_KW) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    /// Compiles a `while` statement.
    fn while_statement(&mut self) {
        let loop_start = self.chunk.len();

        self.consume(TokenKind::L_PAREN, "Expect '(' after 'while'.");
        self.expression();
        self.consume(TokenKind::R_PAREN, "Expect ')' after condition.");

        let exit_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op_code(OpCode::Pop);
        self.statement();
        self.emit_loop(loop_start);

        self.patch_jump(exit_jump);
        self.emit_op_code(OpCode::Pop);
    }

    /// Compiles a `for` statement. The whole statement lives in its own
    /// scope so a `var` initializer is scoped to the loop. When an
    /// increment clause is present the body jumps over it on the way in;
    /// the increment then becomes the loop's back-edge target.
    fn for_statement(&mut self) {
        self.begin_scope();

        self.consume(TokenKind::L_PAREN, "Expected '(' after 'for'.");

        // Initializer clause
        if self.matches(TokenKind::SEMICOLON) {
            // No initializer.
        } else if self.matches(TokenKind::VAR_KW) {
            self.var_declaration();
        } else {
            self.expression_statement();
        }

        // Condition clause
        let mut loop_start = self.chunk.len();
        let mut exit_jump = None;
        if !self.matches(TokenKind::SEMICOLON) {
            self.expression();
            self.consume(TokenKind::SEMICOLON, "Expect ';'.");

            exit_jump = Some(self.emit_jump(OpCode::JumpIfFalse));
            self.emit_op_code(OpCode::Pop);
        }

        // Increment clause
        if !self.matches(TokenKind::R_PAREN) {
            let body_jump = self.emit_jump(OpCode::Jump);
            let increment_start = self.chunk.len();

            self.expression();
            self.emit_op_code(OpCode::Pop);
            self.consume(TokenKind::R_PAREN, "Expect ')' after for clauses.");

            self.emit_loop(loop_start);
            loop_start = increment_start;
            self.patch_jump(body_jump);
        }

        self.statement();
        self.emit_loop(loop_start);

        if let Some(exit_jump) = exit_jump {
            self.patch_jump(exit_jump);
            self.emit_op_code(OpCode::Pop);
        }

        self.end_scope();
    }
}
