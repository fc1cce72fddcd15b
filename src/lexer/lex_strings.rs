use crate::lexer::tokens::{Token, TokenKind};
use crate::lexer::Lexer;

impl Lexer {
    /// Scans a string literal. There are no escape sequences; a newline
    /// inside a string is kept verbatim and bumps the line counter.
    pub(super) fn make_string_token(&mut self) -> Token {
        while !self.is_at_end() && self.get_current() != '"' {
            if self.get_current() == '\n' {
                self.line_num += 1;
            }

            self.advance();
        }

        if self.is_at_end() {
            return self.make_error_token("Unterminated string.");
        }

        // Consume the closing quote.
        self.advance();
        self.make_token(TokenKind::STRING)
    }
}
