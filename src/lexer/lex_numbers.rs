use crate::lexer::tokens::{Token, TokenKind};
use crate::lexer::Lexer;

impl Lexer {
    /// Scans a numeric literal: a run of decimal digits with an optional
    /// fractional part.
    pub(super) fn make_number_token(&mut self) -> Token {
        while !self.is_at_end() && self.get_current().is_ascii_digit() {
            self.advance();
        }

        // A '.' only belongs to the number when a digit follows it;
        // otherwise it is left for the next token.
        if !self.is_at_end() && self.get_current() == '.' && self.get_next().is_ascii_digit() {
            self.advance();

            while !self.is_at_end() && self.get_current().is_ascii_digit() {
                self.advance();
            }
        }

        self.make_token(TokenKind::NUMBER)
    }
}
