use crate::lexer::tokens::{Token, TokenKind};
use crate::lexer::Lexer;

fn tokens_of(src: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(src);
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token();
        let kind = token.kind;
        tokens.push(token);

        if kind == TokenKind::EOF {
            break;
        }
    }

    tokens
}

fn kinds_of(src: &str) -> Vec<TokenKind> {
    tokens_of(src).iter().map(|token| token.kind).collect()
}

#[test]
fn punctuation_tokens() {
    assert_eq!(
        kinds_of("(){};,.-+/*"),
        vec![
            TokenKind::L_PAREN,
            TokenKind::R_PAREN,
            TokenKind::L_CURLY,
            TokenKind::R_CURLY,
            TokenKind::SEMICOLON,
            TokenKind::COMMA,
            TokenKind::DOT,
            TokenKind::MINUS,
            TokenKind::PLUS,
            TokenKind::SLASH,
            TokenKind::STAR,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn one_and_two_character_operators() {
    assert_eq!(
        kinds_of("! != = == > >= < <="),
        vec![
            TokenKind::LOGIC_NOT,
            TokenKind::LOGIC_NOT_EQ,
            TokenKind::EQUALS,
            TokenKind::LOGIC_EQ,
            TokenKind::GREATER_THAN,
            TokenKind::GREATER_THAN_EQ,
            TokenKind::LESS_THAN,
            TokenKind::LESS_THAN_EQ,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn keywords_are_recognized() {
    assert_eq!(
        kinds_of("and class else false for fun if nil or print return super this true var while"),
        vec![
            TokenKind::LOGIC_AND,
            TokenKind::CLASS_KW,
            TokenKind::ELSE_KW,
            TokenKind::FALSE,
            TokenKind::FOR_KW,
            TokenKind::FUN_KW,
            TokenKind::IF_KW,
            TokenKind::NIL,
            TokenKind::LOGIC_OR,
            TokenKind::PRINT_KW,
            TokenKind::RETURN_KW,
            TokenKind::SUPER_KW,
            TokenKind::THIS_KW,
            TokenKind::TRUE,
            TokenKind::VAR_KW,
            TokenKind::WHILE_KW,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn a_keyword_prefix_is_just_an_identifier() {
    assert_eq!(kinds_of("printer"), vec![TokenKind::IDENTIFIER, TokenKind::EOF]);
    assert_eq!(kinds_of("variable"), vec![TokenKind::IDENTIFIER, TokenKind::EOF]);
}

#[test]
fn number_lexemes() {
    let tokens = tokens_of("3.14 7.");

    assert_eq!(tokens[0].kind, TokenKind::NUMBER);
    assert_eq!(tokens[0].lexeme, "3.14");

    // The dot only joins the number when a digit follows it.
    assert_eq!(tokens[1].kind, TokenKind::NUMBER);
    assert_eq!(tokens[1].lexeme, "7");
    assert_eq!(tokens[2].kind, TokenKind::DOT);
}

#[test]
fn string_lexemes_keep_their_quotes() {
    let tokens = tokens_of("\"hi there\"");

    assert_eq!(tokens[0].kind, TokenKind::STRING);
    assert_eq!(tokens[0].lexeme, "\"hi there\"");
}

#[test]
fn unterminated_string_is_an_error_token() {
    let tokens = tokens_of("\"abc");

    assert_eq!(tokens[0].kind, TokenKind::ERROR);
    assert_eq!(tokens[0].lexeme, "Unterminated string.");
}

#[test]
fn unexpected_characters_are_error_tokens() {
    let tokens = tokens_of("@");
    assert_eq!(tokens[0].kind, TokenKind::ERROR);
    assert_eq!(tokens[0].lexeme, "Unexpected character.");

    // Identifiers are letters and digits only.
    let tokens = tokens_of("_");
    assert_eq!(tokens[0].kind, TokenKind::ERROR);
}

#[test]
fn line_numbers_advance_on_newlines() {
    let tokens = tokens_of("one\ntwo");

    assert_eq!(tokens[0].line_num, 1);
    assert_eq!(tokens[1].line_num, 2);
}

#[test]
fn newlines_inside_strings_count_as_lines() {
    let tokens = tokens_of("\"a\nb\"");

    assert_eq!(tokens[0].kind, TokenKind::STRING);
    assert_eq!(tokens[0].line_num, 2);
}

#[test]
fn line_comments_are_skipped() {
    let tokens = tokens_of("1 // trailing comment\n2");

    assert_eq!(tokens[0].kind, TokenKind::NUMBER);
    assert_eq!(tokens[0].line_num, 1);
    assert_eq!(tokens[1].kind, TokenKind::NUMBER);
    assert_eq!(tokens[1].line_num, 2);
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}
