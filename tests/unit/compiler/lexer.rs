use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn numbers_strings_and_idents() {
    assert_eq!(
        kinds("time 2 3.5 'hi' \"there\""),
        vec![
            TokenKind::Ident("time".to_string()),
            TokenKind::Number(2.0),
            TokenKind::Number(3.5),
            TokenKind::Str("hi".to_string()),
            TokenKind::Str("there".to_string()),
        ]
    );
}

#[test]
fn two_char_operators() {
    assert_eq!(
        kinds("== != <= >= && || < > !"),
        vec![
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::AndAnd,
            TokenKind::OrOr,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Bang,
        ]
    );
}

#[test]
fn dot_after_integer_is_member_access() {
    assert_eq!(
        kinds("1.floor()"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Dot,
            TokenKind::Ident("floor".to_string()),
            TokenKind::LParen,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn positions_are_line_and_column() {
    let tokens = lex("a +\n  b").unwrap();
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
    assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
}

#[test]
fn lone_assignment_is_rejected_with_position() {
    let err = lex("x = 1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "compile error: unexpected character '=' at 1:3"
    );
}

#[test]
fn lone_ampersand_and_pipe_are_rejected() {
    assert!(lex("a & b").is_err());
    assert!(lex("a | b").is_err());
}

#[test]
fn unterminated_string_is_rejected() {
    let err = lex("'hello").unwrap_err();
    assert!(err.to_string().contains("unterminated string"));
}

#[test]
fn keywords_true_false() {
    assert_eq!(kinds("true false"), vec![TokenKind::True, TokenKind::False]);
}

#[test]
fn string_escapes() {
    assert_eq!(
        kinds(r#""a\nb\'c""#),
        vec![TokenKind::Str("a\nb'c".to_string())]
    );
}
