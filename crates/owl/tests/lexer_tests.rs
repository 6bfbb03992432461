use owl::lexer::{Lexer, Token, TokenKind};

const FILE: &str = "lexer_test.hoot";

fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize(FILE)
}

fn token(kind: TokenKind, literal: &str, line: usize, column: usize) -> Token {
    Token {
        kind,
        literal: literal.to_owned(),
        line,
        column,
        file: FILE.to_owned(),
    }
}

fn assert_tokens(input: &str, expected: &[Token]) {
    let actual = tokenize(input);
    assert_eq!(actual, expected, "token mismatch for {input:?}");
}

/// Compares kinds and literals only, ignoring positions.
fn assert_short_tokens(input: &str, expected: &[(TokenKind, &str)]) {
    let actual = tokenize(input);
    let short: Vec<(TokenKind, &str)> = actual.iter().map(|t| (t.kind, t.literal.as_str())).collect();
    assert_eq!(short, expected, "token mismatch for {input:?}");
}

#[test]
fn lex_let() {
    assert_tokens(
        "let x = 3",
        &[
            token(TokenKind::Let, "let", 1, 1),
            token(TokenKind::Name, "x", 1, 5),
            token(TokenKind::Assign, "=", 1, 7),
            token(TokenKind::Number, "3", 1, 9),
            token(TokenKind::Eof, "", 1, 10),
        ],
    );
}

#[test]
fn lex_expression() {
    assert_tokens(
        "inc = 3 + 4 % 3",
        &[
            token(TokenKind::Name, "inc", 1, 1),
            token(TokenKind::Assign, "=", 1, 5),
            token(TokenKind::Number, "3", 1, 7),
            token(TokenKind::Plus, "+", 1, 9),
            token(TokenKind::Number, "4", 1, 11),
            token(TokenKind::Percent, "%", 1, 13),
            token(TokenKind::Number, "3", 1, 15),
            token(TokenKind::Eof, "", 1, 16),
        ],
    );
}

#[test]
fn lex_simple_function() {
    assert_tokens(
        "x => { x + 3 }",
        &[
            token(TokenKind::Name, "x", 1, 1),
            token(TokenKind::Arrow, "=>", 1, 3),
            token(TokenKind::LBrace, "{", 1, 6),
            token(TokenKind::Name, "x", 1, 8),
            token(TokenKind::Plus, "+", 1, 10),
            token(TokenKind::Number, "3", 1, 12),
            token(TokenKind::RBrace, "}", 1, 14),
            token(TokenKind::Eof, "", 1, 15),
        ],
    );
}

#[test]
fn lex_whitespace_and_lines() {
    assert_tokens(
        "x\t=    3\ny\t \t = 4",
        &[
            token(TokenKind::Name, "x", 1, 1),
            token(TokenKind::Assign, "=", 1, 3),
            token(TokenKind::Number, "3", 1, 8),
            token(TokenKind::Newline, "\n", 1, 9),
            token(TokenKind::Name, "y", 2, 1),
            token(TokenKind::Assign, "=", 2, 6),
            token(TokenKind::Number, "4", 2, 8),
            token(TokenKind::Eof, "", 2, 9),
        ],
    );
}

#[test]
fn lex_full_function() {
    assert_tokens(
        "let f = (a, b) => { let x = a ** 2\nlet y = b * 2\n return x * y }",
        &[
            token(TokenKind::Let, "let", 1, 1),
            token(TokenKind::Name, "f", 1, 5),
            token(TokenKind::Assign, "=", 1, 7),
            token(TokenKind::LParen, "(", 1, 9),
            token(TokenKind::Name, "a", 1, 10),
            token(TokenKind::Comma, ",", 1, 11),
            token(TokenKind::Name, "b", 1, 13),
            token(TokenKind::RParen, ")", 1, 14),
            token(TokenKind::Arrow, "=>", 1, 16),
            token(TokenKind::LBrace, "{", 1, 19),
            token(TokenKind::Let, "let", 1, 21),
            token(TokenKind::Name, "x", 1, 25),
            token(TokenKind::Assign, "=", 1, 27),
            token(TokenKind::Name, "a", 1, 29),
            token(TokenKind::DoubleStar, "**", 1, 31),
            token(TokenKind::Number, "2", 1, 34),
            token(TokenKind::Newline, "\n", 1, 35),
            token(TokenKind::Let, "let", 2, 1),
            token(TokenKind::Name, "y", 2, 5),
            token(TokenKind::Assign, "=", 2, 7),
            token(TokenKind::Name, "b", 2, 9),
            token(TokenKind::Star, "*", 2, 11),
            token(TokenKind::Number, "2", 2, 13),
            token(TokenKind::Newline, "\n", 2, 14),
            token(TokenKind::Return, "return", 3, 2),
            token(TokenKind::Name, "x", 3, 9),
            token(TokenKind::Star, "*", 3, 11),
            token(TokenKind::Name, "y", 3, 13),
            token(TokenKind::RBrace, "}", 3, 15),
            token(TokenKind::Eof, "", 3, 16),
        ],
    );
}

#[test]
fn lex_multiple_statements() {
    assert_short_tokens(
        "x = 3\ny = 4\nf = (a) => 'test' has a",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::Assign, "="),
            (TokenKind::Number, "3"),
            (TokenKind::Newline, "\n"),
            (TokenKind::Name, "y"),
            (TokenKind::Assign, "="),
            (TokenKind::Number, "4"),
            (TokenKind::Newline, "\n"),
            (TokenKind::Name, "f"),
            (TokenKind::Assign, "="),
            (TokenKind::LParen, "("),
            (TokenKind::Name, "a"),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::String, "'test'"),
            (TokenKind::Has, "has"),
            (TokenKind::Name, "a"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_pattern_match() {
    assert_short_tokens(
        "let f = (\n(0) => 1,\n(x) => x * f(x - 1)\n)",
        &[
            (TokenKind::Let, "let"),
            (TokenKind::Name, "f"),
            (TokenKind::Assign, "="),
            (TokenKind::LParen, "("),
            (TokenKind::Newline, "\n"),
            (TokenKind::LParen, "("),
            (TokenKind::Number, "0"),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::Number, "1"),
            (TokenKind::Comma, ","),
            (TokenKind::Newline, "\n"),
            (TokenKind::LParen, "("),
            (TokenKind::Name, "x"),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::Name, "x"),
            (TokenKind::Star, "*"),
            (TokenKind::Name, "f"),
            (TokenKind::LParen, "("),
            (TokenKind::Name, "x"),
            (TokenKind::Minus, "-"),
            (TokenKind::Number, "1"),
            (TokenKind::RParen, ")"),
            (TokenKind::Newline, "\n"),
            (TokenKind::RParen, ")"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_for_loop() {
    assert_short_tokens(
        "for x in 1, 2, 3 { x + 1 }",
        &[
            (TokenKind::For, "for"),
            (TokenKind::Name, "x"),
            (TokenKind::In, "in"),
            (TokenKind::Number, "1"),
            (TokenKind::Comma, ","),
            (TokenKind::Number, "2"),
            (TokenKind::Comma, ","),
            (TokenKind::Number, "3"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Name, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Number, "1"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_while_loop() {
    assert_short_tokens(
        "while x < 3 { x + 1 }",
        &[
            (TokenKind::While, "while"),
            (TokenKind::Name, "x"),
            (TokenKind::Compare, "<"),
            (TokenKind::Number, "3"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Name, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Number, "1"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_if_else() {
    assert_short_tokens(
        "if x < 3 { x + 1 } else { x - 1 }",
        &[
            (TokenKind::If, "if"),
            (TokenKind::Name, "x"),
            (TokenKind::Compare, "<"),
            (TokenKind::Number, "3"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Name, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Number, "1"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Else, "else"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Name, "x"),
            (TokenKind::Minus, "-"),
            (TokenKind::Number, "1"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_string_literals() {
    assert_short_tokens(
        "\"\" \"hello 'world\" 'hello \"world' \"hello\\n\\\"world\\\"\"",
        &[
            (TokenKind::String, "\"\""),
            (TokenKind::String, "\"hello 'world\""),
            (TokenKind::String, "'hello \"world'"),
            (TokenKind::String, "\"hello\\n\\\"world\\\"\""),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_attribute_access() {
    assert_short_tokens(
        "x.y x::y",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::Dot, "."),
            (TokenKind::Name, "y"),
            (TokenKind::Name, "x"),
            (TokenKind::DoubleColon, "::"),
            (TokenKind::Name, "y"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_spread() {
    assert_short_tokens(
        "...x",
        &[
            (TokenKind::TripleDot, "..."),
            (TokenKind::Name, "x"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_keywords_never_become_names() {
    for (source, kind) in [
        ("continue", TokenKind::Continue),
        ("break", TokenKind::Break),
        ("null", TokenKind::Null),
        ("let", TokenKind::Let),
        ("if", TokenKind::If),
        ("for", TokenKind::For),
        ("in", TokenKind::In),
        ("has", TokenKind::Has),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("when", TokenKind::When),
    ] {
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, kind, "keyword {source:?}");
    }
    for (source, kind) in [("true", TokenKind::Bool), ("false", TokenKind::Bool)] {
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, kind, "literal {source:?}");
    }
}

#[test]
fn lex_keyword_prefixed_names() {
    // Longest match wins: identifiers that merely start with a keyword
    // still lex as NAME.
    for source in ["iffy", "lettuce", "android", "info", "hash", "nullable"] {
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Name, "identifier {source:?}");
        assert_eq!(tokens[0].literal, source);
    }
}

#[test]
fn lex_import() {
    assert_short_tokens(
        "import 'x'",
        &[
            (TokenKind::Import, "import"),
            (TokenKind::String, "'x'"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_illegal() {
    assert_tokens(
        "x @ y + 3",
        &[
            token(TokenKind::Name, "x", 1, 1),
            token(TokenKind::Illegal, "@", 1, 3),
            token(TokenKind::Name, "y", 1, 5),
            token(TokenKind::Plus, "+", 1, 7),
            token(TokenKind::Number, "3", 1, 9),
            token(TokenKind::Eof, "", 1, 10),
        ],
    );
}

#[test]
fn lex_print() {
    assert_short_tokens(
        "print x",
        &[
            (TokenKind::Print, "print"),
            (TokenKind::Name, "x"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_slicing() {
    assert_short_tokens(
        "x[1:3]",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::LBracket, "["),
            (TokenKind::Number, "1"),
            (TokenKind::Colon, ":"),
            (TokenKind::Number, "3"),
            (TokenKind::RBracket, "]"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_null_coalesce() {
    assert_short_tokens(
        "x ?? y",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::DoubleQuestion, "??"),
            (TokenKind::Name, "y"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_null_access() {
    assert_short_tokens(
        "x?.y",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::QuestionDot, "?."),
            (TokenKind::Name, "y"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_null_deep_access() {
    assert_short_tokens(
        "x?::y",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::QuestionDoubleColon, "?::"),
            (TokenKind::Name, "y"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_null_call() {
    assert_short_tokens(
        "x?(y)",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::QuestionLParen, "?("),
            (TokenKind::Name, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_pipe_overload() {
    assert_short_tokens(
        "() => 1 \n | () => 2",
        &[
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::Number, "1"),
            (TokenKind::Newline, "\n"),
            (TokenKind::Pipe, "|"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::Number, "2"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_when() {
    assert_short_tokens(
        "x = when a < b (a, b) => 1",
        &[
            (TokenKind::Name, "x"),
            (TokenKind::Assign, "="),
            (TokenKind::When, "when"),
            (TokenKind::Name, "a"),
            (TokenKind::Compare, "<"),
            (TokenKind::Name, "b"),
            (TokenKind::LParen, "("),
            (TokenKind::Name, "a"),
            (TokenKind::Comma, ","),
            (TokenKind::Name, "b"),
            (TokenKind::RParen, ")"),
            (TokenKind::Arrow, "=>"),
            (TokenKind::Number, "1"),
            (TokenKind::Eof, ""),
        ],
    );
}

#[test]
fn lex_comments_are_tokens() {
    let tokens = tokenize("x = 1 // trailing\ny");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Name,
            TokenKind::Assign,
            TokenKind::Number,
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::Name,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[3].literal, "// trailing");
}

#[test]
fn lex_number_forms() {
    for (source, literal) in [("12", "12"), ("14.5", "14.5"), (".5", ".5"), ("1e3", "1e3"), ("2.5e-3", "2.5e-3")] {
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Number, "number {source:?}");
        assert_eq!(tokens[0].literal, literal);
    }
}
