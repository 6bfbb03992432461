//! Regex-driven lexer for Owl source text.
//!
//! The lexer walks the input with an ordered table of anchored matchers and
//! always takes the longest match; on a tie the matcher that appears earlier
//! in the table wins. That single rule gives keywords priority over `NAME`
//! and `==` priority over `=` without any special casing.

use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

/// Lexical category of a [`Token`].
///
/// The display form matches the historical upper-case tag names, which is
/// what parse errors print (`expected RPAREN, found NEWLINE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[strum(serialize = "COMMENT")]
    Comment,
    #[strum(serialize = "NEWLINE")]
    Newline,
    #[strum(serialize = "IF")]
    If,
    #[strum(serialize = "ELSE")]
    Else,
    #[strum(serialize = "FOR")]
    For,
    #[strum(serialize = "IN")]
    In,
    #[strum(serialize = "HAS")]
    Has,
    #[strum(serialize = "RETURN")]
    Return,
    #[strum(serialize = "LET")]
    Let,
    #[strum(serialize = "WHILE")]
    While,
    #[strum(serialize = "CONTINUE")]
    Continue,
    #[strum(serialize = "BREAK")]
    Break,
    #[strum(serialize = "IMPORT")]
    Import,
    #[strum(serialize = "PRINT")]
    Print,
    #[strum(serialize = "NULL")]
    Null,
    #[strum(serialize = "WHEN")]
    When,
    #[strum(serialize = "ARROW")]
    Arrow,
    #[strum(serialize = "COMPARE")]
    Compare,
    #[strum(serialize = "ASSIGN")]
    Assign,
    #[strum(serialize = "AND")]
    And,
    #[strum(serialize = "OR")]
    Or,
    #[strum(serialize = "NOT")]
    Not,
    #[strum(serialize = "LPAREN")]
    LParen,
    #[strum(serialize = "RPAREN")]
    RParen,
    #[strum(serialize = "LBRACE")]
    LBrace,
    #[strum(serialize = "RBRACE")]
    RBrace,
    #[strum(serialize = "LBRACKET")]
    LBracket,
    #[strum(serialize = "RBRACKET")]
    RBracket,
    #[strum(serialize = "QUESTIONLPAREN")]
    QuestionLParen,
    #[strum(serialize = "COMMA")]
    Comma,
    #[strum(serialize = "QUESTIONDOT")]
    QuestionDot,
    #[strum(serialize = "QUESTIONDOUBLECOLON")]
    QuestionDoubleColon,
    #[strum(serialize = "INCDEC")]
    IncDec,
    #[strum(serialize = "MINUS")]
    Minus,
    #[strum(serialize = "PLUS")]
    Plus,
    #[strum(serialize = "SLASH")]
    Slash,
    #[strum(serialize = "DOUBLESTAR")]
    DoubleStar,
    #[strum(serialize = "STAR")]
    Star,
    #[strum(serialize = "DOUBLEQUESTION")]
    DoubleQuestion,
    #[strum(serialize = "PERCENT")]
    Percent,
    #[strum(serialize = "QUESTION")]
    Question,
    #[strum(serialize = "DOUBLECOLON")]
    DoubleColon,
    #[strum(serialize = "COLON")]
    Colon,
    #[strum(serialize = "PIPE")]
    Pipe,
    #[strum(serialize = "TRIPLEDOT")]
    TripleDot,
    #[strum(serialize = "DOT")]
    Dot,
    #[strum(serialize = "STRING")]
    String,
    #[strum(serialize = "BOOL")]
    Bool,
    #[strum(serialize = "NUMBER")]
    Number,
    #[strum(serialize = "NAME")]
    Name,
    #[strum(serialize = "EOF")]
    Eof,
    #[strum(serialize = "ILLEGAL")]
    Illegal,
}

/// A single lexeme with its source coordinates.
///
/// `line` and `column` are 1-based; `column` counts characters from the start
/// of the line. Every AST node keeps the token that began its production, so
/// runtime errors can point back at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
    pub file: String,
}

impl Token {
    /// A placeholder token for synthesized nodes with no source position.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            kind: TokenKind::Eof,
            literal: String::new(),
            line: 0,
            column: 0,
            file: String::new(),
        }
    }
}

/// The ordered matcher table. Order is significant twice over: keywords must
/// precede `NAME`, and `COMPARE` must precede `ASSIGN` so `==` does not lex
/// as `=` followed by `=`.
static MATCHERS: LazyLock<Vec<(TokenKind, Regex)>> = LazyLock::new(|| {
    use TokenKind::{
        And, Arrow, Assign, Bool, Break, Colon, Comma, Comment, Compare, Continue, Dot, DoubleColon,
        DoubleQuestion, DoubleStar, Else, For, Has, If, Import, In, IncDec, LBrace, LBracket, LParen, Let, Minus,
        Name, Newline, Not, Null, Number, Or, Percent, Pipe, Plus, Print, Question, QuestionDot,
        QuestionDoubleColon, QuestionLParen, RBrace, RBracket, RParen, Return, Slash, Star, String, TripleDot,
        When, While,
    };
    let table: &[(TokenKind, &str)] = &[
        (Comment, r"//.*"),
        (Newline, r"\r?\n"),
        (If, "if"),
        (Else, "else"),
        (For, "for"),
        (In, "in"),
        (Has, "has"),
        (Return, "return"),
        (Let, "let"),
        (While, "while"),
        (Continue, "continue"),
        (Break, "break"),
        (Import, "import"),
        (Print, "print"),
        (Null, "null"),
        (When, "when"),
        (Arrow, "=>"),
        (Compare, "==|!=|<=|>=|<|>"),
        (Assign, r"[+\-*/&|]?="),
        (And, "and"),
        (Or, "or"),
        (Not, "!|not"),
        (LParen, r"\("),
        (RParen, r"\)"),
        (LBrace, r"\{"),
        (RBrace, r"\}"),
        (LBracket, r"\["),
        (RBracket, r"\]"),
        (QuestionLParen, r"\?\("),
        (Comma, ","),
        (QuestionDot, r"\?\."),
        (QuestionDoubleColon, r"\?::"),
        (IncDec, r"\+\+|--"),
        (Minus, "-"),
        (Plus, r"\+"),
        (Slash, "/"),
        (DoubleStar, r"\*\*"),
        (Star, r"\*"),
        (DoubleQuestion, r"\?\?"),
        (Percent, "%"),
        (Question, r"\?"),
        (DoubleColon, "::"),
        (Colon, ":"),
        (Pipe, r"\|"),
        (TripleDot, r"\.\.\."),
        (Dot, r"\."),
        (String, r#""([^\\"\n]|\\.)*"|'([^\\'\n]|\\.)*'"#),
        (Bool, "true|false"),
        (Number, r"[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?"),
        (Name, "[a-zA-Z_][a-zA-Z0-9_]*"),
    ];
    table
        .iter()
        .map(|(kind, pattern)| (*kind, Regex::new(pattern).expect("invalid lexer pattern")))
        .collect()
});

/// Turns source text into the flat token stream consumed by the parser.
#[derive(Debug)]
pub struct Lexer<'src> {
    input: &'src str,
    position: usize,
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub fn new(input: &'src str) -> Self {
        Self { input, position: 0 }
    }

    /// Produces the full token sequence, always ending with `EOF`.
    pub fn tokenize(mut self, file: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut line = 1;
        let mut column = 1;

        loop {
            let token = self.next_token(&mut line, &mut column, file);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self, line: &mut usize, column: &mut usize, file: &str) -> Token {
        *column += self.skip_whitespace();

        if self.position >= self.input.len() {
            return Token {
                kind: TokenKind::Eof,
                literal: String::new(),
                line: *line,
                column: *column,
                file: file.to_owned(),
            };
        }

        let rest = &self.input[self.position..];
        let mut longest = 0;
        let mut longest_kind = TokenKind::Illegal;

        for (kind, matcher) in MATCHERS.iter() {
            let Some(m) = matcher.find(rest) else { continue };
            if m.start() != 0 {
                continue;
            }
            if m.end() > longest {
                longest = m.end();
                longest_kind = *kind;
            }
        }

        if longest == 0 {
            let offending: char = rest.chars().next().expect("input not exhausted");
            let token = Token {
                kind: TokenKind::Illegal,
                literal: offending.to_string(),
                line: *line,
                column: *column,
                file: file.to_owned(),
            };
            self.position += offending.len_utf8();
            *column += 1;
            return token;
        }

        let literal = &rest[..longest];
        let token = Token {
            kind: longest_kind,
            literal: literal.to_owned(),
            line: *line,
            column: *column,
            file: file.to_owned(),
        };
        self.position += longest;

        if longest_kind == TokenKind::Newline {
            *line += 1;
            *column = 1;
        } else {
            *column += literal.chars().count();
        }

        token
    }

    /// Skips a run of horizontal whitespace and reports how many columns it
    /// covered.
    fn skip_whitespace(&mut self) -> usize {
        let start = self.position;
        let bytes = self.input.as_bytes();
        while self.position < bytes.len() && matches!(bytes[self.position], b' ' | b'\t') {
            self.position += 1;
        }
        self.position - start
    }
}
