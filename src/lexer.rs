// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the Pithon programming language.
// Converts source code text into a stream of tokens for parsing.
//
// Supports:
// - Keywords: def, return, if, elif, else, while, for, in, break, continue,
//   and, or, not, class, pass, None (True/False become Bool tokens)
// - Identifiers and numbers (integers, decimals, exponents)
// - String literals in single or double quotes with escape sequences
// - Operators: + - * / % == != < <= > >= =
// - Punctuation: ( ) [ ] , : .
// - Comments starting with #
// - Significant indentation, reported as Indent/Dedent tokens. Line breaks
//   inside brackets are not significant.

use crate::errors::{PithonError, PithonResult};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

pub const KEYWORDS: &[&str] = &[
    "def", "return", "if", "elif", "else", "while", "for", "in", "break", "continue", "and",
    "or", "not", "class", "pass", "None",
];

const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Number(f64),
    String(String),
    Bool(bool),
    Operator(String),
    Punctuation(char),
    Keyword(String),
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Bool(b) => write!(f, "'{}'", if *b { "True" } else { "False" }),
            TokenKind::Operator(op) => write!(f, "'{}'", op),
            TokenKind::Punctuation(c) => write!(f, "'{}'", c),
            TokenKind::Keyword(k) => write!(f, "keyword '{}'", k),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Indent => write!(f, "indent"),
            TokenKind::Dedent => write!(f, "dedent"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    indents: Vec<usize>,
    bracket_depth: usize,
    line: usize,
    col: usize,
}

/// Tokenizes Pithon source code into a vector of tokens.
///
/// Every logical line ends with a `Newline` token; entering a deeper
/// indentation level emits `Indent`, leaving one emits one `Dedent` per
/// level closed. Blank and comment-only lines produce nothing. The stream
/// always ends with `Eof`.
pub fn tokenize(source: &str) -> PithonResult<Vec<Token>> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        tokens: Vec::new(),
        indents: vec![0],
        bracket_depth: 0,
        line: 1,
        col: 1,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl<'a> Lexer<'a> {
    fn next_char(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn error(&self, message: impl Into<String>, line: usize, column: usize) -> PithonError {
        PithonError::parse_error(message, line, column)
    }

    fn run(&mut self) -> PithonResult<()> {
        let mut at_line_start = true;

        loop {
            if at_line_start {
                if !self.measure_indentation()? {
                    break;
                }
                at_line_start = false;
            }

            let Some(&c) = self.chars.peek() else { break };
            let (line, column) = (self.line, self.col);
            match c {
                ' ' | '\t' | '\r' => {
                    self.next_char();
                }
                '\n' => {
                    self.next_char();
                    if self.bracket_depth == 0 {
                        self.push(TokenKind::Newline, line, column);
                        at_line_start = true;
                    }
                }
                '#' => self.skip_comment(),
                '"' | '\'' => {
                    let text = self.read_string(c)?;
                    self.push(TokenKind::String(text), line, column);
                }
                '0'..='9' => {
                    let value = self.read_number()?;
                    self.push(TokenKind::Number(value), line, column);
                }
                '.' => {
                    self.next_char();
                    if matches!(self.chars.peek(), Some(d) if d.is_ascii_digit()) {
                        let value = self.read_fraction(String::from("0."), line, column)?;
                        self.push(TokenKind::Number(value), line, column);
                    } else {
                        self.push(TokenKind::Punctuation('.'), line, column);
                    }
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.read_word();
                    let kind = if word == "True" || word == "False" {
                        TokenKind::Bool(word == "True")
                    } else if KEYWORDS.contains(&word.as_str()) {
                        TokenKind::Keyword(word)
                    } else {
                        TokenKind::Identifier(word)
                    };
                    self.push(kind, line, column);
                }
                '=' | '!' | '<' | '>' => {
                    self.next_char();
                    let mut op = c.to_string();
                    if self.chars.peek() == Some(&'=') {
                        self.next_char();
                        op.push('=');
                    } else if c == '!' {
                        return Err(self.error("expected '=' after '!'", line, column));
                    }
                    self.push(TokenKind::Operator(op), line, column);
                }
                '+' | '-' | '*' | '/' | '%' => {
                    self.next_char();
                    self.push(TokenKind::Operator(c.to_string()), line, column);
                }
                '(' | '[' => {
                    self.next_char();
                    self.bracket_depth += 1;
                    self.push(TokenKind::Punctuation(c), line, column);
                }
                ')' | ']' => {
                    self.next_char();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    self.push(TokenKind::Punctuation(c), line, column);
                }
                ',' | ':' => {
                    self.next_char();
                    self.push(TokenKind::Punctuation(c), line, column);
                }
                other => {
                    return Err(self.error(format!("unexpected character '{}'", other), line, column))
                }
            }
        }

        // Close the last logical line and every open block
        if !matches!(self.tokens.last().map(|t| &t.kind), None | Some(TokenKind::Newline)) {
            self.push(TokenKind::Newline, self.line, self.col);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, self.line, 1);
        }
        self.push(TokenKind::Eof, self.line, self.col);
        Ok(())
    }

    /// Consumes leading whitespace of a line and emits Indent/Dedent tokens.
    /// Blank and comment-only lines are skipped whole. Returns false at end
    /// of input.
    fn measure_indentation(&mut self) -> PithonResult<bool> {
        loop {
            let mut width = 0;
            while let Some(&c) = self.chars.peek() {
                match c {
                    ' ' => width += 1,
                    '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                    '\r' => {}
                    _ => break,
                }
                self.next_char();
            }

            match self.chars.peek() {
                None => return Ok(false),
                Some('\n') => {
                    self.next_char();
                    continue;
                }
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some(_) => {}
            }

            let current = self.indents.last().copied().unwrap_or(0);
            if width > current {
                self.indents.push(width);
                self.push(TokenKind::Indent, self.line, 1);
            } else {
                while width < self.indents.last().copied().unwrap_or(0) {
                    self.indents.pop();
                    self.push(TokenKind::Dedent, self.line, 1);
                }
                if width != self.indents.last().copied().unwrap_or(0) {
                    return Err(self.error(
                        "unindent does not match any outer indentation level",
                        self.line,
                        self.col,
                    ));
                }
            }
            return Ok(true);
        }
    }

    /// Skips to (not past) the end of the line
    fn skip_comment(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn read_string(&mut self, quote: char) -> PithonResult<String> {
        let (line, column) = (self.line, self.col);
        self.next_char(); // opening quote
        let mut s = String::new();
        loop {
            match self.next_char() {
                None | Some('\n') => {
                    return Err(self.error("unterminated string literal", line, column))
                }
                Some(ch) if ch == quote => break,
                Some('\\') => match self.next_char() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('0') => s.push('\0'),
                    Some('\\') => s.push('\\'),
                    Some('\'') => s.push('\''),
                    Some('"') => s.push('"'),
                    Some(other) => {
                        s.push('\\');
                        s.push(other);
                    }
                    None => return Err(self.error("unterminated string literal", line, column)),
                },
                Some(ch) => s.push(ch),
            }
        }
        Ok(s)
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> PithonResult<f64> {
        let (line, column) = (self.line, self.col);
        let mut text = String::new();
        self.read_digits(&mut text);
        if self.chars.peek() == Some(&'.') {
            self.next_char();
            text.push('.');
        }
        self.read_fraction(text, line, column)
    }

    /// Reads the digits after a decimal point and an optional exponent
    fn read_fraction(&mut self, mut text: String, line: usize, column: usize) -> PithonResult<f64> {
        self.read_digits(&mut text);
        if matches!(self.chars.peek(), Some('e') | Some('E')) {
            self.next_char();
            text.push('e');
            if let Some(&sign) = self.chars.peek() {
                if sign == '+' || sign == '-' {
                    self.next_char();
                    text.push(sign);
                }
            }
            if !matches!(self.chars.peek(), Some(d) if d.is_ascii_digit()) {
                return Err(self.error("malformed number exponent", line, column));
            }
            self.read_digits(&mut text);
        }
        text.parse::<f64>()
            .map_err(|_| self.error(format!("invalid number literal '{}'", text), line, column))
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
                self.next_char();
            } else {
                break;
            }
        }
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn op(text: &str) -> TokenKind {
        TokenKind::Operator(text.to_string())
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(
            kinds("x = 1 + 2.5"),
            vec![
                ident("x"),
                op("="),
                TokenKind::Number(1.0),
                op("+"),
                TokenKind::Number(2.5),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_indentation_blocks() {
        let source = "if x:\n    y = 1\n\n    # note\n    z = 2\nw\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Keyword("if".into()),
                ident("x"),
                TokenKind::Punctuation(':'),
                TokenKind::Newline,
                TokenKind::Indent,
                ident("y"),
                op("="),
                TokenKind::Number(1.0),
                TokenKind::Newline,
                ident("z"),
                op("="),
                TokenKind::Number(2.0),
                TokenKind::Newline,
                TokenKind::Dedent,
                ident("w"),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_open_blocks_close_at_end_of_input() {
        let tokens = kinds("def f():\n  if a:\n    return 1");
        let tail: Vec<_> = tokens.iter().rev().take(4).cloned().collect();
        assert_eq!(
            tail,
            vec![TokenKind::Eof, TokenKind::Dedent, TokenKind::Dedent, TokenKind::Newline]
        );
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        assert_eq!(
            kinds("f(1,\n      2)\n"),
            vec![
                ident("f"),
                TokenKind::Punctuation('('),
                TokenKind::Number(1.0),
                TokenKind::Punctuation(','),
                TokenKind::Number(2.0),
                TokenKind::Punctuation(')'),
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(kinds(r#"'it\'s' "a\tb""#)[..2], [
            TokenKind::String("it's".into()),
            TokenKind::String("a\tb".into())
        ]);
        let err = tokenize("'open").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("1e3 .5 2.")[..3], [
            TokenKind::Number(1000.0),
            TokenKind::Number(0.5),
            TokenKind::Number(2.0)
        ]);
        assert!(tokenize("1e").is_err());
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(kinds("not x != None and True")[..6], [
            TokenKind::Keyword("not".into()),
            ident("x"),
            op("!="),
            TokenKind::Keyword("None".into()),
            TokenKind::Keyword("and".into()),
            TokenKind::Bool(true)
        ]);
        assert_eq!(kinds("a.b <= c")[..5], [
            ident("a"),
            TokenKind::Punctuation('.'),
            ident("b"),
            op("<="),
            ident("c")
        ]);
    }

    #[test]
    fn test_bad_dedent_is_an_error() {
        let err = tokenize("if x:\n    y\n  z\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert_eq!(err.location.map(|l| l.line), Some(3));
    }

    #[test]
    fn test_token_positions() {
        let tokens = tokenize("x = 1\n  \ny = 2").unwrap();
        let y = tokens.iter().find(|t| t.kind == ident("y")).unwrap();
        assert_eq!((y.line, y.column), (3, 1));
    }
}
