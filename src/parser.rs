// File: src/parser.rs
//
// Recursive descent parser for the Pithon programming language.
// Transforms a sequence of tokens into an abstract syntax tree.
//
// The parser implements a traditional recursive descent strategy with
// operator precedence for expressions. It supports:
// - Assignment to names and attributes, including `a = b = value`
// - Function definitions with an optional `*rest` parameter
// - Class definitions whose bodies hold method definitions
// - Control flow (if/elif/else, while, for, break, continue, return)
// - Expressions with Python precedence, from lowest to highest:
//   ternary, or, and, not, one comparison (incl. `in`/`not in`), + -,
//   * / %, unary minus, then calls, subscripts and attribute access
//
// Operators are kept as symbols in `BinaryOperation` nodes; the evaluator
// decides what they mean.

use crate::ast::{ClassDef, FunctionDef, Node, Program};
use crate::errors::{PithonError, PithonResult};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;
use std::rc::Rc;

const COMPARISON_OPERATORS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];

/// Lexes and parses a complete program
pub fn parse(source: &str) -> PithonResult<Program> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse()
}

/// Parser maintains position in token stream and provides methods to parse statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a new parser from a vector of tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> &TokenKind {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens.get(self.pos + offset).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Consume and return the current token, then advance to the next
    fn advance(&mut self) -> TokenKind {
        let tok = self.peek().clone();
        self.pos += 1;
        tok
    }

    /// Line and column of the current token
    fn position(&self) -> (usize, usize) {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => (token.line, token.column),
            None => (1, 1),
        }
    }

    fn error_here(&self, message: impl Into<String>) -> PithonError {
        let (line, column) = self.position();
        PithonError::parse_error(message, line, column)
    }

    fn unexpected(&self, expected: &str) -> PithonError {
        self.error_here(format!("expected {} but found {}", expected, self.peek()))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if k == keyword)
    }

    fn at_punct(&self, c: char) -> bool {
        matches!(self.peek(), TokenKind::Punctuation(p) if *p == c)
    }

    fn at_operator(&self, op: &str) -> bool {
        matches!(self.peek(), TokenKind::Operator(o) if o == op)
    }

    fn expect_keyword(&mut self, keyword: &str) -> PithonResult<()> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", keyword)))
        }
    }

    fn expect_punct(&mut self, c: char) -> PithonResult<()> {
        if self.at_punct(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> PithonResult<String> {
        match self.peek() {
            TokenKind::Identifier(_) => match self.advance() {
                TokenKind::Identifier(name) => Ok(name),
                _ => Err(self.unexpected(what)),
            },
            _ => Err(self.unexpected(what)),
        }
    }

    fn expect_end_of_statement(&mut self) -> PithonResult<()> {
        match self.peek() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::Dedent => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    /// Parse the entire token stream into a program
    pub fn parse(&mut self) -> PithonResult<Program> {
        let mut program = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            match self.peek() {
                TokenKind::Newline => {
                    self.advance();
                }
                TokenKind::Indent => return Err(self.error_here("unexpected indent")),
                _ => {
                    if let Some(node) = self.parse_statement()? {
                        program.push(node);
                    }
                }
            }
        }
        Ok(program)
    }

    /// Parses one statement. `pass` yields no node.
    fn parse_statement(&mut self) -> PithonResult<Option<Node>> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> PithonResult<Option<Node>> {
        match self.peek() {
            TokenKind::Keyword(k) if k == "def" => self.parse_def().map(|def| Some(Node::FunctionDef(def))),
            TokenKind::Keyword(k) if k == "class" => self.parse_class().map(Some),
            TokenKind::Keyword(k) if k == "if" => {
                self.advance();
                self.parse_if_rest().map(Some)
            }
            TokenKind::Keyword(k) if k == "while" => {
                self.advance();
                let condition = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(Some(Node::While { condition: Box::new(condition), body }))
            }
            TokenKind::Keyword(k) if k == "for" => {
                self.advance();
                let var = self.expect_identifier("a loop variable name")?;
                self.expect_keyword("in")?;
                let iterable = self.parse_expr_list()?;
                let body = self.parse_block()?;
                Ok(Some(Node::For { var, iterable: Box::new(iterable), body }))
            }
            _ => self.parse_simple_statement(),
        }
    }

    /// Statements that fit on one line: return, break, continue, pass,
    /// assignment and bare expressions
    fn parse_simple_statement(&mut self) -> PithonResult<Option<Node>> {
        let node = match self.peek() {
            TokenKind::Keyword(k) if k == "return" => {
                self.advance();
                let value = if matches!(
                    self.peek(),
                    TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
                ) {
                    Node::None
                } else {
                    self.parse_expr_list()?
                };
                Some(Node::Return(Box::new(value)))
            }
            TokenKind::Keyword(k) if k == "break" => {
                self.advance();
                Some(Node::Break)
            }
            TokenKind::Keyword(k) if k == "continue" => {
                self.advance();
                Some(Node::Continue)
            }
            TokenKind::Keyword(k) if k == "pass" => {
                self.advance();
                None
            }
            _ => Some(self.parse_assignment_or_expr()?),
        };
        self.expect_end_of_statement()?;
        Ok(node)
    }

    fn parse_assignment_or_expr(&mut self) -> PithonResult<Node> {
        let mut parts = vec![self.parse_expr_list()?];
        let mut targets_at = Vec::new();
        while self.at_operator("=") {
            targets_at.push(self.position());
            self.advance();
            parts.push(self.parse_expr_list()?);
        }

        // a = b = value binds right to left, each assignment yielding the value
        let mut value = parts.pop().unwrap_or(Node::None);
        while let Some(target) = parts.pop() {
            let (line, column) = targets_at.pop().unwrap_or((0, 0));
            value = match target {
                Node::Variable(name) => Node::Assignment { name, value: Box::new(value) },
                Node::Attribute { object, attr } => {
                    Node::AttributeAssignment { object, attr, value: Box::new(value) }
                }
                _ => {
                    return Err(PithonError::parse_error(
                        "cannot assign to this expression",
                        line,
                        column,
                    ))
                }
            };
        }
        Ok(value)
    }

    /// Parses `: suite`, where the suite is an indented block or a single
    /// simple statement on the same line
    fn parse_block(&mut self) -> PithonResult<Vec<Node>> {
        self.expect_punct(':')?;
        if !matches!(self.peek(), TokenKind::Newline) {
            return Ok(self.parse_simple_statement()?.into_iter().collect());
        }
        self.advance(); // newline
        if !matches!(self.peek(), TokenKind::Indent) {
            return Err(self.unexpected("an indented block"));
        }
        self.advance(); // indent

        let mut body = Vec::new();
        while !matches!(self.peek(), TokenKind::Dedent | TokenKind::Eof) {
            if let Some(node) = self.parse_statement()? {
                body.push(node);
            }
        }
        if matches!(self.peek(), TokenKind::Dedent) {
            self.advance();
        }
        Ok(body)
    }

    /// Everything after `if`/`elif`; `elif` nests in the else branch
    fn parse_if_rest(&mut self) -> PithonResult<Node> {
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.at_keyword("elif") {
            self.advance();
            vec![self.parse_if_rest()?]
        } else if self.at_keyword("else") {
            self.advance();
            self.parse_block()?
        } else {
            Vec::new()
        };
        Ok(Node::IfThenElse { condition: Box::new(condition), then_branch, else_branch })
    }

    fn parse_def(&mut self) -> PithonResult<Rc<FunctionDef>> {
        self.expect_keyword("def")?;
        let name = self.expect_identifier("a function name")?;
        self.expect_punct('(')?;

        let mut params: Vec<String> = Vec::new();
        let mut vararg = None;
        while !self.at_punct(')') {
            let (line, column) = self.position();
            let param = if self.at_operator("*") {
                self.advance();
                let rest = self.expect_identifier("a parameter name after '*'")?;
                vararg = Some(rest.clone());
                rest
            } else {
                if vararg.is_some() {
                    return Err(self.error_here("parameters may not follow '*rest'"));
                }
                let param = self.expect_identifier("a parameter name")?;
                params.push(param.clone());
                param
            };
            let occurrences = params.iter().filter(|p| **p == param).count()
                + usize::from(vararg.as_deref() == Some(param.as_str()));
            if occurrences > 1 {
                return Err(PithonError::parse_error(
                    format!("duplicate parameter '{}' in function '{}'", param, name),
                    line,
                    column,
                ));
            }
            if !self.at_punct(',') {
                break;
            }
            self.advance();
        }
        self.expect_punct(')')?;

        let body = self.parse_block()?;
        Ok(Rc::new(FunctionDef { name, params, vararg, body }))
    }

    fn parse_class(&mut self) -> PithonResult<Node> {
        self.expect_keyword("class")?;
        let name = self.expect_identifier("a class name")?;
        self.expect_punct(':')?;
        if !matches!(self.peek(), TokenKind::Newline) {
            // `class C: pass`
            self.expect_keyword("pass")?;
            self.expect_end_of_statement()?;
            return Ok(Node::ClassDef(Rc::new(ClassDef { name, methods: Vec::new() })));
        }
        self.advance(); // newline
        if !matches!(self.peek(), TokenKind::Indent) {
            return Err(self.unexpected("an indented class body"));
        }
        self.advance();

        let mut methods = Vec::new();
        while !matches!(self.peek(), TokenKind::Dedent | TokenKind::Eof) {
            if self.at_keyword("def") {
                methods.push(self.parse_def()?);
            } else if self.at_keyword("pass") {
                self.advance();
                self.expect_end_of_statement()?;
            } else {
                return Err(self.error_here("class bodies may only contain method definitions"));
            }
        }
        if matches!(self.peek(), TokenKind::Dedent) {
            self.advance();
        }
        Ok(Node::ClassDef(Rc::new(ClassDef { name, methods })))
    }

    /// `expr` or a bare comma-separated list, which forms a tuple
    fn parse_expr_list(&mut self) -> PithonResult<Node> {
        let first = self.parse_expr()?;
        if !self.at_punct(',') {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.at_punct(',') {
            self.advance();
            if self.starts_expression() {
                items.push(self.parse_expr()?);
            } else {
                break;
            }
        }
        Ok(Node::Tuple(items))
    }

    fn starts_expression(&self) -> bool {
        match self.peek() {
            TokenKind::Identifier(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Bool(_) => true,
            TokenKind::Keyword(k) => k == "None" || k == "not",
            TokenKind::Punctuation(c) => *c == '(' || *c == '[',
            TokenKind::Operator(op) => op == "-",
            _ => false,
        }
    }

    /// Ternary level: `a if cond else b`
    fn parse_expr(&mut self) -> PithonResult<Node> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> PithonResult<Node> {
        let value = self.parse_or()?;
        if !self.at_keyword("if") {
            return Ok(value);
        }
        self.advance();
        let condition = self.parse_or()?;
        self.expect_keyword("else")?;
        let alternative = self.parse_expr()?;
        Ok(Node::IfThenElse {
            condition: Box::new(condition),
            then_branch: vec![value],
            else_branch: vec![alternative],
        })
    }

    fn parse_or(&mut self) -> PithonResult<Node> {
        let mut left = self.parse_and()?;
        while self.at_keyword("or") {
            self.advance();
            let right = self.parse_and()?;
            left = Node::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PithonResult<Node> {
        let mut left = self.parse_not()?;
        while self.at_keyword("and") {
            self.advance();
            let right = self.parse_not()?;
            left = Node::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> PithonResult<Node> {
        if self.at_keyword("not") {
            self.advance();
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            return Ok(Node::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn at_comparison(&self) -> bool {
        match self.peek() {
            TokenKind::Operator(op) => COMPARISON_OPERATORS.contains(&op.as_str()),
            TokenKind::Keyword(k) if k == "in" => true,
            TokenKind::Keyword(k) if k == "not" => {
                matches!(self.peek_at(1), TokenKind::Keyword(next) if next == "in")
            }
            _ => false,
        }
    }

    /// At most one comparison; `a < b < c` is rejected
    fn parse_comparison(&mut self) -> PithonResult<Node> {
        let left = self.parse_additive()?;
        if !self.at_comparison() {
            return Ok(left);
        }

        let node = match self.advance() {
            TokenKind::Keyword(k) if k == "in" => {
                let container = self.parse_additive()?;
                Node::In { element: Box::new(left), container: Box::new(container) }
            }
            TokenKind::Keyword(_) => {
                self.advance(); // `in` after `not`
                let container = self.parse_additive()?;
                Node::Not(Box::new(Node::In {
                    element: Box::new(left),
                    container: Box::new(container),
                }))
            }
            TokenKind::Operator(op) => {
                let right = self.parse_additive()?;
                Node::binary(left, &op, right)
            }
            other => {
                return Err(self.error_here(format!("expected a comparison but found {}", other)))
            }
        };

        if self.at_comparison() {
            return Err(self.error_here("chained comparisons are not supported"));
        }
        Ok(node)
    }

    /// Consumes the current token when it is one of `ops`
    fn binary_operator(&mut self, ops: &[&str]) -> Option<String> {
        match self.peek() {
            TokenKind::Operator(op) if ops.contains(&op.as_str()) => match self.advance() {
                TokenKind::Operator(op) => Some(op),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_additive(&mut self) -> PithonResult<Node> {
        let mut left = self.parse_term()?;
        while let Some(op) = self.binary_operator(&["+", "-"]) {
            let right = self.parse_term()?;
            left = Node::binary(left, &op, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> PithonResult<Node> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_operator(&["*", "/", "%"]) {
            let right = self.parse_unary()?;
            left = Node::binary(left, &op, right);
        }
        Ok(left)
    }

    /// Unary minus folds into number literals and otherwise becomes `0 - x`
    fn parse_unary(&mut self) -> PithonResult<Node> {
        if self.at_operator("-") {
            self.advance();
            return Ok(match ensure_sufficient_stack(|| self.parse_unary())? {
                Node::Number(n) => Node::Number(-n),
                operand => Node::binary(Node::Number(0.0), "-", operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PithonResult<Node> {
        let mut node = self.parse_atom()?;
        loop {
            if self.at_punct('(') {
                self.advance();
                let args = self.parse_sequence(')')?;
                node = Node::call(node, args);
            } else if self.at_punct('[') {
                self.advance();
                let index = self.parse_expr()?;
                self.expect_punct(']')?;
                node = Node::Subscript { collection: Box::new(node), index: Box::new(index) };
            } else if self.at_punct('.') {
                self.advance();
                let attr = self.expect_identifier("an attribute name")?;
                node = Node::Attribute { object: Box::new(node), attr };
            } else {
                return Ok(node);
            }
        }
    }

    /// Comma-separated expressions up to `close` (consumed); a trailing comma is allowed
    fn parse_sequence(&mut self, close: char) -> PithonResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.at_punct(close) {
            items.push(self.parse_expr()?);
            if !self.at_punct(',') {
                break;
            }
            self.advance();
        }
        self.expect_punct(close)?;
        Ok(items)
    }

    fn parse_atom(&mut self) -> PithonResult<Node> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Node::Number(n))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Node::Str(s))
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Node::Bool(b))
            }
            TokenKind::Keyword(k) if k == "None" => {
                self.advance();
                Ok(Node::None)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::Variable(name))
            }
            TokenKind::Punctuation('[') => {
                self.advance();
                Ok(Node::List(self.parse_sequence(']')?))
            }
            TokenKind::Punctuation('(') => {
                self.advance();
                if self.at_punct(')') {
                    self.advance();
                    return Ok(Node::Tuple(Vec::new()));
                }
                let first = self.parse_expr()?;
                if self.at_punct(')') {
                    self.advance();
                    return Ok(first);
                }
                // (a,) and (a, b, ...) are tuples
                self.expect_punct(',')?;
                let mut items = vec![first];
                items.extend(self.parse_sequence(')')?);
                Ok(Node::Tuple(items))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
