// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Pithon language.
// Defines the closed set of node kinds produced by the front end and
// consumed by the evaluator.
//
// Every node evaluates to a value, so expressions and statements share a
// single enum. A program is an ordered sequence of nodes. Nodes own their
// children exclusively; function and class definitions are reference-counted
// so closures can point at them without copying the body.

use std::rc::Rc;

/// The fixed set of binary operator symbols, resolved at evaluation time
/// by looking the symbol up as a primitive function.
pub const BINARY_OPERATORS: &[&str] = &["+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">="];

/// A whole program: an ordered statement sequence
pub type Program = Vec<Node>;

/// A syntax node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Literals
    Number(f64),
    Bool(bool),
    Str(String),
    None,
    List(Vec<Node>),
    Tuple(Vec<Node>),

    Variable(String),
    BinaryOperation {
        left: Box<Node>,
        operator: String,
        right: Box<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    AttributeAssignment {
        object: Box<Node>,
        attr: String,
        value: Box<Node>,
    },
    IfThenElse {
        condition: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    // Short-circuiting boolean operators
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),

    While {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    For {
        var: String,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    Break,
    Continue,
    Return(Box<Node>),

    FunctionDef(Rc<FunctionDef>),
    FunctionCall {
        function: Box<Node>,
        args: Vec<Node>,
    },
    Subscript {
        collection: Box<Node>,
        index: Box<Node>,
    },
    In {
        element: Box<Node>,
        container: Box<Node>,
    },
    ClassDef(Rc<ClassDef>),
    Attribute {
        object: Box<Node>,
        attr: String,
    },
}

/// A function definition: `def name(params, *vararg): body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub vararg: Option<String>,
    pub body: Vec<Node>,
}

/// A class definition: a name and its method definitions
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub methods: Vec<Rc<FunctionDef>>,
}

impl Node {
    /// Builds `left <operator> right`
    pub fn binary(left: Node, operator: &str, right: Node) -> Node {
        Node::BinaryOperation {
            left: Box::new(left),
            operator: operator.to_string(),
            right: Box::new(right),
        }
    }

    /// Builds a call of `function` on `args`
    pub fn call(function: Node, args: Vec<Node>) -> Node {
        Node::FunctionCall { function: Box::new(function), args }
    }

    /// Builds a reference to `name`
    pub fn var(name: &str) -> Node {
        Node::Variable(name.to_string())
    }

    /// Builds `name = value`
    pub fn assign(name: &str, value: Node) -> Node {
        Node::Assignment { name: name.to_string(), value: Box::new(value) }
    }

    /// Whether this node binds a name without producing a value worth
    /// echoing (assignment, function or class definition).
    pub fn is_binding(&self) -> bool {
        matches!(
            self,
            Node::Assignment { .. }
                | Node::AttributeAssignment { .. }
                | Node::FunctionDef(_)
                | Node::ClassDef(_)
        )
    }
}
