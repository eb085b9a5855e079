// File: src/interpreter/value.rs
//
// Runtime value types for the Pithon language.
// Defines every value kind the evaluator can produce or consume, together
// with the language's equality rules and display forms.

use crate::ast::FunctionDef;
use ahash::AHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::environment::Frame;

/// Runtime values in the Pithon interpreter
///
/// Scalars are stored inline; sequences and callables are reference-counted
/// so that copying a value never deep-copies a list or a captured frame.
#[derive(Clone)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    Bool(bool),
    None,
    Str(Rc<str>),
    /// Ordered sequence, replaced rather than mutated in place
    List(Rc<Vec<Value>>),
    /// Fixed-arity immutable sequence
    Tuple(Rc<Vec<Value>>),
    /// User-defined function paired with its defining frame
    Function(Rc<Closure>),
    /// Host-implemented primitive, identified by its canonical name
    NativeFunction(&'static str),
    Class(Rc<ClassValue>),
    Object(Rc<Object>),
    /// A function bound to the object it was looked up on
    Method(Rc<BoundMethod>),
}

/// A function definition plus the frame active where it was defined.
/// The frame is shared, never copied.
pub struct Closure {
    pub def: Rc<FunctionDef>,
    pub env: Frame,
}

impl Closure {
    pub fn new(def: Rc<FunctionDef>, env: Frame) -> Self {
        Closure { def, env }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }
}

/// A class: its name and its methods
pub struct ClassValue {
    pub name: String,
    pub methods: AHashMap<String, Rc<Closure>>,
}

/// An instance of a class with its own mutable attribute table
pub struct Object {
    pub class: Rc<ClassValue>,
    pub attributes: RefCell<AHashMap<String, Value>>,
}

impl Object {
    pub fn new(class: Rc<ClassValue>) -> Self {
        Object { class, attributes: RefCell::new(AHashMap::new()) }
    }
}

pub struct BoundMethod {
    pub function: Rc<Closure>,
    pub receiver: Rc<Object>,
}

impl Value {
    pub fn str(text: &str) -> Value {
        Value::Str(Rc::from(text))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(items))
    }

    /// Name of the value's kind, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::None => "NoneType",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "builtin_function",
            Value::Class(_) => "class",
            Value::Object(_) => "object",
            Value::Method(_) => "method",
        }
    }

    /// Truth value for `and`/`or`. Only booleans, numbers, strings and none
    /// take part; any other kind yields `None`.
    pub fn logical_truth(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(*n != 0.0),
            Value::Str(s) => Some(!s.is_empty()),
            Value::None => Some(false),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Quoted form used when the value appears inside a list or tuple
    pub fn repr(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::None => "None".to_string(),
            Value::Str(s) => quote_str(s),
            Value::List(items) => format!("[{}]", join_repr(items)),
            Value::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Value::Tuple(items) => format!("({})", join_repr(items)),
            Value::Function(closure) => format!("<function {}>", closure.name()),
            Value::NativeFunction(name) => format!("<built-in function {}>", name),
            Value::Class(class) => format!("<class {}>", class.name),
            Value::Object(object) => format!("<{} object>", object.class.name),
            Value::Method(method) => format!(
                "<bound method {}.{}>",
                method.receiver.class.name,
                method.function.name()
            ),
        }
    }
}

fn join_repr(items: &[Value]) -> String {
    items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
}

/// Quotes a string the way it is shown inside collections
fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Formats a number for display.
///
/// Integral values print without a fractional part; very large or very
/// small magnitudes switch to exponent notation with a signed, two-digit
/// exponent (`1e-05`, `2.5e+20`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if n == n.trunc() && n.abs() < 1e16 {
        return format!("{}", n as i64);
    }

    let magnitude = n.abs();
    if magnitude >= 1e16 || magnitude < 1e-4 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        }
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.repr()),
        }
    }
}

impl fmt::Debug for Value {
    // Closures reach their frames, which may reach the closure again,
    // so Debug goes through the display form instead of deriving.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.repr())
    }
}

impl PartialEq for Value {
    /// Scalars compare by value and sequences by content; callables,
    /// classes and objects compare by identity. Distinct kinds are never equal.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Method(a), Value::Method(b)) => {
                Rc::ptr_eq(&a.function, &b.function) && Rc::ptr_eq(&a.receiver, &b.receiver)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_closure(name: &str) -> Rc<Closure> {
        let def = FunctionDef { name: name.to_string(), params: vec![], vararg: None, body: vec![] };
        Rc::new(Closure::new(Rc::new(def), Frame::root()))
    }

    #[test]
    fn test_number_display() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e-5), "1e-05");
        assert_eq!(format_number(2.5e20), "2.5e+20");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::str("hi").to_string(), "hi");
        assert_eq!(
            Value::list(vec![Value::Number(1.0), Value::str("a")]).to_string(),
            "[1, 'a']"
        );
        assert_eq!(Value::tuple(vec![Value::Number(1.0)]).to_string(), "(1,)");
        assert_eq!(Value::tuple(vec![]).to_string(), "()");
        assert_eq!(Value::str("it's").repr(), "\"it's\"");
        assert_eq!(sample_closure("f").name(), "f");
        assert_eq!(Value::Function(sample_closure("f")).to_string(), "<function f>");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_eq!(
            Value::list(vec![Value::Number(1.0), Value::str("x")]),
            Value::list(vec![Value::Number(1.0), Value::str("x")])
        );
        assert_ne!(
            Value::list(vec![Value::Number(1.0)]),
            Value::tuple(vec![Value::Number(1.0)])
        );
    }

    #[test]
    fn test_callables_compare_by_identity() {
        let f = sample_closure("f");
        let g = sample_closure("f");
        assert_eq!(Value::Function(f.clone()), Value::Function(f.clone()));
        assert_ne!(Value::Function(f), Value::Function(g));
    }

    #[test]
    fn test_logical_truth() {
        assert_eq!(Value::Number(0.0).logical_truth(), Some(false));
        assert_eq!(Value::str("").logical_truth(), Some(false));
        assert_eq!(Value::str("x").logical_truth(), Some(true));
        assert_eq!(Value::None.logical_truth(), Some(false));
        assert_eq!(Value::list(vec![]).logical_truth(), None);
    }
}
