// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the Pithon language.
// Executes Pithon programs by traversing the abstract syntax tree.
//
// The interpreter evaluates every node against an explicit environment frame.
// Operators are not special: `a + b` looks up the primitive bound to `+` and
// calls it exactly like `add(a, b)`. It supports:
// - Variable binding (always in the current frame) and lexical lookup
// - Functions with closures captured by reference and variadic parameters
// - Loops with break/continue and early return from calls
// - Classes with methods, instances and bound methods
//
// Non-local exits travel on the error side of `Eval` (see control_flow.rs)
// and are absorbed only by the node kinds allowed to handle them.

mod control_flow;
mod environment;
mod native_functions;
mod value;

pub use environment::Frame;
pub use native_functions::{PRIMITIVE_ALIASES, PRIMITIVE_NAMES};
pub use value::{format_number, BoundMethod, ClassValue, Closure, Object, Value};

use control_flow::{ControlFlow, Eval, Unwind};

use crate::ast::{ClassDef, Node};
use crate::errors::{find_closest_match, ErrorKind, PithonError, PithonResult};
use crate::stack::ensure_sufficient_stack;
use ahash::AHashMap;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// Default limit on nested user-function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Tunables for one interpreter instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Calls nested deeper than this fail with a RecursionError
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

/// Creates a root frame holding every primitive binding
pub fn initial_env() -> Frame {
    let frame = Frame::root();
    native_functions::install(&frame);
    frame
}

/// Main interpreter that executes Pithon programs
pub struct Interpreter {
    globals: Frame,
    output: Option<Arc<Mutex<Vec<u8>>>>,
    config: InterpreterConfig,
    call_stack: Vec<String>, // Names of the user functions currently executing
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new interpreter whose global frame holds the primitives
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Interpreter { globals: initial_env(), output: None, config, call_stack: Vec::new() }
    }

    /// The root frame that `eval_program` evaluates in
    pub fn globals(&self) -> &Frame {
        &self.globals
    }

    /// Discards every user binding, keeping the output sink and config
    pub fn reset(&mut self) {
        self.globals = initial_env();
        self.call_stack.clear();
    }

    /// Redirects `print` output into a shared buffer (used by tests, the REPL
    /// and the fixture runner). Without a buffer output goes to stdout.
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    /// Get the current call stack
    pub fn get_call_stack(&self) -> Vec<String> {
        self.call_stack.clone()
    }

    /// Writes one line to the output sink
    pub(crate) fn write_output(&self, msg: &str) {
        if let Some(out) = &self.output {
            let mut buffer = out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let _ = writeln!(buffer, "{}", msg);
        } else {
            println!("{}", msg);
        }
    }

    /// Evaluates `program` in `frame` and returns the value of its last
    /// statement (none for an empty program). Signals that escape every
    /// handler become StructuralControl errors.
    pub fn evaluate(&mut self, program: &[Node], frame: &Frame) -> PithonResult<Value> {
        tracing::debug!(statements = program.len(), "evaluating program");
        let result = self.eval_block(program, frame).map_err(Unwind::into_error);
        self.call_stack.clear();
        if let Err(err) = &result {
            tracing::debug!(kind = %err.kind, "evaluation failed");
        }
        result
    }

    /// Evaluates `program` in the global frame
    pub fn eval_program(&mut self, program: &[Node]) -> PithonResult<Value> {
        let globals = self.globals.clone();
        self.evaluate(program, &globals)
    }

    /// Parses and evaluates source text in the global frame
    pub fn run_source(&mut self, source: &str) -> PithonResult<Value> {
        let program = crate::parser::parse(source)?;
        self.eval_program(&program)
    }

    /// Calls any callable value with already-evaluated arguments
    pub fn call_function(&mut self, callee: &Value, args: Vec<Value>) -> PithonResult<Value> {
        match callee {
            Value::NativeFunction(name) => {
                native_functions::call_native_function(self, name, &args)
            }
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Method(method) => {
                let mut bound = Vec::with_capacity(args.len() + 1);
                bound.push(Value::Object(method.receiver.clone()));
                bound.extend(args);
                self.call_closure(&method.function, bound)
            }
            Value::Class(class) => self.instantiate(class, args),
            other => Err(PithonError::type_error(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    /// Evaluates statements in order in one frame; the block's value is the
    /// last statement's value
    fn eval_block(&mut self, body: &[Node], frame: &Frame) -> Eval {
        let mut last = Value::None;
        for node in body {
            last = self.eval_node(node, frame)?;
        }
        Ok(last)
    }

    fn eval_all(&mut self, nodes: &[Node], frame: &Frame) -> Eval<Vec<Value>> {
        nodes.iter().map(|node| self.eval_node(node, frame)).collect()
    }

    fn eval_node(&mut self, node: &Node, frame: &Frame) -> Eval {
        ensure_sufficient_stack(|| self.eval_node_inner(node, frame))
    }

    fn eval_node_inner(&mut self, node: &Node, frame: &Frame) -> Eval {
        match node {
            Node::Number(n) => Ok(Value::Number(*n)),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Str(s) => Ok(Value::str(s)),
            Node::None => Ok(Value::None),
            Node::List(items) => Ok(Value::list(self.eval_all(items, frame)?)),
            Node::Tuple(items) => Ok(Value::tuple(self.eval_all(items, frame)?)),

            Node::Variable(name) => Ok(frame.lookup(name)?),

            Node::BinaryOperation { left, operator, right } => {
                // Operators resolve at evaluation time, like any other name
                let primitive = frame.lookup(operator)?;
                let left = self.eval_node(left, frame)?;
                let right = self.eval_node(right, frame)?;
                Ok(self.call_function(&primitive, vec![left, right])?)
            }

            Node::Assignment { name, value } => {
                let value = self.eval_node(value, frame)?;
                frame.insert(name.clone(), value.clone());
                Ok(value)
            }

            Node::AttributeAssignment { object, attr, value } => {
                let target = self.eval_node(object, frame)?;
                let value = self.eval_node(value, frame)?;
                match target {
                    Value::Object(object) => {
                        object.attributes.borrow_mut().insert(attr.clone(), value.clone());
                        Ok(value)
                    }
                    other => Err(PithonError::type_error(format!(
                        "cannot set attribute '{}' on a value of type '{}'",
                        attr,
                        other.type_name()
                    ))
                    .into()),
                }
            }

            Node::IfThenElse { condition, then_branch, else_branch } => {
                let condition = self.eval_node(condition, frame)?;
                if expect_bool(&condition, "if condition")? {
                    self.eval_block(then_branch, frame)
                } else {
                    self.eval_block(else_branch, frame)
                }
            }

            Node::Not(operand) => {
                let operand = self.eval_node(operand, frame)?;
                Ok(Value::Bool(!expect_bool(&operand, "'not' operand")?))
            }

            Node::And(left, right) => {
                let left = self.eval_node(left, frame)?;
                if !logical_operand(&left, "and")? {
                    return Ok(left);
                }
                let right = self.eval_node(right, frame)?;
                logical_operand(&right, "and")?;
                Ok(right)
            }

            Node::Or(left, right) => {
                let left = self.eval_node(left, frame)?;
                if logical_operand(&left, "or")? {
                    return Ok(left);
                }
                let right = self.eval_node(right, frame)?;
                logical_operand(&right, "or")?;
                Ok(right)
            }

            Node::While { condition, body } => {
                loop {
                    let test = self.eval_node(condition, frame)?;
                    if !expect_bool(&test, "while condition")? {
                        break;
                    }
                    match self.eval_block(body, frame) {
                        Ok(_) | Err(Unwind::Signal(ControlFlow::Continue)) => {}
                        Err(Unwind::Signal(ControlFlow::Break)) => {
                            tracing::trace!("while loop left by break");
                            break;
                        }
                        Err(other) => return Err(other),
                    }
                }
                Ok(Value::None)
            }

            Node::For { var, iterable, body } => {
                let items = match self.eval_node(iterable, frame)? {
                    Value::List(items) | Value::Tuple(items) => items,
                    other => {
                        return Err(PithonError::type_error(format!(
                            "'{}' object is not iterable",
                            other.type_name()
                        ))
                        .into())
                    }
                };
                for item in items.iter() {
                    // One binding shared by every iteration, in the current frame
                    frame.insert(var.clone(), item.clone());
                    match self.eval_block(body, frame) {
                        Ok(_) | Err(Unwind::Signal(ControlFlow::Continue)) => {}
                        Err(Unwind::Signal(ControlFlow::Break)) => {
                            tracing::trace!(var = var.as_str(), "for loop left by break");
                            break;
                        }
                        Err(other) => return Err(other),
                    }
                }
                Ok(Value::None)
            }

            Node::Break => Err(Unwind::Signal(ControlFlow::Break)),
            Node::Continue => Err(Unwind::Signal(ControlFlow::Continue)),
            Node::Return(value) => {
                let value = self.eval_node(value, frame)?;
                Err(Unwind::Signal(ControlFlow::Return(value)))
            }

            Node::FunctionDef(def) => {
                let closure = Closure::new(def.clone(), frame.clone());
                frame.insert(def.name.clone(), Value::Function(Rc::new(closure)));
                Ok(Value::None)
            }

            Node::FunctionCall { function, args } => {
                let callee = self.eval_node(function, frame)?;
                let args = self.eval_all(args, frame)?;
                Ok(self.call_function(&callee, args)?)
            }

            Node::Subscript { collection, index } => {
                let collection = self.eval_node(collection, frame)?;
                let index = self.eval_node(index, frame)?;
                Ok(subscript(&collection, &index)?)
            }

            Node::In { element, container } => {
                let container = self.eval_node(container, frame)?;
                let element = self.eval_node(element, frame)?;
                Ok(Value::Bool(contains(&container, &element)?))
            }

            Node::ClassDef(def) => {
                let class = build_class(def, frame);
                frame.insert(def.name.clone(), Value::Class(Rc::new(class)));
                Ok(Value::None)
            }

            Node::Attribute { object, attr } => {
                let object = self.eval_node(object, frame)?;
                Ok(get_attribute(&object, attr)?)
            }
        }
    }

    /// Invokes a user function: binds arguments in a fresh frame parented to
    /// the closure's captured frame, then runs the body. `return` ends the
    /// call; `break`/`continue` may not cross it.
    fn call_closure(&mut self, closure: &Rc<Closure>, args: Vec<Value>) -> PithonResult<Value> {
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(PithonError::new(
                ErrorKind::RecursionError,
                format!("maximum call depth of {} exceeded", self.config.max_call_depth),
            )
            .with_help(format!("while calling '{}'", closure.name())));
        }

        let frame = bind_arguments(closure, args)?;
        self.call_stack.push(closure.name().to_string());
        tracing::trace!(function = closure.name(), depth = self.call_stack.len(), "call");

        let result = self.eval_block(&closure.def.body, &frame);
        self.call_stack.pop();

        match result {
            Ok(value) | Err(Unwind::Signal(ControlFlow::Return(value))) => Ok(value),
            Err(other) => Err(other.into_error()),
        }
    }

    /// Creates an object of `class`, running `__init__` when the class has one
    fn instantiate(&mut self, class: &Rc<ClassValue>, args: Vec<Value>) -> PithonResult<Value> {
        let object = Rc::new(Object::new(class.clone()));
        match class.methods.get("__init__").cloned() {
            Some(init) => {
                let mut bound = Vec::with_capacity(args.len() + 1);
                bound.push(Value::Object(object.clone()));
                bound.extend(args);
                self.call_closure(&init, bound)?;
            }
            None if !args.is_empty() => {
                return Err(PithonError::arity_error(format!(
                    "{}() takes no arguments ({} given)",
                    class.name,
                    args.len()
                )));
            }
            None => {}
        }
        Ok(Value::Object(object))
    }
}

fn expect_bool(value: &Value, what: &str) -> PithonResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => {
            Err(PithonError::type_error(format!("{} must be a bool, not '{}'", what, other.type_name())))
        }
    }
}

fn logical_operand(value: &Value, op: &str) -> PithonResult<bool> {
    value.logical_truth().ok_or_else(|| {
        PithonError::type_error(format!(
            "'{}' operands must be bool, number, str or None, not '{}'",
            op,
            value.type_name()
        ))
    })
}

fn bind_arguments(closure: &Closure, mut args: Vec<Value>) -> PithonResult<Frame> {
    let def = &closure.def;
    let required = def.params.len();

    if args.len() < required || (def.vararg.is_none() && args.len() > required) {
        let plural = if required == 1 { "" } else { "s" };
        let bound = if def.vararg.is_some() { "at least" } else { "exactly" };
        return Err(PithonError::arity_error(format!(
            "{}() takes {} {} argument{} ({} given)",
            def.name,
            bound,
            required,
            plural,
            args.len()
        )));
    }

    let frame = Frame::new_child(&closure.env);
    let surplus = args.split_off(required);
    for (param, value) in def.params.iter().zip(args) {
        frame.insert(param.clone(), value);
    }
    if let Some(rest) = &def.vararg {
        frame.insert(rest.clone(), Value::list(surplus));
    }
    Ok(frame)
}

fn build_class(def: &ClassDef, frame: &Frame) -> ClassValue {
    let methods: AHashMap<String, Rc<Closure>> = def
        .methods
        .iter()
        .map(|method| (method.name.clone(), Rc::new(Closure::new(method.clone(), frame.clone()))))
        .collect();
    ClassValue { name: def.name.clone(), methods }
}

/// Index into a list, tuple or string. Negative indices count from the end.
fn subscript(collection: &Value, index: &Value) -> PithonResult<Value> {
    let index = match index {
        Value::Number(n) => n.trunc(),
        other => {
            return Err(PithonError::type_error(format!(
                "indices must be numbers, not '{}'",
                other.type_name()
            )))
        }
    };

    match collection {
        Value::List(items) | Value::Tuple(items) => {
            let position = resolve_index(index, items.len(), collection.type_name())?;
            Ok(items[position].clone())
        }
        Value::Str(text) => {
            let position = resolve_index(index, text.chars().count(), "string")?;
            let mut buf = [0u8; 4];
            match text.chars().nth(position) {
                Some(ch) => Ok(Value::str(ch.encode_utf8(&mut buf))),
                None => Err(PithonError::index_error("string index out of range")),
            }
        }
        other => Err(PithonError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn resolve_index(index: f64, len: usize, kind: &str) -> PithonResult<usize> {
    let len_f = len as f64;
    let resolved = if index < 0.0 { index + len_f } else { index };
    if resolved >= 0.0 && resolved < len_f {
        Ok(resolved as usize)
    } else {
        Err(PithonError::index_error(format!("{} index out of range", kind)))
    }
}

fn contains(container: &Value, element: &Value) -> PithonResult<bool> {
    match (container, element) {
        (Value::List(items) | Value::Tuple(items), _) => Ok(items.contains(element)),
        (Value::Str(text), Value::Str(needle)) => Ok(text.contains(&**needle)),
        (Value::Str(_), other) => Err(PithonError::type_error(format!(
            "'in <string>' requires a string as left operand, not '{}'",
            other.type_name()
        ))),
        (other, _) => Err(PithonError::type_error(format!(
            "argument of type '{}' is not a container",
            other.type_name()
        ))),
    }
}

fn get_attribute(object: &Value, attr: &str) -> PithonResult<Value> {
    match object {
        Value::Object(instance) => {
            if let Some(value) = instance.attributes.borrow().get(attr) {
                return Ok(value.clone());
            }
            if let Some(method) = instance.class.methods.get(attr) {
                return Ok(Value::Method(Rc::new(BoundMethod {
                    function: method.clone(),
                    receiver: instance.clone(),
                })));
            }
            let mut known: Vec<String> = instance.attributes.borrow().keys().cloned().collect();
            known.extend(instance.class.methods.keys().cloned());
            Err(missing_attribute(&instance.class.name, "object", attr, &known))
        }
        Value::Class(class) => match class.methods.get(attr) {
            Some(method) => Ok(Value::Function(method.clone())),
            None => {
                let known: Vec<String> = class.methods.keys().cloned().collect();
                Err(missing_attribute(&class.name, "class", attr, &known))
            }
        },
        other => Err(PithonError::attribute_error(format!(
            "'{}' value has no attribute '{}'",
            other.type_name(),
            attr
        ))),
    }
}

fn missing_attribute(owner: &str, what: &str, attr: &str, known: &[String]) -> PithonError {
    let err = PithonError::attribute_error(format!("'{}' {} has no attribute '{}'", owner, what, attr));
    match find_closest_match(attr, known) {
        Some(suggestion) => err.with_suggestion(suggestion.to_string()),
        None => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FunctionDef;

    fn num(n: f64) -> Node {
        Node::Number(n)
    }

    fn def(name: &str, params: &[&str], vararg: Option<&str>, body: Vec<Node>) -> Node {
        Node::FunctionDef(Rc::new(FunctionDef {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            vararg: vararg.map(str::to_string),
            body,
        }))
    }

    fn capture(interp: &mut Interpreter) -> Arc<Mutex<Vec<u8>>> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        interp.set_output(buffer.clone());
        buffer
    }

    fn output(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_arithmetic_precedence_from_tree() {
        let mut interp = Interpreter::new();
        let program = vec![Node::binary(num(2.0), "+", Node::binary(num(3.0), "*", num(4.0)))];
        assert_eq!(interp.eval_program(&program).unwrap(), Value::Number(14.0));
    }

    #[test]
    fn test_empty_program_is_none() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.eval_program(&[]).unwrap(), Value::None);
    }

    #[test]
    fn test_operator_resolves_through_frame() {
        let mut interp = Interpreter::new();
        let frame = Frame::new_child(interp.globals());
        // Rebinding `+` in an inner frame changes what `+` means there
        frame.insert("+", frame.lookup("-").unwrap());
        let program = vec![Node::binary(num(5.0), "+", num(3.0))];
        assert_eq!(interp.evaluate(&program, &frame).unwrap(), Value::Number(2.0));
        assert_eq!(interp.eval_program(&program).unwrap(), Value::Number(8.0));
    }

    #[test]
    fn test_assignment_returns_value_and_binds_locally() {
        let mut interp = Interpreter::new();
        let result = interp.eval_program(&[Node::assign("x", num(4.0))]).unwrap();
        assert_eq!(result, Value::Number(4.0));
        assert!(interp.globals().defines("x"));
    }

    #[test]
    fn test_if_requires_bool_condition() {
        let mut interp = Interpreter::new();
        let program = vec![Node::IfThenElse {
            condition: Box::new(num(1.0)),
            then_branch: vec![],
            else_branch: vec![],
        }];
        let err = interp.eval_program(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_empty_branch_is_none() {
        let mut interp = Interpreter::new();
        let program = vec![Node::IfThenElse {
            condition: Box::new(Node::Bool(true)),
            then_branch: vec![],
            else_branch: vec![num(1.0)],
        }];
        assert_eq!(interp.eval_program(&program).unwrap(), Value::None);
    }

    #[test]
    fn test_and_or_short_circuit_and_return_deciding_operand() {
        let mut interp = Interpreter::new();
        // The right operand would be an unbound name if it were evaluated
        let and = vec![Node::And(Box::new(num(0.0)), Box::new(Node::var("missing")))];
        assert_eq!(interp.eval_program(&and).unwrap(), Value::Number(0.0));

        let or = vec![Node::Or(Box::new(Node::Str("x".into())), Box::new(Node::var("missing")))];
        assert_eq!(interp.eval_program(&or).unwrap(), Value::str("x"));

        let or = vec![Node::Or(Box::new(Node::None), Box::new(num(7.0)))];
        assert_eq!(interp.eval_program(&or).unwrap(), Value::Number(7.0));

        let bad = vec![Node::And(Box::new(Node::List(vec![])), Box::new(num(1.0)))];
        assert_eq!(interp.eval_program(&bad).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_not_requires_bool() {
        let mut interp = Interpreter::new();
        let ok = vec![Node::Not(Box::new(Node::Bool(false)))];
        assert_eq!(interp.eval_program(&ok).unwrap(), Value::Bool(true));
        let bad = vec![Node::Not(Box::new(num(0.0)))];
        assert_eq!(interp.eval_program(&bad).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_for_shares_loop_variable_with_current_frame() {
        let mut interp = Interpreter::new();
        let program = vec![
            Node::For {
                var: "i".into(),
                iterable: Box::new(Node::List(vec![num(1.0), num(2.0), num(3.0)])),
                body: vec![],
            },
            Node::var("i"),
        ];
        assert_eq!(interp.eval_program(&program).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_for_over_non_sequence_is_type_error() {
        let mut interp = Interpreter::new();
        let program =
            vec![Node::For { var: "i".into(), iterable: Box::new(num(3.0)), body: vec![] }];
        assert_eq!(interp.eval_program(&program).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_return_inside_loop_ends_call() {
        let mut interp = Interpreter::new();
        let program = vec![
            def(
                "first",
                &["items"],
                None,
                vec![Node::For {
                    var: "x".into(),
                    iterable: Box::new(Node::var("items")),
                    body: vec![Node::Return(Box::new(Node::var("x")))],
                }],
            ),
            Node::call(Node::var("first"), vec![Node::Tuple(vec![num(9.0), num(8.0)])]),
        ];
        assert_eq!(interp.eval_program(&program).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn test_escaping_signals_are_structural_errors() {
        let mut interp = Interpreter::new();
        for node in [Node::Break, Node::Continue, Node::Return(Box::new(Node::None))] {
            let err = interp.eval_program(&[node]).unwrap_err();
            assert_eq!(err.kind, ErrorKind::StructuralControl);
        }

        // break inside a function called from a loop may not reach that loop
        let program = vec![
            def("escape", &[], None, vec![Node::Break]),
            Node::While {
                condition: Box::new(Node::Bool(true)),
                body: vec![Node::call(Node::var("escape"), vec![])],
            },
        ];
        let err = interp.eval_program(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StructuralControl);
        assert!(err.message.contains("'break' outside loop"));
    }

    #[test]
    fn test_arity_and_variadic_binding() {
        let mut interp = Interpreter::new();
        let program = vec![
            def("f", &["a"], Some("rest"), vec![Node::Tuple(vec![Node::var("a"), Node::var("rest")])]),
            Node::call(Node::var("f"), (1..=5).map(|n| num(n as f64)).collect()),
        ];
        let result = interp.eval_program(&program).unwrap();
        let expected = Value::tuple(vec![
            Value::Number(1.0),
            Value::list(vec![
                Value::Number(2.0),
                Value::Number(3.0),
                Value::Number(4.0),
                Value::Number(5.0),
            ]),
        ]);
        assert_eq!(result, expected);

        let program = vec![def("g", &[], None, vec![]), Node::call(Node::var("g"), vec![num(1.0)])];
        assert_eq!(interp.eval_program(&program).unwrap_err().kind, ErrorKind::ArityError);

        let program = vec![Node::call(Node::var("f"), vec![])];
        assert_eq!(interp.eval_program(&program).unwrap_err().kind, ErrorKind::ArityError);
    }

    #[test]
    fn test_calling_non_callable_is_type_error() {
        let mut interp = Interpreter::new();
        let program = vec![Node::call(num(1.0), vec![])];
        assert_eq!(interp.eval_program(&program).unwrap_err().kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_recursion_limit() {
        let mut interp = Interpreter::with_config(InterpreterConfig { max_call_depth: 50 });
        let program = vec![
            def("loop_forever", &[], None, vec![Node::call(Node::var("loop_forever"), vec![])]),
            Node::call(Node::var("loop_forever"), vec![]),
        ];
        let err = interp.eval_program(&program).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursionError);
        assert!(interp.get_call_stack().is_empty());
    }

    #[test]
    fn test_subscript_rules() {
        let list = Value::list(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(subscript(&list, &Value::Number(1.9)).unwrap(), Value::Number(2.0));
        assert_eq!(subscript(&list, &Value::Number(-1.0)).unwrap(), Value::Number(2.0));
        assert_eq!(subscript(&list, &Value::Number(2.0)).unwrap_err().kind, ErrorKind::IndexError);
        assert_eq!(subscript(&list, &Value::Number(-3.0)).unwrap_err().kind, ErrorKind::IndexError);
        assert_eq!(subscript(&Value::str("héllo"), &Value::Number(1.0)).unwrap(), Value::str("é"));
        assert_eq!(subscript(&list, &Value::str("0")).unwrap_err().kind, ErrorKind::TypeError);
        assert_eq!(
            subscript(&Value::Number(1.0), &Value::Number(0.0)).unwrap_err().kind,
            ErrorKind::TypeError
        );
    }

    #[test]
    fn test_membership_rules() {
        let tuple = Value::tuple(vec![Value::Number(1.0), Value::str("a")]);
        assert!(contains(&tuple, &Value::str("a")).unwrap());
        assert!(!contains(&tuple, &Value::Bool(true)).unwrap());
        assert!(contains(&Value::str("hello"), &Value::str("ell")).unwrap());
        assert_eq!(
            contains(&Value::str("hello"), &Value::Number(1.0)).unwrap_err().kind,
            ErrorKind::TypeError
        );
        assert_eq!(
            contains(&Value::Number(1.0), &Value::Number(1.0)).unwrap_err().kind,
            ErrorKind::TypeError
        );
    }

    #[test]
    fn test_print_goes_to_captured_output() {
        let mut interp = Interpreter::new();
        let buffer = capture(&mut interp);
        let program = vec![Node::call(Node::var("print"), vec![Node::Str("hi".into())])];
        assert_eq!(interp.eval_program(&program).unwrap(), Value::None);
        assert_eq!(output(&buffer), "hi\n");
    }

    #[test]
    fn test_reset_discards_user_bindings() {
        let mut interp = Interpreter::new();
        interp.eval_program(&[Node::assign("x", num(1.0))]).unwrap();
        interp.reset();
        assert!(!interp.globals().defines("x"));
        assert!(interp.globals().defines("print"));
    }
}
