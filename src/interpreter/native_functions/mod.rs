// File: src/interpreter/native_functions/mod.rs
//
// Primitive (host-implemented) functions, grouped by category.
// Every primitive receives its already-evaluated arguments and either
// returns a value or fails with a typed error. Binary operators are
// primitives too: `a + b` is dispatched as a call of the primitive `+`.

pub mod arithmetic;
pub mod comparison;
pub mod io;
pub mod sequences;

use super::environment::Frame;
use super::{Interpreter, Value};
use crate::errors::{ErrorKind, PithonError, PithonResult};

/// Canonical names of every primitive, in the order they are installed
pub const PRIMITIVE_NAMES: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "print", "range", "str",
];

/// Word aliases for the operator primitives. An alias is bound to the same
/// primitive value as its symbol, so both spellings dispatch identically.
pub const PRIMITIVE_ALIASES: &[(&str, &str)] = &[
    ("add", "+"),
    ("sub", "-"),
    ("mul", "*"),
    ("div", "/"),
    ("mod", "%"),
    ("eq", "=="),
    ("ne", "!="),
    ("lt", "<"),
    ("le", "<="),
    ("gt", ">"),
    ("ge", ">="),
];

/// Binds every primitive (and its alias) in `frame`
pub fn install(frame: &Frame) {
    for name in PRIMITIVE_NAMES {
        frame.insert(*name, Value::NativeFunction(*name));
    }
    for (alias, name) in PRIMITIVE_ALIASES {
        frame.insert(*alias, Value::NativeFunction(*name));
    }
}

/// Main dispatcher that routes primitive calls to their category module
pub fn call_native_function(
    interp: &mut Interpreter,
    name: &str,
    arg_values: &[Value],
) -> PithonResult<Value> {
    tracing::trace!(primitive = name, argc = arg_values.len(), "primitive call");

    if let Some(result) = arithmetic::handle(name, arg_values) {
        return result;
    }
    if let Some(result) = comparison::handle(name, arg_values) {
        return result;
    }
    if let Some(result) = io::handle(interp, name, arg_values) {
        return result;
    }
    if let Some(result) = sequences::handle(name, arg_values) {
        return result;
    }

    Err(PithonError::new(ErrorKind::UnboundName, format!("unknown primitive function '{}'", name)))
}

/// Longest list, tuple or string a primitive may build
pub(crate) const MAX_SEQUENCE_LEN: usize = 1 << 28;

/// Length of `count` copies of a `len`-long sequence, if it fits
pub(crate) fn checked_length(name: &str, len: usize, count: usize) -> PithonResult<usize> {
    match len.checked_mul(count) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(total),
        _ => Err(PithonError::new(
            ErrorKind::OverflowError,
            format!("{}: result would exceed {} elements", name, MAX_SEQUENCE_LEN),
        )),
    }
}

/// Checks that a primitive received exactly `expected` arguments
pub(crate) fn expect_arity(name: &str, args: &[Value], expected: usize) -> PithonResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        let plural = if expected == 1 { "" } else { "s" };
        Err(PithonError::arity_error(format!(
            "{}() takes exactly {} argument{} ({} given)",
            name,
            expected,
            plural,
            args.len()
        )))
    }
}

/// Splits the argument list of a binary primitive
pub(crate) fn binary_args<'a>(
    name: &str,
    args: &'a [Value],
) -> PithonResult<(&'a Value, &'a Value)> {
    expect_arity(name, args, 2)?;
    Ok((&args[0], &args[1]))
}

/// Requires a number, naming the primitive in the error
pub(crate) fn expect_number(name: &str, value: &Value) -> PithonResult<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(PithonError::type_error(format!(
            "{}() expects a number, got '{}'",
            name,
            other.type_name()
        ))),
    }
}
