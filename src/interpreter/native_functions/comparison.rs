// File: src/interpreter/native_functions/comparison.rs
//
// Comparison primitives: == != < <= > >=

use super::binary_args;
use crate::errors::{PithonError, PithonResult};
use crate::interpreter::Value;
use std::cmp::Ordering;

/// Handle comparison primitive calls
/// Returns Some(result) if the name was handled, None if not recognized
pub fn handle(name: &str, arg_values: &[Value]) -> Option<PithonResult<Value>> {
    let result = match name {
        "==" => binary_args(name, arg_values).map(|(a, b)| Value::Bool(a == b)),
        "!=" => binary_args(name, arg_values).map(|(a, b)| Value::Bool(a != b)),
        "<" => ordered(name, arg_values, Ordering::is_lt),
        "<=" => ordered(name, arg_values, Ordering::is_le),
        ">" => ordered(name, arg_values, Ordering::is_gt),
        ">=" => ordered(name, arg_values, Ordering::is_ge),
        _ => return None,
    };
    Some(result)
}

/// Orders two numbers or two strings; any other pairing is a TypeError.
/// A comparison involving NaN is false.
fn ordered(name: &str, args: &[Value], test: fn(Ordering) -> bool) -> PithonResult<Value> {
    let ordering = match binary_args(name, args)? {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (a, b) => {
            return Err(PithonError::type_error(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                name,
                a.type_name(),
                b.type_name()
            )))
        }
    };
    Ok(Value::Bool(ordering.map_or(false, test)))
}
