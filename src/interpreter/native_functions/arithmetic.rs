// File: src/interpreter/native_functions/arithmetic.rs
//
// Arithmetic primitives: + - * / %
//
// Operands are numbers, except that `+` also concatenates two lists, two
// tuples or two strings, and `*` repeats a list, tuple or string a
// (truncated) number of times, with the count on either side.

use super::{binary_args, checked_length};
use crate::errors::{PithonError, PithonResult};
use crate::interpreter::Value;
use std::rc::Rc;

/// Handle arithmetic primitive calls
/// Returns Some(result) if the name was handled, None if not recognized
pub fn handle(name: &str, arg_values: &[Value]) -> Option<PithonResult<Value>> {
    let result = match name {
        "+" => add(arg_values),
        "-" => numeric(name, arg_values, |a, b| a - b),
        "*" => multiply(arg_values),
        "/" => divide(arg_values),
        "%" => modulo(arg_values),
        _ => return None,
    };
    Some(result)
}

fn unsupported(op: &str, a: &Value, b: &Value) -> PithonError {
    PithonError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op,
        a.type_name(),
        b.type_name()
    ))
}

fn numeric(op: &str, args: &[Value], f: impl Fn(f64, f64) -> f64) -> PithonResult<Value> {
    match binary_args(op, args)? {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
        (a, b) => Err(unsupported(op, a, b)),
    }
}

fn add(args: &[Value]) -> PithonResult<Value> {
    match binary_args("+", args)? {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::Str(a), Value::Str(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::Str(Rc::from(joined)))
        }
        (Value::List(a), Value::List(b)) => Ok(Value::list(concat(a, b))),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::tuple(concat(a, b))),
        (a, b) => Err(unsupported("+", a, b)),
    }
}

fn concat(a: &[Value], b: &[Value]) -> Vec<Value> {
    let mut items = Vec::with_capacity(a.len() + b.len());
    items.extend_from_slice(a);
    items.extend_from_slice(b);
    items
}

/// Repeat count: the number truncated toward zero, negative counts act as zero
fn repeat_count(n: f64) -> usize {
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        n.trunc() as usize
    }
}

fn repeat(value: &Value, n: f64) -> Option<PithonResult<Value>> {
    let count = repeat_count(n);
    let result = match value {
        Value::Str(s) => checked_length("*", s.len(), count).map(|len| {
            let count = if len == 0 { 0 } else { count };
            Value::Str(Rc::from(s.repeat(count)))
        }),
        Value::List(items) => repeat_items(items, count).map(Value::list),
        Value::Tuple(items) => repeat_items(items, count).map(Value::tuple),
        _ => return None,
    };
    Some(result)
}

fn repeat_items(items: &[Value], count: usize) -> PithonResult<Vec<Value>> {
    let len = checked_length("*", items.len(), count)?;
    Ok(items.iter().cloned().cycle().take(len).collect())
}

fn multiply(args: &[Value]) -> PithonResult<Value> {
    let (a, b) = binary_args("*", args)?;
    let product = match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(Ok(Value::Number(x * y))),
        (sequence, Value::Number(n)) | (Value::Number(n), sequence) => repeat(sequence, *n),
        _ => None,
    };
    product.unwrap_or_else(|| Err(unsupported("*", a, b)))
}

fn divide(args: &[Value]) -> PithonResult<Value> {
    match binary_args("/", args)? {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => {
            Err(PithonError::zero_division("division by zero"))
        }
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (a, b) => Err(unsupported("/", a, b)),
    }
}

/// Floored modulo: the result takes the sign of the divisor
fn modulo(args: &[Value]) -> PithonResult<Value> {
    match binary_args("%", args)? {
        (Value::Number(_), Value::Number(b)) if *b == 0.0 => {
            Err(PithonError::zero_division("modulo by zero"))
        }
        (Value::Number(a), Value::Number(b)) => {
            let r = a % b;
            let r = if r != 0.0 && (r < 0.0) != (*b < 0.0) { r + b } else { r };
            Ok(Value::Number(r))
        }
        (a, b) => Err(unsupported("%", a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn call(name: &str, a: Value, b: Value) -> PithonResult<Value> {
        handle(name, &[a, b]).expect("arithmetic primitive should be handled")
    }

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_numeric_operations() {
        assert_eq!(call("+", num(2.0), num(3.0)).unwrap(), num(5.0));
        assert_eq!(call("-", num(2.0), num(3.0)).unwrap(), num(-1.0));
        assert_eq!(call("*", num(2.0), num(3.0)).unwrap(), num(6.0));
        assert_eq!(call("/", num(3.0), num(2.0)).unwrap(), num(1.5));
        assert_eq!(call("%", num(7.0), num(3.0)).unwrap(), num(1.0));
    }

    #[test]
    fn test_modulo_takes_sign_of_divisor() {
        assert_eq!(call("%", num(-7.0), num(3.0)).unwrap(), num(2.0));
        assert_eq!(call("%", num(7.0), num(-3.0)).unwrap(), num(-2.0));
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(call("+", Value::str("ab"), Value::str("cd")).unwrap(), Value::str("abcd"));
        assert_eq!(
            call("+", Value::list(vec![num(1.0)]), Value::list(vec![num(2.0)])).unwrap(),
            Value::list(vec![num(1.0), num(2.0)])
        );
        assert_eq!(
            call("+", Value::tuple(vec![num(1.0)]), Value::tuple(vec![])).unwrap(),
            Value::tuple(vec![num(1.0)])
        );
        let err = call("+", Value::list(vec![]), Value::tuple(vec![])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_repetition_on_either_side() {
        assert_eq!(call("*", Value::str("ab"), num(3.0)).unwrap(), Value::str("ababab"));
        assert_eq!(
            call("*", num(2.9), Value::list(vec![num(0.0)])).unwrap(),
            Value::list(vec![num(0.0), num(0.0)])
        );
        assert_eq!(call("*", Value::str("x"), num(-1.0)).unwrap(), Value::str(""));
        let err = call("*", Value::str("x"), Value::str("y")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn test_tuple_repetition_clones_items() {
        let pair = Value::tuple(vec![num(0.0), Value::str("a")]);
        assert_eq!(
            call("*", pair, num(2.0)).unwrap(),
            Value::tuple(vec![num(0.0), Value::str("a"), num(0.0), Value::str("a")])
        );
        assert_eq!(call("*", num(0.0), Value::tuple(vec![num(1.0)])).unwrap(), Value::tuple(vec![]));
    }

    #[test]
    fn test_oversized_repetition_is_an_overflow_error() {
        let err = call("*", Value::str("ab"), num(1e19)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OverflowError);
        let err = call("*", num(f64::INFINITY), Value::list(vec![num(1.0)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::OverflowError);
        // Nothing to repeat, so any count fits
        assert_eq!(call("*", Value::str(""), num(1e19)).unwrap(), Value::str(""));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(call("/", num(1.0), num(0.0)).unwrap_err().kind, ErrorKind::ZeroDivision);
        assert_eq!(call("%", num(1.0), num(0.0)).unwrap_err().kind, ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_non_numeric_operands_are_type_errors() {
        let err = call("-", Value::str("a"), num(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert!(err.message.contains("'str' and 'number'"));
        assert!(handle("print", &[]).is_none());
    }
}
