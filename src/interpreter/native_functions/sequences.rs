// File: src/interpreter/native_functions/sequences.rs
//
// Sequence and conversion primitives (range, str)

use super::{checked_length, expect_arity, expect_number};
use crate::errors::{ErrorKind, PithonError, PithonResult};
use crate::interpreter::Value;

/// Handle sequence primitive calls
/// Returns Some(result) if the name was handled, None if not recognized
pub fn handle(name: &str, arg_values: &[Value]) -> Option<PithonResult<Value>> {
    let result = match name {
        "range" => range(arg_values),
        "str" => to_str(arg_values),
        _ => return None,
    };
    Some(result)
}

/// `range(end)` or `range(start, end)`: the numbers start, start+1, ... below end.
/// Bounds are truncated toward zero.
fn range(args: &[Value]) -> PithonResult<Value> {
    let (start, end) = match args {
        [end] => (0.0, expect_number("range", end)?),
        [start, end] => (expect_number("range", start)?, expect_number("range", end)?),
        _ => {
            return Err(PithonError::arity_error(format!(
                "range() takes 1 or 2 arguments ({} given)",
                args.len()
            )))
        }
    };
    let (start, end) = (range_bound(start)?, range_bound(end)?);

    let len = usize::try_from(end.saturating_sub(start)).unwrap_or(0);
    checked_length("range", len, 1)?;
    Ok(Value::list((start..end).map(|i| Value::Number(i as f64)).collect()))
}

/// Truncates a bound to an integer. Bounds must be finite.
fn range_bound(n: f64) -> PithonResult<i64> {
    if !n.is_finite() {
        return Err(PithonError::new(
            ErrorKind::OverflowError,
            format!("range() bound {} has no integer value", Value::Number(n)),
        ));
    }
    Ok(n.trunc() as i64)
}

/// Converts a plain value to its display string. Callables, classes and
/// objects have no string conversion.
fn to_str(args: &[Value]) -> PithonResult<Value> {
    expect_arity("str", args, 1)?;
    match &args[0] {
        value @ Value::Str(_) => Ok(value.clone()),
        value @ (Value::Number(_)
        | Value::Bool(_)
        | Value::None
        | Value::List(_)
        | Value::Tuple(_)) => Ok(Value::str(&value.to_string())),
        other => Err(PithonError::type_error(format!(
            "str() cannot convert a value of type '{}'",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Value {
        Value::list(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(range(&[Value::Number(3.0)]).unwrap(), numbers(&[0.0, 1.0, 2.0]));
        assert_eq!(range(&[Value::Number(2.0), Value::Number(5.0)]).unwrap(), numbers(&[2.0, 3.0, 4.0]));
        assert_eq!(range(&[Value::Number(-2.0)]).unwrap(), numbers(&[]));
        assert_eq!(range(&[Value::Number(2.7)]).unwrap(), numbers(&[0.0, 1.0]));
    }

    #[test]
    fn test_range_errors() {
        assert_eq!(range(&[]).unwrap_err().kind, ErrorKind::ArityError);
        assert_eq!(range(&[Value::str("3")]).unwrap_err().kind, ErrorKind::TypeError);
        assert_eq!(range(&[Value::Number(f64::INFINITY)]).unwrap_err().kind, ErrorKind::OverflowError);
        assert_eq!(range(&[Value::Number(f64::NAN)]).unwrap_err().kind, ErrorKind::OverflowError);
        assert_eq!(range(&[Value::Number(1e18)]).unwrap_err().kind, ErrorKind::OverflowError);
    }

    #[test]
    fn test_range_beyond_exact_float_integers() {
        let start = 9007199254740992.0;
        let result = range(&[Value::Number(start), Value::Number(start + 2.0)]).unwrap();
        match result {
            Value::List(items) => assert_eq!(items.len(), 2),
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_str_conversion() {
        let convert = |v: Value| handle("str", &[v]).unwrap();
        assert_eq!(convert(Value::Number(3.0)).unwrap(), Value::str("3"));
        assert_eq!(convert(Value::Number(0.5)).unwrap(), Value::str("0.5"));
        assert_eq!(convert(Value::Bool(false)).unwrap(), Value::str("False"));
        assert_eq!(convert(Value::None).unwrap(), Value::str("None"));
        assert_eq!(convert(Value::str("x")).unwrap(), Value::str("x"));
        assert_eq!(convert(numbers(&[1.0])).unwrap(), Value::str("[1]"));
        assert_eq!(
            convert(Value::NativeFunction("print")).unwrap_err().kind,
            ErrorKind::TypeError
        );
    }
}
