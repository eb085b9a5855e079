// File: src/interpreter/native_functions/io.rs
//
// I/O-related primitives (print)

use super::expect_arity;
use crate::errors::PithonResult;
use crate::interpreter::{Interpreter, Value};

/// Handle I/O-related primitive calls
/// Returns Some(result) if the name was handled, None if not recognized
pub fn handle(
    interp: &mut Interpreter,
    name: &str,
    arg_values: &[Value],
) -> Option<PithonResult<Value>> {
    let result = match name {
        "print" => expect_arity(name, arg_values, 1).map(|()| {
            // Strings print raw; everything else prints its display form
            interp.write_output(&arg_values[0].to_string());
            Value::None
        }),
        _ => return None,
    };
    Some(result)
}
