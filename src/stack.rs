// File: src/stack.rs
//
// Stack growth for the recursive parts of the interpreter.
// Parsing and evaluation recurse once per nesting level and once per
// user-function call, so deep programs would otherwise overflow the host
// stack long before the call-depth limit is reached.

/// Grows the stack if less than 256KB remains, in 2MB segments
pub fn ensure_sufficient_stack<R, F: FnOnce() -> R>(f: F) -> R {
    stacker::maybe_grow(256 * 1024, 2 * 1024 * 1024, f)
}
