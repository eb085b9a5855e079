// File: src/errors.rs
//
// Error handling and reporting for the Pithon interpreter.
// Provides one structured error type shared by the front end and the
// evaluator, with optional source location and pretty-printed messages.

use colored::Colorize;
use std::fmt;

/// Result alias used throughout the crate
pub type PithonResult<T> = Result<T, PithonError>;

/// Source location information for tracking where code appears in a file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub file: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, file: None }
    }

    pub fn with_file(line: usize, column: usize, file: String) -> Self {
        Self { line, column, file: Some(file) }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Kinds of errors that can abort an evaluation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source text could not be turned into a syntax tree
    ParseError,
    /// Name not found anywhere in the frame chain
    UnboundName,
    /// Operand or argument of the wrong kind
    TypeError,
    /// Too few or too many arguments
    ArityError,
    /// `/` or `%` by numeric zero
    ZeroDivision,
    /// Subscript outside the collection's bounds
    IndexError,
    /// Missing or unsupported attribute on an object or class
    AttributeError,
    /// `break`/`continue`/`return` escaping its legal scope
    StructuralControl,
    /// Call depth exceeded the configured limit
    RecursionError,
    /// A result too large to build, or a number with no integer value
    OverflowError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::ParseError => write!(f, "SyntaxError"),
            ErrorKind::UnboundName => write!(f, "NameError"),
            ErrorKind::TypeError => write!(f, "TypeError"),
            ErrorKind::ArityError => write!(f, "ArityError"),
            ErrorKind::ZeroDivision => write!(f, "ZeroDivisionError"),
            ErrorKind::IndexError => write!(f, "IndexError"),
            ErrorKind::AttributeError => write!(f, "AttributeError"),
            ErrorKind::StructuralControl => write!(f, "StructuralControlError"),
            ErrorKind::RecursionError => write!(f, "RecursionError"),
            ErrorKind::OverflowError => write!(f, "OverflowError"),
        }
    }
}

/// A structured error with optional location information
#[derive(Debug, Clone)]
pub struct PithonError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub source_line: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
}

impl PithonError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            source_line: None,
            suggestion: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a parse error at the given position
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(ErrorKind::ParseError, message).with_location(SourceLocation::new(line, column))
    }

    /// Create an unbound name error
    pub fn unbound_name(name: &str) -> Self {
        Self::new(ErrorKind::UnboundName, format!("name '{}' is not defined", name))
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn arity_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArityError, message)
    }

    pub fn zero_division(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ZeroDivision, message)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeError, message)
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralControl, message)
    }

    /// Attaches the file name and the offending source line when the error
    /// carries a location
    pub fn with_source_context(mut self, source: &str, file: Option<&str>) -> Self {
        if let Some(location) = self.location.as_mut() {
            if let Some(file) = file {
                location.file = Some(file.to_string());
            }
            if self.source_line.is_none() {
                self.source_line =
                    source.lines().nth(location.line.saturating_sub(1)).map(str::to_string);
            }
        }
        self
    }

    /// Plain one-line description without colors, for transcripts and logs
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind, self.message)
    }
}

impl fmt::Display for PithonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Error header with kind and message
        let kind_str = format!("{}", self.kind);
        writeln!(f, "{}: {}", kind_str.red().bold(), self.message.bold())?;

        if let Some(ref location) = self.location {
            let location_str = format!("  --> {}", location);
            writeln!(f, "{}", location_str.bright_blue())?;

            // Source code context
            if let Some(ref source) = self.source_line {
                writeln!(f, "   {}", "|".bright_blue())?;
                writeln!(
                    f,
                    "{} {} {}",
                    format!("{:3}", location.line).bright_blue(),
                    "|".bright_blue(),
                    source
                )?;
                writeln!(
                    f,
                    "   {} {}{}",
                    "|".bright_blue(),
                    " ".repeat(location.column.saturating_sub(1)),
                    "^".red().bold()
                )?;
                writeln!(f, "   {}", "|".bright_blue())?;
            }
        }

        if let Some(ref help) = self.help {
            writeln!(
                f,
                "   {} {}",
                "=".bright_yellow(),
                format!("help: {}", help).bright_yellow()
            )?;
        }

        if let Some(ref suggestion) = self.suggestion {
            writeln!(
                f,
                "   {} {}",
                "=".bright_green(),
                format!("Did you mean '{}'?", suggestion).bright_green()
            )?;
        }

        Ok(())
    }
}

impl std::error::Error for PithonError {}

/// Computes the Levenshtein distance between two strings
/// Used for "Did you mean?" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Single-row dynamic programming table
    let mut previous: Vec<usize> = (0..=len2).collect();
    let mut current = vec![0; len2 + 1];

    for i in 1..=len1 {
        current[0] = i;
        for j in 1..=len2 {
            let cost = usize::from(s1_chars[i - 1] != s2_chars[j - 1]);
            current[j] = (previous[j] + 1)
                .min(current[j - 1] + 1)
                .min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[len2]
}

/// Find the closest match from a list of candidates using Levenshtein distance
/// Returns None if no good match is found (distance > 3)
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let distance = levenshtein_distance(target, candidate);
        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("print", "print"), 0);
        assert_eq!(levenshtein_distance("rnage", "range"), 2);
    }

    #[test]
    fn test_find_closest_match_prefers_nearest() {
        let candidates = vec!["print".to_string(), "range".to_string(), "str".to_string()];
        assert_eq!(find_closest_match("prnt", &candidates), Some("print"));
        assert_eq!(find_closest_match("rang", &candidates), Some("range"));
        assert_eq!(find_closest_match("completely_different", &candidates), None);
    }

    #[test]
    fn test_describe_is_plain_text() {
        let err = PithonError::zero_division("division by zero");
        assert_eq!(err.describe(), "ZeroDivisionError: division by zero");
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_parse_error_carries_location() {
        let err = PithonError::parse_error("unexpected token", 3, 7);
        let location = err.location.clone().expect("parse errors have a location");
        assert_eq!(location.line, 3);
        assert_eq!(location.column, 7);
        assert_eq!(format!("{}", location), "3:7");
    }

    #[test]
    fn test_source_context_attaches_file_and_line() {
        let source = "x = 1\ny = (2\n";
        let err = PithonError::parse_error("expected ','", 2, 7).with_source_context(source, Some("demo.py"));
        assert_eq!(err.source_line.as_deref(), Some("y = (2"));
        assert_eq!(err.location, Some(SourceLocation::with_file(2, 7, "demo.py".to_string())));

        // Errors without a location are left alone
        let err = PithonError::type_error("bad").with_source_context(source, Some("demo.py"));
        assert!(err.source_line.is_none());
    }
}
