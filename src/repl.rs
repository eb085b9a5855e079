// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the Pithon programming language.
// Provides an interactive shell for executing Pithon code with features like:
// - Multi-line input for blocks (a line ending in ':' opens one, a blank line
//   closes it) and for unclosed brackets
// - Command history with up/down arrow navigation
// - Special commands (:help, :clear, :quit, :vars, :reset)
// - Persistent state across inputs
// - Echo of expression values, suppressed for none and for bindings

use crate::errors::PithonError;
use crate::interpreter::{Interpreter, InterpreterConfig, Value, PRIMITIVE_ALIASES, PRIMITIVE_NAMES};
use crate::parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new(config: InterpreterConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { interpreter: Interpreter::with_config(config), editor })
    }

    /// Displays the welcome banner with version and help information
    fn show_banner(&self) {
        println!("{}", "╔══════════════════════════════════════════════════════╗".bright_cyan());
        println!(
            "{}",
            format!("║        Pithon REPL v{:<8} - Interactive Shell      ║", env!("CARGO_PKG_VERSION"))
                .bright_cyan()
        );
        println!("{}", "╚══════════════════════════════════════════════════════╝".bright_cyan());
        println!();
        println!(
            "  {} Use {}{}{}{}",
            "Welcome!".bright_green(),
            ":".bright_blue(),
            "help".bright_yellow(),
            " for commands or ".bright_blue(),
            ":quit".bright_yellow()
        );
        println!("  {} End a block with an empty line", "Tip:".bright_magenta());
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                ">>> ".bright_green().to_string()
            } else {
                "... ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    // Special commands are only recognised outside a block
                    if buffer.is_empty() && line.trim().starts_with(':') {
                        if self.handle_command(line.trim()) {
                            continue;
                        } else {
                            break;
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if is_input_complete(&buffer) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (Ctrl+C to interrupt, :quit to exit)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "\nGoodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'
    /// Returns true to continue REPL, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => {
                self.show_help();
                true
            }
            ":quit" | ":q" | ":exit" => {
                println!("{}", "Goodbye!".bright_cyan());
                false
            }
            ":clear" | ":c" => {
                print!("\x1B[2J\x1B[1;1H");
                self.show_banner();
                true
            }
            ":vars" | ":v" => {
                self.show_variables();
                true
            }
            ":reset" | ":r" => {
                self.interpreter.reset();
                println!("{}", "✓ Environment reset".bright_green());
                true
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {}{}{}",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":".bright_blue(),
                    "help".bright_yellow(),
                    " for available commands.".bright_blue()
                );
                true
            }
        }
    }

    /// Displays help information about available commands
    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        println!();
        println!("  {}{}  Display this help message", ":help".bright_yellow(), " or :h     ".dimmed());
        println!("  {}{}  Exit the REPL", ":quit".bright_yellow(), " or :q     ".dimmed());
        println!("  {}{}  Clear the screen", ":clear".bright_yellow(), " or :c    ".dimmed());
        println!("  {}{}  Show defined variables", ":vars".bright_yellow(), " or :v    ".dimmed());
        println!("  {}{}  Reset environment", ":reset".bright_yellow(), " or :r   ".dimmed());
        println!();
        println!("{}", "Multi-line Input:".bright_cyan().bold());
        println!();
        println!("  A line ending in ':' starts a block; enter an empty line to run it.");
        println!("  Unclosed brackets also continue on the next line.");
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!();
        println!("  {}", ">>> x = 42".dimmed());
        println!("  {}", ">>> def greet(name):".dimmed());
        println!("  {}", "...     print(\"Hello, \" + name)".dimmed());
        println!("  {}", "...".dimmed());
        println!("  {}", ">>> greet(\"World\")".dimmed());
        println!();
    }

    /// Displays the user bindings of the global frame
    fn show_variables(&self) {
        println!();
        println!("{}", "Defined Variables:".bright_cyan().bold());
        println!();

        let user_bindings: Vec<(String, Value)> = self
            .interpreter
            .globals()
            .local_bindings()
            .into_iter()
            .filter(|(name, value)| !is_primitive_binding(name, value))
            .collect();

        if user_bindings.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for (name, value) in user_bindings {
            println!("  {} = {}", name.bright_yellow(), value.repr());
        }
        println!();
    }

    /// Evaluates the input code and displays the result
    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let program = match parser::parse(input) {
            Ok(program) => program,
            Err(err) => {
                self.print_error(err.with_source_context(input, None));
                return;
            }
        };

        let echo = program.last().map_or(false, |node| !node.is_binding());
        match self.interpreter.eval_program(&program) {
            Ok(value) if echo && !value.is_none() => self.print_value(&value),
            Ok(_) => {}
            Err(err) => self.print_error(err),
        }
    }

    fn print_value(&self, value: &Value) {
        println!("{} {}", "=>".bright_blue(), value.repr().bright_white());
    }

    fn print_error(&self, err: PithonError) {
        print!("{}", err);
    }
}

/// Whether `name` still holds the primitive installed under it
fn is_primitive_binding(name: &str, value: &Value) -> bool {
    let installed = PRIMITIVE_NAMES
        .iter()
        .find(|primitive| **primitive == name)
        .copied()
        .or_else(|| PRIMITIVE_ALIASES.iter().find(|(alias, _)| *alias == name).map(|(_, p)| *p));
    matches!((installed, value), (Some(expected), Value::NativeFunction(actual)) if expected == *actual)
}

/// Checks whether buffered input is ready to run.
///
/// Input is incomplete while a bracket is open. A block opened
/// by a line ending in ':' stays open until an empty line is entered.
pub fn is_input_complete(input: &str) -> bool {
    if input.trim().is_empty() {
        return true;
    }

    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut escape_next = false;
    let mut in_comment = false;

    for ch in input.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        if escape_next {
            escape_next = false;
            continue;
        }
        match (quote, ch) {
            (Some(_), '\\') => escape_next = true,
            // String literals never span lines
            (Some(_), '\n') => quote = None,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '#') => in_comment = true,
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth -= 1,
            _ => {}
        }
    }
    if quote.is_some() || depth > 0 {
        return false;
    }

    let lines: Vec<&str> = input.lines().collect();
    let opens_block = lines.iter().any(|line| strip_comment(line).trim_end().ends_with(':'));
    if !opens_block {
        return true;
    }
    lines.last().map_or(true, |last| last.trim().is_empty())
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) if !line[..index].contains(['"', '\'']) => &line[..index],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_is_complete() {
        assert!(is_input_complete("x = 1\n"));
        assert!(is_input_complete("print('a:')\n"));
        assert!(is_input_complete("\n"));
    }

    #[test]
    fn test_block_waits_for_blank_line() {
        assert!(!is_input_complete("def f():\n"));
        assert!(!is_input_complete("def f():\n    return 1\n"));
        assert!(is_input_complete("def f():\n    return 1\n\n"));
        assert!(!is_input_complete("while x:  # loop\n"));
    }

    #[test]
    fn test_open_brackets_and_strings_continue() {
        assert!(!is_input_complete("f(1,\n"));
        assert!(is_input_complete("f(1,\n  2)\n"));
        // An unterminated string is handed to the parser to report
        assert!(is_input_complete("x = 'abc\n"));
    }

    #[test]
    fn test_primitive_bindings_are_recognised() {
        assert!(is_primitive_binding("print", &Value::NativeFunction("print")));
        assert!(is_primitive_binding("add", &Value::NativeFunction("+")));
        assert!(!is_primitive_binding("print", &Value::Number(1.0)));
        assert!(!is_primitive_binding("p", &Value::NativeFunction("print")));
    }
}
