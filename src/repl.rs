// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the SimPL language.
// Provides an interactive shell with:
// - Multi-line input while braces or parentheses are left open
// - Command history with up/down arrow navigation
// - Special commands (:help, :clear, :quit, :vars, :reset)
// - Variables that persist across inputs
//
// Unlike a script run, an error here is reported and the session continues.

use crate::ast::Stmt;
use crate::diagnostics::Reporter;
use crate::errors::RunError;
use crate::interpreter::{format_number, Interpreter, InterpreterOptions};
use crate::lexer;
use crate::parser::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
    reporter: Reporter,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new(options: InterpreterOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        Ok(Repl {
            interpreter: Interpreter::with_options(options),
            editor,
            reporter: Reporter::new(false),
        })
    }

    fn show_banner(&self) {
        let title = format!("SimPL REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("{}", title.bright_cyan().bold());
        println!(
            "  Use {} for commands or {} to exit",
            ":help".bright_yellow(),
            ":quit".bright_yellow()
        );
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                "simpl> ".bright_green().to_string()
            } else {
                "....> ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());

                    // Commands are only recognized outside multi-line input
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
                    println!("{}", "^C (:quit to exit)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'
    /// Returns true to continue REPL, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => self.show_help(),
            ":quit" | ":q" | ":exit" => {
                println!("{}", "Goodbye!".bright_cyan());
                return false;
            }
            ":clear" | ":c" => {
                print!("\x1B[2J\x1B[1;1H");
                self.show_banner();
            }
            ":vars" | ":v" => self.show_variables(),
            ":reset" | ":r" => {
                self.interpreter.reset();
                println!("{}", "✓ Environment reset".bright_green());
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {} for available commands.",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":help".bright_yellow()
                );
            }
        }
        true
    }

    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        let commands = [
            (":help  / :h", "Show this help message"),
            (":quit  / :q", "Exit the REPL"),
            (":clear / :c", "Clear the screen"),
            (":vars  / :v", "Show defined variables"),
            (":reset / :r", "Forget all variables"),
        ];
        for (command, description) in commands {
            println!("  {}  {}", command.bright_yellow(), description);
        }
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!("  {}", "simpl> let x = 42;".dimmed());
        println!("  {}", "simpl> x * 2;".dimmed());
        println!("  {}", "=> 84".dimmed());
        println!();
    }

    fn show_variables(&self) {
        let variables = self.interpreter.variables();
        if variables.is_empty() {
            println!("  {}", "(no variables defined)".dimmed());
            return;
        }
        for (name, value) in variables {
            let shown = format_number(value);
            println!("  {} = {}", name.bright_yellow(), shown.bright_white());
        }
    }

    /// Parses and runs one complete input, echoing the value of bare expressions
    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let mut parser = Parser::new(lexer::tokenize(input));
        let stmts = parser.parse();
        if parser.has_errors() {
            self.reporter.run_error(&RunError::Syntax(parser.take_errors()));
            return;
        }

        for stmt in &stmts {
            let result = match stmt {
                Stmt::Expression(expr) => self.interpreter.evaluate(expr).map(echo_value),
                _ => self.interpreter.interpret(std::slice::from_ref(stmt)),
            };
            if let Err(error) = result {
                self.reporter.runtime_error(&error);
                break;
            }
        }
    }
}

fn echo_value(value: f64) {
    let shown = format_number(value);
    println!("{} {}", "=>".bright_blue(), shown.bright_white());
}

/// Checks if the input is syntactically complete: braces and parentheses
/// balanced, and no string or char literal left open
pub fn is_input_complete(input: &str) -> bool {
    let mut brace_count = 0i32;
    let mut paren_count = 0i32;
    let mut open_quote: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        // Inside a literal only the matching quote matters
        if let Some(quote) = open_quote {
            if ch == quote {
                open_quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => open_quote = Some(ch),
            '/' if chars.peek() == Some(&'/') => {
                // Skip the comment up to the newline
                while chars.peek().map_or(false, |&c| c != '\n') {
                    chars.next();
                }
            }
            '{' => brace_count += 1,
            '}' => brace_count -= 1,
            '(' => paren_count += 1,
            ')' => paren_count -= 1,
            _ => {}
        }
    }

    open_quote.is_none() && brace_count <= 0 && paren_count <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_brace_needs_more_input() {
        assert!(!is_input_complete("if (x) {\n"));
        assert!(is_input_complete("if (x) {\n print x;\n}\n"));
    }

    #[test]
    fn test_braces_inside_strings_and_comments_are_ignored() {
        assert!(is_input_complete("\"{\";\n"));
        assert!(is_input_complete("print 1; // {\n"));
        assert!(!is_input_complete("\"unterminated\n"));
    }

    #[test]
    fn test_char_literals_hide_braces_and_quotes() {
        assert!(is_input_complete("print '{';\n"));
        assert!(is_input_complete("print '(';\n"));
        assert!(is_input_complete("print '\"';\n"));
        assert!(is_input_complete("print \"it's\";\n"));
        assert!(!is_input_complete("print 'x\n"));
    }
}
