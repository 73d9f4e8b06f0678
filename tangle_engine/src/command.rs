//! Command module
//!
//! Describes the commands a player can type at the story prompt.
use variantly::Variantly;

#[derive(Debug, Clone, PartialEq, Eq, Variantly)]
pub enum Command {
    /// Follow the numbered choice.
    Choose(usize),
    Help,
    /// Show the current passage name and every story variable.
    Inspect,
    Quit,
    Unknown(String),
}

/// Parses an input line into a `Command`. Any whole number is a choice; range
/// checking is left to the turn controller.
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        return Command::Choose(number);
    }
    match trimmed.to_lowercase().as_str() {
        "v" | "vars" | "variables" => Command::Inspect,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
