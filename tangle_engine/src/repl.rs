//! Interactive read loop for a human player.
//!
//! Each pass shows the current passage with numbered choices, reads one
//! command, and hands choices to the [`TurnController`].

mod input;

use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};

use crate::command::{Command, parse_command};
use crate::config::EngineConfig;
use crate::error::StoryError;
use crate::navigation::Navigator;
use crate::style::{GameStyle, wrap_lines};
use crate::turn::{TurnController, choice_lines, parse_choice};

use input::{InputEvent, LineSource};

/// Play until the story ends or the player quits.
///
/// Story errors from a turn are shown and the player is prompted again; the
/// play-through is unchanged by a failed turn.
///
/// # Errors
/// - if the first passage cannot be rendered
/// - if reading from the terminal fails
pub fn run_repl(turns: &mut TurnController, config: &EngineConfig) -> Result<()> {
    let width = config.wrap_width;
    let mut input = LineSource::open(config.history);

    let mut outcome = turns.advance(None).context("while rendering the first passage")?;
    show_passage(turns.navigator(), width);

    while !outcome.is_ended() {
        let prompt = format!("\n[{}]> ", turns.navigator().current_name())
            .prompt_style()
            .to_string();
        let line = match input.read_line(&prompt).context("while reading player input")? {
            InputEvent::Line(line) => line,
            InputEvent::Eof => "quit".to_string(),
            InputEvent::Interrupted => {
                println!("{}", "Interrupted. Type 'quit' to leave the story.".italic());
                continue;
            },
        };

        match parse_command(&line) {
            Command::Choose(choice) => match turns.advance(Some(choice)) {
                Ok(next) => {
                    show_passage(turns.navigator(), width);
                    outcome = next;
                },
                Err(err) => show_error(&err),
            },
            Command::Inspect => show_inspection(turns.navigator()),
            Command::Help => show_help(),
            Command::Quit => {
                info!(
                    "player quit at passage '{}' after {} turns",
                    turns.navigator().current_name(),
                    turns.turn()
                );
                return Ok(());
            },
            Command::Unknown(text) if text.is_empty() => {},
            Command::Unknown(text) => {
                let available = turns.navigator().current_links().map_or(0, |links| links.len());
                if let Err(err) = parse_choice(&text, available) {
                    show_error(&err);
                }
            },
        }
    }

    println!("\n{}", "THE END".banner_style());
    Ok(())
}

fn show_passage(nav: &Navigator, width: usize) {
    println!("{}", "-".repeat(width).prompt_style());
    println!("{}", wrap_lines(&nav.current_text(), width).passage_style());
    match nav.current_links() {
        Ok(links) => {
            for line in choice_lines(&links) {
                println!("{}", line.choice_style());
            }
        },
        Err(err) => show_error(&err),
    }
}

fn show_error(err: &StoryError) {
    warn!("turn rejected: {err}");
    println!("{}", err.to_string().error_style());
}

fn show_inspection(nav: &Navigator) {
    println!("passage: {}", nav.current_name().bold());
    if nav.variables().is_empty() {
        println!("{}", "(no variables set)".italic());
    }
    for (name, value) in nav.variables().iter() {
        println!("  ${} = {}", name.variable_style(), value);
    }
}

fn show_help() {
    println!("{}", "Commands:".underline());
    println!("  {}  follow that choice", "<number>".choice_style());
    println!("  {}  show the passage name and story variables", "v, vars".choice_style());
    println!("  {}  show this help", "h, help".choice_style());
    println!("  {}  leave the story", "q, quit".choice_style());
}
