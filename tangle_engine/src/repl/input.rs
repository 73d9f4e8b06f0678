//! Terminal input handling for the story prompt.
//!
//! Wraps rustyline configuration and completion of the prompt's command
//! words, with a plain stdin fallback for pipes and non-interactive use.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Outcome of reading a line from the prompt.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

const COMMAND_TERMS: &[&str] = &["exit", "help", "quit", "variables", "vars"];

type PromptEditor = rustyline::Editor<TangleHelper, DefaultHistory>;

#[derive(Default)]
struct TangleHelper;

impl Helper for TangleHelper {}

impl Completer for TangleHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_prefix(line, pos);
        Ok((start, command_completions(&prefix)))
    }
}

impl Hinter for TangleHelper {
    type Hint = String;
}

impl Highlighter for TangleHelper {}

impl Validator for TangleHelper {}

fn current_prefix(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let trimmed = slice.trim_start_matches(char::is_whitespace);
    let start = pos - trimmed.len();
    (start, trimmed.to_string())
}

fn command_completions(prefix: &str) -> Vec<Pair> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let lower = prefix.to_lowercase();
    COMMAND_TERMS
        .iter()
        .filter(|term| term.starts_with(&lower))
        .map(|term| Pair {
            display: (*term).to_string(),
            replacement: (*term).to_string(),
        })
        .collect()
}

/// Where prompt lines come from: a line editor on a terminal, or plain stdin.
///
/// If the editor fails mid-session the source drops to stdin and the read is
/// retried once.
pub enum LineSource {
    Editor(Box<EditorSource>),
    Stdin,
}

impl LineSource {
    pub fn open(keep_history: bool) -> Self {
        if !io::stdin().is_terminal() {
            info!("stdin is not a terminal, reading plain lines");
            return LineSource::Stdin;
        }
        match EditorSource::open(keep_history) {
            Ok(editor) => LineSource::Editor(Box::new(editor)),
            Err(err) => {
                warn!("line editor unavailable ({err}), reading plain lines");
                LineSource::Stdin
            },
        }
    }

    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let LineSource::Editor(editor) = self else {
            return read_stdin_line(prompt);
        };
        match editor.read_line(prompt) {
            Err(err) => {
                warn!("line editor failed: {err}; reading plain lines from now on");
                *self = LineSource::Stdin;
                read_stdin_line(prompt)
            },
            event => event,
        }
    }
}

pub struct EditorSource {
    editor: PromptEditor,
    history: Option<PathBuf>,
}

impl EditorSource {
    fn open(keep_history: bool) -> io::Result<Self> {
        let mut editor = PromptEditor::new().map_err(into_io_error)?;
        editor.set_helper(Some(TangleHelper));
        let history = keep_history.then(history_file_path).flatten();
        if let Some(path) = &history {
            restore_history(&mut editor, path);
        }
        Ok(Self { editor, history })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        let line = match self.editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => return Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => return Ok(InputEvent::Eof),
            Err(err) => return Err(into_io_error(err)),
        };
        if !line.trim().is_empty() {
            self.remember(&line);
        }
        Ok(InputEvent::Line(line))
    }

    fn remember(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            warn!("could not add history entry: {err}");
        }
        if let Some(path) = &self.history
            && let Err(err) = self.editor.save_history(path)
        {
            warn!("could not save history to {}: {err}", path.display());
        }
    }
}

fn restore_history(editor: &mut PromptEditor, path: &Path) {
    if let Some(dir) = path.parent()
        && let Err(err) = fs::create_dir_all(dir)
    {
        warn!("could not create history directory {}: {err}", dir.display());
    }
    match editor.load_history(path) {
        Ok(()) => info!("history restored from {}", path.display()),
        Err(ReadlineError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {},
        Err(err) => warn!("could not load history from {}: {err}", path.display()),
    }
}

fn read_stdin_line(prompt: &str) -> io::Result<InputEvent> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buffer = String::new();
    if io::stdin().read_line(&mut buffer)? == 0 {
        return Ok(InputEvent::Eof);
    }
    Ok(InputEvent::Line(trim_line_ending(&buffer).to_string()))
}

fn trim_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest))
}

fn into_io_error(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(err) => err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    let mut path = base.to_path_buf();
    path.push("tangle_engine");
    path.push("history.txt");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_lose_their_line_ending() {
        assert_eq!(trim_line_ending("2\n"), "2");
        assert_eq!(trim_line_ending("quit\r\n"), "quit");
        assert_eq!(trim_line_ending("no newline"), "no newline");
        assert_eq!(trim_line_ending("a\r"), "a\r");
    }

    #[test]
    fn editor_errors_become_io_errors() {
        let err = into_io_error(ReadlineError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "gone")));
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn history_path_appends_components() {
        let base = PathBuf::from("/tmp/tangle-test");
        let path = build_history_path(&base);
        assert!(path.ends_with(Path::new("tangle_engine/history.txt")));
    }

    #[test]
    fn completes_command_words_by_prefix() {
        let names: Vec<_> = command_completions("VA").into_iter().map(|p| p.replacement).collect();
        assert_eq!(names, ["variables", "vars"]);
        assert!(command_completions("").is_empty());
    }

    #[test]
    fn prefix_skips_leading_whitespace() {
        assert_eq!(current_prefix("  qu", 4), (2, "qu".to_string()));
    }
}
