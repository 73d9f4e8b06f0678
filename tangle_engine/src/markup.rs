//! Passage markup interpreter.
//!
//! Passages are authored in a small Harlowe-like markup. Interpreting a passage
//! decides its conditional branches, runs its assignments against the
//! play-through's [`Variables`], flattens decorative macros, and returns the
//! text that remains. Link markup is left in place for [`crate::links`].
//!
//! # Syntax
//! - `(if: $name is value)[...]` shows its body when the variable equals
//!   `value`, ignoring case. Unset variables are empty strings.
//! - `(else:)[...]` shows its body when the preceding `if` did not.
//! - `(set: $name = value)` assigns only while the most recent `if` held (or
//!   the most recent `else` did). Closing a body does not reset this.
//! - `(text-colour: ...)[...]` and `(link: ...)[...]` collapse to their content.
//! - `(save-game: ...)` is removed.
//! - Any other `(word: ...)` macro is passed through as text.
//!
//! Bodies may nest. Brackets pair up for links, so a body opens with an odd
//! run of `[` and closes with an odd run of `]`: `(if: $x is y)[[[Go|room]]]`
//! is a body holding one link, and `[[label|destination]]` passes through
//! untouched.

use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::error::StoryError;
use crate::vars::Variables;

static TEXT_COLOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(text-colour: .+?\)\[(.*?)\]").expect("text-colour pattern is valid"));
static STYLED_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(link: .+?\)\[(.*?)\]").expect("link pattern is valid"));
static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("space pattern is valid"));
static PARAGRAPH_INDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n\s+").expect("paragraph pattern is valid"));
static SAVE_GAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(save-game:.+?\)").expect("save-game pattern is valid"));

static MACRO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([a-zA-Z0-9]+:.*?\)").expect("macro pattern is valid"));
static IF_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(if:\s*\$(\w+)\s*is\s*(\w+)\s*\)").expect("if pattern is valid"));
static SET_MACRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(set:\s*\$(\w+)\s*=\s*(\w+)\s*\)").expect("set pattern is valid"));

/// Interpret `raw` against `vars`, returning the rendered text.
///
/// `vars` is updated by every `(set:)` met in visible output, in textual order.
///
/// # Errors
/// Returns [`StoryError::MalformedMacro`] if an `if` or `set` macro does not have
/// the `$name is value` / `$name = value` shape. Assignments made before the
/// malformed macro are kept.
pub fn interpret(raw: &str, vars: &mut Variables) -> Result<String, StoryError> {
    let text = preprocess(raw);
    let mut interp = Interpreter::new(vars);
    for token in tokenize(&text) {
        match token {
            Token::Text(text) => interp.on_text(text),
            Token::Macro(token) => interp.on_macro(token)?,
            Token::Close => interp.on_close(),
        }
    }
    Ok(interp.finish())
}

/// Flatten decorative macros and normalize whitespace, before any macro runs.
pub fn preprocess(raw: &str) -> String {
    let text = TEXT_COLOUR.replace_all(raw, "${1}");
    let text = STYLED_LINK.replace_all(&text, "${1}");
    let text = join_single_newlines(&text);
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = PARAGRAPH_INDENT.replace_all(&text, "\n\n");
    SAVE_GAME.replace_all(&text, "").into_owned()
}

/// Turn each line break that does not touch another line break into a space.
fn join_single_newlines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            let after_newline = idx > 0 && bytes[idx - 1] == b'\n';
            let before_newline = bytes.get(idx + 1) == Some(&b'\n');
            if !after_newline && !before_newline {
                out.push(' ');
                continue;
            }
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    Macro(&'a str),
    /// The odd `]` of a bracket run, closing a body.
    Close,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for found in MACRO.find_iter(text) {
        split_closers(&text[last..found.start()], &mut tokens);
        tokens.push(Token::Macro(found.as_str()));
        last = found.end();
    }
    split_closers(&text[last..], &mut tokens);
    tokens
}

/// Split `segment` at body-closing brackets. In a run of `]`, pairs belong to
/// links and an odd one out closes a body, so `]` and `]]]` both close.
fn split_closers<'a>(segment: &'a str, tokens: &mut Vec<Token<'a>>) {
    let bytes = segment.as_bytes();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] != b']' {
            idx += 1;
            continue;
        }
        let run_start = idx;
        while idx < bytes.len() && bytes[idx] == b']' {
            idx += 1;
        }
        if (idx - run_start) % 2 == 1 {
            if start < idx - 1 {
                tokens.push(Token::Text(&segment[start..idx - 1]));
            }
            tokens.push(Token::Close);
            start = idx;
        }
    }
    if start < segment.len() {
        tokens.push(Token::Text(&segment[start..]));
    }
}

/// An open conditional body, tagged with whether its branch was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    If(bool),
    Else(bool),
}

impl Context {
    pub fn taken(self) -> bool {
        match self {
            Context::If(taken) | Context::Else(taken) => taken,
        }
    }
}

struct Interpreter<'v> {
    vars: &'v mut Variables,
    stack: Vec<Context>,
    /// Conditional macro waiting for its `[` body.
    pending: Option<Context>,
    /// Outcome of the most recently finished `if`, consulted by `else`.
    last_if: Option<bool>,
    /// Assignment gate: set by `if`, inverted by `else`, untouched by `]`.
    assign: bool,
    out: String,
}

impl<'v> Interpreter<'v> {
    fn new(vars: &'v mut Variables) -> Self {
        Self {
            vars,
            stack: Vec::new(),
            pending: None,
            last_if: None,
            assign: true,
            out: String::new(),
        }
    }

    fn visible(&self) -> bool {
        self.stack.iter().all(|ctx| ctx.taken())
    }

    fn emit(&mut self, text: &str) {
        if self.visible() {
            self.out.push_str(text);
        }
    }

    /// A conditional that never got a body still counts as finished.
    fn settle_pending(&mut self) {
        match self.pending.take() {
            Some(Context::If(taken)) => self.last_if = Some(taken),
            Some(Context::Else(_)) => self.last_if = None,
            None => {},
        }
    }

    fn on_text(&mut self, text: &str) {
        let opening = text.len() - text.trim_start_matches('[').len();
        if let Some(ctx) = self.pending
            && opening % 2 == 1
        {
            let body = &text[1..];
            self.pending = None;
            self.stack.push(ctx);
            self.emit(body);
            return;
        }
        self.settle_pending();
        self.emit(text);
    }

    fn on_macro(&mut self, token: &str) -> Result<(), StoryError> {
        self.settle_pending();
        if token.starts_with("(if:") {
            let caps = parse_macro(&IF_MACRO, "if", token)?;
            let taken = self.vars.matches(&caps[1], &caps[2]);
            debug!("{token} -> {taken}");
            self.assign = taken;
            self.pending = Some(Context::If(taken));
        } else if token.starts_with("(else:") {
            let taken = !self.last_if.unwrap_or(true);
            self.assign = !self.assign;
            self.pending = Some(Context::Else(taken));
        } else if token.starts_with("(set:") {
            let caps = parse_macro(&SET_MACRO, "set", token)?;
            if self.assign && self.visible() {
                self.vars.set(&caps[1], &caps[2]);
            } else {
                debug!("{token} skipped in hidden branch");
            }
        } else {
            self.emit(token);
        }
        Ok(())
    }

    fn on_close(&mut self) {
        self.settle_pending();
        match self.stack.pop() {
            Some(Context::If(taken)) => self.last_if = Some(taken),
            Some(Context::Else(_)) => self.last_if = None,
            None => self.emit("]"),
        }
    }

    fn finish(mut self) -> String {
        self.settle_pending();
        if !self.stack.is_empty() {
            debug!("{} conditional bodies left unclosed", self.stack.len());
        }
        self.out
    }
}

fn parse_macro<'t>(pattern: &Regex, kind: &'static str, token: &'t str) -> Result<Captures<'t>, StoryError> {
    pattern.captures(token).ok_or_else(|| StoryError::MalformedMacro {
        kind,
        token: token.to_string(),
    })
}
