#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const TANGLE_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod error;
pub mod links;
pub mod markup;
pub mod navigation;
pub mod store;
pub mod turn;
pub mod vars;

// Loading, configuration and the interactive driver
pub mod command;
pub mod config;
pub mod data_paths;
pub mod loader;
pub mod repl;
pub mod style;

// Re-exports for convenience
pub use error::StoryError;
pub use links::{Link, extract_links};
pub use loader::load_story;
pub use markup::interpret;
pub use navigation::Navigator;
pub use repl::run_repl;
pub use store::{Passage, PassageStore};
pub use turn::{TurnController, TurnOutcome};
pub use vars::Variables;
