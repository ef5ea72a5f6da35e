//! Character-by-character typing of page content
//!
//! - `timer` - virtual deadlines shared by every stepped animation
//! - `engine` - replays one token sequence through a caret
//! - `orchestrator` - types the elements of a container in sequence

pub mod engine;
pub mod orchestrator;
pub mod timer;

pub use engine::{Step, TypingRun};
pub use orchestrator::{is_eligible, Orchestrator, BUTTON_ROW_CLASS, SHOW_CLASS};
pub use timer::Pacer;
