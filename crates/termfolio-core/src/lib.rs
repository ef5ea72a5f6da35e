pub mod config;
pub mod document;
pub mod error;
pub mod markup;
pub mod page;
pub mod prompt;
pub mod scroll;
pub mod session;
pub mod toggle;
pub mod typing;

pub use config::AppConfig;
pub use document::{Document, NodeId};
pub use error::{Error, Result};
pub use page::{Command, Page};
pub use session::Session;
pub use toggle::{SectionState, ToggleController};
