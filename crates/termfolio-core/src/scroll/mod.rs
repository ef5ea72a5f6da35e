//! Bounded smooth scrolling toward a command
//!
//! ## Atoms
//! - `config` - step, margin and frame rate
//! - `cancel` - cooperative cancellation flag
//! - `viewport` - what the controller needs to measure and move
//!
//! ## Controller
//! - `controller` - one owned scroll run advanced frame by frame
//!
//! # Usage
//!
//! ```ignore
//! let mut scroll = ScrollController::new(ScrollConfig::from(&config.timing));
//!
//! // When a section opens
//! scroll.scroll_to(&doc, Some(section), &viewport, now);
//!
//! // Once per loop iteration
//! scroll.tick(&mut viewport, now);
//!
//! // On user wheel/keys
//! scroll.cancel();
//! ```

pub mod cancel;
pub mod config;
pub mod controller;
pub mod viewport;

pub use cancel::CancelToken;
pub use config::ScrollConfig;
pub use controller::{FrameOutcome, ScrollController, ScrollRun};
pub use viewport::Viewport;
