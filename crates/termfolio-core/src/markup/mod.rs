//! HTML fragment handling
//!
//! - `token` - print directives produced from markup
//! - `tokenizer` - lossless fragment tokenizer
//! - `tag` - attribute parsing for a single tag literal
//! - `entities` - character reference decoding for display

pub mod entities;
pub mod tag;
pub mod token;
pub mod tokenizer;

pub use tag::TagInfo;
pub use token::{render, Token};
pub use tokenizer::{tokenize, tokenize_page};
