//! SSH client config model
//!
//! Decodes `~/.ssh/config` text into host blocks, lets callers edit
//! `Key value` lines in place, and writes the text back out.

mod document;
mod error;
mod parser;
mod pattern;

pub use document::{Comment, Document, HostBlock, KeyValue, Node};
pub use error::ParseError;
pub use parser::decode;
pub use pattern::Pattern;
