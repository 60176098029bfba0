//! Signature-based format sniffing and a paged, bounds-checked edit model
//! over a memory-mapped file, with a crossterm front end.

pub mod byte_buffer;
pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod export;
pub mod hex_view;
pub mod keymap;
pub mod logging;
pub mod magic;
pub mod modes;

pub use byte_buffer::ByteBuffer;
pub use config::Config;
pub use cursor::{Direction, NavigationCursor, PageGeometry};
pub use document::{Command, Document, Transition};
pub use error::{Error, Result};
pub use magic::{sniff, DetectionResult, Signature};
