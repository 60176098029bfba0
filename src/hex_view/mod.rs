//! Terminal rendering of a [`Document`](crate::document::Document) page and the event loop.

pub mod sink;
pub mod view;

pub use sink::{ClipFileSink, ExportSink};
pub use view::{HexView, Layout};
