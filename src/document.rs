use std::path::Path;

use tracing::{debug, info};
use xi_rope::Interval;

use crate::byte_buffer::ByteBuffer;
use crate::cursor::{Direction, NavigationCursor, PageGeometry};
use crate::error::{Error, Result};
use crate::export::export_range;
use crate::magic::{self, DetectionResult};
use crate::modes::{CommandInput, InputOutcome};

pub const NOP: u8 = 0x90;

/// Abstract commands, already translated from raw key and mouse events.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Command {
    HexDigit(char),
    Goto,
    Export(usize),
    Increment,
    Decrement,
    WriteNop,
    Move(Direction),
    JumpTo(usize),
    Confirm,
    Cancel,
    Quit,
    Other(char),
}

/// What the view has to do after a command.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Transition {
    None,
    /// Cursor or prompt changed; bytes are untouched.
    Redraw,
    /// Bytes in the interval changed.
    Dirty(Interval),
    Export(String),
    Info(String),
    Quit,
}

/// The single open file: its mapping, detected format, cursor and pending command.
pub struct Document {
    buffer: ByteBuffer,
    detection: DetectionResult<'static>,
    cursor: NavigationCursor,
    input: CommandInput,
}

impl Document {
    pub fn open(path: impl AsRef<Path>, geometry: PageGeometry) -> Result<Document> {
        let buffer = ByteBuffer::open(path)?;
        Ok(Document::with_buffer(buffer, geometry))
    }

    pub fn with_buffer(buffer: ByteBuffer, geometry: PageGeometry) -> Document {
        let detection = magic::sniff(buffer.as_slice());
        info!(
            path = %buffer.path().display(),
            format = detection.label(),
            has_footer = detection.has_footer,
            "opened document"
        );
        Document {
            buffer,
            detection,
            cursor: NavigationCursor::new(geometry),
            input: CommandInput::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.buffer.path()
    }

    pub fn detection(&self) -> &DetectionResult<'static> {
        &self.detection
    }

    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor.absolute()
    }

    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    pub fn is_read_only(&self) -> bool {
        self.buffer.is_read_only()
    }

    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.buffer.get(offset).ok()
    }

    /// Bytes of the page the cursor is on; shorter than a page at the end of the file.
    pub fn page(&self) -> &[u8] {
        let start = self.cursor.page_start();
        let end = (start + self.cursor.geometry().page_size).min(self.size());
        self.buffer.slice(start..end).unwrap_or(&[])
    }

    /// Switches to a new page shape, keeping the cursor on the same byte.
    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        let offset = self.cursor_offset();
        self.cursor = NavigationCursor::new(geometry);
        self.cursor.goto_absolute(offset, self.size());
    }

    pub fn command(&self) -> &CommandInput {
        &self.input
    }

    pub fn close(&mut self) -> Result<()> {
        self.buffer.close()
    }

    pub fn apply(&mut self, command: Command) -> Transition {
        let size = self.size();
        match command {
            Command::HexDigit(ch) => self.push_digit(ch),
            Command::Goto => {
                self.input.begin_goto();
                Transition::Redraw
            }
            Command::Confirm => {
                self.input.confirm(size, &mut self.cursor);
                Transition::Redraw
            }
            Command::Cancel if self.input.is_pending() => {
                self.input.cancel();
                Transition::Redraw
            }
            Command::Cancel | Command::Quit => Transition::Quit,
            Command::Other(ch) => {
                if self.input.is_pending() {
                    debug!(?ch, "pending command cancelled");
                }
                self.input.cancel();
                Transition::Redraw
            }
            Command::Move(direction) => {
                self.input.cancel();
                self.cursor.step(direction, size);
                Transition::Redraw
            }
            Command::JumpTo(offset) => {
                self.input.cancel();
                self.cursor.goto_absolute(offset, size);
                Transition::Redraw
            }
            Command::Increment => self.edit_at_cursor(|b| b.wrapping_add(1)),
            Command::Decrement => self.edit_at_cursor(|b| b.wrapping_sub(1)),
            Command::WriteNop => {
                if self.byte_at(self.cursor_offset()) == Some(NOP) {
                    self.input.cancel();
                    return Transition::Redraw;
                }
                self.edit_at_cursor(|_| NOP)
            }
            Command::Export(count) => {
                self.input.cancel();
                self.export(count)
            }
        }
    }

    fn push_digit(&mut self, ch: char) -> Transition {
        match self.input.push(ch, &mut self.buffer, &mut self.cursor) {
            Ok(InputOutcome::Committed(offset)) => Transition::Dirty(Interval::new(offset, offset + 1)),
            Ok(InputOutcome::Ignored) => Transition::None,
            Ok(_) => Transition::Redraw,
            Err(Error::InvalidCommandInput(_)) => Transition::Redraw,
            Err(e) => {
                debug!(error = %e, "byte input rejected");
                Transition::Redraw
            }
        }
    }

    fn edit_at_cursor(&mut self, f: impl FnOnce(u8) -> u8) -> Transition {
        self.input.cancel();
        let offset = self.cursor_offset();
        match self.buffer.update(offset, f) {
            Ok(value) => {
                debug!(offset, value, "byte edited");
                Transition::Dirty(Interval::new(offset, offset + 1))
            }
            Err(e) => {
                debug!(offset, error = %e, "edit rejected");
                Transition::None
            }
        }
    }

    /// Escaped bytes from the cursor on, or a message when they run past the end.
    pub fn export(&self, count: usize) -> Transition {
        let offset = self.cursor_offset();
        match export_range(&self.buffer, offset, count) {
            Ok(text) => {
                debug!(offset, count, "exported bytes");
                Transition::Export(text)
            }
            Err(e) => Transition::Info(format!("export failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn document_of(bytes: &[u8]) -> (tempfile::NamedTempFile, Document) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        let doc = Document::open(file.path(), PageGeometry::new(4, 4)).unwrap();
        (file, doc)
    }

    #[test]
    fn increment_wraps_and_marks_dirty() {
        let (_file, mut doc) = document_of(&[0xff, 0x00]);
        assert_eq!(doc.apply(Command::Increment), Transition::Dirty(Interval::new(0, 1)));
        assert_eq!(doc.byte_at(0), Some(0x00));
        doc.apply(Command::Move(Direction::Right));
        doc.apply(Command::Decrement);
        assert_eq!(doc.byte_at(1), Some(0xff));
    }

    #[test]
    fn nop_is_written_once() {
        let (_file, mut doc) = document_of(&[0x00]);
        assert!(matches!(doc.apply(Command::WriteNop), Transition::Dirty(_)));
        assert_eq!(doc.byte_at(0), Some(NOP));
        assert_eq!(doc.apply(Command::WriteNop), Transition::Redraw);
    }

    #[test]
    fn cancel_quits_only_without_pending_command() {
        let (_file, mut doc) = document_of(&[0; 4]);
        doc.apply(Command::Goto);
        assert_eq!(doc.apply(Command::Cancel), Transition::Redraw);
        assert!(!doc.command().is_pending());
        assert_eq!(doc.apply(Command::Cancel), Transition::Quit);
    }

    #[test]
    fn navigation_cancels_byte_input() {
        let (_file, mut doc) = document_of(&[0; 4]);
        doc.apply(Command::HexDigit('7'));
        assert!(doc.command().is_pending());
        doc.apply(Command::Move(Direction::Right));
        assert!(!doc.command().is_pending());
        doc.apply(Command::HexDigit('1'));
        assert_eq!(doc.byte_at(1), Some(0));
    }

    #[test]
    fn export_past_end_reports_failure() {
        let (_file, mut doc) = document_of(&[1, 2, 3]);
        doc.apply(Command::Move(Direction::End));
        assert!(matches!(doc.apply(Command::Export(4)), Transition::Info(_)));
        assert_eq!(doc.apply(Command::Export(1)), Transition::Export("\\x03".into()));
    }

    #[test]
    fn new_geometry_keeps_cursor_byte() {
        let (_file, mut doc) = document_of(&[0; 40]);
        doc.apply(Command::JumpTo(37));
        doc.set_geometry(PageGeometry::new(2, 4));
        assert_eq!(doc.cursor_offset(), 37);
        assert_eq!(doc.cursor().page_start(), 32);
        assert_eq!(doc.page().len(), 8);
    }

    #[test]
    fn page_is_cut_at_end_of_file() {
        let (_file, mut doc) = document_of(&[9; 20]);
        assert_eq!(doc.page().len(), 16);
        doc.apply(Command::Move(Direction::PageDown));
        assert_eq!(doc.page(), &[9; 4]);
    }
}
