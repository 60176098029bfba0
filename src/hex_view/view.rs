use std::collections::BTreeSet;
use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event, MouseButton, MouseEvent, MouseEventKind},
    execute, queue, style,
    style::{Color, ContentStyle, Stylize},
    terminal, Result,
};
use tracing::{debug, warn};
use xi_rope::Interval;

use super::sink::ExportSink;
use crate::config::Theme;
use crate::cursor::PageGeometry;
use crate::document::{Command, Document, Transition};
use crate::keymap::event_to_command;

const VERTICAL: &str = "│";
/// Bytes per visual group inside a row.
const GROUP: usize = 4;
/// Width of the `rw 00000000` block at the right of the info bar.
const STATUS_WIDTH: usize = 11;

fn to_printable(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        char::from(byte)
    } else {
        '.'
    }
}

/// Screen columns of the offset, hex and ASCII areas for one row of bytes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Layout {
    pub column_size: usize,
    pub rows: usize,
}

impl Layout {
    pub const OFFSET_WIDTH: usize = 10;

    pub fn new(geometry: PageGeometry) -> Layout {
        Layout {
            column_size: geometry.column_size,
            rows: geometry.rows(),
        }
    }

    /// First screen column of the hex pair for byte `i` of a row.
    pub fn hex_col(&self, i: usize) -> usize {
        Self::OFFSET_WIDTH + i * 3 + i / GROUP
    }

    pub fn separator_col(&self) -> usize {
        self.hex_col(self.column_size)
    }

    pub fn ascii_col(&self, i: usize) -> usize {
        self.separator_col() + 2 + i
    }

    pub fn infobar_row(&self) -> usize {
        self.rows
    }

    /// Column of the access/offset block, right-aligned under the ASCII area
    /// but always past the `left_width` cells already used by the info bar.
    pub fn status_col(&self, left_width: usize) -> usize {
        self.ascii_col(self.column_size)
            .saturating_sub(STATUS_WIDTH + 1)
            .max(left_width + 1)
    }

    /// Index inside the page of the byte drawn at screen cell (`x`, `y`), if any.
    pub fn byte_at_cell(&self, x: usize, y: usize) -> Option<usize> {
        if y >= self.rows {
            return None;
        }
        let in_row = (0..self.column_size)
            .find(|&i| x >= self.hex_col(i) && x < self.hex_col(i) + 2)
            .or_else(|| {
                (x >= self.ascii_col(0) && x < self.ascii_col(self.column_size))
                    .then(|| x - self.ascii_col(0))
            })?;
        Some(y * self.column_size + in_row)
    }
}

pub struct HexView {
    document: Document,
    theme: Theme,
    layout: Layout,
    /// Configured page height; the terminal may only shrink it.
    page_rows: usize,
    sink: Box<dyn ExportSink>,
    info: Option<String>,
}

impl HexView {
    pub fn new(document: Document, theme: Theme, sink: Box<dyn ExportSink>) -> HexView {
        let layout = Layout::new(document.cursor().geometry());
        HexView {
            document,
            theme,
            layout,
            page_rows: layout.rows,
            sink,
            info: None,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Fits the page to a terminal `height` rows tall, keeping one row for the
    /// info bar. Never grows past the configured page height.
    pub fn fit_to_height(&mut self, height: u16) {
        let rows = (height as usize).saturating_sub(1).clamp(1, self.page_rows);
        if rows == self.layout.rows {
            return;
        }
        let geometry = PageGeometry::new(rows, self.layout.column_size);
        self.document.set_geometry(geometry);
        self.layout = Layout::new(geometry);
        debug!(rows, "page resized");
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    fn plain(&self, color: Color) -> ContentStyle {
        ContentStyle::new().with(color).on(self.theme.background)
    }

    fn inverted(&self, color: Color) -> ContentStyle {
        ContentStyle::new().with(self.theme.background).on(color)
    }

    fn byte_style(&self, offset: usize) -> ContentStyle {
        let marked = self.document.detection().is_marked(offset, self.document.size());
        let accent = if marked {
            self.theme.magic
        } else {
            self.theme.special
        };
        if offset == self.document.cursor_offset() {
            self.inverted(accent)
        } else if marked {
            self.plain(self.theme.magic)
        } else {
            self.plain(self.theme.foreground)
        }
    }

    fn offset_style(&self, row_start: usize) -> ContentStyle {
        let column_size = self.layout.column_size;
        let cursor_row = self.document.cursor_offset() / column_size * column_size;
        if cursor_row != row_start {
            return self.plain(self.theme.special);
        }
        let header_row = self
            .document
            .detection()
            .signature
            .map(|s| s.header_offset / column_size * column_size);
        if header_row == Some(row_start) {
            self.inverted(self.theme.magic)
        } else {
            self.inverted(self.theme.special)
        }
    }

    fn draw_row(&self, stdout: &mut impl Write, row: usize) -> Result<()> {
        let column_size = self.layout.column_size;
        let page_start = self.document.cursor().page_start();
        let row_start = page_start + row * column_size;
        let page = self.document.page();
        let bytes = page
            .get(row * column_size..)
            .map(|rest| &rest[..rest.len().min(column_size)])
            .unwrap_or(&[]);

        queue!(
            stdout,
            cursor::MoveTo(0, row as u16),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
        if bytes.is_empty() {
            return Ok(());
        }

        queue!(
            stdout,
            style::Print(" "),
            style::PrintStyledContent(self.offset_style(row_start).apply(format!("{:08X}", row_start))),
            style::Print(" "),
        )?;
        for (i, byte) in bytes.iter().enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(self.layout.hex_col(i) as u16, row as u16),
                style::PrintStyledContent(self.byte_style(row_start + i).apply(format!("{:02X}", byte))),
            )?;
        }
        queue!(
            stdout,
            cursor::MoveTo(self.layout.separator_col() as u16, row as u16),
            style::PrintStyledContent(self.plain(self.theme.foreground).apply(format!("{} ", VERTICAL))),
        )?;
        for (i, byte) in bytes.iter().enumerate() {
            queue!(
                stdout,
                style::PrintStyledContent(self.byte_style(row_start + i).apply(to_printable(*byte))),
            )?;
        }
        Ok(())
    }

    fn draw_infobar(&self, stdout: &mut impl Write) -> Result<()> {
        let row = self.layout.infobar_row() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;

        let command = self.document.command();
        let head = match command.mode().prompt() {
            Some(prompt) => (
                self.plain(self.theme.special),
                format!("{}{}", prompt, command.digits().to_prompt()),
            ),
            None => (
                self.plain(self.theme.magic),
                self.document.detection().label().to_string(),
            ),
        };
        let mut width = 1 + head.1.chars().count();
        queue!(stdout, style::PrintStyledContent(head.0.apply(head.1)))?;
        if let Some(info) = &self.info {
            width += 2 + info.chars().count();
            queue!(
                stdout,
                style::Print("  "),
                style::PrintStyledContent(self.plain(self.theme.foreground).apply(info.as_str())),
            )?;
        }

        queue!(
            stdout,
            cursor::MoveTo(self.layout.status_col(width) as u16, row),
            style::PrintStyledContent(
                self.plain(self.theme.special)
                    .apply(if self.document.is_read_only() { "ro" } else { "rw" })
            ),
            style::Print(" "),
            style::PrintStyledContent(
                self.plain(self.theme.foreground)
                    .apply(format!("{:08X}", self.document.cursor_offset()))
            ),
        )?;
        Ok(())
    }

    fn draw_rows(&self, stdout: &mut impl Write, rows: &BTreeSet<usize>) -> Result<()> {
        for &row in rows {
            self.draw_row(stdout, row)?;
        }
        self.draw_infobar(stdout)
    }

    pub fn draw(&self, stdout: &mut impl Write) -> Result<()> {
        let rows: BTreeSet<usize> = (0..self.layout.rows).collect();
        self.draw_rows(stdout, &rows)
    }

    /// Rows of the current page touched by `interval` (absolute offsets).
    fn rows_of(&self, interval: Interval) -> BTreeSet<usize> {
        let page_start = self.document.cursor().page_start();
        let page: Interval = Interval::new(page_start, page_start + self.document.cursor().geometry().page_size);
        let touched = page.intersect(interval);
        if touched.is_empty() {
            return BTreeSet::new();
        }
        (touched.start..touched.end)
            .map(|offset| (offset - page_start) / self.layout.column_size)
            .collect()
    }

    fn mouse_command(&self, mouse: &MouseEvent) -> Option<Command> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        self.layout
            .byte_at_cell(mouse.column as usize, mouse.row as usize)
            .map(|i| Command::JumpTo(self.document.cursor().page_start() + i))
    }

    /// Applies one event. Returns false once the user asked to quit.
    pub fn handle_event(&mut self, stdout: &mut impl Write, evt: &Event) -> Result<bool> {
        let command = match evt {
            Event::Resize(_, height) => {
                self.fit_to_height(*height);
                queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                self.draw(stdout)?;
                return Ok(true);
            }
            Event::Mouse(mouse) => self.mouse_command(mouse),
            Event::Key(_) => event_to_command(evt),
        };
        let command = match command {
            Some(command) => command,
            None => return Ok(true),
        };

        self.info = None;
        match self.document.apply(command) {
            Transition::None => {}
            Transition::Redraw => self.draw(stdout)?,
            Transition::Dirty(interval) => {
                let rows = self.rows_of(interval);
                self.draw_rows(stdout, &rows)?;
            }
            Transition::Export(text) => {
                self.info = Some(match self.sink.deliver(&text) {
                    Ok(()) => format!("{} {}", text, self.sink.describe()),
                    Err(e) => {
                        warn!(error = %e, "export delivery failed");
                        format!("copy failed: {}", e)
                    }
                });
                self.draw_infobar(stdout)?;
            }
            Transition::Info(info) => {
                self.info = Some(info);
                self.draw(stdout)?;
            }
            Transition::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn event_loop(&mut self, stdout: &mut impl Write) -> Result<()> {
        let (_, height) = terminal::size()?;
        self.fit_to_height(height);
        self.draw(stdout)?;
        stdout.flush()?;
        loop {
            let evt = event::read()?;
            if !self.handle_event(stdout, &evt)? {
                debug!("quit requested");
                return Ok(());
            }
            stdout.flush()?;
        }
    }

    pub fn run_event_loop(&mut self, stdout: &mut impl Write) -> Result<()> {
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;
        terminal::enable_raw_mode()?;

        let result = self.event_loop(stdout);

        let restored = execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .and_then(|_| terminal::disable_raw_mode());
        result.and(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex_view::ClipFileSink;

    fn layout() -> Layout {
        Layout::new(PageGeometry::new(16, 16))
    }

    #[test]
    fn groups_of_four_get_an_extra_space() {
        let layout = layout();
        assert_eq!(layout.hex_col(0), 10);
        assert_eq!(layout.hex_col(3), 19);
        assert_eq!(layout.hex_col(4), 23);
        assert_eq!(layout.separator_col(), 10 + 48 + 4);
    }

    #[test]
    fn cells_map_back_to_page_indices() {
        let layout = layout();
        assert_eq!(layout.byte_at_cell(10, 0), Some(0));
        assert_eq!(layout.byte_at_cell(11, 2), Some(32));
        // gap between two hex pairs
        assert_eq!(layout.byte_at_cell(12, 0), None);
        assert_eq!(layout.byte_at_cell(layout.ascii_col(5), 1), Some(21));
        assert_eq!(layout.byte_at_cell(10, 16), None);
        assert_eq!(layout.byte_at_cell(0, 0), None);
    }

    #[test]
    fn status_block_never_overlaps_left_text() {
        let layout = layout();
        assert_eq!(layout.status_col(5), layout.ascii_col(16) - 12);
        assert_eq!(layout.status_col(200), 201);

        let narrow = Layout::new(PageGeometry::new(16, 1));
        assert_eq!(narrow.status_col(0), narrow.ascii_col(1) - 12);
        assert_eq!(narrow.status_col(8), 9);
    }

    fn view_of(bytes: &[u8], rows: usize) -> (tempfile::TempDir, HexView) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        std::fs::write(&path, bytes).unwrap();
        let document = Document::open(&path, PageGeometry::new(rows, 16)).unwrap();
        let sink = Box::new(ClipFileSink::new(dir.path().join("clip")));
        (dir, HexView::new(document, Theme::default(), sink))
    }

    #[test]
    fn shrinking_terminal_shrinks_page_and_keeps_cursor() {
        let (_dir, mut view) = view_of(&[0; 0x400], 16);
        view.document.apply(Command::JumpTo(0x1f3));
        view.fit_to_height(9);
        assert_eq!(view.layout().rows, 8);
        assert_eq!(view.document().cursor().geometry().page_size, 0x80);
        assert_eq!(view.document().cursor_offset(), 0x1f3);
        assert_eq!(view.document().cursor().page_start(), 0x180);
    }

    #[test]
    fn growing_terminal_stops_at_configured_rows() {
        let (_dir, mut view) = view_of(&[0; 0x400], 4);
        view.fit_to_height(2);
        assert_eq!(view.layout().rows, 1);
        view.fit_to_height(100);
        assert_eq!(view.layout().rows, 4);
        view.fit_to_height(0);
        assert_eq!(view.layout().rows, 1);
    }

    #[test]
    fn only_printable_ascii_is_shown() {
        assert_eq!(to_printable(b'A'), 'A');
        assert_eq!(to_printable(b' '), ' ');
        assert_eq!(to_printable(0x7f), '.');
        assert_eq!(to_printable(0x00), '.');
    }
}
