//! Paged cursor over a buffer of known size.
//!
//! The cursor is a page start (a multiple of the page size) plus an index
//! inside that page. Every move keeps `page_start + intra_page_index` inside
//! `[0, size)`; a move that cannot do so leaves the cursor where it was.

/// Page layout: `page_size` bytes per page, `column_size` bytes per visual row.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PageGeometry {
    pub page_size: usize,
    pub column_size: usize,
}

impl PageGeometry {
    /// `rows` rows of `column_size` bytes. Both are raised to at least 1.
    pub fn new(rows: usize, column_size: usize) -> PageGeometry {
        let column_size = column_size.max(1);
        PageGeometry {
            page_size: rows.max(1) * column_size,
            column_size,
        }
    }

    pub fn rows(&self) -> usize {
        self.page_size / self.column_size
    }

    /// Start of the page containing `offset`.
    pub fn base(&self, offset: usize) -> usize {
        offset - offset % self.page_size
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::new(16, 16)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NavigationCursor {
    geometry: PageGeometry,
    page_start: usize,
    intra_page_index: usize,
}

impl NavigationCursor {
    pub fn new(geometry: PageGeometry) -> NavigationCursor {
        NavigationCursor {
            geometry,
            page_start: 0,
            intra_page_index: 0,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn page_start(&self) -> usize {
        self.page_start
    }

    pub fn intra_page_index(&self) -> usize {
        self.intra_page_index
    }

    pub fn absolute(&self) -> usize {
        self.page_start + self.intra_page_index
    }

    /// Applies a move in `direction` against a buffer of `size` bytes.
    pub fn step(&mut self, direction: Direction, size: usize) {
        match direction {
            Direction::Left => self.step_left(size),
            Direction::Right => self.step_right(size),
            Direction::Up => self.step_up(size),
            Direction::Down => self.step_down(size),
            Direction::PageUp => self.page_up(size),
            Direction::PageDown => self.page_down(size),
            Direction::Home => self.home(),
            Direction::End => self.end(size),
        }
    }

    /// Jumps to the page holding `offset`, clamped to the last byte.
    /// Ignored when that page starts at or past `size`.
    pub fn goto_absolute(&mut self, offset: usize, size: usize) -> bool {
        if self.geometry.base(offset) >= size {
            return false;
        }
        let offset = offset.min(size - 1);
        self.page_start = self.geometry.base(offset);
        self.intra_page_index = offset % self.geometry.page_size;
        true
    }

    pub fn step_left(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        if self.intra_page_index > 0 {
            self.intra_page_index -= 1;
        } else if self.page_start >= self.geometry.page_size {
            self.page_start -= self.geometry.page_size;
            self.intra_page_index = self.geometry.page_size - 1;
        }
    }

    pub fn step_right(&mut self, size: usize) {
        if self.absolute() + 1 >= size {
            return;
        }
        if self.intra_page_index + 1 == self.geometry.page_size {
            self.page_start += self.geometry.page_size;
            self.intra_page_index = 0;
        } else {
            self.intra_page_index += 1;
        }
    }

    pub fn step_down(&mut self, size: usize) {
        let PageGeometry {
            page_size,
            column_size,
        } = self.geometry;
        if self.intra_page_index + column_size < page_size {
            if self.absolute() + column_size < size {
                self.intra_page_index += column_size;
            }
            return;
        }
        if self.page_start + page_size < size {
            self.page_start += page_size;
            self.intra_page_index = self.intra_page_index + column_size - page_size;
            self.clamp_to_end(size);
        }
    }

    pub fn step_up(&mut self, size: usize) {
        if size == 0 {
            return;
        }
        let PageGeometry {
            page_size,
            column_size,
        } = self.geometry;
        if self.intra_page_index >= column_size {
            self.intra_page_index -= column_size;
        } else if self.page_start >= page_size {
            self.page_start -= page_size;
            self.intra_page_index = page_size - column_size + self.intra_page_index;
        }
    }

    pub fn page_down(&mut self, size: usize) {
        let page_size = self.geometry.page_size;
        if self.page_start + page_size < size {
            self.page_start += page_size;
            self.clamp_to_end(size);
        }
    }

    pub fn page_up(&mut self, size: usize) {
        if size != 0 && self.page_start >= self.geometry.page_size {
            self.page_start -= self.geometry.page_size;
        }
    }

    pub fn home(&mut self) {
        self.page_start = 0;
        self.intra_page_index = 0;
    }

    /// Moves to the last byte, `size - 1`.
    pub fn end(&mut self, size: usize) {
        if size > 0 {
            self.goto_absolute(size - 1, size);
        }
    }

    // Only called right after a page shift that left page_start < size.
    fn clamp_to_end(&mut self, size: usize) {
        if self.absolute() >= size {
            self.intra_page_index = size - self.page_start - 1;
        }
    }
}
