//! Screen geometry.
//!
//! The console screen is a message list on top of the selected message.
//! The list height is operator controlled (and persisted); the contents
//! pane takes whatever rows remain after the fixed chrome. The subject
//! column absorbs the width the other columns leave.

/// Rows used by everything except the list rows and the contents rows:
/// title, table header, divider, four detail lines, view tabs, divider and
/// the notice line.
pub const CHROME_ROWS: u16 = 10;

/// Width of the receive time column.
pub const RECEIVED_WIDTH: usize = 19;
/// Width of the sender column.
pub const FROM_WIDTH: usize = 24;
/// Width of the recipient column.
pub const TO_WIDTH: usize = 24;
/// Width of the delivery status column.
pub const STATUS_WIDTH: usize = 10;
/// Selection marker plus one space between columns.
pub const COLUMN_PADDING: usize = 6;
/// The subject column never gets narrower than this.
pub const MIN_SUBJECT_WIDTH: usize = 20;

/// Default number of list rows.
pub const DEFAULT_LIST_HEIGHT: u16 = 10;
/// The list never gets shorter than this.
pub const MIN_LIST_HEIGHT: u16 = 3;

/// Terminal size used when it cannot be queried.
pub const FALLBACK_SIZE: (u16, u16) = (120, 40);

/// Current screen geometry and list scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    width: u16,
    height: u16,
    list_height: u16,
    scroll: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(FALLBACK_SIZE.0, FALLBACK_SIZE.1, DEFAULT_LIST_HEIGHT)
    }
}

impl Layout {
    /// Creates a layout for a `width` x `height` surface.
    #[must_use]
    pub const fn new(width: u16, height: u16, list_height: u16) -> Self {
        let mut layout = Self {
            width,
            height,
            list_height,
            scroll: 0,
        };
        layout.list_height = layout.clamp_list_height(list_height);
        layout
    }

    /// Surface width in columns.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Rows given to the message list.
    #[must_use]
    pub const fn list_height(&self) -> u16 {
        self.list_height
    }

    /// Index of the first visible list row.
    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// Applies a new surface size. Returns `true` if anything changed.
    pub const fn resize(&mut self, width: u16, height: u16) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.list_height = self.clamp_list_height(self.list_height);
        true
    }

    /// Grows (positive) or shrinks (negative) the list pane. Returns the
    /// new list height.
    pub fn resize_list(&mut self, delta: i32) -> u16 {
        let wanted = i32::from(self.list_height).saturating_add(delta);
        let wanted = u16::try_from(wanted.max(0)).unwrap_or(u16::MAX);
        self.list_height = self.clamp_list_height(wanted);
        self.list_height
    }

    /// Rows left for the message contents.
    #[must_use]
    pub const fn contents_height(&self) -> u16 {
        let used = self.list_height.saturating_add(CHROME_ROWS);
        let rows = self.height.saturating_sub(used);
        if rows == 0 { 1 } else { rows }
    }

    /// Width of the subject column.
    #[must_use]
    pub const fn subject_width(&self, show_status: bool) -> usize {
        let mut others = RECEIVED_WIDTH + FROM_WIDTH + TO_WIDTH + COLUMN_PADDING;
        if show_status {
            others += STATUS_WIDTH;
        }
        let width = (self.width as usize).saturating_sub(others);
        if width < MIN_SUBJECT_WIDTH {
            MIN_SUBJECT_WIDTH
        } else {
            width
        }
    }

    /// Scrolls the list so that row `index` is visible, keeping one row of
    /// context above and below where possible.
    pub fn ensure_visible(&mut self, index: usize, total: usize) {
        let rows = usize::from(self.list_height);
        let margin = usize::from(rows > 2);

        if index < self.scroll + margin {
            self.scroll = index.saturating_sub(margin);
        } else if index + margin >= self.scroll + rows {
            self.scroll = (index + margin + 1).saturating_sub(rows);
        }

        let max_scroll = total.saturating_sub(rows);
        self.scroll = self.scroll.min(max_scroll);
    }

    /// Range of list rows currently on screen.
    #[must_use]
    pub fn visible_rows(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.scroll.min(total);
        let end = (start + usize::from(self.list_height)).min(total);
        start..end
    }

    const fn clamp_list_height(&self, wanted: u16) -> u16 {
        let max = self.height.saturating_sub(CHROME_ROWS + 1);
        let max = if max < MIN_LIST_HEIGHT {
            MIN_LIST_HEIGHT
        } else {
            max
        };
        if wanted < MIN_LIST_HEIGHT {
            MIN_LIST_HEIGHT
        } else if wanted > max {
            max
        } else {
            wanted
        }
    }
}
