//! Read-only view of a text pane as seen by gutters and link maps

use crate::action::TextDirection;

/// Visible pixel range of a pane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibleRect {
    pub y: f64,
    pub height: f64,
}

/// Live state of a text pane. Every method is queried fresh on each redraw
/// or click; implementors must not expect results to be cached.
pub trait PaneView {
    fn editable(&self) -> bool;

    fn text_direction(&self) -> TextDirection {
        TextDirection::Ltr
    }

    /// Scrolled pixel range currently on screen
    fn visible_rect(&self) -> VisibleRect;

    /// Vertical offset of the pane's top edge relative to the link map canvas
    fn y_offset(&self) -> f64 {
        0.0
    }

    /// Buffer y coordinate of the top of `line`
    fn y_for_line(&self, line: usize) -> f64;

    /// Line at buffer y coordinate `y`
    fn line_for_y(&self, y: f64) -> usize;
}

/// Pane with a fixed line height, as in a terminal grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPane {
    pub line_height: f64,
    pub line_count: usize,
    pub scroll_line: usize,
    pub visible_height: f64,
    pub y_offset: f64,
    pub editable: bool,
    pub text_direction: TextDirection,
}

impl UniformPane {
    pub fn new(line_count: usize, visible_height: f64) -> Self {
        Self {
            line_height: 1.0,
            line_count,
            scroll_line: 0,
            visible_height,
            y_offset: 0.0,
            editable: true,
            text_direction: TextDirection::Ltr,
        }
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_scroll(mut self, scroll_line: usize) -> Self {
        self.scroll_line = scroll_line;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_y_offset(mut self, y_offset: f64) -> Self {
        self.y_offset = y_offset;
        self
    }
}

impl PaneView for UniformPane {
    fn editable(&self) -> bool {
        self.editable
    }

    fn text_direction(&self) -> TextDirection {
        self.text_direction
    }

    fn visible_rect(&self) -> VisibleRect {
        VisibleRect {
            y: self.scroll_line as f64 * self.line_height,
            height: self.visible_height,
        }
    }

    fn y_offset(&self) -> f64 {
        self.y_offset
    }

    fn y_for_line(&self, line: usize) -> f64 {
        line as f64 * self.line_height
    }

    fn line_for_y(&self, y: f64) -> usize {
        if y <= 0.0 || self.line_height <= 0.0 {
            return 0;
        }
        let line = (y / self.line_height).floor() as usize;
        // Past the end resolves to the last line, like a text view does
        line.min(self.line_count.saturating_sub(1))
    }
}
