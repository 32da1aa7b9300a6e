//! Padding, rectangles and alignment for laid-out text.

/// Space kept free around the text, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Padding {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    /// Same padding on all four sides.
    #[must_use]
    pub const fn all(value: u32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }

    /// Left plus right.
    #[must_use]
    pub const fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub const fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Horizontal placement of each line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of the whole block of lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Combined text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Alignment {
    /// Create an alignment.
    #[must_use]
    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Offset of an item of size `used` inside `available` horizontally.
    #[must_use]
    pub fn horizontal_offset(&self, available: u32, used: u32) -> u32 {
        let free = available.saturating_sub(used);
        match self.horizontal {
            HorizontalAlign::Left => 0,
            HorizontalAlign::Center => free / 2,
            HorizontalAlign::Right => free,
        }
    }

    /// Offset of an item of size `used` inside `available` vertically.
    #[must_use]
    pub fn vertical_offset(&self, available: u32, used: u32) -> u32 {
        let free = available.saturating_sub(used);
        match self.vertical {
            VerticalAlign::Top => 0,
            VerticalAlign::Center => free / 2,
            VerticalAlign::Bottom => free,
        }
    }
}
