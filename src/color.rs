//! Grayscale text color.
//!
//! Text is drawn on monochrome e-ink and LCD panels, so a color is a single
//! intensity plus an alpha. `0` intensity is full black, `15` is white, matching
//! the 4-bit palette most panel drivers accept.
//!
//! # Examples
//!
//! ```
//! use blocktext::Color;
//!
//! let ink = Color::BLACK;
//! let faded = Color::new(8, 0);
//! assert!(ink.is_opaque());
//! assert_eq!(faded.intensity, 8);
//! ```

use std::fmt;

/// Grayscale color with 4-bit intensity and alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// 0 (black) ..= 15 (white).
    pub intensity: u8,
    /// 0 (opaque) ..= 15 (transparent).
    pub alpha: u8,
}

impl Color {
    /// Maximum intensity and alpha value.
    pub const MAX: u8 = 15;

    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(Self::MAX, 0);

    /// Opaque mid gray, used for hints and placeholders.
    pub const GRAY: Self = Self::new(8, 0);

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0, Self::MAX);

    /// Create a color, clamping both channels to [`Color::MAX`].
    #[must_use]
    pub const fn new(intensity: u8, alpha: u8) -> Self {
        let intensity = if intensity > Self::MAX {
            Self::MAX
        } else {
            intensity
        };
        let alpha = if alpha > Self::MAX { Self::MAX } else { alpha };
        Self { intensity, alpha }
    }

    /// Same intensity with a different alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::new(self.intensity, alpha)
    }

    /// True if nothing shows through.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.alpha == 0
    }

    /// True if the color draws nothing.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.alpha == Self::MAX
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gray({}/{})", self.intensity, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        let c = Color::new(200, 99);
        assert_eq!(c.intensity, Color::MAX);
        assert_eq!(c.alpha, Color::MAX);
        assert!(c.is_transparent());
    }

    #[test]
    fn test_constants() {
        assert!(Color::BLACK.is_opaque());
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::WHITE.with_alpha(3).alpha, 3);
        assert_eq!(Color::GRAY.to_string(), "gray(8/0)");
    }
}
