//! Display width of characters in cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Width of a string in cells.
///
/// Control characters, including `\n`, take no space.
#[must_use]
pub fn display_width_with_method(s: &str, method: WidthMethod) -> usize {
    if s.chars().any(char::is_control) {
        return s
            .chars()
            .map(|c| display_width_char_with_method(c, method))
            .sum();
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}

/// Width of a character in cells.
#[inline]
#[must_use]
pub fn display_width_char_with_method(c: char, method: WidthMethod) -> usize {
    // Fast path: printable ASCII is always one cell
    if c.is_ascii() && (' '..='~').contains(&c) {
        return 1;
    }
    if c.is_control() {
        return 0;
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthChar::width(c).unwrap_or(0),
        WidthMethod::Unicode => UnicodeWidthChar::width_cjk(c).unwrap_or(0),
    }
}

/// Number of leading characters of `s` whose summed width stays within `cells`.
#[must_use]
pub fn chars_fitting_width(s: &str, cells: usize, method: WidthMethod) -> usize {
    let mut used = 0;
    let mut count = 0;
    for c in s.chars() {
        used += display_width_char_with_method(c, method);
        if used > cells {
            break;
        }
        count += 1;
    }
    count
}
