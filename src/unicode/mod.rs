//! Unicode display-width helpers backing the built-in cell font.

mod width;

pub use width::{
    WidthMethod, chars_fitting_width, display_width_char_with_method, display_width_with_method,
};
