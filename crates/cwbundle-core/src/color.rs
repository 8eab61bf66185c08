//! CSS colors for diagram styling.
//!
//! [`Color`] parses any CSS color string through the `color` crate and
//! prints it back in a form SVG accepts.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// A parsed CSS color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses a CSS color such as `"lightyellow"`, `"#ffd700"` or `"rgb(0 0 0 / 50%)"`.
    ///
    /// ```
    /// # use cwbundle_core::color::Color;
    /// assert!(Color::new("lightyellow").is_ok());
    /// assert!(Color::new("sunset").is_err());
    /// ```
    pub fn new(css: &str) -> Result<Self, String> {
        css.parse()
    }

    /// Opacity between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.0.components[3]
    }

    /// Returns a fragment usable inside an SVG `id`.
    ///
    /// Only ASCII alphanumerics and `_` are kept, and the result never starts
    /// with a digit.
    pub fn to_id_safe_string(self) -> String {
        let mut id = String::new();
        for ch in self.to_string().chars() {
            match ch {
                '#' => id.push_str("hex"),
                c if c.is_ascii_alphanumeric() => id.push(c),
                _ => id.push('_'),
            }
        }
        if id.starts_with(|c: char| c.is_ascii_digit()) {
            id.insert_str(0, "c_");
        }
        id
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DynamicColor::from_str(s)
            .map(Self)
            .map_err(|err| format!("invalid color `{s}`: {err}"))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("black is a CSS named color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// `DynamicColor` holds floats; equal colors print identically.
impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
