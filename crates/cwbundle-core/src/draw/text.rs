//! Text labels.
//!
//! - [`TextDefinition`] - Reusable font configuration
//! - [`Text`] - Label content, optionally wrapped to a maximum width, rendered
//!   as a centered SVG `<text>` element with one `<tspan>` per line
//!
//! Measurement and line breaking are done by `cosmic-text` against the
//! system fonts, through one process-wide `TextManager`.
//!
//! ```
//! # use cwbundle_core::draw::{Text, TextDefinition};
//! let text = Text::wrapped(&TextDefinition::default(), "CloudWatch Logs/Metrics", 228.0);
//! assert_eq!(text.lines(), ["CloudWatch Logs/Metrics"]);
//! ```

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, trace, warn};
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
};

/// Line height relative to the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Advance per character used when no font could shape the text.
const FALLBACK_GLYPH_RATIO: f32 = 0.55;

/// Font configuration for labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Text color, or `None` for the SVG default (black).
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    fn line_height(&self) -> f32 {
        f32::from(self.font_size) * LINE_HEIGHT_RATIO
    }

    // SVG `font-size` is in user units, which the canvas maps 1:1 to pixels.
    fn metrics(&self) -> Metrics {
        Metrics::new(f32::from(self.font_size), self.line_height())
    }

    /// Generic CSS families map to the fontdb generics, anything else is a name.
    fn family(&self) -> Family<'_> {
        match self.font_family.as_str() {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            name => Family::Name(name),
        }
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: String::from("sans-serif"),
            font_size: 10,
            color: None,
        }
    }
}

/// A label ready to render.
#[derive(Debug, Clone)]
pub struct Text {
    definition: TextDefinition,
    lines: Vec<String>,
}

impl Text {
    /// Creates a single-line label.
    pub fn new(definition: &TextDefinition, content: &str) -> Self {
        let content = collapse_whitespace(content);
        let lines = if content.is_empty() {
            Vec::new()
        } else {
            vec![content]
        };
        Self {
            definition: definition.clone(),
            lines,
        }
    }

    /// Creates a label broken into lines no wider than `max_width`.
    ///
    /// Lines break at Unicode line-break opportunities, which are mostly
    /// between words but also after a `/`. A word wider than `max_width` on
    /// its own breaks between glyphs.
    pub fn wrapped(definition: &TextDefinition, content: &str, max_width: f32) -> Self {
        let content = collapse_whitespace(content);
        let mut lines: Vec<String> = text_manager()
            .layout(&content, definition, Some(max_width))
            .into_iter()
            .map(|line| line.text)
            .collect();

        if lines.is_empty() && !content.is_empty() {
            lines.push(content);
        } else if lines.len() > 1 {
            trace!(max_width, line_count = lines.len(); "Label wrapped");
        }

        Self {
            definition: definition.clone(),
            lines,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rendered size of all lines.
    pub fn size(&self) -> Size {
        let content = self.lines.join("\n");
        text_manager().measure(&content, &self.definition)
    }
}

impl Drawable for Text {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.lines.is_empty() {
            return output;
        }

        let line_height = self.definition.line_height();
        // Center the block of lines vertically on `position`
        let first_line_y = position.y() - line_height * (self.lines.len() as f32 - 1.0) / 2.0;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", first_line_y)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for (idx, line) in self.lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_height };
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", dy)
                .add(SvgText::new(line.as_str()));
            rendered_text = rendered_text.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }
}

fn collapse_whitespace(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One visual line produced by shaping.
#[derive(Debug)]
struct LaidOutLine {
    text: String,
    width: f32,
}

/// Shapes text with a shared `FontSystem`.
///
/// Loading the system font database is slow, so one instance lives for the
/// whole process.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        let font_system = FontSystem::new();
        let faces = font_system.db().len();
        info!(faces; "Initializing FontSystem");
        if faces == 0 {
            warn!("No system fonts found, label sizes will be estimated");
        }
        Self {
            font_system: Mutex::new(font_system),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FontSystem> {
        self.font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn has_fonts(&self) -> bool {
        self.lock().db().len() > 0
    }

    /// Shapes `content`, wrapping at `max_width` when given, and returns the
    /// visual lines in order. Empty when no font could shape anything.
    fn layout(
        &self,
        content: &str,
        text_def: &TextDefinition,
        max_width: Option<f32>,
    ) -> Vec<LaidOutLine> {
        if content.is_empty() {
            return Vec::new();
        }

        let mut font_system = self.lock();
        let mut buffer = Buffer::new(&mut font_system, text_def.metrics());
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(text_def.family());
        buffer.set_size(max_width, None);
        buffer.set_text(content, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| {
                let first = run.glyphs.first()?;
                let last = run.glyphs.last()?;
                let text = run.text.get(first.start..last.end)?.trim();
                (!text.is_empty()).then(|| LaidOutLine {
                    text: text.to_string(),
                    width: last.x + last.w,
                })
            })
            .collect()
    }

    /// Size of `content` laid out without a width limit.
    fn measure(&self, content: &str, text_def: &TextDefinition) -> Size {
        if content.is_empty() {
            return Size::default();
        }

        let lines = self.layout(content, text_def, None);
        if lines.is_empty() {
            let longest = content
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            let width = longest as f32 * f32::from(text_def.font_size()) * FALLBACK_GLYPH_RATIO;
            let height = content.lines().count() as f32 * text_def.line_height();
            return Size::new(width, height);
        }

        let width = lines.iter().map(|line| line.width).fold(0.0, f32::max);
        Size::new(width, lines.len() as f32 * text_def.line_height())
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

fn text_manager() -> &'static TextManager {
    TEXT_MANAGER.get_or_init(TextManager::new)
}
