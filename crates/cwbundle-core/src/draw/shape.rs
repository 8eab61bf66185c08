//! Labeled component boxes.
//!
//! A [`LabeledBox`] is a rectangle with a centered, word-wrapped label. The
//! box style is shared through an `Rc<BoxDefinition>` so every component of a
//! diagram renders with the same look.

use std::rc::Rc;

use log::warn;
use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Point, Size},
};

/// Horizontal space kept free between the label and the box border, per side.
const LABEL_PADDING: f32 = 6.0;

/// Style shared by all component boxes.
#[derive(Debug, Clone)]
pub struct BoxDefinition {
    size: Size,
    fill_color: Option<Color>,
    stroke: StrokeDefinition,
    text: TextDefinition,
}

impl BoxDefinition {
    /// Creates a box definition of the given size with no fill and a default stroke.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            fill_color: None,
            stroke: StrokeDefinition::default(),
            text: TextDefinition::default(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    pub fn set_fill_color(&mut self, color: Option<Color>) {
        self.fill_color = color;
    }

    pub fn set_stroke(&mut self, stroke: StrokeDefinition) {
        self.stroke = stroke;
    }

    pub fn set_text(&mut self, text: TextDefinition) {
        self.text = text;
    }
}

/// A component box with its label.
#[derive(Debug, Clone)]
pub struct LabeledBox {
    definition: Rc<BoxDefinition>,
    label: String,
}

impl LabeledBox {
    pub fn new(definition: Rc<BoxDefinition>, label: impl Into<String>) -> Self {
        Self {
            definition,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The label laid out to fit inside the box.
    fn text(&self) -> Text {
        let max_width = (self.definition.size().width() - 2.0 * LABEL_PADDING).max(0.0);
        Text::wrapped(self.definition.text(), &self.label, max_width)
    }
}

impl Drawable for LabeledBox {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = position.to_bounds(self.definition.size());
        let top_left = bounds.min_point();

        let mut rect = svg_element::Rectangle::new()
            .set("x", top_left.x())
            .set("y", top_left.y())
            .set("width", bounds.width())
            .set("height", bounds.height());

        rect = match self.definition.fill_color() {
            Some(fill) => rect
                .set("fill", fill.to_string())
                .set("fill-opacity", fill.alpha()),
            None => rect.set("fill", "none"),
        };

        let rect = crate::apply_stroke!(rect, self.definition.stroke());
        output.add_to_layer(RenderLayer::Content, Box::new(rect));

        let text = self.text();
        if text.size().height() > bounds.height() {
            warn!(
                label = self.label.as_str(),
                lines = text.lines().len();
                "Label overflows its box"
            );
        }
        output.merge(text.render_to_layers(position));
        output
    }
}
