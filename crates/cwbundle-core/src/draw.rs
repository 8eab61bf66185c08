//! Drawable primitives for the architecture diagram.
//!
//! All drawables implement the [`Drawable`] trait, which renders them into a
//! [`LayeredOutput`] so that boxes, arrows and labels are stacked in a
//! consistent z-order regardless of the order they are drawn in.

mod arrow;
mod layer;
mod shape;
mod stroke;
mod text;

pub use arrow::{Arrow, ArrowDefinition, ArrowDrawer};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shape::{BoxDefinition, LabeledBox};
pub use stroke::StrokeDefinition;
pub use text::{Text, TextDefinition};

use crate::geometry::Point;

/// A visual element that can render itself at a position.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable, centered on `position`, to one or more layers.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;
}
