//! The architecture diagram of the bundle.
//!
//! [`DiagramSpec`] holds labeled components at fixed plot positions and the
//! arrows between them. [`DiagramRenderer`] maps the plot onto a fixed SVG
//! canvas and draws it with the `cwbundle_core::draw` primitives.

mod layout;
mod svg;

pub use layout::{ARCHITECTURE_TITLE, Connection, DiagramSpec};
pub use svg::{CANVAS_HEIGHT, CANVAS_WIDTH, DiagramRenderer};
