//! SVG rendering of a [`DiagramSpec`].

use std::{path::Path, rc::Rc};

use log::{debug, error, info};
use svg::{Document, node::element::Rectangle};

use cwbundle_core::{
    blob::{Blob, BlobFormat},
    draw::{
        Arrow, ArrowDefinition, ArrowDrawer, BoxDefinition, Drawable, LabeledBox, LayeredOutput,
        RenderLayer, StrokeDefinition, Text, TextDefinition,
    },
    geometry::{Point, Size},
};

use crate::{BundleError, config::StyleConfig, diagram::DiagramSpec};

/// Canvas size in pixels, a 12x8 figure at 100 dpi.
pub const CANVAS_WIDTH: f32 = 1200.0;
pub const CANVAS_HEIGHT: f32 = 800.0;

/// Upper bound of both plot axes.
const PLOT_EXTENT: f32 = 100.0;

/// Component box size in plot units.
const BOX_WIDTH: f32 = 20.0;
const BOX_HEIGHT: f32 = 10.0;

const TITLE_FONT_SIZE: u16 = 13;
const TITLE_BASELINE: f32 = 30.0;

/// Renders a [`DiagramSpec`] onto a fixed-size SVG canvas.
#[derive(Debug, Clone, Default)]
pub struct DiagramRenderer {
    style: StyleConfig,
}

impl DiagramRenderer {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Maps a plot coordinate to canvas pixels, flipping the y axis.
    pub fn to_canvas(point: Point) -> Point {
        Point::new(
            point.x() * CANVAS_WIDTH / PLOT_EXTENT,
            (PLOT_EXTENT - point.y()) * CANVAS_HEIGHT / PLOT_EXTENT,
        )
    }

    /// Builds the SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Render`] if the style has an unparsable color
    /// or a non-positive arrow width.
    pub fn render_document(&self, spec: &DiagramSpec) -> Result<Document, BundleError> {
        let box_definition = Rc::new(self.box_definition()?);
        let arrow = Arrow::new(Rc::new(self.arrow_definition()?));

        let mut output = LayeredOutput::new();

        if let Some(background) = self.style.background_color().map_err(BundleError::Render)? {
            let rect = Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", CANVAS_WIDTH)
                .set("height", CANVAS_HEIGHT)
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha());
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        let mut title_text = TextDefinition::new();
        title_text.set_font_family(self.style.font_family());
        title_text.set_font_size(TITLE_FONT_SIZE);
        output.merge(
            Text::new(&title_text, spec.title())
                .render_to_layers(Point::new(CANVAS_WIDTH / 2.0, TITLE_BASELINE)),
        );

        for (label, position) in spec.components() {
            let component = LabeledBox::new(Rc::clone(&box_definition), label);
            output.merge(component.render_to_layers(Self::to_canvas(position)));
        }
        debug!(components = spec.component_count(); "Components drawn");

        let mut arrow_drawer = ArrowDrawer::default();
        for connection in spec.connections() {
            output.merge(arrow_drawer.draw_arrow(
                &arrow,
                Self::to_canvas(connection.start()),
                Self::to_canvas(connection.end()),
            ));
        }
        debug!(
            arrows = spec.connections().len(),
            markers = arrow_drawer.marker_count();
            "Connections drawn"
        );

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}"))
            .set("width", CANVAS_WIDTH)
            .set("height", CANVAS_HEIGHT)
            .add(arrow_drawer.draw_marker_definitions());

        for node in output.render() {
            doc = doc.add(node);
        }

        Ok(doc)
    }

    /// Renders the diagram to an SVG string.
    pub fn render_svg(&self, spec: &DiagramSpec) -> Result<String, BundleError> {
        let doc = self.render_document(spec)?;
        info!(title = spec.title(); "Diagram rendered");
        Ok(doc.to_string())
    }

    /// Renders the diagram as an SVG blob named `name`.
    pub fn render_blob(&self, spec: &DiagramSpec, name: &str) -> Result<Blob, BundleError> {
        let svg = self.render_svg(spec)?;
        Ok(Blob::new(name.to_string(), svg, BlobFormat::Svg))
    }

    /// Renders the diagram and writes it to `path`, overwriting any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] if the file cannot be written.
    pub fn render_to_file(&self, spec: &DiagramSpec, path: &Path) -> Result<(), BundleError> {
        let doc = self.render_document(spec)?;

        info!(path:?; "Writing diagram");
        if let Err(err) = svg::save(path, &doc) {
            error!(path:?, err:err; "Failed to write diagram");
            return Err(BundleError::Io(err));
        }

        Ok(())
    }

    fn box_definition(&self) -> Result<BoxDefinition, BundleError> {
        let size = Size::new(
            BOX_WIDTH * CANVAS_WIDTH / PLOT_EXTENT,
            BOX_HEIGHT * CANVAS_HEIGHT / PLOT_EXTENT,
        );

        let mut text = TextDefinition::new();
        text.set_font_family(self.style.font_family());
        text.set_font_size(self.style.font_size());

        let mut definition = BoxDefinition::new(size);
        definition.set_fill_color(Some(
            self.style.box_fill_color().map_err(BundleError::Render)?,
        ));
        definition.set_stroke(StrokeDefinition::new(
            self.style.box_stroke_color().map_err(BundleError::Render)?,
            1.0,
        ));
        definition.set_text(text);
        Ok(definition)
    }

    fn arrow_definition(&self) -> Result<ArrowDefinition, BundleError> {
        let width = self.style.arrow_width();
        if !(width.is_finite() && width > 0.0) {
            return Err(BundleError::Render(format!(
                "Arrow width must be a positive number, got {width}"
            )));
        }

        let color = self.style.arrow_color().map_err(BundleError::Render)?;
        Ok(ArrowDefinition::new(StrokeDefinition::new(color, width)))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_to_canvas_flips_y() {
        let origin = DiagramRenderer::to_canvas(Point::new(0.0, 0.0));
        assert!(approx_eq!(f32, origin.x(), 0.0));
        assert!(approx_eq!(f32, origin.y(), CANVAS_HEIGHT));

        let top_right = DiagramRenderer::to_canvas(Point::new(100.0, 100.0));
        assert!(approx_eq!(f32, top_right.x(), CANVAS_WIDTH));
        assert!(approx_eq!(f32, top_right.y(), 0.0));

        let ec2 = DiagramRenderer::to_canvas(Point::new(10.0, 75.0));
        assert!(approx_eq!(f32, ec2.x(), 120.0));
        assert!(approx_eq!(f32, ec2.y(), 200.0));
    }

    #[test]
    fn test_render_contains_every_component() {
        let spec = DiagramSpec::architecture();
        let svg = DiagramRenderer::default().render_svg(&spec).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 1200 800""#));
        for (label, _) in spec.components() {
            assert!(svg.contains(label), "missing label {label}");
        }
        assert!(svg.contains(spec.title()));
        // Background plus one rectangle per component
        assert_eq!(svg.matches("<rect").count(), 10);
        assert_eq!(svg.matches("marker-end=").count(), 10);
        assert_eq!(svg.matches("<marker").count(), 1);
    }

    #[test]
    fn test_transparent_background() {
        let mut spec = DiagramSpec::new("empty");
        spec.add_component("only", Point::new(50.0, 50.0));

        let style: StyleConfig = toml::from_str("").unwrap();
        let with_background = DiagramRenderer::new(style).render_svg(&spec).unwrap();
        assert_eq!(with_background.matches("<rect").count(), 2);

        let style: StyleConfig = toml::from_str(r#"background_color = "none""#).unwrap();
        let transparent = DiagramRenderer::new(style).render_svg(&spec).unwrap();
        assert_eq!(transparent.matches("<rect").count(), 1);
        assert!(!transparent.contains("<marker"));
    }

    #[test]
    fn test_title_is_drawn_on_text_layer() {
        let svg = DiagramRenderer::default()
            .render_svg(&DiagramSpec::new("Stack Overview"))
            .unwrap();

        let background = svg.find(r#"data-layer="background""#).unwrap();
        let text = svg.find(r#"data-layer="text""#).unwrap();
        let title = svg.find("Stack Overview").unwrap();
        assert!(background < text && text < title);
        assert!(!svg[background..text].contains("<text"));
    }

    #[test]
    fn test_invalid_style_is_render_error() {
        let style: StyleConfig = toml::from_str(r#"box_fill_color = "nope""#).unwrap();
        let result = DiagramRenderer::new(style).render_svg(&DiagramSpec::architecture());
        assert!(matches!(result, Err(BundleError::Render(_))));

        let style: StyleConfig = toml::from_str("arrow_width = 0.0").unwrap();
        let result = DiagramRenderer::new(style).render_svg(&DiagramSpec::architecture());
        assert!(matches!(result, Err(BundleError::Render(_))));
    }

    #[test]
    fn test_render_blob() {
        let blob = DiagramRenderer::default()
            .render_blob(&DiagramSpec::architecture(), "diagram.svg")
            .unwrap();
        assert_eq!(blob.name(), "diagram.svg");
        assert_eq!(blob.format(), BlobFormat::Svg);
        assert!(blob.content().contains("<svg"));
    }
}
