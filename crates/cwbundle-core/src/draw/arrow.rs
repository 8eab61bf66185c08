//! Directed arrows and their SVG marker definitions.
//!
//! Arrow heads are SVG `<marker>` elements referenced by `marker-end`. One
//! marker is emitted per arrow color, so [`ArrowDrawer`] records the colors it
//! has drawn and produces the shared `<defs>` block afterwards.

use std::{collections::BTreeMap, rc::Rc};

use svg::node::element as svg_element;

use crate::{
    color::Color,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
};

/// Visual properties of an arrow.
#[derive(Debug, Clone, Default)]
pub struct ArrowDefinition {
    stroke: StrokeDefinition,
}

impl ArrowDefinition {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self { stroke }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

/// A straight arrow from a source point to a destination point.
#[derive(Debug, Clone)]
pub struct Arrow {
    definition: Rc<ArrowDefinition>,
}

impl Arrow {
    pub fn new(definition: Rc<ArrowDefinition>) -> Self {
        Self { definition }
    }

    /// Create a path data string from two points
    pub fn create_path_data_from_points(start: Point, end: Point) -> String {
        format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
    }

    fn render_to_svg(&self, source: Point, destination: Point) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", Self::create_path_data_from_points(source, destination))
            .set("fill", "none");

        let path = crate::apply_stroke!(path, self.definition.stroke());
        path.set(
            "marker-end",
            format!("url(#{})", Self::marker_id(self.definition.stroke().color())),
        )
    }

    fn marker_id(color: Color) -> String {
        format!("arrow-right-{}", color.to_id_safe_string())
    }

    fn create_marker(color: Color) -> svg_element::Marker {
        svg_element::Marker::new()
            .set("id", Self::marker_id(color))
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", color.to_string())
                    .set("fill-opacity", color.alpha()),
            )
    }
}

/// Draws arrows and collects the marker definitions they reference.
#[derive(Debug, Default)]
pub struct ArrowDrawer {
    markers: BTreeMap<String, Color>,
}

impl ArrowDrawer {
    /// Draws an arrow onto the [`RenderLayer::Arrow`] layer and records its marker.
    pub fn draw_arrow(
        &mut self,
        arrow: &Arrow,
        source: Point,
        destination: Point,
    ) -> LayeredOutput {
        let color = arrow.definition.stroke().color();
        self.markers.insert(Arrow::marker_id(color), color);

        let mut output = LayeredOutput::new();
        output.add_to_layer(
            RenderLayer::Arrow,
            Box::new(arrow.render_to_svg(source, destination)),
        );
        output
    }

    /// A `<defs>` block with one marker per collected color, in id order.
    pub fn draw_marker_definitions(&self) -> svg_element::Definitions {
        self.markers
            .values()
            .fold(svg_element::Definitions::new(), |defs, color| {
                defs.add(Arrow::create_marker(*color))
            })
    }

    /// Number of distinct markers collected so far.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_data_from_points() {
        let data =
            Arrow::create_path_data_from_points(Point::new(0.0, 1.5), Point::new(10.0, 20.0));
        assert_eq!(data, "M 0 1.5 L 10 20");
    }

    #[test]
    fn test_draw_arrow_references_marker() {
        let mut drawer = ArrowDrawer::default();
        let arrow = Arrow::new(Rc::new(ArrowDefinition::default()));

        let output = drawer.draw_arrow(&arrow, Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        assert_eq!(output.count_in_layer(RenderLayer::Arrow), 1);

        let rendered = output.render()[0].to_string();
        assert!(rendered.contains("marker-end=\"url(#arrow-right-"));
        assert!(rendered.contains("d=\"M 0 0 L 5 5\""));
    }

    #[test]
    fn test_markers_are_shared_per_color() {
        let mut drawer = ArrowDrawer::default();
        let black = Arrow::new(Rc::new(ArrowDefinition::default()));
        let red = Arrow::new(Rc::new(ArrowDefinition::new(StrokeDefinition::new(
            Color::new("red").unwrap(),
            1.5,
        ))));

        drawer.draw_arrow(&black, Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        drawer.draw_arrow(&black, Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        drawer.draw_arrow(&red, Point::new(2.0, 2.0), Point::new(3.0, 3.0));

        assert_eq!(drawer.marker_count(), 2);
        let defs = drawer.draw_marker_definitions().to_string();
        assert_eq!(defs.matches("<marker").count(), 2);
    }
}
