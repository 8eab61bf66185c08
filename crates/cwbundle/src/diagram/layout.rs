//! Fixed positions of the architecture diagram.

use indexmap::IndexMap;

use cwbundle_core::geometry::Point;

/// Title of the architecture diagram.
pub const ARCHITECTURE_TITLE: &str =
    "Terraform-Deployed AWS EC2 + CloudWatch + Auto Scaling Architecture";

/// A directed connection between two plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    start: Point,
    end: Point,
}

impl Connection {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }
}

/// Labeled components at fixed plot positions, plus the arrows between them.
///
/// Coordinates live in a 0..100 by 0..100 plot space with the y axis
/// pointing up. Components keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct DiagramSpec {
    title: String,
    components: IndexMap<String, Point>,
    connections: Vec<Connection>,
}

impl DiagramSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// The diagram of the bundle's AWS architecture.
    pub fn architecture() -> Self {
        let mut spec = Self::new(ARCHITECTURE_TITLE);

        spec.add_component("EC2 Instance(s)", Point::new(10.0, 75.0));
        spec.add_component("CloudWatch Agent", Point::new(30.0, 75.0));
        spec.add_component("SSM Parameter Store", Point::new(50.0, 90.0));
        spec.add_component("CloudWatch Logs/Metrics", Point::new(50.0, 75.0));
        spec.add_component("Alarms (CPU/Memory)", Point::new(70.0, 75.0));
        spec.add_component("Auto Scaling Group", Point::new(30.0, 50.0));
        spec.add_component("Scaling Policies", Point::new(50.0, 50.0));
        spec.add_component("SNS Topic + Email", Point::new(70.0, 50.0));
        spec.add_component("CloudWatch Dashboard", Point::new(50.0, 30.0));

        let arrows = [
            ((10.0, 75.0), (20.0, 75.0)),
            ((30.0, 75.0), (40.0, 75.0)),
            ((50.0, 90.0), (30.0, 75.0)),
            ((50.0, 75.0), (60.0, 75.0)),
            ((70.0, 75.0), (70.0, 60.0)),
            ((70.0, 75.0), (50.0, 50.0)),
            ((30.0, 75.0), (30.0, 55.0)),
            ((50.0, 50.0), (30.0, 50.0)),
            ((70.0, 50.0), (60.0, 50.0)),
            ((50.0, 75.0), (50.0, 35.0)),
        ];
        for ((x1, y1), (x2, y2)) in arrows {
            spec.add_connection(Point::new(x1, y1), Point::new(x2, y2));
        }

        spec
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Adds a component, returning the previous position if the label existed.
    pub fn add_component(&mut self, label: impl Into<String>, position: Point) -> Option<Point> {
        self.components.insert(label.into(), position)
    }

    pub fn add_connection(&mut self, start: Point, end: Point) {
        self.connections.push(Connection::new(start, end));
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (&str, Point)> {
        self.components
            .iter()
            .map(|(label, position)| (label.as_str(), *position))
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}
