//! Configuration types for bundle writing and diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every section and field is optional and falls back to the
//! defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`BundleConfig`] - Where blobs and the archive are written, and how name
//!   collisions are handled.
//! - [`DiagramConfig`] - Where the architecture diagram is written.
//! - [`StyleConfig`] - Colors and fonts of the diagram.
//!
//! # Example
//!
//! ```
//! # use cwbundle::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.bundle().archive().to_str(), Some("terraform_ssm_cwagent.zip"));
//! assert!(config.style().box_fill_color().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use cwbundle_core::color::Color;

use crate::archive::{Compression, ConflictPolicy};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Bundle configuration section.
    #[serde(default)]
    bundle: BundleConfig,

    /// Diagram configuration section.
    #[serde(default)]
    diagram: DiagramConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(bundle: BundleConfig, diagram: DiagramConfig, style: StyleConfig) -> Self {
        Self {
            bundle,
            diagram,
            style,
        }
    }

    /// Returns the bundle configuration.
    pub fn bundle(&self) -> &BundleConfig {
        &self.bundle
    }

    /// Returns the diagram configuration.
    pub fn diagram(&self) -> &DiagramConfig {
        &self.diagram
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a mutable reference to the bundle configuration.
    pub fn bundle_mut(&mut self) -> &mut BundleConfig {
        &mut self.bundle
    }

    /// Returns a mutable reference to the diagram configuration.
    pub fn diagram_mut(&mut self) -> &mut DiagramConfig {
        &mut self.diagram
    }
}

/// Where bundle files and the archive live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Working directory the blobs are written into.
    directory: PathBuf,

    /// Zip archive the written files are registered in.
    archive: PathBuf,

    /// What to do when an archive entry with the same name already exists.
    on_conflict: ConflictPolicy,

    /// Compression method for new archive entries.
    compression: Compression,
}

impl BundleConfig {
    /// Creates a bundle configuration with the default conflict policy and compression.
    pub fn new(directory: impl Into<PathBuf>, archive: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            archive: archive.into(),
            ..Self::default()
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn on_conflict(&self) -> ConflictPolicy {
        self.on_conflict
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    pub fn set_archive(&mut self, archive: impl Into<PathBuf>) {
        self.archive = archive.into();
    }

    pub fn set_on_conflict(&mut self, policy: ConflictPolicy) {
        self.on_conflict = policy;
    }

    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("terraform_ssm_cwagent"),
            archive: PathBuf::from("terraform_ssm_cwagent.zip"),
            on_conflict: ConflictPolicy::default(),
            compression: Compression::default(),
        }
    }
}

/// Where the architecture diagram is written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Output image path.
    output: PathBuf,
}

impl DiagramConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = output.into();
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("cloudwatch_autoscaling_architecture.svg"),
        }
    }
}

/// Visual styling of the architecture diagram.
///
/// Colors are kept as strings and parsed on access, so an invalid color is
/// reported when the diagram is rendered rather than when the file is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    box_fill_color: String,
    box_stroke_color: String,
    arrow_color: String,
    arrow_width: f32,
    font_family: String,
    font_size: u16,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` for a transparent canvas.
    ///
    /// The value `"none"` disables the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .filter(|color| !color.eq_ignore_ascii_case("none"))
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the fill [`Color`] of component boxes.
    pub fn box_fill_color(&self) -> Result<Color, String> {
        Color::new(&self.box_fill_color)
            .map_err(|err| format!("Invalid box fill color in config: {err}"))
    }

    /// Returns the border [`Color`] of component boxes.
    pub fn box_stroke_color(&self) -> Result<Color, String> {
        Color::new(&self.box_stroke_color)
            .map_err(|err| format!("Invalid box stroke color in config: {err}"))
    }

    /// Returns the [`Color`] of connection arrows.
    pub fn arrow_color(&self) -> Result<Color, String> {
        Color::new(&self.arrow_color).map_err(|err| format!("Invalid arrow color in config: {err}"))
    }

    pub fn arrow_width(&self) -> f32 {
        self.arrow_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: Some(String::from("white")),
            box_fill_color: String::from("lightyellow"),
            box_stroke_color: String::from("black"),
            arrow_color: String::from("black"),
            arrow_width: 1.5,
            font_family: String::from("sans-serif"),
            font_size: 10,
        }
    }
}
