//! cwbundle - Terraform bundle writer for an EC2 + CloudWatch agent + Auto Scaling stack.
//!
//! The bundle is a fixed set of template files, delivered in [`Stage`]s. Each
//! stage writes its files into a working directory and mirrors them into a
//! single zip archive that later stages append to. An architecture diagram of
//! the stack can be rendered to SVG and optionally added to the archive.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod diagram;
pub mod validate;
pub mod writer;

mod error;

pub use cwbundle_core::{blob, color, draw, geometry};

pub use catalog::Stage;
pub use error::BundleError;
pub use writer::{BundleWriter, WriteReport};

use std::fs;

use log::{debug, info};

use archive::{Archive, ArchiveEntry, RegisterOutcome};
use config::AppConfig;
use diagram::{DiagramRenderer, DiagramSpec};

/// Entry point for bundle operations driven by one [`AppConfig`].
///
/// # Examples
///
/// ```rust,no_run
/// use cwbundle::{Bundle, Stage, config::AppConfig};
///
/// let bundle = Bundle::new(AppConfig::default());
///
/// // Write the first two stages into the bundle directory and archive
/// let report = bundle.write_stages(&[Stage::Base, Stage::Alarms])
///     .expect("Failed to write bundle");
/// assert_eq!(report.written().len(), 3);
///
/// // Render the architecture diagram next to it
/// bundle.render_diagram(false).expect("Failed to render diagram");
/// ```
#[derive(Debug, Default)]
pub struct Bundle {
    config: AppConfig,
}

impl Bundle {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns a writer for the configured directory and archive.
    pub fn writer(&self) -> BundleWriter {
        BundleWriter::new(self.config.bundle().clone())
    }

    /// Returns the configured archive.
    pub fn archive(&self) -> Archive {
        Archive::open(self.config.bundle().archive())
    }

    /// Writes the given stages in one archive session.
    ///
    /// # Errors
    ///
    /// See [`BundleWriter::write_all`].
    pub fn write_stages(&self, stages: &[Stage]) -> Result<WriteReport, BundleError> {
        info!(
            directory:? = self.config.bundle().directory(),
            archive:? = self.config.bundle().archive(),
            stages = stages.len();
            "Writing bundle"
        );
        self.writer().write_stages(stages)
    }

    /// Renders the architecture diagram to the configured output path.
    ///
    /// With `register`, the written image is also added to the archive under
    /// its file name. Returns the archive outcome when registered.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the style configuration is invalid ([`BundleError::Render`])
    /// - the image or archive cannot be written ([`BundleError::Io`])
    /// - registration conflicts under the `fail` policy ([`BundleError::EntryExists`])
    pub fn render_diagram(&self, register: bool) -> Result<Option<RegisterOutcome>, BundleError> {
        let output = self.config.diagram().output();
        let renderer = DiagramRenderer::new(self.config.style().clone());
        renderer.render_to_file(&DiagramSpec::architecture(), output)?;
        info!(output:?; "Diagram written");

        if !register {
            return Ok(None);
        }

        let name = output
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| BundleError::InvalidBlobName(output.display().to_string()))?;
        debug!(name; "Registering diagram");

        let entry = ArchiveEntry::new(name, fs::read(output)?);
        let outcome = self.archive().register(
            &[entry],
            self.config.bundle().on_conflict(),
            self.config.bundle().compression(),
        )?;
        Ok(Some(outcome))
    }

    /// Returns the archive entry names in archive order.
    pub fn list(&self) -> Result<Vec<String>, BundleError> {
        self.archive().entry_names()
    }

    /// Validates every archive entry, returning how many were checked.
    pub fn verify(&self) -> Result<usize, BundleError> {
        self.archive().verify()
    }
}
