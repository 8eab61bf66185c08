//! Syntax checks for bundle blobs and archive entries.
//!
//! Writing never parses content. Validation is a separate step that checks
//! each blob against its [`BlobFormat`]: JSON with `serde_json`, Terraform
//! with the `hcl` parser, and SVG with a cheap root element check.

use log::{debug, info, warn};

use cwbundle_core::blob::{Blob, BlobFormat};

use crate::{BundleError, archive::Archive};

/// Checks that a blob's content parses as its declared format.
///
/// # Errors
///
/// Returns [`BundleError::Validation`] naming the blob if parsing fails.
pub fn validate_blob(blob: &Blob) -> Result<(), BundleError> {
    validate_content(blob.name(), blob.content(), blob.format())
}

fn validate_content(name: &str, content: &str, format: BlobFormat) -> Result<(), BundleError> {
    debug!(name, format:%; "Validating");
    match format {
        BlobFormat::Json => {
            serde_json::from_str::<serde_json::Value>(content)
                .map_err(|err| BundleError::validation(name, err.to_string()))?;
        }
        BlobFormat::Hcl => {
            hcl::parse(content).map_err(|err| BundleError::validation(name, err.to_string()))?;
        }
        BlobFormat::Svg => {
            if content.trim().is_empty() {
                return Err(BundleError::validation(name, "image is empty"));
            }
            if !content.contains("<svg") {
                return Err(BundleError::validation(name, "missing <svg> root element"));
            }
        }
    }
    Ok(())
}

impl Archive {
    /// Validates every entry whose format can be inferred from its extension.
    ///
    /// Entries with unknown extensions are skipped with a warning. Returns
    /// the number of entries that were validated.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, or an error if the archive
    /// cannot be read or an entry is not UTF-8.
    pub fn verify(&self) -> Result<usize, BundleError> {
        let mut verified = 0;
        for name in self.entry_names()? {
            let Some(format) = BlobFormat::from_file_name(&name) else {
                warn!(entry = name; "Skipping entry with unknown format");
                continue;
            };

            let data = self.read_entry(&name)?;
            let content = String::from_utf8(data)
                .map_err(|err| BundleError::validation(&name, err.to_string()))?;
            validate_content(&name, &content, format)?;
            verified += 1;
        }

        info!(archive:? = self.path(), verified; "Archive verified");
        Ok(verified)
    }
}
