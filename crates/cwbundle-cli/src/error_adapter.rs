//! Error adapter for converting BundleError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Each
//! [`BundleError`] variant gets a stable code and, where the operator can act
//! on it, a help line.

use std::{error::Error as StdError, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use cwbundle::BundleError;

/// Adapter that renders a [`BundleError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a BundleError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BundleError::Io(_) => "cwbundle::io",
            BundleError::Archive(_) => "cwbundle::archive",
            BundleError::DuplicateBlob(_) => "cwbundle::duplicate_blob",
            BundleError::InvalidBlobName(_) => "cwbundle::invalid_blob_name",
            BundleError::EntryExists(_) => "cwbundle::entry_exists",
            BundleError::MissingEntry(_) => "cwbundle::missing_entry",
            BundleError::Validation { .. } => "cwbundle::validation",
            BundleError::Render(_) => "cwbundle::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            BundleError::Io(_) => {
                "check that the bundle directory, archive and diagram paths are writable"
            }
            BundleError::Archive(_) => {
                "the archive may be corrupt; move it aside to start a new one"
            }
            BundleError::EntryExists(_) => {
                "pass `--on-conflict replace` to overwrite it, or `keep` to leave it"
            }
            BundleError::MissingEntry(_) => "run `cwbundle list` to see the archive entries",
            BundleError::Validation { .. } => {
                "rewrite the bundle with `cwbundle write --all` to restore the stock templates"
            }
            BundleError::Render(_) => "check the [style] section of the configuration file",
            BundleError::DuplicateBlob(_) | BundleError::InvalidBlobName(_) => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap a [`BundleError`] for rendering with miette.
pub fn to_reportable(err: &BundleError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn code_of(err: &BundleError) -> String {
        to_reportable(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes() {
        assert_eq!(code_of(&BundleError::Io(io::Error::other("disk full"))), "cwbundle::io");
        assert_eq!(
            code_of(&BundleError::EntryExists("main.tf".to_string())),
            "cwbundle::entry_exists"
        );
        assert_eq!(
            code_of(&BundleError::validation("main.tf", "unexpected token")),
            "cwbundle::validation"
        );
    }

    #[test]
    fn test_display_matches_error() {
        let err = BundleError::Render("bad color".to_string());
        assert_eq!(to_reportable(&err).to_string(), "Render error: bad color");
    }

    #[test]
    fn test_help_for_conflicts() {
        let err = BundleError::EntryExists("main.tf".to_string());
        let help = to_reportable(&err).help().unwrap().to_string();
        assert!(help.contains("--on-conflict"));

        let err = BundleError::DuplicateBlob("main.tf".to_string());
        assert!(to_reportable(&err).help().is_none());
    }

    #[test]
    fn test_graphical_report_renders() {
        let err = BundleError::MissingEntry("variables.tf".to_string());
        let mut out = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &to_reportable(&err))
            .unwrap();

        assert!(out.contains("variables.tf"));
        assert!(out.contains("cwbundle::missing_entry"));
    }
}
