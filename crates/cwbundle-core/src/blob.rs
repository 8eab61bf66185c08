//! Named text payloads that make up a bundle.
//!
//! A [`Blob`] is the unit the bundle writer works with: a target filename,
//! the literal content to write, and a [`BlobFormat`] tag. Blobs are never
//! parsed while being written; the format tag only drives validation and
//! lets archive readers classify entries by extension.
//!
//! # Example
//!
//! ```
//! # use cwbundle_core::blob::{Blob, BlobFormat};
//! let blob = Blob::from_static("main.tf", "provider \"aws\" {}\n", BlobFormat::Hcl);
//! assert_eq!(blob.name(), "main.tf");
//! assert_eq!(blob.format(), BlobFormat::Hcl);
//! ```

use std::{borrow::Cow, fmt, path::Path, str};

/// The content format of a [`Blob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobFormat {
    /// Terraform configuration in HashiCorp Configuration Language
    Hcl,
    /// JSON document
    Json,
    /// SVG image
    Svg,
}

impl BlobFormat {
    /// Returns the canonical file extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Hcl => "tf",
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }

    /// Infers the format from a file name's extension.
    ///
    /// Returns `None` for unknown or missing extensions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cwbundle_core::blob::BlobFormat;
    /// assert_eq!(BlobFormat::from_file_name("memory_scaling.tf"), Some(BlobFormat::Hcl));
    /// assert_eq!(BlobFormat::from_file_name("cwagent-config.json"), Some(BlobFormat::Json));
    /// assert_eq!(BlobFormat::from_file_name("README"), None);
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "tf" | "hcl" => Some(Self::Hcl),
            "json" => Some(Self::Json),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

impl str::FromStr for BlobFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hcl" => Ok(Self::Hcl),
            "json" => Ok(Self::Json),
            "svg" => Ok(Self::Svg),
            _ => Err(format!(
                "invalid blob format `{s}`, valid values: hcl, json, svg"
            )),
        }
    }
}

impl fmt::Display for BlobFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hcl => "hcl",
            Self::Json => "json",
            Self::Svg => "svg",
        };
        f.write_str(name)
    }
}

/// A named, static text payload written verbatim to a file.
///
/// Blobs are immutable once constructed. The catalog's blobs borrow
/// `'static` template text; rendered blobs (such as the diagram) own theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    name: Cow<'static, str>,
    content: Cow<'static, str>,
    format: BlobFormat,
}

impl Blob {
    /// Creates a blob from owned or borrowed parts.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        content: impl Into<Cow<'static, str>>,
        format: BlobFormat,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            format,
        }
    }

    /// Creates a blob that borrows `'static` name and content.
    pub const fn from_static(
        name: &'static str,
        content: &'static str,
        format: BlobFormat,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            content: Cow::Borrowed(content),
            format,
        }
    }

    /// Returns the target file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the literal file content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Returns the format tag.
    pub fn format(&self) -> BlobFormat {
        self.format
    }

    /// Returns `true` if the name is a plain file name.
    ///
    /// A valid name is non-empty, contains no path separators and is not a
    /// `.` or `..` component. Only such names can be stored by basename in
    /// the archive and written inside the bundle directory.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cwbundle_core::blob::{Blob, BlobFormat};
    /// assert!(Blob::from_static("main.tf", "", BlobFormat::Hcl).has_valid_name());
    /// assert!(!Blob::from_static("../main.tf", "", BlobFormat::Hcl).has_valid_name());
    /// assert!(!Blob::from_static("", "", BlobFormat::Hcl).has_valid_name());
    /// ```
    pub fn has_valid_name(&self) -> bool {
        let name = self.name();
        !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
    }
}
