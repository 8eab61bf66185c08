//! The zip archive that mirrors the bundle directory.
//!
//! Entries are stored by basename and are unique by name. Registering new
//! entries appends them in place, so existing entries stay byte-identical.
//! When an entry with the same name is registered again, the
//! [`ConflictPolicy`] decides what happens:
//!
//! - [`ConflictPolicy::Replace`] rebuilds the archive in a temporary file next
//!   to it, raw-copying untouched entries, and atomically renames it over the
//!   original.
//! - [`ConflictPolicy::Keep`] leaves the existing entry and skips the new one.
//! - [`ConflictPolicy::Fail`] aborts before the archive is modified.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{debug, info};
use serde::Deserialize;
use tempfile::NamedTempFile;
use zip::{
    CompressionMethod, ZipArchive, ZipWriter,
    result::ZipError,
    write::{FileOptions, SimpleFileOptions},
};

use cwbundle_core::blob::Blob;

use crate::BundleError;

/// What to do when an entry with the same name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Overwrite the existing entry with the new content
    #[default]
    Replace,
    /// Keep the existing entry and skip the new one
    Keep,
    /// Abort without touching the archive
    Fail,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "keep" => Ok(Self::Keep),
            "fail" => Ok(Self::Fail),
            _ => Err(format!(
                "invalid conflict policy `{s}`, valid values: replace, keep, fail"
            )),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Replace => "replace",
            Self::Keep => "keep",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// Compression method for new entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Self::Deflated => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }

    fn file_options(self) -> SimpleFileOptions {
        FileOptions::default()
            .compression_method(self.method())
            .unix_permissions(0o644)
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deflated" => Ok(Self::Deflated),
            "stored" => Ok(Self::Stored),
            _ => Err(format!(
                "invalid compression `{s}`, valid values: deflated, stored"
            )),
        }
    }
}

/// An entry waiting to be registered in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Creates an entry holding a blob's content under the blob's name.
    pub fn from_blob(blob: &Blob) -> Self {
        Self::new(blob.name(), blob.as_bytes())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// What a [`Archive::register`] call did with each entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterOutcome {
    added: Vec<String>,
    replaced: Vec<String>,
    kept: Vec<String>,
}

impl RegisterOutcome {
    /// Entries that did not exist before.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Existing entries whose content was overwritten.
    pub fn replaced(&self) -> &[String] {
        &self.replaced
    }

    /// Existing entries left untouched under [`ConflictPolicy::Keep`].
    pub fn kept(&self) -> &[String] {
        &self.kept
    }
}

/// A zip archive on disk.
///
/// The handle only stores the path; the file is opened for each operation
/// and closed before it returns.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    /// Binds to an archive path. The file is not created until entries are registered.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the archive path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the archive file exists and is non-empty.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
    }

    /// Returns the entry names in archive order. A missing archive has no entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive exists but cannot be read.
    pub fn entry_names(&self) -> Result<Vec<String>, BundleError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let reader = self.reader()?;
        Ok(reader.file_names().map(str::to_string).collect())
    }

    /// Returns the number of entries.
    pub fn len(&self) -> Result<usize, BundleError> {
        if !self.exists() {
            return Ok(0);
        }
        Ok(self.reader()?.len())
    }

    /// Returns `true` if the archive has no entries.
    pub fn is_empty(&self) -> Result<bool, BundleError> {
        Ok(self.len()? == 0)
    }

    /// Reads the content of the named entry.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::MissingEntry`] if there is no such entry.
    pub fn read_entry(&self, name: &str) -> Result<Vec<u8>, BundleError> {
        if !self.exists() {
            return Err(BundleError::MissingEntry(name.to_string()));
        }

        let mut reader = self.reader()?;
        let mut file = reader.by_name(name).map_err(|err| match err {
            ZipError::FileNotFound => BundleError::MissingEntry(name.to_string()),
            other => BundleError::Archive(other),
        })?;

        let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Registers entries, creating the archive if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - two entries in `entries` share a name
    /// - `policy` is [`ConflictPolicy::Fail`] and an entry already exists
    /// - the archive cannot be read or written
    pub fn register(
        &self,
        entries: &[ArchiveEntry],
        policy: ConflictPolicy,
        compression: Compression,
    ) -> Result<RegisterOutcome, BundleError> {
        let mut seen = HashSet::new();
        for entry in entries {
            if !seen.insert(entry.name()) {
                return Err(BundleError::DuplicateBlob(entry.name().to_string()));
            }
        }

        let existing: HashSet<String> = self.entry_names()?.into_iter().collect();
        let (colliding, fresh): (Vec<&ArchiveEntry>, Vec<&ArchiveEntry>) = entries
            .iter()
            .partition(|entry| existing.contains(entry.name()));

        let mut outcome = RegisterOutcome {
            added: fresh.iter().map(|entry| entry.name().to_string()).collect(),
            ..RegisterOutcome::default()
        };

        let options = compression.file_options();
        match policy {
            ConflictPolicy::Fail => {
                if let Some(entry) = colliding.first() {
                    return Err(BundleError::EntryExists(entry.name().to_string()));
                }
                self.append(&fresh, options)?;
            }
            ConflictPolicy::Keep => {
                outcome.kept = colliding.iter().map(|e| e.name().to_string()).collect();
                self.append(&fresh, options)?;
            }
            ConflictPolicy::Replace if colliding.is_empty() => {
                self.append(&fresh, options)?;
            }
            ConflictPolicy::Replace => {
                outcome.replaced = colliding.iter().map(|e| e.name().to_string()).collect();
                self.rebuild(entries, options)?;
            }
        }

        info!(
            archive:? = self.path,
            added = outcome.added.len(),
            replaced = outcome.replaced.len(),
            kept = outcome.kept.len();
            "Archive updated"
        );

        Ok(outcome)
    }

    fn reader(&self) -> Result<ZipArchive<File>, BundleError> {
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(file)?)
    }

    /// Appends entries that do not exist yet, leaving existing ones untouched.
    fn append(
        &self,
        entries: &[&ArchiveEntry],
        options: SimpleFileOptions,
    ) -> Result<(), BundleError> {
        if entries.is_empty() {
            debug!(archive:? = self.path; "Nothing to append");
            return Ok(());
        }

        let mut writer = if self.exists() {
            let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
            ZipWriter::new_append(file)?
        } else {
            self.ensure_parent_dir()?;
            debug!(archive:? = self.path; "Creating archive");
            ZipWriter::new(File::create(&self.path)?)
        };

        for entry in entries {
            debug!(entry = entry.name(), size = entry.data().len(); "Appending entry");
            writer.start_file(entry.name(), options)?;
            writer.write_all(entry.data())?;
        }

        writer.finish()?;
        Ok(())
    }

    /// Rewrites the archive with `entries` taking the place of same-named entries.
    ///
    /// Untouched entries are raw-copied in their original order. Replaced
    /// entries keep their position; new entries go at the end.
    fn rebuild(
        &self,
        entries: &[ArchiveEntry],
        options: SimpleFileOptions,
    ) -> Result<(), BundleError> {
        let mut pending: HashMap<&str, &ArchiveEntry> =
            entries.iter().map(|entry| (entry.name(), entry)).collect();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir)?;
        debug!(archive:? = self.path, tmp:? = tmp.path(); "Rebuilding archive");

        let mut reader = self.reader()?;
        let mut writer = ZipWriter::new(tmp);

        for idx in 0..reader.len() {
            let file = reader.by_index_raw(idx)?;
            match pending.remove(file.name()) {
                Some(entry) => {
                    debug!(entry = entry.name(); "Replacing entry");
                    drop(file);
                    writer.start_file(entry.name(), options)?;
                    writer.write_all(entry.data())?;
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        // Remaining entries are new; keep the caller's order
        for entry in entries {
            if pending.remove(entry.name()).is_some() {
                debug!(entry = entry.name(); "Appending entry");
                writer.start_file(entry.name(), options)?;
                writer.write_all(entry.data())?;
            }
        }

        let tmp = writer.finish()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn ensure_parent_dir(&self) -> Result<(), BundleError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
