//! Writes blobs into the bundle directory and mirrors them into the archive.
//!
//! A run is a straight-line sequence: check the batch against the archive,
//! ensure the directory, write the files, then register them in the archive
//! in one session. Entries are read back from disk, so every written file and
//! its archive entry hold the same bytes.

use std::{collections::HashSet, fs, path::PathBuf};

use log::{debug, info};

use cwbundle_core::blob::Blob;

use crate::{
    BundleError,
    archive::{Archive, ArchiveEntry, ConflictPolicy},
    catalog::Stage,
    config::BundleConfig,
};

/// What one writer run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    written: Vec<PathBuf>,
    added: Vec<String>,
    replaced: Vec<String>,
    kept: Vec<String>,
}

impl WriteReport {
    /// Files written to the bundle directory, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Archive entries that did not exist before.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Archive entries whose content was overwritten.
    pub fn replaced(&self) -> &[String] {
        &self.replaced
    }

    /// Archive entries left as they were.
    pub fn kept(&self) -> &[String] {
        &self.kept
    }
}

/// Persists blobs as files and registers them in the bundle archive.
#[derive(Debug, Clone, Default)]
pub struct BundleWriter {
    config: BundleConfig,
}

impl BundleWriter {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Returns the archive the writer registers files in.
    pub fn archive(&self) -> Archive {
        Archive::open(self.config.archive())
    }

    /// Writes a single blob and registers it.
    ///
    /// # Errors
    ///
    /// See [`BundleWriter::write_all`].
    pub fn write_and_register(&self, blob: &Blob) -> Result<WriteReport, BundleError> {
        self.write_all(&[blob])
    }

    /// Writes every blob of one stage.
    pub fn write_stage(&self, stage: Stage) -> Result<WriteReport, BundleError> {
        info!(stage:%; "Writing stage");
        self.write_all(stage.blobs())
    }

    /// Writes the blobs of several stages in one archive session.
    ///
    /// Stages are written in the order given; repeated stages are written once.
    pub fn write_stages(&self, stages: &[Stage]) -> Result<WriteReport, BundleError> {
        let mut seen = HashSet::new();
        let blobs: Vec<&Blob> = stages
            .iter()
            .filter(|stage| seen.insert(**stage))
            .inspect(|stage| info!(stage:%; "Writing stage"))
            .flat_map(|stage| stage.blobs().iter().copied())
            .collect();
        self.write_all(&blobs)
    }

    /// Writes blobs to the bundle directory and registers them in the archive.
    ///
    /// The batch is checked before anything touches disk: every name must be
    /// a plain file name and unique in the batch, and names already in the
    /// archive are resolved by the conflict policy. Under `fail` a collision
    /// aborts the run with the directory untouched. Under `keep` the colliding
    /// files are not written, so both their archive entry and the file on disk
    /// stay as they were. Under `replace` every file is overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a blob name is empty or contains a path component ([`BundleError::InvalidBlobName`])
    /// - two blobs share a name ([`BundleError::DuplicateBlob`])
    /// - the directory or archive cannot be written ([`BundleError::Io`])
    /// - the existing archive is corrupt ([`BundleError::Archive`])
    /// - an entry exists and the conflict policy is `fail` ([`BundleError::EntryExists`])
    pub fn write_all(&self, blobs: &[&Blob]) -> Result<WriteReport, BundleError> {
        check_batch(blobs)?;

        let archive = self.archive();
        let policy = self.config.on_conflict();
        let existing: HashSet<String> = archive.entry_names()?.into_iter().collect();
        let skip = |blob: &Blob| policy == ConflictPolicy::Keep && existing.contains(blob.name());
        let fails = |blob: &Blob| policy == ConflictPolicy::Fail && existing.contains(blob.name());
        if let Some(blob) = blobs.iter().find(|blob| fails(**blob)) {
            return Err(BundleError::EntryExists(blob.name().to_string()));
        }

        let directory = self.config.directory();
        fs::create_dir_all(directory)?;
        debug!(directory:?; "Bundle directory ready");

        let mut written = Vec::with_capacity(blobs.len());
        let mut entries = Vec::with_capacity(blobs.len());
        for blob in blobs {
            if skip(*blob) {
                debug!(name = blob.name(); "Entry kept, file left as is");
                entries.push(ArchiveEntry::from_blob(blob));
                continue;
            }

            let path = directory.join(blob.name());
            fs::write(&path, blob.as_bytes())?;
            info!(name = blob.name(), path:?, size = blob.as_bytes().len(); "Blob written");

            entries.push(ArchiveEntry::new(blob.name(), fs::read(&path)?));
            written.push(path);
        }

        let outcome = archive.register(&entries, policy, self.config.compression())?;

        Ok(WriteReport {
            written,
            added: outcome.added().to_vec(),
            replaced: outcome.replaced().to_vec(),
            kept: outcome.kept().to_vec(),
        })
    }
}

fn check_batch(blobs: &[&Blob]) -> Result<(), BundleError> {
    let mut names = HashSet::with_capacity(blobs.len());
    for blob in blobs {
        if !blob.has_valid_name() {
            return Err(BundleError::InvalidBlobName(blob.name().to_string()));
        }
        if !names.insert(blob.name()) {
            return Err(BundleError::DuplicateBlob(blob.name().to_string()));
        }
    }
    Ok(())
}
