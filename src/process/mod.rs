//! Process metadata and output/input descriptors
//!
//! The response renderer does not own process definitions; it consumes a
//! metadata view plus descriptor collections supplied by the process layer.

mod inout;

pub use inout::{ExecuteInput, ExecuteOutput, InOutError, LiteralInput, LiteralOutput};

use std::fs;
use std::io;
use std::path::PathBuf;

/// Metadata view of the process a response document describes.
#[derive(Debug, Clone)]
pub struct ProcessMetadata {
    /// Process identifier (`ows:Identifier`)
    pub identifier: String,

    /// Human-readable title (`ows:Title`)
    pub title: String,

    /// Optional abstract (`ows:Abstract`)
    pub abstract_text: Option<String>,

    /// Optional profile URI (`ows:Profile`)
    pub profile: Option<String>,

    /// Process version (`wps:processVersion` attribute)
    pub version: String,

    /// Where the status document is persisted on disk
    pub status_location: Option<PathBuf>,

    /// Public URL of the persisted status document
    pub status_url: Option<String>,

    /// The run's temporary working directory, removed on cleanup
    pub workdir: Option<PathBuf>,
}

impl ProcessMetadata {
    /// Create metadata with the required fields.
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ProcessMetadata {
            identifier: identifier.into(),
            title: title.into(),
            abstract_text: None,
            profile: None,
            version: version.into(),
            status_location: None,
            status_url: None,
            workdir: None,
        }
    }

    /// Set the abstract.
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Set the profile URI.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set where the status document is stored and its public URL.
    pub fn with_status_store(
        mut self,
        location: impl Into<PathBuf>,
        url: impl Into<String>,
    ) -> Self {
        self.status_location = Some(location.into());
        self.status_url = Some(url.into());
        self
    }

    /// Set the run's working directory.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    /// Delete the run's temporary working data.
    ///
    /// Idempotent: a missing workdir is not an error.
    pub fn clean(&self) -> io::Result<()> {
        let Some(workdir) = &self.workdir else {
            return Ok(());
        };
        if !workdir.exists() {
            return Ok(());
        }
        tracing::debug!(workdir = %workdir.display(), process = %self.identifier, "removing run workdir");
        fs::remove_dir_all(workdir)
    }
}
