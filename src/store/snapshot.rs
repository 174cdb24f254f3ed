//! The JSON snapshot file the command line tool loads stores from and
//! persists them back to.

use std::fs;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::admin::ApiClient;
use crate::admin::User;
use crate::page::Page;
use crate::page::PageId;
use crate::redirect::Redirect;
use crate::track::hit::Hit;

/// A persisted sticky assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// The visitor key the assignment belongs to.
    pub visitor: String,

    /// The variant group, keyed by its parent page.
    pub group: PageId,

    /// The assigned variant.
    pub variant: PageId,

    /// When the assignment stops being honored.
    pub expires_at: DateTime<Utc>,
}

/// Everything a store file holds.
#[derive(Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All pages, variants and translations included.
    #[serde(default)]
    pub pages: Vec<Page>,

    /// Tracked redirect links.
    #[serde(default)]
    pub redirects: Vec<Redirect>,

    /// User accounts.
    #[serde(default)]
    pub users: Vec<User>,

    /// API client credentials.
    #[serde(default)]
    pub clients: Vec<ApiClient>,

    /// Recorded hits, oldest first.
    #[serde(default)]
    pub hits: Vec<Hit>,

    /// Sticky visitor assignments.
    #[serde(default)]
    pub assignments: Vec<AssignmentRecord>,
}

impl Snapshot {
    /// Attempts to read a [`Snapshot`] from a file.
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Snapshot> {
        let path = filepath.as_ref();
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Attempts to write the [`Snapshot`] to a file.
    pub fn write(&self, filepath: impl AsRef<Path>) -> Result<(), io::Error> {
        let mut file = File::create(filepath.as_ref())?;
        let output = serde_json::to_string_pretty(&self).expect("snapshot serializes");
        file.write_all(output.as_bytes())?;

        Ok(())
    }
}
