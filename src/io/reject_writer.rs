use crate::{constants::NON_MERGED_CANDIDATES_DIR, core::variant::ProvenanceKey, error::VrxResult};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// Durable, append-only reject list for one store: every ambiguous
/// `(sid, fid)` pair is recorded as one line for manual follow-up. The engine
/// writes this file and never reads it back.
#[derive(Debug)]
pub struct RejectWriter {
    path: PathBuf,
}

impl RejectWriter {
    pub fn new(working_dir: &Path, store_id: &str) -> Self {
        Self {
            path: working_dir
                .join(NON_MERGED_CANDIDATES_DIR)
                .join(format!("{store_id}.txt")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, pairs: &[ProvenanceKey]) -> VrxResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for pair in pairs {
            writeln!(file, "{pair}")?;
        }
        file.sync_all()?;
        Ok(())
    }
}
