use crate::{
    core::variant::ProvenanceKey,
    error::{VrxError, VrxResult},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::BufReader,
    path::Path,
};

/// One physical-file descriptor in the external provenance catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub sid: String,
    pub fid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The externally owned file-provenance catalog, reduced to the one query the
/// classifier needs: how many physical files exist per `(sid, fid)` pair.
/// A count above one signals ambiguous provenance.
pub trait FileCatalog {
    fn count_physical_files(
        &self,
        pairs: &BTreeSet<ProvenanceKey>,
    ) -> VrxResult<BTreeMap<ProvenanceKey, usize>>;
}

/// In-memory catalog, loaded from a JSON document array or built directly in
/// tests. Read-only.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entries: Vec<CatalogEntry>,
}

impl MemoryCatalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Loads the catalog from a JSON array of file documents. A missing file
    /// is treated as an empty catalog: every probed pair then counts zero
    /// physical files, the same answer an empty collection would give.
    pub fn from_json_file(path: &Path) -> VrxResult<Self> {
        if !path.exists() {
            log::warn!(
                "File catalog {} not found, treating catalog as empty",
                path.display()
            );
            return Ok(Self::default());
        }
        let reader = BufReader::new(File::open(path)?);
        let entries: Vec<CatalogEntry> =
            serde_json::from_reader(reader).map_err(|e| VrxError::StoreDocument {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }
}

impl FileCatalog for MemoryCatalog {
    fn count_physical_files(
        &self,
        pairs: &BTreeSet<ProvenanceKey>,
    ) -> VrxResult<BTreeMap<ProvenanceKey, usize>> {
        let mut counts: BTreeMap<ProvenanceKey, usize> =
            pairs.iter().map(|pair| (pair.clone(), 0)).collect();
        for entry in &self.entries {
            let pair = ProvenanceKey::new(entry.sid.clone(), entry.fid.clone());
            if let Some(count) = counts.get_mut(&pair) {
                *count += 1;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, sid: &str, fid: &str) -> CatalogEntry {
        serde_json::from_value(json!({"_id": id, "sid": sid, "fid": fid, "fname": format!("{id}.vcf.gz")}))
            .expect("catalog fixture should deserialize")
    }

    #[test]
    fn test_counts_group_by_pair() {
        let catalog = MemoryCatalog::from_entries(vec![
            entry("file_31", "sid31", "fid31"),
            entry("file_31_1", "sid31", "fid31"),
            entry("file_41", "sid41", "fid41"),
        ]);

        let pairs: BTreeSet<ProvenanceKey> = [
            ProvenanceKey::new("sid31", "fid31"),
            ProvenanceKey::new("sid41", "fid41"),
            ProvenanceKey::new("sid99", "fid99"),
        ]
        .into_iter()
        .collect();

        let counts = catalog.count_physical_files(&pairs).unwrap();
        assert_eq!(counts[&ProvenanceKey::new("sid31", "fid31")], 2);
        assert_eq!(counts[&ProvenanceKey::new("sid41", "fid41")], 1);
        assert_eq!(counts[&ProvenanceKey::new("sid99", "fid99")], 0);
    }

    #[test]
    fn test_entries_outside_the_probe_are_ignored() {
        let catalog = MemoryCatalog::from_entries(vec![entry("file_41", "sid41", "fid41")]);
        let pairs: BTreeSet<ProvenanceKey> =
            [ProvenanceKey::new("sid31", "fid31")].into_iter().collect();
        let counts = catalog.count_physical_files(&pairs).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&ProvenanceKey::new("sid31", "fid31")], 0);
    }

    #[test]
    fn test_missing_catalog_file_is_empty() {
        let catalog =
            MemoryCatalog::from_json_file(Path::new("/nonexistent/files.json")).unwrap();
        let counts = catalog.count_physical_files(&BTreeSet::new()).unwrap();
        assert!(counts.is_empty());
    }
}
