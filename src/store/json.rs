use crate::{
    constants::VARIANTS_FILE_NAME,
    core::variant::VariantRecord,
    error::{VrxError, VrxResult},
    store::{
        memory::MemoryStore,
        variant_store::{MergePatch, ScanCursor, VariantStore},
    },
};
use regex::Regex;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// Variant store persisted as a JSON document array at
/// `<store-dir>/variants.json`.
///
/// Every mutating operation flushes to disk before returning, so the engine's
/// write-before-delete ordering survives a process crash: a run interrupted
/// between the write and the delete leaves both documents on disk and the
/// next run re-resolves them.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    pub fn open(store_dir: &Path) -> VrxResult<Self> {
        let path = store_dir.join(VARIANTS_FILE_NAME);
        let reader = BufReader::new(File::open(&path).map_err(|e| VrxError::StoreDocument {
            path: path.clone(),
            message: e.to_string(),
        })?);
        let records: Vec<VariantRecord> =
            serde_json::from_reader(reader).map_err(|e| VrxError::StoreDocument {
                path: path.clone(),
                message: e.to_string(),
            })?;
        log::debug!("Opened store {} with {} records", path.display(), records.len());
        Ok(Self {
            path,
            inner: MemoryStore::from_records(records),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Writes the full record set back, replacing the file atomically so a
    /// crash mid-write cannot truncate the store.
    fn flush(&self) -> VrxResult<()> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let writer = BufWriter::new(File::create(&tmp_path)?);
            let records: Vec<&VariantRecord> = self.inner.records().collect();
            serde_json::to_writer_pretty(writer, &records)?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl VariantStore for JsonStore {
    fn scan_candidates(&self, pattern: &Regex) -> VrxResult<ScanCursor> {
        self.inner.scan_candidates(pattern)
    }

    fn find_by_id(&self, id: &str) -> VrxResult<Option<VariantRecord>> {
        self.inner.find_by_id(id)
    }

    fn insert(&mut self, record: VariantRecord) -> VrxResult<()> {
        self.inner.insert(record)?;
        self.flush()
    }

    fn append_fields(&mut self, id: &str, patch: MergePatch) -> VrxResult<()> {
        self.inner.append_fields(id, patch)?;
        self.flush()
    }

    fn delete_by_id(&mut self, id: &str) -> VrxResult<()> {
        self.inner.delete_by_id(id)?;
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_store(dir: &Path, variants: serde_json::Value) {
        fs::write(
            dir.join(VARIANTS_FILE_NAME),
            serde_json::to_string_pretty(&variants).unwrap(),
        )
        .unwrap();
    }

    fn sample_variants() -> serde_json::Value {
        json!([
            {
                "_id": "chr1_11111111_a_g", "chr": "chr1", "start": 11111111u64, "end": 11111111u64,
                "ref": "a", "alt": "g",
                "files": [{"sid": "sid11", "fid": "fid11"}],
                "hgvs": [{"type": "genomic", "name": "chr1:g.11111111a>g"}],
                "st": [{"maf": 0.11, "mgf": 0.11, "mafAl": "a", "mgfGt": "0/0", "sid": "sid11", "fid": "fid11"}]
            }
        ])
    }

    #[test]
    fn test_open_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, VrxError::StoreDocument { .. }));
    }

    #[test]
    fn test_mutations_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        write_store(dir.path(), sample_variants());

        let mut store = JsonStore::open(dir.path()).unwrap();
        let record = store.find_by_id("chr1_11111111_a_g").unwrap().unwrap();
        let rewritten =
            record.canonical_rewrite(&crate::core::identity::IdentityCodec::default());
        store.insert(rewritten).unwrap();
        store.delete_by_id("chr1_11111111_a_g").unwrap();
        drop(store);

        let reopened = JsonStore::open(dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened
            .find_by_id("chr1_11111111_A_G")
            .unwrap()
            .is_some());
        assert!(reopened
            .find_by_id("chr1_11111111_a_g")
            .unwrap()
            .is_none());
    }
}
