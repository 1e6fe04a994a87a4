use crate::{
    core::variant::VariantRecord,
    error::{VrxError, VrxResult},
    store::variant_store::{MergePatch, ScanCursor, VariantStore},
};
use regex::Regex;
use std::collections::BTreeMap;

/// In-memory variant store. Backs the JSON store and serves as the test
/// double for the document collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, VariantRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<VariantRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VariantRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &VariantRecord> {
        self.records.values()
    }
}

impl VariantStore for MemoryStore {
    fn scan_candidates(&self, pattern: &Regex) -> VrxResult<ScanCursor> {
        let snapshot: Vec<VariantRecord> = self
            .records
            .values()
            .filter(|record| pattern.is_match(&record.id))
            .cloned()
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }

    fn find_by_id(&self, id: &str) -> VrxResult<Option<VariantRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn insert(&mut self, record: VariantRecord) -> VrxResult<()> {
        if self.records.contains_key(&record.id) {
            return Err(VrxError::DuplicateIdentity {
                id: record.id.clone(),
            });
        }
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    fn append_fields(&mut self, id: &str, patch: MergePatch) -> VrxResult<()> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| VrxError::MissingIdentity { id: id.to_string() })?;
        record.files.extend(patch.files);
        record.hgvs.extend(patch.hgvs);
        record.st.extend(patch.st);
        Ok(())
    }

    fn delete_by_id(&mut self, id: &str) -> VrxResult<()> {
        // deleting an absent identity is a no-op, matching delete-by-id
        // semantics of the real store and keeping re-runs convergent
        if self.records.remove(id).is_none() {
            log::debug!("Delete of absent identity {id} ignored");
        }
        Ok(())
    }
}
