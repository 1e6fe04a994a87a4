use crate::{
    core::variant::{FileAnnotation, HgvsEntry, StatEntry, VariantRecord},
    error::VrxResult,
};
use regex::Regex;
use std::collections::BTreeSet;

/// Entries to append to a canonical record's arrays. Append order within each
/// array follows the order of the entries here; the target's existing entries
/// always precede them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergePatch {
    pub files: Vec<FileAnnotation>,
    pub hgvs: Vec<HgvsEntry>,
    pub st: Vec<StatEntry>,
}

impl MergePatch {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.hgvs.is_empty() && self.st.is_empty()
    }

    /// Idempotence guard: drops entries the target already carries, by
    /// `(sid, fid)` for `files`/`st` and by name for `hgvs`. Re-applying a
    /// patch after a crash between write and delete must not double-append.
    pub fn retain_missing_from(&mut self, target: &VariantRecord) {
        let file_pairs: BTreeSet<_> = target.files.iter().map(|f| f.provenance()).collect();
        let stat_pairs: BTreeSet<_> = target.st.iter().map(|s| s.provenance()).collect();
        let names: BTreeSet<&str> = target.hgvs_names().collect();

        self.files.retain(|f| !file_pairs.contains(&f.provenance()));
        self.st.retain(|s| !stat_pairs.contains(&s.provenance()));
        self.hgvs.retain(|h| !names.contains(h.name.as_str()));
    }
}

/// One-pass cursor over candidate records. Ordering is unspecified and the
/// cursor is a snapshot: store mutations issued while draining it do not
/// invalidate it.
pub type ScanCursor = Box<dyn Iterator<Item = VariantRecord>>;

/// The externally owned variant document store, reduced to the operations the
/// remediation engine needs: identity-pattern scan, exact-identity lookup,
/// insert, field-array append, and delete-by-identity.
pub trait VariantStore {
    fn scan_candidates(&self, pattern: &Regex) -> VrxResult<ScanCursor>;
    fn find_by_id(&self, id: &str) -> VrxResult<Option<VariantRecord>>;
    fn insert(&mut self, record: VariantRecord) -> VrxResult<()>;
    fn append_fields(&mut self, id: &str, patch: MergePatch) -> VrxResult<()>;
    fn delete_by_id(&mut self, id: &str) -> VrxResult<()>;
}
