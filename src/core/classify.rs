use crate::{
    core::{
        identity::IdentityCodec,
        variant::{HgvsEntry, ProvenanceKey, VariantRecord},
    },
    error::VrxResult,
    store::{catalog::FileCatalog, variant_store::MergePatch},
};
use std::collections::BTreeSet;

/// Terminal outcome of classifying one validated candidate against the store.
///
/// Carries everything the merger needs to act, computed from a snapshot of
/// the colliding record at lookup time.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No record under the canonical identity: rewrite the candidate in place.
    Rewrite {
        source_id: String,
        record: VariantRecord,
    },
    /// Collision with disjoint provenance: append all of the candidate's
    /// entries to the canonical record, then delete the candidate.
    FullMerge {
        source_id: String,
        target_id: String,
        patch: MergePatch,
    },
    /// Collision with overlapping but unambiguous provenance: append only the
    /// entries outside the shared pairs, then delete the candidate.
    PartialMerge {
        source_id: String,
        target_id: String,
        patch: MergePatch,
    },
    /// A shared pair maps to more than one physical file: nothing can be
    /// merged safely. Both records are left untouched.
    Unresolvable { pairs: Vec<ProvenanceKey> },
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Rewrite { .. } => "REWRITE",
            Resolution::FullMerge { .. } => "FULL_MERGE",
            Resolution::PartialMerge { .. } => "PARTIAL_MERGE",
            Resolution::Unresolvable { .. } => "UNRESOLVABLE",
        }
    }
}

/// Classifies a validated candidate against the record currently stored under
/// its canonical identity, if any.
///
/// The provenance catalog is only consulted when provenance overlaps; a
/// catalog failure therefore surfaces as `CatalogUnavailable` and means the
/// candidate cannot be classified this run.
pub fn classify(
    codec: &IdentityCodec,
    candidate: &VariantRecord,
    existing: Option<&VariantRecord>,
    catalog: &dyn FileCatalog,
) -> VrxResult<Resolution> {
    let target = match existing {
        None => {
            return Ok(Resolution::Rewrite {
                source_id: candidate.id.clone(),
                record: candidate.canonical_rewrite(codec),
            });
        }
        Some(target) => target,
    };

    let candidate_pairs = candidate.provenance_keys();
    let target_pairs = target.provenance_keys();
    let common: BTreeSet<ProvenanceKey> = candidate_pairs
        .intersection(&target_pairs)
        .cloned()
        .collect();

    if common.is_empty() {
        return Ok(Resolution::FullMerge {
            source_id: candidate.id.clone(),
            target_id: target.id.clone(),
            patch: MergePatch {
                files: candidate.canonical_files(),
                hgvs: canonical_hgvs_patch(candidate, target),
                st: candidate.canonical_stats(),
            },
        });
    }

    let counts = catalog.count_physical_files(&common)?;
    let ambiguous: Vec<ProvenanceKey> = common
        .iter()
        .filter(|pair| counts.get(*pair).copied().unwrap_or(0) > 1)
        .cloned()
        .collect();
    if !ambiguous.is_empty() {
        return Ok(Resolution::Unresolvable { pairs: ambiguous });
    }

    let files = candidate
        .canonical_files()
        .into_iter()
        .filter(|file| !common.contains(&file.provenance()))
        .collect();
    let st = candidate
        .canonical_stats()
        .into_iter()
        .filter(|stat| !common.contains(&stat.provenance()))
        .collect();

    Ok(Resolution::PartialMerge {
        source_id: candidate.id.clone(),
        target_id: target.id.clone(),
        patch: MergePatch {
            files,
            hgvs: canonical_hgvs_patch(candidate, target),
            st,
        },
    })
}

/// The canonical HGVS entry to append to the target, unless an equal
/// canonical name is already present there.
fn canonical_hgvs_patch(candidate: &VariantRecord, target: &VariantRecord) -> Vec<HgvsEntry> {
    let name = candidate.canonical_hgvs_name();
    if target.hgvs_names().any(|existing| existing == name) {
        vec![]
    } else {
        vec![HgvsEntry::genomic(name)]
    }
}
