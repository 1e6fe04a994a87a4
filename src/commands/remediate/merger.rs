use super::engine::Outcome;
use crate::{
    core::classify::Resolution,
    io::reject_writer::RejectWriter,
    store::variant_store::{MergePatch, VariantStore},
    utils::util::Result,
};

/// Executes one resolution as a logically atomic unit: construct, write,
/// then delete the source. Write-before-delete keeps a crash between the two
/// operations recoverable; the next run re-classifies the leftover source
/// against the now-existing canonical record.
pub(super) fn apply<S: VariantStore>(
    store: &mut S,
    reporter: &RejectWriter,
    resolution: Resolution,
) -> Result<Outcome> {
    match resolution {
        Resolution::Rewrite { source_id, record } => {
            log::info!("Rewriting {} as {}", source_id, record.id);
            store.insert(record)?;
            store.delete_by_id(&source_id)?;
            Ok(Outcome::Rewrite)
        }
        Resolution::FullMerge {
            source_id,
            target_id,
            patch,
        } => apply_merge(store, &source_id, &target_id, patch, Outcome::FullMerge),
        Resolution::PartialMerge {
            source_id,
            target_id,
            patch,
        } => apply_merge(store, &source_id, &target_id, patch, Outcome::PartialMerge),
        Resolution::Unresolvable { pairs } => {
            for pair in &pairs {
                log::warn!("Ambiguous provenance, recorded for manual review: {pair}");
            }
            reporter.append(&pairs)?;
            Ok(Outcome::Unresolvable)
        }
    }
}

fn apply_merge<S: VariantStore>(
    store: &mut S,
    source_id: &str,
    target_id: &str,
    mut patch: MergePatch,
    outcome: Outcome,
) -> Result<Outcome> {
    // the target may already carry some of the entries if a previous run
    // crashed between append and delete; never append those twice
    if let Some(target) = store.find_by_id(target_id)? {
        patch.retain_missing_from(&target);
    }
    if !patch.is_empty() {
        log::info!(
            "Merging {} into {}: {} file, {} hgvs, {} st entr(ies)",
            source_id,
            target_id,
            patch.files.len(),
            patch.hgvs.len(),
            patch.st.len()
        );
        store.append_fields(target_id, patch)?;
    }
    store.delete_by_id(source_id)?;
    Ok(outcome)
}
