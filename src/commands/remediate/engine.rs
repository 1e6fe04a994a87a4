use super::merger;
use crate::{
    core::{
        classify::classify,
        identity::IdentityCodec,
        scanner::CandidateScanner,
        variant::VariantRecord,
    },
    error::VrxError,
    io::reject_writer::RejectWriter,
    store::{catalog::FileCatalog, variant_store::VariantStore},
    utils::util::Result,
};
use std::fmt;

/// Per-candidate outcome, one log entry each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rewrite,
    FullMerge,
    PartialMerge,
    Unresolvable,
    /// Scanner false positive rejected by the literal validator.
    InvalidCandidate,
    /// Could not be classified this run (provenance catalog unavailable);
    /// left untouched and retried on the next run.
    Deferred,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Rewrite => "REWRITE",
            Outcome::FullMerge => "FULL_MERGE",
            Outcome::PartialMerge => "PARTIAL_MERGE",
            Outcome::Unresolvable => "UNRESOLVABLE",
            Outcome::InvalidCandidate => "INVALID_CANDIDATE",
            Outcome::Deferred => "DEFERRED",
        }
    }
}

/// Candidate counts for one store run. `failed` counts candidates aborted by
/// store operation errors; those make the overall invocation exit non-zero,
/// unresolvable conflicts and deferrals do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rewritten: usize,
    pub full_merged: usize,
    pub partial_merged: usize,
    pub unresolvable: usize,
    pub invalid_candidates: usize,
    pub deferred: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn candidates(&self) -> usize {
        self.rewritten
            + self.full_merged
            + self.partial_merged
            + self.unresolvable
            + self.invalid_candidates
            + self.deferred
            + self.failed
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Rewrite => self.rewritten += 1,
            Outcome::FullMerge => self.full_merged += 1,
            Outcome::PartialMerge => self.partial_merged += 1,
            Outcome::Unresolvable => self.unresolvable += 1,
            Outcome::InvalidCandidate => self.invalid_candidates += 1,
            Outcome::Deferred => self.deferred += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} candidate(s): {} rewritten, {} fully merged, {} partially merged, \
             {} unresolvable, {} invalid, {} deferred, {} failed",
            self.candidates(),
            self.rewritten,
            self.full_merged,
            self.partial_merged,
            self.unresolvable,
            self.invalid_candidates,
            self.deferred,
            self.failed
        )
    }
}

/// Drives scan, validation, classification and merge for one store.
///
/// Candidates are handled one at a time: two different candidates that
/// canonicalize to the same identity are therefore never in flight
/// concurrently, so the first one establishes the canonical record and the
/// second one observes the collision.
pub struct RemediationEngine<'a, S: VariantStore, C: FileCatalog> {
    store: &'a mut S,
    catalog: &'a C,
    reporter: RejectWriter,
    codec: IdentityCodec,
    scanner: CandidateScanner,
    store_id: String,
}

impl<'a, S: VariantStore, C: FileCatalog> RemediationEngine<'a, S, C> {
    pub fn new(
        store: &'a mut S,
        catalog: &'a C,
        reporter: RejectWriter,
        codec: IdentityCodec,
        scanner: CandidateScanner,
        store_id: &str,
    ) -> Self {
        Self {
            store,
            catalog,
            reporter,
            codec,
            scanner,
            store_id: store_id.to_string(),
        }
    }

    /// One full pass over the store. A store operation failure aborts only
    /// the candidate that hit it; the pass continues with the next one.
    pub fn run(&mut self) -> Result<RunSummary> {
        let cursor = self.store.scan_candidates(self.scanner.pattern())?;
        let mut summary = RunSummary::default();

        for candidate in cursor {
            let candidate_id = candidate.id.clone();
            match self.process_candidate(candidate) {
                Ok(outcome) => {
                    log::info!(
                        "Store {}: candidate {} -> {}",
                        self.store_id,
                        candidate_id,
                        outcome.label()
                    );
                    summary.record(outcome);
                }
                Err(e) => {
                    log::error!(
                        "Store {}: candidate {} failed: {}",
                        self.store_id,
                        candidate_id,
                        e
                    );
                    summary.failed += 1;
                }
            }
        }

        if summary.candidates() == 0 {
            log::info!("No candidate found in store: {}", self.store_id);
        }
        Ok(summary)
    }

    fn process_candidate(&mut self, candidate: VariantRecord) -> Result<Outcome> {
        if !candidate.has_lowercase_allele() {
            log::warn!(
                "Store {}: variant {} is not a valid candidate",
                self.store_id,
                candidate.id
            );
            return Ok(Outcome::InvalidCandidate);
        }

        let new_id = self.codec.canonical_id(
            &candidate.chr,
            candidate.start,
            &candidate.reference,
            &candidate.alternate,
        );
        // snapshot of the colliding record at lookup time
        let existing = self.store.find_by_id(&new_id)?;

        let resolution = match classify(&self.codec, &candidate, existing.as_ref(), self.catalog) {
            Ok(resolution) => resolution,
            Err(VrxError::CatalogUnavailable { message }) => {
                log::warn!(
                    "Store {}: deferring candidate {}: {}",
                    self.store_id,
                    candidate.id,
                    message
                );
                return Ok(Outcome::Deferred);
            }
            Err(e) => return Err(e),
        };

        log::debug!(
            "Store {}: candidate {} classified as {}",
            self.store_id,
            candidate.id,
            resolution.label()
        );
        merger::apply(self.store, &self.reporter, resolution)
    }
}
