use crate::{
    cli::RemediateArgs,
    constants::FILES_FILE_NAME,
    core::{identity::IdentityCodec, scanner::CandidateScanner},
    io::reject_writer::RejectWriter,
    store::{catalog::MemoryCatalog, json::JsonStore},
    utils::util::Result,
};
use rayon::prelude::*;

mod engine;
mod merger;


pub use engine::{Outcome, RemediationEngine, RunSummary};

/// Remediates every named store. Stores are independent and run in parallel
/// on the thread pool; within one store candidates are processed strictly
/// sequentially, which serializes all writers per canonical identity.
pub fn remediate(args: RemediateArgs) -> Result<()> {
    let db_names = args
        .process_db_names()
        .map_err(|error| crate::vrx_error!("{error}"))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .thread_name(|i| format!("vrx-remediate-{i}"))
        .build()
        .map_err(|e| crate::vrx_error!("Failed to initialize remediation thread pool: {e}"))?;

    let results: Vec<(String, Result<RunSummary>)> = pool.install(|| {
        db_names
            .par_iter()
            .map(|db_name| (db_name.clone(), process_store(&args, db_name)))
            .collect()
    });

    let mut failed_candidates = 0;
    let mut failed_stores = Vec::new();
    for (db_name, result) in &results {
        match result {
            Ok(summary) => {
                log::info!("Store {db_name}: {summary}");
                failed_candidates += summary.failed;
            }
            Err(e) => {
                log::error!("Store {db_name}: {e}");
                failed_stores.push(db_name.as_str());
            }
        }
    }

    if !failed_stores.is_empty() {
        return Err(crate::vrx_error!(
            "Remediation aborted for stores: {}",
            failed_stores.join(", ")
        ));
    }
    if failed_candidates > 0 {
        return Err(crate::vrx_error!(
            "{failed_candidates} candidate(s) failed with unclassifiable store errors"
        ));
    }
    Ok(())
}

fn process_store(args: &RemediateArgs, db_name: &str) -> Result<RunSummary> {
    let store_dir = args.data_dir.join(db_name);
    let mut store = JsonStore::open(&store_dir)?;
    let catalog = MemoryCatalog::from_json_file(&store_dir.join(FILES_FILE_NAME))?;
    let reporter = RejectWriter::new(&args.working_dir, db_name);
    let codec = IdentityCodec::new(args.allele_hash_threshold);
    let scanner = CandidateScanner::new()?;

    let mut engine =
        RemediationEngine::new(&mut store, &catalog, reporter, codec, scanner, db_name);
    engine.run()
}
