/// Alleles shorter than this are embedded literally in the identity string;
/// anything at or above it is replaced by a content hash of the allele.
pub const DEFAULT_ALLELE_HASH_THRESHOLD: usize = 50;

/// Identity pattern used to enumerate remediation candidates: matches when at
/// least one lowercase ASCII letter appears within either allele-encoding
/// segment of `<chr>_<start>_<refEnc>_<altEnc>`. Hash-encoded segments are
/// rendered as lowercase hex, so this pattern deliberately over-matches them;
/// the literal validator rejects such false positives.
pub const CANDIDATE_ID_PATTERN: &str = r"^[A-Za-z0-9_.]+_[0-9]+_(?:[A-Za-z0-9]*[a-z][A-Za-z0-9]*_[A-Za-z0-9]*|[A-Za-z0-9]*_[A-Za-z0-9]*[a-z][A-Za-z0-9]*)$";

/// Subdirectory of the working directory holding per-store reject lists.
pub const NON_MERGED_CANDIDATES_DIR: &str = "non_merged_candidates";

/// File names a store directory is expected to contain.
pub const VARIANTS_FILE_NAME: &str = "variants.json";
pub const FILES_FILE_NAME: &str = "files.json";

pub const DEFAULT_NUM_THREADS: usize = 1;
