use crate::constants::DEFAULT_ALLELE_HASH_THRESHOLD;
use sha1::{Digest, Sha1};

/// Encodes and decodes the composite variant identity
/// `<chr>_<start>_<refEnc>_<altEnc>`.
///
/// Allele segments below the hash threshold are embedded literally; longer
/// alleles are replaced by a SHA-1 digest of the exact-case allele string,
/// rendered as 40 lowercase hex characters. The digest of a lowercase allele
/// and the digest of its uppercase form are unrelated byte sequences, so
/// canonicalization always recomputes the hash from the uppercased literal
/// rather than transforming an existing hash.
#[derive(Debug, Clone)]
pub struct IdentityCodec {
    hash_threshold: usize,
}

impl Default for IdentityCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ALLELE_HASH_THRESHOLD)
    }
}

impl IdentityCodec {
    pub fn new(hash_threshold: usize) -> Self {
        Self { hash_threshold }
    }

    /// SHA-1 digest of `data`, hex-rendered. Case-sensitive by construction.
    pub fn content_hash(data: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(data.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Identity encoding of a single allele, preserving its case.
    pub fn encode_allele(&self, allele: &str) -> String {
        if allele.len() < self.hash_threshold {
            allele.to_string()
        } else {
            Self::content_hash(allele)
        }
    }

    /// Identity encoding of the canonical (uppercased) form of an allele.
    pub fn canonical_allele(&self, allele: &str) -> String {
        let upper = allele.to_ascii_uppercase();
        if upper.len() < self.hash_threshold {
            upper
        } else {
            Self::content_hash(&upper)
        }
    }

    /// Canonical identity for the given coordinates and literal alleles.
    pub fn canonical_id(&self, chr: &str, start: u64, reference: &str, alternate: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            chr,
            start,
            self.canonical_allele(reference),
            self.canonical_allele(alternate)
        )
    }

}

/// Human-readable genomic HGVS name for a variant, e.g. `chr1:g.11111111A>G`.
/// Always embeds the full literal alleles, never their hashed encodings.
pub fn hgvs_name(chr: &str, start: u64, reference: &str, alternate: &str) -> String {
    format!("{}:g.{}{}>{}", chr, start, reference, alternate)
}
