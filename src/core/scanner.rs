use crate::{constants::CANDIDATE_ID_PATTERN, error::VrxResult};
use regex::Regex;

/// Identity pattern test used to enumerate remediation candidates.
///
/// Matches an identity whose allele-encoding segments contain at least one
/// lowercase ASCII letter. Purely textual: hash-encoded segments are lowercase
/// hex and therefore match even when the underlying alleles are already
/// uppercase. Such false positives are expected and rejected downstream by the
/// literal validator.
#[derive(Debug, Clone)]
pub struct CandidateScanner {
    pattern: Regex,
}

impl CandidateScanner {
    pub fn new() -> VrxResult<Self> {
        Self::with_pattern(CANDIDATE_ID_PATTERN)
    }

    pub fn with_pattern(pattern: &str) -> VrxResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn matches(&self, id: &str) -> bool {
        self.pattern.is_match(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IdentityCodec;

    #[test]
    fn test_candidate_pattern() {
        let lower_hash = IdentityCodec::content_hash(&"a".repeat(50));
        let upper_hash = IdentityCodec::content_hash(&"A".repeat(50));
        let test_ids = [
            ("chr1_77777777_a_g".to_string(), true),
            ("chr1_77777777_a_".to_string(), true),
            ("chr1_77777777__g".to_string(), true),
            ("chr1_77777777_AcG_AgT".to_string(), true),
            ("chr1_77777777__AgT".to_string(), true),
            ("chr1_77777777_AcG_".to_string(), true),
            ("chr1_77777777_cAG_gAT".to_string(), true),
            ("chr1_77777777_AGc_ATg".to_string(), true),
            // hashed segments are lowercase hex: expected false positives
            (format!("chr1_77777777_{lower_hash}_{lower_hash}"), true),
            (format!("chr1_77777777_{upper_hash}_{upper_hash}"), true),
            (format!("chr1_77777777_A_{upper_hash}"), true),
            ("chr1_77777777_A_G".to_string(), false),
            ("chr1_77777777_A_".to_string(), false),
            ("chr1_77777777__G".to_string(), false),
            ("chr1_77777777_ACT_CTG".to_string(), false),
            // lowercase outside the allele segments does not qualify
            ("chr1_GL456210_77777777_A_G".to_string(), false),
            ("chr1_77777777_555_555".to_string(), false),
        ];

        let scanner = CandidateScanner::new().unwrap();
        for (id, expected) in test_ids {
            assert_eq!(scanner.matches(&id), expected, "pattern test failed for {id}");
        }
    }
}
