use crate::core::identity::{hgvs_name, IdentityCodec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeSet, fmt};

/// Identifies one file-within-submission contribution to a variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProvenanceKey {
    pub sid: String,
    pub fid: String,
}

impl ProvenanceKey {
    pub fn new(sid: impl Into<String>, fid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            fid: fid.into(),
        }
    }
}

impl fmt::Display for ProvenanceKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "('{}', '{}')", self.sid, self.fid)
    }
}

/// One `files` array entry. Fields the engine does not model are carried
/// through `extra` untouched so a rewrite never drops data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnnotation {
    pub sid: String,
    pub fid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alts: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileAnnotation {
    pub fn provenance(&self) -> ProvenanceKey {
        ProvenanceKey::new(self.sid.clone(), self.fid.clone())
    }

    /// Copy with the allele-bearing `alts` field uppercased.
    pub fn canonicalized(&self) -> Self {
        Self {
            alts: self.alts.as_ref().map(|a| a.to_ascii_uppercase()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HgvsEntry {
    #[serde(rename = "type")]
    pub hgvs_type: String,
    pub name: String,
}

impl HgvsEntry {
    pub fn genomic(name: impl Into<String>) -> Self {
        Self {
            hgvs_type: "genomic".to_string(),
            name: name.into(),
        }
    }
}

/// One `st` (statistics) array entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub maf: f64,
    pub mgf: f64,
    #[serde(rename = "mafAl", skip_serializing_if = "Option::is_none")]
    pub maf_allele: Option<String>,
    #[serde(rename = "mgfGt")]
    pub mgf_genotype: String,
    pub sid: String,
    pub fid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatEntry {
    pub fn provenance(&self) -> ProvenanceKey {
        ProvenanceKey::new(self.sid.clone(), self.fid.clone())
    }

    /// Copy with the allele-bearing `mafAl` field uppercased.
    pub fn canonicalized(&self) -> Self {
        Self {
            maf_allele: self.maf_allele.as_ref().map(|a| a.to_ascii_uppercase()),
            ..self.clone()
        }
    }
}

/// A variant document keyed by the composite identity string
/// `<chr>_<start>_<refEnc>_<altEnc>`. The literal `ref`/`alt` fields are the
/// authoritative case signal; the identity segments may be hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub chr: String,
    pub start: u64,
    pub end: u64,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "alt")]
    pub alternate: String,
    #[serde(default)]
    pub files: Vec<FileAnnotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hgvs: Vec<HgvsEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub st: Vec<StatEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VariantRecord {
    /// Literal validator: true when `ref` or `alt` carries any lowercase
    /// character. Immune to scanner false positives on hashed id segments.
    pub fn has_lowercase_allele(&self) -> bool {
        self.reference.bytes().any(|b| b.is_ascii_lowercase())
            || self.alternate.bytes().any(|b| b.is_ascii_lowercase())
    }

    /// Provenance keys of the `files` array.
    pub fn provenance_keys(&self) -> BTreeSet<ProvenanceKey> {
        self.files.iter().map(FileAnnotation::provenance).collect()
    }

    pub fn hgvs_names(&self) -> impl Iterator<Item = &str> {
        self.hgvs.iter().map(|h| h.name.as_str())
    }

    /// HGVS name of the canonical (uppercased) form of this variant.
    pub fn canonical_hgvs_name(&self) -> String {
        hgvs_name(
            &self.chr,
            self.start,
            &self.reference.to_ascii_uppercase(),
            &self.alternate.to_ascii_uppercase(),
        )
    }

    pub fn canonical_files(&self) -> Vec<FileAnnotation> {
        self.files.iter().map(FileAnnotation::canonicalized).collect()
    }

    pub fn canonical_stats(&self) -> Vec<StatEntry> {
        self.st.iter().map(StatEntry::canonicalized).collect()
    }

    /// Fully canonicalized copy of this record under its canonical identity:
    /// `ref`/`alt` and every allele-bearing array field uppercased, the
    /// lowercase HGVS name replaced by the canonical one (appended only if an
    /// equal canonical name is not already present).
    pub fn canonical_rewrite(&self, codec: &IdentityCodec) -> VariantRecord {
        let new_id = codec.canonical_id(&self.chr, self.start, &self.reference, &self.alternate);
        let old_name = hgvs_name(&self.chr, self.start, &self.reference, &self.alternate);
        let new_name = self.canonical_hgvs_name();

        let mut hgvs: Vec<HgvsEntry> = self
            .hgvs
            .iter()
            .filter(|entry| entry.name != old_name)
            .cloned()
            .collect();
        if !hgvs.iter().any(|entry| entry.name == new_name) {
            hgvs.push(HgvsEntry::genomic(new_name));
        }

        VariantRecord {
            id: new_id,
            reference: self.reference.to_ascii_uppercase(),
            alternate: self.alternate.to_ascii_uppercase(),
            files: self.canonical_files(),
            hgvs,
            st: self.canonical_stats(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> VariantRecord {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn test_provenance_key_display() {
        assert_eq!(
            ProvenanceKey::new("sid31", "fid31").to_string(),
            "('sid31', 'fid31')"
        );
    }

    #[test]
    fn test_has_lowercase_allele() {
        let mut variant = record(json!({
            "_id": "chr1_11111111_a_g", "chr": "chr1", "start": 11111111u64, "end": 11111111u64,
            "ref": "a", "alt": "g"
        }));
        assert!(variant.has_lowercase_allele());

        variant.reference = "A".to_string();
        assert!(variant.has_lowercase_allele());

        variant.alternate = "G".to_string();
        assert!(!variant.has_lowercase_allele());

        variant.reference = "AcG".to_string();
        assert!(variant.has_lowercase_allele());
    }

    #[test]
    fn test_unmodeled_fields_roundtrip() {
        let value = json!({
            "_id": "chr1_11111111_a_g", "chr": "chr1", "start": 11111111u64, "end": 11111111u64,
            "ref": "a", "alt": "g", "len": 1, "type": "SNV",
            "files": [{"sid": "sid11", "fid": "fid11", "samp": {"def": "0|0"}}]
        });
        let variant = record(value.clone());
        assert_eq!(variant.extra["len"], json!(1));
        assert_eq!(variant.files[0].extra["samp"], json!({"def": "0|0"}));
        assert_eq!(serde_json::to_value(&variant).unwrap(), value);
    }

    #[test]
    fn test_canonical_rewrite_swaps_hgvs_name() {
        let variant = record(json!({
            "_id": "chr1_11111111_a_g", "chr": "chr1", "start": 11111111u64, "end": 11111111u64,
            "ref": "a", "alt": "g",
            "files": [{"sid": "sid11", "fid": "fid11", "alts": "g"}],
            "hgvs": [{"type": "genomic", "name": "chr1:g.11111111a>g"}],
            "st": [{"maf": 0.11, "mgf": 0.11, "mafAl": "a", "mgfGt": "0/0", "sid": "sid11", "fid": "fid11"}]
        }));

        let rewritten = variant.canonical_rewrite(&IdentityCodec::default());
        assert_eq!(rewritten.id, "chr1_11111111_A_G");
        assert_eq!(rewritten.reference, "A");
        assert_eq!(rewritten.alternate, "G");
        assert_eq!(rewritten.files[0].alts.as_deref(), Some("G"));
        assert_eq!(
            rewritten.hgvs,
            vec![HgvsEntry::genomic("chr1:g.11111111A>G")]
        );
        assert_eq!(rewritten.st[0].maf_allele.as_deref(), Some("A"));
    }

    #[test]
    fn test_canonical_rewrite_does_not_duplicate_existing_canonical_name() {
        let variant = record(json!({
            "_id": "chr1_11111111_a_g", "chr": "chr1", "start": 11111111u64, "end": 11111111u64,
            "ref": "a", "alt": "g",
            "hgvs": [
                {"type": "genomic", "name": "chr1:g.11111111a>g"},
                {"type": "genomic", "name": "chr1:g.11111111A>G"}
            ]
        }));

        let rewritten = variant.canonical_rewrite(&IdentityCodec::default());
        assert_eq!(
            rewritten.hgvs,
            vec![HgvsEntry::genomic("chr1:g.11111111A>G")]
        );
    }

    #[test]
    fn test_canonical_rewrite_keeps_unrelated_hgvs_entries() {
        let variant = record(json!({
            "_id": "chr6_66666666_a_g", "chr": "chr6", "start": 66666666u64, "end": 66666666u64,
            "ref": "a", "alt": "g",
            "hgvs": [{"type": "genomic", "name": "chr5:g.55555555A>G"}]
        }));

        let rewritten = variant.canonical_rewrite(&IdentityCodec::default());
        assert_eq!(
            rewritten.hgvs,
            vec![
                HgvsEntry::genomic("chr5:g.55555555A>G"),
                HgvsEntry::genomic("chr6:g.66666666A>G"),
            ]
        );
    }
}
