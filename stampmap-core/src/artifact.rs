//! Artifact naming codec
//!
//! Stored files around a form are identified by role through a flat naming
//! scheme: `{documentNumber}-{shortName}-{artifact}[-vN].{extension}`.
//! Decoding is purely structural and never fails with an error (callers
//! fall back to keyword heuristics); validation against the closed artifact
//! vocabulary is a separate, stricter check.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// The closed vocabulary of roles a stored file can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    BlankTemplate,
    FilledExample,
    ExampleData,
    AutoMapping,
    ManualMapping,
    CurrentMapping,
    ExportPdf,
    ExportJson,
    ExportXml,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 9] = [
        ArtifactKind::BlankTemplate,
        ArtifactKind::FilledExample,
        ArtifactKind::ExampleData,
        ArtifactKind::AutoMapping,
        ArtifactKind::ManualMapping,
        ArtifactKind::CurrentMapping,
        ArtifactKind::ExportPdf,
        ArtifactKind::ExportJson,
        ArtifactKind::ExportXml,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            ArtifactKind::BlankTemplate => "blank-template",
            ArtifactKind::FilledExample => "filled-example",
            ArtifactKind::ExampleData => "example-data",
            ArtifactKind::AutoMapping => "auto-mapping",
            ArtifactKind::ManualMapping => "manual-mapping",
            ArtifactKind::CurrentMapping => "current-mapping",
            ArtifactKind::ExportPdf => "export-pdf",
            ArtifactKind::ExportJson => "export-json",
            ArtifactKind::ExportXml => "export-xml",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.token() == token)
    }

    /// Conventional file extension for files playing this role.
    pub fn default_extension(&self) -> &'static str {
        match self {
            ArtifactKind::BlankTemplate | ArtifactKind::FilledExample | ArtifactKind::ExportPdf => {
                "pdf"
            }
            ArtifactKind::ExampleData | ArtifactKind::ExportXml => "xml",
            ArtifactKind::AutoMapping
            | ArtifactKind::ManualMapping
            | ArtifactKind::CurrentMapping
            | ArtifactKind::ExportJson => "json",
        }
    }
}

/// Structured form of a stored file's name.
///
/// `artifact` is kept as the raw token so that structurally well-formed
/// names with unknown roles still decode; [`validate`] rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub document_number: String,
    pub short_name: String,
    pub artifact: String,
    pub version: Option<u32>,
    pub extension: String,
}

impl ArtifactDescriptor {
    pub fn new(
        document_number: impl Into<String>,
        short_name: impl Into<String>,
        kind: ArtifactKind,
        version: Option<u32>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            document_number: document_number.into(),
            short_name: short_name.into(),
            artifact: kind.token().to_string(),
            version,
            extension: extension.into(),
        }
    }

    /// The artifact token resolved against the closed vocabulary.
    pub fn kind(&self) -> Option<ArtifactKind> {
        ArtifactKind::from_token(&self.artifact)
    }
}

/// Validation failures for a decoded descriptor. Distinct from a decode
/// failure: decode answers "is this structurally the scheme at all",
/// validate answers "is every part legal".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    #[error("document number must be exactly six digits: {0:?}")]
    InvalidDocumentNumber(String),

    #[error("short name must not be empty")]
    EmptyShortName,

    #[error("unknown artifact kind: {0:?}")]
    UnknownArtifact(String),

    #[error("version must be a positive integer, got v{0}")]
    InvalidVersion(u32),

    #[error("extension must not be empty")]
    EmptyExtension,
}

fn document_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"))
}

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v[0-9]+$").expect("valid regex"))
}

/// Join a descriptor back into its flat filename.
pub fn encode(d: &ArtifactDescriptor) -> String {
    let mut stem = format!("{}-{}-{}", d.document_number, d.short_name, d.artifact);
    if let Some(v) = d.version {
        stem.push_str(&format!("-v{v}"));
    }
    format!("{}.{}", stem, d.extension)
}

/// Structural decode of a filename. Returns `None` on any structural
/// failure; callers treat that as "unparseable, fall back to heuristics".
///
/// The stem splits on `-` into at least three segments: document number,
/// one or more short-name segments, and the artifact. A trailing `vN`
/// segment is the version. Artifact tokens are themselves hyphenated, so
/// a two-segment suffix matching the vocabulary is preferred over the bare
/// last segment; a short name whose tail happens to spell a vocabulary
/// token is therefore absorbed into the artifact (known ambiguity of the
/// scheme).
pub fn decode(filename: &str) -> Option<ArtifactDescriptor> {
    let (stem, extension) = filename.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = stem.split('-').collect();
    if parts.len() < 3 {
        return None;
    }

    let version = match parts.last() {
        Some(last) if version_re().is_match(last) => {
            let v = last[1..].parse::<u32>().ok()?;
            parts.pop();
            Some(v)
        }
        _ => None,
    };
    if parts.len() < 3 {
        return None;
    }

    let artifact_len = if parts.len() >= 4 {
        let two = format!("{}-{}", parts[parts.len() - 2], parts[parts.len() - 1]);
        if ArtifactKind::from_token(&two).is_some() {
            2
        } else {
            1
        }
    } else {
        1
    };
    let artifact = parts[parts.len() - artifact_len..].join("-");
    let short_name = parts[1..parts.len() - artifact_len].join("-");

    Some(ArtifactDescriptor {
        document_number: parts[0].to_string(),
        short_name,
        artifact,
        version,
        extension: extension.to_string(),
    })
}

/// Strict check of a descriptor against the scheme's invariants.
pub fn validate(d: &ArtifactDescriptor) -> Result<(), ArtifactError> {
    if !document_number_re().is_match(&d.document_number) {
        return Err(ArtifactError::InvalidDocumentNumber(
            d.document_number.clone(),
        ));
    }
    if d.short_name.is_empty() {
        return Err(ArtifactError::EmptyShortName);
    }
    if d.kind().is_none() {
        return Err(ArtifactError::UnknownArtifact(d.artifact.clone()));
    }
    if let Some(0) = d.version {
        return Err(ArtifactError::InvalidVersion(0));
    }
    if d.extension.is_empty() {
        return Err(ArtifactError::EmptyExtension);
    }
    Ok(())
}

/// Decode and validate in one step.
pub fn decode_valid(filename: &str) -> Option<ArtifactDescriptor> {
    let d = decode(filename)?;
    validate(&d).ok()?;
    Some(d)
}

/// Role assignment for the baseline files of one form directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    pub blank_template: Option<String>,
    pub filled_example: Option<String>,
    pub example_data: Option<String>,
}

fn find_by_kind<'a>(files: &'a [String], kind: ArtifactKind, extension: &str) -> Option<&'a str> {
    files
        .iter()
        .map(String::as_str)
        .find(|f| decode_valid(f).is_some_and(|d| d.kind() == Some(kind) && d.extension == extension))
}

fn has_keyword(name: &str, keyword: &str) -> bool {
    name.to_lowercase().contains(keyword)
}

fn is_pdf(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Classify a directory listing into the baseline roles (blank form,
/// filled example, example data) without reading file contents.
///
/// Schema decode is always attempted first; legacy files that never got
/// renamed fall back to the historical keyword conventions.
pub fn classify_roles(files: &[String]) -> RoleAssignment {
    let blank_template = find_by_kind(files, ArtifactKind::BlankTemplate, "pdf")
        .or_else(|| {
            files
                .iter()
                .map(String::as_str)
                .find(|f| is_pdf(f) && has_keyword(f, "leer"))
        })
        .or_else(|| {
            files
                .iter()
                .map(String::as_str)
                .find(|f| is_pdf(f) && has_keyword(f, "ohne") && !has_keyword(f, "voll"))
        });

    let filled_example = find_by_kind(files, ArtifactKind::FilledExample, "pdf")
        .or_else(|| {
            files
                .iter()
                .map(String::as_str)
                .find(|f| is_pdf(f) && has_keyword(f, "voll"))
        })
        .or_else(|| {
            files
                .iter()
                .map(String::as_str)
                .find(|f| is_pdf(f) && has_keyword(f, "mit"))
        });

    let example_data = find_by_kind(files, ArtifactKind::ExampleData, "xml").or_else(|| {
        files
            .iter()
            .map(String::as_str)
            .find(|f| f.to_lowercase().ends_with(".xml"))
    });

    RoleAssignment {
        blank_template: blank_template.map(str::to_string),
        filled_example: filled_example.map(str::to_string),
        example_data: example_data.map(str::to_string),
    }
}

/// Next free revision number for a saved mapping: one past the highest
/// existing version of the same document/short-name/artifact, starting at
/// 1. Monotonic per document, unlike suffixes derived from wall-clock
/// time.
pub fn next_version<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    document_number: &str,
    short_name: &str,
    kind: ArtifactKind,
) -> u32 {
    existing
        .into_iter()
        .filter_map(decode)
        .filter(|d| {
            d.document_number == document_number
                && d.short_name == short_name
                && d.artifact == kind.token()
        })
        .filter_map(|d| d.version)
        .max()
        .map_or(1, |v| v + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ArtifactDescriptor {
        ArtifactDescriptor::new(
            "034122",
            "spendenbescheinigung-geld",
            ArtifactKind::BlankTemplate,
            None,
            "pdf",
        )
    }

    #[test]
    fn test_encode_concrete() {
        assert_eq!(
            encode(&descriptor()),
            "034122-spendenbescheinigung-geld-blank-template.pdf"
        );
    }

    #[test]
    fn test_decode_roundtrip() {
        let d = descriptor();
        assert_eq!(decode(&encode(&d)), Some(d));
    }

    #[test]
    fn test_roundtrip_with_version() {
        let d = ArtifactDescriptor::new(
            "034122",
            "geldspende-verein",
            ArtifactKind::AutoMapping,
            Some(3),
            "json",
        );
        let name = encode(&d);
        assert_eq!(name, "034122-geldspende-verein-auto-mapping-v3.json");
        assert_eq!(decode(&name), Some(d));
    }

    #[test]
    fn test_roundtrip_all_kinds() {
        for kind in ArtifactKind::ALL {
            let d = ArtifactDescriptor::new("123456", "kurz", kind, Some(7), kind.default_extension());
            let back = decode(&encode(&d)).expect("decode");
            assert_eq!(back, d);
            assert_eq!(back.kind(), Some(kind));
        }
    }

    #[test]
    fn test_decode_structural_failures() {
        assert_eq!(decode("no_extension"), None);
        assert_eq!(decode("only-two.pdf"), None);
        assert_eq!(decode(".pdf"), None);
        assert_eq!(decode("a-b-c."), None);
        // Version suffix eats a segment; too little remains.
        assert_eq!(decode("034122-x-v2.json"), None);
    }

    #[test]
    fn test_decode_without_validation() {
        // Five-digit number: structurally fine, semantically invalid.
        let d = decode("12345-x-blank-template.pdf").expect("structural decode succeeds");
        assert_eq!(d.document_number, "12345");
        assert_eq!(d.short_name, "x");
        assert_eq!(d.artifact, "blank-template");
        assert_eq!(
            validate(&d),
            Err(ArtifactError::InvalidDocumentNumber("12345".into()))
        );
        assert_eq!(decode_valid("12345-x-blank-template.pdf"), None);
    }

    #[test]
    fn test_validate_unknown_artifact() {
        let d = decode("034122-kurz-something.pdf").unwrap();
        assert_eq!(d.artifact, "something");
        assert_eq!(
            validate(&d),
            Err(ArtifactError::UnknownArtifact("something".into()))
        );
    }

    #[test]
    fn test_validate_version_zero() {
        let mut d = descriptor();
        d.version = Some(0);
        assert_eq!(validate(&d), Err(ArtifactError::InvalidVersion(0)));
    }

    #[test]
    fn test_decode_prefers_vocabulary_suffix() {
        // A short name whose tail spells a vocabulary token is absorbed
        // into the artifact. Documented ambiguity of the flat scheme.
        let d = decode("034122-spende-blank-template.pdf").unwrap();
        assert_eq!(d.short_name, "spende");
        assert_eq!(d.artifact, "blank-template");
    }

    #[test]
    fn test_extension_splits_on_last_dot() {
        let d = decode("034122-kurz.name-blank-template.pdf").unwrap();
        assert_eq!(d.extension, "pdf");
        assert_eq!(d.short_name, "kurz.name");
    }

    #[test]
    fn test_classify_by_schema_first() {
        let files = vec![
            "034122-geld-blank-template.pdf".to_string(),
            "034122-geld-filled-example.pdf".to_string(),
            "034122-geld-example-data.xml".to_string(),
            "notes.txt".to_string(),
        ];
        let roles = classify_roles(&files);
        assert_eq!(roles.blank_template.as_deref(), Some("034122-geld-blank-template.pdf"));
        assert_eq!(roles.filled_example.as_deref(), Some("034122-geld-filled-example.pdf"));
        assert_eq!(roles.example_data.as_deref(), Some("034122-geld-example-data.xml"));
    }

    #[test]
    fn test_classify_keyword_fallback() {
        let files = vec![
            "Formular_leer.pdf".to_string(),
            "Formular_voll.PDF".to_string(),
            "kita-maerchenland.xml".to_string(),
        ];
        let roles = classify_roles(&files);
        assert_eq!(roles.blank_template.as_deref(), Some("Formular_leer.pdf"));
        assert_eq!(roles.filled_example.as_deref(), Some("Formular_voll.PDF"));
        assert_eq!(roles.example_data.as_deref(), Some("kita-maerchenland.xml"));
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify_roles(&[]), RoleAssignment::default());
    }

    #[test]
    fn test_next_version_monotonic() {
        let existing = [
            "034122-geld-manual-mapping-v1.json",
            "034122-geld-manual-mapping-v4.json",
            "034122-geld-auto-mapping-v9.json",
            "999999-other-manual-mapping-v7.json",
            "unrelated.txt",
        ];
        assert_eq!(
            next_version(existing, "034122", "geld", ArtifactKind::ManualMapping),
            5
        );
        assert_eq!(
            next_version([], "034122", "geld", ArtifactKind::ManualMapping),
            1
        );
    }
}
