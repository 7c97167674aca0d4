use serde::{Deserialize, Serialize};

/// Coordinates are document-space points: origin bottom-left, Y up.
pub type DocUnit = f64;

/// Field id reserved for the anonymous submitting user. Records carrying it
/// are metadata, not placeable fields, and are stripped from the editable
/// set on load.
pub const RESERVED_USER_FIELD: &str = "ID_USER";

/// Stamping font size used when the mapping does not declare one.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

fn default_page() -> u32 {
    1
}

/// Rendering kind of a simple (single-point) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Text,
    Date,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
}

/// A single-point field: one stamped value at (x, y), optionally with a
/// declared stamp width and per-field font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub id: String,
    pub page: u32,
    pub kind: TextKind,
    pub x: Option<DocUnit>,
    pub y: Option<DocUnit>,
    pub width: Option<DocUnit>,
    pub font_size: Option<f64>,
    pub align: Option<Align>,
}

impl TextField {
    pub fn align(&self) -> Align {
        self.align.unwrap_or(Align::Left)
    }

    pub fn is_placed(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

/// A true/false field: two independent stamp points, one per outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanPairField {
    pub id: String,
    pub page: u32,
    pub x_true: Option<DocUnit>,
    pub y_true: Option<DocUnit>,
    pub x_false: Option<DocUnit>,
    pub y_false: Option<DocUnit>,
}

impl BooleanPairField {
    pub fn true_slot_placed(&self) -> bool {
        self.x_true.is_some() && self.y_true.is_some()
    }

    pub fn false_slot_placed(&self) -> bool {
        self.x_false.is_some() && self.y_false.is_some()
    }

    pub fn is_placed(&self) -> bool {
        self.true_slot_placed() && self.false_slot_placed()
    }
}

/// One placeable element of a mapping document.
///
/// The wire format is the duck-typed JSON shape of the mapping file (a
/// `type` discriminator with per-shape keys); in memory this is a closed
/// sum so every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawField", into = "RawField")]
pub enum FieldRecord {
    Text(TextField),
    BooleanPair(BooleanPairField),
}

impl FieldRecord {
    pub fn id(&self) -> &str {
        match self {
            FieldRecord::Text(f) => &f.id,
            FieldRecord::BooleanPair(f) => &f.id,
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            FieldRecord::Text(f) => f.page,
            FieldRecord::BooleanPair(f) => f.page,
        }
    }

    /// A field is placed iff every coordinate its shape requires is set.
    pub fn is_placed(&self) -> bool {
        match self {
            FieldRecord::Text(f) => f.is_placed(),
            FieldRecord::BooleanPair(f) => f.is_placed(),
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        FieldRecord::Text(TextField {
            id: id.into(),
            page: 1,
            kind: TextKind::Text,
            x: None,
            y: None,
            width: None,
            font_size: None,
            align: None,
        })
    }

    pub fn boolean_pair(id: impl Into<String>) -> Self {
        FieldRecord::BooleanPair(BooleanPairField {
            id: id.into(),
            page: 1,
            x_true: None,
            y_true: None,
            x_false: None,
            y_false: None,
        })
    }
}

/// Wire-level field shape as found in mapping files. All optional keys are
/// flattened into one struct; the `type` discriminator decides which shape
/// a record takes. Unknown discriminators fail deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawField {
    id: String,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<WireKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    w: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x_true: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y_true: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x_false: Option<DocUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y_false: Option<DocUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum WireKind {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "date_de", alias = "date")]
    Date,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "boolean_pair")]
    BooleanPair,
}

impl From<RawField> for FieldRecord {
    fn from(raw: RawField) -> Self {
        match raw.kind {
            Some(WireKind::BooleanPair) => FieldRecord::BooleanPair(BooleanPairField {
                id: raw.id,
                page: raw.page,
                x_true: raw.x_true,
                y_true: raw.y_true,
                x_false: raw.x_false,
                y_false: raw.y_false,
            }),
            kind => FieldRecord::Text(TextField {
                id: raw.id,
                page: raw.page,
                kind: match kind {
                    Some(WireKind::Date) => TextKind::Date,
                    Some(WireKind::Checkbox) => TextKind::Checkbox,
                    _ => TextKind::Text,
                },
                x: raw.x,
                y: raw.y,
                width: raw.w,
                font_size: raw.size,
                align: raw.align,
            }),
        }
    }
}

impl From<FieldRecord> for RawField {
    fn from(field: FieldRecord) -> Self {
        match field {
            FieldRecord::Text(f) => RawField {
                id: f.id,
                page: f.page,
                kind: Some(match f.kind {
                    TextKind::Text => WireKind::Text,
                    TextKind::Date => WireKind::Date,
                    TextKind::Checkbox => WireKind::Checkbox,
                }),
                x: f.x,
                y: f.y,
                w: f.width,
                size: f.font_size,
                align: f.align,
                x_true: None,
                y_true: None,
                x_false: None,
                y_false: None,
            },
            FieldRecord::BooleanPair(f) => RawField {
                id: f.id,
                page: f.page,
                kind: Some(WireKind::BooleanPair),
                x: None,
                y: None,
                w: None,
                size: None,
                align: None,
                x_true: f.x_true,
                y_true: f.y_true,
                x_false: f.x_false,
                y_false: f.y_false,
            },
        }
    }
}

/// The full field registry for one source document, in canonical field
/// order (insertion order, never re-sorted by the core).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub fields: Vec<FieldRecord>,
}

impl MappingDocument {
    pub fn new(fields: Vec<FieldRecord>) -> Self {
        Self {
            template: None,
            template_sha256: None,
            template_source: None,
            font: None,
            size: None,
            status: None,
            fields,
        }
    }

    /// Document-level stamping font size, falling back to the default.
    pub fn font_size(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&FieldRecord> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut FieldRecord> {
        self.fields.get_mut(index)
    }

    /// Index of the field with the given id. Duplicate ids resolve to the
    /// last occurrence (last write wins, matching the persisted format).
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().rposition(|f| f.id() == id)
    }

    pub fn placed_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_placed()).count()
    }

    pub fn all_placed(&self) -> bool {
        self.fields.iter().all(|f| f.is_placed())
    }

    /// Remove reserved metadata records (the anonymous-user entry) from the
    /// editable set. Returns how many were stripped.
    pub fn strip_reserved(&mut self) -> usize {
        let before = self.fields.len();
        self.fields.retain(|f| f.id() != RESERVED_USER_FIELD);
        before - self.fields.len()
    }

    /// Ids that occur more than once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for f in &self.fields {
            if !seen.insert(f.id()) && !dups.contains(&f.id()) {
                dups.push(f.id());
            }
        }
        dups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_placed() {
        let mut f = FieldRecord::text("name");
        assert!(!f.is_placed());
        if let FieldRecord::Text(t) = &mut f {
            t.x = Some(100.0);
            assert!(!t.is_placed());
            t.y = Some(200.0);
        }
        assert!(f.is_placed());
    }

    #[test]
    fn test_boolean_pair_placed_requires_all_four() {
        let mut pair = BooleanPairField {
            id: "confirm".into(),
            page: 1,
            x_true: Some(30.0),
            y_true: Some(40.0),
            x_false: Some(30.0),
            y_false: Some(10.0),
        };
        assert!(pair.is_placed());

        // Nulling any single coordinate flips placed to false.
        for i in 0..4 {
            let mut p = pair.clone();
            match i {
                0 => p.x_true = None,
                1 => p.y_true = None,
                2 => p.x_false = None,
                _ => p.y_false = None,
            }
            assert!(!p.is_placed());
        }
        pair.y_false = None;
        assert!(!pair.is_placed());
    }

    #[test]
    fn test_wire_roundtrip() {
        let json = r#"{"id":"betrag","page":1,"type":"text","x":120.5,"y":300.0,"w":80.0,"align":"right"}"#;
        let field: FieldRecord = serde_json::from_str(json).unwrap();
        match &field {
            FieldRecord::Text(t) => {
                assert_eq!(t.id, "betrag");
                assert_eq!(t.width, Some(80.0));
                assert_eq!(t.align(), Align::Right);
            }
            _ => panic!("expected text field"),
        }
        let back = serde_json::to_string(&field).unwrap();
        let again: FieldRecord = serde_json::from_str(&back).unwrap();
        assert_eq!(field, again);
    }

    #[test]
    fn test_missing_type_defaults_to_text() {
        let field: FieldRecord = serde_json::from_str(r#"{"id":"ort","page":1}"#).unwrap();
        assert!(matches!(field, FieldRecord::Text(ref t) if t.kind == TextKind::Text));
    }

    #[test]
    fn test_date_alias_accepted() {
        let field: FieldRecord =
            serde_json::from_str(r#"{"id":"datum","page":1,"type":"date"}"#).unwrap();
        assert!(matches!(field, FieldRecord::Text(ref t) if t.kind == TextKind::Date));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result =
            serde_json::from_str::<FieldRecord>(r#"{"id":"x","page":1,"type":"signature"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_boolean_pair_wire_shape() {
        let json = r#"{"id":"zustimmung","page":1,"type":"boolean_pair","x_true":30,"y_true":40}"#;
        let field: FieldRecord = serde_json::from_str(json).unwrap();
        match &field {
            FieldRecord::BooleanPair(p) => {
                assert!(p.true_slot_placed());
                assert!(!p.false_slot_placed());
                assert!(!p.is_placed());
            }
            _ => panic!("expected boolean pair"),
        }
        let out = serde_json::to_string(&field).unwrap();
        assert!(!out.contains("\"x\":"), "pair must not emit simple-field keys: {out}");
    }

    #[test]
    fn test_index_of_prefers_last_duplicate() {
        let mut doc = MappingDocument::new(vec![
            FieldRecord::text("name"),
            FieldRecord::text("datum"),
            FieldRecord::text("name"),
        ]);
        assert_eq!(doc.index_of("name"), Some(2));
        assert_eq!(doc.duplicate_ids(), vec!["name"]);
        if let Some(FieldRecord::Text(t)) = doc.field_mut(2) {
            t.x = Some(1.0);
            t.y = Some(2.0);
        }
        assert_eq!(doc.placed_count(), 1);
    }

    #[test]
    fn test_strip_reserved() {
        let mut doc = MappingDocument::new(vec![
            FieldRecord::text(RESERVED_USER_FIELD),
            FieldRecord::text("name"),
        ]);
        assert_eq!(doc.strip_reserved(), 1);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.fields[0].id(), "name");
    }
}
