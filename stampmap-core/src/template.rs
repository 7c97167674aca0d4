//! Data-template generation
//!
//! Derives a skeleton data set from a finished mapping: one example value
//! per field id, chosen by a deterministic rule table over field kind and
//! id pattern. Downstream form-filling consumes the (id, value) pairs; the
//! XML wrapper is a convenience serialization of the same list.

use crate::types::{FieldRecord, MappingDocument, TextKind, RESERVED_USER_FIELD};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Value the anonymous-user entry is always forced to.
pub const USER_SENTINEL: &str = ".anonymous";

const DATE_EXAMPLE: &str = "01.01.2025 00:00:00";
const GENERIC_EXAMPLE: &str = "[Beispiel-Wert]";

/// Ordered id-pattern rules, matched against the lowercased field id.
/// First hit wins; extend freely but keep the table deterministic.
const ID_RULES: &[(&str, &str)] = &[
    ("^wert2$", "fünfhundert"),
    ("betrag|wert|summe|eur", "500,00 €"),
    ("^stnr2?$|steuernummer", "103/123/4567"),
    ("^finamt2?$|finanzamt", "Finanzamt Düsseldorf-Nord"),
    ("^zeitraum$|jahr", "2022"),
    ("^ort_?datum$", "Erkrath, 29.10.2025"),
    ("datum", DATE_EXAMPLE),
    (
        "^zwecke$|^zwecke2b2$",
        "Förderung der Erziehung (§ 52 Abs. 2 S. 1 Nr. 7 AO)",
    ),
    ("^zwecke2b$", "§ 5 Abs. 1 Nr 9 KStG"),
    ("^name$", "Marcel Reichl, Waldstraße 20, 40699 Erkrath, Deutschland"),
    (
        "^aussteller$",
        "KiTa Märchenland, Liliencronstraße 63, 40472 Düsseldorf",
    ),
];

fn compiled_rules() -> &'static Vec<(Regex, &'static str)> {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        ID_RULES
            .iter()
            .map(|(pattern, value)| (Regex::new(pattern).expect("valid rule pattern"), *value))
            .collect()
    })
}

/// Deterministic example value for one field.
pub fn example_value(field: &FieldRecord) -> &'static str {
    let id = field.id().to_lowercase();

    if id == RESERVED_USER_FIELD.to_lowercase() {
        return USER_SENTINEL;
    }

    match field {
        FieldRecord::BooleanPair(_) => return "true",
        FieldRecord::Text(t) => {
            if t.kind == TextKind::Date {
                return DATE_EXAMPLE;
            }
            if t.kind == TextKind::Checkbox {
                return "true";
            }
        }
    }

    for (re, value) in compiled_rules() {
        if re.is_match(&id) {
            return value;
        }
    }
    GENERIC_EXAMPLE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub id: String,
    pub value: String,
}

/// The generated data template: the document identity plus one entry per
/// field id, anonymous-user entry first, the rest sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTemplate {
    pub form_number: String,
    pub entries: Vec<TemplateEntry>,
}

impl DataTemplate {
    /// Render the template in the downstream filler's XML dialect.
    pub fn to_xml(&self) -> String {
        let mut elements: Vec<String> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            elements.push(format!(
                "\t\t\t<element id=\"{}\">{}</element>",
                xml_escape(&entry.id),
                xml_escape(&entry.value)
            ));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <xml-data xmlns=\"http://www.lucom.com/ffw/xml-data-1.0.xsd\">\n\
             \t<form>catalog://Steuerformulare/gemein/{}</form>\n\
             \t<instance>\n\
             \t\t<datarow>\n\
             {}\n\
             \t\t</datarow>\n\
             \t</instance>\n\
             </xml-data>",
            self.form_number,
            elements.join("\n")
        )
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Derive the data template for a mapping.
///
/// Field order in the mapping is irrelevant here: output is the forced
/// anonymous-user entry followed by all other ids sorted lexicographically.
/// Same mapping and form number always yield an identical template.
pub fn generate(doc: &MappingDocument, form_number: &str) -> DataTemplate {
    let mut named: Vec<&FieldRecord> = doc
        .fields
        .iter()
        .filter(|f| !f.id().is_empty() && f.id() != RESERVED_USER_FIELD)
        .collect();
    named.sort_by(|a, b| a.id().cmp(b.id()));

    let mut entries = Vec::with_capacity(named.len() + 1);
    entries.push(TemplateEntry {
        id: RESERVED_USER_FIELD.to_string(),
        value: USER_SENTINEL.to_string(),
    });
    for field in named {
        entries.push(TemplateEntry {
            id: field.id().to_string(),
            value: example_value(field).to_string(),
        });
    }

    DataTemplate {
        form_number: form_number.to_string(),
        entries,
    }
}

/// Six-digit document number from a template source filename (e.g.
/// `034122_mit.pdf`) or a combined form id (e.g. `034122-geldspende`).
pub fn extract_form_number(candidates: &[&str]) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^([0-9]{6})").expect("valid regex"));
    candidates
        .iter()
        .find_map(|c| re.captures(c).map(|m| m[1].to_string()))
}
