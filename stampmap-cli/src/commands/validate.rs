//! Inspect and validate a mapping file.

use crate::error::{CliError, CliResult};
use stampmap_core::{artifact, mapping, FieldRecord};
use std::path::PathBuf;

pub fn execute(path: PathBuf) -> CliResult<()> {
    if !path.exists() {
        return Err(CliError::file_not_found(path));
    }

    // The filename itself should follow the artifact scheme; a mismatch is
    // worth a note but not an error.
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match artifact::decode(name) {
            Some(d) => match artifact::validate(&d) {
                Ok(()) => log::debug!("filename role: {}", d.artifact),
                Err(e) => println!("note: filename does not validate: {e}"),
            },
            None => println!("note: filename is not in the artifact naming scheme"),
        }
    }

    let doc = mapping::load(&path)?;

    println!("Mapping: {}", path.display());
    if let Some(source) = &doc.template_source {
        println!("Template source: {source}");
    }
    if let Some(hash) = &doc.template_sha256 {
        println!("Template fingerprint: {hash}");
    }
    println!("Font: {} at {}pt", doc.font.as_deref().unwrap_or("default"), doc.font_size());
    println!("Fields: {} ({} placed)", doc.len(), doc.placed_count());

    for field in &doc.fields {
        let status = if field.is_placed() { "placed" } else { "unplaced" };
        let shape = match field {
            FieldRecord::Text(_) => "text",
            FieldRecord::BooleanPair(_) => "boolean-pair",
        };
        println!("  {:24} {:12} {}", field.id(), shape, status);
    }

    let duplicates = doc.duplicate_ids();
    if !duplicates.is_empty() {
        println!("Warning: duplicate field ids (last wins): {}", duplicates.join(", "));
    }

    Ok(())
}
