//! Derive the data template from a finished mapping.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use stampmap_core::{mapping, template};
use std::path::PathBuf;

fn is_form_number(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn execute(
    config: &Config,
    mapping_path: PathBuf,
    out: Option<PathBuf>,
    form_number: Option<String>,
) -> CliResult<()> {
    if !mapping_path.exists() {
        return Err(CliError::file_not_found(mapping_path));
    }
    let doc = mapping::load(&mapping_path)?;
    if doc.is_empty() {
        return Err(CliError::validation("mapping contains no fields"));
    }

    let file_name = mapping_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    let candidates: Vec<&str> = [
        doc.template_source.as_deref(),
        doc.template.as_deref(),
        Some(file_name),
    ]
    .into_iter()
    .flatten()
    .collect();

    let number = form_number
        .or_else(|| template::extract_form_number(&candidates))
        .or_else(|| config.template.fallback_form_number.clone())
        .ok_or_else(|| {
            CliError::validation("unable to determine the document number; pass --form-number")
        })?;
    if !is_form_number(&number) {
        return Err(CliError::validation(format!(
            "document number must be six digits, got {number:?}"
        )));
    }

    let data_template = template::generate(&doc, &number);
    log::info!(
        "generated template for {} with {} entries",
        number,
        data_template.entries.len()
    );

    let xml = data_template.to_xml();
    match out {
        Some(path) => {
            std::fs::write(&path, &xml)?;
            println!("Template written to {}", path.display());
        }
        None => println!("{xml}"),
    }
    Ok(())
}
