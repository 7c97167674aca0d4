//! Save a mapping revision under the next free version number.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use stampmap_core::artifact::{self, ArtifactDescriptor, ArtifactKind};
use stampmap_core::mapping;
use std::path::PathBuf;

/// Split a combined form id like `034122-geldspende-verein` into the
/// document number and the short name.
fn split_form_id(form_id: &str) -> CliResult<(&str, &str)> {
    form_id
        .split_once('-')
        .filter(|(_, short)| !short.is_empty())
        .ok_or_else(|| {
            CliError::validation(format!(
                "form id must be <number>-<short-name>, got {form_id:?}"
            ))
        })
}

pub fn execute(
    config: &Config,
    mapping_path: PathBuf,
    dir: PathBuf,
    form_id: String,
    auto: bool,
) -> CliResult<()> {
    if !mapping_path.exists() {
        return Err(CliError::file_not_found(mapping_path));
    }
    let doc = mapping::load(&mapping_path)?;

    let (number, short_name) = split_form_id(&form_id)?;
    let kind = if auto {
        ArtifactKind::AutoMapping
    } else {
        ArtifactKind::ManualMapping
    };
    let probe = ArtifactDescriptor::new(number, short_name, kind, Some(1), "json");
    artifact::validate(&probe).map_err(|e| CliError::invalid_artifact(e.to_string()))?;

    std::fs::create_dir_all(&dir)?;
    let existing: Vec<String> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    let version = artifact::next_version(
        existing.iter().map(String::as_str),
        number,
        short_name,
        kind,
    );

    let versioned = artifact::encode(&ArtifactDescriptor::new(
        number,
        short_name,
        kind,
        Some(version),
        "json",
    ));
    mapping::save(dir.join(&versioned), &doc)?;
    println!("Mapping saved: {versioned}");

    if config.save.write_current {
        let current = artifact::encode(&ArtifactDescriptor::new(
            number,
            short_name,
            ArtifactKind::CurrentMapping,
            None,
            "json",
        ));
        mapping::save(dir.join(&current), &doc)?;
        log::info!("refreshed current copy: {current}");
    }
    Ok(())
}
