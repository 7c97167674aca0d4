//! Classify the files of a form directory by their artifact names.

use crate::error::{CliError, CliResult};
use stampmap_core::artifact;
use std::path::PathBuf;

fn list_files(dir: &PathBuf) -> CliResult<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

pub fn execute(dir: PathBuf) -> CliResult<()> {
    if !dir.is_dir() {
        return Err(CliError::file_not_found(dir));
    }
    let files = list_files(&dir)?;

    for name in &files {
        match artifact::decode(name) {
            Some(d) => {
                let version = d.version.map(|v| format!(" v{v}")).unwrap_or_default();
                match artifact::validate(&d) {
                    Ok(()) => println!("{name}: {} for {}{version}", d.artifact, d.document_number),
                    Err(e) => println!("{name}: decodes but invalid ({e})"),
                }
            }
            None => println!("{name}: not in the naming scheme"),
        }
    }

    let roles = artifact::classify_roles(&files);
    println!();
    println!("Blank template:  {}", roles.blank_template.as_deref().unwrap_or("missing"));
    println!("Filled example:  {}", roles.filled_example.as_deref().unwrap_or("missing"));
    println!("Example data:    {}", roles.example_data.as_deref().unwrap_or("missing"));
    Ok(())
}
