use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::classfile::ClassHeader;
use crate::descriptor::{self, DescriptorEntry, JSON_FILE, PROPERTIES_FILE};
use crate::matcher::{PatternSet, RelocationMap};
use crate::scan;

/// Inputs of one descriptor generation run, as resolved by the caller.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Folder of compiled classes; may be unset or nonexistent.
    pub classes_dir: Option<PathBuf>,
    /// Jar dependencies, scanned before the classes folder, in this order.
    pub jars: Vec<PathBuf>,
    pub extends_patterns: Vec<String>,
    pub implements_patterns: Vec<String>,
    /// Prefix pattern -> replacement, applied first match wins in this order.
    pub relocations: Vec<(String, String)>,
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub set_name: String,
    /// Output root; its previous content is replaced wholesale on every run.
    pub output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutcome {
    pub output_dir: String,
    pub scanned_jars: usize,
    pub scanned_class_files: usize,
    pub matched_classes: usize,
    pub duration_ms: u64,
}

/// Generates `reflection-config.json` and `native-image.properties` under
/// `{output}/META-INF/native-image/{group}/{artifact}/{set_name}`.
///
/// Jar-derived entries come first, then classes-folder entries; within each
/// group the configured jar order and archive entry order are kept. Duplicate
/// class names across sources are kept as-is.
pub fn generate(config: &GenerateConfig) -> Result<GenerateOutcome> {
    let start = Instant::now();

    let extends = PatternSet::compile(&config.extends_patterns)?;
    let implements = PatternSet::compile(&config.implements_patterns)?;
    let relocations = RelocationMap::compile(&config.relocations)?;

    let base_dir = config
        .output_dir
        .join("META-INF")
        .join("native-image")
        .join(&config.group)
        .join(&config.artifact)
        .join(&config.set_name);

    eprintln!(
        "[reflect-config] generating reflection configuration in {}",
        base_dir.display()
    );

    if config.output_dir.exists() {
        fs::remove_dir_all(&config.output_dir).with_context(|| {
            format!("could not clear output directory '{}'", config.output_dir.display())
        })?;
    }
    fs::create_dir_all(&base_dir)
        .with_context(|| format!("could not create directory '{}'", base_dir.display()))?;

    let mut matched = Vec::new();

    for jar in &config.jars {
        for header in scan::jar_class_headers(jar)? {
            if retained(&header, &extends, &implements) {
                matched.push(header.class_name);
            }
        }
    }

    let mut scanned_class_files = 0usize;
    if let Some(classes_dir) = &config.classes_dir {
        for path in scan::class_files(classes_dir)? {
            scanned_class_files += 1;
            if let Some(header) = scan::class_file_header(&path)? {
                if retained(&header, &extends, &implements) {
                    matched.push(header.class_name);
                }
            }
        }
    }

    let entries: Vec<DescriptorEntry> = matched
        .into_iter()
        .map(|name| DescriptorEntry::new(relocations.apply(&name)))
        .collect();

    write_output(&base_dir, config, &entries)?;

    Ok(GenerateOutcome {
        output_dir: base_dir.to_string_lossy().to_string(),
        scanned_jars: config.jars.len(),
        scanned_class_files,
        matched_classes: entries.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn retained(header: &ClassHeader, extends: &PatternSet, implements: &PatternSet) -> bool {
    match &header.superclass_name {
        Some(superclass) => {
            extends.matches(superclass) || implements.matches_any(&header.interface_names)
        }
        None => false,
    }
}

fn write_output(base_dir: &Path, config: &GenerateConfig, entries: &[DescriptorEntry]) -> Result<()> {
    let properties = descriptor::render_properties(
        &config.group,
        &config.artifact,
        &config.version,
        &config.extends_patterns,
        &config.implements_patterns,
    );
    let properties_path = base_dir.join(PROPERTIES_FILE);
    fs::write(&properties_path, properties)
        .with_context(|| format!("failed to write {}", properties_path.display()))?;

    let json_path = base_dir.join(JSON_FILE);
    fs::write(&json_path, descriptor::render_json(entries)?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(superclass: Option<&str>, interfaces: &[&str]) -> ClassHeader {
        ClassHeader {
            class_name: "org.example.Foo".to_string(),
            superclass_name: superclass.map(str::to_string),
            interface_names: interfaces.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn class_without_superclass_is_never_retained() -> Result<()> {
        let wildcard = PatternSet::compile(&[])?;
        assert!(!retained(&header(None, &["java.io.Serializable"]), &wildcard, &wildcard));
        Ok(())
    }

    #[test]
    fn interface_match_retains_when_superclass_does_not() -> Result<()> {
        let extends = PatternSet::compile(&[r"com\.other\..*".to_string()])?;
        let implements = PatternSet::compile(&[r"java\.io\.Serializable".to_string()])?;
        let h = header(Some("java.lang.Object"), &["java.io.Serializable"]);
        assert!(retained(&h, &extends, &implements));

        let h = header(Some("java.lang.Object"), &["java.lang.Comparable"]);
        assert!(!retained(&h, &extends, &implements));
        Ok(())
    }

    #[test]
    fn wildcard_dimensions_still_need_an_interface_to_match_on() -> Result<()> {
        let extends = PatternSet::compile(&[r"com\.other\..*".to_string()])?;
        let implements = PatternSet::compile(&[])?;
        // empty implements set is a wildcard, but a class with no interfaces
        // has nothing for it to match
        assert!(!retained(&header(Some("java.lang.Object"), &[]), &extends, &implements));
        assert!(retained(
            &header(Some("java.lang.Object"), &["java.lang.Comparable"]),
            &extends,
            &implements
        ));
        Ok(())
    }
}
