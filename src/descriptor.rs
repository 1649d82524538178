use anyhow::Result;
use serde::{Deserialize, Serialize};

/// File names inside the generated descriptor directory.
pub const PROPERTIES_FILE: &str = "native-image.properties";
pub const JSON_FILE: &str = "reflection-config.json";

/// One entry of the reflection descriptor. The six reflective-access flags
/// are always enabled; there is no per-class customization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorEntry {
    pub name: String,
    pub all_declared_constructors: bool,
    pub all_public_constructors: bool,
    pub all_declared_methods: bool,
    pub all_public_methods: bool,
    pub all_declared_fields: bool,
    pub all_public_fields: bool,
}

impl DescriptorEntry {
    pub fn new(name: String) -> Self {
        Self {
            name,
            all_declared_constructors: true,
            all_public_constructors: true,
            all_declared_methods: true,
            all_public_methods: true,
            all_declared_fields: true,
            all_public_fields: true,
        }
    }
}

pub fn render_json(entries: &[DescriptorEntry]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(entries)?;
    out.push('\n');
    Ok(out)
}

/// Renders `native-image.properties`: a provenance comment plus the directive
/// pointing native-image at the descriptor next to it.
pub fn render_properties(
    group: &str,
    artifact: &str,
    version: &str,
    extends_patterns: &[String],
    implements_patterns: &[String],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# This file is generated for {group}:{artifact}:{version}.\n"));
    out.push_str("# Contains classes \n");
    out.push_str(&format!("#   with superclass: {}\n", pattern_comment(extends_patterns)));
    out.push_str(&format!(
        "#   implementing interfaces: {}\n",
        pattern_comment(implements_patterns)
    ));
    out.push_str(&format!("Args = -H:ReflectionConfigurationResources=${{.}}/{JSON_FILE}\n"));
    out
}

fn pattern_comment(patterns: &[String]) -> String {
    format!("\n#     {}", patterns.join(",\n#     "))
}
