use anyhow::{Context, Result};
use regex::Regex;

/// Compiled class name patterns with full-match semantics. An empty set
/// accepts every name.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(&format!("^(?:{p})$"))
                    .with_context(|| format!("invalid class name pattern: {p}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, class_name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(class_name))
    }

    /// True if any of the names matches. Always false for an empty name list,
    /// even when the set itself is the empty wildcard.
    pub fn matches_any<S: AsRef<str>>(&self, class_names: &[S]) -> bool {
        class_names.iter().any(|n| self.matches(n.as_ref()))
    }
}

/// Ordered prefix-rewrite rules applied to matched class names before
/// emission. Each configured prefix pattern is compiled as `^{prefix}(.*)`;
/// the first rule whose prefix matches wins, and the captured remainder is
/// appended to the replacement. Unmatched names pass through verbatim.
#[derive(Debug)]
pub struct RelocationMap {
    rules: Vec<(Regex, String)>,
}

impl RelocationMap {
    pub fn compile(relocations: &[(String, String)]) -> Result<Self> {
        let rules = relocations
            .iter()
            .map(|(prefix, replacement)| {
                let re = Regex::new(&format!("^{prefix}(.*)$"))
                    .with_context(|| format!("invalid relocation pattern: {prefix}"))?;
                Ok((re, replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn apply(&self, class_name: &str) -> String {
        for (re, replacement) in &self.rules {
            if let Some(caps) = re.captures(class_name) {
                // the appended (.*) is always the last group
                let rest = caps.get(caps.len() - 1).map_or("", |m| m.as_str());
                return format!("{replacement}{rest}");
            }
        }
        class_name.to_string()
    }
}
