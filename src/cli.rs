use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "reflect-config")]
#[command(
    about = "Generate GraalVM native-image reflection configuration from compiled classes and jar dependencies"
)]
pub struct Cli {
    /// Folder of compiled .class files to scan; may not exist.
    #[arg(long, value_name = "DIR")]
    pub classes_dir: Option<PathBuf>,

    /// Jar dependency to scan; repeat for multiple jars, scanned in order.
    #[arg(long = "jar", value_name = "FILE")]
    pub jars: Vec<PathBuf>,

    /// Superclass pattern (full-match regex); classes whose superclass
    /// matches are included. No pattern means match every superclass.
    #[arg(long = "extends", value_name = "PATTERN")]
    pub extends_patterns: Vec<String>,

    /// Interface pattern (full-match regex); classes implementing a matching
    /// interface are included. No pattern means match every interface.
    #[arg(long = "implements", value_name = "PATTERN")]
    pub implements_patterns: Vec<String>,

    /// Class name relocation as PREFIX_PATTERN=REPLACEMENT; first match wins,
    /// in argument order.
    #[arg(long = "relocate", value_name = "FROM=TO", value_parser = parse_relocation)]
    pub relocations: Vec<(String, String)>,

    /// Project group identifier, used in the output path and properties file.
    #[arg(long, value_name = "GROUP")]
    pub group: String,

    /// Project artifact identifier.
    #[arg(long, value_name = "NAME")]
    pub artifact: String,

    /// Project version, recorded in the properties file.
    #[arg(long = "project-version", value_name = "VERSION")]
    pub version: String,

    /// Label distinguishing descriptor sets for the same project.
    #[arg(long, value_name = "NAME", default_value = "main")]
    pub set_name: String,

    /// Output root; its previous content is replaced on every run.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: PathBuf,
}

fn parse_relocation(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((from, to)) if !from.is_empty() => Ok((from.to_string(), to.to_string())),
        _ => Err(format!("expected FROM=TO, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_relocation_splits_on_first_equals() {
        assert_eq!(
            parse_relocation(r"com\.acme\.=org.renamed."),
            Ok(("com\\.acme\\.".to_string(), "org.renamed.".to_string()))
        );
        assert!(parse_relocation("no-separator").is_err());
        assert!(parse_relocation("=empty-prefix").is_err());
    }

    #[test]
    fn relocations_keep_argument_order() {
        let cli = Cli::parse_from([
            "reflect-config",
            "--group",
            "org.example",
            "--artifact",
            "demo",
            "--project-version",
            "1.0",
            "--output-dir",
            "/tmp/out",
            "--relocate",
            "b=2",
            "--relocate",
            "a=1",
        ]);
        assert_eq!(
            cli.relocations,
            vec![("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
        );
        assert_eq!(cli.set_name, "main");
    }
}
