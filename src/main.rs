use anyhow::Result;
use clap::Parser;
use reflect_config::cli::Cli;
use reflect_config::generate::{GenerateConfig, generate};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GenerateConfig {
        classes_dir: cli.classes_dir,
        jars: cli.jars,
        extends_patterns: cli.extends_patterns,
        implements_patterns: cli.implements_patterns,
        relocations: cli.relocations,
        group: cli.group,
        artifact: cli.artifact,
        version: cli.version,
        set_name: cli.set_name,
        output_dir: cli.output_dir,
    };

    let outcome = generate(&config)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
