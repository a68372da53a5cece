use ahash::AHashMap;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::io::Write;

use embedgen::codec::Deflate;
use embedgen::generate::translations::CatalogSource;
use embedgen::generate::{self, ToolEnv, translations};
use embedgen::{cli, helpers};

/// JSON object manifest mapping document class names to source paths.
#[derive(Debug, Deserialize)]
struct DocPathsManifest(AHashMap<String, String>);

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}:\n{}", record.level(), record.args()))
        .filter_level(cli.verbose.log_level_filter())
        .target(env_logger::fmt::Target::Stdout)
        .init();

    match run(cli.command) {
        Err(e) => {
            println!("{e:#}");
            std::process::exit(1);
        }
        Ok(()) => Ok(()),
    }
}

fn run(command: cli::Command) -> Result<()> {
    match command {
        cli::Command::DocPaths { target, manifest } => {
            let data = fs::read_to_string(&manifest)
                .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
            let DocPathsManifest(paths) = serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse manifest {}", manifest.display()))?;
            generate::doc_paths::generate(&target, &paths)
        }
        cli::Command::Exporters { target, platforms } => {
            generate::exporters::generate(&target, &platforms)
        }
        cli::Command::DocBlob { target, sources } => {
            generate::doc_blob::generate(&target, &sources, &Deflate)
        }
        cli::Command::Translations {
            target,
            catalogs,
            msgfmt,
            temp_dir,
        } => {
            let mut env = ToolEnv::detect();
            if msgfmt.is_some() {
                env.msgfmt = msgfmt;
            }
            if let Some(temp_dir) = temp_dir {
                env.temp_dir = temp_dir;
            }
            // The catalog whose stem matches the category is the
            // authoring/reference copy, not a translated language.
            let category = translations::category_from_target(&target);
            let sources: Vec<CatalogSource> = catalogs
                .into_iter()
                .map(|path| {
                    let is_reference = helpers::file_stem(&path) == category;
                    CatalogSource { path, is_reference }
                })
                .collect();
            translations::generate(&target, &sources, &env, &Deflate)
        }
        cli::Command::Vendor { target, dirs } => generate::vendor::generate(&target, &dirs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> cli::Cli {
        cli::Cli::try_parse_from(args.iter().copied()).expect("expected args to parse")
    }

    #[test]
    fn parses_doc_blob_sources_in_order() {
        let cli = parse(&["embedgen", "doc-blob", "-o", "out.gen.h", "a.xml", "b.xml"]);
        match cli.command {
            cli::Command::DocBlob { target, sources } => {
                assert_eq!(target.to_string_lossy(), "out.gen.h");
                assert_eq!(sources.len(), 2);
                assert_eq!(sources[0].to_string_lossy(), "a.xml");
            }
            other => panic!("expected doc-blob command, got {other:?}"),
        }
    }

    #[test]
    fn translations_accepts_tool_overrides() {
        let cli = parse(&[
            "embedgen",
            "translations",
            "-o",
            "editor_translations.gen.h",
            "--msgfmt",
            "/opt/gettext/msgfmt",
            "de.po",
        ]);
        match cli.command {
            cli::Command::Translations { msgfmt, catalogs, .. } => {
                assert_eq!(msgfmt.unwrap().to_string_lossy(), "/opt/gettext/msgfmt");
                assert_eq!(catalogs.len(), 1);
            }
            other => panic!("expected translations command, got {other:?}"),
        }
    }

    #[test]
    fn subcommands_require_sources() {
        assert!(cli::Cli::try_parse_from(["embedgen", "doc-blob", "-o", "out.gen.h"]).is_err());
        assert!(cli::Cli::try_parse_from(["embedgen", "vendor", "-o", "out.gen.h"]).is_err());
    }

    #[test]
    fn doc_paths_manifest_parses_json_object() {
        let DocPathsManifest(paths) =
            serde_json::from_str(r#"{"Node": "doc/classes/Node.xml"}"#).unwrap();
        assert_eq!(paths["Node"], "doc/classes/Node.xml");
    }
}
