use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;

/// Build-time resource embedding generator. Each subcommand writes one
/// generated source file from the given inputs.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate the class-name to documentation-path lookup table from a
    /// JSON object manifest of {"ClassName": "path"} pairs.
    DocPaths {
        /// Target file to generate
        #[arg(short = 'o', long = "output")]
        target: PathBuf,

        /// JSON manifest mapping class names to documentation paths
        manifest: PathBuf,
    },

    /// Generate the platform exporter registration unit.
    Exporters {
        /// Target file to generate
        #[arg(short = 'o', long = "output")]
        target: PathBuf,

        /// Platform identifiers, in registration order
        #[arg(required = true)]
        platforms: Vec<String>,
    },

    /// Generate the compressed documentation data blob.
    DocBlob {
        /// Target file to generate
        #[arg(short = 'o', long = "output")]
        target: PathBuf,

        /// Documentation source files, concatenated in the given order
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },

    /// Generate a translation bundle for the category named by the
    /// target's file stem prefix.
    Translations {
        /// Target file to generate
        #[arg(short = 'o', long = "output")]
        target: PathBuf,

        /// Translation catalog files (.po)
        #[arg(required = true)]
        catalogs: Vec<PathBuf>,

        /// Catalog compiler to use instead of looking up msgfmt in PATH
        #[arg(long)]
        msgfmt: Option<PathBuf>,

        /// Directory for intermediate compiled catalogs
        #[arg(long)]
        temp_dir: Option<PathBuf>,
    },

    /// Generate the vendored source tree bundles.
    Vendor {
        /// Target file to generate
        #[arg(short = 'o', long = "output")]
        target: PathBuf,

        /// Vendor directories to scan; unrecognized names are ignored
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
    },
}
