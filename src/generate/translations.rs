//! Emits one compressed catalog per language plus the per-category
//! translation table. Catalogs are run through the external catalog
//! compiler (`msgfmt`) when it is available, with per-file fallback to
//! the raw catalog bytes; the reference catalog is embedded raw because
//! msgfmt strips untranslated messages, which would silently drop
//! content from the authoring copy.

use crate::codec::{self, Compressor, ResourceBlob};
use crate::generate::{GeneratedFileWriter, ToolEnv};
use crate::helpers;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Language name given to the reference catalog in the emitted table.
const REFERENCE_LANGUAGE: &str = "source";

/// One translation catalog to embed. `is_reference` marks the authoring
/// copy; the caller decides, so a language code that happens to collide
/// with the category name cannot be misclassified here.
pub struct CatalogSource {
    pub path: PathBuf,
    pub is_reference: bool,
}

/// The category is the target's file stem up to the first `_`, e.g.
/// `editor_translations.gen.h` belongs to category `editor`.
pub fn category_from_target(target: &Path) -> String {
    let stem = helpers::file_stem(target);
    match stem.split_once('_') {
        Some((category, _)) => category.to_string(),
        None => stem,
    }
}

pub fn generate(
    target: &Path,
    sources: &[CatalogSource],
    env: &ToolEnv,
    codec: &impl Compressor,
) -> Result<()> {
    let category = category_from_target(target);

    let mut sorted: Vec<&CatalogSource> = sources.iter().collect();
    sorted.sort_by_key(|src| helpers::file_stem(&src.path));

    if env.msgfmt.is_none() {
        // Once per invocation, not once per file.
        log::warn!("msgfmt not found, using .po files instead of .mo");
    }

    let mut file = GeneratedFileWriter::create(target)?;
    let write_err = || format!("Failed to write {}", target.display());

    let mut table: Vec<(String, usize, usize)> = Vec::new();
    for source in sorted {
        let name = if source.is_reference {
            REFERENCE_LANGUAGE.to_string()
        } else {
            helpers::file_stem(&source.path)
        };

        let compiled = match &env.msgfmt {
            // Never compile the reference catalog.
            Some(msgfmt) if !source.is_reference => {
                match compile_catalog(msgfmt, &source.path, &env.temp_dir) {
                    Ok(buffer) => buffer,
                    Err(err) => {
                        log::warn!(
                            "msgfmt failed, using .po file instead of .mo: path={}; {err:#}",
                            source.path.display()
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        let buffer = match compiled {
            Some(buffer) => buffer,
            None => helpers::read_file(&source.path)?,
        };

        let blob = ResourceBlob::from_raw(codec, &buffer)?;
        write!(
            file,
            "\
inline constexpr const unsigned char _{category}_translation_{name}_compressed[] = {{
\t{}
}};

",
            codec::format_buffer(&blob.compressed, 1)
        )
        .with_context(write_err)?;

        table.push((name, blob.compressed.len(), blob.raw_len));
    }

    write!(
        file,
        "\
struct {}TranslationList {{
\tconst char* lang;
\tint comp_size;
\tint uncomp_size;
\tconst unsigned char* data;
}};

inline constexpr {}TranslationList _{category}_translations[] = {{
",
        capitalize(&category),
        capitalize(&category)
    )
    .with_context(write_err)?;

    for (name, comp_size, uncomp_size) in &table {
        writeln!(
            file,
            "\t{{ \"{name}\", {comp_size}, {uncomp_size}, _{category}_translation_{name}_compressed }},"
        )
        .with_context(write_err)?;
    }
    write!(file, "\t{{ nullptr, 0, 0, nullptr }},\n}};\n").with_context(write_err)?;

    file.finish()
}

/// Run the external catalog compiler into a uniquely named temp file and
/// return the compact form, or `None` when the tool fails and the caller
/// should fall back to the raw catalog. The temp file is removed on every
/// exit path; removal failure only warns.
fn compile_catalog(msgfmt: &Path, catalog: &Path, temp_dir: &Path) -> Result<Option<Vec<u8>>> {
    let temp = tempfile::Builder::new()
        .suffix(".mo")
        .tempfile_in(temp_dir)
        .with_context(|| format!("Failed to create temp file in {}", temp_dir.display()))?;

    let output = Command::new(msgfmt)
        .arg(catalog)
        .arg("--no-hash")
        .arg("-o")
        .arg(temp.path())
        .output()
        .with_context(|| format!("Failed to run {}", msgfmt.display()))?;

    let buffer = if output.status.success() {
        Some(helpers::read_file(temp.path())?)
    } else {
        log::warn!(
            "msgfmt exited with {}, using .po file instead of .mo: path={}; {}",
            output.status,
            catalog.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
        None
    };

    if let Err(err) = temp.close() {
        // Do not fail the target over a leftover temp file.
        log::warn!("Could not delete temporary .mo file: {err}");
    }
    Ok(buffer)
}

/// First letter upper-cased, remainder lower-cased, so the struct name
/// for a category is stable regardless of the category's own casing.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
