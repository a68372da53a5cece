//! Embeds vendored third-party source trees as raw byte bundles. Only
//! the recognized bundle directories are populated; anything else passed
//! as a source is ignored. Scan results are sorted by relative path so
//! output does not depend on the filesystem's directory order.

use crate::codec;
use crate::generate::GeneratedFileWriter;
use crate::helpers;
use ahash::AHashMap;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Recognized bundle directories, in emission order, with the symbol
/// prefix used in the generated declarations.
const RECOGNIZED_BUNDLES: [(&str, &str); 2] = [
    ("unidot_importer", "unidot_importer"),
    ("UnityToGodot", "unitytogodot"),
];

struct VendorFile {
    relative_path: String,
    data: Vec<u8>,
}

pub fn generate(target: &Path, source_dirs: &[PathBuf]) -> Result<()> {
    let mut bundles: AHashMap<&str, Vec<VendorFile>> = RECOGNIZED_BUNDLES
        .iter()
        .map(|(dir_name, _)| (*dir_name, Vec::new()))
        .collect();

    for dir in source_dirs {
        let name = dir.file_name().unwrap_or_default().to_string_lossy().to_string();
        match bundles.get_mut(name.as_str()) {
            Some(bundle) if dir.is_dir() => *bundle = scan_dir(dir),
            _ => log::debug!("Ignoring unrecognized vendor source {}", dir.display()),
        }
    }

    let mut file = GeneratedFileWriter::create(target)?;
    let write_err = || format!("Failed to write {}", target.display());

    write!(
        file,
        "
#pragma once
#include <stdint.h>

namespace UnityVendor {{
    struct File {{ const char* path; const uint8_t* data; unsigned int size; }};
"
    )
    .with_context(write_err)?;

    for (dir_name, symbol) in RECOGNIZED_BUNDLES {
        write_bundle(&mut file, symbol, &bundles[dir_name]).with_context(write_err)?;
    }

    write!(file, "\n}} // namespace UnityVendor\n").with_context(write_err)?;
    file.finish()
}

fn write_bundle(file: &mut GeneratedFileWriter, symbol: &str, items: &[VendorFile]) -> Result<()> {
    for (idx, item) in items.iter().enumerate() {
        write!(
            file,
            "inline constexpr unsigned char _{symbol}_data_{idx}[] = {{\n\t{}\n}};\n\n",
            codec::format_buffer(&item.data, 1)
        )?;
    }

    let table = symbol.to_uppercase();
    write!(file, "inline constexpr File {table}[] = {{\n")?;
    for (idx, item) in items.iter().enumerate() {
        writeln!(
            file,
            "\t{{ \"{}\", _{symbol}_data_{idx}, {} }},",
            item.relative_path,
            item.data.len()
        )?;
    }
    write!(file, "\t{{ nullptr, nullptr, 0 }},\n}};\n")?;
    write!(
        file,
        "inline constexpr unsigned int {table}_COUNT = {};\n\n",
        items.len()
    )?;
    Ok(())
}

fn scan_dir(root: &Path) -> Vec<VendorFile> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<VendorFile>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("Skipping unreadable vendor directory {}: {err}", dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        // Decide recursion from the entry's own type so a symlink to a
        // directory is never descended; cycles aside, its contents are
        // not part of the vendored tree.
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                log::debug!("Skipping unreadable vendor entry {}: {err}", path.display());
                continue;
            }
        };
        if file_type.is_dir() {
            collect_files(root, &path, files);
            continue;
        }
        if file_type.is_symlink() && path.is_dir() {
            log::debug!("Skipping symlinked vendor directory {}", path.display());
            continue;
        }
        match fs::read(&path) {
            Ok(data) => {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                files.push(VendorFile {
                    relative_path: helpers::forward_slashes(relative),
                    data,
                });
            }
            Err(err) => {
                // Unreadable files are skipped, never fatal for the bundle.
                log::debug!("Skipping unreadable vendor file {}: {err}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(dir: &Path, sources: &[PathBuf]) -> String {
        let target = dir.join("unity_vendor.gen.h");
        generate(&target, sources).unwrap();
        fs::read_to_string(&target).unwrap()
    }

    #[test]
    fn bundles_files_sorted_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("unidot_importer");
        fs::create_dir_all(vendor.join("sub")).unwrap();
        fs::write(vendor.join("z.gd"), b"print(1)").unwrap();
        fs::write(vendor.join("sub").join("a.gd"), b"print(2)").unwrap();

        let text = run(dir.path(), &[vendor]);

        assert!(text.contains("inline constexpr unsigned int UNIDOT_IMPORTER_COUNT = 2;"));
        let sub = text.find("{ \"sub/a.gd\", _unidot_importer_data_0, 8 },").unwrap();
        let z = text.find("{ \"z.gd\", _unidot_importer_data_1, 8 },").unwrap();
        assert!(sub < z);
    }

    #[test]
    fn unrecognized_and_missing_directories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let stray = dir.path().join("random_stuff");
        fs::create_dir(&stray).unwrap();
        fs::write(stray.join("x.txt"), b"x").unwrap();
        let missing = dir.path().join("UnityToGodot");

        let text = run(dir.path(), &[stray, missing]);

        assert!(!text.contains("random_stuff"));
        // Both recognized bundles are still emitted, empty.
        assert!(text.contains("inline constexpr unsigned int UNIDOT_IMPORTER_COUNT = 0;"));
        assert!(text.contains("inline constexpr unsigned int UNITYTOGODOT_COUNT = 0;"));
        assert!(text.contains("inline constexpr File UNITYTOGODOT[] = {\n\t{ nullptr, nullptr, 0 },\n};"));
    }

    #[test]
    fn header_and_footer_match_the_consumer_layout() {
        let dir = tempfile::tempdir().unwrap();
        let text = run(dir.path(), &[]);

        assert!(text.contains(
            "\n#pragma once\n#include <stdint.h>\n\nnamespace UnityVendor {\n    struct File { const char* path; const uint8_t* data; unsigned int size; };\ninline constexpr"
        ));
        assert!(text.ends_with("\n} // namespace UnityVendor\n"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("secret.txt"), b"secret!").unwrap();

        let vendor = dir.path().join("unidot_importer");
        fs::create_dir(&vendor).unwrap();
        fs::write(vendor.join("a.txt"), b"ok").unwrap();
        std::os::unix::fs::symlink(&outside, vendor.join("link")).unwrap();

        let text = run(dir.path(), &[vendor]);

        assert!(!text.contains("secret"));
        assert!(text.contains("{ \"a.txt\", _unidot_importer_data_0, 2 },"));
        assert!(text.contains("UNIDOT_IMPORTER_COUNT = 1;"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_files_are_skipped_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = dir.path().join("unidot_importer");
        fs::create_dir(&vendor).unwrap();
        fs::write(vendor.join("a.txt"), b"ok").unwrap();
        // A dangling symlink fails to read no matter who runs the tests.
        std::os::unix::fs::symlink(dir.path().join("gone"), vendor.join("b.bin")).unwrap();

        let text = run(dir.path(), &[vendor]);

        assert!(text.contains("{ \"a.txt\", _unidot_importer_data_0, 2 },"));
        assert!(!text.contains("b.bin"));
        assert!(text.contains("UNIDOT_IMPORTER_COUNT = 1;"));
    }
}
