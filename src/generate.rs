//! Build-time generators. Each submodule writes one target file from one
//! set of source descriptors; invocations are independent and never share
//! state beyond the filesystem.

pub mod doc_blob;
pub mod doc_paths;
pub mod exporters;
pub mod translations;
pub mod vendor;

use crate::helpers;
use anyhow::{Context, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Banner every generated file starts with. Consumers treat anything
/// carrying it as machine-owned: regenerate, never hand-edit.
const GENERATED_BANNER: &str = "/* THIS FILE IS GENERATED. DO NOT EDIT. */\n\n";

/// Scoped writer for one generated target. Creating it truncates the
/// target and writes the banner; dropping it closes the handle on every
/// exit path. On error the target may hold a partial file, which callers
/// must treat as requiring full regeneration.
#[derive(Debug)]
pub struct GeneratedFileWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl GeneratedFileWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = GeneratedFileWriter {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        };
        writer
            .out
            .write_all(GENERATED_BANNER.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(writer)
    }

    /// Flush and close. Preferred over relying on `Drop`, which cannot
    /// report flush errors.
    pub fn finish(mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}

impl Write for GeneratedFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Process environment the generators depend on, made explicit so tests
/// can substitute a fake catalog compiler and a controlled temp location.
pub struct ToolEnv {
    pub temp_dir: PathBuf,
    pub msgfmt: Option<PathBuf>,
}

impl ToolEnv {
    pub fn detect() -> Self {
        ToolEnv {
            temp_dir: env::temp_dir(),
            msgfmt: helpers::find_executable("msgfmt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writer_emits_banner_then_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.gen.h");

        let mut writer = GeneratedFileWriter::create(&target).unwrap();
        write!(writer, "int x = 1;\n").unwrap();
        writer.finish().unwrap();

        let text = fs::read_to_string(&target).unwrap();
        assert!(text.starts_with(GENERATED_BANNER));
        assert!(text.ends_with("int x = 1;\n"));
    }

    #[test]
    fn writer_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.gen.h");
        fs::write(&target, "stale content that is much longer than the banner").unwrap();

        GeneratedFileWriter::create(&target).unwrap().finish().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), GENERATED_BANNER);
    }

    #[test]
    fn writer_fails_on_unwritable_target() {
        let err = GeneratedFileWriter::create(Path::new("no/such/dir/out.gen.h")).unwrap_err();
        assert!(err.to_string().contains("out.gen.h"));
    }
}
