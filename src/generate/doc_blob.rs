//! Concatenates the documentation sources into one buffer, compresses it
//! as a single unit and emits it with its hash and size constants. One
//! buffer, one compress call: better ratio than per-file compression and
//! a single decompress on the consumer side.

use crate::codec::{self, Compressor, ResourceBlob};
use crate::generate::GeneratedFileWriter;
use crate::helpers;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn generate(target: &Path, sources: &[PathBuf], codec: &impl Compressor) -> Result<()> {
    let mut buffer = Vec::new();
    for source in sources {
        // A missing source is fatal for this target.
        buffer.extend(helpers::read_file(source)?);
    }
    let blob = ResourceBlob::from_raw(codec, &buffer)?;

    let mut file = GeneratedFileWriter::create(target)?;
    write!(
        file,
        "\
inline constexpr const char *_doc_data_hash = \"{}\";
inline constexpr int _doc_data_compressed_size = {};
inline constexpr int _doc_data_uncompressed_size = {};
inline constexpr const unsigned char _doc_data_compressed[] = {{
\t{}
}};
",
        codec::content_hash(&blob.compressed),
        blob.compressed.len(),
        blob.raw_len,
        codec::format_buffer(&blob.compressed, 1)
    )
    .with_context(|| format!("Failed to write {}", target.display()))?;

    file.finish()
}
