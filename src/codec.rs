//! Byte-buffer plumbing shared by all generators: the compression seam,
//! the static-array literal formatter, and the diagnostic content hash.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;

/// Column that byte-literal lines are wrapped near. Wrapping is purely
/// cosmetic; the token sequence is identical regardless of width.
const WRAP_COLUMN: usize = 120;

/// Compression seam. Generators only ever call this once per buffer, and
/// assume it is deterministic for identical input.
pub trait Compressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;
}

/// Default codec: zlib at best compression.
pub struct Deflate;

impl Compressor for Deflate {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(raw).context("Failed to compress buffer")?;
        encoder.finish().context("Failed to finish compression stream")
    }
}

/// A buffer prepared for embedding: its compressed form plus the original
/// length the consumer needs to size its decompression target.
pub struct ResourceBlob {
    pub raw_len: usize,
    pub compressed: Vec<u8>,
}

impl ResourceBlob {
    pub fn from_raw(codec: &impl Compressor, raw: &[u8]) -> Result<Self> {
        Ok(ResourceBlob {
            raw_len: raw.len(),
            compressed: codec.compress(raw)?,
        })
    }
}

/// Render bytes as comma-separated decimal literals for a static array
/// initializer, wrapped for readability. Continuation lines are indented
/// with `indent` tabs.
pub fn format_buffer(buffer: &[u8], indent: usize) -> String {
    let mut out = String::with_capacity(buffer.len() * 4);
    let tab = "\t".repeat(indent);
    let mut column = indent * 4;
    for (i, byte) in buffer.iter().enumerate() {
        let token = byte.to_string();
        if i > 0 {
            if column + 2 + token.len() > WRAP_COLUMN {
                out.push_str(",\n");
                out.push_str(&tab);
                column = indent * 4;
            } else {
                out.push_str(", ");
                column += 2;
            }
        }
        out.push_str(&token);
        column += token.len();
    }
    out
}

/// Stable fingerprint embedded in generated output as a diagnostic
/// identifier. blake3 so identical input hashes identically across
/// processes and platforms; not used for anything security-sensitive.
pub fn content_hash(buffer: &[u8]) -> String {
    blake3::hash(buffer).to_hex().to_string()
}
