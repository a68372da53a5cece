//! Emits the platform exporter include list and registration functions.
//! Platform order is preserved as given; registration order can matter to
//! the consumer.

use crate::generate::GeneratedFileWriter;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn generate(target: &Path, platforms: &[String]) -> Result<()> {
    let includes = platforms
        .iter()
        .map(|p| format!("#include \"platform/{p}/export/export.h\""))
        .collect::<Vec<_>>()
        .join("\n");
    let registrations = platforms
        .iter()
        .map(|p| format!("register_{p}_exporter();"))
        .collect::<Vec<_>>()
        .join("\n\t");
    let type_registrations = platforms
        .iter()
        .map(|p| format!("register_{p}_exporter_types();"))
        .collect::<Vec<_>>()
        .join("\n\t");

    let mut file = GeneratedFileWriter::create(target)?;
    write!(
        file,
        "\
#include \"register_exporters.h\"

{includes}

void register_exporters() {{
\t{registrations}
}}

void register_exporter_types() {{
\t{type_registrations}
}}
"
    )
    .with_context(|| format!("Failed to write {}", target.display()))?;

    file.finish()
}
