//! Emits the sorted class-name to documentation-path lookup table.

use crate::generate::GeneratedFileWriter;
use ahash::AHashMap;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn generate(target: &Path, paths: &AHashMap<String, String>) -> Result<()> {
    // Sorted by key so output is independent of map iteration order.
    let mut entries: Vec<(&String, &String)> = paths.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut file = GeneratedFileWriter::create(target)?;
    let write_err = || format!("Failed to write {}", target.display());

    write!(
        file,
        "\
struct _DocDataClassPath {{
\tconst char *name;
\tconst char *path;
}};

inline constexpr int _doc_data_class_path_count = {};
inline constexpr _DocDataClassPath _doc_data_class_paths[{}] = {{
",
        entries.len(),
        entries.len() + 1
    )
    .with_context(write_err)?;

    for (name, path) in &entries {
        writeln!(file, "\t{{\"{name}\", \"{path}\"}},").with_context(write_err)?;
    }
    write!(file, "\t{{nullptr, nullptr}},\n}};\n").with_context(write_err)?;

    file.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run(paths: &[(&str, &str)]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc_data_class_path.gen.h");
        let map: AHashMap<String, String> = paths
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        generate(&target, &map).unwrap();
        fs::read_to_string(&target).unwrap()
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let text = run(&[("b", "y"), ("a", "x")]);
        let a = text.find("{\"a\", \"x\"},").unwrap();
        let b = text.find("{\"b\", \"y\"},").unwrap();
        assert!(a < b);
        assert!(text.contains("inline constexpr int _doc_data_class_path_count = 2;"));
        assert!(text.contains("_doc_data_class_paths[3]"));
    }

    #[test]
    fn sentinel_terminates_table() {
        let text = run(&[("Node", "doc/classes/Node.xml")]);
        assert!(text.trim_end().ends_with("{nullptr, nullptr},\n};"));
    }

    #[test]
    fn empty_mapping_is_sentinel_only() {
        let text = run(&[]);
        assert!(text.contains("_doc_data_class_path_count = 0;"));
        assert!(text.contains("_doc_data_class_paths[1]"));
        assert!(text.contains("{nullptr, nullptr},"));
    }
}
