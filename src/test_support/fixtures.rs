//! Test fixtures for common test scenarios.

use std::path::Path;

use super::DescBuilder;

/// A two-target graph in one package: `//a:a` (source `a/x.cc`) depends on
/// `//a:b` (header `a/y.h`).
pub fn two_target_desc() -> DescBuilder {
    DescBuilder::new()
        .source_set("//a:a", &["//a:b"], &["a/x.cc"])
        .source_set("//a:b", &[], &["a/y.h"])
}

/// A small source tree: one package with sources, its BUILD.gn and
/// license/readme files at two depths.
pub fn write_source_tree(root: &Path) {
    let desc = two_target_desc().to_json();
    let files: Vec<(&str, &str)> = vec![
        ("desc.json", desc.as_str()),
        ("a/x.cc", "#include \"a/y.h\"\n#include \"third_party/libevent/event.h\"\n"),
        ("a/y.h", "#pragma once\n"),
        ("a/BUILD.gn", "source_set(\"a\") {}\n"),
        ("a/LICENSE", "license text\n"),
        ("a/README.md", "readme\n"),
        ("a/notes.txt", "not copied\n"),
        ("a/sub/COPYING", "not scanned\n"),
    ];
    for (path, content) in files {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}
