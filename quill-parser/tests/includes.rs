//! File inclusion through the disk-backed loader

use quill_parser::quill::ast::{codes, NodeKind};
use quill_parser::quill::loader::DocumentLoader;
use quill_parser::quill::parsing::ParserOptions;
use quill_parser::quill::testing::assert_ast;
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

#[test]
fn test_nested_includes_are_spliced_in_place() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "book.qd", "> Book\n\n<<chapters/one.qd>>");
    write(dir.path(), "chapters/one.qd", "> One\n\n<<../shared/note.qd>>");
    write(dir.path(), "shared/note.qd", "<note> Shared text.");

    let doc = DocumentLoader::from_path(dir.path().join("book.qd"))
        .unwrap()
        .parse();

    assert_ast(&doc).no_diagnostics().block(0, |book| {
        book.is_heading(1).child(1, |include| {
            include.kind("include").child(0, |chapter| {
                chapter.is_heading(1).child(1, |nested| {
                    nested
                        .kind("include")
                        .text("Shared text.")
                        .child(0, |note| {
                            note.kind("admonition");
                        });
                });
            });
        });
    });
}

#[test]
fn test_missing_include_leaves_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.qd", "before\n\n<<gone.qd>>\n\nafter");

    let doc = DocumentLoader::from_path(dir.path().join("main.qd"))
        .unwrap()
        .parse();

    assert_ast(&doc)
        .diagnostic_codes(&[codes::INCLUDE_FAILED])
        .block_count(3)
        .block(1, |include| {
            include.kind("include").child_count(0);
        })
        .block(2, |para| {
            para.text("after");
        });
    assert!(doc.diagnostics[0].message.contains("not found"));
    assert!(doc.has_errors());
}

#[test]
fn test_include_cycle_is_cut() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.qd", "from a\n\n<<b.qd>>");
    write(dir.path(), "b.qd", "from b\n\n<<a.qd>>");

    let doc = DocumentLoader::from_path(dir.path().join("a.qd"))
        .unwrap()
        .parse();

    assert_eq!(doc.diagnostics.len(), 1);
    assert_eq!(doc.diagnostics[0].code.as_deref(), Some(codes::INCLUDE_FAILED));
    assert!(doc.diagnostics[0].message.starts_with("included file not found"));

    let b = &doc.root.children[1];
    assert_eq!(b.kind, NodeKind::Include { path: "b.qd".into() });
    let back_to_a = &b.children[1];
    assert_eq!(back_to_a.kind, NodeKind::Include { path: "a.qd".into() });
    assert!(back_to_a.children.is_empty());
}

#[test]
fn test_include_depth_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    for level in 0..5 {
        write(
            dir.path(),
            &format!("level{}.qd", level),
            &format!("level {}\n\n<<level{}.qd>>", level, level + 1),
        );
    }
    write(dir.path(), "level5.qd", "bottom");

    let options = ParserOptions {
        max_include_depth: 3,
        ..ParserOptions::default()
    };
    let doc = DocumentLoader::from_path(dir.path().join("level0.qd"))
        .unwrap()
        .with_options(options)
        .parse();

    assert_eq!(doc.diagnostics.len(), 1);
    assert!(doc.diagnostics[0].message.contains("depth limit of 3"));
}

#[test]
fn test_string_documents_resolve_from_working_directory() {
    let doc = DocumentLoader::from_string("<<no/such/file.qd>>").parse();
    assert_ast(&doc).diagnostic_codes(&[codes::INCLUDE_FAILED]);
}
