//! Sample documents for tests
//!
//! Curated `.qd` files live under `tests/samples/` in this crate, one per construct plus a
//! few mixed documents. Tests load them by name instead of writing quill inline, so a
//! grammar change means revisiting one directory.

use crate::quill::ast::Document;
use crate::quill::loader::DocumentLoader;
use crate::quill::token::Token;
use std::path::PathBuf;

/// Directory holding the sample documents.
pub fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("samples")
}

/// A named sample document, e.g. `Sample::named("lists")` for `tests/samples/lists.qd`.
pub struct Sample {
    path: PathBuf,
}

impl Sample {
    pub fn named(name: &str) -> Self {
        Self {
            path: samples_dir().join(format!("{}.qd", name)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn loader(&self) -> DocumentLoader {
        match DocumentLoader::from_path(&self.path) {
            Ok(loader) => loader,
            Err(err) => panic!("sample {} is unreadable: {}", self.path.display(), err),
        }
    }

    pub fn source(&self) -> String {
        self.loader().source_ref().to_string()
    }

    pub fn tokenize(&self) -> Vec<Token> {
        self.loader().tokenize()
    }

    pub fn parse(&self) -> Document {
        self.loader().parse()
    }

    /// Every sample in the directory, sorted by name.
    pub fn all() -> Vec<Sample> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(samples_dir())
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().is_some_and(|ext| ext == "qd"))
                    .collect()
            })
            .unwrap_or_default();
        paths.sort();
        paths.into_iter().map(|path| Sample { path }).collect()
    }
}
