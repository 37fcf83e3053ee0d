//! File inclusion
//!
//!     `<<path>>` on a line of its own pulls another quill document into the tree. Reading is
//!     delegated to an [Includer] so the parser itself never touches the file system; the
//!     disk-backed implementation is [FsIncluder](crate::quill::loader::FsIncluder).
//!
//!     The context tracks the chain of documents currently being parsed. Re-entering a document
//!     on that chain is a cycle and is reported as a missing file for that edge; the chain
//!     length is bounded by `max_include_depth`. Every failure leaves an empty `Include`
//!     placeholder and an error diagnostic behind, and the including document carries on.

use crate::quill::ast::error::IncludeError;
use std::path::{Path, PathBuf};

/// Source of included documents.
pub trait Includer {
    fn read(&self, path: &Path) -> Result<String, IncludeError>;
}

/// Where includes resolve from and which documents are already open.
#[derive(Clone)]
pub struct IncludeContext<'i> {
    includer: &'i dyn Includer,
    base_dir: PathBuf,
    open: Vec<PathBuf>,
}

impl<'i> IncludeContext<'i> {
    /// Context for a document at `document_path` (or an in-memory document resolving
    /// relative to the working directory when `None`).
    pub fn new(includer: &'i dyn Includer, document_path: Option<&Path>) -> Self {
        let base_dir = document_path
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let open = document_path.map(normalize).into_iter().collect();
        Self {
            includer,
            base_dir,
            open,
        }
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize(&self.base_dir.join(path))
    }

    /// Read `path` and return its source with the context for parsing it.
    pub fn enter(
        &self,
        path: &str,
        max_depth: usize,
    ) -> Result<(String, IncludeContext<'i>), IncludeError> {
        let resolved = self.resolve(path);
        if self.open.contains(&resolved) {
            return Err(IncludeError::Cycle(resolved));
        }
        if self.open.len() >= max_depth {
            return Err(IncludeError::TooDeep {
                path: resolved,
                limit: max_depth,
            });
        }
        let source = self.includer.read(&resolved)?;

        let mut open = self.open.clone();
        open.push(resolved.clone());
        let base_dir = resolved
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((
            source,
            IncludeContext {
                includer: self.includer,
                base_dir,
                open,
            },
        ))
    }
}

/// Lexical normalization: drop `.` components and fold `..` where possible.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Memory(HashMap<PathBuf, String>);

    impl Includer for Memory {
        fn read(&self, path: &Path) -> Result<String, IncludeError> {
            self.0
                .get(path)
                .cloned()
                .ok_or_else(|| IncludeError::NotFound(path.to_path_buf()))
        }
    }

    #[test]
    fn test_resolves_relative_to_including_document() {
        let files = Memory(HashMap::from([(PathBuf::from("book/ch/one.qd"), "x".to_string())]));
        let context = IncludeContext::new(&files, Some(Path::new("book/main.qd")));
        let (source, inner) = context.enter("./ch/one.qd", 16).unwrap();
        assert_eq!(source, "x");
        assert_eq!(inner.depth(), 2);
        assert_eq!(inner.resolve("../main.qd"), PathBuf::from("book/main.qd"));
    }

    #[test]
    fn test_cycle_and_depth() {
        let files = Memory(HashMap::from([(PathBuf::from("a.qd"), "<<a.qd>>".to_string())]));
        let context = IncludeContext::new(&files, Some(Path::new("a.qd")));
        assert!(matches!(context.enter("a.qd", 16), Err(IncludeError::Cycle(_))));

        let fresh = IncludeContext::new(&files, None);
        assert!(matches!(
            fresh.enter("a.qd", 0),
            Err(IncludeError::TooDeep { limit: 0, .. })
        ));
        assert!(matches!(fresh.enter("b.qd", 16), Err(IncludeError::NotFound(_))));
    }
}
