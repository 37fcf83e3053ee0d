//! Document loading utilities
//!
//! This module provides `DocumentLoader`, which loads source text from a file or a string and
//! runs the lexer or the full parse on it. It is used by the CLI and by tests.
//!
//! Loading normalizes CRLF line endings to LF. Documents loaded from a path resolve
//! `<<includes>>` against the disk through [FsIncluder]; documents loaded from a string
//! resolve them relative to the working directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_parser::quill::loader::DocumentLoader;
//!
//! // From file
//! let doc = DocumentLoader::from_path("book.qd")?.parse();
//!
//! // From string
//! let tokens = DocumentLoader::from_string("Hello *world*\n").tokenize();
//! ```

use crate::quill::ast::error::{IncludeError, LoaderError};
use crate::quill::ast::Document;
use crate::quill::lexing::tokenize_with_options;
use crate::quill::parsing::{IncludeContext, Includer, Parser, ParserOptions};
use crate::quill::token::Token;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads included documents from the file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIncluder;

impl Includer for FsIncluder {
    fn read(&self, path: &Path) -> Result<String, IncludeError> {
        if path.is_dir() {
            return Err(IncludeError::IsDirectory(path.to_path_buf()));
        }
        match fs::read_to_string(path) {
            Ok(source) => Ok(normalize_newlines(source)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(IncludeError::NotFound(path.to_path_buf()))
            }
            Err(err) => Err(IncludeError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }),
        }
    }
}

fn normalize_newlines(source: String) -> String {
    if source.contains('\r') {
        source.replace("\r\n", "\n")
    } else {
        source
    }
}

pub struct DocumentLoader {
    source: String,
    path: Option<PathBuf>,
    options: ParserOptions,
}

impl DocumentLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded {} ({} bytes)", path.display(), source.len());
        Ok(DocumentLoader {
            source: normalize_newlines(source),
            path: Some(path.to_path_buf()),
            options: ParserOptions::default(),
        })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: normalize_newlines(source.into()),
            path: None,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// The token stream of the source.
    pub fn tokenize(&self) -> Vec<Token> {
        tokenize_with_options(&self.source, self.options.lexer.clone())
    }

    /// Parse the source, resolving includes from disk.
    pub fn parse(&self) -> Document {
        let tokens = self.tokenize();
        let includer = FsIncluder;
        let context = IncludeContext::new(&includer, self.path.as_deref());
        Parser::with_context(&tokens, self.options.clone(), Some(context)).parse()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn source_ref(&self) -> &str {
        &self.source
    }
}
