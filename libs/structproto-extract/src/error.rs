// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Error types for record extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading record declarations from source.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source path not found.
    #[error("source path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Failed to read a source file or walk a source directory.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid Rust.
    #[error("failed to parse {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A `#[proto(...)]` or `#[serde(...)]` attribute could not be understood.
    #[error("invalid attribute in {}:{line}: {message}", path.display())]
    Attribute {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Failure while reading records from source text, before a path is known.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The text is not valid Rust.
    #[error("{0}")]
    Parse(#[source] syn::Error),

    /// A field attribute could not be understood.
    #[error("{0}")]
    Attribute(#[source] syn::Error),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
