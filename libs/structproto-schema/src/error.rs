// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Error types for snapshot loading and field resolution.

use thiserror::Error;

/// Errors that can occur while loading a previous proto snapshot.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Snapshot file not found.
    #[error("snapshot file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to read snapshot file.
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot text is not valid proto.
    #[error("malformed proto snapshot: {message}")]
    Malformed { message: String },
}

/// Errors raised by the field flattening resolver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A message embeds itself, directly or through other messages.
    #[error("cyclic embedding detected in message {message} (via {})", path.join(" -> "))]
    CyclicEmbedding {
        /// The message that was revisited before its resolution completed.
        message: String,
        /// Messages being resolved when the cycle was found, outermost first.
        path: Vec<String>,
    },
}

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
