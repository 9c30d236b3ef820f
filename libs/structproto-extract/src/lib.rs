// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Record declarations from Rust source.
//!
//! Public structs become records. Public fields become proto fields in
//! declaration order, and `#[serde(flatten)]` fields become embedding
//! markers. Field behavior can be adjusted with `#[proto(...)]`:
//!
//! ```ignore
//! pub struct EventField {
//!     #[proto(name = "ID", tags = "json:\"id\"")]
//!     pub id: String,
//!     #[serde(flatten)]
//!     pub embedded: EmbeddedStruct,
//!     #[proto(skip)]
//!     pub cached: String,
//! }
//! ```

pub mod attributes;
pub mod error;
pub mod naming;
pub mod types;
pub mod visitor;

use std::path::{Path, PathBuf};

use structproto_schema::{RecordDecl, RecordSet};
use syn::visit::Visit;
use walkdir::WalkDir;

pub use error::{ExtractError, Result, SourceError};
pub use naming::FieldNaming;

use visitor::RecordCollector;

/// Options for record extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// How field names are written.
    pub naming: FieldNaming,
}

/// Extract every record from the given files and directories.
///
/// Directories are searched recursively for `.rs` files. When two records
/// share a name, the first one found is kept.
pub fn extract_sources<P: AsRef<Path>>(paths: &[P], options: &ExtractOptions) -> Result<RecordSet> {
    let mut records = RecordSet::new();

    for file in source_files(paths)? {
        for record in extract_file(&file, options)? {
            records.insert(record);
        }
    }

    tracing::info!("Extracted {} records", records.len());
    Ok(records)
}

/// Extract the records declared in one file, in source order.
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<Vec<RecordDecl>> {
    let source = std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records = parse_records(&source, options).map_err(|e| match e {
        SourceError::Parse(e) => ExtractError::Parse {
            path: path.to_path_buf(),
            line: e.span().start().line,
            message: e.to_string(),
        },
        SourceError::Attribute(e) => ExtractError::Attribute {
            path: path.to_path_buf(),
            line: e.span().start().line,
            message: e.to_string(),
        },
    })?;

    tracing::debug!("{}: {} records", path.display(), records.len());
    Ok(records)
}

/// Extract the records declared in Rust source text.
pub fn parse_records(
    source: &str,
    options: &ExtractOptions,
) -> std::result::Result<Vec<RecordDecl>, SourceError> {
    let file = syn::parse_file(source).map_err(SourceError::Parse)?;

    let mut collector = RecordCollector::new(options.naming);
    collector.visit_file(&file);

    match collector.errors.into_iter().next() {
        Some(e) => Err(SourceError::Attribute(e)),
        None => Ok(collector.records),
    }
}

/// All `.rs` files under `paths`, each directory in sorted order.
fn source_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|e| ExtractError::Io {
                path: e.path().unwrap_or(path).to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs") {
                files.push(entry.into_path());
            }
        }
    }

    tracing::debug!("Found {} source files", files.len());
    Ok(files)
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name == "target")
}
