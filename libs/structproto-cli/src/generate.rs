// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! The generation pipeline: extract, number, render, write.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use structproto_extract::{extract_sources, ExtractOptions, FieldNaming};
use structproto_schema::codegen::{generate_proto, ProtoOptions};
use structproto_schema::{load_snapshot, resolve_messages, ResolveOptions, SchemaRegistry};

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub sources: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub current: Option<PathBuf>,
    pub filter: Option<String>,
    pub naming: FieldNaming,
    pub package: String,
    pub output_file: String,
    pub reclaim_removed: bool,
}

impl GenerateSettings {
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.output_file)
    }
}

/// Run the pipeline and return the path of the written file.
pub fn run(settings: &GenerateSettings) -> Result<PathBuf> {
    if !settings.out_dir.is_dir() {
        bail!(
            "Output directory {} does not exist",
            settings.out_dir.display()
        );
    }

    let snapshot = load_snapshot(settings.current.as_deref())
        .context("Failed to load previous proto file")?;

    let extract_options = ExtractOptions {
        naming: settings.naming,
    };
    let records = extract_sources(settings.sources.as_slice(), &extract_options)
        .context("Failed to extract records from sources")?;

    let mut registry = SchemaRegistry::from_snapshot(&snapshot);
    let resolve_options = ResolveOptions {
        reclaim_removed: settings.reclaim_removed,
        filter: settings.filter.clone(),
    };
    let messages = resolve_messages(&mut registry, &records, &resolve_options)
        .context("Failed to resolve field numbers")?;

    let proto_options = ProtoOptions {
        package: settings.package.clone(),
        ..ProtoOptions::default()
    };
    let code = generate_proto(&messages, &proto_options);

    let output_path = settings.output_path();
    std::fs::write(&output_path, code)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    tracing::info!(
        "Wrote {} messages to {}",
        messages.len(),
        output_path.display()
    );
    Ok(output_path)
}
