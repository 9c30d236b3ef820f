// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! structproto CLI
//!
//! Generates a proto3 schema from Rust structs, keeping field numbers stable
//! across runs when given the previously generated file.

mod config;
mod generate;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use structproto_extract::FieldNaming;

use config::Config;
use generate::GenerateSettings;

#[derive(Parser, Debug)]
#[command(name = "structproto")]
#[command(author, version, about = "Generate proto3 schemas with stable field numbers", long_about = None)]
struct Cli {
    /// Rust source file or directory (can be specified multiple times)
    #[arg(short = 'p', long = "source", value_name = "PATH")]
    sources: Vec<PathBuf>,

    /// Directory the proto file is written to (must exist)
    #[arg(short = 'f', long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Previously generated proto file, used to keep field numbers stable
    #[arg(short = 'c', long, value_name = "FILE")]
    current: Option<PathBuf>,

    /// Use snake_case field names instead of lowerCamelCase
    #[arg(short = 's', long)]
    snake_case: bool,

    /// Only emit messages whose name contains this string
    #[arg(long)]
    filter: Option<String>,

    /// Proto package name (default: proto)
    #[arg(long)]
    package: Option<String>,

    /// Output file name inside the output directory (default: output.proto)
    #[arg(long, value_name = "NAME")]
    output_file: Option<String>,

    /// Do not free the numbers of removed fields for reuse
    #[arg(long)]
    no_reclaim: bool,

    /// Config file (default: structproto.toml in the working directory, if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Merge flags over config values.
    fn into_settings(self, config: Config) -> Result<GenerateSettings> {
        let sources = if self.sources.is_empty() {
            config.sources
        } else {
            self.sources
        };
        if sources.is_empty() {
            bail!("No source paths given (use -p or `sources` in the config file)");
        }

        let Some(out_dir) = self.out_dir.or(config.out_dir) else {
            bail!("No output directory given (use -f or `out_dir` in the config file)");
        };

        let snake_case = self.snake_case || config.snake_case.unwrap_or(false);
        let reclaim_removed = !self.no_reclaim && config.reclaim_removed.unwrap_or(true);

        Ok(GenerateSettings {
            sources,
            out_dir,
            current: self.current.or(config.current),
            filter: self.filter.or(config.filter).filter(|f| !f.is_empty()),
            naming: if snake_case {
                FieldNaming::SnakeCase
            } else {
                FieldNaming::LowerCamelCase
            },
            package: self
                .package
                .or(config.package)
                .unwrap_or_else(|| "proto".to_string()),
            output_file: self
                .output_file
                .or(config.output_file)
                .unwrap_or_else(|| "output.proto".to_string()),
            reclaim_removed,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = Config::discover(cli.config.as_deref(), &working_dir)?;
    let settings = cli.into_settings(config)?;

    tracing::debug!("Settings: {:?}", settings);
    generate::run(&settings)?;

    Ok(())
}
