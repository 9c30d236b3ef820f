// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Stable field numbering and proto3 generation for record declarations.
//!
//! This crate provides:
//! - Per-message number ledgers with FIFO reuse of released numbers
//! - Embedded-record flattening into the enclosing message's numbering
//! - A proto3 reader for seeding numbers from a previous schema
//! - Proto3 code generation
//!
//! # Example
//!
//! ```
//! use structproto_schema::{
//!     codegen, parse_proto, resolve_messages, FieldDecl, RecordDecl, RecordSet,
//!     ResolveOptions, SchemaRegistry, TypeDescriptor,
//! };
//!
//! let previous = parse_proto("syntax = \"proto3\"; message User { string name = 2; }").unwrap();
//! let mut registry = SchemaRegistry::from_snapshot(&previous);
//!
//! let records: RecordSet = [RecordDecl::new(
//!     "User",
//!     vec![
//!         FieldDecl::field("id", TypeDescriptor::named("int64")),
//!         FieldDecl::field("name", TypeDescriptor::named("string")),
//!     ],
//! )]
//! .into_iter()
//! .collect();
//!
//! let messages = resolve_messages(&mut registry, &records, &ResolveOptions::default()).unwrap();
//! // `name` keeps its number; `id` is new and goes past the highest seen.
//! assert_eq!(messages[0].numbering(), vec![("id", 3), ("name", 2)]);
//!
//! let proto = codegen::generate_proto(&messages, &codegen::ProtoOptions::default());
//! assert!(proto.contains("string name = 2;"));
//! ```

pub mod codegen;
pub mod definition;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod snapshot;

pub use definition::{
    DeclaredField, EmbeddingMarker, FieldDecl, Message, RecordDecl, RecordSet, ResolvedField,
    TypeDescriptor,
};
pub use error::{ResolveError, Result, SchemaError};
pub use ledger::{FieldNumber, NumberLedger};
pub use parser::{parse_proto, parse_proto_file};
pub use registry::SchemaRegistry;
pub use resolver::{resolve_messages, FieldResolver, ResolveOptions};
pub use snapshot::{load_snapshot, ElementKind, ProtoSnapshot, SnapshotMessage};
