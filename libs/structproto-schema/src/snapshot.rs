// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Previously emitted schema, as seen by the numbering core.

use std::path::Path;

use crate::error::{Result, SchemaError};
use crate::ledger::FieldNumber;
use crate::parser::parse_proto_file;

/// Kind of a numbered element inside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `[label] type name = N;`
    Normal,
    /// `map<K, V> name = N;`
    Map,
    /// A member of a `oneof` block.
    OneofField,
    /// A constant of an enum nested in the message.
    EnumConstant,
}

impl ElementKind {
    /// Whether this kind takes part in field numbering.
    pub fn is_numbered_field(self) -> bool {
        matches!(self, ElementKind::Normal | ElementKind::Map)
    }
}

/// One numbered element of a snapshot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    pub name: String,
    pub kind: ElementKind,
    /// Field number, or the constant's value for enum constants.
    pub number: i64,
}

/// A message from the previous schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMessage {
    /// Simple (unqualified) message name.
    pub name: String,
    pub elements: Vec<SnapshotElement>,
}

impl SnapshotMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element.
    pub fn with_element(mut self, name: impl Into<String>, kind: ElementKind, number: i64) -> Self {
        self.elements.push(SnapshotElement {
            name: name.into(),
            kind,
            number,
        });
        self
    }

    /// `(name, number)` of every element that takes part in numbering.
    pub fn numbered_fields(&self) -> impl Iterator<Item = (&str, FieldNumber)> {
        self.elements
            .iter()
            .filter(|e| e.kind.is_numbered_field())
            .filter_map(|e| {
                FieldNumber::try_from(e.number)
                    .ok()
                    .map(|n| (e.name.as_str(), n))
            })
    }
}

/// All messages of a previously emitted schema, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoSnapshot {
    pub messages: Vec<SnapshotMessage>,
}

impl ProtoSnapshot {
    /// Snapshot used when no previous schema exists.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn message(&self, name: &str) -> Option<&SnapshotMessage> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Flattened `(message, field, kind, number)` view.
    pub fn tuples(&self) -> impl Iterator<Item = (&str, &str, ElementKind, i64)> {
        self.messages.iter().flat_map(|m| {
            m.elements
                .iter()
                .map(move |e| (m.name.as_str(), e.name.as_str(), e.kind, e.number))
        })
    }
}

/// Load the previous schema, or an empty snapshot when there is none.
///
/// No path, or a path that does not exist yet, means "start fresh". A file
/// that exists but cannot be read or parsed is an error.
pub fn load_snapshot(path: Option<&Path>) -> Result<ProtoSnapshot> {
    let Some(path) = path else {
        tracing::debug!("No previous schema given, starting with empty numbering");
        return Ok(ProtoSnapshot::empty());
    };

    match parse_proto_file(path) {
        Ok(snapshot) => {
            tracing::info!(
                "Loaded previous schema {} ({} messages)",
                path.display(),
                snapshot.messages.len()
            );
            Ok(snapshot)
        }
        Err(SchemaError::FileNotFound { .. }) => {
            tracing::warn!(
                "Previous schema {} does not exist, starting with empty numbering",
                path.display()
            );
            Ok(ProtoSnapshot::empty())
        }
        Err(e) => Err(e),
    }
}
