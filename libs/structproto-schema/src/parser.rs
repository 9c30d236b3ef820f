// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Proto3 snapshot parsing.
//!
//! The source is parsed into a `FileDescriptorProto` without resolving
//! imports or types, then reduced to what field numbering needs: message
//! names and their numbered elements.

use std::collections::HashSet;
use std::path::Path;

use prost_types::{DescriptorProto, FieldDescriptorProto};

use crate::error::{Result, SchemaError};
use crate::snapshot::{ElementKind, ProtoSnapshot, SnapshotElement, SnapshotMessage};

/// Largest field number proto allows.
pub const MAX_FIELD_NUMBER: i64 = 536_870_911;

/// Parse a snapshot from proto source text.
pub fn parse_proto(source: &str) -> Result<ProtoSnapshot> {
    let file = protox_parse::parse("snapshot.proto", source).map_err(|e| SchemaError::Malformed {
        message: e.to_string(),
    })?;

    let mut messages = Vec::new();
    for message in &file.message_type {
        collect_message(message, &mut messages)?;
    }
    Ok(ProtoSnapshot { messages })
}

/// Parse a snapshot from a proto file.
pub fn parse_proto_file(path: &Path) -> Result<ProtoSnapshot> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SchemaError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            SchemaError::Io(e)
        }
    })?;

    parse_proto(&source)
}

/// Flattens a message and its nested messages, parent first. Nested
/// messages are recorded under their simple name. Synthetic map entry
/// types are not messages of their own.
fn collect_message(descriptor: &DescriptorProto, out: &mut Vec<SnapshotMessage>) -> Result<()> {
    let map_entries: HashSet<&str> = descriptor
        .nested_type
        .iter()
        .filter(|nested| is_map_entry(nested))
        .map(|nested| nested.name())
        .collect();

    let mut message = SnapshotMessage::new(descriptor.name());
    for field in &descriptor.field {
        let kind = field_kind(field, &map_entries);
        let number = i64::from(field.number());
        if !(1..=MAX_FIELD_NUMBER).contains(&number) {
            return Err(SchemaError::Malformed {
                message: format!(
                    "field {}.{} has number {} outside 1..={}",
                    descriptor.name(),
                    field.name(),
                    number,
                    MAX_FIELD_NUMBER
                ),
            });
        }
        message.elements.push(SnapshotElement {
            name: field.name().to_string(),
            kind,
            number,
        });
    }
    for constant in descriptor.enum_type.iter().flat_map(|e| &e.value) {
        message.elements.push(SnapshotElement {
            name: constant.name().to_string(),
            kind: ElementKind::EnumConstant,
            number: i64::from(constant.number()),
        });
    }
    out.push(message);

    for nested in descriptor.nested_type.iter().filter(|n| !is_map_entry(n)) {
        collect_message(nested, out)?;
    }
    Ok(())
}

fn field_kind(field: &FieldDescriptorProto, map_entries: &HashSet<&str>) -> ElementKind {
    let entry_name = field.type_name().rsplit('.').next().unwrap_or_default();
    if map_entries.contains(entry_name) {
        ElementKind::Map
    } else if field.oneof_index.is_some() && !field.proto3_optional() {
        ElementKind::OneofField
    } else {
        ElementKind::Normal
    }
}

fn is_map_entry(descriptor: &DescriptorProto) -> bool {
    descriptor
        .options
        .as_ref()
        .is_some_and(|options| options.map_entry())
}
