// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Record declaration and resolved message types.

use std::collections::BTreeMap;
use std::fmt;

use crate::ledger::FieldNumber;

// ============================================================================
// Declarations (input to the resolver)
// ============================================================================

/// Proto type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A scalar (`string`, `int64`, ...) or a message type name.
    Named(String),
    /// An associative field, rendered as `map<K, V>`.
    Map { key: String, value: String },
}

impl TypeDescriptor {
    /// Shorthand for [`TypeDescriptor::Named`].
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Named(name) => f.write_str(name),
            TypeDescriptor::Map { key, value } => write!(f, "map<{}, {}>", key, value),
        }
    }
}

/// A real field declared on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredField {
    /// Proto field name.
    pub name: String,
    /// Proto type.
    pub ty: TypeDescriptor,
    /// Whether the field is `repeated`.
    pub repeated: bool,
    /// Opaque tag metadata, passed through to the output untouched.
    pub tags: Option<String>,
}

impl DeclaredField {
    /// A non-repeated field without tags.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            repeated: false,
            tags: None,
        }
    }

    /// Mark the field as `repeated`.
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Attach tag metadata.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }
}

/// A record whose fields are promoted into the enclosing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingMarker {
    /// Name the marker was declared under in the enclosing record.
    pub name: String,
    /// Name of the embedded record.
    pub message: String,
}

/// One entry of a record's declared field list, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDecl {
    Field(DeclaredField),
    Embedded(EmbeddingMarker),
}

impl FieldDecl {
    /// Shorthand for a plain, non-repeated field.
    pub fn field(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        FieldDecl::Field(DeclaredField::new(name, ty))
    }

    /// Shorthand for an embedding marker.
    pub fn embedded(name: impl Into<String>, message: impl Into<String>) -> Self {
        FieldDecl::Embedded(EmbeddingMarker {
            name: name.into(),
            message: message.into(),
        })
    }

    /// The name the entry was declared under.
    pub fn name(&self) -> &str {
        match self {
            FieldDecl::Field(field) => &field.name,
            FieldDecl::Embedded(marker) => &marker.name,
        }
    }
}

impl From<DeclaredField> for FieldDecl {
    fn from(field: DeclaredField) -> Self {
        FieldDecl::Field(field)
    }
}

/// A record declaration as extracted from source, before flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDecl {
    /// Message name.
    pub name: String,
    /// Declared entries in source order.
    pub fields: Vec<FieldDecl>,
    /// Whether the record is emitted as a message. Non-exported records can
    /// still be embedded.
    pub exported: bool,
}

impl RecordDecl {
    /// An exported record.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.into(),
            fields,
            exported: true,
        }
    }
}

/// All record declarations of one generation run, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeMap<String, RecordDecl>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. The first declaration of a name wins; returns `false`
    /// when `record` was ignored as a duplicate.
    pub fn insert(&mut self, record: RecordDecl) -> bool {
        if self.records.contains_key(&record.name) {
            tracing::warn!(
                "Record '{}' declared more than once, keeping the first declaration",
                record.name
            );
            return false;
        }
        self.records.insert(record.name.clone(), record);
        true
    }

    pub fn get(&self, name: &str) -> Option<&RecordDecl> {
        self.records.get(name)
    }

    /// Records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordDecl> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RecordDecl> for RecordSet {
    fn from_iter<I: IntoIterator<Item = RecordDecl>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

// ============================================================================
// Resolved messages (output of the resolver)
// ============================================================================

/// A field with its final number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub ty: TypeDescriptor,
    pub repeated: bool,
    pub number: FieldNumber,
    pub tags: Option<String>,
}

impl ResolvedField {
    pub(crate) fn from_declared(field: &DeclaredField, number: FieldNumber) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            repeated: field.repeated,
            number,
            tags: field.tags.clone(),
        }
    }
}

/// A flattened, numbered message ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub name: String,
    /// Fields in position order.
    pub fields: Vec<ResolvedField>,
}

impl Message {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `(name, number)` pairs in position order.
    pub fn numbering(&self) -> Vec<(&str, FieldNumber)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.number))
            .collect()
    }
}
