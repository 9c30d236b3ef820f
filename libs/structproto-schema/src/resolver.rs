// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Embedded-record flattening and field numbering.
//!
//! Resolving a message walks its declared entries in order. A real field
//! takes its number from the message's own ledger. An embedding marker gives
//! up whatever number it held, the embedded record is resolved the same way,
//! and each of its fields is then numbered again in the *enclosing*
//! message's ledger, at the position the marker occupied.
//!
//! Traversal uses an explicit stack. A message reached again while it is
//! still being resolved is reported as [`ResolveError::CyclicEmbedding`].

use std::collections::HashSet;

use crate::definition::{FieldDecl, Message, RecordDecl, RecordSet, ResolvedField};
use crate::error::ResolveError;
use crate::registry::SchemaRegistry;

/// Options for a full resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Release numbers of fields that no longer exist before numbering, so
    /// new fields can reuse them.
    pub reclaim_removed: bool,
    /// Only messages whose name contains this substring are emitted.
    pub filter: Option<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            reclaim_removed: true,
            filter: None,
        }
    }
}

impl ResolveOptions {
    /// Whether `message` passes the name filter.
    pub fn selects(&self, message: &str) -> bool {
        match &self.filter {
            Some(filter) => message.contains(filter.as_str()),
            None => true,
        }
    }
}

struct Frame<'r> {
    record: &'r RecordDecl,
    cursor: usize,
    output: Vec<ResolvedField>,
}

impl<'r> Frame<'r> {
    fn new(record: &'r RecordDecl) -> Self {
        Self {
            record,
            cursor: 0,
            output: Vec::new(),
        }
    }
}

/// Resolves record declarations against a registry.
pub struct FieldResolver<'a> {
    registry: &'a mut SchemaRegistry,
    records: &'a RecordSet,
}

impl<'a> FieldResolver<'a> {
    pub fn new(registry: &'a mut SchemaRegistry, records: &'a RecordSet) -> Self {
        Self { registry, records }
    }

    /// Flatten and number one message.
    ///
    /// An unknown message, like an embedding marker pointing at an unknown
    /// record, contributes no fields.
    pub fn resolve(&mut self, message: &str) -> Result<Vec<ResolvedField>, ResolveError> {
        let records = self.records;
        let Some(root) = records.get(message) else {
            tracing::warn!("No declaration for message '{}'", message);
            return Ok(Vec::new());
        };

        let mut resolved = Vec::new();
        let mut in_progress: HashSet<&str> = HashSet::from([root.name.as_str()]);
        let mut stack = vec![Frame::new(root)];

        while let Some(frame) = stack.last_mut() {
            let record = frame.record;
            let current = record.name.as_str();
            let next = record.fields.get(frame.cursor);
            frame.cursor += 1;

            match next {
                Some(FieldDecl::Field(field)) => {
                    let number = self.registry.assign_field_number(current, &field.name);
                    frame.output.push(ResolvedField::from_declared(field, number));
                }
                Some(FieldDecl::Embedded(marker)) => {
                    self.registry.release_field_number(current, &marker.name);

                    if in_progress.contains(marker.message.as_str()) {
                        return Err(cycle_error(&stack, &marker.message));
                    }

                    match records.get(&marker.message) {
                        Some(embedded) => {
                            in_progress.insert(embedded.name.as_str());
                            stack.push(Frame::new(embedded));
                        }
                        None => tracing::warn!(
                            "'{}' embeds unknown record '{}', no fields promoted",
                            current,
                            marker.message
                        ),
                    }
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    in_progress.remove(done.record.name.as_str());

                    match stack.last_mut() {
                        Some(parent) => {
                            let outer = parent.record.name.as_str();
                            for field in done.output {
                                let number = self.registry.assign_field_number(outer, &field.name);
                                parent.output.push(ResolvedField { number, ..field });
                            }
                        }
                        None => resolved = done.output,
                    }
                }
            }
        }

        warn_duplicate_names(message, &resolved);
        Ok(resolved)
    }

    /// Release numbers held by fields that `message` no longer has after
    /// flattening. Returns the released names, lowest number first.
    pub fn reclaim_removed(&mut self, message: &str) -> Result<Vec<String>, ResolveError> {
        let keep: HashSet<String> = flattened_field_names(self.records, message)?
            .into_iter()
            .collect();
        let released = self.registry.release_fields_except(message, &keep);
        if !released.is_empty() {
            tracing::info!(
                "'{}': released numbers of removed fields {:?}",
                message,
                released
            );
        }
        Ok(released)
    }
}

/// Names a message has after flattening, in position order, without touching
/// any numbering.
pub fn flattened_field_names(records: &RecordSet, message: &str) -> Result<Vec<String>, ResolveError> {
    let Some(root) = records.get(message) else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    let mut in_progress: HashSet<&str> = HashSet::from([root.name.as_str()]);
    let mut stack = vec![Frame::new(root)];

    while let Some(frame) = stack.last_mut() {
        let record = frame.record;
        let next = record.fields.get(frame.cursor);
        frame.cursor += 1;

        match next {
            Some(FieldDecl::Field(field)) => names.push(field.name.clone()),
            Some(FieldDecl::Embedded(marker)) => {
                if in_progress.contains(marker.message.as_str()) {
                    return Err(cycle_error(&stack, &marker.message));
                }
                if let Some(embedded) = records.get(&marker.message) {
                    in_progress.insert(embedded.name.as_str());
                    stack.push(Frame::new(embedded));
                }
            }
            None => {
                if let Some(done) = stack.pop() {
                    in_progress.remove(done.record.name.as_str());
                }
            }
        }
    }

    Ok(names)
}

/// Resolve every exported record selected by `options`, in name order.
///
/// When reclamation is enabled, removed fields of every record give up
/// their numbers first.
pub fn resolve_messages(
    registry: &mut SchemaRegistry,
    records: &RecordSet,
    options: &ResolveOptions,
) -> Result<Vec<Message>, ResolveError> {
    let mut resolver = FieldResolver::new(registry, records);

    if options.reclaim_removed {
        for record in records.iter() {
            resolver.reclaim_removed(&record.name)?;
        }
    }

    let mut messages = Vec::new();
    for record in records.iter() {
        if !record.exported || !options.selects(&record.name) {
            continue;
        }
        let fields = resolver.resolve(&record.name)?;
        tracing::debug!("Resolved '{}' ({} fields)", record.name, fields.len());
        messages.push(Message {
            name: record.name.clone(),
            fields,
        });
    }

    tracing::info!("Resolved {} messages", messages.len());
    Ok(messages)
}

fn cycle_error(stack: &[Frame<'_>], revisited: &str) -> ResolveError {
    let mut path: Vec<String> = stack.iter().map(|f| f.record.name.clone()).collect();
    path.push(revisited.to_string());
    ResolveError::CyclicEmbedding {
        message: revisited.to_string(),
        path,
    }
}

fn warn_duplicate_names(message: &str, fields: &[ResolvedField]) {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            tracing::warn!(
                "'{}' has field '{}' more than once after flattening",
                message,
                field.name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TypeDescriptor;
    use crate::snapshot::{ElementKind, ProtoSnapshot, SnapshotMessage};

    fn string_field(name: &str) -> FieldDecl {
        FieldDecl::field(name, TypeDescriptor::named("string"))
    }

    fn outer_inner(inner_fields: &[&str], outer_fields: Vec<FieldDecl>) -> RecordSet {
        [
            RecordDecl::new("Outer", outer_fields),
            RecordDecl::new(
                "Inner",
                inner_fields.iter().map(|n| string_field(n)).collect(),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn numbering(fields: &[ResolvedField]) -> Vec<(&str, u32)> {
        fields.iter().map(|f| (f.name.as_str(), f.number)).collect()
    }

    #[test]
    fn test_flattening_promotes_embedded_fields() {
        let records = outer_inner(
            &["a", "b"],
            vec![string_field("c"), FieldDecl::embedded("inner", "Inner")],
        );
        let mut registry = SchemaRegistry::new();

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Outer")
            .unwrap();

        assert_eq!(numbering(&fields), vec![("c", 1), ("a", 2), ("b", 3)]);
        // The embedded record is numbered in its own namespace as well.
        let inner = registry.ledger("Inner").unwrap();
        assert_eq!(inner.number_of("a"), Some(1));
        assert_eq!(inner.number_of("b"), Some(2));
    }

    #[test]
    fn test_embedded_fields_keep_metadata() {
        let records: RecordSet = [
            RecordDecl::new("Outer", vec![FieldDecl::embedded("inner", "Inner")]),
            RecordDecl::new(
                "Inner",
                vec![FieldDecl::Field(
                    crate::definition::DeclaredField::new("ids", TypeDescriptor::named("int64"))
                        .repeated()
                        .with_tags("json:\"ids\""),
                )],
            ),
        ]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Outer")
            .unwrap();

        assert_eq!(fields.len(), 1);
        assert!(fields[0].repeated);
        assert_eq!(fields[0].ty, TypeDescriptor::named("int64"));
        assert_eq!(fields[0].tags.as_deref(), Some("json:\"ids\""));
    }

    #[test]
    fn test_stability_under_regeneration() {
        let snapshot = ProtoSnapshot {
            messages: vec![
                SnapshotMessage::new("Outer")
                    .with_element("c", ElementKind::Normal, 1)
                    .with_element("a", ElementKind::Normal, 2)
                    .with_element("b", ElementKind::Normal, 3),
                SnapshotMessage::new("Inner")
                    .with_element("a", ElementKind::Normal, 1)
                    .with_element("b", ElementKind::Normal, 2),
            ],
        };
        let records = outer_inner(
            &["b"],
            vec![
                string_field("c"),
                string_field("d"),
                FieldDecl::embedded("inner", "Inner"),
            ],
        );
        let mut registry = SchemaRegistry::from_snapshot(&snapshot);

        let messages =
            resolve_messages(&mut registry, &records, &ResolveOptions::default()).unwrap();

        let outer = messages.iter().find(|m| m.name == "Outer").unwrap();
        assert_eq!(outer.numbering(), vec![("c", 1), ("d", 2), ("b", 3)]);
        let inner = messages.iter().find(|m| m.name == "Inner").unwrap();
        assert_eq!(inner.numbering(), vec![("b", 2)]);
    }

    #[test]
    fn test_without_reclaim_new_fields_continue_from_mark() {
        let snapshot = ProtoSnapshot {
            messages: vec![
                SnapshotMessage::new("Outer")
                    .with_element("c", ElementKind::Normal, 1)
                    .with_element("a", ElementKind::Normal, 2)
                    .with_element("b", ElementKind::Normal, 3),
            ],
        };
        let records = outer_inner(
            &["b"],
            vec![
                string_field("c"),
                string_field("d"),
                FieldDecl::embedded("inner", "Inner"),
            ],
        );
        let mut registry = SchemaRegistry::from_snapshot(&snapshot);
        let options = ResolveOptions {
            reclaim_removed: false,
            filter: Some("Outer".to_string()),
        };

        let messages = resolve_messages(&mut registry, &records, &options).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].numbering(), vec![("c", 1), ("d", 4), ("b", 3)]);
    }

    #[test]
    fn test_marker_number_is_released_for_reuse() {
        // `inner` used to be a plain sub-message field holding number 2.
        let snapshot = ProtoSnapshot {
            messages: vec![
                SnapshotMessage::new("Outer")
                    .with_element("c", ElementKind::Normal, 1)
                    .with_element("inner", ElementKind::Normal, 2),
            ],
        };
        let records = outer_inner(
            &["a", "b"],
            vec![string_field("c"), FieldDecl::embedded("inner", "Inner")],
        );
        let mut registry = SchemaRegistry::from_snapshot(&snapshot);

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Outer")
            .unwrap();

        assert_eq!(numbering(&fields), vec![("c", 1), ("a", 2), ("b", 3)]);
        assert_eq!(registry.ledger("Outer").unwrap().number_of("inner"), None);
    }

    #[test]
    fn test_double_embedding() {
        let records: RecordSet = [
            RecordDecl::new(
                "EventField",
                vec![
                    string_field("id"),
                    FieldDecl::embedded("embeddedStruct", "EmbeddedStruct"),
                    string_field("tail"),
                ],
            ),
            RecordDecl::new(
                "EmbeddedStruct",
                vec![
                    string_field("newEmbeddedField"),
                    FieldDecl::embedded("doubleEmbeddedStruct", "DoubleEmbeddedStruct"),
                    string_field("idEmbedded"),
                ],
            ),
            RecordDecl::new("DoubleEmbeddedStruct", vec![string_field("idDoubleEmbedded")]),
        ]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("EventField")
            .unwrap();

        assert_eq!(
            numbering(&fields),
            vec![
                ("id", 1),
                ("newEmbeddedField", 2),
                ("idDoubleEmbedded", 3),
                ("idEmbedded", 4),
                ("tail", 5),
            ]
        );
    }

    #[test]
    fn test_resolution_order_does_not_change_numbers() {
        let records = outer_inner(
            &["a", "b"],
            vec![FieldDecl::embedded("inner", "Inner"), string_field("c")],
        );

        let mut first = SchemaRegistry::new();
        let outer_first = {
            let mut resolver = FieldResolver::new(&mut first, &records);
            let outer = resolver.resolve("Outer").unwrap();
            resolver.resolve("Inner").unwrap();
            outer
        };

        let mut second = SchemaRegistry::new();
        let outer_second = {
            let mut resolver = FieldResolver::new(&mut second, &records);
            resolver.resolve("Inner").unwrap();
            resolver.resolve("Outer").unwrap()
        };

        assert_eq!(outer_first, outer_second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_resolution_is_idempotent() {
        let records = outer_inner(
            &["a", "b"],
            vec![string_field("c"), FieldDecl::embedded("inner", "Inner")],
        );
        let mut registry = SchemaRegistry::new();
        let mut resolver = FieldResolver::new(&mut registry, &records);

        let first = resolver.resolve("Outer").unwrap();
        let second = resolver.resolve("Outer").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_self_embedding_is_detected() {
        let records: RecordSet = [RecordDecl::new(
            "Node",
            vec![string_field("value"), FieldDecl::embedded("node", "Node")],
        )]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let err = FieldResolver::new(&mut registry, &records)
            .resolve("Node")
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::CyclicEmbedding {
                message: "Node".to_string(),
                path: vec!["Node".to_string(), "Node".to_string()],
            }
        );
        assert!(err.to_string().contains("cyclic embedding detected in message Node"));
    }

    #[test]
    fn test_transitive_cycle_is_detected() {
        let records: RecordSet = [
            RecordDecl::new("A", vec![FieldDecl::embedded("b", "B")]),
            RecordDecl::new("B", vec![string_field("x"), FieldDecl::embedded("c", "C")]),
            RecordDecl::new("C", vec![FieldDecl::embedded("a", "A")]),
        ]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let err = resolve_messages(&mut registry, &records, &ResolveOptions::default())
            .unwrap_err();

        let ResolveError::CyclicEmbedding { message, path } = err;
        assert_eq!(message, "A");
        assert_eq!(path, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn test_same_record_embedded_twice_is_not_a_cycle() {
        let records: RecordSet = [
            RecordDecl::new(
                "Pair",
                vec![
                    FieldDecl::embedded("left", "Point"),
                    FieldDecl::embedded("right", "Point"),
                ],
            ),
            RecordDecl::new("Point", vec![string_field("x")]),
        ]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Pair")
            .unwrap();

        // Promoted names collide and share one number.
        assert_eq!(numbering(&fields), vec![("x", 1), ("x", 1)]);
    }

    #[test]
    fn test_unknown_embedded_record_contributes_nothing() {
        let records: RecordSet = [RecordDecl::new(
            "Outer",
            vec![string_field("c"), FieldDecl::embedded("ghost", "Ghost"), string_field("d")],
        )]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Outer")
            .unwrap();

        assert_eq!(numbering(&fields), vec![("c", 1), ("d", 2)]);
    }

    #[test]
    fn test_unknown_message_resolves_empty() {
        let records = RecordSet::new();
        let mut registry = SchemaRegistry::new();
        let fields = FieldResolver::new(&mut registry, &records)
            .resolve("Missing")
            .unwrap();
        assert!(fields.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_flattened_field_names() {
        let records = outer_inner(
            &["a", "b"],
            vec![FieldDecl::embedded("inner", "Inner"), string_field("c")],
        );
        assert_eq!(
            flattened_field_names(&records, "Outer").unwrap(),
            vec!["a", "b", "c"]
        );
        assert!(flattened_field_names(&records, "Nope").unwrap().is_empty());
    }

    #[test]
    fn test_unexported_records_are_embeddable_but_not_emitted() {
        let mut hidden = RecordDecl::new("Hidden", vec![string_field("secret")]);
        hidden.exported = false;
        let records: RecordSet = [
            RecordDecl::new("Shown", vec![FieldDecl::embedded("hidden", "Hidden")]),
            hidden,
        ]
        .into_iter()
        .collect();
        let mut registry = SchemaRegistry::new();

        let messages =
            resolve_messages(&mut registry, &records, &ResolveOptions::default()).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].name, "Shown");
        assert_eq!(messages[0].numbering(), vec![("secret", 1)]);
    }

    #[test]
    fn test_filter_selects_by_substring() {
        let options = ResolveOptions {
            reclaim_removed: true,
            filter: Some("Event".to_string()),
        };
        assert!(options.selects("EventField"));
        assert!(options.selects("SubEvent"));
        assert!(!options.selects("User"));
        assert!(ResolveOptions::default().selects("Anything"));
    }
}
