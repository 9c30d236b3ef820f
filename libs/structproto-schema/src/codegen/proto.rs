// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Proto3 text generation from resolved messages.

use crate::definition::{Message, ResolvedField};

/// File-level settings for generated proto text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoOptions {
    /// `package` statement.
    pub package: String,
    /// Files listed in `import` statements.
    pub imports: Vec<String>,
    /// Line comment written above every message (without the `//`).
    pub message_comment: Option<String>,
    /// Option name that carries field tag metadata.
    pub tags_option: String,
}

impl Default for ProtoOptions {
    fn default() -> Self {
        Self {
            package: "proto".to_string(),
            imports: vec!["tagger/tagger.proto".to_string()],
            message_comment: Some("easyjson:json".to_string()),
            tags_option: "(tagger.tags)".to_string(),
        }
    }
}

/// Generate a proto3 file for `messages`, in the given order.
pub fn generate_proto(messages: &[Message], options: &ProtoOptions) -> String {
    let mut code = String::new();

    // File header
    code.push_str("syntax = \"proto3\";\n");
    code.push_str(&format!("package {};\n", options.package));
    if !options.imports.is_empty() {
        code.push('\n');
        for import in &options.imports {
            code.push_str(&format!("import \"{}\";\n", import));
        }
    }

    for message in messages {
        code.push('\n');
        code.push_str(&generate_message(message, options));
    }

    code
}

fn generate_message(message: &Message, options: &ProtoOptions) -> String {
    let mut code = String::new();

    if let Some(comment) = &options.message_comment {
        code.push_str(&format!("//{}\n", comment));
    }
    code.push_str(&format!("message {} {{\n", message.name));
    for field in &message.fields {
        code.push_str(&generate_field(field, options));
    }
    code.push_str("}\n");

    code
}

fn generate_field(field: &ResolvedField, options: &ProtoOptions) -> String {
    let label = if field.repeated { "repeated " } else { "" };
    let field_options = match field.tags.as_deref() {
        Some(tags) if !tags.is_empty() => {
            format!(" [{} = \"{}\"]", options.tags_option, escape_quotes(tags))
        }
        _ => String::new(),
    };

    format!(
        "  {}{} {} = {}{};\n",
        label, field.ty, field.name, field.number, field_options
    )
}

/// Escape a value for use inside a double-quoted proto string.
///
/// Control characters are written as `\xNN` per UTF-8 byte.
fn escape_quotes(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    escaped.push_str(&format!("\\x{:02x}", byte));
                }
            }
            c => escaped.push(c),
        }
    }
    escaped
}
