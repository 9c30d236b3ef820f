// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Proto field naming.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// How Rust field names become proto field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldNaming {
    /// `event_field_id` → `eventFieldId`
    #[default]
    LowerCamelCase,
    /// `event_field_id` → `event_field_id`
    SnakeCase,
}

impl FieldNaming {
    /// Convert a Rust identifier (without any `r#` prefix).
    pub fn apply(self, ident: &str) -> String {
        match self {
            FieldNaming::LowerCamelCase => ident.to_lower_camel_case(),
            FieldNaming::SnakeCase => ident.to_snake_case(),
        }
    }
}
