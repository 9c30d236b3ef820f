// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Field attribute parsing.
//!
//! Reads `#[proto(...)]` and the parts of `#[serde(...)]` that change what a
//! field looks like on the wire.

use proc_macro2::TokenStream;
use syn::{Attribute, Error, Expr, Lit, Result, Token};

/// Parsed attributes of one struct field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldAttributes {
    /// `#[proto(skip)]` or `#[serde(skip)]`
    pub skip: bool,

    /// `#[serde(flatten)]`
    pub flatten: bool,

    /// Custom field name: `#[proto(name = "...")]`
    pub name: Option<String>,

    /// Tag metadata passed through to the schema: `#[proto(tags = "...")]`
    pub tags: Option<String>,
}

impl FieldAttributes {
    /// Parse the attributes of a field.
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if attr.path().is_ident("proto") {
                result.parse_proto(attr)?;
            } else if attr.path().is_ident("serde") {
                result.parse_serde(attr)?;
            }
        }

        Ok(result)
    }

    fn parse_proto(&mut self, attr: &Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            // skip
            if meta.path.is_ident("skip") {
                self.skip = true;
                return Ok(());
            }

            // name = "custom_name"
            if meta.path.is_ident("name") {
                self.name = Some(parse_string_value(&meta)?);
                return Ok(());
            }

            // tags = "json:\"id\""
            if meta.path.is_ident("tags") {
                self.tags = Some(parse_string_value(&meta)?);
                return Ok(());
            }

            Err(meta.error("unsupported proto attribute"))
        })
    }

    fn parse_serde(&mut self, attr: &Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                self.skip = true;
            } else if meta.path.is_ident("flatten") {
                self.flatten = true;
            }

            // Everything else belongs to serde; consume its argument.
            if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                let _: TokenStream = content.parse()?;
            }
            Ok(())
        })
    }
}

/// Helper to parse string value from meta
fn parse_string_value(meta: &syn::meta::ParseNestedMeta) -> Result<String> {
    let value: Lit = meta.value()?.parse()?;
    if let Lit::Str(s) = value {
        Ok(s.value())
    } else {
        Err(Error::new_spanned(value, "expected string literal"))
    }
}
