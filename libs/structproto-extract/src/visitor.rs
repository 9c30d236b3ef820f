// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Struct collection from a parsed source file.

use structproto_schema::{DeclaredField, FieldDecl, RecordDecl};
use syn::ext::IdentExt;
use syn::visit::{self, Visit};
use syn::{
    Attribute, Field, Fields, ImplItemFn, ItemFn, ItemMod, ItemStruct, Meta, TraitItemFn,
    Visibility,
};

use crate::attributes::FieldAttributes;
use crate::naming::FieldNaming;
use crate::types::{embedded_record_name, map_type};

/// Collects every struct with named fields, in source order.
///
/// Inline modules are searched, except `#[cfg(test)]` ones. Function and
/// method bodies are not.
pub struct RecordCollector {
    naming: FieldNaming,
    pub records: Vec<RecordDecl>,
    pub errors: Vec<syn::Error>,
}

impl RecordCollector {
    pub fn new(naming: FieldNaming) -> Self {
        Self {
            naming,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn record_from(&mut self, item: &ItemStruct) -> Option<RecordDecl> {
        let named = match &item.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                tracing::debug!("Skipping tuple struct '{}'", item.ident);
                return None;
            }
        };

        let name = item.ident.unraw().to_string();
        let mut fields = Vec::new();
        for field in named {
            match self.field_from(&name, field) {
                Ok(Some(decl)) => fields.push(decl),
                Ok(None) => {}
                Err(e) => self.errors.push(e),
            }
        }

        let mut record = RecordDecl::new(name, fields);
        record.exported = is_public(&item.vis);
        Some(record)
    }

    fn field_from(&self, record: &str, field: &Field) -> syn::Result<Option<FieldDecl>> {
        let Some(ident) = &field.ident else {
            return Ok(None);
        };
        let attrs = FieldAttributes::parse(&field.attrs)?;
        if !is_public(&field.vis) || attrs.skip {
            return Ok(None);
        }

        let raw = ident.unraw().to_string();
        let name = attrs.name.unwrap_or_else(|| self.naming.apply(&raw));

        if attrs.flatten {
            return Ok(match embedded_record_name(&field.ty) {
                Some(target) => Some(FieldDecl::embedded(name, target)),
                None => {
                    tracing::warn!("{}.{}: cannot flatten this type, skipping", record, raw);
                    None
                }
            });
        }

        let Some(mapped) = map_type(&field.ty) else {
            tracing::warn!("{}.{}: no proto type for this field, skipping", record, raw);
            return Ok(None);
        };

        let mut declared = DeclaredField::new(name, mapped.ty);
        if mapped.repeated {
            declared = declared.repeated();
        }
        if let Some(tags) = attrs.tags {
            declared = declared.with_tags(tags);
        }
        Ok(Some(declared.into()))
    }
}

impl<'ast> Visit<'ast> for RecordCollector {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        if let Some(record) = self.record_from(item) {
            self.records.push(record);
        }
    }

    fn visit_item_mod(&mut self, item: &'ast ItemMod) {
        if is_cfg_test(&item.attrs) {
            return;
        }
        visit::visit_item_mod(self, item);
    }

    fn visit_item_fn(&mut self, _item: &'ast ItemFn) {}

    fn visit_impl_item_fn(&mut self, _item: &'ast ImplItemFn) {}

    fn visit_trait_item_fn(&mut self, _item: &'ast TraitItemFn) {}
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && matches!(&attr.meta, Meta::List(list) if list.tokens.to_string() == "test")
    })
}
