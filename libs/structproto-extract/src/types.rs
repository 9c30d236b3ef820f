// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Rust type to proto type mapping.

use structproto_schema::TypeDescriptor;
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Proto type of a field, plus whether it is repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub ty: TypeDescriptor,
    pub repeated: bool,
}

impl MappedType {
    fn single(name: &str) -> Self {
        Self {
            ty: TypeDescriptor::named(name),
            repeated: false,
        }
    }
}

/// Map a Rust field type to its proto type.
///
/// Returns `None` for types with no proto counterpart (tuples, function
/// pointers, trait objects).
pub fn map_type(ty: &Type) -> Option<MappedType> {
    match ty {
        Type::Reference(r) => map_type(&r.elem),
        Type::Paren(p) => map_type(&p.elem),
        Type::Group(g) => map_type(&g.elem),
        Type::Array(a) => repeated_of(&a.elem),
        Type::Slice(s) => repeated_of(&s.elem),
        Type::Path(p) => map_path(p),
        _ => None,
    }
}

/// Name of the record a flattened field embeds.
///
/// `Box`, `Option`, `Rc` and `Arc` wrappers are looked through.
pub fn embedded_record_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Reference(r) => embedded_record_name(&r.elem),
        Type::Paren(p) => embedded_record_name(&p.elem),
        Type::Group(g) => embedded_record_name(&g.elem),
        Type::Path(p) => {
            let segment = p.path.segments.last()?;
            match segment.ident.to_string().as_str() {
                "Box" | "Option" | "Rc" | "Arc" => {
                    embedded_record_name(first_type_arg(&segment.arguments)?)
                }
                name => Some(name.to_string()),
            }
        }
        _ => None,
    }
}

fn map_path(path: &TypePath) -> Option<MappedType> {
    let segment = path.path.segments.last()?;
    let ident = segment.ident.to_string();

    let scalar = match ident.as_str() {
        "i8" | "i16" | "i32" => Some("int32"),
        "i64" | "isize" => Some("int64"),
        "u8" | "u16" | "u32" => Some("uint32"),
        "u64" | "usize" => Some("uint64"),
        "f32" => Some("float"),
        "f64" => Some("double"),
        "bool" => Some("bool"),
        "String" | "str" | "char" => Some("string"),
        "Bytes" | "BytesMut" => Some("bytes"),
        _ => None,
    };
    if let Some(scalar) = scalar {
        return Some(MappedType::single(scalar));
    }

    match ident.as_str() {
        "Option" | "Box" | "Rc" | "Arc" | "Cow" => map_type(first_type_arg(&segment.arguments)?),
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => {
            repeated_of(first_type_arg(&segment.arguments)?)
        }
        "HashMap" | "BTreeMap" => {
            let mut args = type_args(&segment.arguments);
            let key = map_type(args.next()?)?;
            let value = map_type(args.next()?)?;
            if !is_map_key(&key) || !is_single(&value) {
                return None;
            }
            Some(MappedType {
                ty: TypeDescriptor::Map {
                    key: key.ty.to_string(),
                    value: value.ty.to_string(),
                },
                repeated: false,
            })
        }
        _ => Some(MappedType::single(&ident)),
    }
}

/// Sequence of `elem`. Byte sequences are a single `bytes` field.
fn repeated_of(elem: &Type) -> Option<MappedType> {
    if is_u8(elem) {
        return Some(MappedType::single("bytes"));
    }
    let inner = map_type(elem)?;
    if !is_single(&inner) {
        return None;
    }
    Some(MappedType {
        ty: inner.ty,
        repeated: true,
    })
}

/// Neither repeated nor a map, so it can be wrapped in one.
fn is_single(mapped: &MappedType) -> bool {
    !mapped.repeated && matches!(mapped.ty, TypeDescriptor::Named(_))
}

/// Proto map keys are integral or string scalars.
fn is_map_key(mapped: &MappedType) -> bool {
    is_single(mapped)
        && matches!(
            &mapped.ty,
            TypeDescriptor::Named(name)
                if matches!(name.as_str(), "int32" | "int64" | "uint32" | "uint64" | "bool" | "string")
        )
}

fn is_u8(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.qself.is_none() && p.path.is_ident("u8"))
}

fn type_args(arguments: &PathArguments) -> impl Iterator<Item = &Type> {
    let args = match arguments {
        PathArguments::AngleBracketed(a) => Some(&a.args),
        _ => None,
    };
    args.into_iter().flatten().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn first_type_arg(arguments: &PathArguments) -> Option<&Type> {
    type_args(arguments).next()
}
