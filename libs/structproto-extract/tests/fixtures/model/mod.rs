// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub struct User {
    pub id_user: i32,
}

pub struct EventSubForm {
    pub id: String,
    pub caption: String,
    pub rank: i32,
    pub fields: Option<Box<ArrayOfEventField>>,
    pub user: User,
    pub primitive_pointer: Option<i64>,
    pub slice_int: Vec<i64>,
}

pub struct ArrayOfEventField {
    pub event_field: Vec<Box<EventField>>,
}

pub struct EventField {
    #[proto(tags = "json:\"id\"")]
    pub id: String,
    pub name: String,
    pub field_type: String,
    pub is_mandatory: bool,
    pub rank: i32,
    pub tag: String,
    pub items: Option<Box<ArrayOfEventFieldItem>>,
    pub custom_field_order: i32,
    pub new_field: i32,
    #[serde(flatten)]
    pub embedded_struct: EmbeddedStruct,
    #[serde(skip)]
    pub field_doesnt_exist: String,
}

pub struct EmbeddedStruct {
    pub new_embedded_field: i32,
    #[serde(flatten)]
    pub double_embedded_struct: DoubleEmbeddedStruct,
    pub id_embedded: i32,
}

pub struct DoubleEmbeddedStruct {
    pub id_double_embedded: i32,
}
