// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::collections::HashMap;

pub struct ArrayOfEventFieldItem {
    pub event_field_item: Vec<Box<EventFieldItem>>,
}

pub struct EventFieldItem {
    pub event_field_item_id: String,
    pub text: String,
    pub rank: i32,
    pub float_field1: f32,
    pub float_field2: f64,
    pub attributes: HashMap<String, String>,
    pub payload: Vec<u8>,
}

pub mod entity {
    pub struct Entity {
        pub entity_id: String,
        #[serde(flatten)]
        pub embedded_entity: EmbeddedEntity,
        pub sub_entities: Vec<SubEntity>,
    }

    struct EmbeddedEntity {
        pub embedded_entity_id: String,
    }

    pub struct SubEntity {
        pub sub_entity_id: String,
    }
}
