// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Code generation for resolved messages.

pub mod proto;

pub use proto::{generate_proto, ProtoOptions};
