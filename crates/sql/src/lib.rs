// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod ddl;
pub mod emit;
pub mod schema;
pub mod token;

pub use ddl::{Ddl, DdlColumn, DdlObject, DdlObjectKind, QualifiedName, parse};
pub use emit::{emit_foreign_table, escape_identifier, escape_string};
pub use schema::to_schema;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct Error(pub String);
