// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod image;
mod privilege;
mod schema;
mod source;
mod status;
mod view;

pub use image::{
	CompiledImage, CompiledView, ImageMode, IncompleteView, Permission, RoleGrant, SourceMapping, SourceModel,
	SourceTableRef,
};
pub use privilege::{ANY_AUTHENTICATED, Privilege, RolePrivileges};
pub use schema::{Column, Key, KeyKind, Schema, SourceDescriptor, Table};
pub use source::{FAILED_MARKER, SourceSchemaRecord, SourceState, SourceStatus, failure_marker};
pub use status::{StatusKind, ViewListing, ViewStatus};
pub use view::{ViewDefinition, ViewId};
