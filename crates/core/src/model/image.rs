// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Column, Key, Privilege, Table, ViewId};
use crate::{Error, Result};

/// A source table as resolved while compiling one view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceTableRef {
	pub source: String,
	pub table: String,
	pub columns: Vec<Column>,
	pub key: Option<Key>,
}

impl SourceTableRef {
	pub fn from_table(source: impl Into<String>, table: &Table) -> Self {
		Self {
			source: source.into(),
			table: table.name.clone(),
			columns: table.columns.clone(),
			key: table.key().cloned(),
		}
	}

	pub fn same_table(&self, other: &SourceTableRef) -> bool {
		self.source == other.source && self.table == other.table
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledView {
	pub id: ViewId,
	pub name: String,
	pub ddl: String,
	/// Tables the generated query reads from, in first-use order.
	pub dependencies: Vec<SourceTableRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMode {
	/// Best effort: views that fail to compile are left out and reported.
	Preview,
	/// Strict: the first failing view aborts assembly.
	Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapping {
	pub name: String,
	pub translator: String,
	pub connection: String,
}

/// A source restricted to the tables the image references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceModel {
	pub name: String,
	pub tables: Vec<String>,
	pub ddl: String,
	pub mapping: Option<SourceMapping>,
	pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	pub resource: String,
	pub privileges: Vec<Privilege>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
	pub role: String,
	pub mapped_roles: Vec<String>,
	pub any_authenticated: bool,
	pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteView {
	pub id: ViewId,
	pub name: String,
	pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledImage {
	pub name: String,
	pub version: u64,
	pub mode: ImageMode,
	pub views: Vec<CompiledView>,
	pub virtual_model: String,
	pub source_models: Vec<SourceModel>,
	pub imports: Vec<String>,
	pub properties: BTreeMap<String, String>,
	pub grants: Vec<RoleGrant>,
	pub incomplete: Vec<IncompleteView>,
}

impl CompiledImage {
	pub fn find_view(&self, name: &str) -> Option<&CompiledView> {
		self.views.iter().find(|v| v.name.eq_ignore_ascii_case(name))
	}

	pub fn find_source_model(&self, name: &str) -> Option<&SourceModel> {
		self.source_models.iter().find(|m| m.name == name)
	}

	pub fn view_names(&self) -> Vec<&str> {
		self.views.iter().map(|v| v.name.as_str()).collect()
	}

	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string_pretty(self).map_err(|e| Error::Internal(format!("image export failed: {e}")))
	}

	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|e| Error::Internal(format!("image import failed: {e}")))
	}
}
