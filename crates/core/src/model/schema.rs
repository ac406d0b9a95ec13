// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
	pub name: String,
	pub data_type: String,
}

impl Column {
	pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			data_type: data_type.into(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
	Primary,
	Unique,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
	pub kind: KeyKind,
	pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
	pub name: String,
	pub columns: Vec<Column>,
	pub primary_key: Option<Key>,
	pub unique_keys: Vec<Key>,
	pub annotation: Option<String>,
}

impl Table {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Default::default()
		}
	}

	pub fn with_column(mut self, name: impl Into<String>, data_type: impl Into<String>) -> Self {
		self.columns.push(Column::new(name, data_type));
		self
	}

	pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
		self.primary_key = Some(Key {
			kind: KeyKind::Primary,
			columns: columns.iter().map(|c| c.to_string()).collect(),
		});
		self
	}

	pub fn with_unique_key(mut self, columns: &[&str]) -> Self {
		self.unique_keys.push(Key {
			kind: KeyKind::Unique,
			columns: columns.iter().map(|c| c.to_string()).collect(),
		});
		self
	}

	/// The primary key, or else the first unique key.
	pub fn key(&self) -> Option<&Key> {
		self.primary_key.as_ref().or_else(|| self.unique_keys.first())
	}

	pub fn find_column(&self, name: &str) -> Option<&Column> {
		self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
	}
}

/// Discovered metadata of one source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
	pub source: String,
	pub tables: Vec<Table>,
}

impl Schema {
	pub fn new(source: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			tables: Vec::new(),
		}
	}

	pub fn with_table(mut self, table: Table) -> Self {
		self.tables.push(table);
		self
	}

	/// Exact match wins over a case-insensitive one.
	pub fn find_table(&self, name: &str) -> Option<&Table> {
		self.tables
			.iter()
			.find(|t| t.name == name)
			.or_else(|| self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
	}
}

/// How to reach a source: its translator and connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
	pub id: String,
	pub name: String,
	pub translator: String,
	pub connection: String,
	pub properties: BTreeMap<String, String>,
}

impl SourceDescriptor {
	pub fn new(name: impl Into<String>, translator: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			id: name.clone(),
			connection: format!("java:/{name}"),
			name,
			translator: translator.into(),
			properties: BTreeMap::new(),
		}
	}

	pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(key.into(), value.into());
		self
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_key_prefers_primary() {
		let table = Table::new("t").with_unique_key(&["code"]).with_primary_key(&["id"]);
		assert_eq!(table.key().unwrap().kind, KeyKind::Primary);
		assert_eq!(table.key().unwrap().columns, vec!["id".to_string()]);
	}

	#[test]
	fn test_key_falls_back_to_first_unique() {
		let table = Table::new("t").with_unique_key(&["code"]).with_unique_key(&["other"]);
		assert_eq!(table.key().unwrap().kind, KeyKind::Unique);
		assert_eq!(table.key().unwrap().columns, vec!["code".to_string()]);
		assert!(Table::new("t").key().is_none());
	}

	#[test]
	fn test_find_table_prefers_exact_match() {
		let schema = Schema::new("pg").with_table(Table::new("Customer")).with_table(Table::new("customer"));
		assert_eq!(schema.find_table("customer").unwrap().name, "customer");
		assert_eq!(schema.find_table("CUSTOMER").unwrap().name, "Customer");
		assert!(schema.find_table("orders").is_none());
	}
}
