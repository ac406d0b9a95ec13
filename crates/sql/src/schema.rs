// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::model::{Column, Key, KeyKind, Schema, Table};

use crate::{Ddl, DdlObjectKind};

const DEFAULT_TYPE: &str = "string";

/// Builds the metadata of a source from its discovered DDL.
pub fn to_schema(source: &str, ddl: &Ddl) -> Schema {
	let tables = ddl
		.tables()
		.filter(|o| o.kind != DdlObjectKind::View)
		.map(|object| Table {
			name: object.name.name().to_string(),
			columns: object
				.columns
				.iter()
				.map(|c| Column::new(&c.name, c.data_type.as_deref().unwrap_or(DEFAULT_TYPE)))
				.collect(),
			primary_key: object.primary_key.as_ref().map(|columns| Key {
				kind: KeyKind::Primary,
				columns: columns.clone(),
			}),
			unique_keys: object
				.unique_keys
				.iter()
				.map(|columns| Key {
					kind: KeyKind::Unique,
					columns: columns.clone(),
				})
				.collect(),
			annotation: object.annotation().map(str::to_string),
		})
		.collect();

	Schema {
		source: source.to_string(),
		tables,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{emit_foreign_table, parse};

	#[test]
	fn test_emitted_tables_read_back() {
		let customer = Table::new("customer")
			.with_column("id", "integer")
			.with_column("name", "string")
			.with_primary_key(&["id"]);
		let orders = Table::new("orders").with_column("id", "long").with_unique_key(&["id"]);
		let text = format!("{}\n{}", emit_foreign_table(&customer), emit_foreign_table(&orders));

		let schema = to_schema("pg", &parse(&text).unwrap());
		assert_eq!(schema.source, "pg");
		assert_eq!(schema.tables, vec![customer, orders]);
	}

	#[test]
	fn test_views_are_not_source_tables() {
		let ddl = parse("CREATE FOREIGN TABLE t (a x); CREATE VIEW v AS SELECT a FROM pg.t;").unwrap();
		let schema = to_schema("pg", &ddl);
		assert_eq!(schema.tables.len(), 1);
		assert_eq!(schema.tables[0].name, "t");
	}
}
