// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::model::{Key, KeyKind, Table};

use crate::token::keyword;

/// Words the target SQL dialect reserves. Identifiers matching one, ignoring
/// case, are always quoted.
const RESERVED: &[&str] = &[
	"ADD", "ALL", "ALTER", "AND", "ANY", "ARRAY", "ARRAY_AGG", "AS", "ASC", "ATOMIC", "AUTHORIZATION", "BEGIN",
	"BETWEEN", "BIGDECIMAL", "BIGINT", "BIGINTEGER", "BLOB", "BOOLEAN", "BOTH", "BREAK", "BY", "BYTE", "CALL",
	"CALLED", "CASCADED", "CASE", "CAST", "CHAR", "CHARACTER", "CHECK", "CLOB", "CLOSE", "COLLATE", "COLUMN",
	"COMMIT", "CONNECT", "CONSTRAINT", "CONTINUE", "CONVERT", "CORRESPONDING", "CREATE", "CROSS",
	"CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "CURRENT_USER", "CURSOR", "CYCLE", "DATE", "DAY",
	"DEALLOCATE", "DEC", "DECIMAL", "DECLARE", "DEFAULT", "DELETE", "DESC", "DESCRIBE", "DETERMINISTIC",
	"DISCONNECT", "DISTINCT", "DOUBLE", "DROP", "EACH", "ELSE", "END", "ERROR", "ESCAPE", "EXCEPT", "EXEC",
	"EXECUTE", "EXISTS", "EXTERNAL", "FALSE", "FETCH", "FILTER", "FLOAT", "FOR", "FOREIGN", "FROM", "FULL",
	"FUNCTION", "GET", "GLOBAL", "GRANT", "GROUP", "HAS", "HAVING", "HOLD", "HOUR", "IDENTITY", "IF",
	"IMMEDIATE", "IN", "INDICATOR", "INNER", "INOUT", "INPUT", "INSENSITIVE", "INSERT", "INTEGER", "INTERSECT",
	"INTERVAL", "INTO", "IS", "ISOLATION", "JOIN", "LANGUAGE", "LARGE", "LATERAL", "LEADING", "LEAVE", "LEFT",
	"LIKE", "LIKE_REGEX", "LIMIT", "LOCAL", "LOCALTIME", "LOCALTIMESTAMP", "LONG", "LOOP", "MAKEDEP", "MAKEIND",
	"MAKENOTDEP", "MATCH", "MERGE", "METHOD", "MINUTE", "MODIFIES", "MODULE", "MONTH", "NATURAL", "NEW", "NEXT",
	"NO", "NOCACHE", "NONE", "NOT", "NULL", "OBJECT", "OF", "OFFSET", "OLD", "ON", "ONLY", "OPEN", "OPTION",
	"OPTIONS", "OR", "ORDER", "OUT", "OUTER", "OUTPUT", "OVER", "OVERLAPS", "PARAMETER", "PARTITION",
	"PRECISION", "PREPARE", "PRIMARY", "PROCEDURE", "RANGE", "READS", "REAL", "RECURSIVE", "REFERENCES",
	"REFERENCING", "RELEASE", "RETURN", "RETURNS", "REVOKE", "RIGHT", "ROLLBACK", "ROLLUP", "ROW", "ROWS",
	"SAVEPOINT", "SCROLL", "SEARCH", "SECOND", "SELECT", "SENSITIVE", "SESSION_USER", "SET", "SHORT", "SIMILAR",
	"SMALLINT", "SOME", "SPECIFIC", "SPECIFICTYPE", "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "START",
	"STATIC", "STRING", "SYMMETRIC", "SYSTEM", "SYSTEM_USER", "TABLE", "TEMPORARY", "THEN", "TIME", "TIMESTAMP",
	"TIMEZONE_HOUR", "TIMEZONE_MINUTE", "TINYINT", "TO", "TRAILING", "TRANSLATE", "TRIGGER", "TRUE", "UNION",
	"UNIQUE", "UNKNOWN", "UPDATE", "USER", "USING", "VALUES", "VARBINARY", "VARCHAR", "VIRTUAL", "WHEN",
	"WHENEVER", "WHERE", "WHILE", "WINDOW", "WITH", "WITHIN", "WITHOUT", "XML", "XMLAGG", "XMLATTRIBUTES",
	"XMLCOMMENT", "XMLCONCAT", "XMLELEMENT", "XMLFOREST", "XMLNAMESPACES", "XMLPARSE", "XMLPI", "XMLQUERY",
	"XMLSERIALIZE", "XMLTABLE", "XMLTEXT", "YEAR",
];

fn is_reserved(word: &str) -> bool {
	RESERVED.iter().any(|r| r.eq_ignore_ascii_case(word))
}

/// Quotes an identifier unless it is a plain, non-reserved word.
pub fn escape_identifier(name: &str) -> String {
	let mut chars = name.chars();
	let plain = match chars.next() {
		Some(first) => {
			(first.is_ascii_alphabetic() || first == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		None => false,
	};
	if plain && keyword(name).is_none() && !is_reserved(name) {
		name.to_string()
	} else {
		format!("\"{}\"", name.replace('"', "\"\""))
	}
}

pub fn escape_string(value: &str) -> String {
	value.replace('\'', "''")
}

pub fn emit_key(key: &Key) -> String {
	let columns = key.columns.iter().map(|c| escape_identifier(c)).collect::<Vec<_>>().join(", ");
	match key.kind {
		KeyKind::Primary => format!("PRIMARY KEY({columns})"),
		KeyKind::Unique => format!("UNIQUE({columns})"),
	}
}

pub fn emit_annotation(annotation: Option<&str>) -> Option<String> {
	annotation.filter(|a| !a.is_empty()).map(|a| format!("OPTIONS (ANNOTATION '{}')", escape_string(a)))
}

/// Emits one `CREATE FOREIGN TABLE` statement terminated by `;`.
pub fn emit_foreign_table(table: &Table) -> String {
	let mut elements: Vec<String> = table
		.columns
		.iter()
		.map(|c| format!("\t{} {}", escape_identifier(&c.name), c.data_type))
		.collect();
	if let Some(primary_key) = &table.primary_key {
		elements.push(format!("\t{}", emit_key(primary_key)));
	}
	for unique in &table.unique_keys {
		elements.push(format!("\t{}", emit_key(unique)));
	}

	let mut result = format!("CREATE FOREIGN TABLE {} (\n{}\n)", escape_identifier(&table.name), elements.join(",\n"));
	if let Some(options) = emit_annotation(table.annotation.as_deref()) {
		result.push(' ');
		result.push_str(&options);
	}
	result.push(';');
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_escape_identifier() {
		assert_eq!(escape_identifier("customer"), "customer");
		assert_eq!(escape_identifier("Cust_Orders2"), "Cust_Orders2");
		assert_eq!(escape_identifier("my view"), "\"my view\"");
		assert_eq!(escape_identifier("select"), "\"select\"");
		assert_eq!(escape_identifier("2fast"), "\"2fast\"");
		assert_eq!(escape_identifier("a\"b"), "\"a\"\"b\"");
		assert_eq!(escape_identifier(""), "\"\"");
	}

	#[test]
	fn test_escape_identifier_quotes_reserved_words() {
		for word in ["end", "case", "when", "user", "values", "insert", "update", "delete", "Order", "KEY", "date"] {
			assert_eq!(escape_identifier(word), format!("\"{word}\""));
		}
		assert_eq!(escape_identifier("ending"), "ending");
		assert_eq!(escape_identifier("user_id"), "user_id");
	}

	#[test]
	fn test_emit_foreign_table_quotes_reserved_columns() {
		let table = Table::new("audit").with_column("end", "timestamp").with_column("update", "string");
		assert_eq!(emit_foreign_table(&table), "CREATE FOREIGN TABLE audit (\n\t\"end\" timestamp,\n\t\"update\" string\n);");
	}

	#[test]
	fn test_emit_foreign_table() {
		let table = Table::new("customer")
			.with_column("id", "integer")
			.with_column("name", "string")
			.with_primary_key(&["id"])
			.with_unique_key(&["name"]);
		assert_eq!(
			emit_foreign_table(&table),
			"CREATE FOREIGN TABLE customer (\n\tid integer,\n\tname string,\n\tPRIMARY KEY(id),\n\tUNIQUE(name)\n);"
		);
	}

	#[test]
	fn test_emit_annotation_escapes_quotes() {
		assert_eq!(emit_annotation(Some("it's")), Some("OPTIONS (ANNOTATION 'it''s')".to_string()));
		assert_eq!(emit_annotation(Some("")), None);
		assert_eq!(emit_annotation(None), None);
	}
}
