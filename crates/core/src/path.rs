// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Source paths locate a table inside a source as `key=value/key=value/...`.
//!
//! The first segment names the source, the last segment names the leaf table.
//! `%`, `/` and `=` inside values are escaped as `%25`, `%2F` and `%3D`.

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const CONNECTION_KEY: &str = "connection";
pub const TABLE_KEY: &str = "table";

const SEPARATOR: char = '/';
const ASSIGN: char = '=';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
	pub key: String,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePath {
	segments: Vec<PathSegment>,
}

impl SourcePath {
	pub fn new(connection: impl Into<String>, table: impl Into<String>) -> Self {
		Self {
			segments: vec![
				PathSegment {
					key: CONNECTION_KEY.to_string(),
					value: connection.into(),
				},
				PathSegment {
					key: TABLE_KEY.to_string(),
					value: table.into(),
				},
			],
		}
	}

	pub fn parse(text: &str) -> Result<Self> {
		let invalid = |reason: &'static str| Error::InvalidSourcePath {
			path: text.to_string(),
			reason,
		};

		if text.is_empty() {
			return Err(invalid("path is empty"));
		}

		let mut segments = Vec::new();
		for raw in text.split(SEPARATOR) {
			let (key, value) = raw.split_once(ASSIGN).ok_or_else(|| invalid("segment is missing '='"))?;
			if key.is_empty() {
				return Err(invalid("segment has an empty key"));
			}
			if value.contains(ASSIGN) {
				return Err(invalid("segment value contains an unescaped '='"));
			}
			segments.push(PathSegment {
				key: key.to_string(),
				value: unescape(value).ok_or_else(|| invalid("invalid escape sequence"))?,
			});
		}

		if segments.len() < 2 {
			return Err(invalid("path needs a source segment and a table segment"));
		}

		Ok(Self {
			segments,
		})
	}

	pub fn source(&self) -> &str {
		&self.segments[0].value
	}

	pub fn table(&self) -> &str {
		&self.segments[self.segments.len() - 1].value
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}
}

impl Display for SourcePath {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		for (idx, segment) in self.segments.iter().enumerate() {
			if idx > 0 {
				f.write_str("/")?;
			}
			write!(f, "{}={}", segment.key, escape(&segment.value))?;
		}
		Ok(())
	}
}

pub fn format(connection: &str, table: &str) -> String {
	SourcePath::new(connection, table).to_string()
}

/// Returns `(source, table)`.
pub fn parse(text: &str) -> Result<(String, String)> {
	let path = SourcePath::parse(text)?;
	Ok((path.source().to_string(), path.table().to_string()))
}

fn escape(value: &str) -> String {
	let mut result = String::with_capacity(value.len());
	for ch in value.chars() {
		match ch {
			'%' => result.push_str("%25"),
			'/' => result.push_str("%2F"),
			'=' => result.push_str("%3D"),
			_ => result.push(ch),
		}
	}
	result
}

fn unescape(value: &str) -> Option<String> {
	let mut result = String::with_capacity(value.len());
	let mut chars = value.chars();
	while let Some(ch) = chars.next() {
		if ch != '%' {
			result.push(ch);
			continue;
		}
		let code: String = chars.by_ref().take(2).collect();
		match code.to_ascii_uppercase().as_str() {
			"25" => result.push('%'),
			"2F" => result.push('/'),
			"3D" => result.push('='),
			_ => return None,
		}
	}
	Some(result)
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_format() {
		assert_eq!(format("pg", "customer"), "connection=pg/table=customer");
	}

	#[test]
	fn test_parse() {
		let (source, table) = parse("connection=pg/table=customer").unwrap();
		assert_eq!(source, "pg");
		assert_eq!(table, "customer");
	}

	#[test]
	fn test_parse_intermediate_segments() {
		let path = SourcePath::parse("connection=pg/schema=public/table=orders").unwrap();
		assert_eq!(path.source(), "pg");
		assert_eq!(path.table(), "orders");
		assert_eq!(path.segments().len(), 3);
		assert_eq!(path.to_string(), "connection=pg/schema=public/table=orders");
	}

	#[test]
	fn test_round_trip_alphanumeric_and_hyphen() {
		let names = ["pg", "my-source", "A1", "0", "x-y-z-9", "CUSTOMER", "-", "a--b", "Orders2024"];
		for connection in names {
			for table in names {
				let (c, t) = parse(&format(connection, table)).unwrap();
				assert_eq!((c.as_str(), t.as_str()), (connection, table));
			}
		}
	}

	#[test]
	fn test_round_trip_reserved_characters() {
		let names = ["a/b", "x=y", "100%", "%2F", "/=%"];
		for name in names {
			let text = format(name, name);
			let (c, t) = parse(&text).unwrap();
			assert_eq!(c, name);
			assert_eq!(t, name);
		}
	}

	#[test]
	fn test_escaped_output() {
		assert_eq!(format("a/b", "c=d"), "connection=a%2Fb/table=c%3Dd");
	}

	#[test]
	fn test_rejects_malformed() {
		assert!(parse("").is_err());
		assert!(parse("connection=pg").is_err());
		assert!(parse("connection=pg/customer").is_err());
		assert!(parse("=pg/table=x").is_err());
		assert!(parse("connection=pg/table=a=b").is_err());
		assert!(parse("connection=pg/table=%41").is_err());
		assert!(parse("connection=pg/table=%2").is_err());
	}

	#[test]
	fn test_error_carries_path() {
		let err = parse("connection=pg").unwrap_err();
		match err {
			Error::InvalidSourcePath {
				path,
				..
			} => assert_eq!(path, "connection=pg"),
			other => panic!("unexpected error: {other:?}"),
		}
	}
}
