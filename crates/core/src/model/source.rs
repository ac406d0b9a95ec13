// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Prefix of the stored text of a source whose schema load failed.
pub const FAILED_MARKER: &str = "--failed: ";

pub fn failure_marker(error: &str) -> String {
	format!("{FAILED_MARKER}{error}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceState {
	Missing,
	Loading,
	Active,
	Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSchemaRecord {
	pub source: String,
	pub state: SourceState,
	/// Discovered DDL, or the failure marker followed by the error.
	pub ddl: Option<String>,
	pub last_load: Option<SystemTime>,
}

impl SourceSchemaRecord {
	pub fn missing(source: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			state: SourceState::Missing,
			ddl: None,
			last_load: None,
		}
	}

	pub fn is_loading(&self) -> bool {
		self.state == SourceState::Loading
	}

	pub fn active_ddl(&self) -> Option<&str> {
		match self.state {
			SourceState::Active => self.ddl.as_deref(),
			_ => None,
		}
	}

	pub fn errors(&self) -> Vec<String> {
		self.ddl
			.as_deref()
			.and_then(|ddl| ddl.strip_prefix(FAILED_MARKER))
			.map(|error| vec![error.to_string()])
			.unwrap_or_default()
	}

	pub fn status(&self) -> SourceStatus {
		SourceStatus {
			source: self.source.clone(),
			state: self.state,
			errors: self.errors(),
			last_load: self.last_load,
			loading: self.is_loading(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStatus {
	pub source: String,
	pub state: SourceState,
	pub errors: Vec<String>,
	pub last_load: Option<SystemTime>,
	pub loading: bool,
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_errors_from_failure_marker() {
		let mut record = SourceSchemaRecord::missing("pg");
		record.state = SourceState::Failed;
		record.ddl = Some(failure_marker("connection refused"));
		assert_eq!(record.errors(), vec!["connection refused".to_string()]);
		assert!(record.active_ddl().is_none());
	}

	#[test]
	fn test_active_ddl_has_no_errors() {
		let mut record = SourceSchemaRecord::missing("pg");
		record.state = SourceState::Active;
		record.ddl = Some("CREATE FOREIGN TABLE t (id integer);".to_string());
		assert!(record.errors().is_empty());
		assert!(record.active_ddl().is_some());

		let status = record.status();
		assert_eq!(status.state, SourceState::Active);
		assert!(!status.loading);
	}
}
