// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
	Virtualization,
	Source,
	Table,
	View,
}

impl Display for ObjectKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			ObjectKind::Virtualization => f.write_str("virtualization"),
			ObjectKind::Source => f.write_str("source"),
			ObjectKind::Table => f.write_str("table"),
			ObjectKind::View => f.write_str("view"),
		}
	}
}

/// Coarse classification used when errors are surfaced as per-item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
	NotFound,
	Compile,
	Validation,
	ServiceUnavailable,
	ConcurrencyConflict,
	Internal,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	#[error("{kind} '{name}' not found")]
	NotFound {
		kind: ObjectKind,
		name: String,
	},

	#[error("view '{view}' does not compile: {message}")]
	Compile {
		view: String,
		message: String,
	},

	#[error("invalid source path '{path}': {reason}")]
	InvalidSourcePath {
		path: String,
		reason: &'static str,
	},

	#[error("{message}")]
	Validation {
		view: Option<String>,
		message: String,
	},

	#[error("'{name}' is not available: {reason}")]
	ServiceUnavailable {
		name: String,
		reason: String,
	},

	#[error("view '{id}' was modified concurrently: expected version {expected}, found {actual}")]
	ConcurrencyConflict {
		id: String,
		expected: u64,
		actual: u64,
	},

	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	pub fn not_found(kind: ObjectKind, name: impl Into<String>) -> Self {
		Error::NotFound {
			kind,
			name: name.into(),
		}
	}

	pub fn compile(view: impl Into<String>, message: impl Into<String>) -> Self {
		Error::Compile {
			view: view.into(),
			message: message.into(),
		}
	}

	pub fn validation(view: Option<String>, message: impl Into<String>) -> Self {
		Error::Validation {
			view,
			message: message.into(),
		}
	}

	pub fn unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Error::ServiceUnavailable {
			name: name.into(),
			reason: reason.into(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::NotFound {
				..
			} => ErrorKind::NotFound,
			Error::Compile {
				..
			}
			| Error::InvalidSourcePath {
				..
			} => ErrorKind::Compile,
			Error::Validation {
				..
			} => ErrorKind::Validation,
			Error::ServiceUnavailable {
				..
			} => ErrorKind::ServiceUnavailable,
			Error::ConcurrencyConflict {
				..
			} => ErrorKind::ConcurrencyConflict,
			Error::Internal(_) => ErrorKind::Internal,
		}
	}

	/// Only an image that is still loading can succeed on a plain retry.
	pub fn is_retryable(&self) -> bool {
		self.kind() == ErrorKind::ServiceUnavailable
	}
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_kind_mapping() {
		assert_eq!(Error::not_found(ObjectKind::Virtualization, "dv1").kind(), ErrorKind::NotFound);
		assert_eq!(Error::compile("v", "boom").kind(), ErrorKind::Compile);
		assert_eq!(
			Error::InvalidSourcePath {
				path: "x".to_string(),
				reason: "empty",
			}
			.kind(),
			ErrorKind::Compile
		);
		assert_eq!(Error::validation(None, "bad").kind(), ErrorKind::Validation);
		assert_eq!(Error::unavailable("dv1", "loading").kind(), ErrorKind::ServiceUnavailable);
	}

	#[test]
	fn test_only_unavailable_is_retryable() {
		assert!(Error::unavailable("dv1", "loading").is_retryable());
		assert!(!Error::compile("v", "boom").is_retryable());
		assert!(!Error::Internal("x".to_string()).is_retryable());
	}

	#[test]
	fn test_display() {
		let err = Error::not_found(ObjectKind::Source, "pg");
		assert_eq!(err.to_string(), "source 'pg' not found");

		let err = Error::ConcurrencyConflict {
			id: "v1".to_string(),
			expected: 2,
			actual: 3,
		};
		assert_eq!(err.to_string(), "view 'v1' was modified concurrently: expected version 2, found 3");
	}
}
