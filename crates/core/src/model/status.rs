// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use super::ViewId;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
	Success,
	Error,
}

/// Per-item outcome surfaced to callers instead of a raised error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStatus {
	pub view: String,
	pub kind: StatusKind,
	pub message: Option<String>,
}

impl ViewStatus {
	pub fn success(view: impl Into<String>) -> Self {
		Self {
			view: view.into(),
			kind: StatusKind::Success,
			message: None,
		}
	}

	pub fn error(view: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			view: view.into(),
			kind: StatusKind::Error,
			message: Some(message.into()),
		}
	}

	pub fn from_error(view: impl Into<String>, err: &Error) -> Self {
		Self::error(view, err.to_string())
	}

	pub fn is_success(&self) -> bool {
		self.kind == StatusKind::Success
	}
}

/// One row of a virtualization's view listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewListing {
	pub id: ViewId,
	pub name: String,
	pub description: Option<String>,
	pub valid: bool,
	pub errors: Vec<String>,
}
