// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub String);

impl Deref for ViewId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Display for ViewId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ViewId {
	fn from(value: &str) -> Self {
		ViewId(value.to_string())
	}
}

impl From<String> for ViewId {
	fn from(value: String) -> Self {
		ViewId(value)
	}
}

/// A user's description of one view inside a virtualization.
///
/// Generated views carry source paths and get their DDL compiled from the
/// resolved source tables. User-defined views carry hand written DDL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDefinition {
	pub id: ViewId,
	pub virtualization: String,
	pub name: String,
	pub ddl: Option<String>,
	pub source_paths: Vec<String>,
	pub complete: bool,
	pub parsable: bool,
	pub user_defined: bool,
	pub description: Option<String>,
	/// Optimistic lock version, absent for definitions that were never stored.
	pub version: Option<u64>,
}

impl ViewDefinition {
	pub fn new(id: impl Into<ViewId>, virtualization: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			virtualization: virtualization.into(),
			name: name.into(),
			ddl: None,
			source_paths: Vec::new(),
			complete: true,
			parsable: true,
			user_defined: false,
			description: None,
			version: None,
		}
	}

	pub fn with_source_paths<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.source_paths = paths.into_iter().map(Into::into).collect();
		self
	}

	/// Marks the definition as user-defined with the given DDL.
	pub fn with_user_ddl(mut self, ddl: impl Into<String>) -> Self {
		self.ddl = Some(ddl.into());
		self.user_defined = true;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_version(mut self, version: u64) -> Self {
		self.version = Some(version);
		self
	}

	pub fn incomplete(mut self) -> Self {
		self.complete = false;
		self
	}

	pub fn unparsable(mut self) -> Self {
		self.parsable = false;
		self
	}
}
