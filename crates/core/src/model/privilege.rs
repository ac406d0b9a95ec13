// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

use super::ViewId;

/// Built-in role granted to every authenticated user.
pub const ANY_AUTHENTICATED: &str = "any authenticated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Privilege {
	Select,
	Insert,
	Update,
	Delete,
}

impl Display for Privilege {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Privilege::Select => f.write_str("SELECT"),
			Privilege::Insert => f.write_str("INSERT"),
			Privilege::Update => f.write_str("UPDATE"),
			Privilege::Delete => f.write_str("DELETE"),
		}
	}
}

/// Privileges one role holds on one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePrivileges {
	pub role: String,
	pub view_id: Option<ViewId>,
	pub privileges: Vec<Privilege>,
}

impl RolePrivileges {
	pub fn new(role: impl Into<String>, view_id: impl Into<ViewId>, privileges: &[Privilege]) -> Self {
		Self {
			role: role.into(),
			view_id: Some(view_id.into()),
			privileges: privileges.to_vec(),
		}
	}

	/// A role that should exist even though it holds nothing yet.
	pub fn role_only(role: impl Into<String>) -> Self {
		Self {
			role: role.into(),
			view_id: None,
			privileges: Vec::new(),
		}
	}
}
