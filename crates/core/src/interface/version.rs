// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Result, model::ViewDefinition};

/// Authoritative version counter and view definitions per virtualization.
pub trait VersionStore: Send + Sync {
	/// Fails with `NotFound` for an unknown virtualization.
	fn current_version(&self, virtualization: &str) -> Result<u64>;

	fn list_view_definitions(&self, virtualization: &str) -> Result<Vec<ViewDefinition>>;
}
