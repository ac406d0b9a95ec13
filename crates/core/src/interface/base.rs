// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::Result;

/// Owner of the shared preview base image.
pub trait BaseInvalidator: Send + Sync {
	/// Redeploys the base importing `active_sources` and marks every cached
	/// preview image stale.
	fn invalidate_base(&self, active_sources: &[String]) -> Result<()>;
}
