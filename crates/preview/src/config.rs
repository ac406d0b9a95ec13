// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_runtime::sync::DEFAULT_STRIPES;

#[derive(Debug, Clone)]
pub struct PreviewConfig {
	/// Number of stripes in the lock pool shared with the source worker.
	pub lock_stripes: usize,
}

impl Default for PreviewConfig {
	fn default() -> Self {
		Self {
			lock_stripes: DEFAULT_STRIPES,
		}
	}
}
