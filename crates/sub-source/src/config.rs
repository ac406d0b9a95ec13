// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

/// Configuration for the source worker.
#[derive(Debug, Clone)]
pub struct SourceWorkerConfig {
	pub thread_name: String,
	/// How long the worker waits for a message before it checks whether it
	/// should stop.
	pub recv_timeout: Duration,
}

impl Default for SourceWorkerConfig {
	fn default() -> Self {
		Self {
			thread_name: "source-worker".to_string(),
			recv_timeout: Duration::from_millis(100),
		}
	}
}
