// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Builder for the global `fmt` subscriber.
#[derive(Debug, Clone)]
pub struct TracingBuilder {
	filter: String,
	with_target: bool,
	with_thread_names: bool,
	json: bool,
}

impl TracingBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Directives used when `RUST_LOG` is not set, e.g. `dvirt_preview=debug`.
	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	pub fn with_target(mut self, enabled: bool) -> Self {
		self.with_target = enabled;
		self
	}

	pub fn with_thread_names(mut self, enabled: bool) -> Self {
		self.with_thread_names = enabled;
		self
	}

	/// One JSON object per event instead of the human readable format.
	pub fn json(mut self, enabled: bool) -> Self {
		self.json = enabled;
		self
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	pub fn env_filter(&self) -> EnvFilter {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
	}

	/// Installs the subscriber globally. Returns false when another subscriber
	/// was installed first.
	pub fn try_init(self) -> bool {
		let subscriber = tracing_subscriber::fmt()
			.with_env_filter(self.env_filter())
			.with_target(self.with_target)
			.with_thread_names(self.with_thread_names);

		let installed = if self.json {
			subscriber.json().try_init().is_ok()
		} else {
			subscriber.try_init().is_ok()
		};
		if installed {
			debug!(filter = %self.filter, json = self.json, "tracing installed");
		}
		installed
	}
}

impl Default for TracingBuilder {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			with_target: true,
			with_thread_names: false,
			json: false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let builder = TracingBuilder::new();
		assert_eq!(builder.filter(), "info");
		assert!(builder.with_target);
		assert!(!builder.json);
	}

	#[test]
	fn test_with_filter() {
		let builder = TracingBuilder::new().with_filter("dvirt_preview=debug").with_thread_names(true);
		assert_eq!(builder.filter(), "dvirt_preview=debug");
		assert!(builder.with_thread_names);
	}

	#[test]
	fn test_second_install_is_rejected() {
		let _ = TracingBuilder::new().try_init();
		assert!(!TracingBuilder::new().json(true).try_init());
	}
}
