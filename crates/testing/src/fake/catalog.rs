// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::{Result, interface::SourceCatalog, model::SourceDescriptor};
use parking_lot::RwLock;

#[derive(Default)]
pub struct StaticSourceCatalog {
	sources: RwLock<Vec<SourceDescriptor>>,
}

impl StaticSourceCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_source(self, source: SourceDescriptor) -> Self {
		{
			let mut sources = self.sources.write();
			sources.retain(|s| s.name != source.name);
			sources.push(source);
		}
		self
	}
}

impl SourceCatalog for StaticSourceCatalog {
	fn find_source(&self, name: &str) -> Result<Option<SourceDescriptor>> {
		Ok(self.sources.read().iter().find(|s| s.name == name).cloned())
	}
}
