// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	sync::atomic::{AtomicUsize, Ordering},
};

use dvirt_core::{
	Result,
	interface::SchemaFinder,
	model::{Schema, SourceDescriptor},
};

/// Answers schema lookups from fixed maps and counts them.
#[derive(Default)]
pub struct StaticSchemaFinder {
	schemas: HashMap<String, Schema>,
	sources: HashMap<String, SourceDescriptor>,
	schema_calls: AtomicUsize,
}

impl StaticSchemaFinder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_schema(mut self, schema: Schema) -> Self {
		self.schemas.insert(schema.source.clone(), schema);
		self
	}

	pub fn with_source(mut self, source: SourceDescriptor) -> Self {
		self.sources.insert(source.name.clone(), source);
		self
	}

	pub fn schema_calls(&self) -> usize {
		self.schema_calls.load(Ordering::SeqCst)
	}
}

impl SchemaFinder for StaticSchemaFinder {
	fn find_schema(&self, source: &str) -> Result<Option<Schema>> {
		self.schema_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.schemas.get(source).cloned())
	}

	fn find_source(&self, source: &str) -> Result<Option<SourceDescriptor>> {
		Ok(self.sources.get(source).cloned())
	}
}
