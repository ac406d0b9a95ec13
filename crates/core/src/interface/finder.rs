// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{
	Result,
	model::{Schema, SourceDescriptor},
};

/// Resolves source names to discovered metadata.
pub trait SchemaFinder: Send + Sync {
	fn find_schema(&self, source: &str) -> Result<Option<Schema>>;

	fn find_source(&self, source: &str) -> Result<Option<SourceDescriptor>>;
}

/// The configured sources, whether or not their schema was discovered yet.
pub trait SourceCatalog: Send + Sync {
	fn find_source(&self, name: &str) -> Result<Option<SourceDescriptor>>;
}
