// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::{
	Error, Result,
	interface::SchemaFinder,
	model::{Schema, SourceDescriptor},
};
use dvirt_sql::to_schema;
use tracing::instrument;

use crate::SourceLoadMachine;

/// Schemas come from the DDL of Active sources only.
impl SchemaFinder for SourceLoadMachine {
	#[instrument(name = "source::find_schema", level = "trace", skip(self))]
	fn find_schema(&self, source: &str) -> Result<Option<Schema>> {
		let Some(ddl) = self.shared.entries.get(source).and_then(|entry| entry.record.active_ddl().map(str::to_string))
		else {
			return Ok(None);
		};

		let parsed = dvirt_sql::parse(&ddl)
			.map_err(|err| Error::Internal(format!("discovered schema of source '{source}' is unreadable: {err}")))?;
		Ok(Some(to_schema(source, &parsed)))
	}

	fn find_source(&self, source: &str) -> Result<Option<SourceDescriptor>> {
		self.shared.catalog.find_source(source)
	}
}
