// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::{
	Error, Result,
	interface::SchemaFinder,
	model::SourceTableRef,
	path::SourcePath,
};

pub(crate) fn resolve_path(view: &str, path: &str, finder: &dyn SchemaFinder) -> Result<SourceTableRef> {
	let parsed = SourcePath::parse(path).map_err(|e| Error::compile(view, e.to_string()))?;
	resolve_table(view, parsed.source(), parsed.table(), finder).map_err(|e| match e {
		Error::Compile {
			view,
			message,
		} => Error::Compile {
			view,
			message: format!("{message} (path '{path}')"),
		},
		other => other,
	})
}

/// Lookup failures of the finder itself are passed through unchanged.
pub(crate) fn resolve_table(view: &str, source: &str, table: &str, finder: &dyn SchemaFinder) -> Result<SourceTableRef> {
	let Some(schema) = finder.find_schema(source)? else {
		return Err(Error::compile(view, format!("source '{source}' is not available")));
	};
	let Some(found) = schema.find_table(table) else {
		return Err(Error::compile(view, format!("table '{source}.{table}' does not exist")));
	};
	Ok(SourceTableRef::from_table(source, found))
}
