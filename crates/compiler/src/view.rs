// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_core::{
	Error, Result,
	interface::SchemaFinder,
	model::{CompiledView, SourceTableRef, ViewDefinition},
};
use dvirt_sql::{
	DdlObject, DdlObjectKind,
	emit::{emit_annotation, emit_key},
	escape_identifier,
};
use tracing::instrument;

use crate::resolve::{resolve_path, resolve_table};

/// Keeps the view name reserved while it has no sources.
const PLACEHOLDER_QUERY: &str = "SELECT 1 as col";

/// Compiles one definition into a `CREATE VIEW` statement terminated by `;`.
///
/// Generated views read the columns of their first source table, aliased `t1`.
/// Every further table is joined on its key when all key columns exist in the
/// first table, otherwise it is left as a commented join hint and is not a
/// dependency of the view.
#[instrument(name = "compiler::view::compile", level = "trace", skip(def, finder), fields(view = %def.name))]
pub fn compile_view(def: &ViewDefinition, finder: &dyn SchemaFinder) -> Result<CompiledView> {
	if def.user_defined {
		return compile_user_defined(def, finder);
	}

	let tables = def
		.source_paths
		.iter()
		.map(|path| resolve_path(&def.name, path, finder))
		.collect::<Result<Vec<_>>>()?;

	let (ddl, dependencies) = generate(def, &tables)?;
	Ok(CompiledView {
		id: def.id.clone(),
		name: def.name.clone(),
		ddl,
		dependencies,
	})
}

fn generate(def: &ViewDefinition, tables: &[SourceTableRef]) -> Result<(String, Vec<SourceTableRef>)> {
	let mut parts = vec![format!("CREATE VIEW {}", escape_identifier(&def.name))];

	let Some((primary, others)) = tables.split_first() else {
		parts.extend(emit_annotation(def.description.as_deref()));
		parts.push(format!("AS {PLACEHOLDER_QUERY};"));
		return Ok((parts.join(" "), Vec::new()));
	};

	if primary.columns.is_empty() {
		return Err(Error::compile(&def.name, format!("table '{}.{}' has no columns", primary.source, primary.table)));
	}

	let mut dependencies = vec![primary.clone()];
	let mut joins = Vec::new();
	let mut hints = Vec::new();
	for (idx, table) in others.iter().enumerate() {
		let alias = format!("t{}", idx + 2);
		let target = qualified(table);
		match join_condition(primary, table, &alias) {
			Some(condition) => {
				joins.push(format!(" LEFT OUTER JOIN {target} AS {alias} ON {condition}"));
				if !dependencies.iter().any(|d| d.same_table(table)) {
					dependencies.push(table.clone());
				}
			}
			None => hints.push(format!("\n-- LEFT OUTER JOIN {target} AS {alias} ON t1.<column> = {alias}.<column>")),
		}
	}

	let columns: Vec<String> = primary.columns.iter().map(|c| escape_identifier(&c.name)).collect();
	let projection: Vec<String> = if joins.is_empty() {
		columns.clone()
	} else {
		columns.iter().map(|c| format!("t1.{c}")).collect()
	};

	let mut elements = columns;
	if let Some(key) = primary.key.as_ref().filter(|key| key.columns.iter().all(|c| has_column(primary, c))) {
		elements.push(emit_key(key));
	}
	parts.push(format!("({})", elements.join(", ")));
	parts.extend(emit_annotation(def.description.as_deref()));

	let mut query = format!("AS SELECT {} FROM {} AS t1", projection.join(", "), qualified(primary));
	for join in joins {
		query.push_str(&join);
	}
	for hint in &hints {
		query.push_str(hint);
	}
	if !hints.is_empty() {
		query.push('\n');
	}
	query.push(';');
	parts.push(query);

	Ok((parts.join(" "), dependencies))
}

fn join_condition(primary: &SourceTableRef, table: &SourceTableRef, alias: &str) -> Option<String> {
	let key = table.key.as_ref()?;
	let conditions = key
		.columns
		.iter()
		.map(|column| {
			let left = primary.columns.iter().find(|c| c.name.eq_ignore_ascii_case(column))?;
			Some(format!("t1.{} = {alias}.{}", escape_identifier(&left.name), escape_identifier(column)))
		})
		.collect::<Option<Vec<_>>>()?;
	if conditions.is_empty() {
		return None;
	}
	Some(conditions.join(" AND "))
}

fn has_column(table: &SourceTableRef, name: &str) -> bool {
	table.columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
}

fn qualified(table: &SourceTableRef) -> String {
	format!("{}.{}", escape_identifier(&table.source), escape_identifier(&table.table))
}

/// Parses hand written DDL and checks it defines exactly the named view.
pub fn parse_user_ddl(view: &str, ddl: &str) -> Result<DdlObject> {
	let parsed = dvirt_sql::parse(ddl).map_err(|e| Error::compile(view, format!("DDL is not parsable: {e}")))?;

	if parsed.objects.len() > 1 {
		return Err(Error::compile(view, "DDL defines more than one object"));
	}
	let Some(object) = parsed.objects.into_iter().next() else {
		return Err(Error::compile(view, "DDL does not define a view"));
	};
	if object.kind != DdlObjectKind::View {
		return Err(Error::compile(view, "DDL must define a view"));
	}
	if !object.name.name().eq_ignore_ascii_case(view) {
		return Err(Error::compile(view, format!("DDL defines view '{}' instead of '{view}'", object.name.name())));
	}
	Ok(object)
}

fn compile_user_defined(def: &ViewDefinition, finder: &dyn SchemaFinder) -> Result<CompiledView> {
	let ddl = def
		.ddl
		.as_deref()
		.map(str::trim)
		.filter(|ddl| !ddl.is_empty())
		.ok_or_else(|| Error::compile(&def.name, "view has no DDL"))?;

	let object = parse_user_ddl(&def.name, ddl)?;

	let mut dependencies: Vec<SourceTableRef> = Vec::new();
	for reference in &object.references {
		// views of the same virtualization are not source tables
		if reference.parts[0].eq_ignore_ascii_case(&def.virtualization) {
			continue;
		}
		let resolved = resolve_table(&def.name, &reference.parts[0], reference.name(), finder)?;
		if !dependencies.iter().any(|d| d.same_table(&resolved)) {
			dependencies.push(resolved);
		}
	}

	Ok(CompiledView {
		id: def.id.clone(),
		name: def.name.clone(),
		ddl: terminate(ddl),
		dependencies,
	})
}

fn terminate(ddl: &str) -> String {
	let body = ddl.trim_end().trim_end_matches(';').trim_end();
	match body.lines().last() {
		Some(line) if line.contains("--") => format!("{body}\n;"),
		_ => format!("{body};"),
	}
}
