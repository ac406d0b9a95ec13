// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::BTreeMap;

use dvirt_core::{
	Error, Result,
	interface::SchemaFinder,
	model::{
		ANY_AUTHENTICATED, CompiledImage, CompiledView, ImageMode, IncompleteView, KeyKind, Permission,
		RoleGrant, RolePrivileges, SourceMapping, SourceModel, SourceTableRef, Table, ViewDefinition,
	},
	naming::PREVIEW_BASE,
};
use dvirt_sql::emit_foreign_table;
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::view::compile_view;

pub const PREVIEW_PROPERTY: &str = "preview";
pub const VERSION_PROPERTY: &str = "version";

/// Builds the image of one virtualization at `version`.
///
/// Only complete definitions take part. In preview mode a definition that is
/// not parsable or does not compile is reported in `incomplete` and left out.
/// In service mode it fails the whole assembly instead. Output order follows
/// input order, so equal inputs give equal images.
#[instrument(name = "compiler::assemble", level = "debug", skip(defs, privileges, finder), fields(definitions = defs.len()))]
pub fn assemble_image(
	name: &str,
	defs: &[ViewDefinition],
	version: u64,
	mode: ImageMode,
	privileges: Option<&[RolePrivileges]>,
	finder: &dyn SchemaFinder,
) -> Result<CompiledImage> {
	let mut views = Vec::new();
	let mut incomplete = Vec::new();

	for def in defs.iter().filter(|d| d.complete) {
		let compiled = if def.parsable {
			compile_view(def, finder)
		} else {
			Err(Error::compile(&def.name, format!("{} is not parsable", def.name)))
		};

		match (compiled, mode) {
			(Ok(view), _) => views.push(view),
			(Err(err), ImageMode::Preview) => {
				debug!(view = %def.name, error = %err, "leaving view out of preview image");
				incomplete.push(IncompleteView {
					id: def.id.clone(),
					name: def.name.clone(),
					reason: err.to_string(),
				});
			}
			(Err(err), ImageMode::Service) => {
				return Err(Error::validation(Some(def.name.clone()), err.to_string()));
			}
		}
	}

	let source_models = source_models(&views, finder)?;
	let virtual_model: String = views.iter().map(|v| format!("{}\n", v.ddl)).collect();

	let mut properties = BTreeMap::new();
	properties.insert(VERSION_PROPERTY.to_string(), version.to_string());

	let mut imports = Vec::new();
	let mut grants = Vec::new();
	match mode {
		ImageMode::Preview => {
			imports.push(PREVIEW_BASE.to_string());
			properties.insert(PREVIEW_PROPERTY.to_string(), "true".to_string());
		}
		ImageMode::Service => {
			if let Some(privileges) = privileges {
				grants = role_grants(name, &views, privileges);
			}
		}
	}

	Ok(CompiledImage {
		name: name.to_string(),
		version,
		mode,
		views,
		virtual_model,
		source_models,
		imports,
		properties,
		grants,
		incomplete,
	})
}

/// One restricted model per source, holding only the tables some view reads.
fn source_models(views: &[CompiledView], finder: &dyn SchemaFinder) -> Result<Vec<SourceModel>> {
	let mut grouped: IndexMap<&str, Vec<&SourceTableRef>> = IndexMap::new();
	for dependency in views.iter().flat_map(|v| v.dependencies.iter()) {
		let tables = grouped.entry(dependency.source.as_str()).or_default();
		if !tables.iter().any(|t| t.table == dependency.table) {
			tables.push(dependency);
		}
	}

	let mut result = Vec::with_capacity(grouped.len());
	for (source, tables) in grouped {
		let ddl = tables.iter().map(|t| emit_foreign_table(&to_table(t))).collect::<Vec<_>>().join("\n");
		let mapping = finder.find_source(source)?.map(|descriptor| SourceMapping {
			name: descriptor.name,
			translator: descriptor.translator,
			connection: descriptor.connection,
		});
		result.push(SourceModel {
			name: source.to_string(),
			tables: tables.iter().map(|t| t.table.clone()).collect(),
			ddl,
			mapping,
			visible: false,
		});
	}
	Ok(result)
}

fn to_table(table: &SourceTableRef) -> Table {
	let mut result = Table {
		name: table.table.clone(),
		columns: table.columns.clone(),
		..Default::default()
	};
	if let Some(key) = &table.key {
		match key.kind {
			KeyKind::Primary => result.primary_key = Some(key.clone()),
			KeyKind::Unique => result.unique_keys.push(key.clone()),
		}
	}
	result
}

fn role_grants(name: &str, views: &[CompiledView], privileges: &[RolePrivileges]) -> Vec<RoleGrant> {
	let mut roles: IndexMap<&str, RoleGrant> = IndexMap::new();

	for entry in privileges {
		let grant = roles.entry(entry.role.as_str()).or_insert_with(|| {
			let any_authenticated = entry.role == ANY_AUTHENTICATED;
			RoleGrant {
				role: entry.role.clone(),
				mapped_roles: if any_authenticated {
					Vec::new()
				} else {
					vec![entry.role.clone()]
				},
				any_authenticated,
				permissions: Vec::new(),
			}
		});

		let Some(view_id) = &entry.view_id else {
			continue;
		};
		let Some(view) = views.iter().find(|v| &v.id == view_id) else {
			continue;
		};
		if entry.privileges.is_empty() {
			continue;
		}

		let mut privileges = entry.privileges.clone();
		privileges.sort();
		privileges.dedup();
		grant.permissions.push(Permission {
			resource: format!("{name}.{}", view.name),
			privileges,
		});
	}

	roles.into_values().collect()
}
