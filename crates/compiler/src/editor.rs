// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Applies edits of view definitions before they are stored upstream.

use dvirt_core::{
	Error, Result,
	interface::SchemaFinder,
	model::{ViewDefinition, ViewStatus},
	path::SourcePath,
};
use tracing::{instrument, warn};

use crate::view::{compile_view, parse_user_ddl};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
	pub definition: ViewDefinition,
	/// The edit changes the preview image, so the virtualization version has
	/// to advance.
	pub touched: bool,
	pub status: ViewStatus,
}

/// Merges `incoming` over `existing`.
///
/// `incoming.version` is the version the editor last saw. A mismatch with the
/// stored version is a conflict, a missing one overwrites blindly.
#[instrument(name = "compiler::editor::apply_update", level = "debug", skip_all, fields(view = %incoming.name))]
pub fn apply_update(
	existing: Option<&ViewDefinition>,
	mut incoming: ViewDefinition,
	finder: &dyn SchemaFinder,
) -> Result<UpdateOutcome> {
	if let Some(existing) = existing {
		if existing.id != incoming.id {
			return Err(Error::validation(
				Some(incoming.name.clone()),
				format!("view id '{}' does not match '{}'", incoming.id, existing.id),
			));
		}
		if existing.virtualization != incoming.virtualization {
			return Err(Error::validation(
				Some(incoming.name.clone()),
				format!("view '{}' belongs to virtualization '{}'", existing.name, existing.virtualization),
			));
		}
		match incoming.version {
			Some(expected) if Some(expected) != existing.version => {
				return Err(Error::ConcurrencyConflict {
					id: incoming.id.to_string(),
					expected,
					actual: existing.version.unwrap_or_default(),
				});
			}
			Some(_) => {}
			None => warn!(view = %incoming.name, "no version supplied, overwriting stored definition"),
		}
		incoming.version = existing.version;
	}

	let was_visible = existing.is_some_and(|e| e.complete && e.parsable);
	let previous_ddl = existing.and_then(|e| e.ddl.clone());

	if !incoming.complete {
		return Ok(UpdateOutcome {
			status: ViewStatus::success(&incoming.name),
			definition: incoming,
			touched: was_visible,
		});
	}

	if incoming.user_defined {
		let changed = previous_ddl != incoming.ddl || !incoming.parsable;
		if !changed {
			return Ok(UpdateOutcome {
				status: ViewStatus::success(&incoming.name),
				definition: incoming,
				touched: false,
			});
		}

		let ddl = incoming.ddl.clone().unwrap_or_default();
		return Ok(match parse_user_ddl(&incoming.name, &ddl) {
			Ok(object) => {
				if let Some(annotation) = object.annotation() {
					incoming.description = Some(annotation.to_string());
				}
				incoming.source_paths = object
					.references
					.iter()
					.filter(|r| !r.parts[0].eq_ignore_ascii_case(&incoming.virtualization))
					.map(|r| SourcePath::new(&r.parts[0], r.name()).to_string())
					.collect();
				incoming.parsable = true;
				UpdateOutcome {
					status: ViewStatus::success(&incoming.name),
					definition: incoming,
					touched: true,
				}
			}
			Err(err) => {
				incoming.parsable = false;
				UpdateOutcome {
					status: ViewStatus::from_error(&incoming.name, &err),
					definition: incoming,
					touched: was_visible,
				}
			}
		});
	}

	let regenerate = incoming.ddl.is_none()
		|| !incoming.parsable
		|| existing.is_none_or(|e| !e.parsable || e.source_paths != incoming.source_paths);
	if !regenerate {
		let touched = !was_visible || previous_ddl != incoming.ddl;
		return Ok(UpdateOutcome {
			status: ViewStatus::success(&incoming.name),
			definition: incoming,
			touched,
		});
	}

	Ok(match compile_view(&incoming, finder) {
		Ok(view) => {
			let touched = !was_visible || previous_ddl.as_deref() != Some(view.ddl.as_str());
			incoming.ddl = Some(view.ddl);
			incoming.parsable = true;
			UpdateOutcome {
				status: ViewStatus::success(&incoming.name),
				definition: incoming,
				touched,
			}
		}
		Err(err) => {
			incoming.parsable = false;
			UpdateOutcome {
				status: ViewStatus::from_error(&incoming.name, &err),
				definition: incoming,
				touched: was_visible,
			}
		}
	})
}

/// Whether deleting the definition changes the preview image.
pub fn touches_on_delete(def: &ViewDefinition) -> bool {
	def.complete && def.parsable
}

/// Checks a definition without changing it.
#[instrument(name = "compiler::editor::validate", level = "trace", skip_all, fields(view = %def.name))]
pub fn validate_definition(def: &ViewDefinition, finder: &dyn SchemaFinder) -> ViewStatus {
	if def.name.trim().is_empty() {
		return ViewStatus::error(&def.name, "view name is required");
	}
	if def.virtualization.trim().is_empty() {
		return ViewStatus::error(&def.name, "virtualization name is required");
	}
	if def.user_defined && def.ddl.as_deref().is_none_or(|ddl| ddl.trim().is_empty()) {
		return ViewStatus::error(&def.name, "view DDL is required");
	}

	match compile_view(def, finder) {
		Ok(_) => ViewStatus::success(&def.name),
		Err(err) => ViewStatus::from_error(&def.name, &err),
	}
}
