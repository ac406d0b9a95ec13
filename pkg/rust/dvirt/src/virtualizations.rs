// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dvirt_compiler::{UpdateOutcome, apply_update, assemble_image, validate_definition};
use dvirt_core::{
	Error, Result,
	interface::{Artifact, DeploymentRuntime, Handle, VersionStore},
	model::{
		CompiledImage, ImageMode, RolePrivileges, SourceState, SourceStatus, ViewDefinition, ViewListing,
		ViewStatus,
	},
};
use dvirt_preview::PreviewCoordinator;
use dvirt_runtime::sync::DeployLocks;
use dvirt_sub_source::SourceLoadMachine;
use tracing::{debug, instrument};

/// Entry point to the virtualization services. Built by
/// [`VirtualizationBuilder`](crate::VirtualizationBuilder).
pub struct Virtualizations {
	versions: Arc<dyn VersionStore>,
	runtime: Arc<dyn DeploymentRuntime>,
	locks: Arc<DeployLocks>,
	sources: Arc<SourceLoadMachine>,
	previews: PreviewCoordinator,
}

impl Virtualizations {
	pub(crate) fn new(
		versions: Arc<dyn VersionStore>,
		runtime: Arc<dyn DeploymentRuntime>,
		locks: Arc<DeployLocks>,
		sources: Arc<SourceLoadMachine>,
		previews: PreviewCoordinator,
	) -> Self {
		Self {
			versions,
			runtime,
			locks,
			sources,
			previews,
		}
	}

	/// The loaded preview image of `name` at its current version.
	pub fn ensure_preview_image(&self, name: &str) -> Result<Handle> {
		self.previews.ensure_loaded(name)
	}

	/// DDL of a single view, compiled against the discovered source schemas.
	pub fn compile_view(&self, def: &ViewDefinition) -> Result<String> {
		dvirt_compiler::compile_view(def, self.sources.as_ref()).map(|view| view.ddl)
	}

	/// Strict assembly of `defs` at the current version of `name`.
	pub fn assemble_service_image(
		&self,
		name: &str,
		defs: &[ViewDefinition],
		privileges: &[RolePrivileges],
	) -> Result<CompiledImage> {
		let version = self.versions.current_version(name)?;
		assemble_image(name, defs, version, ImageMode::Service, Some(privileges), self.sources.as_ref())
	}

	/// Builds the service image from the stored definitions and deploys it.
	///
	/// The preview of `name` has to be loaded and free of validity errors.
	#[instrument(name = "dvirt::publish", level = "debug", skip(self, privileges))]
	pub fn publish_image(&self, name: &str, privileges: &[RolePrivileges]) -> Result<Arc<CompiledImage>> {
		let preview = self.ensure_preview_image(name)?;
		let errors = preview.validity_errors();
		if !errors.is_empty() {
			return Err(Error::validation(None, format!("virtualization '{name}' is not valid: {}", errors.join("; "))));
		}

		let defs = self.versions.list_view_definitions(name)?;
		let image = Arc::new(self.assemble_service_image(name, &defs, privileges)?);

		let _stripe = self.locks.lock_name(name);
		let _structural = self.locks.lock_structural();
		self.runtime.deploy(Artifact::Image(image.clone()))?;
		debug!(version = image.version, "service image deployed");
		Ok(image)
	}

	pub fn export_image(&self, image: &CompiledImage) -> Result<String> {
		image.to_json()
	}

	/// Merges an edit into the stored definition. The caller persists the
	/// outcome and advances the version when it is touched.
	pub fn update_view_definition(
		&self,
		existing: Option<&ViewDefinition>,
		incoming: ViewDefinition,
	) -> Result<UpdateOutcome> {
		apply_update(existing, incoming, self.sources.as_ref())
	}

	/// Needs the preview of the view's virtualization to be loaded.
	pub fn validate_view_definition(&self, def: &ViewDefinition) -> Result<ViewStatus> {
		self.ensure_preview_image(&def.virtualization)?;
		Ok(validate_definition(def, self.sources.as_ref()))
	}

	/// Every stored view of `name` with its state in the current preview.
	#[instrument(name = "dvirt::view_listing", level = "trace", skip(self))]
	pub fn view_listing(&self, name: &str) -> Result<Vec<ViewListing>> {
		let image = self.previews.ensure_image(name)?.image;
		let defs = self.versions.list_view_definitions(name)?;

		Ok(defs.into_iter()
			.map(|def| {
				let mut errors = Vec::new();
				if !def.complete {
					errors.push("view definition is incomplete".to_string());
				} else if !def.parsable {
					errors.push(format!("{} is not parsable", def.name));
				}
				if let Some(incomplete) = image.incomplete.iter().find(|v| v.id == def.id) {
					errors.push(incomplete.reason.clone());
				}
				let valid = errors.is_empty() && image.find_view(&def.name).is_some();
				ViewListing {
					id: def.id,
					name: def.name,
					description: def.description,
					valid,
					errors,
				}
			})
			.collect())
	}

	pub fn register_source(&self, source: &str) -> Result<SourceState> {
		self.sources.register(source)
	}

	pub fn refresh_source(&self, source: &str) -> Result<SourceState> {
		self.sources.refresh(source)
	}

	pub fn remove_source(&self, source: &str) -> Result<()> {
		self.sources.remove(source)
	}

	pub fn source_status(&self, source: &str) -> Result<SourceStatus> {
		self.sources.status(source)
	}

	pub fn source_statuses(&self) -> Vec<SourceStatus> {
		self.sources.statuses()
	}

	/// Stops the source worker. Further source operations fail.
	pub fn shutdown(&self) {
		self.sources.shutdown();
	}
}
