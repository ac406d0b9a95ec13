// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dashmap::DashMap;
use dvirt_compiler::assemble_image;
use dvirt_core::{
	Error, Result,
	interface::{Artifact, DeploymentRuntime, Handle, SchemaFinder, VersionStore},
	model::{CompiledImage, ImageMode},
};
use dvirt_runtime::sync::DeployLocks;
use tracing::{debug, instrument, trace, warn};

use crate::PreviewBase;

/// A deployed preview image and the compiled image it was deployed from.
#[derive(Debug, Clone)]
pub struct PreviewImage {
	pub version: u64,
	pub handle: Handle,
	pub image: Arc<CompiledImage>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
	generation: u64,
	preview: PreviewImage,
}

pub struct PreviewCoordinator {
	versions: Arc<dyn VersionStore>,
	finder: Arc<dyn SchemaFinder>,
	runtime: Arc<dyn DeploymentRuntime>,
	locks: Arc<DeployLocks>,
	base: Arc<PreviewBase>,
	cache: DashMap<String, CacheEntry>,
}

impl PreviewCoordinator {
	pub fn new(
		versions: Arc<dyn VersionStore>,
		finder: Arc<dyn SchemaFinder>,
		runtime: Arc<dyn DeploymentRuntime>,
		locks: Arc<DeployLocks>,
		base: Arc<PreviewBase>,
	) -> Self {
		Self {
			versions,
			finder,
			runtime,
			locks,
			base,
			cache: DashMap::new(),
		}
	}

	/// Returns the deployed preview image of `name` at its current version,
	/// rebuilding it first when it is missing or stale.
	///
	/// Concurrent callers for the same name share one rebuild. A failed rebuild
	/// leaves the cache as it was and fails only the caller that ran it.
	pub fn ensure_current(&self, name: &str) -> Result<Handle> {
		self.ensure_image(name).map(|preview| preview.handle)
	}

	/// [`Self::ensure_current`] returning the compiled image together with
	/// its handle, both taken from the same cache entry.
	#[instrument(name = "preview::ensure_current", level = "debug", skip(self))]
	pub fn ensure_image(&self, name: &str) -> Result<PreviewImage> {
		let version = self.versions.current_version(name)?;
		if let Some(preview) = self.current(name, version) {
			return Ok(preview);
		}

		let _stripe = self.locks.lock_name(name);

		let version = self.versions.current_version(name)?;
		if let Some(preview) = self.current(name, version) {
			trace!(version, "rebuilt while waiting");
			return Ok(preview);
		}

		let generation = self.base.generation();
		let (handle, image) = self.rebuild(name, version)?;
		let preview = PreviewImage {
			version,
			handle,
			image,
		};
		self.cache.insert(
			name.to_string(),
			CacheEntry {
				generation,
				preview: preview.clone(),
			},
		);
		debug!(version, generation, "preview image deployed");
		Ok(preview)
	}

	/// Like [`Self::ensure_current`], but also requires the runtime to have
	/// finished loading the image.
	#[instrument(name = "preview::ensure_loaded", level = "debug", skip(self))]
	pub fn ensure_loaded(&self, name: &str) -> Result<Handle> {
		let handle = self.ensure_current(name)?;
		if !handle.is_loaded() {
			return Err(Error::unavailable(name, "preview image is still loading"));
		}
		Ok(handle)
	}

	/// Version of the cached image, if there is one.
	pub fn cached_version(&self, name: &str) -> Option<u64> {
		self.cache.get(name).map(|entry| entry.preview.version)
	}

	pub fn base(&self) -> &Arc<PreviewBase> {
		&self.base
	}

	fn current(&self, name: &str, version: u64) -> Option<PreviewImage> {
		let entry = self.cache.get(name)?;
		if entry.preview.version == version && entry.generation == self.base.generation() {
			Some(entry.preview.clone())
		} else {
			None
		}
	}

	fn rebuild(&self, name: &str, version: u64) -> Result<(Handle, Arc<CompiledImage>)> {
		let defs = self.versions.list_view_definitions(name)?;

		let image = assemble_image(name, &defs, version, ImageMode::Preview, None, self.finder.as_ref())
			.map_err(|err| unavailable(name, err))?;
		if !image.incomplete.is_empty() {
			debug!(incomplete = image.incomplete.len(), "preview image leaves views out");
		}

		let image = Arc::new(image);
		let _structural = self.locks.lock_structural();
		self.base.deploy_if_missing().map_err(|err| unavailable(name, err))?;
		let handle = self.runtime.deploy(Artifact::Image(image.clone())).map_err(|err| unavailable(name, err))?;
		Ok((handle, image))
	}
}

fn unavailable(name: &str, err: Error) -> Error {
	warn!(virtualization = name, error = %err, "preview rebuild failed");
	Error::unavailable(name, err.to_string())
}
