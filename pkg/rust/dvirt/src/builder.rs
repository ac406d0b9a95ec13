// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use dvirt_core::{
	Result,
	interface::{DeploymentRuntime, SourceCatalog, VersionStore},
};
use dvirt_preview::{PreviewBase, PreviewCoordinator};
use dvirt_runtime::sync::DeployLocks;
use dvirt_sub_source::SourceLoadMachine;
use dvirt_sub_tracing::{TracingBuilder, TracingFactory};
use tracing::debug;

use crate::{VirtualizationConfig, Virtualizations};

pub struct VirtualizationBuilder {
	versions: Arc<dyn VersionStore>,
	catalog: Arc<dyn SourceCatalog>,
	runtime: Arc<dyn DeploymentRuntime>,
	config: VirtualizationConfig,
	tracing: Option<TracingFactory>,
}

impl VirtualizationBuilder {
	pub fn new(
		versions: Arc<dyn VersionStore>,
		catalog: Arc<dyn SourceCatalog>,
		runtime: Arc<dyn DeploymentRuntime>,
	) -> Self {
		Self {
			versions,
			catalog,
			runtime,
			config: VirtualizationConfig::default(),
			tracing: None,
		}
	}

	pub fn with_config(mut self, config: VirtualizationConfig) -> Self {
		self.config = config;
		self
	}

	/// Installs a global tracing subscriber on build, unless one is
	/// installed already.
	pub fn with_tracing<F>(mut self, configurator: F) -> Self
	where
		F: FnOnce(TracingBuilder) -> TracingBuilder + Send + 'static,
	{
		self.tracing = Some(TracingFactory::with_configurator(configurator));
		self
	}

	pub fn build(self) -> Result<Virtualizations> {
		if let Some(tracing) = self.tracing {
			tracing.install();
		}

		let locks = Arc::new(DeployLocks::new(self.config.preview.lock_stripes));
		let base = Arc::new(PreviewBase::new(self.runtime.clone(), locks.clone()));
		let sources = Arc::new(SourceLoadMachine::start(
			self.config.sources,
			self.catalog,
			self.runtime.clone(),
			locks.clone(),
			base.clone(),
		)?);
		let previews = PreviewCoordinator::new(
			self.versions.clone(),
			sources.clone(),
			self.runtime.clone(),
			locks.clone(),
			base,
		);

		debug!(stripes = locks.striped().len(), "virtualizations started");
		Ok(Virtualizations::new(self.versions, self.runtime, locks, sources, previews))
	}
}
