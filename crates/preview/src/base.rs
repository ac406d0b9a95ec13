// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicU64, Ordering},
};

use dvirt_core::{
	Result,
	interface::{Artifact, BaseInvalidator, DeploymentRuntime},
	naming::{PREVIEW_BASE, source_artifact_name},
};
use dvirt_runtime::sync::DeployLocks;
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// The shared base image every preview image imports.
///
/// Each invalidation advances the generation. Cached preview images built
/// against an older generation are rebuilt on their next request.
pub struct PreviewBase {
	runtime: Arc<dyn DeploymentRuntime>,
	locks: Arc<DeployLocks>,
	generation: AtomicU64,
	imports: Mutex<Vec<String>>,
}

impl PreviewBase {
	pub fn new(runtime: Arc<dyn DeploymentRuntime>, locks: Arc<DeployLocks>) -> Self {
		Self {
			runtime,
			locks,
			generation: AtomicU64::new(0),
			imports: Mutex::new(Vec::new()),
		}
	}

	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	/// Source artifacts the base currently imports.
	pub fn imports(&self) -> Vec<String> {
		self.imports.lock().clone()
	}

	/// Deploys the base if the runtime does not have it yet. Callers hold the
	/// structural lock.
	pub(crate) fn deploy_if_missing(&self) -> Result<()> {
		if self.runtime.get_deployed(PREVIEW_BASE).is_some() {
			return Ok(());
		}
		debug!("deploying missing preview base");
		self.runtime.deploy(Artifact::Base {
			imports: self.imports(),
		})?;
		Ok(())
	}
}

impl BaseInvalidator for PreviewBase {
	#[instrument(name = "preview::base::invalidate", level = "debug", skip(self))]
	fn invalidate_base(&self, active_sources: &[String]) -> Result<()> {
		let imports: Vec<String> = active_sources.iter().map(|s| source_artifact_name(s)).collect();

		let _structural = self.locks.lock_structural();
		*self.imports.lock() = imports.clone();

		// Advanced ahead of the redeploy and whatever its outcome, since cached
		// previews embed the old source models.
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		debug!(generation, "preview base generation advanced");

		self.runtime.deploy(Artifact::Base {
			imports,
		})?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use dvirt_testing::CountingRuntime;

	use super::*;

	#[test]
	fn test_invalidate_redeploys_and_advances_generation() {
		let runtime = Arc::new(CountingRuntime::new());
		let base = PreviewBase::new(runtime.clone(), Arc::new(DeployLocks::default()));
		assert_eq!(base.generation(), 0);

		base.invalidate_base(&["pg".to_string(), "mysql".to_string()]).unwrap();
		assert_eq!(base.generation(), 1);
		assert_eq!(base.imports(), vec!["pgconn".to_string(), "mysqlconn".to_string()]);
		assert_eq!(runtime.deploy_count(PREVIEW_BASE), 1);

		match runtime.deployed_artifact(PREVIEW_BASE) {
			Some(Artifact::Base {
				imports,
			}) => assert_eq!(imports, vec!["pgconn".to_string(), "mysqlconn".to_string()]),
			other => panic!("unexpected artifact {other:?}"),
		}
	}

	#[test]
	fn test_failed_redeploy_still_advances_generation() {
		let runtime = Arc::new(CountingRuntime::new());
		let base = PreviewBase::new(runtime.clone(), Arc::new(DeployLocks::default()));
		runtime.fail_deploys("runtime down");

		assert!(base.invalidate_base(&["pg".to_string()]).is_err());
		assert_eq!(base.generation(), 1);
	}

	#[test]
	fn test_deploy_if_missing_deploys_once() {
		let runtime = Arc::new(CountingRuntime::new());
		let base = PreviewBase::new(runtime.clone(), Arc::new(DeployLocks::default()));

		base.deploy_if_missing().unwrap();
		base.deploy_if_missing().unwrap();
		assert_eq!(runtime.deploy_count(PREVIEW_BASE), 1);
	}
}
