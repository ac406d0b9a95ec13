// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	thread,
	time::Duration,
};

use crossbeam_channel::Sender;
use dvirt_core::{
	Error, Result,
	interface::{Artifact, DeploymentEvent, DeploymentRuntime, Handle, ImageHandle},
	naming,
};
use parking_lot::Mutex;

#[derive(Debug)]
pub struct FakeHandle {
	name: String,
	loaded: AtomicBool,
	errors: Mutex<Vec<String>>,
}

impl FakeHandle {
	pub fn new(name: impl Into<String>, loaded: bool) -> Self {
		Self {
			name: name.into(),
			loaded: AtomicBool::new(loaded),
			errors: Mutex::new(Vec::new()),
		}
	}

	pub fn set_loaded(&self, loaded: bool) {
		self.loaded.store(loaded, Ordering::SeqCst);
	}

	pub fn set_validity_errors(&self, errors: Vec<String>) {
		*self.errors.lock() = errors;
	}
}

impl ImageHandle for FakeHandle {
	fn name(&self) -> &str {
		&self.name
	}

	fn is_loaded(&self) -> bool {
		self.loaded.load(Ordering::SeqCst)
	}

	fn validity_errors(&self) -> Vec<String> {
		self.errors.lock().clone()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RuntimeCall {
	Deploy(String),
	Undeploy(String),
}

/// Deployment runtime that keeps artifacts in memory and records every call.
///
/// Loaders stay unloaded until [`CountingRuntime::complete`] reports them,
/// everything else loads on deploy.
#[derive(Default)]
pub struct CountingRuntime {
	deployed: Mutex<HashMap<String, (Artifact, Arc<FakeHandle>)>>,
	calls: Mutex<Vec<RuntimeCall>>,
	listeners: Mutex<Vec<Sender<DeploymentEvent>>>,
	deploy_delay: Mutex<Option<Duration>>,
	failing: Mutex<Option<String>>,
	in_flight: AtomicUsize,
	max_in_flight: AtomicUsize,
}

impl CountingRuntime {
	pub fn new() -> Self {
		Self::default()
	}

	/// Every deploy sleeps this long before it completes.
	pub fn with_deploy_delay(self, delay: Duration) -> Self {
		*self.deploy_delay.lock() = Some(delay);
		self
	}

	/// Deploys fail until [`CountingRuntime::recover`] is called.
	pub fn fail_deploys(&self, message: impl Into<String>) {
		*self.failing.lock() = Some(message.into());
	}

	pub fn recover(&self) {
		*self.failing.lock() = None;
	}

	pub fn deploy_count(&self, name: &str) -> usize {
		self.calls.lock().iter().filter(|c| matches!(c, RuntimeCall::Deploy(n) if n == name)).count()
	}

	pub fn undeploy_count(&self, name: &str) -> usize {
		self.calls.lock().iter().filter(|c| matches!(c, RuntimeCall::Undeploy(n) if n == name)).count()
	}

	pub fn total_deploys(&self) -> usize {
		self.calls.lock().iter().filter(|c| matches!(c, RuntimeCall::Deploy(_))).count()
	}

	/// Highest number of deploys observed running at the same time.
	pub fn max_concurrent_deploys(&self) -> usize {
		self.max_in_flight.load(Ordering::SeqCst)
	}

	pub fn deployed_artifact(&self, name: &str) -> Option<Artifact> {
		self.deployed.lock().get(name).map(|(artifact, _)| artifact.clone())
	}

	pub fn handle(&self, name: &str) -> Option<Arc<FakeHandle>> {
		self.deployed.lock().get(name).map(|(_, handle)| handle.clone())
	}

	/// Reports the end of an asynchronous load to all subscribers.
	pub fn complete(&self, name: &str, success: bool, payload: &str) {
		if let Some(handle) = self.handle(name) {
			handle.set_loaded(success);
		}
		let event = DeploymentEvent {
			name: name.to_string(),
			success,
			payload: payload.to_string(),
		};
		self.listeners.lock().retain(|listener| listener.send(event.clone()).is_ok());
	}

	pub fn complete_loader(&self, source: &str, schema: &str) {
		self.complete(&naming::loader_artifact_name(source), true, schema);
	}

	pub fn fail_loader(&self, source: &str, error: &str) {
		self.complete(&naming::loader_artifact_name(source), false, error);
	}
}

impl DeploymentRuntime for CountingRuntime {
	fn deploy(&self, artifact: Artifact) -> Result<Handle> {
		let name = artifact.name();
		let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
		self.max_in_flight.fetch_max(current, Ordering::SeqCst);

		let delay = *self.deploy_delay.lock();
		if let Some(delay) = delay {
			thread::sleep(delay);
		}

		let failing = self.failing.lock().clone();
		let result = match failing {
			Some(message) => Err(Error::Internal(format!("deploy of '{name}' failed: {message}"))),
			None => {
				self.calls.lock().push(RuntimeCall::Deploy(name.clone()));
				let loaded = !matches!(artifact, Artifact::Loader { .. });
				let handle = Arc::new(FakeHandle::new(name.clone(), loaded));
				self.deployed.lock().insert(name, (artifact, handle.clone()));
				Ok(handle as Handle)
			}
		};

		self.in_flight.fetch_sub(1, Ordering::SeqCst);
		result
	}

	fn undeploy(&self, name: &str) -> Result<bool> {
		self.calls.lock().push(RuntimeCall::Undeploy(name.to_string()));
		Ok(self.deployed.lock().remove(name).is_some())
	}

	fn get_deployed(&self, name: &str) -> Option<Handle> {
		self.deployed.lock().get(name).map(|(_, handle)| handle.clone() as Handle)
	}

	fn subscribe(&self, events: Sender<DeploymentEvent>) {
		self.listeners.lock().push(events);
	}
}

#[cfg(test)]
mod tests {
	use dvirt_core::model::SourceDescriptor;

	use super::*;

	#[test]
	fn test_loader_loads_on_completion() {
		let runtime = CountingRuntime::new();
		let (tx, rx) = crossbeam_channel::unbounded();
		runtime.subscribe(tx);

		let handle = runtime
			.deploy(Artifact::Loader {
				source: SourceDescriptor::new("pg", "postgresql"),
			})
			.unwrap();
		assert!(!handle.is_loaded());

		runtime.complete_loader("pg", "CREATE FOREIGN TABLE t (id integer);");
		assert!(handle.is_loaded());
		let event = rx.try_recv().unwrap();
		assert_eq!(event.name, "pgconn-load");
		assert!(event.success);
	}

	#[test]
	fn test_failing_deploys_are_not_recorded() {
		let runtime = CountingRuntime::new();
		runtime.fail_deploys("boom");
		assert!(
			runtime.deploy(Artifact::Base {
				imports: vec![]
			})
			.is_err()
		);
		assert_eq!(runtime.total_deploys(), 0);

		runtime.recover();
		runtime.deploy(Artifact::Base {
			imports: vec![],
		})
		.unwrap();
		assert_eq!(runtime.deploy_count("Preview"), 1);
	}
}
