// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::JoinHandle,
};

use crossbeam_channel::{Sender, unbounded};
use dashmap::DashMap;
use dvirt_core::{
	Error, ObjectKind, Result,
	interface::{BaseInvalidator, DeploymentRuntime, SourceCatalog},
	model::{SourceDescriptor, SourceSchemaRecord, SourceState, SourceStatus},
};
use dvirt_runtime::sync::DeployLocks;
use parking_lot::Mutex;
use tracing::{debug, instrument, trace};

use crate::{SourceWorkerConfig, worker};

pub(crate) struct SourceEntry {
	pub descriptor: SourceDescriptor,
	pub record: SourceSchemaRecord,
}

/// State reachable from both the callers and the worker thread.
pub(crate) struct Shared {
	pub entries: DashMap<String, SourceEntry>,
	pub catalog: Arc<dyn SourceCatalog>,
	pub runtime: Arc<dyn DeploymentRuntime>,
	pub locks: Arc<DeployLocks>,
	pub base: Arc<dyn BaseInvalidator>,
}

impl Shared {
	/// Names of all sources with a discovered schema, sorted.
	pub fn active_sources(&self) -> Vec<String> {
		let mut active: Vec<String> = self
			.entries
			.iter()
			.filter(|entry| entry.record.state == SourceState::Active)
			.map(|entry| entry.key().clone())
			.collect();
		active.sort();
		active
	}
}

pub(crate) enum SourceTask {
	/// Deploys the loader, first dropping the artifacts of an earlier load
	/// when `replace` is set.
	Load {
		source: SourceDescriptor,
		replace: bool,
	},
	Remove {
		source: String,
	},
	Shutdown,
}

pub struct SourceLoadMachine {
	pub(crate) shared: Arc<Shared>,
	tasks: Sender<SourceTask>,
	running: Arc<AtomicBool>,
	handle: Mutex<Option<JoinHandle<()>>>,
}

impl SourceLoadMachine {
	/// Subscribes to the runtime's completion events and spawns the worker.
	pub fn start(
		config: SourceWorkerConfig,
		catalog: Arc<dyn SourceCatalog>,
		runtime: Arc<dyn DeploymentRuntime>,
		locks: Arc<DeployLocks>,
		base: Arc<dyn BaseInvalidator>,
	) -> Result<Self> {
		let shared = Arc::new(Shared {
			entries: DashMap::new(),
			catalog,
			runtime,
			locks,
			base,
		});

		let (tasks, task_receiver) = unbounded();
		let (events, event_receiver) = unbounded();
		shared.runtime.subscribe(events);

		let running = Arc::new(AtomicBool::new(true));
		let handle = worker::spawn(config, shared.clone(), task_receiver, event_receiver, running.clone())?;

		Ok(Self {
			shared,
			tasks,
			running,
			handle: Mutex::new(Some(handle)),
		})
	}

	/// Starts discovering the schema of `source`. A source that is already
	/// registered keeps its state.
	#[instrument(name = "source::register", level = "debug", skip(self))]
	pub fn register(&self, source: &str) -> Result<SourceState> {
		self.ensure_running()?;
		let _stripe = self.shared.locks.lock_name(source);

		if let Some(entry) = self.shared.entries.get(source) {
			trace!(state = ?entry.record.state, "source already registered");
			return Ok(entry.record.state);
		}

		let descriptor = self
			.shared
			.catalog
			.find_source(source)?
			.ok_or_else(|| Error::not_found(ObjectKind::Source, source))?;

		let mut record = SourceSchemaRecord::missing(source);
		record.state = SourceState::Loading;
		self.shared.entries.insert(
			source.to_string(),
			SourceEntry {
				descriptor: descriptor.clone(),
				record,
			},
		);

		self.submit(SourceTask::Load {
			source: descriptor,
			replace: false,
		})?;
		debug!("source loading");
		Ok(SourceState::Loading)
	}

	/// Discovers the schema of `source` again. Has no effect while a load is
	/// in progress.
	#[instrument(name = "source::refresh", level = "debug", skip(self))]
	pub fn refresh(&self, source: &str) -> Result<SourceState> {
		self.ensure_running()?;
		let _stripe = self.shared.locks.lock_name(source);

		let descriptor = {
			let mut entry = self
				.shared
				.entries
				.get_mut(source)
				.ok_or_else(|| Error::not_found(ObjectKind::Source, source))?;
			if entry.record.is_loading() {
				trace!("already loading");
				return Ok(SourceState::Loading);
			}
			entry.record.state = SourceState::Loading;
			entry.descriptor.clone()
		};

		self.submit(SourceTask::Load {
			source: descriptor,
			replace: true,
		})?;
		debug!("source reloading");
		Ok(SourceState::Loading)
	}

	/// Forgets `source` and drops its artifacts.
	#[instrument(name = "source::remove", level = "debug", skip(self))]
	pub fn remove(&self, source: &str) -> Result<()> {
		self.ensure_running()?;
		let _stripe = self.shared.locks.lock_name(source);

		self.shared.entries.remove(source).ok_or_else(|| Error::not_found(ObjectKind::Source, source))?;
		self.submit(SourceTask::Remove {
			source: source.to_string(),
		})
	}

	pub fn status(&self, source: &str) -> Result<SourceStatus> {
		self.shared
			.entries
			.get(source)
			.map(|entry| entry.record.status())
			.ok_or_else(|| Error::not_found(ObjectKind::Source, source))
	}

	pub fn find_record(&self, source: &str) -> Option<SourceSchemaRecord> {
		self.shared.entries.get(source).map(|entry| entry.record.clone())
	}

	/// Status of every registered source, sorted by name.
	pub fn statuses(&self) -> Vec<SourceStatus> {
		let mut statuses: Vec<SourceStatus> = self.shared.entries.iter().map(|entry| entry.record.status()).collect();
		statuses.sort_by(|a, b| a.source.cmp(&b.source));
		statuses
	}

	pub fn active_sources(&self) -> Vec<String> {
		self.shared.active_sources()
	}

	/// Stops the worker and waits for it. Work still queued is dropped.
	pub fn shutdown(&self) {
		if !self.running.swap(false, Ordering::AcqRel) {
			return;
		}
		let _ = self.tasks.send(SourceTask::Shutdown);
		if let Some(handle) = self.handle.lock().take() {
			let _ = handle.join();
		}
	}

	fn ensure_running(&self) -> Result<()> {
		if self.running.load(Ordering::Acquire) {
			Ok(())
		} else {
			Err(Error::unavailable("source worker", "worker was shut down"))
		}
	}

	fn submit(&self, task: SourceTask) -> Result<()> {
		self.tasks.send(task).map_err(|_| Error::unavailable("source worker", "worker is not running"))
	}
}

impl Drop for SourceLoadMachine {
	fn drop(&mut self) {
		self.shutdown();
	}
}
