// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::{self, JoinHandle},
	time::{Duration, SystemTime},
};

use crossbeam_channel::{Receiver, select};
use dvirt_core::{
	Error, Result,
	interface::{Artifact, DeploymentEvent},
	model::{SourceDescriptor, SourceState, failure_marker},
	naming::{loader_artifact_name, source_artifact_name, source_of_loader},
};
use tracing::{debug, error, instrument, trace, warn};

use crate::{
	SourceWorkerConfig,
	machine::{Shared, SourceTask},
};

pub(crate) fn spawn(
	config: SourceWorkerConfig,
	shared: Arc<Shared>,
	tasks: Receiver<SourceTask>,
	events: Receiver<DeploymentEvent>,
	running: Arc<AtomicBool>,
) -> Result<JoinHandle<()>> {
	let recv_timeout = config.recv_timeout;
	thread::Builder::new()
		.name(config.thread_name)
		.spawn(move || {
			debug!("source worker started");
			worker_loop(&shared, &tasks, &events, &running, recv_timeout);
			debug!("source worker stopped");
		})
		.map_err(|err| Error::Internal(format!("failed to spawn source worker: {err}")))
}

fn worker_loop(
	shared: &Shared,
	tasks: &Receiver<SourceTask>,
	events: &Receiver<DeploymentEvent>,
	running: &AtomicBool,
	recv_timeout: Duration,
) {
	while running.load(Ordering::Acquire) {
		select! {
			recv(tasks) -> task => match task {
				Ok(SourceTask::Shutdown) | Err(_) => break,
				Ok(task) => shared.perform(task),
			},
			recv(events) -> event => match event {
				Ok(event) => shared.on_event(event),
				Err(_) => {
					error!("deployment events disconnected");
					break;
				}
			},
			default(recv_timeout) => {}
		}
	}
}

impl Shared {
	fn perform(&self, task: SourceTask) {
		match task {
			SourceTask::Load {
				source,
				replace,
			} => self.deploy_loader(source, replace),
			SourceTask::Remove {
				source,
			} => self.drop_artifacts(&source),
			SourceTask::Shutdown => {}
		}
	}

	#[instrument(name = "source::worker::deploy_loader", level = "debug", skip_all, fields(source = %source.name))]
	fn deploy_loader(&self, source: SourceDescriptor, replace: bool) {
		let name = source.name.clone();
		let result = {
			let _structural = self.locks.lock_structural();
			if replace {
				self.undeploy(&source_artifact_name(&name));
			}
			self.runtime.deploy(Artifact::Loader {
				source,
			})
		};

		if let Err(err) = result {
			error!(error = %err, "loader deploy failed");
			self.complete(&name, false, &err.to_string());
		}
	}

	fn on_event(&self, event: DeploymentEvent) {
		match source_of_loader(&event.name) {
			Some(source) => self.complete(source, event.success, &event.payload),
			None => trace!(artifact = %event.name, "ignoring event"),
		}
	}

	/// Moves a loading source to Active or Failed and swaps its artifacts.
	#[instrument(name = "source::worker::complete", level = "debug", skip(self, payload))]
	fn complete(&self, source: &str, success: bool, payload: &str) {
		{
			let _stripe = self.locks.lock_name(source);

			let descriptor = {
				let Some(mut entry) = self.entries.get_mut(source) else {
					warn!("completion for unknown source ignored");
					return;
				};
				if !entry.record.is_loading() {
					warn!(state = ?entry.record.state, "stale completion ignored");
					return;
				}
				if success {
					entry.record.state = SourceState::Active;
					entry.record.ddl = Some(payload.to_string());
				} else {
					entry.record.state = SourceState::Failed;
					entry.record.ddl = Some(failure_marker(payload));
				}
				entry.record.last_load = Some(SystemTime::now());
				entry.descriptor.clone()
			};

			let _structural = self.locks.lock_structural();
			self.undeploy(&loader_artifact_name(source));
			if success {
				let deployed = self.runtime.deploy(Artifact::Source {
					source: descriptor,
					ddl: payload.to_string(),
				});
				if let Err(err) = deployed {
					error!(error = %err, "source deploy failed");
					if let Some(mut entry) = self.entries.get_mut(source) {
						entry.record.state = SourceState::Failed;
						entry.record.ddl = Some(failure_marker(&err.to_string()));
					}
				}
			} else {
				self.undeploy(&source_artifact_name(source));
			}
		}

		debug!(success, "source load finished");
		self.refresh_base();
	}

	fn drop_artifacts(&self, source: &str) {
		{
			let _structural = self.locks.lock_structural();
			self.undeploy(&loader_artifact_name(source));
			self.undeploy(&source_artifact_name(source));
		}
		self.refresh_base();
	}

	/// Callers hold the structural lock.
	fn undeploy(&self, artifact: &str) {
		match self.runtime.undeploy(artifact) {
			Ok(removed) => trace!(artifact, removed, "undeployed"),
			Err(err) => warn!(artifact, error = %err, "undeploy failed"),
		}
	}

	fn refresh_base(&self) {
		let active = self.active_sources();
		if let Err(err) = self.base.invalidate_base(&active) {
			warn!(error = %err, "preview base refresh failed");
		}
	}
}
