// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	collections::HashMap,
	sync::atomic::{AtomicUsize, Ordering},
};

use dvirt_core::{Error, ObjectKind, Result, interface::VersionStore, model::ViewDefinition};
use parking_lot::RwLock;

/// Version store kept in memory. Every write advances the version.
#[derive(Default)]
pub struct InMemoryVersionStore {
	state: RwLock<HashMap<String, (u64, Vec<ViewDefinition>)>>,
	list_calls: AtomicUsize,
}

impl InMemoryVersionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the definitions and returns the new version.
	pub fn put(&self, virtualization: &str, defs: Vec<ViewDefinition>) -> u64 {
		let mut state = self.state.write();
		let entry = state.entry(virtualization.to_string()).or_insert((0, Vec::new()));
		entry.0 += 1;
		entry.1 = defs;
		entry.0
	}

	pub fn list_calls(&self) -> usize {
		self.list_calls.load(Ordering::SeqCst)
	}
}

impl VersionStore for InMemoryVersionStore {
	fn current_version(&self, virtualization: &str) -> Result<u64> {
		self.state
			.read()
			.get(virtualization)
			.map(|(version, _)| *version)
			.ok_or_else(|| Error::not_found(ObjectKind::Virtualization, virtualization))
	}

	fn list_view_definitions(&self, virtualization: &str) -> Result<Vec<ViewDefinition>> {
		self.list_calls.fetch_add(1, Ordering::SeqCst);
		self.state
			.read()
			.get(virtualization)
			.map(|(_, defs)| defs.clone())
			.ok_or_else(|| Error::not_found(ObjectKind::Virtualization, virtualization))
	}
}
