// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use parking_lot::{Mutex, MutexGuard};

use super::StripedLock;

/// Lock discipline shared by everything that talks to the deployment runtime.
///
/// Work on one name (a virtualization or a source) holds that name's stripe.
/// Every deploy or undeploy additionally holds the single structural lock,
/// which is always acquired after a stripe and never the other way around.
pub struct DeployLocks {
	striped: StripedLock,
	structural: Mutex<()>,
}

impl DeployLocks {
	pub fn new(stripes: usize) -> Self {
		Self {
			striped: StripedLock::new(stripes),
			structural: Mutex::new(()),
		}
	}

	pub fn lock_name(&self, name: &str) -> MutexGuard<'_, ()> {
		self.striped.lock(name)
	}

	pub fn lock_structural(&self) -> MutexGuard<'_, ()> {
		self.structural.lock()
	}

	pub fn striped(&self) -> &StripedLock {
		&self.striped
	}
}

impl Default for DeployLocks {
	fn default() -> Self {
		Self::new(super::DEFAULT_STRIPES)
	}
}
