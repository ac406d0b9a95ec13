// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A fixed pool of mutexes selected by hashing a name.
//!
//! The pool never grows, so the number of locks is independent of the number
//! of distinct names. Two names only contend when they hash to the same stripe.

use parking_lot::{Mutex, MutexGuard};

use crate::hash::hash_name;

pub const DEFAULT_STRIPES: usize = 32;

pub struct StripedLock {
	stripes: Box<[Mutex<()>]>,
}

impl StripedLock {
	pub fn new(stripes: usize) -> Self {
		let stripes = stripes.max(1);
		Self {
			stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.stripes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stripes.is_empty()
	}

	pub fn stripe_of(&self, name: &str) -> usize {
		(hash_name(name) % self.stripes.len() as u64) as usize
	}

	pub fn lock(&self, name: &str) -> MutexGuard<'_, ()> {
		self.stripes[self.stripe_of(name)].lock()
	}

	pub fn try_lock(&self, name: &str) -> Option<MutexGuard<'_, ()>> {
		self.stripes[self.stripe_of(name)].try_lock()
	}
}

impl Default for StripedLock {
	fn default() -> Self {
		Self::new(DEFAULT_STRIPES)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_stripe_is_stable_and_bounded() {
		let lock = StripedLock::new(8);
		for idx in 0..200 {
			let name = format!("virtualization-{idx}");
			let stripe = lock.stripe_of(&name);
			assert!(stripe < 8);
			assert_eq!(stripe, lock.stripe_of(&name));
		}
	}

	#[test]
	fn test_zero_stripes_is_clamped() {
		let lock = StripedLock::new(0);
		assert_eq!(lock.len(), 1);
		assert_eq!(lock.stripe_of("anything"), 0);
	}

	#[test]
	fn test_same_name_contends() {
		let lock = StripedLock::default();
		let _guard = lock.lock("dv1");
		assert!(lock.try_lock("dv1").is_none());
	}

	#[test]
	fn test_other_stripe_does_not_contend() {
		let lock = StripedLock::default();
		let first = "dv1";
		let other = (0..)
			.map(|idx| format!("dv-{idx}"))
			.find(|name| lock.stripe_of(name) != lock.stripe_of(first))
			.unwrap();

		let _guard = lock.lock(first);
		assert!(lock.try_lock(&other).is_some());
	}
}
