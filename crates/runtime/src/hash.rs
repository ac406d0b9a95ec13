// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! xxHash3 hashing of names.

use xxhash_rust::xxh3::xxh3_64;

#[inline]
pub fn hash_name(name: &str) -> u64 {
	xxh3_64(name.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_name_is_stable() {
		assert_eq!(hash_name("dv1"), hash_name("dv1"));
		assert_ne!(hash_name("dv1"), hash_name("dv2"));
		assert_eq!(hash_name("dv1"), xxh3_64(b"dv1"));
	}
}
