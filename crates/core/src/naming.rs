// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Names under which artifacts are registered with the deployment runtime.

/// Shared base image every preview image imports.
pub const PREVIEW_BASE: &str = "Preview";

pub const PREVIEW_SUFFIX: &str = "-preview";
pub const SOURCE_SUFFIX: &str = "conn";
pub const LOADER_SUFFIX: &str = "-load";

pub fn preview_image_name(virtualization: &str) -> String {
	format!("{virtualization}{PREVIEW_SUFFIX}")
}

pub fn source_artifact_name(source: &str) -> String {
	format!("{source}{SOURCE_SUFFIX}")
}

pub fn loader_artifact_name(source: &str) -> String {
	format!("{source}{SOURCE_SUFFIX}{LOADER_SUFFIX}")
}

/// Maps a loader artifact name back to its source name.
pub fn source_of_loader(artifact: &str) -> Option<&str> {
	artifact.strip_suffix(LOADER_SUFFIX)?.strip_suffix(SOURCE_SUFFIX)
}

#[cfg(test)]
pub mod tests {
	use super::*;

	#[test]
	fn test_loader_name_maps_back_to_source() {
		let name = loader_artifact_name("pg");
		assert_eq!(name, "pgconn-load");
		assert_eq!(source_of_loader(&name), Some("pg"));
	}

	#[test]
	fn test_non_loader_names_are_ignored() {
		assert_eq!(source_of_loader("pgconn"), None);
		assert_eq!(source_of_loader("dv1-preview"), None);
		assert_eq!(source_of_loader("Preview"), None);
	}
}
