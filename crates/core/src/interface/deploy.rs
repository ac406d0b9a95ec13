// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt::Debug, sync::Arc};

use crossbeam_channel::Sender;

use crate::{
	Result,
	model::{CompiledImage, ImageMode, SourceDescriptor},
	naming,
};

pub trait ImageHandle: Send + Sync + Debug {
	fn name(&self) -> &str;

	fn is_loaded(&self) -> bool;

	fn validity_errors(&self) -> Vec<String>;
}

pub type Handle = Arc<dyn ImageHandle>;

/// Something the deployment runtime can load.
#[derive(Debug, Clone)]
pub enum Artifact {
	Image(Arc<CompiledImage>),
	/// Shared preview base importing every active source.
	Base {
		imports: Vec<String>,
	},
	/// Discovers the schema of a source asynchronously.
	Loader {
		source: SourceDescriptor,
	},
	/// A source with already discovered DDL.
	Source {
		source: SourceDescriptor,
		ddl: String,
	},
}

impl Artifact {
	pub fn name(&self) -> String {
		match self {
			Artifact::Image(image) => match image.mode {
				ImageMode::Preview => naming::preview_image_name(&image.name),
				ImageMode::Service => image.name.clone(),
			},
			Artifact::Base {
				..
			} => naming::PREVIEW_BASE.to_string(),
			Artifact::Loader {
				source,
			} => naming::loader_artifact_name(&source.name),
			Artifact::Source {
				source,
				..
			} => naming::source_artifact_name(&source.name),
		}
	}
}

/// Load completion reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
	pub name: String,
	pub success: bool,
	/// Discovered schema text on success, otherwise the error.
	pub payload: String,
}

impl DeploymentEvent {
	pub fn loaded(name: impl Into<String>, schema: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			success: true,
			payload: schema.into(),
		}
	}

	pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			success: false,
			payload: error.into(),
		}
	}
}

pub trait DeploymentRuntime: Send + Sync {
	/// Registers or replaces the artifact under its name.
	fn deploy(&self, artifact: Artifact) -> Result<Handle>;

	/// Returns whether something was deployed under the name.
	fn undeploy(&self, name: &str) -> Result<bool>;

	fn get_deployed(&self, name: &str) -> Option<Handle>;

	/// Completion events of asynchronous loads are sent to `events`.
	fn subscribe(&self, events: Sender<DeploymentEvent>);
}
