// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Contracts of the collaborators this workspace depends on.

mod base;
mod deploy;
mod finder;
mod version;

pub use base::BaseInvalidator;
pub use deploy::{Artifact, DeploymentEvent, DeploymentRuntime, Handle, ImageHandle};
pub use finder::{SchemaFinder, SourceCatalog};
pub use version::VersionStore;
