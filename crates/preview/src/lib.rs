// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Keeps the deployed preview image of every virtualization in step with its
//! authoritative version.
//!
//! Lookups of a current image take no lock. A stale or missing image is
//! rebuilt by exactly one caller per virtualization while the others wait on
//! the same stripe of [`DeployLocks`](dvirt_runtime::sync::DeployLocks).

mod base;
mod config;
mod coordinator;

pub use base::PreviewBase;
pub use config::PreviewConfig;
pub use coordinator::{PreviewCoordinator, PreviewImage};
