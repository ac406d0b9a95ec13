// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod builder;
mod config;
mod virtualizations;

pub use dvirt_compiler as compiler;
pub use dvirt_core as core;
pub use dvirt_core::{Error, ErrorKind, Result};
pub use dvirt_preview::PreviewConfig;
pub use dvirt_sub_source::SourceWorkerConfig;
pub use dvirt_sub_tracing::TracingBuilder;

pub use builder::VirtualizationBuilder;
pub use config::VirtualizationConfig;
pub use virtualizations::Virtualizations;
