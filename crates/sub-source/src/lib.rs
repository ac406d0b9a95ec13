// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Tracks the schema discovery of every registered source.
//!
//! State transitions happen on the calling thread under the source's stripe.
//! Deploys, undeploys and the handling of load completions run on a single
//! worker thread, so work for one source never interleaves.

mod config;
mod finder;
mod machine;
mod worker;

pub use config::SourceWorkerConfig;
pub use machine::SourceLoadMachine;
