// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod fake;
pub mod util;

pub use fake::{
	CountingRuntime, FakeHandle, InMemoryVersionStore, StaticSchemaFinder, StaticSourceCatalog,
};
