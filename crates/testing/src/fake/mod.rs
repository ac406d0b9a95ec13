// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod catalog;
mod runtime;
mod schema;
mod version;

pub use catalog::StaticSourceCatalog;
pub use runtime::{CountingRuntime, FakeHandle};
pub use schema::StaticSchemaFinder;
pub use version::InMemoryVersionStore;
