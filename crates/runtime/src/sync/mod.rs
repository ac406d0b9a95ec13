// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod locks;
mod striped;

pub use locks::DeployLocks;
pub use striped::{DEFAULT_STRIPES, StripedLock};
