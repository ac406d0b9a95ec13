// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod interface;
pub mod model;
pub mod naming;
pub mod path;

pub use dvirt_type::{Error, ErrorKind, ObjectKind, Result};
