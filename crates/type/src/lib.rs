// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod error;

pub use error::{Error, ErrorKind, ObjectKind};

pub type Result<T> = std::result::Result<T, Error>;
