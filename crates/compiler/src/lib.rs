// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Compilation of view definitions and assembly of compiled images.
//!
//! Everything here is a pure function of its inputs and the answers of the
//! injected [`SchemaFinder`](dvirt_core::interface::SchemaFinder), so it can be
//! called from any thread without locking.

pub mod assemble;
pub mod editor;
mod resolve;
pub mod view;

pub use assemble::assemble_image;
pub use editor::{UpdateOutcome, apply_update, touches_on_delete, validate_definition};
pub use view::{compile_view, parse_user_ddl};
