// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use dvirt_preview::PreviewConfig;
use dvirt_sub_source::SourceWorkerConfig;

#[derive(Debug, Clone, Default)]
pub struct VirtualizationConfig {
	pub preview: PreviewConfig,
	pub sources: SourceWorkerConfig,
}
