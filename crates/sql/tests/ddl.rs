// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fs, path::Path};

use dvirt_sql::parse;
use test_each_file::test_each_path;

test_each_path! { in "crates/sql/tests/scripts/accept" as accept => run_accept }
test_each_path! { in "crates/sql/tests/scripts/reject" as reject => run_reject }

fn run_accept(path: &Path) {
	let text = fs::read_to_string(path).expect("read script");
	let ddl = parse(&text).unwrap_or_else(|e| panic!("{} should parse: {e}", path.display()));
	assert!(!ddl.objects.is_empty(), "{} defines nothing", path.display());
}

fn run_reject(path: &Path) {
	let text = fs::read_to_string(path).expect("read script");
	assert!(parse(&text).is_err(), "{} should not parse", path.display());
}
