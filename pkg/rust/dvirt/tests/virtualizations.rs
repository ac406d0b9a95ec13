// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{sync::Arc, thread, time::Duration};

use dvirt::{
	ErrorKind, SourceWorkerConfig, VirtualizationBuilder, VirtualizationConfig, Virtualizations,
	core::{
		model::{CompiledImage, Privilege, RolePrivileges, SourceDescriptor, SourceState, StatusKind, ViewDefinition},
		naming::PREVIEW_BASE,
	},
};
use dvirt_runtime::sync::{DEFAULT_STRIPES, StripedLock};
use dvirt_testing::{CountingRuntime, InMemoryVersionStore, StaticSourceCatalog, util::wait::wait_for};

const CUSTOMER_DDL: &str = "CREATE FOREIGN TABLE customer (id integer, name string);";

struct Fixture {
	versions: Arc<InMemoryVersionStore>,
	runtime: Arc<CountingRuntime>,
	dv: Virtualizations,
}

fn fixture() -> Fixture {
	fixture_with(CountingRuntime::new())
}

fn fixture_with(runtime: CountingRuntime) -> Fixture {
	let versions = Arc::new(InMemoryVersionStore::new());
	let catalog = Arc::new(StaticSourceCatalog::new().with_source(SourceDescriptor::new("pg", "postgresql")));
	let runtime = Arc::new(runtime);
	let dv = VirtualizationBuilder::new(versions.clone(), catalog, runtime.clone())
		.with_config(VirtualizationConfig {
			sources: SourceWorkerConfig {
				recv_timeout: Duration::from_millis(10),
				..Default::default()
			},
			..Default::default()
		})
		.with_tracing(|t| t.with_filter("dvirt=debug"))
		.build()
		.unwrap();
	Fixture {
		versions,
		runtime,
		dv,
	}
}

/// Completes load number `load` of pg once its loader is deployed.
fn load_pg(f: &Fixture, load: usize, ddl: &str) {
	wait_for(|| f.runtime.deploy_count("pgconn-load") == load, "loader should be deployed");
	let bases = f.runtime.deploy_count(PREVIEW_BASE);
	f.runtime.complete_loader("pg", ddl);
	wait_for(|| f.runtime.deploy_count(PREVIEW_BASE) == bases + 1, "base should be redeployed");
}

fn customers() -> ViewDefinition {
	ViewDefinition::new("v1", "dv1", "Customers").with_source_paths(["connection=pg/table=customer"])
}

fn ready() -> Fixture {
	let f = fixture();
	assert_eq!(f.dv.register_source("pg").unwrap(), SourceState::Loading);
	load_pg(&f, 1, CUSTOMER_DDL);
	f.versions.put("dv1", vec![customers()]);
	f
}

fn image_of(f: &Fixture, artifact: &str) -> Arc<CompiledImage> {
	match f.runtime.deployed_artifact(artifact) {
		Some(dvirt::core::interface::Artifact::Image(image)) => image,
		other => panic!("no image deployed as {artifact}: {other:?}"),
	}
}

#[test]
fn test_preview_over_discovered_source() {
	let f = ready();

	let handle = f.dv.ensure_preview_image("dv1").unwrap();
	assert!(handle.is_loaded());

	let image = image_of(&f, "dv1-preview");
	assert_eq!(
		image.virtual_model,
		"CREATE VIEW Customers (id, name) AS SELECT id, name FROM pg.customer AS t1;\n"
	);
	assert_eq!(image.source_models[0].name, "pg");
	assert_eq!(image.source_models[0].mapping.as_ref().unwrap().translator, "postgresql");
}

#[test]
fn test_compile_view() {
	let f = ready();
	assert_eq!(
		f.dv.compile_view(&customers()).unwrap(),
		"CREATE VIEW Customers (id, name) AS SELECT id, name FROM pg.customer AS t1;"
	);

	let broken = ViewDefinition::new("v2", "dv1", "Broken").with_source_paths(["connection=mysql/table=t"]);
	assert_eq!(f.dv.compile_view(&broken).unwrap_err().kind(), ErrorKind::Compile);
}

#[test]
fn test_source_refresh_rebuilds_preview() {
	let f = ready();
	f.dv.ensure_preview_image("dv1").unwrap();
	assert_eq!(f.runtime.deploy_count("dv1-preview"), 1);

	assert_eq!(f.dv.refresh_source("pg").unwrap(), SourceState::Loading);
	load_pg(&f, 2, "CREATE FOREIGN TABLE customer (id integer, name string, email string);");

	f.dv.ensure_preview_image("dv1").unwrap();
	assert_eq!(f.runtime.deploy_count("dv1-preview"), 2);
	assert!(image_of(&f, "dv1-preview").virtual_model.contains("email"));
}

#[test]
fn test_deploys_never_overlap() {
	let f = fixture_with(CountingRuntime::new().with_deploy_delay(Duration::from_millis(20)));
	assert_eq!(f.dv.register_source("pg").unwrap(), SourceState::Loading);
	load_pg(&f, 1, CUSTOMER_DDL);

	let striped = StripedLock::new(DEFAULT_STRIPES);
	let mut names: Vec<String> = Vec::new();
	for i in 0..1000 {
		let name = format!("dv{i}");
		if names.iter().all(|n| striped.stripe_of(n) != striped.stripe_of(&name)) {
			names.push(name);
		}
		if names.len() == 4 {
			break;
		}
	}
	for name in &names {
		f.versions.put(
			name,
			vec![
				ViewDefinition::new("v1", name.as_str(), "Customers")
					.with_source_paths(["connection=pg/table=customer"]),
			],
		);
	}

	assert_eq!(f.dv.refresh_source("pg").unwrap(), SourceState::Loading);
	wait_for(|| f.runtime.deploy_count("pgconn-load") == 2, "loader should be deployed");
	let bases = f.runtime.deploy_count(PREVIEW_BASE);

	thread::scope(|s| {
		for name in &names {
			let dv = &f.dv;
			s.spawn(move || assert!(dv.ensure_preview_image(name).is_ok()));
		}
		f.runtime.complete_loader("pg", CUSTOMER_DDL);
	});
	wait_for(|| f.runtime.deploy_count("pgconn") == 2, "source artifact should be redeployed");
	wait_for(|| f.runtime.deploy_count(PREVIEW_BASE) > bases, "base should be redeployed");

	for name in &names {
		assert!(f.runtime.deploy_count(&format!("{name}-preview")) >= 1);
	}
	assert_eq!(f.runtime.max_concurrent_deploys(), 1);
}

#[test]
fn test_unknown_virtualization() {
	let f = ready();
	assert_eq!(f.dv.ensure_preview_image("nope").unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn test_publish_deploys_service_image() {
	let f = ready();
	let privileges = vec![
		RolePrivileges::new("analyst", "v1", &[Privilege::Select]),
		RolePrivileges::role_only("auditor"),
	];

	let image = f.dv.publish_image("dv1", &privileges).unwrap();
	assert_eq!(f.runtime.deploy_count("dv1"), 1);
	assert_eq!(image.grants.len(), 2);
	assert_eq!(image.grants[0].permissions[0].resource, "dv1.Customers");
	assert!(image.grants[1].permissions.is_empty());

	let json = f.dv.export_image(&image).unwrap();
	assert_eq!(CompiledImage::from_json(&json).unwrap(), *image);
}

#[test]
fn test_publish_requires_valid_preview() {
	let f = ready();
	f.dv.ensure_preview_image("dv1").unwrap();
	f.runtime.handle("dv1-preview").unwrap().set_validity_errors(vec!["Customers: bad".to_string()]);

	let err = f.dv.publish_image("dv1", &[]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Validation);
	assert_eq!(f.runtime.deploy_count("dv1"), 0);
}

#[test]
fn test_service_assembly_is_strict() {
	let f = ready();
	let defs = vec![customers(), ViewDefinition::new("v2", "dv1", "Later").with_user_ddl("nonsense").unparsable()];
	let err = f.dv.assemble_service_image("dv1", &defs, &[]).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Validation);
	assert!(err.to_string().contains("Later"));
}

#[test]
fn test_validate_needs_loaded_preview() {
	let f = ready();
	assert_eq!(f.dv.validate_view_definition(&customers()).unwrap().kind, StatusKind::Success);

	let broken = ViewDefinition::new("v2", "dv1", "Broken").with_source_paths(["connection=pg/table=missing"]);
	assert_eq!(f.dv.validate_view_definition(&broken).unwrap().kind, StatusKind::Error);

	f.runtime.handle("dv1-preview").unwrap().set_loaded(false);
	let err = f.dv.validate_view_definition(&customers()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
}

#[test]
fn test_view_listing() {
	let f = ready();
	f.versions.put(
		"dv1",
		vec![
			customers(),
			ViewDefinition::new("v2", "dv1", "Broken").with_source_paths(["connection=pg/table=missing"]),
			ViewDefinition::new("v3", "dv1", "Draft").incomplete(),
		],
	);

	let listing = f.dv.view_listing("dv1").unwrap();
	let valid: Vec<(&str, bool)> = listing.iter().map(|l| (l.name.as_str(), l.valid)).collect();
	assert_eq!(valid, vec![("Customers", true), ("Broken", false), ("Draft", false)]);
	assert!(listing[1].errors[0].contains("missing"));
}

#[test]
fn test_update_view_definition() {
	let f = ready();
	let outcome = f.dv.update_view_definition(None, customers()).unwrap();
	assert!(outcome.touched);
	assert!(outcome.definition.ddl.unwrap().contains("pg.customer"));
}

#[test]
fn test_source_operations() {
	let f = ready();
	assert_eq!(f.dv.source_status("pg").unwrap().state, SourceState::Active);
	assert_eq!(f.dv.source_statuses().len(), 1);
	assert_eq!(f.dv.register_source("oracle").unwrap_err().kind(), ErrorKind::NotFound);

	f.dv.remove_source("pg").unwrap();
	assert_eq!(f.dv.source_status("pg").unwrap_err().kind(), ErrorKind::NotFound);
	wait_for(|| f.runtime.undeploy_count("pgconn") == 1, "source artifact should be undeployed");

	f.dv.shutdown();
	assert_eq!(f.dv.register_source("pg").unwrap_err().kind(), ErrorKind::ServiceUnavailable);
}
