//! Integration tests for the model builder, the heading pass and two-pass
//! link resolution.

use pretty_assertions::assert_eq;

use tydoc::model::{DocModel, ModelBuilder, NamedId, Release, TocEntry};
use tydoc::reflect::{
	Comment, CommentPart, DeclarationReflection, Literal, Project, ReferenceTarget,
	ReflectionFlags, ReflectionId, ReflectionKind, SignatureReflection, SourceRef, Type,
};
use tydoc::TydocError;

fn source(file: &str) -> SourceRef {
	SourceRef {
		file_name: file.to_string(),
		full_file_name: format!("/src/{file}"),
		line: 1,
		character: 0,
		url: None,
	}
}

fn module(id: u64, name: &str, children: Vec<DeclarationReflection>) -> DeclarationReflection {
	let mut module = DeclarationReflection::new(ReflectionId(id), name, ReflectionKind::Module);
	module.sources = vec![source(&format!("{name}.ts"))];
	module.children = children;
	module
}

fn project(modules: Vec<DeclarationReflection>) -> Project {
	Project {
		name: "pkg".to_string(),
		package_name: Some("pkg".to_string()),
		package_version: Some("1.2.3".to_string()),
		children: modules,
	}
}

fn variable(id: u64, name: &str) -> DeclarationReflection {
	let mut variable = DeclarationReflection::new(ReflectionId(id), name, ReflectionKind::Variable);
	variable.flags = ReflectionFlags::CONST;
	variable.ty = Some(Type::Literal {
		value: Literal::Number(1.0),
	});
	variable.sources = vec![source(&format!("{name}.ts"))];
	variable
}

fn reference(name: &str, id: u64) -> Type {
	Type::Reference {
		name: name.to_string(),
		target: ReferenceTarget::Internal {
			id: ReflectionId(id),
			type_param: false,
		},
		type_args: Vec::new(),
	}
}

fn find_export(model: &DocModel, name: &str) -> NamedId {
	let entry = &model[model.entries[0]];
	let data = entry.entry.as_ref().expect("entry data");
	*data
		.exports
		.items
		.iter()
		.find(|&&id| model[id].name == name)
		.unwrap_or_else(|| panic!("export {name} not found"))
}

#[test]
fn missing_package_name_is_an_error() {
	let mut project = project(vec![module(100, "index", vec![variable(1, "x")])]);
	project.package_name = None;
	let result = ModelBuilder::new().build(&project);
	assert!(matches!(result, Err(TydocError::MissingPackageName)));
}

#[test]
fn invalid_package_version_is_an_error() {
	let mut project = project(vec![module(100, "index", vec![variable(1, "x")])]);
	project.package_version = Some("not-a-version".to_string());
	let result = ModelBuilder::new().build(&project);
	assert!(matches!(result, Err(TydocError::InvalidPackageVersion(_))));
}

#[test]
fn modules_must_have_exactly_one_source() {
	let mut bad = module(100, "index", vec![variable(1, "x")]);
	bad.sources.clear();
	let result = ModelBuilder::new().build(&project(vec![bad]));
	match result {
		Err(TydocError::ModuleSources { module, found }) => {
			assert_eq!(module, "pkg");
			assert_eq!(found, 0);
		}
		other => panic!("expected ModuleSources error, got {other:?}"),
	}
}

#[test]
fn empty_modules_are_rejected() {
	let result = ModelBuilder::new().build(&project(vec![module(100, "extras", Vec::new())]));
	match result {
		Err(TydocError::EmptyModule(name)) => assert_eq!(name, "pkg/extras"),
		other => panic!("expected EmptyModule error, got {other:?}"),
	}
}

#[test]
fn non_module_children_are_skipped() {
	let model = ModelBuilder::new()
		.build(&project(vec![
			module(100, "index", vec![variable(1, "x")]),
			variable(2, "stray"),
		]))
		.expect("model");
	assert_eq!(model.entries.len(), 1);
}

/// `index` module exporting a forward-referencing alias and an interface
/// whose property points back at the alias.
fn circular_project() -> Project {
	let mut alias = DeclarationReflection::new(ReflectionId(3), "Size", ReflectionKind::TypeAlias);
	alias.ty = Some(reference("Widget", 1));
	alias.sources = vec![source("size.ts")];

	let mut property =
		DeclarationReflection::new(ReflectionId(2), "size", ReflectionKind::Property);
	property.ty = Some(reference("Size", 3));
	let mut interface =
		DeclarationReflection::new(ReflectionId(1), "Widget", ReflectionKind::Interface);
	interface.children = vec![property];
	interface.sources = vec![source("widget.ts")];

	project(vec![module(100, "index", vec![alias, interface])])
}

#[test]
fn exports_get_pages_anchors_and_toc() {
	let model = ModelBuilder::new().build(&circular_project()).expect("model");

	let entry = &model[model.entries[0]];
	assert_eq!(entry.href.as_deref(), Some("/"));
	assert_eq!(entry.name, "pkg");

	let widget = find_export(&model, "Widget");
	assert_eq!(model[widget].href.as_deref(), Some("/widget/"));

	let container = model[widget].declarations[0]
		.container
		.as_ref()
		.expect("interface container");
	let member = container.members.items[0];
	assert_eq!(model[member].name, "size");
	assert_eq!(model[member].href.as_deref(), Some("/widget/#size"));

	assert_eq!(
		model[widget].headings,
		vec![
			TocEntry {
				depth: 2,
				slug: "signature".to_string(),
				text: "Signature".to_string(),
			},
			TocEntry {
				depth: 2,
				slug: "members".to_string(),
				text: "Members".to_string(),
			},
			TocEntry {
				depth: 3,
				slug: "size".to_string(),
				text: "size".to_string(),
			},
		]
	);

	assert!(model.files.contains(&"/src/widget.ts".to_string()));
	assert!(model.files.contains(&"/src/size.ts".to_string()));
}

#[test]
fn circular_references_resolve_in_both_directions() {
	let model = ModelBuilder::new().build(&circular_project()).expect("model");

	// Forward: the alias is declared before the interface it references.
	let alias = find_export(&model, "Size");
	let references = model[alias].declarations[0].excerpt.references();
	assert_eq!(references.len(), 1);
	assert_eq!(references[0].href, "/widget/");

	// Backward: the interface's property points at the alias page.
	let widget = find_export(&model, "Widget");
	let container = model[widget].declarations[0]
		.container
		.as_ref()
		.expect("container");
	let member = container.members.items[0];
	let references = model[member].declarations[0].excerpt.references();
	assert_eq!(references.len(), 1);
	assert_eq!(references[0].href, "/size/");
}

#[test]
fn dangling_references_degrade_to_plain_text() {
	let mut alias =
		DeclarationReflection::new(ReflectionId(1), "Broken", ReflectionKind::TypeAlias);
	alias.ty = Some(reference("Missing", 999));
	alias.sources = vec![source("broken.ts")];
	let model = ModelBuilder::new()
		.build(&project(vec![module(100, "index", vec![alias])]))
		.expect("model");

	let broken = find_export(&model, "Broken");
	let excerpt = &model[broken].declarations[0].excerpt;
	assert!(excerpt.references().is_empty());
	assert!(excerpt.content().contains("Missing"));
}

#[test]
fn default_exports_document_the_entry_page() {
	let mut signature =
		SignatureReflection::new(ReflectionId(2), "default", ReflectionKind::CallSignature);
	signature.ty = Some(Type::Intrinsic {
		name: "void".to_string(),
	});
	signature.sources = vec![source("main.ts")];
	let mut function =
		DeclarationReflection::new(ReflectionId(1), "default", ReflectionKind::Function);
	function.signatures = vec![signature];

	let model = ModelBuilder::new()
		.build(&project(vec![module(100, "index", vec![function])]))
		.expect("model");

	let entry = &model[model.entries[0]];
	assert_eq!(entry.declarations.len(), 1);
	assert_eq!(entry.declarations[0].parent, model.entries[0]);
	let data = entry.entry.as_ref().expect("entry data");
	assert!(data.exports.items.is_empty());
	assert_eq!(
		entry.headings,
		vec![TocEntry {
			depth: 2,
			slug: "signature".to_string(),
			text: "Signature".to_string(),
		}]
	);
}

#[test]
fn mixed_kind_exports_get_kind_specific_headings() {
	let mut signature =
		SignatureReflection::new(ReflectionId(2), "thing", ReflectionKind::CallSignature);
	signature.ty = Some(Type::Intrinsic {
		name: "void".to_string(),
	});
	let mut function =
		DeclarationReflection::new(ReflectionId(1), "thing", ReflectionKind::Function);
	function.signatures = vec![signature];

	let model = ModelBuilder::new()
		.build(&project(vec![module(
			100,
			"index",
			vec![function, variable(3, "thing")],
		)]))
		.expect("model");

	let thing = find_export(&model, "thing");
	let texts: Vec<_> = model[thing]
		.declarations
		.iter()
		.map(|d| d.heading.text.clone())
		.collect();
	assert_eq!(
		texts,
		vec![
			Some("Function Signature".to_string()),
			Some("Variable Signature".to_string()),
		]
	);
}

#[test]
fn export_groups_partition_by_kind() {
	let interface = {
		let mut interface =
			DeclarationReflection::new(ReflectionId(1), "Widget", ReflectionKind::Interface);
		interface.sources = vec![source("widget.ts")];
		interface
	};
	let alias = {
		let mut alias =
			DeclarationReflection::new(ReflectionId(2), "Size", ReflectionKind::TypeAlias);
		alias.ty = Some(Type::Intrinsic {
			name: "number".to_string(),
		});
		alias
	};
	let model = ModelBuilder::new()
		.build(&project(vec![module(
			100,
			"index",
			vec![interface, alias, variable(3, "count")],
		)]))
		.expect("model");

	let entry = &model[model.entries[0]];
	let groups = &entry.entry.as_ref().expect("entry data").groups;
	let titles: Vec<_> = groups
		.iter()
		.map(|group| group.heading.text.clone())
		.collect();
	assert_eq!(
		titles,
		vec![
			Some("Interfaces:".to_string()),
			Some("Type Aliases:".to_string()),
			Some("Variables:".to_string()),
		]
	);
	for group in groups {
		assert_eq!(group.declarations.len(), 1);
	}
}

#[test]
fn release_info_reaches_exported_pages() {
	let model = ModelBuilder::new()
		.with_release_info(|version, package, entry| {
			Some(Release {
				name: format!("{package} v{version}"),
				url: Some(format!("/releases/{entry}")),
			})
		})
		.build(&project(vec![module(100, "index", vec![variable(1, "x")])]))
		.expect("model");

	let x = find_export(&model, "x");
	let release = model[x].release.as_ref().expect("release");
	assert_eq!(release.name, "pkg v1.2.3");
	assert_eq!(release.url.as_deref(), Some("/releases/index"));
}

#[test]
fn entry_docs_come_from_the_module_comment() {
	let mut module = module(100, "index", vec![variable(1, "x")]);
	module.comment = Some(Comment {
		summary: vec![CommentPart::text("The main entry point.")],
		..Comment::default()
	});
	let model = ModelBuilder::new()
		.build(&project(vec![module]))
		.expect("model");

	let entry = &model[model.entries[0]];
	let docs = entry
		.entry
		.as_ref()
		.and_then(|data| data.docs.as_ref())
		.expect("entry docs");
	assert_eq!(docs.content(), "The main entry point.");
}

#[test]
fn case_colliding_exports_get_distinct_pages() {
	let model = ModelBuilder::new()
		.build(&project(vec![module(
			100,
			"index",
			vec![variable(1, "Thing"), variable(2, "thing")],
		)]))
		.expect("model");

	let upper = find_export(&model, "Thing");
	let lower = find_export(&model, "thing");
	assert_eq!(model[upper].href.as_deref(), Some("/thing/"));
	assert_eq!(model[lower].href.as_deref(), Some("/thing-1/"));
}
