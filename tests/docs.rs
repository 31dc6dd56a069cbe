//! Integration tests for the structured doc-comment model.

use pretty_assertions::assert_eq;

use tydoc::docs::{Docs, Slug};
use tydoc::reflect::{
	BlockTag, Comment, CommentPart, DeclarationReflection, ParameterReflection,
	ReflectionFlags, ReflectionId, ReflectionKind, SignatureReflection, Type,
	TypeParameterReflection,
};

fn block_tag(tag: &str, name: Option<&str>, text: &str) -> BlockTag {
	BlockTag {
		tag: tag.to_string(),
		name: name.map(str::to_string),
		content: vec![CommentPart::text(text)],
	}
}

fn declaration_with(comment: Comment) -> DeclarationReflection {
	let mut declaration =
		DeclarationReflection::new(ReflectionId(1), "widget", ReflectionKind::Variable);
	declaration.comment = Some(comment);
	declaration
}

#[test]
fn example_only_comment_fills_nothing_else() {
	let comment = Comment {
		block_tags: vec![block_tag("@example", None, "makeWidget()")],
		..Comment::default()
	};
	let docs = Docs::of_declaration(&declaration_with(comment), false);

	assert_eq!(docs.warning, None);
	assert_eq!(docs.short_summary, None);
	assert_eq!(docs.summary, None);
	assert_eq!(docs.type_params, None);
	assert_eq!(docs.params, None);
	assert_eq!(docs.default_value, None);
	assert_eq!(docs.return_value, None);
	assert_eq!(docs.remarks, None);
	assert_eq!(docs.examples.len(), 1);

	let heading = docs.examples[0].heading.as_ref().expect("example heading");
	assert_eq!(heading.text.as_deref(), Some("Example"));
	assert_eq!(heading.depth, 3);
	assert_eq!(heading.slug, Slug::Auto);
}

#[test]
fn child_examples_keep_linkable_slugs_with_colon_suffix() {
	let comment = Comment {
		block_tags: vec![
			block_tag("@example", None, "first()"),
			block_tag("@example", None, "second()"),
		],
		..Comment::default()
	};
	let docs = Docs::of_declaration(&declaration_with(comment), true);

	assert_eq!(docs.examples.len(), 2);
	let first = docs.examples[0].heading.as_ref().expect("heading");
	assert_eq!(first.text.as_deref(), Some("Example 1:"));
	assert_eq!(first.depth, 5);
	assert_eq!(first.slug, Slug::Auto);
	let second = docs.examples[1].heading.as_ref().expect("heading");
	assert_eq!(second.text.as_deref(), Some("Example 2:"));
}

#[test]
fn deprecated_overrides_experimental_warning() {
	let comment = Comment {
		block_tags: vec![block_tag("@deprecated", None, "Use makeWidget instead.")],
		modifier_tags: vec!["@alpha".to_string()],
		..Comment::default()
	};
	let docs = Docs::of_declaration(&declaration_with(comment), false);
	let warning = docs.warning.expect("warning block");
	let heading = warning.heading.as_ref().expect("warning heading");
	assert_eq!(heading.text.as_deref(), Some("Deprecated"));
	assert_eq!(heading.slug, Slug::Suppressed);
	assert_eq!(warning.content(), "Use makeWidget instead.");
}

#[test]
fn experimental_warning_names_the_declaration_kind() {
	let comment = Comment {
		summary: vec![CommentPart::text("A widget.")],
		modifier_tags: vec!["@beta".to_string()],
		..Comment::default()
	};
	let mut interface =
		DeclarationReflection::new(ReflectionId(1), "Widget", ReflectionKind::Interface);
	interface.comment = Some(comment);
	let docs = Docs::of_declaration(&interface, false);
	let warning = docs.warning.expect("warning block");
	assert_eq!(
		warning.content(),
		"This interface is experimental and may change or be removed in future versions."
	);
}

#[test]
fn signature_params_merge_tags_and_parameters() {
	let comment = Comment {
		block_tags: vec![
			block_tag("@param", Some("input"), "The raw input."),
			block_tag("@returns", None, "The parsed value."),
		],
		..Comment::default()
	};
	let mut signature =
		SignatureReflection::new(ReflectionId(2), "parse", ReflectionKind::CallSignature);
	signature.comment = Some(comment);
	signature.type_params = vec![TypeParameterReflection {
		name: "T".to_string(),
		constraint: None,
		default: None,
		comment: None,
	}];
	signature.parameters = vec![ParameterReflection {
		name: "input".to_string(),
		flags: ReflectionFlags::empty(),
		ty: None,
		default_value: None,
		comment: None,
	}];
	let docs = Docs::of_signature(&signature, ReflectionKind::Function, false);

	let params = docs.params.expect("params group");
	// One block from the @param tag, one from the parameter list.
	assert_eq!(params.members.len(), 2);
	assert_eq!(
		params.head.heading.as_ref().and_then(|h| h.text.as_deref()),
		Some("Parameters")
	);
	let type_params = docs.type_params.expect("type params group");
	assert_eq!(type_params.members.len(), 1);

	let return_value = docs.return_value.expect("return block");
	assert_eq!(return_value.content(), "The parsed value.");
	assert_eq!(
		return_value
			.heading
			.as_ref()
			.and_then(|h| h.text.as_deref()),
		Some("Returns:")
	);
}

#[test]
fn reflection_passthrough_borrows_signature_docs() {
	let mut inner_signature =
		SignatureReflection::new(ReflectionId(3), "__type", ReflectionKind::CallSignature);
	inner_signature.parameters = vec![ParameterReflection {
		name: "count".to_string(),
		flags: ReflectionFlags::empty(),
		ty: None,
		default_value: None,
		comment: Some(Comment {
			summary: vec![CommentPart::text("How many.")],
			..Comment::default()
		}),
	}];
	inner_signature.comment = Some(Comment {
		block_tags: vec![block_tag("@returns", None, "A widget.")],
		..Comment::default()
	});
	let mut inner =
		DeclarationReflection::new(ReflectionId(4), "__type", ReflectionKind::TypeAlias);
	inner.signatures = vec![inner_signature];

	let mut variable =
		DeclarationReflection::new(ReflectionId(1), "makeWidget", ReflectionKind::Variable);
	variable.comment = Some(Comment {
		summary: vec![CommentPart::text("Widget factory.")],
		..Comment::default()
	});
	variable.ty = Some(Type::Reflection {
		declaration: Box::new(inner),
	});

	let docs = Docs::of_declaration(&variable, false);
	let params = docs.params.expect("borrowed params");
	assert_eq!(params.members.len(), 1);
	assert_eq!(params.members[0].content(), "How many.");
	assert_eq!(docs.return_value.expect("borrowed returns").content(), "A widget.");
}

#[test]
fn short_summary_stops_at_the_first_paragraph() {
	let comment = Comment {
		summary: vec![CommentPart::text("First sentence.\n\nSecond paragraph.")],
		..Comment::default()
	};
	let docs = Docs::of_declaration(&declaration_with(comment), false);
	assert_eq!(
		docs.short_summary.expect("short summary").content(),
		"First sentence."
	);
	assert_eq!(
		docs.summary.expect("summary").content(),
		"First sentence.\n\nSecond paragraph."
	);
}

#[test]
fn remarks_heading_differs_between_page_and_child() {
	let comment = || Comment {
		block_tags: vec![block_tag("@remarks", None, "Extra detail.")],
		..Comment::default()
	};
	let page = Docs::of_declaration(&declaration_with(comment()), false);
	let heading = page
		.remarks
		.as_ref()
		.and_then(|block| block.heading.as_ref())
		.expect("remarks heading");
	assert_eq!(heading.text.as_deref(), Some("Description"));
	assert_eq!(heading.depth, 2);

	let child = Docs::of_declaration(&declaration_with(comment()), true);
	assert_eq!(
		child.remarks.as_ref().and_then(|block| block.heading.clone()),
		None
	);
}
