//! Integration tests for excerpt construction, the type unparser and HTML
//! rendering of reference spans.

use pretty_assertions::assert_eq;

use tydoc::excerpt::{Excerpt, ExcerptKind, ExcerptOptions, PlainTokenizer, Token, Tokenizer};
use tydoc::model::{DocModel, LinkResolver};
use tydoc::reflect::{
	DeclarationReflection, Literal, ParameterReflection, ReferenceTarget, ReflectionFlags,
	ReflectionId, ReflectionKind, SignatureReflection, SymbolId, Type,
};

fn intrinsic(name: &str) -> Type {
	Type::Intrinsic {
		name: name.to_string(),
	}
}

fn parameter(name: &str, ty: Type) -> ParameterReflection {
	ParameterReflection {
		name: name.to_string(),
		flags: ReflectionFlags::empty(),
		ty: Some(ty),
		default_value: None,
		comment: None,
	}
}

fn arrow(id: u64, param: &str, param_ty: Type, return_ty: Type) -> Type {
	let mut signature =
		SignatureReflection::new(ReflectionId(id), "__type", ReflectionKind::CallSignature);
	signature.parameters = vec![parameter(param, param_ty)];
	signature.ty = Some(return_ty);
	let mut declaration =
		DeclarationReflection::new(ReflectionId(id + 1), "__type", ReflectionKind::TypeAlias);
	declaration.signatures = vec![signature];
	Type::Reflection {
		declaration: Box::new(declaration),
	}
}

fn render_type(ty: &Type) -> String {
	Excerpt::of_type(ty, &ExcerptOptions::compact())
		.content()
		.to_string()
}

#[test]
fn union_orders_null_and_undefined_last() {
	let union = Type::Union {
		types: vec![
			intrinsic("undefined"),
			Type::Literal {
				value: Literal::Null,
			},
			intrinsic("string"),
			intrinsic("number"),
		],
	};
	assert_eq!(render_type(&union), "string | number | undefined | null");
}

#[test]
fn union_sort_is_stable_within_a_priority() {
	let union = Type::Union {
		types: vec![intrinsic("boolean"), intrinsic("string"), intrinsic("number")],
	};
	assert_eq!(render_type(&union), "boolean | string | number");
}

#[test]
fn union_wraps_inside_an_array_element() {
	let ty = Type::Array {
		element: Box::new(Type::Union {
			types: vec![intrinsic("string"), intrinsic("number")],
		}),
	};
	assert_eq!(render_type(&ty), "(string | number)[]");
}

#[test]
fn arrow_function_wraps_inside_an_array_element() {
	let ty = Type::Array {
		element: Box::new(arrow(1, "b", intrinsic("string"), intrinsic("number"))),
	};
	assert_eq!(render_type(&ty), "((b: string) => number)[]");
}

#[test]
fn type_operator_wraps_inside_an_array_element() {
	let ty = Type::Array {
		element: Box::new(Type::TypeOperatorCall {
			operator: tydoc::reflect::TypeOperator::KeyOf,
			target: Box::new(intrinsic("string")),
		}),
	};
	assert_eq!(render_type(&ty), "(keyof string)[]");
}

#[test]
fn literals_render_with_source_syntax() {
	assert_eq!(
		render_type(&Type::Literal {
			value: Literal::String("a\"b".to_string()),
		}),
		"\"a\\\"b\""
	);
	assert_eq!(
		render_type(&Type::Literal {
			value: Literal::BigInt("42".to_string()),
		}),
		"42n"
	);
	assert_eq!(
		render_type(&Type::Literal {
			value: Literal::Boolean(true),
		}),
		"true"
	);
	assert_eq!(
		render_type(&Type::Literal {
			value: Literal::Null,
		}),
		"null"
	);
}

#[test]
fn template_literals_and_tuples_render() {
	let template = Type::TemplateLiteral {
		head: "a".to_string(),
		tail: vec![(intrinsic("string"), "b".to_string())],
	};
	assert_eq!(render_type(&template), "`a${string}b`");

	let tuple = Type::Tuple {
		elements: vec![
			Type::NamedTupleMember {
				name: "x".to_string(),
				optional: false,
				element: Box::new(intrinsic("string")),
			},
			Type::Optional {
				element: Box::new(intrinsic("number")),
			},
		],
	};
	assert_eq!(render_type(&tuple), "[x: string, number?]");
}

fn object_with_members() -> Type {
	let mut property =
		DeclarationReflection::new(ReflectionId(10), "a", ReflectionKind::Property);
	property.ty = Some(intrinsic("string"));
	let mut method_sig =
		SignatureReflection::new(ReflectionId(11), "b", ReflectionKind::CallSignature);
	method_sig.ty = Some(intrinsic("void"));
	let mut method = DeclarationReflection::new(ReflectionId(12), "b", ReflectionKind::Method);
	method.signatures = vec![method_sig];
	let mut object =
		DeclarationReflection::new(ReflectionId(13), "__type", ReflectionKind::TypeAlias);
	object.children = vec![property, method];
	Type::Reflection {
		declaration: Box::new(object),
	}
}

#[test]
fn object_types_render_compact_and_spaced() {
	let object = object_with_members();
	assert_eq!(render_type(&object), "{ a: string; b(): void }");

	let spaced = Excerpt::of_type(&object, &ExcerptOptions::spaced());
	assert_eq!(spaced.content(), "{\n    a: string\n    b(): void\n}");
}

#[test]
fn empty_objects_and_collapsed_objects() {
	let empty = DeclarationReflection::new(ReflectionId(1), "__type", ReflectionKind::TypeAlias);
	let ty = Type::Reflection {
		declaration: Box::new(empty),
	};
	assert_eq!(render_type(&ty), "{}");

	let collapse = ExcerptOptions {
		collapse: true,
		..ExcerptOptions::compact()
	};
	assert_eq!(
		Excerpt::of_type(&object_with_members(), &collapse).content(),
		"{ /*...*/ }"
	);
	assert_eq!(Excerpt::of_type(&ty, &collapse).content(), "{}");
}

#[test]
fn multi_byte_space_units_truncate_by_character() {
	let options = ExcerptOptions {
		space: Some("あ".repeat(12)),
		..ExcerptOptions::compact()
	};
	let unit = "あ".repeat(10);
	assert_eq!(
		Excerpt::of_type(&object_with_members(), &options).content(),
		format!("{{\n{unit}a: string\n{unit}b(): void\n}}")
	);
}

#[test]
fn class_excerpt_with_type_params_and_extends() {
	let mut class = DeclarationReflection::new(ReflectionId(1), "Foo", ReflectionKind::Class);
	class.type_params = vec![tydoc::reflect::TypeParameterReflection {
		name: "T".to_string(),
		constraint: Some(intrinsic("string")),
		default: None,
		comment: None,
	}];
	class.extended_types = vec![Type::Reference {
		name: "Bar".to_string(),
		target: ReferenceTarget::None,
		type_args: Vec::new(),
	}];
	let excerpt = Excerpt::of(&class, &ExcerptOptions::compact()).expect("class excerpt");
	assert_eq!(
		excerpt.content(),
		"export class Foo<T extends string> extends Bar"
	);
	assert_eq!(excerpt.kind(), ExcerptKind::Normal);
}

#[test]
fn default_function_excerpt() {
	let mut signature =
		SignatureReflection::new(ReflectionId(2), "default", ReflectionKind::CallSignature);
	signature.ty = Some(intrinsic("void"));
	let function =
		DeclarationReflection::new(ReflectionId(1), "default", ReflectionKind::Function);
	let excerpt = Excerpt::of_signature(&function, &signature, &ExcerptOptions::compact())
		.expect("function excerpt");
	assert_eq!(excerpt.content(), "export default function (): void");
}

#[test]
fn const_variable_with_literal_initializer() {
	let mut variable = DeclarationReflection::new(ReflectionId(1), "X", ReflectionKind::Variable);
	variable.flags = ReflectionFlags::CONST;
	variable.ty = Some(Type::Literal {
		value: Literal::Number(1.0),
	});
	let excerpt = Excerpt::of(&variable, &ExcerptOptions::compact()).expect("variable excerpt");
	assert_eq!(excerpt.content(), "export const X = 1");
}

#[test]
fn properties_escape_non_identifier_names() {
	let mut property =
		DeclarationReflection::new(ReflectionId(1), "a-b", ReflectionKind::Property);
	property.flags = ReflectionFlags::OPTIONAL;
	property.ty = Some(intrinsic("string"));
	let excerpt = Excerpt::of(&property, &ExcerptOptions::compact()).expect("property excerpt");
	assert_eq!(excerpt.content(), "\"a-b\"?: string");
	assert_eq!(excerpt.kind(), ExcerptKind::Member);
}

fn external(name: &str) -> Type {
	Type::Reference {
		name: name.to_string(),
		target: ReferenceTarget::External(SymbolId {
			package: "other".to_string(),
			qualified_name: name.to_string(),
		}),
		type_args: Vec::new(),
	}
}

#[test]
fn rendered_references_become_links() {
	let mut excerpt = Excerpt::of_type(
		&Type::Array {
			element: Box::new(external("Foo")),
		},
		&ExcerptOptions::compact(),
	);
	let hook = |symbol: &SymbolId| Some(format!("https://docs.example/{}", symbol.qualified_name));
	let resolver = LinkResolver::new(&DocModel::default(), Some(&hook));
	excerpt.resolve(&resolver);

	let references = excerpt.references();
	assert_eq!(references.len(), 1);
	assert_eq!(references[0].href, "https://docs.example/Foo");

	let html = excerpt.render(&PlainTokenizer);
	assert_eq!(
		html,
		"<pre class=\"tydoc-code\" tabindex=\"0\"><code><span class=\"line\">\
		 <a href=\"https://docs.example/Foo\"><span>Foo</span></a><span>[]</span>\
		 </span></code></pre>"
	);
}

/// Splits every line into single-character tokens, worst case for span
/// alignment.
struct CharTokenizer;

impl Tokenizer for CharTokenizer {
	fn tokenize(&self, source: &str) -> Vec<Vec<Token>> {
		source
			.split('\n')
			.map(|line| {
				line.chars()
					.map(|c| Token {
						content: c.to_string(),
						style: None,
					})
					.collect()
			})
			.collect()
	}
}

#[test]
fn adjacent_link_tokens_merge_into_one_anchor() {
	let mut excerpt = Excerpt::of_type(&external("Ab"), &ExcerptOptions::compact());
	let hook = |_: &SymbolId| Some("/x/".to_string());
	let resolver = LinkResolver::new(&DocModel::default(), Some(&hook));
	excerpt.resolve(&resolver);

	let html = excerpt.render(&CharTokenizer);
	assert_eq!(
		html,
		"<pre class=\"tydoc-code\" tabindex=\"0\"><code><span class=\"line\">\
		 <a href=\"/x/\"><span>A</span><span>b</span></a>\
		 </span></code></pre>"
	);
}

#[test]
fn unresolved_references_render_as_plain_text() {
	let mut excerpt = Excerpt::of_type(&external("Gone"), &ExcerptOptions::compact());
	let resolver = LinkResolver::new(&DocModel::default(), None);
	excerpt.resolve(&resolver);

	assert!(excerpt.references().is_empty());
	assert_eq!(excerpt.content(), "Gone");
	let html = excerpt.render(&PlainTokenizer);
	assert!(html.contains("<span>Gone</span>"));
	assert!(!html.contains("<a "));
}
