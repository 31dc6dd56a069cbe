//! Source-like excerpts for declarations and standalone types.
//!
//! An excerpt is literal text plus reference fragments recorded as character
//! spans into that text. References are deferred at construction and
//! substituted by the link-resolution pass; [`Excerpt::render`] then aligns
//! the spans against an external tokenizer's output to produce hyperlinked
//! markup.

mod render;
mod types;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use render::{PlainTokenizer, Token, Tokenizer};
pub(crate) use types::type_parts;
pub use types::{TypeContext, needs_parenthesis, union_priority};

use crate::docs::{DeferredRef, RefState};
use crate::error::{Result, TydocError};
use crate::model::resolver::LinkResolver;
use crate::reflect::{
	Comment, CommentPart, DeclarationReflection, InlineTarget, Literal, ReflectionFlags,
	ReflectionKind, SignatureReflection, Type, TypeParameterReflection,
};

/// Rendering options for one excerpt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcerptOptions {
	/// Indent unit; absent means compact single-line rendering with `; `
	/// separators. At most ten characters, newlines stripped.
	pub space: Option<String>,
	/// Current nesting depth, in indent units.
	pub indent: usize,
	/// Whether to inline doc comments into object-type excerpts.
	pub comments: bool,
	/// Whether to collapse object types to `{ /*...*/ }`.
	pub collapse: bool,
}

impl ExcerptOptions {
	/// Compact single-line rendering.
	pub fn compact() -> Self {
		Self::default()
	}

	/// Multi-line rendering with a four-space indent unit.
	pub fn spaced() -> Self {
		Self {
			space: Some("    ".to_string()),
			..Self::default()
		}
	}

	pub(crate) fn indented(&self) -> Self {
		let mut next = self.clone();
		next.indent += 1;
		next
	}
}

pub(crate) fn resolve_space(options: &ExcerptOptions) -> Option<String> {
	let space = options.space.as_ref()?;
	let unit: String = space.chars().filter(|c| *c != '\n').take(10).collect();
	if unit.is_empty() { None } else { Some(unit) }
}

/// One fragment of an excerpt under construction.
#[derive(Debug, Clone)]
pub(crate) enum Part {
	/// Literal text.
	Text(String),
	/// Text that refers to another declaration.
	Reference {
		/// Display text of the reference.
		text: String,
		/// Resolution state.
		state: RefState,
	},
}

impl Part {
	pub(crate) fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	pub(crate) fn pending(text: impl Into<String>, target: DeferredRef) -> Self {
		Self::Reference {
			text: text.into(),
			state: RefState::Pending(target),
		}
	}
}

/// Wrapping context for syntax highlighting of a rendered excerpt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExcerptKind {
	/// A complete declaration; tokenizes as-is.
	Normal,
	/// A standalone type; tokenizes inside a synthetic alias.
	Type,
	/// A container member; tokenizes inside a synthetic class body.
	Member,
}

/// A reference span into the excerpt's concatenated content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSpan {
	/// Start byte offset.
	pub start: usize,
	/// End byte offset (exclusive).
	pub end: usize,
	state: RefState,
}

impl ReferenceSpan {
	/// Current resolution state of this span.
	pub fn state(&self) -> &RefState {
		&self.state
	}
}

/// A resolved reference span, ready for hyperlinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedReference<'a> {
	/// Start byte offset.
	pub start: usize,
	/// End byte offset (exclusive).
	pub end: usize,
	/// Final href.
	pub href: &'a str,
}

/// Rendered textual representation of a declaration or standalone type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excerpt {
	content: String,
	spans: Vec<ReferenceSpan>,
	kind: ExcerptKind,
}

impl Excerpt {
	fn from_parts(parts: Vec<Part>, kind: ExcerptKind) -> Self {
		let mut content = String::new();
		let mut spans = Vec::new();
		for part in parts {
			match part {
				Part::Text(text) => content.push_str(&text),
				Part::Reference { text, state } => {
					spans.push(ReferenceSpan {
						start: content.len(),
						end: content.len() + text.len(),
						state,
					});
					content.push_str(&text);
				}
			}
		}
		Self {
			content,
			spans,
			kind,
		}
	}

	/// Concatenated plain text of the excerpt.
	pub fn content(&self) -> &str {
		&self.content
	}

	/// All reference spans, resolved or not.
	pub fn spans(&self) -> &[ReferenceSpan] {
		&self.spans
	}

	/// Wrapping context for highlighting.
	pub fn kind(&self) -> ExcerptKind {
		self.kind
	}

	/// Spans whose references resolved to an href.
	pub fn references(&self) -> Vec<ResolvedReference<'_>> {
		self.spans
			.iter()
			.filter_map(|span| {
				span.state.href().map(|href| ResolvedReference {
					start: span.start,
					end: span.end,
					href,
				})
			})
			.collect()
	}

	/// Resolve every pending reference span in place, exactly once per build.
	pub fn resolve(&mut self, resolver: &LinkResolver<'_>) {
		for span in &mut self.spans {
			span.state.resolve_with(resolver);
		}
	}

	/// Render a declaration excerpt, dispatching on its kind.
	pub fn of(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Result<Self> {
		match declaration.kind {
			ReflectionKind::Class => Ok(Self::of_class(declaration, options)),
			ReflectionKind::Interface => Ok(Self::of_interface(declaration, options)),
			ReflectionKind::TypeAlias => Ok(Self::of_type_alias(declaration, options)),
			ReflectionKind::Variable => Ok(Self::of_variable(declaration, options)),
			ReflectionKind::Property => Ok(Self::of_property(declaration, options)),
			kind => Err(TydocError::UnexpectedReflectionKind(kind)),
		}
	}

	/// Render a signature excerpt, dispatching on the owning declaration's kind.
	pub fn of_signature(
		parent: &DeclarationReflection,
		signature: &SignatureReflection,
		options: &ExcerptOptions,
	) -> Result<Self> {
		match parent.kind {
			ReflectionKind::Function => Ok(Self::of_function(signature, options)),
			ReflectionKind::Method | ReflectionKind::Accessor | ReflectionKind::Constructor => {
				Ok(Self::of_member_signature(parent, signature, options))
			}
			ReflectionKind::Class | ReflectionKind::Interface => match signature.kind {
				ReflectionKind::CallSignature => {
					let mut parts = indent_parts(options);
					call_signature_parts(signature, options, Some(": "), true, &mut parts);
					Ok(Self::from_parts(parts, ExcerptKind::Member))
				}
				ReflectionKind::IndexSignature => {
					let mut parts = indent_parts(options);
					index_signature_parts(signature, options, &mut parts);
					Ok(Self::from_parts(parts, ExcerptKind::Member))
				}
				kind => Err(TydocError::UnexpectedSignatureKind {
					signature: kind,
					parent: parent.kind,
				}),
			},
			kind => Err(TydocError::UnexpectedSignatureKind {
				signature: signature.kind,
				parent: kind,
			}),
		}
	}

	/// Render a standalone structural type.
	pub fn of_type(ty: &Type, options: &ExcerptOptions) -> Self {
		let mut parts = Vec::new();
		type_parts(ty, TypeContext::None, options, &mut parts);
		Self::from_parts(parts, ExcerptKind::Type)
	}

	fn of_class(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		parts.push(Part::text("export "));
		if declaration.flags.contains(ReflectionFlags::ABSTRACT) {
			parts.push(Part::text("abstract "));
		}
		if declaration.name == "default" {
			parts.push(Part::text("default class"));
		} else {
			parts.push(Part::text("class "));
			parts.push(Part::text(declaration.name.clone()));
		}
		type_parameter_parts(&declaration.type_params, options, &mut parts);
		type_list_parts(&declaration.extended_types, options, "extends", &mut parts);
		type_list_parts(&declaration.implemented_types, options, "implements", &mut parts);
		Self::from_parts(parts, ExcerptKind::Normal)
	}

	fn of_interface(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		parts.push(Part::text("export "));
		if declaration.name == "default" {
			parts.push(Part::text("default interface"));
		} else {
			parts.push(Part::text("interface "));
			parts.push(Part::text(declaration.name.clone()));
		}
		type_parameter_parts(&declaration.type_params, options, &mut parts);
		type_list_parts(&declaration.extended_types, options, "extends", &mut parts);
		Self::from_parts(parts, ExcerptKind::Normal)
	}

	fn of_type_alias(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		parts.push(Part::text("export "));
		if declaration.name == "default" {
			parts.push(Part::text("default type"));
		} else {
			parts.push(Part::text("type "));
			parts.push(Part::text(declaration.name.clone()));
		}
		type_parameter_parts(&declaration.type_params, options, &mut parts);
		parts.push(Part::text(" = "));
		match &declaration.ty {
			Some(ty) => type_parts(ty, TypeContext::None, options, &mut parts),
			None => parts.push(Part::text("unknown")),
		}
		Self::from_parts(parts, ExcerptKind::Normal)
	}

	fn of_function(signature: &SignatureReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		parts.push(Part::text("export "));
		if signature.name == "default" {
			parts.push(Part::text("default function "));
		} else {
			parts.push(Part::text("function "));
			parts.push(Part::text(signature.name.clone()));
		}
		call_signature_parts(signature, options, Some(": "), true, &mut parts);
		Self::from_parts(parts, ExcerptKind::Normal)
	}

	fn of_variable(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		parts.push(Part::text("export "));
		if declaration.name == "default" {
			parts.push(Part::text("default "));
		} else {
			if declaration.flags.contains(ReflectionFlags::CONST) {
				parts.push(Part::text("const "));
			} else {
				parts.push(Part::text("let "));
			}
			parts.push(Part::text(declaration.name.clone()));
			if is_initializer_literal(declaration.ty.as_ref()) {
				parts.push(Part::text(" = "));
			} else {
				parts.push(Part::text(": "));
			}
		}
		match &declaration.ty {
			Some(ty) => type_parts(ty, TypeContext::None, options, &mut parts),
			None => parts.push(Part::text("unknown")),
		}
		Self::from_parts(parts, ExcerptKind::Normal)
	}

	fn of_property(declaration: &DeclarationReflection, options: &ExcerptOptions) -> Self {
		let mut parts = indent_parts(options);
		property_parts(declaration, options, &mut parts);
		Self::from_parts(parts, ExcerptKind::Member)
	}

	fn of_member_signature(
		parent: &DeclarationReflection,
		signature: &SignatureReflection,
		options: &ExcerptOptions,
	) -> Self {
		let mut parts = indent_parts(options);
		member_signature_parts(parent, signature, options, &mut parts);
		Self::from_parts(parts, ExcerptKind::Member)
	}
}

fn is_initializer_literal(ty: Option<&Type>) -> bool {
	matches!(
		ty,
		Some(Type::Literal { value }) if !matches!(value, Literal::Null)
	)
}

fn indent_parts(options: &ExcerptOptions) -> Vec<Part> {
	let mut parts = Vec::new();
	if let Some(space) = resolve_space(options) {
		let prefix = space.repeat(options.indent);
		if !prefix.is_empty() {
			parts.push(Part::text(prefix));
		}
	}
	parts
}

pub(crate) fn escape_string(value: &str) -> String {
	serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

static IDENTIFIER: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

pub(crate) fn escape_member_name(name: &str, escaped_name: Option<&str>) -> String {
	let mut name = name;
	if let Some(escaped) = escaped_name {
		if let Some(rest) = escaped.strip_prefix("__") {
			if rest.starts_with('_') {
				// A tripled underscore escapes a genuine double-underscore name.
				name = &escaped[1..];
			} else {
				return name.to_string();
			}
		}
	}
	if IDENTIFIER.is_match(name) {
		return name.to_string();
	}
	// Unescaped numbers would be valid syntax too, but they are cast to
	// string keys anyway, which is only confusing.
	escape_string(name)
}

pub(crate) fn call_signature_parts(
	signature: &SignatureReflection,
	options: &ExcerptOptions,
	sep: Option<&str>,
	type_params: bool,
	out: &mut Vec<Part>,
) {
	if type_params {
		type_parameter_parts(&signature.type_params, options, out);
	}
	out.push(Part::text("("));
	for (i, parameter) in signature.parameters.iter().enumerate() {
		modifier_flags_parts(parameter.flags, out);
		out.push(Part::text(parameter.name.clone()));
		if parameter.flags.contains(ReflectionFlags::OPTIONAL) {
			out.push(Part::text("?"));
		}
		out.push(Part::text(": "));
		match &parameter.ty {
			Some(ty) => type_parts(ty, TypeContext::None, options, out),
			None => out.push(Part::text("unknown")),
		}
		if let Some(default_value) = &parameter.default_value {
			out.push(Part::text(" = "));
			out.push(Part::text(default_value.clone()));
		}
		if i + 1 < signature.parameters.len() {
			out.push(Part::text(", "));
		}
	}
	out.push(Part::text(")"));
	if let Some(sep) = sep {
		out.push(Part::text(sep));
		match &signature.ty {
			Some(ty) => type_parts(ty, TypeContext::None, options, out),
			None => out.push(Part::text("unknown")),
		}
	}
}

pub(crate) fn index_signature_parts(
	signature: &SignatureReflection,
	options: &ExcerptOptions,
	out: &mut Vec<Part>,
) {
	let [parameter] = signature.parameters.as_slice() else {
		return;
	};
	out.push(Part::text("["));
	out.push(Part::text(parameter.name.clone()));
	out.push(Part::text(": "));
	match &parameter.ty {
		Some(ty) => type_parts(ty, TypeContext::None, options, out),
		None => out.push(Part::text("unknown")),
	}
	out.push(Part::text("]: "));
	match &signature.ty {
		Some(ty) => type_parts(ty, TypeContext::None, options, out),
		None => out.push(Part::text("unknown")),
	}
}

pub(crate) fn type_parameter_parts(
	type_params: &[TypeParameterReflection],
	options: &ExcerptOptions,
	out: &mut Vec<Part>,
) {
	if type_params.is_empty() {
		return;
	}
	out.push(Part::text("<"));
	for (i, type_param) in type_params.iter().enumerate() {
		if i > 0 {
			out.push(Part::text(", "));
		}
		out.push(Part::text(type_param.name.clone()));
		if let Some(constraint) = &type_param.constraint {
			out.push(Part::text(" extends "));
			type_parts(constraint, TypeContext::ReferenceTypeArg, options, out);
		}
		if let Some(default) = &type_param.default {
			out.push(Part::text(" = "));
			type_parts(default, TypeContext::ReferenceTypeArg, options, out);
		}
	}
	out.push(Part::text(">"));
}

pub(crate) fn modifier_flags_parts(flags: ReflectionFlags, out: &mut Vec<Part>) {
	if flags.contains(ReflectionFlags::PUBLIC) {
		out.push(Part::text("public "));
	} else if flags.contains(ReflectionFlags::PROTECTED) {
		out.push(Part::text("protected "));
	} else if flags.contains(ReflectionFlags::PRIVATE) {
		out.push(Part::text("private "));
	}
	if flags.contains(ReflectionFlags::STATIC) {
		out.push(Part::text("static "));
	} else if flags.contains(ReflectionFlags::ABSTRACT) {
		out.push(Part::text("abstract "));
	}
	if flags.contains(ReflectionFlags::READONLY) {
		out.push(Part::text("readonly "));
	}
	if flags.contains(ReflectionFlags::REST) {
		out.push(Part::text("..."));
	}
}

pub(crate) fn member_signature_parts(
	parent: &DeclarationReflection,
	signature: &SignatureReflection,
	options: &ExcerptOptions,
	out: &mut Vec<Part>,
) {
	modifier_flags_parts(parent.flags, out);
	let name = escape_member_name(&parent.name, parent.escaped_name.as_deref());
	let mut sep = Some(": ");
	let mut type_params = true;
	match signature.kind {
		ReflectionKind::ConstructorSignature => {
			if parent.kind == ReflectionKind::Constructor {
				out.push(Part::text("constructor"));
				type_params = false;
				sep = None;
			} else {
				out.push(Part::text("new "));
			}
		}
		ReflectionKind::GetSignature => {
			out.push(Part::text("get "));
			out.push(Part::text(name));
		}
		ReflectionKind::SetSignature => {
			out.push(Part::text("set "));
			out.push(Part::text(name));
			sep = None;
		}
		_ => out.push(Part::text(name)),
	}
	call_signature_parts(signature, options, sep, type_params, out);
}

pub(crate) fn property_parts(
	declaration: &DeclarationReflection,
	options: &ExcerptOptions,
	out: &mut Vec<Part>,
) {
	modifier_flags_parts(declaration.flags, out);
	out.push(Part::text(escape_member_name(
		&declaration.name,
		declaration.escaped_name.as_deref(),
	)));
	if declaration.flags.contains(ReflectionFlags::OPTIONAL) {
		out.push(Part::text("?: "));
	} else {
		out.push(Part::text(": "));
	}
	match &declaration.ty {
		Some(ty) => type_parts(ty, TypeContext::None, options, out),
		None => out.push(Part::text("unknown")),
	}
}

fn type_list_parts(types: &[Type], options: &ExcerptOptions, keyword: &str, out: &mut Vec<Part>) {
	if types.is_empty() {
		return;
	}
	out.push(Part::text(format!(" {keyword} ")));
	for (i, ty) in types.iter().enumerate() {
		if i > 0 {
			out.push(Part::text(", "));
		}
		type_parts(ty, TypeContext::None, options, out);
	}
}

/// Inline a doc comment into an object-type excerpt, one `* `-prefixed line
/// per source line.
pub(crate) fn comment_parts(comment: &Comment, line_sep: &str, out: &mut Vec<Part>) {
	let mut raw: Vec<Part> = Vec::new();
	comment_content_parts(&comment.summary, &mut raw);
	for block in &comment.block_tags {
		if !raw.is_empty() {
			raw.push(Part::text("\n\n"));
		}
		raw.push(Part::text(block.tag.clone()));
		raw.push(Part::text("\n"));
		comment_content_parts(&block.content, &mut raw);
	}
	if !comment.modifier_tags.is_empty() {
		if !raw.is_empty() {
			raw.push(Part::text("\n\n"));
		}
		raw.push(Part::text(comment.modifier_tags.join(" ")));
	}
	replace_line_breaks(raw, line_sep, out);
}

fn comment_content_parts(content: &[CommentPart], out: &mut Vec<Part>) {
	for part in content {
		match part {
			CommentPart::Text { text } | CommentPart::Code { text } => {
				out.push(Part::text(text.clone()));
			}
			CommentPart::InlineTag { tag, text, target } => {
				if tag == "@link" {
					match target {
						Some(InlineTarget::Declaration(id)) => {
							out.push(Part::pending(text.clone(), DeferredRef::Declaration(*id)));
						}
						Some(InlineTarget::Symbol(symbol)) => {
							out.push(Part::pending(text.clone(), DeferredRef::Symbol(symbol.clone())));
						}
						Some(InlineTarget::Url(url)) => out.push(Part::Reference {
							text: text.clone(),
							state: RefState::Resolved(url.clone()),
						}),
						None => out.push(Part::text(text.clone())),
					}
				} else {
					out.push(Part::text(format!("{{{tag} {text}}}")));
				}
			}
		}
	}
}

fn replace_line_breaks(parts: Vec<Part>, sep: &str, out: &mut Vec<Part>) {
	for part in parts {
		match part {
			Part::Text(text) => {
				for (i, segment) in text.split('\n').enumerate() {
					if i > 0 {
						out.push(Part::text(sep));
					}
					if !segment.is_empty() {
						out.push(Part::text(segment));
					}
				}
			}
			Part::Reference { text, state } => {
				let mut segments = text.split('\n');
				if let Some(first) = segments.next() {
					if !first.is_empty() {
						out.push(Part::Reference {
							text: first.to_string(),
							state: state.clone(),
						});
					}
				}
				for segment in segments {
					out.push(Part::text(sep));
					if !segment.is_empty() {
						out.push(Part::Reference {
							text: segment.to_string(),
							state: state.clone(),
						});
					}
				}
			}
		}
	}
}
