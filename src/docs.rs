//! Doc-comment model: structured documentation blocks with deferred
//! cross-references.
//!
//! Blocks are built once from the raw comment at model-build time and carry
//! pending reference tokens; `resolve` substitutes final hrefs during the
//! link-resolution pass. Empty blocks are omitted from the built [`Docs`].

use serde::{Deserialize, Serialize};

use crate::markdown;
use crate::model::resolver::LinkResolver;
use crate::reflect::{
	Comment, CommentPart, DeclarationReflection, InlineTarget, ParameterReflection, ReflectionId,
	ReflectionKind, SignatureReflection, SymbolId, Type, TypeParameterReflection,
};

/// Slug policy of a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slug {
	/// Allocate a slug from the page scope during the heading pass.
	Auto,
	/// Use a pre-assigned slug (entry ids, export pathnames).
	Fixed(String),
	/// No slug; the heading stays out of the page table of contents.
	Suppressed,
}

/// A heading descriptor attached to a node or docs block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
	/// Heading depth (1 = page title).
	pub depth: u8,
	/// Slug policy.
	pub slug: Slug,
	/// Display text; nodes fall back to their own name when unset.
	pub text: Option<String>,
	/// Whether the text renders in code formatting.
	pub code: bool,
}

impl Heading {
	/// Heading with an allocator-generated slug.
	pub fn auto(depth: u8) -> Self {
		Self {
			depth,
			slug: Slug::Auto,
			text: None,
			code: false,
		}
	}

	/// Heading with fixed text and a generated slug.
	pub fn titled(depth: u8, text: impl Into<String>) -> Self {
		Self {
			depth,
			slug: Slug::Auto,
			text: Some(text.into()),
			code: false,
		}
	}

	/// Heading with fixed text, kept out of the table of contents.
	pub fn suppressed(depth: u8, text: impl Into<String>) -> Self {
		Self {
			depth,
			slug: Slug::Suppressed,
			text: Some(text.into()),
			code: false,
		}
	}

	/// Heading with a pre-assigned slug.
	pub fn fixed(depth: u8, slug: impl Into<String>) -> Self {
		Self {
			depth,
			slug: Slug::Fixed(slug.into()),
			text: None,
			code: false,
		}
	}

	/// Mark the heading text as code-formatted.
	pub fn code(mut self) -> Self {
		self.code = true;
		self
	}
}

/// A reference recorded by symbol id, not yet resolved to a final URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeferredRef {
	/// A declaration inside this build, by numeric id.
	Declaration(ReflectionId),
	/// An external symbol, resolvable only via the caller-supplied hook.
	Symbol(SymbolId),
}

/// Lifecycle of one reference fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefState {
	/// Awaiting the link-resolution pass.
	Pending(DeferredRef),
	/// Resolved to a final href.
	Resolved(String),
	/// Resolution failed; the fragment renders as plain text.
	Unresolved,
}

impl RefState {
	/// Run the resolver over a pending state, exactly once per build.
	pub(crate) fn resolve_with(&mut self, resolver: &LinkResolver<'_>) {
		if let Self::Pending(deferred) = self {
			*self = match resolver.resolve(deferred) {
				Some(href) => Self::Resolved(href),
				None => Self::Unresolved,
			};
		}
	}

	/// The resolved href, if resolution succeeded.
	pub fn href(&self) -> Option<&str> {
		match self {
			Self::Resolved(href) => Some(href),
			_ => None,
		}
	}
}

/// An inline cross-reference inside a docs block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsReference {
	text: String,
	state: RefState,
}

impl DocsReference {
	/// Display text of the reference.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Current resolution state.
	pub fn state(&self) -> &RefState {
		&self.state
	}

	fn to_markdown(&self) -> String {
		match &self.state {
			RefState::Resolved(href) => {
				format!("[{}]({href})", escape_link_text(&self.text))
			}
			_ => self.text.clone(),
		}
	}
}

/// One fragment of a docs block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockPart {
	/// Literal markdown text.
	Text(String),
	/// A deferred cross-reference.
	Reference(DocsReference),
}

/// An ordered sequence of literal text and deferred references, with an
/// optional heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsBlock {
	parts: Vec<BlockPart>,
	/// Heading descriptor, when the block owns one.
	pub heading: Option<Heading>,
}

impl DocsBlock {
	/// Build a block from raw comment parts.
	///
	/// Inline tags other than `@link` are dropped; `@link` tags without a
	/// usable target degrade to their display text.
	pub fn new(content: &[CommentPart], heading: Option<Heading>) -> Self {
		let mut parts = Vec::new();
		for part in content {
			match part {
				CommentPart::Text { text } | CommentPart::Code { text } => {
					parts.push(BlockPart::Text(text.clone()));
				}
				CommentPart::InlineTag { tag, text, target } => {
					if tag == "@link" {
						let state = match target {
							Some(InlineTarget::Declaration(id)) => {
								RefState::Pending(DeferredRef::Declaration(*id))
							}
							Some(InlineTarget::Symbol(symbol)) => {
								RefState::Pending(DeferredRef::Symbol(symbol.clone()))
							}
							Some(InlineTarget::Url(url)) => RefState::Resolved(url.clone()),
							None => RefState::Unresolved,
						};
						parts.push(BlockPart::Reference(DocsReference {
							text: text.clone(),
							state,
						}));
					}
				}
			}
		}
		Self { parts, heading }
	}

	/// Block with no content and no heading.
	pub fn empty() -> Self {
		Self {
			parts: Vec::new(),
			heading: None,
		}
	}

	/// Whether the block has zero fragments.
	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	/// Fragments of this block, in order.
	pub fn parts(&self) -> &[BlockPart] {
		&self.parts
	}

	/// Concatenated markdown content. Resolved references render as links,
	/// everything else as plain text.
	pub fn content(&self) -> String {
		let mut result = String::new();
		for part in &self.parts {
			match part {
				BlockPart::Text(text) => result.push_str(text),
				BlockPart::Reference(reference) => result.push_str(&reference.to_markdown()),
			}
		}
		result
	}

	/// Resolve every pending reference fragment in place.
	pub fn resolve(&mut self, resolver: &LinkResolver<'_>) {
		for part in &mut self.parts {
			if let BlockPart::Reference(reference) = part {
				reference.state.resolve_with(resolver);
			}
		}
	}

	/// Render the block to embeddable HTML markup.
	///
	/// `inline` strips the wrapping paragraph, for single-line contexts such
	/// as sidebars and summaries.
	pub fn render(&self, inline: bool) -> String {
		let html = markdown::render(&self.content());
		if inline { markdown::unwrap_paragraph(&html) } else { html }
	}

	/// Copy this block's content under a different heading.
	pub fn copy_content(&self, heading: Option<Heading>) -> Self {
		Self {
			parts: self.parts.clone(),
			heading,
		}
	}
}

/// A named group of blocks (parameters, type parameters) with a group header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroup {
	/// Group header block (empty content, heading only).
	pub head: DocsBlock,
	/// One block per documented member.
	pub members: Vec<DocsBlock>,
}

/// Which docs field a visited block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	/// Deprecation or experimental warning.
	Warning,
	/// One-paragraph summary.
	ShortSummary,
	/// Full summary.
	Summary,
	/// Type-parameter group.
	TypeParams,
	/// Parameter group.
	Params,
	/// `@defaultValue` block.
	DefaultValue,
	/// `@returns` block.
	ReturnValue,
	/// `@remarks` block.
	Remarks,
	/// An `@example` block.
	Examples,
}

/// Parsed documentation attached to one declaration.
///
/// Optional fields are `None` whenever their source content was empty, so
/// template code can render exactly what exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Docs {
	/// Deprecation/experimental warning; deprecated wins when both apply.
	pub warning: Option<DocsBlock>,
	/// First-paragraph summary.
	pub short_summary: Option<DocsBlock>,
	/// Full summary.
	pub summary: Option<DocsBlock>,
	/// Documented type parameters.
	pub type_params: Option<BlockGroup>,
	/// Documented parameters.
	pub params: Option<BlockGroup>,
	/// `@defaultValue` content.
	pub default_value: Option<DocsBlock>,
	/// `@returns` content.
	pub return_value: Option<DocsBlock>,
	/// `@remarks` content.
	pub remarks: Option<DocsBlock>,
	/// `@example` blocks, in source order.
	pub examples: Vec<DocsBlock>,
}

impl Docs {
	/// Build docs for a non-signature declaration.
	///
	/// When the declaration's structural type embeds an inline object with
	/// exactly one signature, that signature's parameter, type-parameter and
	/// return docs are borrowed for display (reflection passthrough).
	pub fn of_declaration(declaration: &DeclarationReflection, is_child: bool) -> Self {
		Self::build(
			declaration.comment.as_ref(),
			declaration.kind,
			&declaration.type_params,
			None,
			declaration.ty.as_ref(),
			is_child,
		)
	}

	/// Build docs for one signature; `parent_kind` names the owning
	/// declaration's kind for generated warning text.
	pub fn of_signature(
		signature: &SignatureReflection,
		parent_kind: ReflectionKind,
		is_child: bool,
	) -> Self {
		Self::build(
			signature.comment.as_ref(),
			parent_kind,
			&signature.type_params,
			Some(&signature.parameters),
			None,
			is_child,
		)
	}

	fn build(
		comment: Option<&Comment>,
		kind: ReflectionKind,
		type_params: &[TypeParameterReflection],
		parameters: Option<&[ParameterReflection]>,
		passthrough: Option<&Type>,
		is_child: bool,
	) -> Self {
		let Some(comment) = comment else {
			return Self::default();
		};

		let mut warning = None;
		if comment.has_modifier("@alpha")
			|| comment.has_modifier("@beta")
			|| comment.has_modifier("@experimental")
		{
			let text = format!(
				"This {} is experimental and may change or be removed in future versions.",
				kind.singular_name()
			);
			warning = Some(DocsBlock::new(
				&[CommentPart::text(text)],
				Some(Heading::suppressed(5, "Experimental")),
			));
		}
		if let Some(deprecated) = comment.tag("@deprecated") {
			warning = Some(DocsBlock::new(
				&deprecated.content,
				Some(Heading::suppressed(5, "Deprecated")),
			));
		}

		let mut type_param_blocks = Vec::new();
		for tag in comment.tags("@typeParam") {
			if let Some(name) = &tag.name {
				type_param_blocks.push(DocsBlock::new(
					&tag.content,
					Some(Heading::suppressed(5, name.clone()).code()),
				));
			}
		}
		for type_param in type_params {
			type_param_blocks.push(param_block(&type_param.name, type_param.comment.as_ref()));
		}

		let mut param_blocks = Vec::new();
		for tag in comment.tags("@param") {
			if let Some(name) = &tag.name {
				param_blocks.push(DocsBlock::new(
					&tag.content,
					Some(Heading::suppressed(5, name.clone()).code()),
				));
			}
		}

		let returns_heading = || Some(Heading::suppressed(5, "Returns:"));
		let mut return_value = DocsBlock::new(
			comment
				.tag("@returns")
				.map(|tag| tag.content.as_slice())
				.unwrap_or_default(),
			returns_heading(),
		);

		if let Some(parameters) = parameters {
			for parameter in parameters {
				param_blocks.push(param_block(&parameter.name, parameter.comment.as_ref()));
			}
		} else if let Some(ty) = passthrough {
			ty.for_each_reflection(&mut |declaration| {
				if declaration.signature_count() != 1 {
					return;
				}
				for signature in declaration.all_signatures() {
					for type_param in &signature.type_params {
						type_param_blocks
							.push(param_block(&type_param.name, type_param.comment.as_ref()));
					}
					for parameter in &signature.parameters {
						param_blocks.push(param_block(&parameter.name, parameter.comment.as_ref()));
					}
					if let Some(sig_comment) = &signature.comment {
						if return_value.is_empty() {
							return_value = DocsBlock::new(
								sig_comment
									.tag("@returns")
									.map(|tag| tag.content.as_slice())
									.unwrap_or_default(),
								returns_heading(),
							);
						}
					}
				}
			});
		}

		// Child example anchors still get slugs so they stay independently
		// linkable; every other child block suppresses its slug.
		let example_depth = if is_child { 5 } else { 3 };
		let example_suffix = if is_child { ":" } else { "" };
		let mut examples: Vec<DocsBlock> = comment
			.tags("@example")
			.map(|tag| DocsBlock::new(&tag.content, None))
			.filter(|block| !block.is_empty())
			.collect();
		if examples.len() == 1 {
			examples[0].heading = Some(Heading::titled(
				example_depth,
				format!("Example{example_suffix}"),
			));
		} else {
			for (i, example) in examples.iter_mut().enumerate() {
				example.heading = Some(Heading::titled(
					example_depth,
					format!("Example {}{example_suffix}", i + 1),
				));
			}
		}

		let remarks_heading = if is_child {
			None
		} else {
			Some(Heading::titled(2, "Description"))
		};

		Self {
			warning,
			short_summary: non_empty(DocsBlock::new(&comment.short_summary(), None)),
			summary: non_empty(DocsBlock::new(&comment.summary, None)),
			type_params: block_group("Type Parameters", type_param_blocks),
			params: block_group("Parameters", param_blocks),
			default_value: non_empty(DocsBlock::new(
				comment
					.tag("@defaultValue")
					.map(|tag| tag.content.as_slice())
					.unwrap_or_default(),
				Some(Heading::suppressed(5, "Default:")),
			)),
			return_value: non_empty(return_value),
			remarks: non_empty(DocsBlock::new(
				comment
					.tag("@remarks")
					.map(|tag| tag.content.as_slice())
					.unwrap_or_default(),
				remarks_heading,
			)),
			examples,
		}
	}

	/// Visit every present block in the fixed canonical order: warning,
	/// short summary, summary, type parameters (head then members),
	/// parameters (head then members), default value, return value, remarks,
	/// examples. The heading pass walks this exact order to build the page
	/// table of contents.
	pub fn visit_blocks(&self, mut visitor: impl FnMut(&DocsBlock, BlockKind)) {
		if let Some(block) = &self.warning {
			visitor(block, BlockKind::Warning);
		}
		if let Some(block) = &self.short_summary {
			visitor(block, BlockKind::ShortSummary);
		}
		if let Some(block) = &self.summary {
			visitor(block, BlockKind::Summary);
		}
		if let Some(group) = &self.type_params {
			visitor(&group.head, BlockKind::TypeParams);
			for member in &group.members {
				visitor(member, BlockKind::TypeParams);
			}
		}
		if let Some(group) = &self.params {
			visitor(&group.head, BlockKind::Params);
			for member in &group.members {
				visitor(member, BlockKind::Params);
			}
		}
		if let Some(block) = &self.default_value {
			visitor(block, BlockKind::DefaultValue);
		}
		if let Some(block) = &self.return_value {
			visitor(block, BlockKind::ReturnValue);
		}
		if let Some(block) = &self.remarks {
			visitor(block, BlockKind::Remarks);
		}
		for example in &self.examples {
			visitor(example, BlockKind::Examples);
		}
	}

	/// Mutable variant of [`Docs::visit_blocks`], same canonical order.
	pub fn visit_blocks_mut(&mut self, mut visitor: impl FnMut(&mut DocsBlock, BlockKind)) {
		if let Some(block) = &mut self.warning {
			visitor(block, BlockKind::Warning);
		}
		if let Some(block) = &mut self.short_summary {
			visitor(block, BlockKind::ShortSummary);
		}
		if let Some(block) = &mut self.summary {
			visitor(block, BlockKind::Summary);
		}
		if let Some(group) = &mut self.type_params {
			visitor(&mut group.head, BlockKind::TypeParams);
			for member in &mut group.members {
				visitor(member, BlockKind::TypeParams);
			}
		}
		if let Some(group) = &mut self.params {
			visitor(&mut group.head, BlockKind::Params);
			for member in &mut group.members {
				visitor(member, BlockKind::Params);
			}
		}
		if let Some(block) = &mut self.default_value {
			visitor(block, BlockKind::DefaultValue);
		}
		if let Some(block) = &mut self.return_value {
			visitor(block, BlockKind::ReturnValue);
		}
		if let Some(block) = &mut self.remarks {
			visitor(block, BlockKind::Remarks);
		}
		for example in &mut self.examples {
			visitor(example, BlockKind::Examples);
		}
	}

	/// Resolve every contained block, exactly once per build.
	pub fn resolve(&mut self, resolver: &LinkResolver<'_>) {
		self.visit_blocks_mut(|block, _| block.resolve(resolver));
	}
}

fn param_block(name: &str, comment: Option<&Comment>) -> DocsBlock {
	DocsBlock::new(
		comment.map(|c| c.summary.as_slice()).unwrap_or_default(),
		Some(Heading::suppressed(5, name).code()),
	)
}

fn non_empty(block: DocsBlock) -> Option<DocsBlock> {
	if block.is_empty() { None } else { Some(block) }
}

fn block_group(title: &str, members: Vec<DocsBlock>) -> Option<BlockGroup> {
	let members: Vec<DocsBlock> = members.into_iter().filter(|b| !b.is_empty()).collect();
	if members.is_empty() {
		return None;
	}
	Some(BlockGroup {
		head: DocsBlock::new(&[], Some(Heading::suppressed(5, title))),
		members,
	})
}

/// Escape `[` and `]` so reference display text survives markdown rendering.
fn escape_link_text(text: &str) -> String {
	let text = text.trim();
	let mut result = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(ch) = chars.next() {
		match ch {
			'\\' => {
				result.push('\\');
				match chars.next() {
					Some(next) => result.push(next),
					None => result.push('\\'),
				}
			}
			'[' | ']' => {
				result.push('\\');
				result.push(ch);
			}
			_ => result.push(ch),
		}
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn link_text_escapes_brackets() {
		assert_eq!(escape_link_text("Array[0]"), "Array\\[0\\]");
		assert_eq!(escape_link_text("already \\[ok"), "already \\[ok");
		assert_eq!(escape_link_text("trailing\\"), "trailing\\\\");
	}
}
