//! Raw documentation-comment content as delivered by the front end.

use serde::{Deserialize, Serialize};

use super::{ReflectionId, SymbolId};

/// Target of an inline `{@link …}` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InlineTarget {
	/// A declaration inside the documented package.
	Declaration(ReflectionId),
	/// A symbol in another package.
	Symbol(SymbolId),
	/// An absolute URL, already resolved.
	Url(String),
}

/// One fragment of comment content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CommentPart {
	/// Plain markdown text.
	Text {
		/// The text.
		text: String,
	},
	/// A fenced or inline code span, kept verbatim.
	Code {
		/// The code, including its delimiters.
		text: String,
	},
	/// An inline tag such as `{@link Target display}`.
	InlineTag {
		/// Tag name including the `@`.
		tag: String,
		/// Display text.
		text: String,
		/// Link target, when the front end resolved one.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<InlineTarget>,
	},
}

impl CommentPart {
	/// Plain-text part constructor, convenient for generated content.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text { text: text.into() }
	}
}

/// One `@tag` block of a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTag {
	/// Tag name including the `@`.
	pub tag: String,
	/// Name argument, e.g. the parameter name of `@param x`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Block content.
	#[serde(default)]
	pub content: Vec<CommentPart>,
}

/// A parsed documentation comment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comment {
	/// Summary content preceding any block tags.
	#[serde(default)]
	pub summary: Vec<CommentPart>,
	/// Block tags in source order.
	#[serde(default)]
	pub block_tags: Vec<BlockTag>,
	/// Modifier tags such as `@alpha` or `@experimental`.
	#[serde(default)]
	pub modifier_tags: Vec<String>,
}

impl Comment {
	/// Whether the comment carries the given modifier tag.
	pub fn has_modifier(&self, tag: &str) -> bool {
		self.modifier_tags.iter().any(|t| t == tag)
	}

	/// First block with the given tag name.
	pub fn tag(&self, name: &str) -> Option<&BlockTag> {
		self.block_tags.iter().find(|t| t.tag == name)
	}

	/// All blocks with the given tag name, in source order.
	pub fn tags<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BlockTag> {
		self.block_tags.iter().filter(move |t| t.tag == name)
	}

	/// Short-form summary: the `@summary` tag when present, otherwise the
	/// first paragraph of the summary content.
	pub fn short_summary(&self) -> Vec<CommentPart> {
		if let Some(tag) = self.tag("@summary") {
			return tag.content.clone();
		}
		let mut parts = Vec::new();
		for part in &self.summary {
			match part {
				CommentPart::Text { text } => {
					if let Some(cut) = text.find("\n\n") {
						let head = &text[..cut];
						if !head.is_empty() {
							parts.push(CommentPart::text(head));
						}
						return parts;
					}
					parts.push(part.clone());
				}
				_ => parts.push(part.clone()),
			}
		}
		parts
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_summary_stops_at_first_blank_line() {
		let comment = Comment {
			summary: vec![
				CommentPart::text("First paragraph.\n\nSecond paragraph."),
				CommentPart::text("never reached"),
			],
			..Comment::default()
		};
		assert_eq!(
			comment.short_summary(),
			vec![CommentPart::text("First paragraph.")]
		);
	}

	#[test]
	fn summary_tag_takes_precedence() {
		let comment = Comment {
			summary: vec![CommentPart::text("long form")],
			block_tags: vec![BlockTag {
				tag: "@summary".into(),
				name: None,
				content: vec![CommentPart::text("short form")],
			}],
			..Comment::default()
		};
		assert_eq!(
			comment.short_summary(),
			vec![CommentPart::text("short form")]
		);
	}
}
