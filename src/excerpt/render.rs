//! HTML rendering of excerpts with hyperlinked reference spans.
//!
//! Rendering tokenizes the excerpt through an external highlighter seam and
//! re-aligns the resolved reference spans against the highlighter's token
//! stream, splitting tokens at span boundaries so links never break styling.

use super::{Excerpt, ExcerptKind};

/// One highlighted token on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	/// Literal token text.
	pub content: String,
	/// Inline CSS, when the highlighter assigned any.
	pub style: Option<String>,
}

/// Syntax-highlighter seam.
///
/// Implementations tokenize the full synthetic source and return one token
/// vector per line, covering every character of the line in order.
pub trait Tokenizer {
	/// Tokenize `source` into styled tokens, line by line.
	fn tokenize(&self, source: &str) -> Vec<Vec<Token>>;
}

/// Fallback tokenizer: one unstyled token per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
	fn tokenize(&self, source: &str) -> Vec<Vec<Token>> {
		source
			.split('\n')
			.map(|line| {
				vec![Token {
					content: line.to_string(),
					style: None,
				}]
			})
			.collect()
	}
}

enum Node {
	Span {
		style: Option<String>,
		text: String,
	},
	Link {
		href: String,
		spans: Vec<(Option<String>, String)>,
	},
}

impl Excerpt {
	/// Render the excerpt as `<pre><code>` markup with one `span.line` per
	/// line and an `<a>` around every resolved reference.
	///
	/// Member and type excerpts are tokenized inside a synthetic shell so the
	/// highlighter sees valid syntax; the shell lines are dropped from the
	/// output.
	pub fn render(&self, tokenizer: &dyn Tokenizer) -> String {
		let (prefix, suffix) = match self.kind() {
			ExcerptKind::Normal => ("", ""),
			ExcerptKind::Type => ("type __$Type = ", ""),
			ExcerptKind::Member => ("class __$Class {", "}"),
		};
		let source = format!("{prefix}\n{}\n{suffix}", self.content());
		let lines = tokenizer.tokenize(&source);
		let references = self.references();

		let mut html = String::from("<pre class=\"tydoc-code\" tabindex=\"0\"><code>");
		let mut curr = 0usize;
		// Byte offset of the next token within `source`; the first kept line
		// starts after the shell line and its newline.
		let mut cursor = prefix.len() + 1;
		for (i, line) in lines.iter().enumerate() {
			if i == 0 || i + 1 == lines.len() {
				continue;
			}
			if i > 1 {
				html.push('\n');
			}
			let mut nodes: Vec<Node> = Vec::new();
			for token in line {
				let token_start = cursor;
				cursor += token.content.len();
				let offset = token_start - prefix.len() - 1;
				if curr < references.len() {
					let reference = references[curr];
					if offset + token.content.len() >= reference.end {
						curr += 1;
					}
					if offset < reference.end && offset + token.content.len() > reference.start {
						let start = reference.start.saturating_sub(offset);
						let end = (reference.end - offset).min(token.content.len());

						if start > 0 {
							nodes.push(Node::Span {
								style: token.style.clone(),
								text: token.content[..start].to_string(),
							});
						}
						let linked = (token.style.clone(), token.content[start..end].to_string());
						match nodes.last_mut() {
							Some(Node::Link { href, spans })
								if start == 0 && href.as_str() == reference.href =>
							{
								spans.push(linked);
							}
							_ => nodes.push(Node::Link {
								href: reference.href.to_string(),
								spans: vec![linked],
							}),
						}
						if end < token.content.len() {
							nodes.push(Node::Span {
								style: token.style.clone(),
								text: token.content[end..].to_string(),
							});
						}
						continue;
					}
				}
				nodes.push(Node::Span {
					style: token.style.clone(),
					text: token.content.clone(),
				});
			}
			cursor += 1;
			html.push_str("<span class=\"line\">");
			for node in &nodes {
				write_node(&mut html, node);
			}
			html.push_str("</span>");
		}
		html.push_str("</code></pre>");
		html
	}
}

fn write_node(html: &mut String, node: &Node) {
	match node {
		Node::Span { style, text } => write_span(html, style.as_deref(), text),
		Node::Link { href, spans } => {
			html.push_str("<a href=\"");
			html.push_str(&escape_html(href));
			html.push_str("\">");
			for (style, text) in spans {
				write_span(html, style.as_deref(), text);
			}
			html.push_str("</a>");
		}
	}
}

fn write_span(html: &mut String, style: Option<&str>, text: &str) {
	match style {
		Some(style) => {
			html.push_str("<span style=\"");
			html.push_str(&escape_html(style));
			html.push_str("\">");
		}
		None => html.push_str("<span>"),
	}
	html.push_str(&escape_html(text));
	html.push_str("</span>");
}

fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			_ => escaped.push(c),
		}
	}
	escaped
}
