//! Markdown glue for docs-block rendering.
//!
//! Thin wrapper over `pulldown-cmark`; the host site owns the real rendering
//! pipeline, this exists so block content can be previewed and embedded
//! without it.

use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
	Options::ENABLE_TABLES
		| Options::ENABLE_STRIKETHROUGH
		| Options::ENABLE_FOOTNOTES
		| Options::ENABLE_TASKLISTS
		| Options::ENABLE_SMART_PUNCTUATION
}

/// Render markdown to HTML with GitHub-flavored extensions enabled.
pub fn render(source: &str) -> String {
	let parser = Parser::new_ext(source, options());
	let mut out = String::with_capacity(source.len() * 2);
	html::push_html(&mut out, parser);
	out
}

/// Strip a single wrapping `<p>` element, for inline embedding contexts.
pub fn unwrap_paragraph(html: &str) -> String {
	let trimmed = html.trim();
	if let Some(inner) = trimmed
		.strip_prefix("<p>")
		.and_then(|rest| rest.strip_suffix("</p>"))
	{
		// Only unwrap when the paragraph spans the whole fragment.
		if !inner.contains("<p>") {
			return inner.to_string();
		}
	}
	trimmed.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_basic_markdown() {
		let html = render("some *emphasis* here");
		assert_eq!(html.trim(), "<p>some <em>emphasis</em> here</p>");
	}

	#[test]
	fn inline_mode_strips_single_paragraph() {
		assert_eq!(
			unwrap_paragraph("<p>a <code>b</code></p>\n"),
			"a <code>b</code>"
		);
	}

	#[test]
	fn inline_mode_keeps_multiple_paragraphs() {
		let html = "<p>one</p>\n<p>two</p>";
		assert_eq!(unwrap_paragraph(html), html);
	}
}
