//! Page-scope heading pass: allocates slugs, builds the table of contents
//! and assigns member anchors.

use super::{DocModel, NamedId, NamedKind, TocEntry};
use crate::docs::{Heading, Slug};
use crate::slug::Slugger;

/// Assign slugs and collect the table of contents for one page.
///
/// Every heading reachable from the page shares a single slug scope, walked
/// in render order: the export overview first (entries only), then each
/// declaration's own heading, its container sections, its docs blocks, and
/// finally the static and instance member sections. Member docs blocks are
/// walked too so their example headings get page-unique anchors.
pub(crate) fn set_all_headings(model: &mut DocModel, page: NamedId) {
	let mut slugger = Slugger::new();
	let mut toc = Vec::new();
	let page_href = model[page].href.clone();

	if let Some(entry) = model[page].entry.as_mut() {
		if !entry.exports.is_empty() {
			add_heading(&mut entry.exports.heading, None, &mut toc, &mut slugger);
		}
		for group in &mut entry.groups {
			add_heading(&mut group.heading, None, &mut toc, &mut slugger);
		}
	}

	for index in 0..model[page].declarations.len() {
		add_heading(
			&mut model[page].declarations[index].heading,
			None,
			&mut toc,
			&mut slugger,
		);

		let container = model[page].declarations[index]
			.container
			.as_ref()
			.map(|c| (c.constructors, c.call_signatures, c.index_signatures));
		if let Some((constructors, call_signatures, index_signatures)) = container {
			for section in [constructors, call_signatures, index_signatures]
				.into_iter()
				.flatten()
			{
				named_heading(model, section, page_href.as_deref(), &mut toc, &mut slugger);
			}
		}

		model[page].declarations[index]
			.docs
			.visit_blocks_mut(|block, _| {
				if let Some(heading) = block.heading.as_mut() {
					add_heading(heading, None, &mut toc, &mut slugger);
				}
			});

		let members = model[page].declarations[index].container.as_ref().map(|c| {
			(
				c.static_members.items.clone(),
				c.members.items.clone(),
			)
		});
		if let Some((static_members, members)) = members {
			if let Some(container) = model[page].declarations[index].container.as_mut() {
				if !container.static_members.is_empty() {
					add_heading(
						&mut container.static_members.heading,
						None,
						&mut toc,
						&mut slugger,
					);
				}
			}
			for member in static_members {
				named_heading(model, member, page_href.as_deref(), &mut toc, &mut slugger);
			}
			if let Some(container) = model[page].declarations[index].container.as_mut() {
				if !container.members.is_empty() {
					add_heading(&mut container.members.heading, None, &mut toc, &mut slugger);
				}
			}
			for member in members {
				named_heading(model, member, page_href.as_deref(), &mut toc, &mut slugger);
			}
		}
	}

	model[page].headings = toc;
}

/// Process one member node: its own heading and anchor, then the headings of
/// its declarations' docs blocks.
fn named_heading(
	model: &mut DocModel,
	id: NamedId,
	page_href: Option<&str>,
	toc: &mut Vec<TocEntry>,
	slugger: &mut Slugger,
) {
	let named = &mut model[id];
	let name = named.name.clone();
	let slug = add_heading(&mut named.heading, Some(&name), toc, slugger);
	if let (Some(slug), Some(href), NamedKind::Member) = (slug, page_href, named.kind) {
		named.href = Some(format!("{href}#{slug}"));
	}
	for declaration in &mut named.declarations {
		declaration.docs.visit_blocks_mut(|block, _| {
			if let Some(heading) = block.heading.as_mut() {
				add_heading(heading, None, toc, slugger);
			}
		});
	}
}

/// Fix the heading's slug and register it in the table of contents.
///
/// Returns the slug when one was assigned. Suppressed headings and headings
/// without text stay out of the table of contents.
fn add_heading(
	heading: &mut Heading,
	fallback_text: Option<&str>,
	toc: &mut Vec<TocEntry>,
	slugger: &mut Slugger,
) -> Option<String> {
	if heading.text.is_none() {
		heading.text = fallback_text.map(str::to_string);
	}
	let text = heading.text.clone()?;
	match &heading.slug {
		Slug::Suppressed => None,
		Slug::Fixed(slug) => {
			let slug = slug.clone();
			toc.push(TocEntry {
				depth: heading.depth,
				slug: slug.clone(),
				text,
			});
			Some(slug)
		}
		Slug::Auto => {
			let slug = slugger.slug(&text);
			heading.slug = Slug::Fixed(slug.clone());
			toc.push(TocEntry {
				depth: heading.depth,
				slug: slug.clone(),
				text,
			});
			Some(slug)
		}
	}
}
