//! Deterministic, collision-resistant slug allocation.
//!
//! Two allocator scopes exist: [`Slugger`] for heading anchors within one
//! rendered page, and [`FileSlugger`] for entry-point pathnames. Both are
//! monotonic for the lifetime of a build; there is no removal operation.

use std::collections::{HashMap, HashSet};

/// Reduce arbitrary text to a URL-fragment-safe slug.
///
/// Lower-cases, keeps alphanumerics plus `-` and `_`, turns whitespace runs
/// into single dashes and drops everything else.
pub fn slugify(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut pending_dash = false;
	for ch in text.chars() {
		if ch.is_whitespace() {
			pending_dash = !out.is_empty();
			continue;
		}
		if ch.is_alphanumeric() || ch == '-' || ch == '_' {
			if pending_dash {
				out.push('-');
				pending_dash = false;
			}
			for lower in ch.to_lowercase() {
				out.push(lower);
			}
		}
	}
	out
}

/// Heading-scope slug allocator.
///
/// On collision within the same instance, appends `-1`, `-2`, … in
/// first-seen order. A fresh instance is created per `Named` subtree so
/// in-page anchors stay unique without colliding globally.
#[derive(Debug, Default)]
pub struct Slugger {
	taken: HashSet<String>,
	counts: HashMap<String, usize>,
}

impl Slugger {
	/// Create an empty allocator scope.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocate a slug for `name`, unique within this scope.
	pub fn slug(&mut self, name: &str) -> String {
		self.allocate(slugify(name))
	}

	fn allocate(&mut self, base: String) -> String {
		let mut i = self.counts.get(&base).copied().unwrap_or(0);
		loop {
			let candidate = if i == 0 {
				base.clone()
			} else {
				format!("{base}-{i}")
			};
			if !self.taken.contains(&candidate) {
				self.taken.insert(candidate.clone());
				self.counts.insert(base, i + 1);
				return candidate;
			}
			i += 1;
		}
	}
}

/// File/entry-scope slug allocator.
///
/// Slugs each `/`-separated path segment individually and keeps the joined
/// path unique with the same numeric-disambiguator scheme as [`Slugger`].
/// Derived from module paths, so results are stable across rebuilds.
#[derive(Debug, Default)]
pub struct FileSlugger {
	inner: Slugger,
}

impl FileSlugger {
	/// Create an empty allocator scope.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocate a slug for the path `filename`, unique within this scope.
	pub fn slug(&mut self, filename: &str) -> String {
		let joined = filename
			.split('/')
			.filter(|part| !part.is_empty())
			.map(slugify)
			.collect::<Vec<_>>()
			.join("/");
		self.inner.allocate(joined)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn slugify_strips_invalid_fragment_characters() {
		assert_eq!(slugify("Docs.of()"), "docsof");
		assert_eq!(slugify("Type Parameters"), "type-parameters");
		assert_eq!(slugify("  padded  name "), "padded-name");
		assert_eq!(slugify("CamelCase_ok-2"), "camelcase_ok-2");
	}

	#[test]
	fn repeated_names_disambiguate_in_first_seen_order() {
		let mut slugger = Slugger::new();
		assert_eq!(slugger.slug("name"), "name");
		assert_eq!(slugger.slug("name"), "name-1");
		assert_eq!(slugger.slug("name"), "name-2");
	}

	#[test]
	fn all_slugs_within_a_scope_are_distinct() {
		let mut slugger = Slugger::new();
		let names = ["Example", "example", "Example", "example-1", "Example"];
		let mut seen = HashSet::new();
		for name in names {
			assert!(seen.insert(slugger.slug(name)));
		}
	}

	#[test]
	fn case_collisions_are_detected() {
		let mut slugger = Slugger::new();
		assert_eq!(slugger.slug("Signature"), "signature");
		assert_eq!(slugger.slug("signature"), "signature-1");
	}

	#[test]
	fn file_slugger_slugs_per_segment() {
		let mut slugger = FileSlugger::new();
		assert_eq!(slugger.slug("My Lib/Sub Module"), "my-lib/sub-module");
		assert_eq!(slugger.slug("my lib/sub module"), "my-lib/sub-module-1");
	}

	#[test]
	fn separate_scopes_do_not_interfere() {
		let mut a = Slugger::new();
		let mut b = Slugger::new();
		assert_eq!(a.slug("x"), "x");
		assert_eq!(b.slug("x"), "x");
	}
}
