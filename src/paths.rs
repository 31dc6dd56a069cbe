//! Entry-point pathname derivation.

use serde::{Deserialize, Serialize};

/// How the host site lays out generated pages on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFormat {
	/// Every page becomes `dir/index.html`, hrefs end with a trailing slash.
	Directory,
	/// Pathnames are kept exactly as derived.
	Preserve,
	/// Every page becomes `page.html`, hrefs carry no trailing slash.
	File,
}

/// Derive the user-facing href for an entry slug.
pub fn entry_pathname(id: &str, base: &str, format: BuildFormat) -> String {
	let mut id = id.to_string();
	if let Some(dot) = extension_start(&id) {
		id.truncate(dot);
	}
	if id.ends_with("/index") {
		id.truncate(id.len() - "index".len());
	}
	if format == BuildFormat::File && id.ends_with('/') {
		id.pop();
	}
	let id = id.strip_prefix('/').unwrap_or(&id);

	let mut href = format!("{}/{}", base.trim_end_matches('/'), id);
	if format == BuildFormat::Directory && !href.ends_with('/') {
		href.push('/');
	}
	href
}

/// Byte offset of the final-extension dot in the last path segment, if any.
fn extension_start(path: &str) -> Option<usize> {
	let last_segment = path.rfind('/').map_or(0, |i| i + 1);
	match path[last_segment..].rfind('.') {
		// A leading dot names a hidden file, not an extension.
		Some(0) | None => None,
		Some(dot) => Some(last_segment + dot),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn directory_format_appends_trailing_slash() {
		assert_eq!(
			entry_pathname("guide", "/docs", BuildFormat::Directory),
			"/docs/guide/"
		);
	}

	#[test]
	fn index_suffix_is_stripped() {
		assert_eq!(
			entry_pathname("pkg/index", "/", BuildFormat::Directory),
			"/pkg/"
		);
	}

	#[test]
	fn file_format_drops_trailing_slash() {
		assert_eq!(
			entry_pathname("pkg/index", "/api", BuildFormat::File),
			"/api/pkg"
		);
	}

	#[test]
	fn extension_is_removed() {
		assert_eq!(
			entry_pathname("mod.ts", "/", BuildFormat::Preserve),
			"/mod"
		);
	}

	#[test]
	fn empty_id_resolves_to_base() {
		assert_eq!(entry_pathname("", "/", BuildFormat::Directory), "/");
	}
}
