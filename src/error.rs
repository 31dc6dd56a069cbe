use std::fmt;

use crate::reflect::ReflectionKind;

/// Aggregate errors produced while building the documentation model.
///
/// Structural errors are never swallowed: a broken model is worse than no
/// model, so every variant aborts the whole build when propagated.
#[derive(Debug)]
pub enum TydocError {
	/// The project metadata carried no package name.
	MissingPackageName,
	/// The project metadata carried no package version.
	MissingPackageVersion,
	/// The package version did not parse as a semantic version.
	InvalidPackageVersion(semver::Error),
	/// The project itself had no modules to document.
	EmptyProject(String),
	/// A module had no children, which is malformed input rather than user error.
	EmptyModule(String),
	/// A module did not reference exactly one source file.
	ModuleSources {
		/// Full name of the offending module.
		module: String,
		/// Number of source references found.
		found: usize,
	},
	/// A signature appeared under a parent kind the excerpt renderer has no case for.
	UnexpectedSignatureKind {
		/// Kind of the signature itself.
		signature: ReflectionKind,
		/// Kind of the enclosing declaration.
		parent: ReflectionKind,
	},
	/// A declaration kind reached the excerpt renderer without a rendering rule.
	UnexpectedReflectionKind(ReflectionKind),
}

impl fmt::Display for TydocError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::MissingPackageName => write!(f, "failed to load package name"),
			Self::MissingPackageVersion => write!(f, "failed to load package version"),
			Self::InvalidPackageVersion(err) => write!(f, "invalid package version: {err}"),
			Self::EmptyProject(name) => write!(f, "project {name} has no children"),
			Self::EmptyModule(name) => write!(f, "module {name} has no children"),
			Self::ModuleSources { module, found } => write!(
				f,
				"expected module {module} to have 1 source file, found {found}"
			),
			Self::UnexpectedSignatureKind { signature, parent } => write!(
				f,
				"unexpected signature kind {} in {}",
				signature.singular_name(),
				parent.singular_name()
			),
			Self::UnexpectedReflectionKind(kind) => {
				write!(f, "unexpected reflection kind {}", kind.singular_name())
			}
		}
	}
}

impl std::error::Error for TydocError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::InvalidPackageVersion(err) => Some(err),
			_ => None,
		}
	}
}

impl From<semver::Error> for TydocError {
	fn from(err: semver::Error) -> Self {
		Self::InvalidPackageVersion(err)
	}
}

/// Result type returned by the tydoc library.
pub type Result<T> = std::result::Result<T, TydocError>;
