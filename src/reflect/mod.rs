//! Input symbol graph supplied by the external static-analysis front end.
//!
//! These types mirror the wire shape the front end emits (serde-driven JSON),
//! the way `rustdoc-types` models rustdoc output. tydoc never parses source
//! code itself; it consumes this graph and builds the documentation model.

mod comment;
mod ty;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use comment::{BlockTag, Comment, CommentPart, InlineTarget};
pub use ty::{Literal, MappedModifier, ReferenceTarget, Type, TypeOperator};

/// Stable numeric symbol identity assigned by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReflectionId(pub u64);

/// Identity of a symbol that lives outside the documented package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId {
	/// Package the symbol belongs to.
	pub package: String,
	/// Fully qualified name within that package.
	pub qualified_name: String,
}

impl SymbolId {
	/// Stable key used to memoize external resolution results.
	pub fn stable_key(&self) -> String {
		format!("{}:{}", self.package, self.qualified_name)
	}
}

/// Kind of a reflection node in the input graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReflectionKind {
	/// One documented entry-point module.
	Module,
	/// A class declaration.
	Class,
	/// An interface declaration.
	Interface,
	/// A type alias.
	TypeAlias,
	/// A module-level variable.
	Variable,
	/// A function declaration.
	Function,
	/// A property of a class, interface or inline object.
	Property,
	/// A get/set accessor member.
	Accessor,
	/// A method member.
	Method,
	/// A class constructor member.
	Constructor,
	/// A call signature.
	CallSignature,
	/// A construct signature.
	ConstructorSignature,
	/// The get half of an accessor.
	GetSignature,
	/// The set half of an accessor.
	SetSignature,
	/// An index signature.
	IndexSignature,
}

impl ReflectionKind {
	/// Singular, lower-cased display name, used for generated warning text
	/// and error messages.
	pub fn singular_name(self) -> &'static str {
		match self {
			Self::Module => "module",
			Self::Class => "class",
			Self::Interface => "interface",
			Self::TypeAlias => "type alias",
			Self::Variable => "variable",
			Self::Function => "function",
			Self::Property => "property",
			Self::Accessor => "accessor",
			Self::Method => "method",
			Self::Constructor => "constructor",
			Self::CallSignature => "call signature",
			Self::ConstructorSignature => "constructor signature",
			Self::GetSignature => "get signature",
			Self::SetSignature => "set signature",
			Self::IndexSignature => "index signature",
		}
	}
}

bitflags! {
	/// Modifier flags attached to declarations, signatures and parameters.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
	pub struct ReflectionFlags: u16 {
		/// `static` member.
		const STATIC = 1 << 0;
		/// `abstract` class or member.
		const ABSTRACT = 1 << 1;
		/// Optional member or parameter (`?`).
		const OPTIONAL = 1 << 2;
		/// `readonly` member.
		const READONLY = 1 << 3;
		/// Explicit `public` modifier.
		const PUBLIC = 1 << 4;
		/// `protected` member.
		const PROTECTED = 1 << 5;
		/// `private` member.
		const PRIVATE = 1 << 6;
		/// Rest parameter (`...`).
		const REST = 1 << 7;
		/// `const` variable.
		const CONST = 1 << 8;
	}
}

/// Location of a declaration in the original sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
	/// Path relative to the package root.
	pub file_name: String,
	/// Absolute path on disk.
	pub full_file_name: String,
	/// 1-based line number.
	pub line: u32,
	/// 1-based column.
	pub character: u32,
	/// Optional URL into a hosted repository view.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

/// Link from an inherited member back to its declaring ancestor.
///
/// `target` is `None` when the ancestor has no live reflection in this build
/// (it is external or deliberately unexported); such members are dropped
/// rather than rendered with a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inheritance {
	/// Resolved ancestor member, when the ancestor is part of the build.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<InheritedTarget>,
}

/// Resolved ancestor of an inherited member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritedTarget {
	/// Id of the ancestor member declaration.
	pub id: ReflectionId,
	/// Display name of the declaring class or interface.
	pub container: String,
}

/// A documented type parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameterReflection {
	/// Type parameter name.
	pub name: String,
	/// `extends` constraint, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub constraint: Option<Type>,
	/// Default type, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<Type>,
	/// Doc comment attached directly to the type parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comment: Option<Comment>,
}

/// A documented signature parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReflection {
	/// Parameter name.
	pub name: String,
	/// Modifier flags (optional, rest, visibility).
	#[serde(default)]
	pub flags: ReflectionFlags,
	/// Declared type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ty: Option<Type>,
	/// Default-value literal as written in source.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
	/// Doc comment attached directly to the parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comment: Option<Comment>,
}

/// One concrete signature of a function, method, accessor or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureReflection {
	/// Stable id of this signature.
	pub id: ReflectionId,
	/// Name shared with the owning declaration.
	pub name: String,
	/// Signature kind (call, constructor, get, set, index).
	pub kind: ReflectionKind,
	/// Type parameters declared on the signature.
	#[serde(default)]
	pub type_params: Vec<TypeParameterReflection>,
	/// Ordered parameter list.
	#[serde(default)]
	pub parameters: Vec<ParameterReflection>,
	/// Return type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ty: Option<Type>,
	/// Doc comment on this overload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comment: Option<Comment>,
	/// One source reference per overload.
	#[serde(default)]
	pub sources: Vec<SourceRef>,
	/// Inheritance link, when this signature was inherited.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inherited_from: Option<Inheritance>,
}

impl SignatureReflection {
	/// Create an empty signature of the given kind.
	pub fn new(id: ReflectionId, name: impl Into<String>, kind: ReflectionKind) -> Self {
		Self {
			id,
			name: name.into(),
			kind,
			type_params: Vec::new(),
			parameters: Vec::new(),
			ty: None,
			comment: None,
			sources: Vec::new(),
			inherited_from: None,
		}
	}

	/// Whether this signature was inherited from an ancestor that has no live
	/// reflection in the current build.
	pub fn inherited_without_target(&self) -> bool {
		self.inherited_from
			.as_ref()
			.is_some_and(|i| i.target.is_none())
	}
}

/// A declaration node: module, class, interface, alias, variable, function,
/// or a member of a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationReflection {
	/// Stable id of this declaration.
	pub id: ReflectionId,
	/// Declared name.
	pub name: String,
	/// Compiler-escaped name, when it differs from `name`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub escaped_name: Option<String>,
	/// Declaration kind.
	pub kind: ReflectionKind,
	/// Modifier flags.
	#[serde(default)]
	pub flags: ReflectionFlags,
	/// Doc comment.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub comment: Option<Comment>,
	/// Declared or inferred type (variables, properties, aliases).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ty: Option<Type>,
	/// Type parameters declared on the declaration.
	#[serde(default)]
	pub type_params: Vec<TypeParameterReflection>,
	/// Child declarations (module exports, container members, object properties).
	#[serde(default)]
	pub children: Vec<DeclarationReflection>,
	/// Call, constructor and accessor signatures.
	#[serde(default)]
	pub signatures: Vec<SignatureReflection>,
	/// Index signatures, kept apart from the callable ones.
	#[serde(default)]
	pub index_signatures: Vec<SignatureReflection>,
	/// `extends` clause types.
	#[serde(default)]
	pub extended_types: Vec<Type>,
	/// `implements` clause types.
	#[serde(default)]
	pub implemented_types: Vec<Type>,
	/// Source references; overloads carry one entry each.
	#[serde(default)]
	pub sources: Vec<SourceRef>,
	/// Inheritance link, when this member was inherited.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inherited_from: Option<Inheritance>,
	/// Default-value literal for variables and parameters-like declarations.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
}

impl DeclarationReflection {
	/// Create an empty declaration of the given kind.
	pub fn new(id: ReflectionId, name: impl Into<String>, kind: ReflectionKind) -> Self {
		Self {
			id,
			name: name.into(),
			escaped_name: None,
			kind,
			flags: ReflectionFlags::empty(),
			comment: None,
			ty: None,
			type_params: Vec::new(),
			children: Vec::new(),
			signatures: Vec::new(),
			index_signatures: Vec::new(),
			extended_types: Vec::new(),
			implemented_types: Vec::new(),
			sources: Vec::new(),
			inherited_from: None,
			default_value: None,
		}
	}

	/// All signatures except index signatures, in declaration order.
	pub fn non_index_signatures(&self) -> &[SignatureReflection] {
		&self.signatures
	}

	/// Every signature, callable and index alike.
	pub fn all_signatures(&self) -> impl Iterator<Item = &SignatureReflection> {
		self.signatures.iter().chain(self.index_signatures.iter())
	}

	/// Total number of signatures of any kind.
	pub fn signature_count(&self) -> usize {
		self.signatures.len() + self.index_signatures.len()
	}

	/// Whether this declaration was inherited from an ancestor that has no
	/// live reflection in the current build.
	pub fn inherited_without_target(&self) -> bool {
		self.inherited_from
			.as_ref()
			.is_some_and(|i| i.target.is_none())
	}
}

/// Root of the input graph: one documented package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
	/// Project display name.
	pub name: String,
	/// Package name from the package manifest.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub package_name: Option<String>,
	/// Package version from the package manifest.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub package_version: Option<String>,
	/// Entry-point modules.
	#[serde(default)]
	pub children: Vec<DeclarationReflection>,
}
