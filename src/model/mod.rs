//! The built documentation model: entry pages, exported symbols, container
//! members and per-page tables of contents.
//!
//! Pages form a graph (members point back at their owning page, references
//! point anywhere), so nodes live in an arena indexed by [`NamedId`] rather
//! than holding direct ownership of one another.

pub mod builder;
mod headings;
pub mod resolver;

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::docs::{Docs, DocsBlock, Heading};
use crate::excerpt::Excerpt;
use crate::reflect::{ReflectionId, SourceRef};

pub use builder::ModelBuilder;
pub use resolver::LinkResolver;

/// Arena index of a [`Named`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedId(pub(crate) usize);

/// The complete documentation model for one package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocModel {
	pub(crate) nodes: Vec<Named>,
	/// Entry pages, in input order.
	pub entries: Vec<NamedId>,
	/// Source files contributing at least one documented declaration, sorted.
	pub files: Vec<String>,
}

impl DocModel {
	pub(crate) fn alloc(&mut self, named: Named) -> NamedId {
		let id = NamedId(self.nodes.len());
		self.nodes.push(named);
		id
	}

	/// All nodes, in allocation order.
	pub fn nodes(&self) -> impl Iterator<Item = (NamedId, &Named)> {
		self.nodes.iter().enumerate().map(|(i, n)| (NamedId(i), n))
	}
}

impl Index<NamedId> for DocModel {
	type Output = Named;

	fn index(&self, id: NamedId) -> &Named {
		&self.nodes[id.0]
	}
}

impl IndexMut<NamedId> for DocModel {
	fn index_mut(&mut self, id: NamedId) -> &mut Named {
		&mut self.nodes[id.0]
	}
}

/// Role of a [`Named`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamedKind {
	/// A member section inside a container's page.
	Member,
	/// An exported symbol with its own page.
	Export,
	/// An entry-point page.
	Entry,
}

/// One entry of a page's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
	/// Heading depth.
	pub depth: u8,
	/// Allocated page-unique slug.
	pub slug: String,
	/// Heading text.
	pub text: String,
}

/// Release metadata attached to an exported symbol's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
	/// Release display name, typically the version.
	pub name: String,
	/// Link to release notes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

/// An ordered list of nodes under a shared list heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedList {
	/// List heading.
	pub heading: Heading,
	/// Member nodes, in insertion order.
	pub items: Vec<NamedId>,
}

impl NamedList {
	pub(crate) fn new(heading: Heading) -> Self {
		Self {
			heading,
			items: Vec::new(),
		}
	}

	/// Whether the list has no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Pointer to one declaration of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclRef {
	/// Owning node.
	pub named: NamedId,
	/// Index into that node's declaration list.
	pub index: usize,
}

/// A kind-partitioned group in an entry page's export overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportGroup {
	/// Group heading, suppressed from the table of contents.
	pub heading: Heading,
	/// Declarations in the group.
	pub declarations: Vec<DeclRef>,
}

impl ExportGroup {
	fn new(name: &str) -> Self {
		Self {
			heading: Heading::suppressed(5, format!("{name}:")),
			declarations: Vec::new(),
		}
	}

	/// Whether no declaration landed in this group.
	pub fn is_empty(&self) -> bool {
		self.declarations.is_empty()
	}
}

/// Entry-page payload of a [`Named`] node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
	/// Exported symbols, in declaration order.
	pub exports: NamedList,
	/// Kind-partitioned export overview.
	pub groups: Vec<ExportGroup>,
	/// Summary block from the module's own doc comment.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub docs: Option<DocsBlock>,
}

/// Kind of a built declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
	/// A class.
	Class,
	/// An interface.
	Interface,
	/// A type alias.
	Type,
	/// A function overload.
	Function,
	/// A variable.
	Variable,
	/// A property member.
	Property,
	/// An accessor member.
	Accessor,
	/// A method overload.
	Method,
	/// A constructor overload.
	Constructor,
	/// An index signature.
	Index,
	/// A call signature.
	Call,
}

impl DeclarationKind {
	/// Whether declarations of this kind carry container sections.
	pub fn is_container(self) -> bool {
		matches!(self, Self::Class | Self::Interface)
	}
}

impl std::fmt::Display for DeclarationKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::Class => "Class",
			Self::Interface => "Interface",
			Self::Type => "Type",
			Self::Function => "Function",
			Self::Variable => "Variable",
			Self::Property => "Property",
			Self::Accessor => "Accessor",
			Self::Method => "Method",
			Self::Constructor => "Constructor",
			Self::Index => "Index",
			Self::Call => "Call",
		})
	}
}

/// Link from a built member back to the ancestor that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritedFrom {
	/// Reflection id of the ancestor member.
	pub id: ReflectionId,
	/// Name of the declaring class or interface.
	pub name: String,
	/// Href of the ancestor member, filled during link resolution.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub href: Option<String>,
}

/// Container sections of a class or interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
	/// Instance members.
	pub members: NamedList,
	/// Static members.
	pub static_members: NamedList,
	/// Constructor overload section, when the container declares any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub constructors: Option<NamedId>,
	/// Index-signature section.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index_signatures: Option<NamedId>,
	/// Call-signature section.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub call_signatures: Option<NamedId>,
}

/// One built declaration: excerpt, docs and provenance for a single overload
/// or signature of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
	/// Owning node.
	pub parent: NamedId,
	/// Reflection id this declaration was built from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ReflectionId>,
	/// Signature heading.
	pub heading: Heading,
	/// Declaration kind.
	pub kind: DeclarationKind,
	/// Source-like excerpt.
	pub excerpt: Excerpt,
	/// Structured doc-comment content.
	pub docs: Docs,
	/// Source location, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<SourceRef>,
	/// Inheritance backlink, when the member was inherited.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub inherited_from: Option<InheritedFrom>,
	/// Container sections, for classes and interfaces only.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub container: Option<Container>,
}

/// A documented node: an entry page, an exported symbol, or a member section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
	/// Display name.
	pub name: String,
	/// Reflection id, when the node corresponds to one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ReflectionId>,
	/// Owning node; `None` for entry pages.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent: Option<NamedId>,
	/// Node role.
	pub kind: NamedKind,
	/// Page or section heading.
	pub heading: Heading,
	/// Final href; pages get a pathname, members get `page#slug`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub href: Option<String>,
	/// Built declarations, one per overload.
	pub declarations: Vec<Declaration>,
	/// Page table of contents, filled by the heading pass.
	pub headings: Vec<TocEntry>,
	/// Release metadata, set on exported symbols.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub release: Option<Release>,
	/// Entry-page payload, present only on entry nodes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub entry: Option<EntryData>,
}

impl Named {
	/// Whether this node is an entry page.
	pub fn is_entry(&self) -> bool {
		self.kind == NamedKind::Entry && self.entry.is_some()
	}
}

/// Partition an entry's exported declarations into the overview groups.
///
/// Class, interface, alias, function and variable declarations fill the five
/// canonical groups; anything else lands in a trailing "Others" group. Empty
/// groups are dropped.
pub(crate) fn export_groups(model: &DocModel, exports: &NamedList) -> Vec<ExportGroup> {
	let mut classes = ExportGroup::new("Classes");
	let mut interfaces = ExportGroup::new("Interfaces");
	let mut types = ExportGroup::new("Type Aliases");
	let mut functions = ExportGroup::new("Functions");
	let mut variables = ExportGroup::new("Variables");
	let mut others = ExportGroup::new("Others");
	for &named in &exports.items {
		for index in 0..model[named].declarations.len() {
			let reference = DeclRef { named, index };
			let group = match model[named].declarations[index].kind {
				DeclarationKind::Class => &mut classes,
				DeclarationKind::Interface => &mut interfaces,
				DeclarationKind::Type => &mut types,
				DeclarationKind::Function => &mut functions,
				DeclarationKind::Variable => &mut variables,
				_ => &mut others,
			};
			group.declarations.push(reference);
		}
	}
	[classes, interfaces, types, functions, variables, others]
		.into_iter()
		.filter(|group| !group.is_empty())
		.collect()
}
