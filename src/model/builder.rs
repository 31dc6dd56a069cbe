//! Builds the documentation model from an input symbol graph.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::docs::{Docs, DocsBlock, Heading, Slug};
use crate::error::{Result, TydocError};
use crate::excerpt::{Excerpt, ExcerptOptions};
use crate::paths::{BuildFormat, entry_pathname};
use crate::reflect::{
	DeclarationReflection, Inheritance, Project, ReflectionFlags, ReflectionId, ReflectionKind,
	SignatureReflection, SymbolId,
};
use crate::slug::FileSlugger;

use super::headings::set_all_headings;
use super::resolver::LinkResolver;
use super::{
	Container, Declaration, DeclarationKind, DocModel, EntryData, InheritedFrom, Named, NamedId,
	NamedKind, NamedList, Release, export_groups,
};

type ExternalHook = Box<dyn Fn(&SymbolId) -> Option<String>>;
type EntryPathHook = Box<dyn Fn(&str, &str) -> Option<String>>;
type ReleaseHook = Box<dyn Fn(&str, &str, &str) -> Option<Release>>;

/// Configurable builder turning a [`Project`] into a [`DocModel`].
///
/// The defaults produce directory-format pathnames under `/`; hooks customize
/// external-symbol resolution, entry ids and release metadata.
pub struct ModelBuilder {
	format: BuildFormat,
	base: String,
	excerpts: ExcerptOptions,
	resolve_external: Option<ExternalHook>,
	entry_path: Option<EntryPathHook>,
	release_info: Option<ReleaseHook>,
}

impl Default for ModelBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ModelBuilder {
	/// Builder with default settings.
	pub fn new() -> Self {
		Self {
			format: BuildFormat::Directory,
			base: "/".to_string(),
			excerpts: ExcerptOptions::spaced(),
			resolve_external: None,
			entry_path: None,
			release_info: None,
		}
	}

	/// Set the pathname format for generated pages.
	pub fn with_format(mut self, format: BuildFormat) -> Self {
		self.format = format;
		self
	}

	/// Set the base path prepended to every generated pathname.
	pub fn with_base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	/// Set the excerpt rendering options.
	pub fn with_excerpt_options(mut self, options: ExcerptOptions) -> Self {
		self.excerpts = options;
		self
	}

	/// Set the hook resolving references to symbols outside the package.
	pub fn with_resolve_external(
		mut self,
		hook: impl Fn(&SymbolId) -> Option<String> + 'static,
	) -> Self {
		self.resolve_external = Some(Box::new(hook));
		self
	}

	/// Set the hook overriding the generated id of an entry page. Called with
	/// the module name and the package name.
	pub fn with_entry_path(
		mut self,
		hook: impl Fn(&str, &str) -> Option<String> + 'static,
	) -> Self {
		self.entry_path = Some(Box::new(hook));
		self
	}

	/// Set the hook supplying release metadata. Called with the package
	/// version, the package name and the module name.
	pub fn with_release_info(
		mut self,
		hook: impl Fn(&str, &str, &str) -> Option<Release> + 'static,
	) -> Self {
		self.release_info = Some(Box::new(hook));
		self
	}

	/// Build the documentation model for `project`, including the heading
	/// pass and link resolution.
	pub fn build(&self, project: &Project) -> Result<DocModel> {
		let package_name = project
			.package_name
			.as_deref()
			.ok_or(TydocError::MissingPackageName)?;
		let package_version = project
			.package_version
			.as_deref()
			.ok_or(TydocError::MissingPackageVersion)?;
		semver::Version::parse(package_version)?;
		if project.children.is_empty() {
			return Err(TydocError::EmptyProject(project.name.clone()));
		}

		let mut file_slugger = FileSlugger::new();
		let mut modules = Vec::new();
		for module in &project.children {
			if module.kind != ReflectionKind::Module {
				warn!("{} is not a module", module.name);
				continue;
			}
			let name = module.name.trim_matches('/');
			let full_name = if name == "index" {
				package_name.to_string()
			} else {
				format!("{package_name}/{name}")
			};
			if module.sources.len() != 1 {
				return Err(TydocError::ModuleSources {
					module: full_name,
					found: module.sources.len(),
				});
			}
			let id = self
				.entry_path
				.as_ref()
				.and_then(|hook| hook(&module.name, package_name))
				.unwrap_or_else(|| file_slugger.slug(if name == "index" { "" } else { name }));
			modules.push((full_name, id, module));
		}

		let mut model = DocModel::default();
		for (full_name, id, module) in modules {
			if module.children.is_empty() {
				return Err(TydocError::EmptyModule(full_name));
			}
			let release = self
				.release_info
				.as_ref()
				.and_then(|hook| hook(package_version, package_name, &module.name));
			let mut builder = EntryBuilder::new(
				&mut model,
				full_name,
				id,
				self.format,
				self.base.clone(),
				release,
			);
			for member in &module.children {
				match member.kind {
					ReflectionKind::Interface
					| ReflectionKind::Class
					| ReflectionKind::TypeAlias
					| ReflectionKind::Variable => {
						builder.add_declaration(&mut model, RefLike::Decl(member), &self.excerpts)?;
					}
					ReflectionKind::Function => {
						for signature in &member.signatures {
							builder.add_declaration(
								&mut model,
								RefLike::Sig {
									parent: member,
									sig: signature,
								},
								&self.excerpts,
							)?;
						}
					}
					_ => {}
				}
			}
			let entry = builder.finish(&mut model, &mut file_slugger, module);
			model.entries.push(entry);
		}

		let mut files = BTreeSet::new();
		for &entry in &model.entries {
			let mut pages = vec![entry];
			if let Some(data) = &model[entry].entry {
				pages.extend(data.exports.items.iter().copied());
			}
			for page in pages {
				for declaration in &model[page].declarations {
					if let Some(source) = &declaration.source {
						files.insert(source.full_file_name.clone());
					}
				}
			}
		}
		model.files = files.into_iter().collect();

		let resolver = LinkResolver::new(&model, self.resolve_external.as_deref());
		resolver.resolve_all(&mut model);

		Ok(model)
	}
}

/// A declaration-or-signature input to the builder; functions contribute one
/// declaration per overload signature.
#[derive(Clone, Copy)]
enum RefLike<'r> {
	Decl(&'r DeclarationReflection),
	Sig {
		parent: &'r DeclarationReflection,
		sig: &'r SignatureReflection,
	},
}

impl<'r> RefLike<'r> {
	fn declaration(self) -> &'r DeclarationReflection {
		match self {
			Self::Decl(decl) => decl,
			Self::Sig { parent, .. } => parent,
		}
	}

	fn name(self) -> &'r str {
		match self {
			Self::Decl(decl) => &decl.name,
			Self::Sig { sig, .. } => &sig.name,
		}
	}

	fn id(self) -> ReflectionId {
		match self {
			Self::Decl(decl) => decl.id,
			Self::Sig { sig, .. } => sig.id,
		}
	}

	fn sources(self) -> &'r [crate::reflect::SourceRef] {
		match self {
			Self::Decl(decl) => &decl.sources,
			Self::Sig { sig, .. } => &sig.sources,
		}
	}

	fn inheritance(self) -> Option<&'r Inheritance> {
		match self {
			Self::Decl(decl) => decl.inherited_from.as_ref(),
			Self::Sig { sig, .. } => sig.inherited_from.as_ref(),
		}
	}
}

fn declaration_kind(kind: ReflectionKind) -> Option<DeclarationKind> {
	match kind {
		ReflectionKind::Accessor => Some(DeclarationKind::Accessor),
		ReflectionKind::Class => Some(DeclarationKind::Class),
		ReflectionKind::Function => Some(DeclarationKind::Function),
		ReflectionKind::Interface => Some(DeclarationKind::Interface),
		ReflectionKind::Method => Some(DeclarationKind::Method),
		ReflectionKind::Property => Some(DeclarationKind::Property),
		ReflectionKind::TypeAlias => Some(DeclarationKind::Type),
		ReflectionKind::Variable => Some(DeclarationKind::Variable),
		_ => None,
	}
}

fn inherited_link(inheritance: Option<&Inheritance>) -> Option<InheritedFrom> {
	inheritance
		.and_then(|i| i.target.as_ref())
		.map(|target| InheritedFrom {
			id: target.id,
			name: target.container.clone(),
			href: None,
		})
}

/// Name-keyed collection of nodes; overloads of the same name share a node.
struct NamedMap {
	kind: NamedKind,
	parent: NamedId,
	order: Vec<NamedId>,
	index: HashMap<String, NamedId>,
}

impl NamedMap {
	fn new(kind: NamedKind, parent: NamedId) -> Self {
		Self {
			kind,
			parent,
			order: Vec::new(),
			index: HashMap::new(),
		}
	}

	fn get(&mut self, model: &mut DocModel, name: &str, id: ReflectionId) -> NamedId {
		if let Some(&existing) = self.index.get(name) {
			return existing;
		}
		let heading = match self.kind {
			NamedKind::Member => Heading::auto(3).code(),
			_ => Heading::auto(1),
		};
		let named = model.alloc(Named {
			name: name.to_string(),
			id: Some(id),
			parent: Some(self.parent),
			kind: self.kind,
			heading,
			href: None,
			declarations: Vec::new(),
			headings: Vec::new(),
			release: None,
			entry: None,
		});
		self.order.push(named);
		self.index.insert(name.to_string(), named);
		named
	}

	fn add_declaration(
		&mut self,
		model: &mut DocModel,
		reference: RefLike<'_>,
		options: &ExcerptOptions,
		is_child: bool,
	) -> Result<()> {
		let dec_ref = reference.declaration();
		let Some(kind) = declaration_kind(dec_ref.kind) else {
			debug!(
				"skipping {}: no declaration kind for {:?}",
				reference.name(),
				dec_ref.kind
			);
			return Ok(());
		};
		if reference
			.inheritance()
			.is_some_and(|i| i.target.is_none())
		{
			return Ok(());
		}

		let named = self.get(model, reference.name(), dec_ref.id);
		let is_member = self.kind == NamedKind::Member;
		let excerpt = match reference {
			RefLike::Decl(decl) => Excerpt::of(decl, options)?,
			RefLike::Sig { parent, sig } => Excerpt::of_signature(parent, sig, options)?,
		};
		let docs = match reference {
			RefLike::Decl(decl) => Docs::of_declaration(decl, is_member),
			RefLike::Sig { parent, sig } => Docs::of_signature(sig, parent.kind, is_member),
		};
		let sources = reference.sources();
		// The nth overload reports the nth source location, clamped.
		let source_index = model[named]
			.declarations
			.len()
			.min(sources.len().saturating_sub(1));
		let mut declaration = Declaration {
			parent: named,
			id: Some(reference.id()),
			heading: if is_child {
				Heading::suppressed(5, "Signature:")
			} else {
				Heading::titled(2, "Signature")
			},
			kind,
			excerpt,
			docs,
			source: sources.get(source_index).cloned(),
			inherited_from: inherited_link(reference.inheritance()),
			container: None,
		};

		if kind.is_container() {
			if let RefLike::Decl(decl) = reference {
				declaration.container = Some(build_container(model, named, decl, options)?);
			}
		}
		model[named].declarations.push(declaration);
		Ok(())
	}

	/// Nodes that received at least one declaration, in insertion order.
	fn collect(&self, model: &DocModel, heading: Heading) -> NamedList {
		let mut list = NamedList::new(heading);
		for &id in &self.order {
			if !model[id].declarations.is_empty() {
				list.items.push(id);
			}
		}
		list
	}
}

fn build_container(
	model: &mut DocModel,
	named: NamedId,
	declaration: &DeclarationReflection,
	options: &ExcerptOptions,
) -> Result<Container> {
	let mut members = NamedMap::new(NamedKind::Member, named);
	let mut statics = NamedMap::new(NamedKind::Member, named);
	let mut constructor_signatures = Vec::new();

	for child in &declaration.children {
		let signatures = child.non_index_signatures();
		if !signatures.is_empty() {
			for signature in signatures {
				if signature.inherited_without_target() {
					continue;
				}
				if child.kind == ReflectionKind::Constructor {
					constructor_signatures.push((child, signature));
				} else if child.flags.contains(ReflectionFlags::STATIC) {
					statics.add_declaration(
						model,
						RefLike::Sig {
							parent: child,
							sig: signature,
						},
						options,
						true,
					)?;
				} else {
					members.add_declaration(
						model,
						RefLike::Sig {
							parent: child,
							sig: signature,
						},
						options,
						true,
					)?;
				}
			}
		} else if child.flags.contains(ReflectionFlags::STATIC) {
			statics.add_declaration(model, RefLike::Decl(child), options, true)?;
		} else {
			members.add_declaration(model, RefLike::Decl(child), options, true)?;
		}
	}

	let constructors = if constructor_signatures.is_empty() {
		None
	} else {
		let section = model.alloc(section_named("Constructors", None, named));
		let mut declarations = Vec::new();
		for (child, signature) in constructor_signatures {
			declarations.push(signature_declaration(
				section,
				child,
				signature,
				DeclarationKind::Constructor,
				options,
			)?);
		}
		model[section].declarations = declarations;
		Some(section)
	};

	let index_signatures = signature_section(
		model,
		named,
		declaration,
		&declaration.index_signatures,
		"Index Signatures",
		DeclarationKind::Index,
		options,
	)?;
	let call_signatures = signature_section(
		model,
		named,
		declaration,
		&declaration.signatures,
		"Call Signatures",
		DeclarationKind::Call,
		options,
	)?;

	Ok(Container {
		members: members.collect(model, Heading::titled(2, "Members")),
		static_members: statics.collect(model, Heading::titled(2, "Static Members")),
		constructors,
		index_signatures,
		call_signatures,
	})
}

fn section_named(name: &str, id: Option<ReflectionId>, parent: NamedId) -> Named {
	Named {
		name: name.to_string(),
		id,
		parent: Some(parent),
		kind: NamedKind::Member,
		heading: Heading::auto(3),
		href: None,
		declarations: Vec::new(),
		headings: Vec::new(),
		release: None,
		entry: None,
	}
}

fn signature_declaration(
	parent: NamedId,
	owner: &DeclarationReflection,
	signature: &SignatureReflection,
	kind: DeclarationKind,
	options: &ExcerptOptions,
) -> Result<Declaration> {
	Ok(Declaration {
		parent,
		id: Some(signature.id),
		heading: Heading::suppressed(5, "Signature:"),
		kind,
		excerpt: Excerpt::of_signature(owner, signature, options)?,
		docs: Docs::of_signature(signature, owner.kind, true),
		source: signature.sources.first().cloned(),
		inherited_from: inherited_link(signature.inherited_from.as_ref()),
		container: None,
	})
}

fn signature_section(
	model: &mut DocModel,
	parent: NamedId,
	owner: &DeclarationReflection,
	signatures: &[SignatureReflection],
	name: &str,
	kind: DeclarationKind,
	options: &ExcerptOptions,
) -> Result<Option<NamedId>> {
	let live: Vec<&SignatureReflection> = signatures
		.iter()
		.filter(|signature| !signature.inherited_without_target())
		.collect();
	if live.is_empty() {
		return Ok(None);
	}
	let section = model.alloc(section_named(name, Some(owner.id), parent));
	let mut declarations = Vec::new();
	for signature in live {
		declarations.push(signature_declaration(section, owner, signature, kind, options)?);
	}
	model[section].declarations = declarations;
	Ok(Some(section))
}

/// Accumulates one entry page and its exported symbols.
struct EntryBuilder {
	id: String,
	entry: NamedId,
	exports: NamedMap,
	release: Option<Release>,
	format: BuildFormat,
	base: String,
	built: bool,
}

impl EntryBuilder {
	fn new(
		model: &mut DocModel,
		full_name: String,
		id: String,
		format: BuildFormat,
		base: String,
		release: Option<Release>,
	) -> Self {
		let entry = model.alloc(Named {
			name: full_name,
			id: None,
			parent: None,
			kind: NamedKind::Entry,
			heading: Heading::fixed(1, id.clone()),
			href: Some(entry_pathname(&id, &base, format)),
			declarations: Vec::new(),
			headings: Vec::new(),
			release: release.clone(),
			entry: Some(EntryData {
				exports: NamedList::new(Heading::titled(2, "Exports")),
				groups: Vec::new(),
				docs: None,
			}),
		});
		Self {
			id,
			entry,
			exports: NamedMap::new(NamedKind::Export, entry),
			release,
			format,
			base,
			built: false,
		}
	}

	fn add_declaration(
		&mut self,
		model: &mut DocModel,
		reference: RefLike<'_>,
		options: &ExcerptOptions,
	) -> Result<()> {
		self.exports.add_declaration(model, reference, options, false)
	}

	/// Finalize the entry: allocate export slugs, unwrap default exports,
	/// group the overview and run the heading pass.
	fn finish(
		&mut self,
		model: &mut DocModel,
		file_slugger: &mut FileSlugger,
		module: &DeclarationReflection,
	) -> NamedId {
		if self.built {
			return self.entry;
		}

		let mut export_items = Vec::new();
		for named in self.exports.order.clone() {
			let name = model[named].name.clone();
			let slug = file_slugger.slug(&format!("{}/{name}", self.id));
			let href = entry_pathname(&slug, &self.base, self.format);
			model[named].heading.slug = Slug::Fixed(slug);
			model[named].href = Some(href);

			// A name exported with mixed declaration kinds gets kind-specific
			// signature headings instead of the shared one.
			let first_kind = model[named].declarations.first().map(|d| d.kind);
			let mixed = model[named]
				.declarations
				.iter()
				.any(|d| Some(d.kind) != first_kind);
			if mixed {
				for declaration in &mut model[named].declarations {
					declaration.heading.text = Some(format!("{} Signature", declaration.kind));
				}
			}

			if name == "default" {
				// Default exports document on the entry page itself.
				let mut declarations = std::mem::take(&mut model[named].declarations);
				for declaration in &mut declarations {
					declaration.parent = self.entry;
				}
				model[self.entry].declarations.extend(declarations);
			} else {
				set_all_headings(model, named);
				model[named].release = self.release.clone();
				export_items.push(named);
			}
		}

		if let Some(data) = model[self.entry].entry.as_mut() {
			data.exports.items = export_items;
			if let Some(comment) = &module.comment {
				let block = DocsBlock::new(&comment.summary, None);
				if !block.is_empty() {
					data.docs = Some(block);
				}
			}
		}
		let exports = model[self.entry]
			.entry
			.as_ref()
			.map(|data| data.exports.clone());
		if let Some(exports) = exports {
			let groups = export_groups(model, &exports);
			if let Some(data) = model[self.entry].entry.as_mut() {
				data.groups = groups;
			}
		}
		set_all_headings(model, self.entry);

		self.built = true;
		self.entry
	}
}
