//! Two-pass cross-reference resolution.
//!
//! Pass one snapshots the final href of every addressable node; hrefs are
//! frozen once the heading pass has run, so the snapshot stays valid while
//! pass two mutates the model. Pass two walks every excerpt, docs block and
//! inheritance backlink and substitutes hrefs in place.

use std::cell::RefCell;
use std::collections::HashMap;

use log::debug;

use crate::docs::DeferredRef;
use crate::reflect::{ReflectionId, SymbolId};

use super::{DocModel, NamedId};

/// Hook resolving symbols that live outside the documented package.
pub type ResolveExternal<'a> = &'a dyn Fn(&SymbolId) -> Option<String>;

/// Resolves deferred references against the built model.
pub struct LinkResolver<'a> {
	hrefs: HashMap<ReflectionId, Option<String>>,
	resolve_external: Option<ResolveExternal<'a>>,
	// External lookups can be costly; memoize per stable key.
	external_memo: RefCell<HashMap<String, Option<String>>>,
}

impl<'a> LinkResolver<'a> {
	/// Snapshot the hrefs of every addressable node in `model`.
	pub fn new(model: &DocModel, resolve_external: Option<ResolveExternal<'a>>) -> Self {
		let mut resolver = Self {
			hrefs: HashMap::new(),
			resolve_external,
			external_memo: RefCell::new(HashMap::new()),
		};
		for &entry in &model.entries {
			resolver.add(model, entry);
			if let Some(data) = &model[entry].entry {
				for &export in &data.exports.items {
					resolver.add(model, export);
				}
			}
		}
		resolver
	}

	fn add(&mut self, model: &DocModel, id: NamedId) {
		let named = &model[id];
		if let Some(reflection_id) = named.id {
			self.hrefs.insert(reflection_id, named.href.clone());
		}
		for declaration in &named.declarations {
			if let Some(reflection_id) = declaration.id {
				self.hrefs
					.insert(reflection_id, model[declaration.parent].href.clone());
			}
			if let Some(container) = &declaration.container {
				for section in [
					container.constructors,
					container.call_signatures,
					container.index_signatures,
				]
				.into_iter()
				.flatten()
				{
					self.add(model, section);
				}
				for &member in container
					.static_members
					.items
					.iter()
					.chain(container.members.items.iter())
				{
					self.add(model, member);
				}
			}
		}
	}

	/// Resolve one deferred reference to a final href.
	///
	/// Internal declarations resolve through the href snapshot; external
	/// symbols go through the caller-supplied hook, memoized by stable key.
	pub fn resolve(&self, reference: &DeferredRef) -> Option<String> {
		match reference {
			DeferredRef::Declaration(id) => match self.hrefs.get(id) {
				Some(href) => href.clone(),
				None => {
					debug!("no addressable node for reflection {}", id.0);
					None
				}
			},
			DeferredRef::Symbol(symbol) => {
				let key = symbol.stable_key();
				if let Some(memoized) = self.external_memo.borrow().get(&key) {
					return memoized.clone();
				}
				let resolved = self.resolve_external.and_then(|hook| hook(symbol));
				self.external_memo
					.borrow_mut()
					.insert(key, resolved.clone());
				resolved
			}
		}
	}

	/// Substitute hrefs into every excerpt, docs block and inheritance
	/// backlink of the model.
	pub fn resolve_all(&self, model: &mut DocModel) {
		let entries = model.entries.clone();
		for entry in entries {
			if let Some(data) = model[entry].entry.as_mut() {
				if let Some(docs) = data.docs.as_mut() {
					docs.resolve(self);
				}
			}
			self.resolve_declarations(model, entry);
			let exports = model[entry]
				.entry
				.as_ref()
				.map(|data| data.exports.items.clone())
				.unwrap_or_default();
			for export in exports {
				self.resolve_declarations(model, export);
			}
		}
	}

	fn resolve_declarations(&self, model: &mut DocModel, id: NamedId) {
		for index in 0..model[id].declarations.len() {
			let declaration = &mut model[id].declarations[index];
			declaration.excerpt.resolve(self);
			declaration.docs.resolve(self);
			if let Some(inherited) = declaration.inherited_from.as_mut() {
				if inherited.href.is_none() {
					let target = DeferredRef::Declaration(inherited.id);
					inherited.href = self.resolve(&target);
				}
			}
			let container = model[id].declarations[index].container.as_ref().map(|c| {
				let mut children: Vec<NamedId> = Vec::new();
				children.extend(
					[c.constructors, c.call_signatures, c.index_signatures]
						.into_iter()
						.flatten(),
				);
				children.extend(c.static_members.items.iter().copied());
				children.extend(c.members.items.iter().copied());
				children
			});
			for child in container.into_iter().flatten() {
				self.resolve_declarations(model, child);
			}
		}
	}
}
