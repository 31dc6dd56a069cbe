//! Structural type tree for the TypeScript-style type language.

use serde::{Deserialize, Serialize};

use super::{DeclarationReflection, ReflectionId, SymbolId};

/// What a type reference points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceTarget {
	/// A declaration inside the documented package.
	Internal {
		/// Id of the referenced declaration.
		id: ReflectionId,
		/// Whether the reference names a type parameter in scope, which is
		/// never cross-linked.
		#[serde(default)]
		type_param: bool,
	},
	/// A symbol in another package, resolvable only via the external hook.
	External(SymbolId),
	/// A bare name the front end could not resolve at all.
	None,
}

/// Literal type values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Literal {
	/// A string literal.
	String(String),
	/// A numeric literal.
	Number(f64),
	/// A boolean literal.
	Boolean(bool),
	/// A bigint literal, stored as its decimal digits.
	BigInt(String),
	/// The `null` literal.
	Null,
}

/// Mapped-type modifier: `+` adds, `-` removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappedModifier {
	/// `+readonly` / `+?`.
	Add,
	/// `-readonly` / `-?`.
	Remove,
}

/// Operators usable in a type-operator construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeOperator {
	/// `keyof T`.
	KeyOf,
	/// `unique symbol`.
	Unique,
	/// `readonly T[]`.
	Readonly,
}

impl TypeOperator {
	/// Source keyword for this operator.
	pub fn keyword(self) -> &'static str {
		match self {
			Self::KeyOf => "keyof",
			Self::Unique => "unique",
			Self::Readonly => "readonly",
		}
	}
}

/// A structural type expression.
///
/// Closed sum type: the excerpt unparser matches exhaustively, so adding a
/// construct is a compile-time-checked exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Type {
	/// `T[]`.
	Array {
		/// Element type.
		element: Box<Type>,
	},
	/// `C extends E ? T : F`.
	Conditional {
		/// Checked type.
		check: Box<Type>,
		/// `extends` bound.
		extends: Box<Type>,
		/// Branch taken when the check holds.
		true_ty: Box<Type>,
		/// Branch taken otherwise.
		false_ty: Box<Type>,
	},
	/// `O[K]`.
	IndexedAccess {
		/// Object type.
		object: Box<Type>,
		/// Index type.
		index: Box<Type>,
	},
	/// `infer X extends C`.
	Inferred {
		/// Inferred type-parameter name.
		name: String,
		/// Optional `extends` constraint.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		constraint: Option<Box<Type>>,
	},
	/// `A & B`.
	Intersection {
		/// Intersected members, in encounter order.
		types: Vec<Type>,
	},
	/// `string`, `number`, `undefined`, `void`, …
	Intrinsic {
		/// Intrinsic name.
		name: String,
	},
	/// A literal type.
	Literal {
		/// Literal value.
		value: Literal,
	},
	/// `{ [K in P as N]: T }` with optional modifiers.
	Mapped {
		/// Iteration parameter name.
		parameter: String,
		/// Type iterated over.
		parameter_type: Box<Type>,
		/// Template applied per key.
		template: Box<Type>,
		/// `as` clause remapping the key.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		name_type: Option<Box<Type>>,
		/// `readonly` modifier.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		readonly_modifier: Option<MappedModifier>,
		/// `?` modifier.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		optional_modifier: Option<MappedModifier>,
	},
	/// `T?` inside a tuple.
	Optional {
		/// Element type.
		element: Box<Type>,
	},
	/// `asserts x is T` / `x is T`.
	Predicate {
		/// Tested parameter name.
		name: String,
		/// Whether this is an `asserts` predicate.
		#[serde(default)]
		asserts: bool,
		/// Asserted type, absent for bare `asserts x`.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		target: Option<Box<Type>>,
	},
	/// `typeof x`.
	Query {
		/// Queried entity.
		target: Box<Type>,
	},
	/// A reference to a named declaration or external symbol.
	Reference {
		/// Display name.
		name: String,
		/// Resolution target.
		target: ReferenceTarget,
		/// Type arguments.
		#[serde(default)]
		type_args: Vec<Type>,
	},
	/// An inline object/function type.
	Reflection {
		/// The anonymous declaration carrying members and signatures.
		declaration: Box<DeclarationReflection>,
	},
	/// `...T` inside a tuple.
	Rest {
		/// Element type.
		element: Box<Type>,
	},
	/// `` `a${T}b` ``.
	TemplateLiteral {
		/// Literal text before the first substitution.
		head: String,
		/// Substitutions, each with its trailing literal text.
		tail: Vec<(Type, String)>,
	},
	/// `[A, B]`.
	Tuple {
		/// Tuple elements, in order.
		elements: Vec<Type>,
	},
	/// `name: T` inside a tuple.
	NamedTupleMember {
		/// Member name.
		name: String,
		/// Whether the member is optional.
		#[serde(default)]
		optional: bool,
		/// Member type.
		element: Box<Type>,
	},
	/// `keyof T`, `readonly T`, `unique T`.
	TypeOperatorCall {
		/// Operator keyword.
		operator: TypeOperator,
		/// Operand.
		target: Box<Type>,
	},
	/// `A | B`.
	Union {
		/// Union members, in encounter order.
		types: Vec<Type>,
	},
	/// A type the front end could not model, carried as raw text.
	Unknown {
		/// Raw source text.
		name: String,
	},
}

impl Type {
	/// Visit every inline object declaration in this type tree, depth-first.
	///
	/// This drives the reflection-passthrough rule: a property whose type
	/// embeds a one-signature function type borrows that signature's docs.
	pub fn for_each_reflection<'a>(&'a self, visit: &mut impl FnMut(&'a DeclarationReflection)) {
		match self {
			Self::Array { element }
			| Self::Optional { element }
			| Self::Rest { element }
			| Self::NamedTupleMember { element, .. } => element.for_each_reflection(visit),
			Self::Conditional {
				check,
				extends,
				true_ty,
				false_ty,
			} => {
				check.for_each_reflection(visit);
				extends.for_each_reflection(visit);
				true_ty.for_each_reflection(visit);
				false_ty.for_each_reflection(visit);
			}
			Self::IndexedAccess { object, index } => {
				object.for_each_reflection(visit);
				index.for_each_reflection(visit);
			}
			Self::Inferred { constraint, .. } => {
				if let Some(constraint) = constraint {
					constraint.for_each_reflection(visit);
				}
			}
			Self::Intersection { types } | Self::Union { types } | Self::Tuple { elements: types } => {
				for ty in types {
					ty.for_each_reflection(visit);
				}
			}
			Self::Mapped {
				parameter_type,
				template,
				name_type,
				..
			} => {
				parameter_type.for_each_reflection(visit);
				template.for_each_reflection(visit);
				if let Some(name_type) = name_type {
					name_type.for_each_reflection(visit);
				}
			}
			Self::Predicate { target, .. } => {
				if let Some(target) = target {
					target.for_each_reflection(visit);
				}
			}
			Self::Query { target } | Self::TypeOperatorCall { target, .. } => {
				target.for_each_reflection(visit);
			}
			Self::Reference { type_args, .. } => {
				for arg in type_args {
					arg.for_each_reflection(visit);
				}
			}
			Self::Reflection { declaration } => visit(declaration),
			Self::TemplateLiteral { tail, .. } => {
				for (ty, _) in tail {
					ty.for_each_reflection(visit);
				}
			}
			Self::Intrinsic { .. } | Self::Literal { .. } | Self::Unknown { .. } => {}
		}
	}
}
