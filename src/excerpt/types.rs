//! Unparser for structural types.
//!
//! Emits source-like text for a [`Type`] tree, inserting parentheses from a
//! construct/context table rather than tracking precedence numerically.

use super::{
	ExcerptOptions, Part, call_signature_parts, comment_parts, escape_string,
	index_signature_parts, member_signature_parts, property_parts, resolve_space,
};
use crate::docs::DeferredRef;
use crate::reflect::{
	DeclarationReflection, Literal, MappedModifier, ReferenceTarget, ReflectionKind, Type,
};

/// Syntactic position a type is being emitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
	/// Top level, never parenthesized.
	None,
	/// `T[]` element.
	ArrayElement,
	/// `C extends … ? … : …` check.
	ConditionalCheck,
	/// `… extends E ? … : …` bound.
	ConditionalExtends,
	/// True branch of a conditional.
	ConditionalTrue,
	/// False branch of a conditional.
	ConditionalFalse,
	/// `O[…]` object.
	IndexedObject,
	/// `…[K]` index.
	IndexedIndex,
	/// `infer X extends C` constraint.
	InferredConstraint,
	/// `A & …` member.
	IntersectionElement,
	/// `as` clause of a mapped type.
	MappedName,
	/// `in` clause of a mapped type.
	MappedParameter,
	/// Template of a mapped type.
	MappedTemplate,
	/// `T?` element inside a tuple.
	OptionalElement,
	/// `x is T` target.
	PredicateTarget,
	/// `typeof …` target.
	QueryTarget,
	/// Type argument of a reference.
	ReferenceTypeArg,
	/// `...T` element inside a tuple.
	RestElement,
	/// `${…}` substitution in a template literal.
	TemplateLiteralElement,
	/// Plain tuple element.
	TupleElement,
	/// `keyof …` / `readonly …` / `unique …` operand.
	TypeOperatorTarget,
	/// `A | …` member.
	UnionElement,
}

/// Whether emitting `ty` into `context` requires wrapping parentheses.
pub fn needs_parenthesis(ty: &Type, context: TypeContext) -> bool {
	use TypeContext as C;
	match ty {
		Type::Conditional { .. } | Type::Unknown { .. } => matches!(
			context,
			C::ArrayElement
				| C::ConditionalCheck
				| C::IndexedObject
				| C::IntersectionElement
				| C::OptionalElement
				| C::RestElement
				| C::TypeOperatorTarget
				| C::UnionElement
		),
		Type::Union { .. } => matches!(
			context,
			C::ArrayElement
				| C::ConditionalCheck
				| C::IndexedObject
				| C::IntersectionElement
				| C::OptionalElement
				| C::RestElement
				| C::TypeOperatorTarget
		),
		Type::Intersection { .. } => matches!(
			context,
			C::ArrayElement
				| C::ConditionalCheck
				| C::IndexedObject
				| C::OptionalElement
				| C::RestElement
				| C::TypeOperatorTarget
		),
		Type::TypeOperatorCall { .. } => matches!(
			context,
			C::ArrayElement | C::ConditionalCheck | C::IndexedObject | C::OptionalElement
		),
		Type::Query { .. } => {
			matches!(context, C::ArrayElement | C::IndexedObject | C::OptionalElement)
		}
		Type::Reflection { declaration } if is_arrow(declaration) => matches!(
			context,
			C::ArrayElement
				| C::ConditionalCheck
				| C::IndexedObject
				| C::IntersectionElement
				| C::OptionalElement
				| C::RestElement
				| C::TypeOperatorTarget
				| C::UnionElement
		),
		_ => false,
	}
}

/// Sort weight of a union member. Members sort by descending weight, stably,
/// so literals trail ordinary types and `null` comes last of all.
pub fn union_priority(ty: &Type) -> i32 {
	match ty {
		Type::Literal {
			value: Literal::Null,
		} => -5,
		Type::Literal { .. } => -1,
		Type::Intrinsic { name } if name == "undefined" || name == "void" => -4,
		Type::Intrinsic { .. } => -2,
		Type::Unknown { .. } => -3,
		_ => 0,
	}
}

fn is_arrow(declaration: &DeclarationReflection) -> bool {
	declaration.children.is_empty()
		&& declaration.index_signatures.is_empty()
		&& declaration.signatures.len() == 1
		&& declaration.signatures[0].kind == ReflectionKind::CallSignature
}

/// Emit `ty` into `out`, parenthesizing for `context` when the table says so.
pub(crate) fn type_parts(
	ty: &Type,
	context: TypeContext,
	options: &ExcerptOptions,
	out: &mut Vec<Part>,
) {
	let wrap = needs_parenthesis(ty, context);
	if wrap {
		out.push(Part::text("("));
	}
	bare_type_parts(ty, options, out);
	if wrap {
		out.push(Part::text(")"));
	}
}

fn bare_type_parts(ty: &Type, options: &ExcerptOptions, out: &mut Vec<Part>) {
	match ty {
		Type::Array { element } => {
			type_parts(element, TypeContext::ArrayElement, options, out);
			out.push(Part::text("[]"));
		}
		Type::Conditional {
			check,
			extends,
			true_ty,
			false_ty,
		} => {
			type_parts(check, TypeContext::ConditionalCheck, options, out);
			out.push(Part::text(" extends "));
			type_parts(extends, TypeContext::ConditionalExtends, options, out);
			out.push(Part::text(" ? "));
			type_parts(true_ty, TypeContext::ConditionalTrue, options, out);
			out.push(Part::text(" : "));
			type_parts(false_ty, TypeContext::ConditionalFalse, options, out);
		}
		Type::IndexedAccess { object, index } => {
			type_parts(object, TypeContext::IndexedObject, options, out);
			out.push(Part::text("["));
			type_parts(index, TypeContext::IndexedIndex, options, out);
			out.push(Part::text("]"));
		}
		Type::Inferred { name, constraint } => {
			out.push(Part::text("infer "));
			out.push(Part::text(name.clone()));
			if let Some(constraint) = constraint {
				out.push(Part::text(" extends "));
				type_parts(constraint, TypeContext::InferredConstraint, options, out);
			}
		}
		Type::Intersection { types } => {
			for (i, member) in types.iter().enumerate() {
				if i > 0 {
					out.push(Part::text(" & "));
				}
				type_parts(member, TypeContext::IntersectionElement, options, out);
			}
		}
		Type::Intrinsic { name } => out.push(Part::text(name.clone())),
		Type::Literal { value } => literal_parts(value, out),
		Type::Mapped {
			parameter,
			parameter_type,
			template,
			name_type,
			readonly_modifier,
			optional_modifier,
		} => {
			out.push(Part::text("{ "));
			match readonly_modifier {
				Some(MappedModifier::Add) => out.push(Part::text("readonly ")),
				Some(MappedModifier::Remove) => out.push(Part::text("-readonly ")),
				None => {}
			}
			out.push(Part::text("["));
			out.push(Part::text(parameter.clone()));
			out.push(Part::text(" in "));
			type_parts(parameter_type, TypeContext::MappedParameter, options, out);
			if let Some(name_type) = name_type {
				out.push(Part::text(" as "));
				type_parts(name_type, TypeContext::MappedName, options, out);
			}
			out.push(Part::text("]"));
			match optional_modifier {
				Some(MappedModifier::Add) => out.push(Part::text("?")),
				Some(MappedModifier::Remove) => out.push(Part::text("-?")),
				None => {}
			}
			out.push(Part::text(": "));
			type_parts(template, TypeContext::MappedTemplate, options, out);
			out.push(Part::text(" }"));
		}
		Type::Optional { element } => {
			type_parts(element, TypeContext::OptionalElement, options, out);
			out.push(Part::text("?"));
		}
		Type::Predicate {
			name,
			asserts,
			target,
		} => {
			if *asserts {
				out.push(Part::text("asserts "));
			}
			out.push(Part::text(name.clone()));
			if let Some(target) = target {
				out.push(Part::text(" is "));
				type_parts(target, TypeContext::PredicateTarget, options, out);
			}
		}
		Type::Query { target } => {
			out.push(Part::text("typeof "));
			type_parts(target, TypeContext::QueryTarget, options, out);
		}
		Type::Reference {
			name,
			target,
			type_args,
		} => {
			match target {
				ReferenceTarget::Internal {
					id,
					type_param: false,
				} => out.push(Part::pending(name.clone(), DeferredRef::Declaration(*id))),
				ReferenceTarget::External(symbol) => {
					out.push(Part::pending(name.clone(), DeferredRef::Symbol(symbol.clone())));
				}
				_ => out.push(Part::text(name.clone())),
			}
			if !type_args.is_empty() {
				out.push(Part::text("<"));
				for (i, arg) in type_args.iter().enumerate() {
					if i > 0 {
						out.push(Part::text(", "));
					}
					type_parts(arg, TypeContext::ReferenceTypeArg, options, out);
				}
				out.push(Part::text(">"));
			}
		}
		Type::Reflection { declaration } => reflection_parts(declaration, options, out),
		Type::Rest { element } => {
			out.push(Part::text("..."));
			type_parts(element, TypeContext::RestElement, options, out);
		}
		Type::TemplateLiteral { head, tail } => {
			out.push(Part::text("`"));
			out.push(Part::text(head.clone()));
			for (substitution, text) in tail {
				out.push(Part::text("${"));
				type_parts(substitution, TypeContext::TemplateLiteralElement, options, out);
				out.push(Part::text("}"));
				out.push(Part::text(text.clone()));
			}
			out.push(Part::text("`"));
		}
		Type::Tuple { elements } => {
			out.push(Part::text("["));
			for (i, element) in elements.iter().enumerate() {
				if i > 0 {
					out.push(Part::text(", "));
				}
				type_parts(element, TypeContext::TupleElement, options, out);
			}
			out.push(Part::text("]"));
		}
		Type::NamedTupleMember {
			name,
			optional,
			element,
		} => {
			out.push(Part::text(name.clone()));
			if *optional {
				out.push(Part::text("?"));
			}
			out.push(Part::text(": "));
			type_parts(element, TypeContext::TupleElement, options, out);
		}
		Type::TypeOperatorCall { operator, target } => {
			out.push(Part::text(operator.keyword()));
			out.push(Part::text(" "));
			type_parts(target, TypeContext::TypeOperatorTarget, options, out);
		}
		Type::Union { types } => {
			let mut ordered: Vec<&Type> = types.iter().collect();
			ordered.sort_by_key(|member| std::cmp::Reverse(union_priority(member)));
			for (i, member) in ordered.into_iter().enumerate() {
				if i > 0 {
					out.push(Part::text(" | "));
				}
				type_parts(member, TypeContext::UnionElement, options, out);
			}
		}
		Type::Unknown { name } => out.push(Part::text(name.clone())),
	}
}

fn literal_parts(value: &Literal, out: &mut Vec<Part>) {
	match value {
		Literal::String(text) => out.push(Part::text(escape_string(text))),
		Literal::Number(number) => out.push(Part::text(number.to_string())),
		Literal::Boolean(flag) => out.push(Part::text(flag.to_string())),
		Literal::BigInt(digits) => out.push(Part::text(format!("{digits}n"))),
		Literal::Null => out.push(Part::text("null")),
	}
}

fn reflection_parts(declaration: &DeclarationReflection, options: &ExcerptOptions, out: &mut Vec<Part>) {
	if is_arrow(declaration) {
		call_signature_parts(&declaration.signatures[0], options, Some(" => "), true, out);
		return;
	}
	let indented = options.indented();
	let (open, sep, close) = match resolve_space(options) {
		Some(unit) => (
			format!("{{\n{}", unit.repeat(indented.indent)),
			format!("\n{}", unit.repeat(indented.indent)),
			format!("\n{}}}", unit.repeat(options.indent)),
		),
		None => ("{ ".to_string(), "; ".to_string(), " }".to_string()),
	};
	let mut parts: Vec<Part> = Vec::new();
	for signature in &declaration.signatures {
		match signature.kind {
			ReflectionKind::ConstructorSignature => {
				parts.push(Part::text("new "));
				call_signature_parts(signature, &indented, Some(": "), true, &mut parts);
				parts.push(Part::text(sep.clone()));
			}
			ReflectionKind::CallSignature => {
				call_signature_parts(signature, &indented, Some(": "), true, &mut parts);
				parts.push(Part::text(sep.clone()));
			}
			_ => {}
		}
	}
	for signature in &declaration.index_signatures {
		index_signature_parts(signature, &indented, &mut parts);
		parts.push(Part::text(sep.clone()));
	}
	for child in &declaration.children {
		if options.comments {
			if let Some(comment) = &child.comment {
				parts.push(Part::text(format!("/**{sep} * ")));
				comment_parts(comment, &format!("{sep} * "), &mut parts);
				parts.push(Part::text(format!("{sep} */{sep}")));
			}
		}
		if child.kind == ReflectionKind::Property {
			property_parts(child, &indented, &mut parts);
			parts.push(Part::text(sep.clone()));
		} else {
			for signature in child.non_index_signatures() {
				member_signature_parts(child, signature, &indented, &mut parts);
				parts.push(Part::text(sep.clone()));
			}
		}
	}
	if parts.is_empty() {
		out.push(Part::text("{}"));
		return;
	}
	if options.collapse {
		out.push(Part::text("{ /*...*/ }"));
		return;
	}
	parts.pop();
	out.push(Part::text(open));
	out.append(&mut parts);
	out.push(Part::text(close));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn intrinsic(name: &str) -> Type {
		Type::Intrinsic {
			name: name.to_string(),
		}
	}

	#[test]
	fn unions_wrap_inside_arrays_but_not_inside_unions() {
		let union = Type::Union {
			types: vec![intrinsic("string"), intrinsic("number")],
		};
		assert!(needs_parenthesis(&union, TypeContext::ArrayElement));
		assert!(!needs_parenthesis(&union, TypeContext::UnionElement));
		assert!(!needs_parenthesis(&union, TypeContext::TupleElement));
	}

	#[test]
	fn null_sorts_after_undefined() {
		let null = Type::Literal {
			value: Literal::Null,
		};
		assert!(union_priority(&null) < union_priority(&intrinsic("undefined")));
		assert!(union_priority(&intrinsic("undefined")) < union_priority(&intrinsic("string")));
	}
}
