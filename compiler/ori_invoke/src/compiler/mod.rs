//! Invoker compilation: shape to callable.
//!
//! Resolution is exact: the shape's name, its visibility narrowed to its
//! binding, and (when given) its exact signature. Candidates are collected
//! most-derived first, so an override hides the declaration it overrides.
//! Only this module branches on member kind.

use std::sync::Arc;

use tracing::debug;

use ori_reflect::{
    LookupCriteria, MemberDescriptor, MemberKind, ParamMatch, ParamType, Resolver,
    SharedHost, Signature, TypeId, Visibility,
};

use crate::errors::InvokeError;
use crate::invoker::{Invoker, Operation};
use crate::shape::{Access, InvokerShape};

/// Compile `shape` against `host`.
///
/// Fails with `MemberNotFound` when nothing executable matches, and with
/// `AmbiguousShape` when the shape leaves the signature open and the
/// matching overloads disagree. Does not touch any cache.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(target = ?shape.target, name = %shape.name, access = ?shape.access)
)]
pub fn compile(host: &SharedHost, shape: &InvokerShape) -> Result<Invoker, InvokeError> {
    let member = select(host, shape)?;
    debug!(member = %member.display(&**host), "bound");
    bind(host, shape, member)
}

fn select(host: &SharedHost, shape: &InvokerShape) -> Result<MemberDescriptor, InvokeError> {
    let resolver = Resolver::new(&**host);
    let mut criteria = LookupCriteria::new()
        .visibility(shape.lookup_mask())
        .param_match(ParamMatch::EXACT);

    let name: &str = &shape.name;
    let names: &[&str] = if shape.access == Access::Construct {
        criteria = criteria.declared_only();
        &[]
    } else {
        std::slice::from_ref(&name)
    };
    let params = match shape.access {
        Access::Call | Access::Construct => shape.params.as_deref(),
        Access::Get | Access::Set => None,
    };

    let candidates: Vec<MemberDescriptor> = resolver
        .resolve_many(shape.target, params, &criteria, names)
        .into_iter()
        .filter(|m| shape.access.binds(m.kind()))
        .collect();

    // Field and property reads take no index arguments.
    let indexed_read =
        shape.access == Access::Get && shape.params.as_ref().is_some_and(|p| !p.is_empty());

    let Some(first) = candidates.first().filter(|_| !indexed_read) else {
        return Err(InvokeError::MemberNotFound {
            shape: shape.display(&**host).to_string(),
        });
    };

    let open_signature = params.is_none() && matches!(shape.access, Access::Call | Access::Construct);
    if open_signature && candidates.iter().any(|m| m.params() != first.params()) {
        return Err(InvokeError::AmbiguousShape {
            shape: shape.display(&**host).to_string(),
            candidates: candidates
                .iter()
                .map(|m| m.display(&**host).to_string())
                .collect(),
        });
    }
    Ok(first.clone())
}

fn bind(host: &SharedHost, shape: &InvokerShape, member: MemberDescriptor) -> Result<Invoker, InvokeError> {
    let not_found = || InvokeError::MemberNotFound {
        shape: shape.display(&**host).to_string(),
    };
    let value_type = member.value_type();
    let setter_params = || -> Signature { std::iter::once(ParamType::of(value_type)).collect() };

    let (op, params, returns) = match (member.kind(), shape.access) {
        (MemberKind::Method, _) => {
            let body = host.bind(&member).ok_or_else(not_found)?;
            let params = member.params().iter().copied().collect();
            (Operation::Native(body), params, value_type)
        }
        (MemberKind::Constructor, _) => {
            let body = host.bind(&member).ok_or_else(not_found)?;
            let params = member.params().iter().copied().collect();
            (Operation::Construct(body), params, member.declaring())
        }
        (MemberKind::Field, Access::Set) => {
            let op = if member.is_static() {
                let cell = host
                    .static_slot(member.declaring(), member.name())
                    .ok_or_else(not_found)?;
                Operation::StaticSet(cell)
            } else {
                Operation::FieldSet(Arc::from(member.name()))
            };
            (op, setter_params(), TypeId::VOID)
        }
        (MemberKind::Field, _) => {
            let op = if member.is_static() {
                let cell = host
                    .static_slot(member.declaring(), member.name())
                    .ok_or_else(not_found)?;
                Operation::StaticGet(cell)
            } else {
                Operation::FieldGet(Arc::from(member.name()))
            };
            (op, Signature::new(), value_type)
        }
        (MemberKind::Property, Access::Set) => {
            let body = accessor(host, &member, "set_", &setter_params()).ok_or_else(not_found)?;
            (Operation::Native(body), setter_params(), TypeId::VOID)
        }
        (MemberKind::Property, _) => {
            let body = accessor(host, &member, "get_", &[]).ok_or_else(not_found)?;
            (Operation::Native(body), Signature::new(), value_type)
        }
    };

    Ok(Invoker::new(Arc::clone(host), member, op, params, returns))
}

/// Body of the synthesized accessor `prefix + name` declared next to
/// `property`.
fn accessor(
    host: &SharedHost,
    property: &MemberDescriptor,
    prefix: &str,
    params: &[ParamType],
) -> Option<ori_reflect::NativeFn> {
    let binding = if property.is_static() {
        Visibility::STATIC
    } else {
        Visibility::INSTANCE
    };
    let criteria = LookupCriteria::new()
        .declared_only()
        .visibility(Visibility::ACCESS | binding)
        .param_match(ParamMatch::EXACT);
    let name = format!("{prefix}{}", property.name());
    let method = Resolver::new(&**host).resolve_one(property.declaring(), &name, Some(params), &criteria)?;
    if !method.is_backing() || method.kind() != MemberKind::Method {
        return None;
    }
    host.bind(&method)
}
