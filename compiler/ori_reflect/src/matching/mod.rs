//! Match predicates over member descriptors.
//!
//! Each predicate is a pure function of a descriptor and one criteria
//! dimension. The resolver composes them in a fixed order: name, then
//! parameters, then exclusion.

use crate::criteria::{Exclude, LookupCriteria, NameMatch, ParamMatch};
use crate::host::TypeHost;
use crate::member::{MemberDescriptor, ParamType};

/// Whether `member` matches ANY of `targets` under `mode`.
///
/// With `NameMatch::EXPLICIT_INTERFACE`, the raw name is compared first and
/// an explicit interface member also matches by its unqualified name.
pub fn matches_name(member: &MemberDescriptor, targets: &[&str], mode: NameMatch) -> bool {
    let trimmed = (mode.contains(NameMatch::EXPLICIT_INTERFACE) && member.is_explicit_interface())
        .then(|| simple_name(member.name()));

    targets.iter().any(|target| {
        name_matches(member.name(), target, mode)
            || trimmed.is_some_and(|simple| name_matches(simple, target, mode))
    })
}

/// Compare one name against one target.
pub fn name_matches(name: &str, target: &str, mode: NameMatch) -> bool {
    let ignore_case = mode.contains(NameMatch::IGNORE_CASE);
    match (mode.contains(NameMatch::PARTIAL), ignore_case) {
        (true, true) => name.to_lowercase().contains(&target.to_lowercase()),
        (true, false) => name.contains(target),
        (false, true) => name
            .chars()
            .flat_map(char::to_lowercase)
            .eq(target.chars().flat_map(char::to_lowercase)),
        (false, false) => name == target,
    }
}

/// Whether the declared parameters of `member` accept `provided`.
///
/// Arity must be equal. Without `IGNORE_MODIFIERS` the pass modifiers must be
/// equal too. `EXACT` compares types by identity, otherwise each declared
/// type must be assignable from the provided one.
pub fn matches_params<H: TypeHost + ?Sized>(
    host: &H,
    member: &MemberDescriptor,
    provided: &[ParamType],
    mode: ParamMatch,
) -> bool {
    let declared = member.params();
    if declared.len() != provided.len() {
        return false;
    }

    let exact = mode.contains(ParamMatch::EXACT);
    let check_modifiers = !mode.contains(ParamMatch::IGNORE_MODIFIERS);
    declared.iter().zip(provided).all(|(decl, given)| {
        if check_modifiers && decl.pass != given.pass {
            return false;
        }
        if exact {
            decl.ty == given.ty
        } else {
            host.is_assignable(decl.ty, given.ty)
        }
    })
}

/// Whether `member` survives the exclusion set of `criteria`.
///
/// Explicit interface members are kept when explicit-interface name
/// matching is requested at the same time.
pub fn passes_exclusion(member: &MemberDescriptor, criteria: &LookupCriteria) -> bool {
    if criteria.exclude.contains(Exclude::BACKING) && member.is_backing() {
        return false;
    }
    if criteria.exclude.contains(Exclude::EXPLICIT_INTERFACE)
        && member.is_explicit_interface()
        && !criteria.names.contains(NameMatch::EXPLICIT_INTERFACE)
    {
        return false;
    }
    true
}

/// The part of a qualified name after the last `.`.
pub fn simple_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, simple)| simple)
}
