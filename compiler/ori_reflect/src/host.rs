//! Host capabilities.
//!
//! `TypeHost` describes types (declared members, base type, assignability);
//! `DispatchHost` hands out the native body behind a method or constructor.
//! The resolver and the invoker layers only ever talk to a host through
//! these traits.

use std::sync::Arc;

use crate::criteria::{NameMatch, ParamMatch};
use crate::matching;
use crate::member::{MemberDescriptor, ParamType, Visibility};
use crate::types::TypeId;
use crate::value::{CellRef, Value};

/// Native member body: `(target, args) -> result`.
///
/// `target` is `None` for static members and constructors. Arguments arrive
/// already converted to the declared parameter types. `Ok(None)` means the
/// member produced no value.
pub type NativeFn =
    Arc<dyn Fn(Option<&Value>, &[Value]) -> Result<Option<Value>, String> + Send + Sync>;

/// Options of a direct single-member query.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct DirectQuery {
    pub ignore_case: bool,
    pub exact_params: bool,
}

/// Type introspection capability.
pub trait TypeHost {
    /// Members declared directly on `ty` (not its ancestors) admitted by
    /// `mask`, in declaration order. Unknown types have no members.
    fn declared_members(&self, ty: TypeId, mask: Visibility) -> Vec<MemberDescriptor>;

    /// Declared base type, or `None` for the root and for interfaces.
    fn base_of(&self, ty: TypeId) -> Option<TypeId>;

    /// Whether a value of type `source` may be passed where `target` is
    /// declared.
    fn is_assignable(&self, target: TypeId, source: TypeId) -> bool;

    fn type_name(&self, ty: TypeId) -> Option<&str>;

    /// Storage slot of a static field.
    fn static_slot(&self, ty: TypeId, name: &str) -> Option<CellRef>;

    /// The universal root type terminating hierarchy walks.
    fn is_root(&self, ty: TypeId) -> bool {
        ty == TypeId::OBJECT
    }

    /// Direct query for one member declared on `ty` with exactly `name`
    /// (case-folded when asked) whose signature is compatible with `params`.
    ///
    /// When several overloads are compatible, an identical signature wins,
    /// otherwise the first declared. `params == None` returns the first
    /// member with that name.
    fn find_declared(
        &self,
        ty: TypeId,
        name: &str,
        params: Option<&[ParamType]>,
        mask: Visibility,
        query: DirectQuery,
    ) -> Option<MemberDescriptor> {
        let name_mode = if query.ignore_case {
            NameMatch::IGNORE_CASE
        } else {
            NameMatch::empty()
        };
        let param_mode = if query.exact_params {
            ParamMatch::EXACT
        } else {
            ParamMatch::empty()
        };

        let mut named = self
            .declared_members(ty, mask)
            .into_iter()
            .filter(|m| matching::matches_name(m, &[name], name_mode));

        let Some(provided) = params else {
            return named.next();
        };

        let mut first_compatible = None;
        for member in named.filter(|m| matching::matches_params(self, m, provided, param_mode)) {
            if member.params() == provided {
                return Some(member);
            }
            first_compatible.get_or_insert(member);
        }
        first_compatible
    }
}

/// Call dispatch capability.
pub trait DispatchHost: TypeHost {
    /// Native body of a method or constructor. `None` for fields, properties
    /// and members this host does not know.
    fn bind(&self, member: &MemberDescriptor) -> Option<NativeFn>;
}
