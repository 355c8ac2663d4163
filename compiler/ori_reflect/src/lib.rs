//! Ori Reflect - member model and member resolution.
//!
//! This crate answers "which member of this type matches these criteria?"
//! over any host that can describe its types.
//!
//! # Architecture
//!
//! - `TypeHost` / `DispatchHost`: the capability boundary. Everything that
//!   knows how a host stores its types lives behind these two traits.
//! - `MemberDescriptor`: passive, immutable description of one declared member.
//! - `matching`: pure name, parameter and exclusion predicates.
//! - `Resolver`: single and multi lookup with hierarchy traversal and
//!   fast-path / full-scan selection.
//! - `TypeTable`: an in-memory host with classes, interfaces, a universal
//!   root type and native member bodies. Share it with `SharedTypeTable`.
//!
//! # Tracing
//!
//! Resolution emits `trace`-level events for path selection and hierarchy
//! steps. Enable with `RUST_LOG=ori_reflect=trace`.

mod criteria;
mod host;
pub mod matching;
mod member;
mod resolver;
mod shared;
mod table;
mod types;
mod value;

#[cfg(test)]
mod test_helpers;

pub use criteria::{Exclude, LookupCriteria, NameMatch, ParamMatch, Traversal};
pub use host::{DirectQuery, DispatchHost, NativeFn, TypeHost};
pub use member::{
    MemberDescriptor, MemberDisplay, MemberKind, MemberTraits, ParamType, ParamsDisplay, PassBy,
    Signature, Visibility,
};
pub use resolver::Resolver;
pub use shared::{SharedHost, SharedTypeTable};
pub use table::{DeclareError, MemberDecl, TypeCategory, TypeTable};
pub use types::TypeId;
pub use value::{CellRef, ObjectRef, Value};
