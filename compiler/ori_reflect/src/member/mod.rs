//! Member descriptors: passive data describing one declared member.
//!
//! A descriptor carries everything lookup needs (name, kind, signature,
//! visibility, traits) and nothing about how the member is executed.
//! Execution is the dispatch host's business.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::host::TypeHost;
use crate::types::TypeId;

/// Kind of member. Lookup is kind-agnostic; invoker compilation branches on it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    Method,
    Constructor,
    Field,
    Property,
}

/// How an argument is passed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum PassBy {
    #[default]
    Value,
    /// By reference: the callee reads and may write the caller's slot.
    Ref,
    /// Output: the callee writes the caller's slot.
    Out,
}

/// One entry of a parameter signature.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParamType {
    pub ty: TypeId,
    pub pass: PassBy,
}

impl ParamType {
    /// A by-value parameter.
    #[inline]
    pub const fn of(ty: TypeId) -> Self {
        ParamType {
            ty,
            pass: PassBy::Value,
        }
    }

    #[inline]
    pub const fn by_ref(ty: TypeId) -> Self {
        ParamType {
            ty,
            pass: PassBy::Ref,
        }
    }

    #[inline]
    pub const fn out(ty: TypeId) -> Self {
        ParamType {
            ty,
            pass: PassBy::Out,
        }
    }
}

/// Ordered parameter types. Most members take four or fewer.
pub type Signature = SmallVec<[ParamType; 4]>;

bitflags! {
    /// Visibility class of a member, and visibility masks used by lookup.
    ///
    /// A member carries exactly one access bit and one binding bit.
    /// A mask admits a member when it shares both an access and a binding bit.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Visibility: u8 {
        const PUBLIC = 1 << 0;
        const NON_PUBLIC = 1 << 1;
        const STATIC = 1 << 2;
        const INSTANCE = 1 << 3;

        const ACCESS = Self::PUBLIC.bits() | Self::NON_PUBLIC.bits();
        const BINDING = Self::STATIC.bits() | Self::INSTANCE.bits();
    }
}

impl Visibility {
    /// Whether this mask admits a member with visibility `member`.
    #[inline]
    pub fn admits(self, member: Visibility) -> bool {
        self.intersects(member & Self::ACCESS) && self.intersects(member & Self::BINDING)
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }
}

bitflags! {
    /// Trait flags of a member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MemberTraits: u8 {
        /// Synthesized to support a higher-level construct (property backing
        /// field or accessor), not authored directly.
        const BACKING = 1 << 0;
        /// Implements an interface member under its qualified name
        /// (`IGreeter.Greet`).
        const EXPLICIT_INTERFACE = 1 << 1;
    }
}

/// Immutable description of one declared member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MemberDescriptor {
    declaring: TypeId,
    name: Arc<str>,
    kind: MemberKind,
    params: Signature,
    value_type: TypeId,
    visibility: Visibility,
    traits: MemberTraits,
}

impl MemberDescriptor {
    /// A public instance member with no parameters returning `void`.
    pub fn new(declaring: TypeId, name: impl Into<Arc<str>>, kind: MemberKind) -> Self {
        MemberDescriptor {
            declaring,
            name: name.into(),
            kind,
            params: Signature::new(),
            value_type: TypeId::VOID,
            visibility: Visibility::PUBLIC | Visibility::INSTANCE,
            traits: MemberTraits::empty(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamType>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Return type for methods and constructors, declared type for fields
    /// and properties.
    #[must_use]
    pub fn with_value_type(mut self, ty: TypeId) -> Self {
        self.value_type = ty;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_traits(mut self, traits: MemberTraits) -> Self {
        self.traits = traits;
        self
    }

    #[inline]
    pub fn declaring(&self) -> TypeId {
        self.declaring
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn traits(&self) -> MemberTraits {
        self.traits
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.visibility.is_static()
    }

    #[inline]
    pub fn is_backing(&self) -> bool {
        self.traits.contains(MemberTraits::BACKING)
    }

    #[inline]
    pub fn is_explicit_interface(&self) -> bool {
        self.traits.contains(MemberTraits::EXPLICIT_INTERFACE)
    }

    /// Name without the interface qualifier of an explicit interface member.
    pub fn simple_name(&self) -> &str {
        if self.is_explicit_interface() {
            crate::matching::simple_name(&self.name)
        } else {
            &self.name
        }
    }

    /// Format the member for diagnostics (requires the host for type names).
    pub fn display<'a, H: TypeHost + ?Sized>(&'a self, host: &'a H) -> MemberDisplay<'a, H> {
        MemberDisplay { member: self, host }
    }
}

/// Helper for displaying a `MemberDescriptor` with resolved type names.
pub struct MemberDisplay<'a, H: ?Sized> {
    member: &'a MemberDescriptor,
    host: &'a H,
}

impl<H: TypeHost + ?Sized> fmt::Display for MemberDisplay<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let member = self.member;
        write_type(f, self.host, member.declaring)?;
        write!(f, "::{}", member.name)?;
        if matches!(member.kind, MemberKind::Field | MemberKind::Property) {
            return Ok(());
        }
        write!(f, "({})", ParamsDisplay::new(&member.params, self.host))
    }
}

/// Comma-separated parameter list with `ref` / `out` prefixes.
pub struct ParamsDisplay<'a, H: ?Sized> {
    params: &'a [ParamType],
    host: &'a H,
}

impl<'a, H: TypeHost + ?Sized> ParamsDisplay<'a, H> {
    pub fn new(params: &'a [ParamType], host: &'a H) -> Self {
        ParamsDisplay { params, host }
    }
}

impl<H: TypeHost + ?Sized> fmt::Display for ParamsDisplay<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match param.pass {
                PassBy::Value => {}
                PassBy::Ref => f.write_str("ref ")?,
                PassBy::Out => f.write_str("out ")?,
            }
            write_type(f, self.host, param.ty)?;
        }
        Ok(())
    }
}

fn write_type<H: TypeHost + ?Sized>(
    f: &mut fmt::Formatter<'_>,
    host: &H,
    ty: TypeId,
) -> fmt::Result {
    match host.type_name(ty) {
        Some(name) => f.write_str(name),
        None => write!(f, "{ty:?}"),
    }
}
