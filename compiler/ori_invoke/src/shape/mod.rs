//! Invoker shapes: the cache key identifying one compiled binding.

use std::fmt;
use std::sync::Arc;

use ori_reflect::{
    MemberDescriptor, MemberKind, ParamType, ParamsDisplay, Signature, TypeHost, TypeId,
    Visibility,
};

/// What an invoker does with its member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    /// Call a method.
    Call,
    /// Read a field or property.
    Get,
    /// Write a field or property.
    Set,
    /// Run a constructor on a fresh instance.
    Construct,
}

impl Access {
    /// Member kinds this access can bind.
    pub fn binds(self, kind: MemberKind) -> bool {
        match self {
            Access::Call => kind == MemberKind::Method,
            Access::Construct => kind == MemberKind::Constructor,
            Access::Get | Access::Set => {
                matches!(kind, MemberKind::Field | MemberKind::Property)
            }
        }
    }
}

/// Static or instance binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Binding {
    Static,
    Instance,
}

impl Binding {
    pub fn of(member: &MemberDescriptor) -> Self {
        if member.is_static() {
            Binding::Static
        } else {
            Binding::Instance
        }
    }

    /// The visibility bit selecting members with this binding.
    pub fn visibility(self) -> Visibility {
        match self {
            Binding::Static => Visibility::STATIC,
            Binding::Instance => Visibility::INSTANCE,
        }
    }
}

/// Identity of a compiled invoker.
///
/// Two shapes are equal iff every component is equal. `params == None`
/// leaves the signature unspecified; compiling such a shape fails when the
/// name is overloaded with different signatures. Constructors are looked up
/// by kind on the target type alone, so their `name` is ignored.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct InvokerShape {
    pub target: TypeId,
    pub name: Arc<str>,
    pub binding: Binding,
    pub params: Option<Signature>,
    /// Access levels (public / non-public) the member may have.
    pub visibility: Visibility,
    pub access: Access,
}

impl InvokerShape {
    fn new(target: TypeId, name: &str, binding: Binding, access: Access) -> Self {
        InvokerShape {
            target,
            name: Arc::from(name),
            binding,
            params: None,
            visibility: Visibility::ACCESS,
            access,
        }
    }

    /// Instance method `name` on `target`.
    pub fn method(target: TypeId, name: &str) -> Self {
        Self::new(target, name, Binding::Instance, Access::Call)
    }

    /// Static method `name` on `target`.
    pub fn static_method(target: TypeId, name: &str) -> Self {
        Self::new(target, name, Binding::Static, Access::Call)
    }

    /// Constructor of `target`. Constructors bind like instance members
    /// but run without a caller-supplied target.
    pub fn constructor(target: TypeId) -> Self {
        Self::new(target, "", Binding::Instance, Access::Construct)
    }

    /// Read of field or property `name`.
    pub fn getter(target: TypeId, name: &str, binding: Binding) -> Self {
        Self::new(target, name, binding, Access::Get).with_params([])
    }

    /// Write of field or property `name`.
    pub fn setter(target: TypeId, name: &str, binding: Binding) -> Self {
        Self::new(target, name, binding, Access::Set)
    }

    /// The shape that binds exactly `member`.
    pub fn for_member(member: &MemberDescriptor, access: Access) -> Self {
        let mut shape = Self::new(member.declaring(), member.name(), Binding::of(member), access)
            .with_visibility(member.visibility());
        if matches!(access, Access::Call | Access::Construct) {
            shape.params = Some(member.params().iter().copied().collect());
        }
        if access == Access::Get {
            shape.params = Some(Signature::new());
        }
        shape
    }

    /// Fix the parameter signature.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamType>) -> Self {
        self.params = Some(params.into_iter().collect());
        self
    }

    /// Restrict the access levels. Binding bits are taken from `binding`.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility & Visibility::ACCESS;
        self
    }

    /// Visibility mask used to resolve the member.
    pub fn lookup_mask(&self) -> Visibility {
        self.visibility | self.binding.visibility()
    }

    /// Format for diagnostics (requires the host for type names).
    pub fn display<'a, H: TypeHost + ?Sized>(&'a self, host: &'a H) -> ShapeDisplay<'a, H> {
        ShapeDisplay { shape: self, host }
    }
}

/// Helper for displaying an `InvokerShape` with resolved type names.
pub struct ShapeDisplay<'a, H: ?Sized> {
    shape: &'a InvokerShape,
    host: &'a H,
}

impl<H: TypeHost + ?Sized> fmt::Display for ShapeDisplay<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.shape;
        let type_name = self.host.type_name(shape.target);
        match shape.access {
            Access::Get => f.write_str("get ")?,
            Access::Set => f.write_str("set ")?,
            Access::Call if shape.binding == Binding::Static => f.write_str("static ")?,
            Access::Call | Access::Construct => {}
        }
        match type_name {
            Some(name) => f.write_str(name)?,
            None => write!(f, "{:?}", shape.target)?,
        }
        match shape.access {
            Access::Construct => f.write_str("::new")?,
            _ => write!(f, "::{}", shape.name)?,
        }
        if matches!(shape.access, Access::Get | Access::Set) {
            return Ok(());
        }
        match &shape.params {
            Some(params) => write!(f, "({})", ParamsDisplay::new(params, self.host)),
            None => f.write_str("(..)"),
        }
    }
}
