//! In-memory type table.
//!
//! A `TypeTable` is a complete host: it stores classes and interfaces with
//! their bases, implemented interfaces, members and native bodies, answers
//! assignability, and owns static field storage.
//!
//! # Declaration
//!
//! ```text
//! let mut table = TypeTable::new();
//! let animal = table.declare_class("Animal", None)?;
//! table.method(animal, "Speak").returns(TypeId::STR)
//!     .body(|_, _| Ok(Some(Value::string("..."))))
//!     .declare()?;
//! ```
//!
//! Properties synthesize a backing field `<Name>k__BackingField` and the
//! accessor methods `get_Name` / `set_Name`, all flagged `BACKING`.
//!
//! # Thread Safety
//!
//! Declaration needs `&mut self`. Once declared, share the table behind an
//! `Arc`; lookups are read-only and static slots use interior locking.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::host::{DispatchHost, NativeFn, TypeHost};
use crate::member::{
    MemberDescriptor, MemberKind, MemberTraits, ParamType, Signature, Visibility,
};
use crate::types::TypeId;
use crate::value::{CellRef, Value};

/// Category of a declared type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeCategory {
    Builtin,
    Class,
    Interface,
}

/// Errors raised while declaring types and members.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
    #[error("type `{0}` is already declared")]
    DuplicateType(String),
    #[error("unknown type {0:?}")]
    UnknownType(TypeId),
    #[error("`{0}` cannot be used as a base class")]
    InvalidBase(String),
    #[error("`{0}` is not an interface")]
    NotAnInterface(String),
    #[error("`{type_name}` already declares `{member}` with this signature")]
    DuplicateMember { type_name: String, member: String },
    #[error("`{0}` needs a body")]
    MissingBody(String),
    #[error("`{interface}` already extends `{ty}`")]
    CyclicInterface { ty: String, interface: String },
    #[error("type table is full")]
    TooManyTypes,
}

struct TypeDecl {
    name: String,
    category: TypeCategory,
    base: Option<TypeId>,
    interfaces: Vec<TypeId>,
    members: Vec<DeclaredMember>,
}

struct DeclaredMember {
    descriptor: MemberDescriptor,
    body: Option<NativeFn>,
}

/// In-memory host of types and members.
pub struct TypeTable {
    types: Vec<TypeDecl>,
    by_name: FxHashMap<String, TypeId>,
    statics: FxHashMap<TypeId, FxHashMap<String, CellRef>>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    /// Create a table holding the root `object` and the built-in types.
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::with_capacity(32),
            by_name: FxHashMap::default(),
            statics: FxHashMap::default(),
        };
        let builtins = [
            (TypeId::OBJECT, "object", None),
            (TypeId::VOID, "void", Some(TypeId::OBJECT)),
            (TypeId::INT, "int", Some(TypeId::OBJECT)),
            (TypeId::FLOAT, "float", Some(TypeId::OBJECT)),
            (TypeId::BOOL, "bool", Some(TypeId::OBJECT)),
            (TypeId::STR, "str", Some(TypeId::OBJECT)),
            (TypeId::NULL, "null", None),
        ];
        for (id, name, base) in builtins {
            debug_assert_eq!(id.index(), table.types.len());
            table.push_type(id, name, TypeCategory::Builtin, base);
        }
        table
    }

    /// Declare a class. Without an explicit base it derives from `object`.
    pub fn declare_class(&mut self, name: &str, base: Option<TypeId>) -> Result<TypeId, DeclareError> {
        self.ensure_unique(name)?;
        let base = base.unwrap_or(TypeId::OBJECT);
        let base_decl = self.decl(base).ok_or(DeclareError::UnknownType(base))?;
        if base != TypeId::OBJECT && base_decl.category != TypeCategory::Class {
            return Err(DeclareError::InvalidBase(base_decl.name.clone()));
        }
        self.insert_type(name, TypeCategory::Class, Some(base))
    }

    /// Declare an interface. Interfaces have no base type.
    pub fn declare_interface(&mut self, name: &str) -> Result<TypeId, DeclareError> {
        self.ensure_unique(name)?;
        self.insert_type(name, TypeCategory::Interface, None)
    }

    /// Record that `ty` implements (or, for an interface, extends) `interface`.
    ///
    /// Interface extension must stay acyclic: an interface cannot extend
    /// itself or any interface that already extends it.
    pub fn implement(&mut self, ty: TypeId, interface: TypeId) -> Result<(), DeclareError> {
        self.expect_interface(interface)?;
        if self.category(ty) == Some(TypeCategory::Interface) && self.is_assignable(ty, interface) {
            return Err(DeclareError::CyclicInterface {
                ty: self.type_name(ty).unwrap_or_default().to_owned(),
                interface: self.type_name(interface).unwrap_or_default().to_owned(),
            });
        }
        let decl = self.decl_mut(ty)?;
        if !decl.interfaces.contains(&interface) {
            decl.interfaces.push(interface);
        }
        Ok(())
    }

    /// Number of declared types, built-ins included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    pub fn category(&self, ty: TypeId) -> Option<TypeCategory> {
        self.decl(ty).map(|decl| decl.category)
    }

    /// Interfaces `ty` declares directly.
    pub fn interfaces_of(&self, ty: TypeId) -> &[TypeId] {
        self.decl(ty)
            .map(|decl| decl.interfaces.as_slice())
            .unwrap_or_default()
    }

    /// Start declaring a public instance method returning `void`.
    pub fn method(&mut self, ty: TypeId, name: &str) -> MemberDecl<'_> {
        MemberDecl::new(self, ty, name.to_owned(), MemberKind::Method, TypeId::VOID)
    }

    /// Start declaring an explicit implementation of `interface`'s `name`.
    ///
    /// The member is declared under the qualified name `Interface.name`.
    pub fn explicit_method(&mut self, ty: TypeId, interface: TypeId, name: &str) -> MemberDecl<'_> {
        let qualified = match self.type_name(interface) {
            Some(iface) => format!("{iface}.{name}"),
            None => name.to_owned(),
        };
        let mut decl = MemberDecl::new(self, ty, qualified, MemberKind::Method, TypeId::VOID);
        decl.traits |= MemberTraits::EXPLICIT_INTERFACE;
        decl.interface = Some(interface);
        decl
    }

    /// Start declaring a constructor of `ty`.
    ///
    /// The body runs against the freshly allocated instance (as `target`).
    pub fn constructor(&mut self, ty: TypeId) -> MemberDecl<'_> {
        let name = self.type_name(ty).unwrap_or_default().to_owned();
        MemberDecl::new(self, ty, name, MemberKind::Constructor, ty)
    }

    /// Start declaring a field. Fields have no body.
    pub fn field(&mut self, ty: TypeId, name: &str, field_ty: TypeId) -> MemberDecl<'_> {
        MemberDecl::new(self, ty, name.to_owned(), MemberKind::Field, field_ty)
    }

    /// Start declaring a property with synthesized backing members.
    pub fn property(&mut self, ty: TypeId, name: &str, prop_ty: TypeId) -> MemberDecl<'_> {
        MemberDecl::new(self, ty, name.to_owned(), MemberKind::Property, prop_ty)
    }

    fn insert_type(
        &mut self,
        name: &str,
        category: TypeCategory,
        base: Option<TypeId>,
    ) -> Result<TypeId, DeclareError> {
        let id = type_id_at(self.types.len())?;
        self.push_type(id, name, category, base);
        Ok(id)
    }

    fn push_type(&mut self, id: TypeId, name: &str, category: TypeCategory, base: Option<TypeId>) {
        self.types.push(TypeDecl {
            name: name.to_owned(),
            category,
            base,
            interfaces: Vec::new(),
            members: Vec::new(),
        });
        self.by_name.insert(name.to_owned(), id);
    }

    fn ensure_unique(&self, name: &str) -> Result<(), DeclareError> {
        if self.by_name.contains_key(name) {
            return Err(DeclareError::DuplicateType(name.to_owned()));
        }
        Ok(())
    }

    fn expect_interface(&self, ty: TypeId) -> Result<(), DeclareError> {
        let decl = self.decl(ty).ok_or(DeclareError::UnknownType(ty))?;
        if decl.category != TypeCategory::Interface {
            return Err(DeclareError::NotAnInterface(decl.name.clone()));
        }
        Ok(())
    }

    fn decl(&self, ty: TypeId) -> Option<&TypeDecl> {
        self.types.get(ty.index())
    }

    fn decl_mut(&mut self, ty: TypeId) -> Result<&mut TypeDecl, DeclareError> {
        self.types
            .get_mut(ty.index())
            .ok_or(DeclareError::UnknownType(ty))
    }

    /// Fails when `ty` already declares a member of the same name, kind and
    /// parameters as `descriptor`.
    fn ensure_new_member(&self, descriptor: &MemberDescriptor) -> Result<(), DeclareError> {
        let ty = descriptor.declaring();
        let decl = self.decl(ty).ok_or(DeclareError::UnknownType(ty))?;
        let duplicate = decl.members.iter().any(|existing| {
            let other = &existing.descriptor;
            other.name() == descriptor.name()
                && other.kind() == descriptor.kind()
                && other.params() == descriptor.params()
        });
        if duplicate {
            return Err(DeclareError::DuplicateMember {
                type_name: decl.name.clone(),
                member: descriptor.name().to_owned(),
            });
        }
        Ok(())
    }

    fn add_member(&mut self, descriptor: MemberDescriptor, body: Option<NativeFn>) -> Result<(), DeclareError> {
        self.ensure_new_member(&descriptor)?;
        self.decl_mut(descriptor.declaring())?
            .members
            .push(DeclaredMember { descriptor, body });
        Ok(())
    }

    fn new_static_slot(&mut self, ty: TypeId, name: &str, slot_ty: TypeId) -> CellRef {
        let cell = CellRef::new(Value::default_for(slot_ty));
        self.statics
            .entry(ty)
            .or_default()
            .insert(name.to_owned(), cell.clone());
        cell
    }

    /// Declare a property: the property itself, then its backing field and
    /// accessors. Nothing is added unless all four are new.
    fn add_property(&mut self, property: MemberDescriptor) -> Result<(), DeclareError> {
        let ty = property.declaring();
        let name = property.name().to_owned();
        let prop_ty = property.value_type();
        let visibility = property.visibility();
        let binding = visibility & Visibility::BINDING;
        let backing = format!("<{name}>k__BackingField");

        let field = MemberDescriptor::new(ty, backing.clone(), MemberKind::Field)
            .with_value_type(prop_ty)
            .with_visibility(Visibility::NON_PUBLIC | binding)
            .with_traits(MemberTraits::BACKING);
        let get = MemberDescriptor::new(ty, format!("get_{name}"), MemberKind::Method)
            .with_value_type(prop_ty)
            .with_visibility(visibility)
            .with_traits(MemberTraits::BACKING);
        let set = MemberDescriptor::new(ty, format!("set_{name}"), MemberKind::Method)
            .with_params([ParamType::of(prop_ty)])
            .with_visibility(visibility)
            .with_traits(MemberTraits::BACKING);
        for descriptor in [&property, &field, &get, &set] {
            self.ensure_new_member(descriptor)?;
        }

        let (getter, setter) = if property.is_static() {
            let cell = self.new_static_slot(ty, &backing, prop_ty);
            static_accessors(cell)
        } else {
            instance_accessors(&backing, prop_ty)
        };

        self.add_member(property, None)?;
        self.add_member(field, None)?;
        self.add_member(get, Some(getter))?;
        self.add_member(set, Some(setter))
    }
}

/// Id of the type stored at `index`.
fn type_id_at(index: usize) -> Result<TypeId, DeclareError> {
    u32::try_from(index)
        .map(TypeId::from_raw)
        .map_err(|_| DeclareError::TooManyTypes)
}

fn native<F>(body: F) -> NativeFn
where
    F: Fn(Option<&Value>, &[Value]) -> Result<Option<Value>, String> + Send + Sync + 'static,
{
    Arc::new(body)
}

fn static_accessors(cell: CellRef) -> (NativeFn, NativeFn) {
    let read = cell.clone();
    let getter = native(move |_, _| Ok(Some(read.get())));
    let setter = native(move |_, args| {
        cell.set(args.first().cloned().unwrap_or(Value::Null));
        Ok(None)
    });
    (getter, setter)
}

fn instance_accessors(backing: &str, prop_ty: TypeId) -> (NativeFn, NativeFn) {
    let slot = backing.to_owned();
    let getter = native(move |target, _| {
        let obj = target
            .and_then(Value::as_object)
            .ok_or_else(|| format!("`{slot}` read without an instance"))?;
        Ok(Some(
            obj.get_field(&slot)
                .unwrap_or_else(|| Value::default_for(prop_ty)),
        ))
    });
    let slot = backing.to_owned();
    let setter = native(move |target, args| {
        let obj = target
            .and_then(Value::as_object)
            .ok_or_else(|| format!("`{slot}` written without an instance"))?;
        obj.set_field(&slot, args.first().cloned().unwrap_or(Value::Null));
        Ok(None)
    });
    (getter, setter)
}

impl TypeHost for TypeTable {
    fn declared_members(&self, ty: TypeId, mask: Visibility) -> Vec<MemberDescriptor> {
        self.decl(ty).map_or_else(Vec::new, |decl| {
            decl.members
                .iter()
                .filter(|m| mask.admits(m.descriptor.visibility()))
                .map(|m| m.descriptor.clone())
                .collect()
        })
    }

    fn base_of(&self, ty: TypeId) -> Option<TypeId> {
        self.decl(ty).and_then(|decl| decl.base)
    }

    /// Identity, `object` from anything, `int` to `float` widening, null to
    /// any reference type, and derived-to-base / class-to-interface through
    /// the base chain and every implemented interface.
    fn is_assignable(&self, target: TypeId, source: TypeId) -> bool {
        if target == source || target == TypeId::OBJECT {
            return true;
        }
        match (target, source) {
            (TypeId::FLOAT, TypeId::INT) => return true,
            (_, TypeId::NULL) => return !target.is_value_type(),
            _ => {}
        }

        let mut pending = vec![source];
        let mut seen = FxHashSet::default();
        while let Some(ty) = pending.pop() {
            if ty == target {
                return true;
            }
            if !seen.insert(ty) {
                continue;
            }
            if let Some(decl) = self.decl(ty) {
                pending.extend(decl.base);
                pending.extend(decl.interfaces.iter().copied());
            }
        }
        false
    }

    fn type_name(&self, ty: TypeId) -> Option<&str> {
        self.decl(ty).map(|decl| decl.name.as_str())
    }

    fn static_slot(&self, ty: TypeId, name: &str) -> Option<CellRef> {
        self.statics.get(&ty)?.get(name).cloned()
    }
}

impl DispatchHost for TypeTable {
    fn bind(&self, member: &MemberDescriptor) -> Option<NativeFn> {
        self.decl(member.declaring())?
            .members
            .iter()
            .find(|m| m.descriptor == *member)?
            .body
            .clone()
    }
}

/// Builder for one member declaration.
///
/// Defaults: public, instance, no parameters. Finish with [`declare`](Self::declare).
#[must_use = "a member is only added by `declare()`"]
pub struct MemberDecl<'t> {
    table: &'t mut TypeTable,
    ty: TypeId,
    name: String,
    kind: MemberKind,
    params: Signature,
    value_type: TypeId,
    visibility: Visibility,
    traits: MemberTraits,
    interface: Option<TypeId>,
    body: Option<NativeFn>,
}

impl<'t> MemberDecl<'t> {
    fn new(table: &'t mut TypeTable, ty: TypeId, name: String, kind: MemberKind, value_type: TypeId) -> Self {
        MemberDecl {
            table,
            ty,
            name,
            kind,
            params: Signature::new(),
            value_type,
            visibility: Visibility::PUBLIC | Visibility::INSTANCE,
            traits: MemberTraits::empty(),
            interface: None,
            body: None,
        }
    }

    /// Append a by-value parameter.
    pub fn param(mut self, ty: TypeId) -> Self {
        self.params.push(ParamType::of(ty));
        self
    }

    /// Append a by-ref parameter.
    pub fn param_ref(mut self, ty: TypeId) -> Self {
        self.params.push(ParamType::by_ref(ty));
        self
    }

    /// Append an out parameter.
    pub fn param_out(mut self, ty: TypeId) -> Self {
        self.params.push(ParamType::out(ty));
        self
    }

    pub fn returns(mut self, ty: TypeId) -> Self {
        self.value_type = ty;
        self
    }

    pub fn non_public(mut self) -> Self {
        self.visibility = (self.visibility - Visibility::ACCESS) | Visibility::NON_PUBLIC;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.visibility = (self.visibility - Visibility::BINDING) | Visibility::STATIC;
        self
    }

    pub fn traits(mut self, traits: MemberTraits) -> Self {
        self.traits |= traits;
        self
    }

    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Option<Value>, String> + Send + Sync + 'static,
    {
        self.body = Some(native(body));
        self
    }

    /// Add the member to its type and return its descriptor.
    pub fn declare(self) -> Result<MemberDescriptor, DeclareError> {
        let MemberDecl {
            table,
            ty,
            name,
            kind,
            params,
            value_type,
            visibility,
            traits,
            interface,
            body,
        } = self;

        let category = table.category(ty).ok_or(DeclareError::UnknownType(ty))?;
        if let Some(interface) = interface {
            table.expect_interface(interface)?;
        }

        let descriptor = MemberDescriptor::new(ty, name, kind)
            .with_params(params)
            .with_value_type(value_type)
            .with_visibility(visibility)
            .with_traits(traits);

        match kind {
            MemberKind::Method | MemberKind::Constructor => {
                if body.is_none() && category != TypeCategory::Interface {
                    return Err(DeclareError::MissingBody(descriptor.name().to_owned()));
                }
                table.add_member(descriptor.clone(), body)?;
            }
            MemberKind::Field => {
                table.add_member(descriptor.clone(), None)?;
                if descriptor.is_static() {
                    table.new_static_slot(ty, descriptor.name(), value_type);
                }
            }
            MemberKind::Property => table.add_property(descriptor.clone())?,
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests;
