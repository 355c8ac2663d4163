//! Runtime values passed to and returned from members.
//!
//! # Thread Safety
//!
//! Heap-backed values (`Str`, `Object`, `Cell`) are shared through `Arc`.
//! Object field slots and cells use `parking_lot::RwLock`, so values can be
//! handed to invokers running on any thread.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::member::ParamType;
use crate::types::TypeId;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// The null reference.
    Null,
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    Str(Arc<str>),
    /// Instance of a declared type.
    Object(ObjectRef),
    /// Shared mutable slot, passed for by-ref and out parameters.
    Cell(CellRef),
}

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create a fresh instance of `ty` with no fields set.
    #[inline]
    pub fn object(ty: TypeId) -> Self {
        Value::Object(ObjectRef::new(ty))
    }

    /// Create a cell holding `initial`.
    #[inline]
    pub fn cell(initial: Value) -> Self {
        Value::Cell(CellRef::new(initial))
    }

    /// The value an unset slot of type `ty` reads as.
    pub fn default_for(ty: TypeId) -> Self {
        match ty {
            TypeId::INT => Value::Int(0),
            TypeId::FLOAT => Value::Float(0.0),
            TypeId::BOOL => Value::Bool(false),
            _ => Value::Null,
        }
    }

    /// The runtime type of this value.
    ///
    /// A cell reports the type of its current content.
    pub fn runtime_type(&self) -> TypeId {
        match self {
            Value::Null => TypeId::NULL,
            Value::Int(_) => TypeId::INT,
            Value::Float(_) => TypeId::FLOAT,
            Value::Bool(_) => TypeId::BOOL,
            Value::Str(_) => TypeId::STR,
            Value::Object(obj) => obj.type_id(),
            Value::Cell(cell) => cell.get().runtime_type(),
        }
    }

    /// The parameter type a caller passing this value would provide.
    pub fn param_type(&self) -> ParamType {
        match self {
            Value::Cell(_) => ParamType::by_ref(self.runtime_type()),
            _ => ParamType::of(self.runtime_type()),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellRef> {
        match self {
            Value::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}

/// Objects and cells compare by identity, everything else by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Cell(a), Value::Cell(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Object(obj) => write!(f, "Object({:?})", obj.type_id()),
            Value::Cell(cell) => write!(f, "Cell({:?})", cell.get()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

struct ObjectData {
    ty: TypeId,
    fields: RwLock<FxHashMap<String, Value>>,
}

/// Shared handle to an object instance.
///
/// Cloning the handle does not copy the object.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectData>);

impl ObjectRef {
    pub fn new(ty: TypeId) -> Self {
        ObjectRef(Arc::new(ObjectData {
            ty,
            fields: RwLock::new(FxHashMap::default()),
        }))
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.0.ty
    }

    /// Read a field slot. `None` when the slot was never written.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    pub fn set_field(&self, name: &str, value: Value) {
        self.0.fields.write().insert(name.to_owned(), value);
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared mutable slot.
#[derive(Clone)]
pub struct CellRef(Arc<RwLock<Value>>);

impl CellRef {
    pub fn new(initial: Value) -> Self {
        CellRef(Arc::new(RwLock::new(initial)))
    }

    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.write() = value;
    }

    #[inline]
    pub fn ptr_eq(&self, other: &CellRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellRef({:?})", self.get())
    }
}
