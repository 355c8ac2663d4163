//! Type identifiers.
//!
//! Built-in types occupy fixed indices at the front of every type table.
//! Declared classes and interfaces are numbered from `FIRST_DECLARED`.

use std::fmt;

/// Identifier of a type known to a host.
///
/// # Pre-declared Types
/// - `OBJECT`: the universal root, ancestor of every class
/// - `VOID`, `INT`, `FLOAT`, `BOOL`, `STR`: built-in types
/// - `NULL`: type of the null reference, assignable to every reference type
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const OBJECT: TypeId = TypeId(0);
    pub const VOID: TypeId = TypeId(1);
    pub const INT: TypeId = TypeId(2);
    pub const FLOAT: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const STR: TypeId = TypeId(5);
    pub const NULL: TypeId = TypeId(6);

    /// First index handed out to declared types.
    pub const FIRST_DECLARED: u32 = 7;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DECLARED
    }

    /// Value types cannot hold the null reference.
    #[inline]
    pub const fn is_value_type(self) -> bool {
        matches!(self.0, 1..=4)
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OBJECT => write!(f, "TypeId::OBJECT"),
            Self::VOID => write!(f, "TypeId::VOID"),
            Self::INT => write!(f, "TypeId::INT"),
            Self::FLOAT => write!(f, "TypeId::FLOAT"),
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::STR => write!(f, "TypeId::STR"),
            Self::NULL => write!(f, "TypeId::NULL"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}
