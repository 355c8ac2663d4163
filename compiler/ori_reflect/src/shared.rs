//! Thread-safe shared host wrappers.

use std::fmt;
use std::sync::Arc;

use crate::host::DispatchHost;
use crate::table::TypeTable;

/// A host shared across threads and invokers.
pub type SharedHost = Arc<dyn DispatchHost + Send + Sync>;

/// Immutable, shareable `TypeTable`.
///
/// Declare everything first, then wrap; the table is read-only afterwards.
pub struct SharedTypeTable(Arc<TypeTable>);

impl SharedTypeTable {
    pub fn new(table: TypeTable) -> Self {
        SharedTypeTable(Arc::new(table))
    }

    /// The table as a type-erased host.
    pub fn host(&self) -> SharedHost {
        self.0.clone()
    }
}

impl Clone for SharedTypeTable {
    fn clone(&self) -> Self {
        SharedTypeTable(Arc::clone(&self.0))
    }
}

impl std::ops::Deref for SharedTypeTable {
    type Target = TypeTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<TypeTable> for SharedTypeTable {
    fn from(table: TypeTable) -> Self {
        SharedTypeTable::new(table)
    }
}

impl fmt::Debug for SharedTypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedTypeTable({} types)", self.0.len())
    }
}
