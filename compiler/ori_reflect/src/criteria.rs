//! Lookup criteria: the orthogonal matching dimensions of a member lookup.
//!
//! Names and parameter types are passed next to the criteria on each call;
//! the criteria only say *how* they are compared.

use bitflags::bitflags;

use crate::member::Visibility;

bitflags! {
    /// Name comparison mode. Empty means exact, case-sensitive equality.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NameMatch: u8 {
        /// Fold case before comparing.
        const IGNORE_CASE = 1 << 0;
        /// Match when the member name contains the target.
        const PARTIAL = 1 << 1;
        /// Also match explicit interface members by their unqualified name.
        const EXPLICIT_INTERFACE = 1 << 2;
    }
}

bitflags! {
    /// Parameter comparison mode. Empty means assignment-compatible.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ParamMatch: u8 {
        /// Require identical parameter types.
        const EXACT = 1 << 0;
        /// Disregard by-ref / out qualifiers.
        const IGNORE_MODIFIERS = 1 << 1;
    }
}

bitflags! {
    /// Members to drop from lookup results.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Exclude: u8 {
        const BACKING = 1 << 0;
        const EXPLICIT_INTERFACE = 1 << 1;
    }
}

/// Whether lookup walks up the base-type chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Traversal {
    /// Only members declared directly on the queried type.
    DeclaredOnly,
    /// The queried type, then each ancestor up to (not including) the root.
    #[default]
    IncludeInherited,
}

/// How a lookup compares candidates.
///
/// The default matches names exactly, parameters assignment-compatibly,
/// admits every visibility, includes inherited members and excludes nothing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LookupCriteria {
    pub visibility: Visibility,
    pub traversal: Traversal,
    pub names: NameMatch,
    pub params: ParamMatch,
    pub exclude: Exclude,
}

impl Default for LookupCriteria {
    fn default() -> Self {
        LookupCriteria {
            visibility: Visibility::all(),
            traversal: Traversal::IncludeInherited,
            names: NameMatch::empty(),
            params: ParamMatch::empty(),
            exclude: Exclude::empty(),
        }
    }
}

impl LookupCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn declared_only(mut self) -> Self {
        self.traversal = Traversal::DeclaredOnly;
        self
    }

    #[must_use]
    pub fn include_inherited(mut self) -> Self {
        self.traversal = Traversal::IncludeInherited;
        self
    }

    #[must_use]
    pub fn name_match(mut self, mode: NameMatch) -> Self {
        self.names = mode;
        self
    }

    #[must_use]
    pub fn param_match(mut self, mode: ParamMatch) -> Self {
        self.params = mode;
        self
    }

    #[must_use]
    pub fn exclude(mut self, exclude: Exclude) -> Self {
        self.exclude = exclude;
        self
    }

    #[inline]
    pub fn inherits(&self) -> bool {
        self.traversal == Traversal::IncludeInherited
    }

    /// Whether a single lookup must scan every candidate instead of issuing
    /// one direct exact-name, compatible-signature query per level.
    pub fn requires_full_scan(&self) -> bool {
        self.names
            .intersects(NameMatch::PARTIAL | NameMatch::EXPLICIT_INTERFACE)
            || self.exclude.contains(Exclude::EXPLICIT_INTERFACE)
            || self.params.contains(ParamMatch::IGNORE_MODIFIERS)
    }
}
