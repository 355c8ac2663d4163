//! Single and multi member lookup.
//!
//! # Paths
//!
//! A single lookup normally takes the **fast path**: one direct
//! exact-name, compatible-signature query per hierarchy level, most-derived
//! first. Partial or explicit-interface name matching, explicit-interface
//! exclusion and modifier-insensitive parameters cannot be answered by a
//! direct query, so those lookups take the **full-scan path** and return the
//! first result of a multi lookup.
//!
//! A multi lookup gathers every candidate level by level (declared order
//! within a level, most-derived level first) and filters by name, then
//! parameters, then exclusion.
//!
//! Hierarchy walks stop before the universal root type.

use tracing::trace;

use crate::criteria::{LookupCriteria, NameMatch, ParamMatch};
use crate::host::{DirectQuery, TypeHost};
use crate::matching;
use crate::member::{MemberDescriptor, ParamType};
use crate::types::TypeId;

/// Member lookup over a borrowed host.
pub struct Resolver<'h, H: TypeHost + ?Sized> {
    host: &'h H,
}

impl<H: TypeHost + ?Sized> Clone for Resolver<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: TypeHost + ?Sized> Copy for Resolver<'_, H> {}

impl<'h, H: TypeHost + ?Sized> Resolver<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Resolver { host }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    /// Find one member named `name` on `ty` (or an ancestor).
    ///
    /// `params == None` imposes no parameter constraint. Returns `None` when
    /// nothing matches.
    ///
    /// On the fast path, exclusion is checked only against the candidate the
    /// direct query returned. A rejected candidate makes the whole lookup
    /// come back empty; no other overload or ancestor is tried.
    #[tracing::instrument(level = "trace", skip(self, params, criteria))]
    pub fn resolve_one(
        &self,
        ty: TypeId,
        name: &str,
        params: Option<&[ParamType]>,
        criteria: &LookupCriteria,
    ) -> Option<MemberDescriptor> {
        if criteria.requires_full_scan() {
            trace!("full scan");
            return self
                .resolve_many(ty, params, criteria, &[name])
                .into_iter()
                .next();
        }

        let query = DirectQuery {
            ignore_case: criteria.names.contains(NameMatch::IGNORE_CASE),
            exact_params: criteria.params.contains(ParamMatch::EXACT),
        };
        let found = self.levels(ty, criteria).find_map(|level| {
            trace!(?level, "direct query");
            self.host
                .find_declared(level, name, params, criteria.visibility, query)
        })?;

        if !criteria.exclude.is_empty() && !matching::passes_exclusion(&found, criteria) {
            trace!(member = found.name(), "fast-path candidate excluded");
            return None;
        }
        Some(found)
    }

    /// Find every member of `ty` (and its ancestors) matching the criteria.
    ///
    /// Empty `names` means no name filter; `params == None` means no
    /// parameter filter. The result is never absent, only possibly empty.
    #[tracing::instrument(level = "trace", skip(self, params, criteria))]
    pub fn resolve_many(
        &self,
        ty: TypeId,
        params: Option<&[ParamType]>,
        criteria: &LookupCriteria,
        names: &[&str],
    ) -> Vec<MemberDescriptor> {
        let unfiltered = names.is_empty() && params.is_none() && criteria.exclude.is_empty();
        if unfiltered && !criteria.inherits() {
            return self.host.declared_members(ty, criteria.visibility);
        }

        let mut candidates: Vec<MemberDescriptor> = self
            .levels(ty, criteria)
            .flat_map(|level| self.host.declared_members(level, criteria.visibility))
            .collect();
        trace!(candidates = candidates.len(), "gathered");

        if !names.is_empty() {
            candidates.retain(|m| matching::matches_name(m, names, criteria.names));
        }
        if let Some(provided) = params {
            candidates.retain(|m| matching::matches_params(self.host, m, provided, criteria.params));
        }
        if !criteria.exclude.is_empty() {
            candidates.retain(|m| matching::passes_exclusion(m, criteria));
        }
        candidates
    }

    /// Whether `ty` or an ancestor declares any member named `name`.
    pub fn has_member(&self, ty: TypeId, name: &str, criteria: &LookupCriteria) -> bool {
        self.resolve_one(ty, name, None, criteria).is_some()
    }

    /// `ty`, then (when inheriting) each ancestor up to but excluding the root.
    fn levels(&self, ty: TypeId, criteria: &LookupCriteria) -> impl Iterator<Item = TypeId> + 'h {
        let host = self.host;
        let inherits = criteria.inherits();
        std::iter::successors(Some(ty), move |&current| {
            if !inherits {
                return None;
            }
            host.base_of(current).filter(|base| !host.is_root(*base))
        })
    }
}
