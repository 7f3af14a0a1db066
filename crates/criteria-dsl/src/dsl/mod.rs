//! Module: dsl
//! Responsibility: collecting must/should groups and merging them into one tree.
//! Does not own: the criteria model or query rendering.
//! Boundary: user-facing builder layer.

mod group;
mod merge;

#[cfg(test)]
mod tests;

use crate::{
    criteria::{Combinator, Criteria},
    error::{DslError, EmptyDslError},
};
use tracing::debug;

pub use group::{Group, GroupCollector};

///
/// CriteriaDsl
///
/// Accumulates the must group (every `and` block) and the should group
/// (every `or` block). Nothing is merged until `build`, which can be called
/// any number of times and always recomputes from the accumulated state.
///

#[derive(Clone, Debug, Default)]
pub struct CriteriaDsl {
    must: Group,
    should: Group,
}

impl CriteriaDsl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `block` against a fresh collector and append its contents to the
    /// must group. A failing block leaves the builder unchanged.
    pub fn and<F>(&mut self, block: F) -> Result<&mut Self, DslError>
    where
        F: FnOnce(&mut GroupCollector) -> Result<(), DslError>,
    {
        let group = Self::collect(block)?;
        debug!(
            leaves = group.leaves.len(),
            subtrees = group.subtrees.len(),
            "and block collected"
        );
        self.must.append(group);

        Ok(self)
    }

    /// Run `block` against a fresh collector and append its contents to the
    /// should group. A failing block leaves the builder unchanged.
    pub fn or<F>(&mut self, block: F) -> Result<&mut Self, DslError>
    where
        F: FnOnce(&mut GroupCollector) -> Result<(), DslError>,
    {
        let group = Self::collect(block)?;
        debug!(
            leaves = group.leaves.len(),
            subtrees = group.subtrees.len(),
            "or block collected"
        );
        self.should.append(group);

        Ok(self)
    }

    /// Merge the accumulated groups into the final tree.
    pub fn build(&self) -> Result<Criteria, EmptyDslError> {
        let must = merge::fold_group(&self.must, Combinator::And);
        let should = merge::fold_group(&self.should, Combinator::Or);

        let criteria = merge::merge(must, should)?;
        debug!(
            must = self.must.len(),
            should = self.should.len(),
            chain_len = criteria.chain_len(),
            "criteria built"
        );

        Ok(criteria)
    }

    #[must_use]
    pub const fn must(&self) -> &Group {
        &self.must
    }

    #[must_use]
    pub const fn should(&self) -> &Group {
        &self.should
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty()
    }

    fn collect<F>(block: F) -> Result<Group, DslError>
    where
        F: FnOnce(&mut GroupCollector) -> Result<(), DslError>,
    {
        let mut collector = GroupCollector::new();
        block(&mut collector)?;

        Ok(collector.into_group())
    }
}

/// Construct a builder and run `configure` against it.
///
/// The builder is returned unbuilt so it can still be embedded in another
/// DSL through `GroupCollector::add_dsl`.
pub fn criteria<F>(configure: F) -> Result<CriteriaDsl, DslError>
where
    F: FnOnce(&mut CriteriaDsl) -> Result<(), DslError>,
{
    let mut dsl = CriteriaDsl::new();
    configure(&mut dsl)?;

    Ok(dsl)
}
