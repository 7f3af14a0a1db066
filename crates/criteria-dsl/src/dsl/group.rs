use crate::{
    criteria::{Criteria, Leaf},
    dsl::CriteriaDsl,
    error::{EmptyDslError, InvalidAtomError},
    field::FieldPath,
};
use tracing::{debug, trace};

///
/// Group
///
/// Ordered leaves and sub-trees of one logical group. Shared by the
/// per-block collector and the builder's running must/should state.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub(crate) leaves: Vec<Criteria>,
    pub(crate) subtrees: Vec<Criteria>,
}

impl Group {
    #[must_use]
    pub fn leaves(&self) -> &[Criteria] {
        &self.leaves
    }

    #[must_use]
    pub fn subtrees(&self) -> &[Criteria] {
        &self.subtrees
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len() + self.subtrees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.subtrees.is_empty()
    }

    /// Append another group's contents, preserving both insertion orders.
    pub(crate) fn append(&mut self, other: Self) {
        self.leaves.extend(other.leaves);
        self.subtrees.extend(other.subtrees);
    }
}

///
/// GroupCollector
///
/// Context handed to an `and` / `or` block. Collects atoms and sub-trees
/// for exactly one block; the builder folds it in when the block returns.
///

#[derive(Debug, Default)]
pub struct GroupCollector {
    group: Group,
    // leaf handed out by `add_field`, still open for conditions
    open: Option<Leaf>,
}

impl GroupCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a single-link criteria as an atom.
    ///
    /// Chained criteria are rejected; combine them first or pass them to
    /// `add_subtree`. Returns the stored node for further refinement.
    pub fn add_leaf(
        &mut self,
        criteria: impl Into<Criteria>,
    ) -> Result<&mut Criteria, InvalidAtomError> {
        let criteria = criteria.into();
        let chain_len = criteria.chain_len();
        if chain_len > 1 {
            debug!(chain_len, "rejected chained criteria added as atom");
            return Err(InvalidAtomError { chain_len });
        }

        trace!(criteria = %criteria, "add leaf");
        self.close_open();
        self.group.leaves.push(criteria);
        let last = self.group.leaves.len() - 1;

        Ok(&mut self.group.leaves[last])
    }

    /// Add a condition-less leaf on `name`; attach conditions through the
    /// returned leaf.
    pub fn add_field(&mut self, name: impl Into<String>) -> &mut Leaf {
        let name = name.into();
        trace!(field = %name, "add field");

        self.close_open();
        self.open.insert(Leaf::new(name))
    }

    /// Same as `add_field`, for a path produced by a `FieldPathResolver`.
    pub fn add_field_ref(&mut self, path: FieldPath) -> &mut Leaf {
        self.add_field(path.into_string())
    }

    /// Embed a finished tree as one opaque sub-tree. Any chain length is allowed.
    pub fn add_subtree(&mut self, subtree: Criteria) {
        trace!(chain_len = subtree.chain_len(), "add subtree");
        self.group.subtrees.push(subtree);
    }

    /// Build a nested DSL and embed the result as a sub-tree.
    pub fn add_dsl(&mut self, dsl: &CriteriaDsl) -> Result<(), EmptyDslError> {
        let subtree = dsl.build()?;
        self.add_subtree(subtree);

        Ok(())
    }

    /// Leaves collected so far, including one still open from `add_field`.
    #[must_use]
    pub fn leaves(&self) -> Vec<Criteria> {
        self.group
            .leaves
            .iter()
            .cloned()
            .chain(self.open.clone().map(Criteria::leaf))
            .collect()
    }

    #[must_use]
    pub fn subtrees(&self) -> &[Criteria] {
        self.group.subtrees()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.group.len() + usize::from(self.open.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.open.is_none()
    }

    pub(crate) fn into_group(mut self) -> Group {
        self.close_open();

        self.group
    }

    fn close_open(&mut self) {
        if let Some(leaf) = self.open.take() {
            self.group.leaves.push(Criteria::leaf(leaf));
        }
    }
}
