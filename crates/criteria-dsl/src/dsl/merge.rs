use crate::{
    criteria::{Combinator, Criteria},
    dsl::group::Group,
    error::EmptyDslError,
};

///
/// Fold one group into a single node joined by `combinator`.
///
/// Rules:
/// - leaves are reduced left to right, the first leaf is the seed and is
///   joined by `combinator` even when it is the only leaf
/// - with no leaves, the empty `combinator` sentinel is the seed
/// - every sub-tree is then embedded after the leaf chain, in order
/// - an empty group has no node
///
#[must_use]
pub(crate) fn fold_group(group: &Group, combinator: Combinator) -> Option<Criteria> {
    let mut leaves = group.leaves.iter().cloned();

    let seed = match leaves.next() {
        Some(first) => leaves.fold(first.joined_by(combinator), |acc, next| {
            acc.combine(combinator, next)
        }),
        None if !group.subtrees.is_empty() => Criteria::empty(combinator),
        None => return None,
    };

    let node = group
        .subtrees
        .iter()
        .cloned()
        .fold(seed, Criteria::sub_criteria);

    Some(node)
}

///
/// Combine the must node and the should node into the final tree.
///
/// When both are present the should chain is flattened onto the must chain:
/// each should link is OR-appended, so `must = a AND b`, `should = c OR d`
/// yields the chain `a, b, c(or), d(or)` and never `(a AND b) OR (c OR d)`.
/// Query processors read should members as top-level OR siblings.
///
pub(crate) fn merge(
    must: Option<Criteria>,
    should: Option<Criteria>,
) -> Result<Criteria, EmptyDslError> {
    match (must, should) {
        (None, None) => Err(EmptyDslError),
        (Some(must), None) => Ok(must),
        (None, Some(should)) => Ok(should),
        (Some(must), Some(should)) => Ok(should
            .into_chain()
            .into_iter()
            .map(Criteria::from)
            .fold(must, Criteria::or)),
    }
}
