use thiserror::Error as ThisError;

///
/// InvalidAtomError
///
/// A chained criteria (more than one chain link) was added to a group
/// as a bare atom. Combine it explicitly or add it as a sub-tree.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error(
    "cannot add a chained criteria ({chain_len} links) as a single atom; combine it first or add it as a sub-tree"
)]
pub struct InvalidAtomError {
    pub chain_len: usize,
}

///
/// EmptyDslError
///
/// Neither the must group nor the should group received a leaf or sub-tree.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("empty criteria DSL: no leaf or sub-tree was added to either group")]
pub struct EmptyDslError;

///
/// DslError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum DslError {
    #[error("{0}")]
    InvalidAtom(#[from] InvalidAtomError),

    #[error("{0}")]
    EmptyDsl(#[from] EmptyDslError),
}
