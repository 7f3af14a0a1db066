//! Module: criteria
//! Responsibility: the criteria tree model and its combination primitives.
//! Does not own: must/should merge policy (see `dsl`) or query rendering.
//! Boundary: every tree handed to a query processor is a `Criteria`.

mod leaf;


use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

pub use leaf::{CompareOp, Condition, Leaf};

///
/// Combinator
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

///
/// Node
/// one chain element: a leaf predicate or an opaque embedded sub-tree
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Node {
    Leaf(Leaf),
    Sub(Criteria),
}

///
/// Link
///
/// A chain element plus the combinator joining it to the elements before it.
/// The first link's combinator is carried but has no logical effect.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Link {
    pub combinator: Combinator,
    pub node: Node,
}

impl Link {
    #[must_use]
    pub const fn is_or(&self) -> bool {
        matches!(self.combinator, Combinator::Or)
    }
}

///
/// Criteria
///
/// An ordered chain of links. AND binds tighter than OR when the chain is read,
/// so `[a, b(and), c(or)]` means `(a AND b) OR c`.
///
/// `combinator` is the tag given to sub-trees appended with `sub_criteria`;
/// it is set by whichever operation produced the node.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Criteria {
    combinator: Combinator,
    chain: Vec<Link>,
}

impl Criteria {
    // --- Construction ---

    /// Single-leaf criteria on `field` with no conditions yet.
    #[must_use]
    pub fn field(field: impl Into<String>) -> Self {
        Self::leaf(Leaf::new(field))
    }

    #[must_use]
    pub fn leaf(leaf: Leaf) -> Self {
        Self {
            combinator: Combinator::And,
            chain: vec![Link {
                combinator: Combinator::And,
                node: Node::Leaf(leaf),
            }],
        }
    }

    /// Chain with no links, used to seed a fold that starts from nothing.
    #[must_use]
    pub const fn empty(combinator: Combinator) -> Self {
        Self {
            combinator,
            chain: Vec::new(),
        }
    }

    fn with_leaf(field: impl Into<String>, build: impl FnOnce(&mut Leaf)) -> Self {
        let mut leaf = Leaf::new(field);
        build(&mut leaf);

        Self::leaf(leaf)
    }

    pub fn eq(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.eq(value);
        })
    }

    pub fn ne(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.ne(value);
        })
    }

    pub fn lt(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.lt(value);
        })
    }

    pub fn lte(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.lte(value);
        })
    }

    pub fn gt(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.gt(value);
        })
    }

    pub fn gte(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.gte(value);
        })
    }

    pub fn between(
        field: impl Into<String>,
        lower: impl FieldValue,
        upper: impl FieldValue,
    ) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.between(lower, upper);
        })
    }

    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: FieldValue,
    {
        Self::with_leaf(field, |leaf| {
            leaf.in_list(values);
        })
    }

    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: FieldValue,
    {
        Self::with_leaf(field, |leaf| {
            leaf.not_in(values);
        })
    }

    pub fn contains(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.contains(value);
        })
    }

    pub fn starts_with(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.starts_with(value);
        })
    }

    pub fn ends_with(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.ends_with(value);
        })
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::with_leaf(field, |leaf| {
            leaf.exists();
        })
    }

    // --- Inspection ---

    #[must_use]
    pub const fn combinator(&self) -> Combinator {
        self.combinator
    }

    #[must_use]
    pub fn chain(&self) -> &[Link] {
        &self.chain
    }

    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    #[must_use]
    pub fn into_chain(self) -> Vec<Link> {
        self.chain
    }

    /// The leaf of a single-leaf criteria.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self.chain.as_slice() {
            [Link {
                node: Node::Leaf(leaf),
                ..
            }] => Some(leaf),
            _ => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self.chain.as_mut_slice() {
            [Link {
                node: Node::Leaf(leaf),
                ..
            }] => Some(leaf),
            _ => None,
        }
    }

    /// Split the chain at every OR link. Each run is a conjunction; the
    /// criteria holds when any run holds.
    #[must_use]
    pub fn disjuncts(&self) -> Vec<&[Link]> {
        let mut runs = Vec::new();
        let mut start = 0;

        for (i, link) in self.chain.iter().enumerate().skip(1) {
            if link.is_or() {
                runs.push(&self.chain[start..i]);
                start = i;
            }
        }
        if start < self.chain.len() {
            runs.push(&self.chain[start..]);
        }

        runs
    }

    // --- Combination ---

    /// Append `other`'s chain, joining its first link with `combinator`.
    /// Later links of `other` keep their own tags.
    #[must_use]
    pub fn combine(mut self, combinator: Combinator, other: Self) -> Self {
        let mut links = other.chain.into_iter();
        if let Some(first) = links.next() {
            self.chain.push(Link {
                combinator,
                node: first.node,
            });
        }
        self.chain.extend(links);
        self.combinator = combinator;

        self
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.combine(Combinator::And, other)
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.combine(Combinator::Or, other)
    }

    /// Same chain, joined by `combinator` from here on. Sub-trees embedded
    /// afterwards take this tag.
    #[must_use]
    pub(crate) const fn joined_by(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;

        self
    }

    /// Embed `subtree` as one opaque link, tagged with this node's combinator.
    #[must_use]
    pub fn sub_criteria(mut self, subtree: Self) -> Self {
        self.chain.push(Link {
            combinator: self.combinator,
            node: Node::Sub(subtree),
        });

        self
    }
}

impl From<Link> for Criteria {
    fn from(link: Link) -> Self {
        Self {
            combinator: link.combinator,
            chain: vec![link],
        }
    }
}

impl From<Leaf> for Criteria {
    fn from(leaf: Leaf) -> Self {
        Self::leaf(leaf)
    }
}

impl BitAnd for Criteria {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for Criteria {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{leaf}"),
            Self::Sub(sub) => write!(f, "({sub})"),
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chain.is_empty() {
            return write!(f, "EMPTY");
        }

        let runs = self.disjuncts();
        let bracket = runs.len() > 1;

        for (i, run) in runs.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", Combinator::Or.keyword())?;
            }

            let wrap = bracket && run.len() > 1;
            if wrap {
                write!(f, "(")?;
            }
            for (j, link) in run.iter().enumerate() {
                if j > 0 {
                    write!(f, " {} ", Combinator::And.keyword())?;
                }
                write!(f, "{}", link.node)?;
            }
            if wrap {
                write!(f, ")")?;
            }
        }

        Ok(())
    }
}
