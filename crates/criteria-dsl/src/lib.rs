//! Criteria DSL: builds boolean search criteria (field predicates joined by
//! AND/OR, with nested sub-trees) into one tree for a downstream query processor.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod criteria;
pub mod dsl;
pub mod error;
pub mod field;
pub mod processor;
pub mod value;

pub use dsl::criteria;

///
/// Prelude
///
/// Everything a DSL block needs; errors are imported explicitly.
///

pub mod prelude {
    pub use crate::{
        criteria::{Combinator, CompareOp, Criteria, Leaf},
        dsl::{CriteriaDsl, GroupCollector, criteria},
        field::{DotPath, FieldPath, FieldPathMap, FieldPathResolver, FieldRef},
        processor::QueryProcessor,
        value::{FieldValue, Value},
    };
}
