use crate::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Between,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
    Exists,
}

impl CompareOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Between => "BETWEEN",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Contains => "CONTAINS",
            Self::StartsWith => "STARTS WITH",
            Self::EndsWith => "ENDS WITH",
            Self::Exists => "EXISTS",
        }
    }
}

///
/// Condition
/// one `op value` entry on a leaf
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Condition {
    pub op: CompareOp,
    pub value: Value,
}

impl Condition {
    #[must_use]
    pub fn new(op: CompareOp, value: impl FieldValue) -> Self {
        Self {
            op,
            value: value.to_value(),
        }
    }
}

///
/// Leaf
///
/// Atomic field predicate: a field path plus the conditions it must satisfy.
/// Conditions on one leaf are conjunctive, so a range is two conditions
/// (`gte` + `lte`) or a single `between`.
///
/// The `&mut` builder methods exist so a leaf can be refined after it has
/// been handed to a group collector.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Leaf {
    pub field: String,
    pub conditions: Vec<Condition>,
    pub negated: bool,
}

impl Leaf {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            conditions: Vec::new(),
            negated: false,
        }
    }

    // --- Equality ---

    pub fn eq(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Eq, value.to_value())
    }

    pub fn ne(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Ne, value.to_value())
    }

    // --- Ordering ---

    pub fn lt(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Lt, value.to_value())
    }

    pub fn lte(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Lte, value.to_value())
    }

    pub fn gt(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Gt, value.to_value())
    }

    pub fn gte(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Gte, value.to_value())
    }

    /// Inclusive range; stored as a two-element list `[lower, upper]`.
    pub fn between(&mut self, lower: impl FieldValue, upper: impl FieldValue) -> &mut Self {
        self.push(
            CompareOp::Between,
            Value::List(vec![lower.to_value(), upper.to_value()]),
        )
    }

    // --- Membership ---

    pub fn in_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: FieldValue,
    {
        let list = values.into_iter().map(|v| v.to_value()).collect();
        self.push(CompareOp::In, Value::List(list))
    }

    pub fn not_in<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: FieldValue,
    {
        let list = values.into_iter().map(|v| v.to_value()).collect();
        self.push(CompareOp::NotIn, Value::List(list))
    }

    // --- Text ---

    pub fn contains(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::Contains, value.to_value())
    }

    pub fn starts_with(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::StartsWith, value.to_value())
    }

    pub fn ends_with(&mut self, value: impl FieldValue) -> &mut Self {
        self.push(CompareOp::EndsWith, value.to_value())
    }

    // --- Presence ---

    pub fn exists(&mut self) -> &mut Self {
        self.push(CompareOp::Exists, Value::Null)
    }

    /// Negate the whole leaf.
    pub fn not(&mut self) -> &mut Self {
        self.negated = !self.negated;
        self
    }

    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    fn push(&mut self, op: CompareOp, value: Value) -> &mut Self {
        self.conditions.push(Condition { op, value });
        self
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grouped = self.negated && self.conditions.len() > 1;
        if self.negated {
            write!(f, "NOT ")?;
        }
        if grouped {
            write!(f, "(")?;
        }

        if self.conditions.is_empty() {
            write!(f, "{}", self.field)?;
        }
        for (i, cond) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            match cond.op {
                CompareOp::Exists => write!(f, "{} EXISTS", self.field)?,
                op => write!(f, "{} {} {}", self.field, op.symbol(), cond.value)?,
            }
        }

        if grouped {
            write!(f, ")")?;
        }

        Ok(())
    }
}
