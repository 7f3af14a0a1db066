//! Module: processor
//! Responsibility: rendering a finished criteria tree as a bool-query document.
//! Does not own: tree construction or any query rewriting.
//! Boundary: consumes exactly what `CriteriaDsl::build` returns.


use crate::{
    criteria::{CompareOp, Condition, Criteria, Leaf, Link, Node},
    value::Value,
};
use serde_json::{Map, Value as Json, json};

///
/// QueryProcessor
///
/// Renders criteria into an Elasticsearch-style query DSL document.
///
/// Chains are read with AND binding tighter than OR: consecutive AND links
/// form a `must` run and OR links start a new `should` clause. Embedded
/// sub-trees are rendered recursively as their own bool queries.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct QueryProcessor;

impl QueryProcessor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render `criteria`; a tree with nothing to match on becomes `match_all`.
    #[must_use]
    pub fn create_query(&self, criteria: &Criteria) -> Json {
        Self::render_criteria(criteria)
            .unwrap_or_else(|| json!({ "match_all": {} }))
    }

    fn render_criteria(criteria: &Criteria) -> Option<Json> {
        let mut runs: Vec<Json> = criteria
            .disjuncts()
            .into_iter()
            .filter_map(Self::render_run)
            .collect();

        match runs.len() {
            0 => None,
            1 => runs.pop(),
            _ => Some(json!({
                "bool": {
                    "should": runs,
                    "minimum_should_match": 1
                }
            })),
        }
    }

    fn render_run(run: &[Link]) -> Option<Json> {
        let mut parts: Vec<Json> = run
            .iter()
            .filter_map(|link| Self::render_node(&link.node))
            .collect();

        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(bool_must(parts)),
        }
    }

    fn render_node(node: &Node) -> Option<Json> {
        match node {
            Node::Leaf(leaf) => Self::render_leaf(leaf),
            Node::Sub(sub) => Self::render_criteria(sub),
        }
    }

    // A leaf without conditions contributes nothing.
    fn render_leaf(leaf: &Leaf) -> Option<Json> {
        let mut parts: Vec<Json> = leaf
            .conditions
            .iter()
            .map(|cond| render_condition(&leaf.field, cond))
            .collect();

        let query = match parts.len() {
            0 => return None,
            1 => parts.pop()?,
            _ => bool_must(parts),
        };

        if leaf.negated {
            Some(must_not(query))
        } else {
            Some(query)
        }
    }
}

fn render_condition(field: &str, cond: &Condition) -> Json {
    let value = cond.value.to_json();

    match cond.op {
        CompareOp::Eq => single("term", field, value),
        CompareOp::Ne => must_not(single("term", field, value)),
        CompareOp::Lt => range(field, [("lt", value)]),
        CompareOp::Lte => range(field, [("lte", value)]),
        CompareOp::Gt => range(field, [("gt", value)]),
        CompareOp::Gte => range(field, [("gte", value)]),
        CompareOp::Between => {
            let (lower, upper) = bounds(&cond.value);
            range(field, [("gte", lower), ("lte", upper)])
        }
        CompareOp::In => single("terms", field, list(value)),
        CompareOp::NotIn => must_not(single("terms", field, list(value))),
        CompareOp::Contains => single("wildcard", field, wildcard(&cond.value, "*", "*")),
        CompareOp::StartsWith => single("prefix", field, value),
        CompareOp::EndsWith => single("wildcard", field, wildcard(&cond.value, "*", "")),
        CompareOp::Exists => json!({ "exists": { "field": field } }),
    }
}

fn single(kind: &str, field: &str, value: Json) -> Json {
    let mut inner = Map::new();
    inner.insert(field.to_string(), value);

    let mut outer = Map::new();
    outer.insert(kind.to_string(), Json::Object(inner));

    Json::Object(outer)
}

fn range<const N: usize>(field: &str, entries: [(&str, Json); N]) -> Json {
    let body: Map<String, Json> = entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    single("range", field, Json::Object(body))
}

fn bool_must(parts: Vec<Json>) -> Json {
    json!({ "bool": { "must": parts } })
}

fn must_not(query: Json) -> Json {
    json!({ "bool": { "must_not": [query] } })
}

// `terms` always takes an array.
fn list(value: Json) -> Json {
    if value.is_array() {
        value
    } else {
        Json::Array(vec![value])
    }
}

fn bounds(value: &Value) -> (Json, Json) {
    match value {
        Value::List(items) => (
            items.first().map_or(Json::Null, Value::to_json),
            items.get(1).map_or(Json::Null, Value::to_json),
        ),
        other => (other.to_json(), Json::Null),
    }
}

fn wildcard(value: &Value, prefix: &str, suffix: &str) -> Json {
    let text = match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    };

    let pattern = escape_wildcard(&text);

    Json::String(format!("{prefix}{pattern}{suffix}"))
}

// `*`, `?` and `\` are pattern metacharacters in a wildcard query.
fn escape_wildcard(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}
