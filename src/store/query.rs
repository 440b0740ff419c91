//! Query builder and JSON-level evaluation.
//!
//! Fields are addressed by their serialized name (dots reach into nested
//! objects). Decimal strings compare numerically and ISO dates compare
//! chronologically, because both order correctly once parsed or as text.

use std::cmp;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Comparison operator for a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Field equals any element of an array value.
    In,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A single `field op value` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
    pub value: Value,
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub field: String,
    pub direction: Direction,
}

/// Filter/sort/limit description understood by every [`RecordStore`].
///
/// [`RecordStore`]: super::RecordStore
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: Vec<Condition>,
    orderings: Vec<Ordering>,
    limit: Option<usize>,
}

impl Query {
    /// An empty query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter; all filters must match.
    pub fn filter(mut self, field: impl Into<String>, op: Op, value: Value) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            op,
            value,
        });
        self
    }

    /// Adds a sort key after any existing ones.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.orderings.push(Ordering {
            field: field.into(),
            direction,
        });
        self
    }

    /// Caps the number of returned records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Returns true if the JSON form of a record satisfies every condition.
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|c| {
            let actual = field_value(record, &c.field);
            match c.op {
                Op::Eq => values_equal(actual, &c.value),
                Op::Ne => !values_equal(actual, &c.value),
                Op::Gt => compare(actual, &c.value) == Some(cmp::Ordering::Greater),
                Op::Gte => matches!(
                    compare(actual, &c.value),
                    Some(cmp::Ordering::Greater | cmp::Ordering::Equal)
                ),
                Op::Lt => compare(actual, &c.value) == Some(cmp::Ordering::Less),
                Op::Lte => matches!(
                    compare(actual, &c.value),
                    Some(cmp::Ordering::Less | cmp::Ordering::Equal)
                ),
                Op::In => c
                    .value
                    .as_array()
                    .is_some_and(|options| options.iter().any(|o| values_equal(actual, o))),
            }
        })
    }

    /// Orders two records by the query's sort keys. Nulls sort first.
    pub fn compare_records(&self, left: &Value, right: &Value) -> cmp::Ordering {
        for ordering in &self.orderings {
            let a = field_value(left, &ordering.field);
            let b = field_value(right, &ordering.field);
            let ord = match (a.is_null(), b.is_null()) {
                (true, true) => cmp::Ordering::Equal,
                (true, false) => cmp::Ordering::Less,
                (false, true) => cmp::Ordering::Greater,
                (false, false) => compare(a, b).unwrap_or(cmp::Ordering::Equal),
            };
            let ord = match ordering.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != cmp::Ordering::Equal {
                return ord;
            }
        }
        cmp::Ordering::Equal
    }
}

static NULL: Value = Value::Null;

fn field_value<'a>(record: &'a Value, field: &str) -> &'a Value {
    field
        .split('.')
        .try_fold(record, |value, key| value.get(key))
        .unwrap_or(&NULL)
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    // "50.00" and 50 are the same amount
    if left.is_number() || right.is_number() {
        if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
            return a == b;
        }
    }
    false
}

fn compare(left: &Value, right: &Value) -> Option<cmp::Ordering> {
    if let (Some(a), Some(b)) = (as_decimal(left), as_decimal(right)) {
        return Some(a.cmp(&b));
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(cmp::Ordering::Equal),
        _ => None,
    }
}
