//! Declarative row predicates.
//!
//! A [`Predicate`] is a conjunction of [`Condition`]s, each a
//! field/operator/value triple. Pivot specs use one to pre-filter rows and
//! the drill-down resolver builds one to reproduce a clicked cell, so both
//! sides evaluate exactly the same test.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{ClassifiedRow, Field};

/// Comparison applied to a field's string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Operator {
    Eq(String),
    NotEq(String),
    In(Vec<String>),
}

/// One field/operator/value test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: Field,
    #[serde(flatten)]
    pub op: Operator,
}

impl Condition {
    pub fn eq(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            op: Operator::Eq(value.into()),
        }
    }

    pub fn not_eq(field: Field, value: impl Into<String>) -> Self {
        Self {
            field,
            op: Operator::NotEq(value.into()),
        }
    }

    pub fn is_in<I, S>(field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            op: Operator::In(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn matches(&self, row: &ClassifiedRow) -> bool {
        let value = row.value(self.field);
        match &self.op {
            Operator::Eq(expected) => value == *expected,
            Operator::NotEq(expected) => value != *expected,
            Operator::In(allowed) => allowed.iter().any(|a| *a == value),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            Operator::Eq(v) => write!(f, "{} == '{}'", self.field, v),
            Operator::NotEq(v) => write!(f, "{} != '{}'", self.field, v),
            Operator::In(vs) => write!(f, "{} in [{}]", self.field, vs.join(", ")),
        }
    }
}

/// Conjunction of conditions. An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a condition.
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder: add every condition of another predicate.
    pub fn and_all(mut self, other: &Predicate) -> Self {
        self.conditions.extend(other.conditions.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, row: &ClassifiedRow) -> bool {
        self.conditions.iter().all(|c| c.matches(row))
    }

    /// Rows matching the predicate, in input order.
    pub fn apply(&self, rows: &[ClassifiedRow]) -> Vec<ClassifiedRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conditions.is_empty() {
            return f.write_str("(all rows)");
        }
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        f.write_str(&parts.join(" AND "))
    }
}
