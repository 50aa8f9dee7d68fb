//! MongoDB-style filter documents, compiled once and matched per record.
//!
//! Supported: implicit equality, `$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`,
//! `$in`, `$nin`, `$exists`, `$not`, `$regex` with `$options` (`i`, `m`, `s`,
//! `x`), and top-level `$and` / `$or`. Anything else is rejected rather than silently ignored.
//! Numbers compare numerically regardless of integer/float encoding; ranges
//! also order strings lexicographically. Mixed-type comparisons never match.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use super::{Record, RecordError};

#[derive(Debug)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Field { name: String, conditions: Vec<Condition> },
}

#[derive(Debug)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Not(Vec<Condition>),
    Regex(Regex),
}

impl Filter {
    /// Compile a filter document. `{}` matches every record.
    ///
    /// # Errors
    ///
    /// Returns an error for non-object filters, unknown operators, malformed
    /// operands and invalid regexes.
    pub fn compile(doc: &Value) -> Result<Self, RecordError> {
        let Value::Object(doc) = doc else {
            return Err(RecordError::InvalidFilter("filter must be a JSON object".to_string()));
        };
        let mut parts = Vec::with_capacity(doc.len());
        for (key, cond) in doc {
            match key.as_str() {
                "$and" => parts.push(Self::And(compile_clauses(key, cond)?)),
                "$or" => parts.push(Self::Or(compile_clauses(key, cond)?)),
                op if op.starts_with('$') => return Err(RecordError::UnsupportedOperator(op.to_string())),
                field => parts.push(Self::Field { name: field.to_string(), conditions: compile_conditions(cond)? }),
            }
        }
        Ok(Self::And(parts))
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::And(parts) => parts.iter().all(|p| p.matches(record)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(record)),
            Self::Field { name, conditions } => {
                let value = record.get(name);
                conditions.iter().all(|c| c.matches(value))
            }
        }
    }
}

impl Condition {
    fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Self::Eq(expected) => equals(value, expected),
            Self::Ne(expected) => !equals(value, expected),
            Self::Gt(bound) => ordering(value, bound) == Some(Ordering::Greater),
            Self::Gte(bound) => matches!(ordering(value, bound), Some(Ordering::Greater | Ordering::Equal)),
            Self::Lt(bound) => ordering(value, bound) == Some(Ordering::Less),
            Self::Lte(bound) => matches!(ordering(value, bound), Some(Ordering::Less | Ordering::Equal)),
            Self::In(options) => options.iter().any(|o| equals(value, o)),
            Self::Nin(options) => !options.iter().any(|o| equals(value, o)),
            Self::Exists(expected) => value.is_some() == *expected,
            Self::Not(inner) => !inner.iter().all(|c| c.matches(value)),
            Self::Regex(re) => value
                .and_then(Value::as_str)
                .map_or(false, |s| re.is_match(s)),
        }
    }
}

fn compile_clauses(key: &str, cond: &Value) -> Result<Vec<Filter>, RecordError> {
    let Some(clauses) = cond.as_array().filter(|c| !c.is_empty()) else {
        return Err(RecordError::InvalidFilter(format!("{key} expects a non-empty array")));
    };
    clauses.iter().map(Filter::compile).collect()
}

fn compile_conditions(cond: &Value) -> Result<Vec<Condition>, RecordError> {
    let Value::Object(ops) = cond else {
        return Ok(vec![Condition::Eq(cond.clone())]);
    };
    let operator_count = ops.keys().filter(|k| k.starts_with('$')).count();
    if operator_count == 0 {
        return Ok(vec![Condition::Eq(cond.clone())]);
    }
    if operator_count != ops.len() {
        return Err(RecordError::InvalidFilter("cannot mix operators and fields in one condition".to_string()));
    }

    let mut conditions = Vec::with_capacity(ops.len());
    for (op, operand) in ops {
        let condition = match op.as_str() {
            "$eq" => Condition::Eq(operand.clone()),
            "$ne" => Condition::Ne(operand.clone()),
            "$gt" => Condition::Gt(operand.clone()),
            "$gte" => Condition::Gte(operand.clone()),
            "$lt" => Condition::Lt(operand.clone()),
            "$lte" => Condition::Lte(operand.clone()),
            "$in" => Condition::In(array_operand(op, operand)?),
            "$nin" => Condition::Nin(array_operand(op, operand)?),
            "$exists" => Condition::Exists(truthy_operand(operand)?),
            "$not" => {
                let is_operator_doc = operand
                    .as_object()
                    .is_some_and(|o| !o.is_empty() && o.keys().all(|k| k.starts_with('$')));
                if !is_operator_doc {
                    return Err(RecordError::InvalidFilter("$not expects an operator document".to_string()));
                }
                Condition::Not(compile_conditions(operand)?)
            }
            "$regex" => Condition::Regex(compile_regex(operand, ops)?),
            "$options" if ops.contains_key("$regex") => continue,
            "$options" => return Err(RecordError::InvalidFilter("$options requires $regex".to_string())),
            other => return Err(RecordError::UnsupportedOperator(other.to_string())),
        };
        conditions.push(condition);
    }
    Ok(conditions)
}

fn array_operand(op: &str, operand: &Value) -> Result<Vec<Value>, RecordError> {
    operand
        .as_array()
        .cloned()
        .ok_or_else(|| RecordError::InvalidFilter(format!("{op} expects an array")))
}

/// `$exists` takes a boolean; numbers count as true unless zero.
fn truthy_operand(operand: &Value) -> Result<bool, RecordError> {
    match operand {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64() != Some(0.0)),
        _ => Err(RecordError::InvalidFilter("$exists expects a boolean".to_string())),
    }
}

fn compile_regex(pattern: &Value, ops: &Map<String, Value>) -> Result<Regex, RecordError> {
    let Some(pattern) = pattern.as_str() else {
        return Err(RecordError::InvalidFilter("$regex expects a string".to_string()));
    };
    let options = ops.get("$options").and_then(Value::as_str).unwrap_or("");
    RegexBuilder::new(pattern)
        .case_insensitive(options.contains('i'))
        .multi_line(options.contains('m'))
        .dot_matches_new_line(options.contains('s'))
        .ignore_whitespace(options.contains('x'))
        .build()
        .map_err(|e| RecordError::InvalidRegex(e.to_string()))
}

fn equals(value: Option<&Value>, expected: &Value) -> bool {
    match (value, expected) {
        (None, Value::Null) => true,
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(a), b) => a == b,
    }
}

fn ordering(value: Option<&Value>, bound: &Value) -> Option<Ordering> {
    match (value?, bound) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
