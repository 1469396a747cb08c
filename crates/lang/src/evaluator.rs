//! Evaluator for Konf programs
//!
//! Walks the semantic tree strictly left to right against a caller-owned
//! [`Environment`]. Constant declarations write into the environment as
//! they are reached, and references read whatever is bound at that moment.
//! Scope is global and temporal, never lexical.

use crate::ast::{Program, RecordEntry, SemanticNode, SourceLocation};
use crate::error::{KonfError, Result};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Fully evaluated value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    /// Keys in first-occurrence order, each holding its last evaluated value
    Record(IndexMap<String, Value>),
    /// Result of a `set` declaration: the name and the bound value
    Declaration { name: String, value: Box<Value> },
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Record(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get the type name for error messages and logs
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Record(_) => "record",
            Value::Declaration { .. } => "declaration",
        }
    }

    /// Convert to JSON value for serialization.
    ///
    /// Records become objects in key order, declarations become
    /// `[name, value]` pairs. Parsed source never yields a non-finite
    /// number, but a host can bind one through [`Environment::define`];
    /// such a number has no JSON form and is written as `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Record(entries) => {
                let mut map = serde_json::Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                JsonValue::Object(map)
            }
            Value::Declaration { name, value } => {
                JsonValue::Array(vec![JsonValue::String(name.clone()), value.to_json()])
            }
        }
    }
}

/// Constant bindings for one evaluation run.
///
/// Each run owns its own instance; nothing is shared between runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier binding. Returns the replaced value.
    ///
    /// Values are stored as given; a non-finite number serializes as `null`.
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names in order of first declaration
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Evaluator borrowing the environment for the length of one run
pub struct Evaluator<'env> {
    env: &'env mut Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Self { env }
    }

    /// Evaluate every top-level value in order.
    ///
    /// The first failure aborts the run; no partial result is returned.
    pub fn evaluate_program(&mut self, program: &Program) -> Result<Vec<Value>> {
        let results = program
            .values
            .iter()
            .map(|node| self.evaluate(node))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            "Evaluated {} top-level values, {} constants bound",
            results.len(),
            self.env.len()
        );
        Ok(results)
    }

    /// Evaluate a single node
    pub fn evaluate(&mut self, node: &SemanticNode) -> Result<Value> {
        match node {
            SemanticNode::Number(n) => Ok(Value::Number(*n)),
            SemanticNode::Record(entries) => self.evaluate_record(entries),
            SemanticNode::ConstDecl { name, value } => self.evaluate_const(name, value),
            SemanticNode::Reference { name, location } => self.resolve(name, *location),
        }
    }

    fn evaluate_record(&mut self, entries: &[RecordEntry]) -> Result<Value> {
        let mut record = IndexMap::with_capacity(entries.len());
        for entry in entries {
            // Every entry runs, even one whose key is overwritten later
            let value = self.evaluate(&entry.value)?;
            record.insert(entry.key.clone(), value);
        }
        Ok(Value::Record(record))
    }

    fn evaluate_const(&mut self, name: &str, value: &SemanticNode) -> Result<Value> {
        let value = self.evaluate(value)?;
        tracing::trace!("Binding constant '{}' to {}", name, value.type_name());

        if self.env.define(name, value.clone()).is_some() {
            tracing::trace!("Constant '{}' redeclared", name);
        }

        Ok(Value::Declaration {
            name: name.to_string(),
            value: Box::new(value),
        })
    }

    fn resolve(&self, name: &str, location: SourceLocation) -> Result<Value> {
        match self.env.lookup(name) {
            Some(value) => {
                tracing::trace!("Resolved reference '{}' at {}", name, location);
                Ok(value.clone())
            }
            None => {
                let err = KonfError::UnboundName {
                    name: name.to_string(),
                    location,
                };
                tracing::debug!("Evaluation failed: {}", err);
                Err(err)
            }
        }
    }
}

/// Evaluate `program` against `env`
pub fn evaluate(program: &Program, env: &mut Environment) -> Result<Vec<Value>> {
    Evaluator::new(env).evaluate_program(program)
}
