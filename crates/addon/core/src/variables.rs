//! `%name` placeholder substitution over finished documents.
//!
//! A placeholder that makes up a whole string value may be replaced by any
//! JSON value, e.g. `"%damage"` becomes `5`. Inside a longer string only
//! string values can be spliced in. Longer names are substituted first so
//! `%namespace` is never clobbered by a `%name` variable.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{BuildError, Result};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StringVariables {
    vars: BTreeMap<String, Value>,
}

impl StringVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement for `%name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Rewrites every string value (not key) of `doc` in place.
    pub fn apply(&self, doc: &mut Value) -> Result<()> {
        if self.vars.is_empty() {
            return Ok(());
        }
        let mut ordered: Vec<(String, &Value)> = self
            .vars
            .iter()
            .map(|(name, value)| (format!("%{name}"), value))
            .collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        apply_value(doc, &ordered)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StringVariables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.set(k, v);
        }
        vars
    }
}

fn apply_value(value: &mut Value, vars: &[(String, &Value)]) -> Result<()> {
    match value {
        Value::String(s) => {
            if let Some(replacement) = substitute(s, vars)? {
                *value = replacement;
            }
            Ok(())
        }
        Value::Array(items) => items.iter_mut().try_for_each(|v| apply_value(v, vars)),
        Value::Object(map) => map.values_mut().try_for_each(|v| apply_value(v, vars)),
        _ => Ok(()),
    }
}

fn substitute(s: &str, vars: &[(String, &Value)]) -> Result<Option<Value>> {
    if !s.contains('%') {
        return Ok(None);
    }
    if let Some((_, value)) = vars.iter().find(|(pattern, _)| pattern == s) {
        return Ok(Some((*value).clone()));
    }

    let mut out = s.to_owned();
    for (pattern, value) in vars {
        if !out.contains(pattern.as_str()) {
            continue;
        }
        let Value::String(text) = value else {
            return Err(BuildError::VariableType {
                variable: pattern.trim_start_matches('%').to_owned(),
            });
        };
        out = out.replace(pattern.as_str(), text);
    }
    Ok((out != s).then(|| Value::String(out)))
}
