use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named string cells owned by one automaton instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBank {
    values: BTreeMap<String, String>,
}

impl RegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank holding the definition's pre-seeded values
    pub fn seeded(seeds: &BTreeMap<String, String>) -> Self {
        Self {
            values: seeds.clone(),
        }
    }

    /// `None` for a register that has never been written
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
