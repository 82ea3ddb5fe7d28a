use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// One complete assignment of a value to every dimension.
///
/// Entries keep the engine's dimension order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Combination {
    entries: Vec<(String, Value)>,
}

impl Combination {
    pub(crate) fn new(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    /// Value selected for the dimension `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every name/value pair into `table`, replacing existing keys.
    pub fn apply_to(&self, table: &mut HashMap<String, Value>) {
        for (name, value) in &self.entries {
            table.insert(name.clone(), value.clone());
        }
    }

    /// `name=identifier` pairs joined with `;`, stable across runs.
    pub fn identifier(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{n}={}", v.identifier()))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn into_map(self) -> HashMap<String, Value> {
        self.entries.into_iter().collect()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            writeln!(f, "{name}: [{value}]")?;
        }
        Ok(())
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Combination {
        Combination::new(vec![
            ("Size".to_string(), Value::from("Extra Large")),
            ("Count".to_string(), Value::from(3)),
        ])
    }

    #[test]
    fn test_lookup_and_identifier() {
        let combination = sample();
        assert_eq!(combination.get("Count"), Some(&Value::Int(3)));
        assert_eq!(combination.get("Missing"), None);
        assert_eq!(combination.identifier(), "Size=Extra_Large;Count=3");
    }

    #[test]
    fn test_apply_to_overwrites_existing_keys() {
        let mut table = HashMap::new();
        table.insert("Size".to_string(), Value::from("Small"));
        table.insert("Other".to_string(), Value::Bool(true));
        sample().apply_to(&mut table);
        assert_eq!(table["Size"], Value::from("Extra Large"));
        assert_eq!(table["Other"], Value::Bool(true));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"Size":"Extra Large","Count":3}"#);
    }
}
