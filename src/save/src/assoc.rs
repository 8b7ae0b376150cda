// src/save/src/assoc.rs
//! Serde adapter persisting a keyed map as a sequence of pairs.
//!
//! The in-memory representation stays a real map; only the serialized form
//! is an association list, which keeps the on-disk layout stable and easy
//! to diff. Pairs are emitted in key order.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<K, V, S>(map: &HashMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize + Ord + Hash,
    V: Serialize,
    S: Serializer,
{
    let mut pairs: Vec<(&K, &V)> = map.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    serializer.collect_seq(pairs)
}

pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Flags {
        #[serde(with = "super")]
        flags: HashMap<String, String>,
    }

    #[test]
    fn maps_persist_as_sorted_pair_sequences() {
        let mut flags = HashMap::new();
        flags.insert("b".to_string(), "2".to_string());
        flags.insert("a".to_string(), "1".to_string());

        let json = serde_json::to_string(&Flags { flags }).unwrap();
        assert_eq!(json, r#"{"flags":[["a","1"],["b","2"]]}"#);
    }

    #[test]
    fn pair_sequences_load_back_into_a_map() {
        let loaded: Flags =
            serde_json::from_str(r#"{"flags":[["a","1"],["b","2"]]}"#).unwrap();
        assert_eq!(loaded.flags.len(), 2);
        assert_eq!(loaded.flags["a"], "1");
        assert_eq!(loaded.flags["b"], "2");
    }
}
