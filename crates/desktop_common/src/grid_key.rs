//! Serde adapter that serializes a `BTreeMap<Coordinate, V>` as an object
//! keyed by the canonical `"x,y"` strings instead of nested structs.
//!
//! Use with `#[serde(with = "desktop_common::grid_key")]` on tile maps.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Coordinate;

pub fn serialize<V, S>(map: &BTreeMap<Coordinate, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_map(map.iter().map(|(coordinate, value)| (coordinate.key(), value)))
}

pub fn deserialize<'de, V, D>(deserializer: D) -> Result<BTreeMap<Coordinate, V>, D::Error>
where
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            key.parse::<Coordinate>()
                .map(|coordinate| (coordinate, value))
                .map_err(D::Error::custom)
        })
        .collect()
}
