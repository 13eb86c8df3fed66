//! Deserialization helpers shared by the document model.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Specification extensions (`x-*` keys) attached to an object.
///
/// Deserialized from the flattened remainder of an object; keys without the
/// `x-` prefix are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(pub IndexMap<String, Value>);

impl Extensions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExtensionsVisitor;

        impl<'de> Visitor<'de> for ExtensionsVisitor {
            type Value = Extensions;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of specification extensions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Extensions, A::Error> {
                let mut extensions = IndexMap::new();
                while let Some(key) = map.next_key::<MapKey>()? {
                    if key.0.starts_with("x-") {
                        extensions.insert(key.0, map.next_value::<Value>()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(Extensions(extensions))
            }
        }

        deserializer.deserialize_map(ExtensionsVisitor)
    }
}

/// A map key that may be written as a string or as a bare integer.
///
/// YAML authors commonly write response codes unquoted (`200:`).
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
                Ok(MapKey(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

/// Deserialize a map whose keys may be integers, skipping `x-` extension keys.
///
/// Used for the Paths and Responses objects, which mix their entries with
/// specification extensions at the same level.
pub(crate) fn string_keyed_map<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct MapVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = IndexMap::new();
            while let Some(key) = map.next_key::<MapKey>()? {
                if key.0.starts_with("x-") {
                    map.next_value::<IgnoredAny>()?;
                } else {
                    entries.insert(key.0, map.next_value::<V>()?);
                }
            }
            Ok(entries)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(IndexMap::new())
        }
    }

    deserializer.deserialize_map(MapVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "string_keyed_map")]
        codes: IndexMap<String, String>,
        #[serde(flatten)]
        extensions: Extensions,
    }

    #[test]
    fn test_integer_keys_from_yaml() {
        let holder: Holder = serde_yaml::from_str(
            "codes:\n  200: ok\n  default: fallback\n  x-note: skipped\nx-team: core\nother: 1\n",
        )
        .unwrap();

        let keys: Vec<_> = holder.codes.keys().cloned().collect();
        assert_eq!(keys, vec!["200", "default"]);
        assert_eq!(holder.extensions.keys().collect::<Vec<_>>(), vec!["x-team"]);
    }
}
