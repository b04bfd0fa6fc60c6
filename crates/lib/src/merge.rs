//! Collision-rejecting map union.
//!
//! Two contributors may never define the same rule name, and two schema
//! fragments may never define the same attribute name: a silent overwrite
//! would make build behavior depend on contributor ordering. `merge`
//! therefore fails on the first repeated key and returns no partial
//! result. On success the output is a sorted map, so its shape is
//! identical regardless of the order the inputs were supplied in; order
//! only decides which side of a duplicate-key failure is reported first.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::SchemaError;

/// Union an ordered sequence of mappings, rejecting duplicate keys.
pub fn merge<K, V>(
  mappings: impl IntoIterator<Item = BTreeMap<K, V>>,
) -> Result<BTreeMap<K, V>, SchemaError>
where
  K: Ord + Clone + Display,
{
  let mut merged = BTreeMap::new();
  let mut origin: BTreeMap<K, usize> = BTreeMap::new();

  for (source_index, mapping) in mappings.into_iter().enumerate() {
    for (key, value) in mapping {
      if let Some(&first) = origin.get(&key) {
        return Err(SchemaError::DuplicateKey {
          key: key.to_string(),
          first_source_index: first,
          second_source_index: source_index,
        });
      }
      origin.insert(key.clone(), source_index);
      merged.insert(key, value);
    }
  }

  Ok(merged)
}
