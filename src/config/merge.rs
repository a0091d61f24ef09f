//! Deep merge for configuration layers.

use toml::Value;

/// Merge `overlay` into `base`.
///
/// Tables merge recursively; any other value in the overlay replaces the base
/// value wholesale (arrays included).
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_table.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge layers in precedence order (later layers win).
pub fn merge_layers(layers: Vec<Value>) -> Value {
    let mut iter = layers.into_iter();
    let mut merged = iter.next().unwrap_or(Value::Table(toml::map::Map::new()));
    for layer in iter {
        deep_merge(&mut merged, layer);
    }
    merged
}
