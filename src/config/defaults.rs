//! Built-in configuration defaults (lowest-precedence layer).

use toml::Value;

/// Built-in service defaults
pub struct BuiltinDefaults;

impl BuiltinDefaults {
    /// Defaults as a TOML value, ready for layer merging.
    pub fn to_value() -> Value {
        Value::Table(toml::toml! {
            [server]
            url = "http://localhost:5000/wps"
            bind = "127.0.0.1:5000"
            language = "en-US"

            [store]
            output_path = "outputs"
            output_url = "http://localhost:5000/outputs"
            cleanup = true
        })
    }
}
