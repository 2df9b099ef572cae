use crate::error::SimError;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{self, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Cache for loaded JSON files to avoid repeated disk reads
static JSON_CACHE: Lazy<Mutex<HashMap<PathBuf, Value>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Cache for embedded JSON strings
static EMBEDDED_CACHE: Lazy<Mutex<HashMap<String, Value>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Cached access to JSON config files and embedded JSON tables
pub struct JsonParser;

impl JsonParser {
    /// Load JSON data from a file path, using cache if available
    pub fn load_json<P: AsRef<Path>>(file_path: P) -> Result<Value, SimError> {
        let path_buf = file_path.as_ref().to_path_buf();

        if let Some(json) = JSON_CACHE.lock().map_err(|_| SimError::Poisoned)?.get(&path_buf) {
            return Ok(json.clone());
        }

        let json_str = fs::read_to_string(&path_buf).map_err(|source| SimError::Io {
            path: path_buf.display().to_string(),
            source,
        })?;
        let json: Value = serde_json::from_str(&json_str)?;

        JSON_CACHE
            .lock()
            .map_err(|_| SimError::Poisoned)?
            .insert(path_buf, json.clone());

        Ok(json)
    }

    /// Load JSON data from an embedded string, using cache if available
    pub fn load_json_str(key: &str, json_str: &str) -> Result<Value, SimError> {
        if let Some(json) = EMBEDDED_CACHE.lock().map_err(|_| SimError::Poisoned)?.get(key) {
            return Ok(json.clone());
        }

        let json: Value = serde_json::from_str(json_str)?;

        EMBEDDED_CACHE
            .lock()
            .map_err(|_| SimError::Poisoned)?
            .insert(key.to_string(), json.clone());

        Ok(json)
    }

    /// Load a file and deserialize it into `T`
    pub fn load_typed<T: DeserializeOwned, P: AsRef<Path>>(file_path: P) -> Result<T, SimError> {
        let json = Self::load_json(file_path)?;
        Ok(serde_json::from_value(json)?)
    }

    /// Get a nested value from JSON using a path of keys
    pub fn get_value<'a>(json: &'a Value, path: &[&str]) -> Option<&'a Value> {
        let mut current = json;
        for &key in path {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Get a nested f64 value from JSON using a path of keys
    pub fn get_f64(json: &Value, path: &[&str]) -> Option<f64> {
        Self::get_value(json, path).and_then(|v| v.as_f64())
    }

    /// Get a nested string value from JSON using a path of keys
    pub fn get_str<'a>(json: &'a Value, path: &[&str]) -> Option<&'a str> {
        Self::get_value(json, path).and_then(|v| v.as_str())
    }

    /// Clear all JSON caches
    pub fn clear_cache() -> Result<(), SimError> {
        JSON_CACHE.lock().map_err(|_| SimError::Poisoned)?.clear();
        EMBEDDED_CACHE.lock().map_err(|_| SimError::Poisoned)?.clear();
        Ok(())
    }

    /// Drop a single file from the cache so the next load re-reads disk
    pub fn invalidate<P: AsRef<Path>>(file_path: P) -> Result<(), SimError> {
        JSON_CACHE
            .lock()
            .map_err(|_| SimError::Poisoned)?
            .remove(file_path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_str_caching() {
        let json_str = r#"{
            "name": "test",
            "nested": { "value": 42.5, "label": "hello" }
        }"#;

        let json1 = JsonParser::load_json_str("json_parser_test_key", json_str).unwrap();
        // Same key returns cached value even if the source text differs
        let json2 = JsonParser::load_json_str("json_parser_test_key", "{}").unwrap();
        assert_eq!(json1, json2);

        assert_eq!(JsonParser::get_f64(&json1, &["nested", "value"]), Some(42.5));
        assert_eq!(JsonParser::get_str(&json1, &["nested", "label"]), Some("hello"));
        assert_eq!(JsonParser::get_f64(&json1, &["nested", "missing"]), None);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let result = JsonParser::load_json_str("json_parser_bad_key", "{ not json");
        assert!(matches!(result, Err(SimError::Json(_))));
    }

    #[test]
    fn test_file_loading_and_invalidate() {
        let path = std::env::temp_dir().join(format!("state_change_sim_parser_{}.json", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            write!(file, r#"{{"a": 1.0}}"#).unwrap();
        }
        let json = JsonParser::load_json(&path).unwrap();
        assert_eq!(JsonParser::get_f64(&json, &["a"]), Some(1.0));

        fs::write(&path, r#"{"a": 2.0}"#).unwrap();
        // still cached
        assert_eq!(JsonParser::get_f64(&JsonParser::load_json(&path).unwrap(), &["a"]), Some(1.0));

        JsonParser::invalidate(&path).unwrap();
        assert_eq!(JsonParser::get_f64(&JsonParser::load_json(&path).unwrap(), &["a"]), Some(2.0));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let result = JsonParser::load_json("/definitely/not/here.json");
        assert!(matches!(result, Err(SimError::Io { .. })));
    }
}
