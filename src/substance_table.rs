//! Keyed table of substance properties.
//!
//! The built-in table ships as `substances.json` inside the crate; custom
//! tables with the same shape can be loaded from disk. Every entry is
//! validated on load, so lookups hand out properties the resolver can trust.

use crate::error::SimError;
use crate::json_parser::JsonParser;
use crate::substance::{normalize_key, SubstanceProperties, SubstanceType};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const EMBEDDED_SUBSTANCES: &str = include_str!("substances.json");
const EMBEDDED_KEY: &str = "builtin_substances";

static BUILTIN_TABLE: OnceCell<SubstanceTable> = OnceCell::new();

#[derive(Clone, Debug, Default)]
pub struct SubstanceTable {
    entries: BTreeMap<String, Arc<SubstanceProperties>>,
}

impl SubstanceTable {
    /// The table compiled into the crate. Parsed on first use.
    pub fn builtin() -> Result<&'static SubstanceTable, SimError> {
        BUILTIN_TABLE.get_or_try_init(|| {
            let json = JsonParser::load_json_str(EMBEDDED_KEY, EMBEDDED_SUBSTANCES)?;
            let raw: BTreeMap<String, SubstanceProperties> = serde_json::from_value(json)?;
            Self::from_entries(raw)
        })
    }

    /// Parse a table from a JSON object of `key -> properties`.
    /// Not cached: every call parses `json_str` afresh.
    pub fn from_json_str(json_str: &str) -> Result<Self, SimError> {
        let raw: BTreeMap<String, SubstanceProperties> = serde_json::from_str(json_str)?;
        Self::from_entries(raw)
    }

    /// Load a table from a JSON file on disk
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, SimError> {
        let raw: BTreeMap<String, SubstanceProperties> = JsonParser::load_typed(file_path.as_ref())?;
        debug!(path = %file_path.as_ref().display(), count = raw.len(), "loaded substance table");
        Self::from_entries(raw)
    }

    fn from_entries(raw: BTreeMap<String, SubstanceProperties>) -> Result<Self, SimError> {
        let mut table = SubstanceTable::default();
        for (key, props) in raw {
            table.insert(&key, props)?;
        }
        Ok(table)
    }

    /// Add or replace an entry after validating it
    pub fn insert(&mut self, name: &str, props: SubstanceProperties) -> Result<(), SimError> {
        props.validate()?;
        self.entries.insert(normalize_key(name), Arc::new(props));
        Ok(())
    }

    /// Look up by table key or display name
    pub fn get(&self, name: &str) -> Result<Arc<SubstanceProperties>, SimError> {
        self.entries
            .get(&normalize_key(name))
            .cloned()
            .ok_or_else(|| SimError::UnknownSubstance(name.to_string()))
    }

    pub fn get_type(&self, substance: SubstanceType) -> Result<Arc<SubstanceProperties>, SimError> {
        self.get(substance.key())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_key(name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubstanceProperties)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtin_has_every_substance_type() {
        let table = SubstanceTable::builtin().unwrap();
        assert_eq!(table.len(), SubstanceType::COUNT);
        for t in SubstanceType::ALL {
            assert!(table.get_type(t).is_ok(), "missing {}", t);
        }
    }

    #[test]
    fn water_values() {
        let water = SubstanceTable::builtin().unwrap().get("Water").unwrap();
        assert_eq!(water.melting_point, 0.0);
        assert_eq!(water.boiling_point, 100.0);
        assert_eq!(water.heat_capacity_liquid, 4.18);
        assert_eq!(water.latent_heat_fusion, 333.55);
        assert_eq!(water.latent_heat_vaporization, 2257.0);
    }

    #[test]
    fn lookup_by_display_name() {
        let table = SubstanceTable::builtin().unwrap();
        assert!(table.contains("Sodium Chloride"));
        assert_eq!(table.get("sodium chloride").unwrap().formula, "NaCl");
        assert!(matches!(table.get("unobtainium"), Err(SimError::UnknownSubstance(_))));
    }

    #[test]
    fn invalid_entry_rejects_whole_table() {
        let json = r#"{
            "backwards": {
                "name": "Backwards",
                "melting_point": 100.0,
                "boiling_point": 0.0,
                "heat_capacity_solid": 1.0,
                "heat_capacity_liquid": 1.0,
                "heat_capacity_gas": 1.0,
                "latent_heat_fusion": 1.0,
                "latent_heat_vaporization": 1.0,
                "molar_mass": 1.0,
                "density_solid": 1.0,
                "density_liquid": 1.0,
                "density_gas": 1.0
            }
        }"#;
        let result = SubstanceTable::from_json_str(json);
        assert!(matches!(result, Err(SimError::InvalidProperties { .. })));
    }

    #[test]
    fn missing_field_is_a_json_error() {
        let json = r#"{ "partial": { "name": "Partial", "melting_point": 1.0 } }"#;
        let result = SubstanceTable::from_json_str(json);
        assert!(matches!(result, Err(SimError::Json(_))));
    }

    fn one_substance_table(melting_point: f64) -> String {
        format!(
            r#"{{
                "sample": {{
                    "name": "Sample",
                    "melting_point": {},
                    "boiling_point": 100.0,
                    "heat_capacity_solid": 1.0,
                    "heat_capacity_liquid": 1.0,
                    "heat_capacity_gas": 1.0,
                    "latent_heat_fusion": 1.0,
                    "latent_heat_vaporization": 1.0,
                    "molar_mass": 1.0,
                    "density_solid": 1.0,
                    "density_liquid": 1.0,
                    "density_gas": 1.0
                }}
            }}"#,
            melting_point
        )
    }

    #[test]
    fn each_string_is_parsed_on_its_own() {
        let a = SubstanceTable::from_json_str(&one_substance_table(0.0)).unwrap();
        let b = SubstanceTable::from_json_str(&one_substance_table(-50.0)).unwrap();
        assert_eq!(a.get("sample").unwrap().melting_point, 0.0);
        assert_eq!(b.get("sample").unwrap().melting_point, -50.0);
    }

    #[test]
    fn custom_table_from_file() {
        let path = std::env::temp_dir().join(format!("state_change_sim_table_{}.json", std::process::id()));
        fs::write(&path, EMBEDDED_SUBSTANCES).unwrap();

        let table = SubstanceTable::from_file(&path).unwrap();
        assert_eq!(table.len(), SubstanceType::COUNT);
        assert_eq!(table.keys().next(), Some("ethanol"));

        fs::remove_file(&path).unwrap();
    }
}
