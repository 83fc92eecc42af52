//! SDL → target type name translation
//!
//! Only atomic names are ever looked up in the table. Composite notation
//! (`array<T>`, `T|null`) is peeled, the base name is translated, and the
//! notation is rebuilt around the result.

use schemaweave_core::GeneratorConfig;
use std::collections::BTreeMap;

/// Built-in scalar translations
pub const BUILTIN_TYPE_MAP: [(&str, &str); 5] = [
    ("String", "string"),
    ("Int", "int"),
    ("Float", "float"),
    ("Boolean", "bool"),
    ("ID", "string"),
];

const NULL_SUFFIX: &str = "|null";
const LIST_PREFIX: &str = "array<";

/// Translates SDL type names into target-language type names
pub trait TypeMapper {
    /// Translate an atomic type name; unknown names map to themselves
    fn map_name(&self, name: &str) -> String;

    /// Translate a type string that may use composite notation
    fn to_target_type(&self, sdl_type: &str) -> String {
        if let Some(inner) = sdl_type.strip_suffix(NULL_SUFFIX) {
            return format!("{}{}", self.to_target_type(inner), NULL_SUFFIX);
        }

        if let Some(inner) = sdl_type
            .strip_prefix(LIST_PREFIX)
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return format!("{}{}>", LIST_PREFIX, self.to_target_type(inner));
        }

        self.map_name(sdl_type)
    }
}

/// Table-driven mapper with optional per-name overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultTypeMapper {
    overrides: BTreeMap<String, String>,
}

impl DefaultTypeMapper {
    /// Create a mapper using only the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper whose overrides take precedence over the built-in table
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Create a mapper from `[generator.type_mappings]`
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::with_overrides(config.type_mappings.clone())
    }
}

impl TypeMapper for DefaultTypeMapper {
    fn map_name(&self, name: &str) -> String {
        if let Some(target) = self.overrides.get(name) {
            return target.clone();
        }

        BUILTIN_TYPE_MAP
            .iter()
            .find(|(sdl, _)| *sdl == name)
            .map(|(_, target)| target.to_string())
            .unwrap_or_else(|| name.to_string())
    }
}
