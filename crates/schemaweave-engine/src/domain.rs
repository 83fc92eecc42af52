//! Field-map contract for generated holders
//!
//! Data and input holders expose their contents through [`FieldMap`]
//! instead of runtime introspection. Nested holders are converted through
//! their own implementation.

use crate::requirements::{EntityRequirement, RequestRequirement, ResolverRequirement, TypedName};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Explicit field → value view of a holder
pub trait FieldMap {
    fn to_field_map(&self) -> BTreeMap<String, Value>;

    /// The field map as a JSON object
    fn to_value(&self) -> Value {
        Value::Object(self.to_field_map().into_iter().collect::<Map<String, Value>>())
    }
}

/// Convert a nested holder
pub fn nested<T: FieldMap + ?Sized>(holder: &T) -> Value {
    holder.to_value()
}

/// Convert a list of nested holders
pub fn nested_list<T: FieldMap>(holders: &[T]) -> Value {
    Value::Array(holders.iter().map(|holder| holder.to_value()).collect())
}

/// Convert an optional nested holder; `None` becomes null
pub fn nested_option<T: FieldMap>(holder: Option<&T>) -> Value {
    holder.map(|holder| holder.to_value()).unwrap_or(Value::Null)
}

fn optional_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// name → rendered type
fn type_map(entries: &[TypedName]) -> Value {
    Value::Object(
        entries
            .iter()
            .map(|entry| (entry.name.clone(), Value::String(entry.ty.to_string())))
            .collect(),
    )
}

impl FieldMap for ResolverRequirement {
    fn to_field_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("type".to_string(), Value::String(self.key.owner.clone()));
        map.insert("field".to_string(), Value::String(self.key.field.clone()));
        map.insert("returnType".to_string(), Value::String(self.return_type.to_string()));
        map.insert("args".to_string(), type_map(&self.arguments));
        map.insert("description".to_string(), optional_string(&self.description));
        map
    }
}

impl FieldMap for EntityRequirement {
    fn to_field_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("fields".to_string(), type_map(&self.fields));
        map.insert("description".to_string(), optional_string(&self.description));
        map
    }
}

impl FieldMap for RequestRequirement {
    fn to_field_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("fields".to_string(), type_map(&self.fields));
        map.insert("description".to_string(), optional_string(&self.description));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{ResolvedType, ResolverKey};
    use serde_json::json;

    struct Address {
        city: String,
    }

    impl FieldMap for Address {
        fn to_field_map(&self) -> BTreeMap<String, Value> {
            BTreeMap::from([("city".to_string(), json!(self.city))])
        }
    }

    struct Customer {
        name: String,
        billing: Option<Address>,
        shipping: Vec<Address>,
    }

    impl FieldMap for Customer {
        fn to_field_map(&self) -> BTreeMap<String, Value> {
            BTreeMap::from([
                ("name".to_string(), json!(self.name)),
                ("billing".to_string(), nested_option(self.billing.as_ref())),
                ("shipping".to_string(), nested_list(&self.shipping)),
            ])
        }
    }

    #[test]
    fn nested_holders_use_their_own_maps() {
        let customer = Customer {
            name: "Ada".to_string(),
            billing: None,
            shipping: vec![Address { city: "Oslo".to_string() }],
        };

        assert_eq!(
            nested(&customer),
            json!({
                "name": "Ada",
                "billing": null,
                "shipping": [{ "city": "Oslo" }]
            })
        );
    }

    #[test]
    fn resolver_field_map() {
        let resolver = ResolverRequirement {
            key: ResolverKey::new("Query", "user"),
            arguments: vec![TypedName::new(
                "id",
                ResolvedType::Named { name: "string".to_string(), nullable: false },
            )],
            return_type: ResolvedType::Named { name: "User".to_string(), nullable: true },
            description: Some("Look up a user".to_string()),
        };

        assert_eq!(
            resolver.to_value(),
            json!({
                "type": "Query",
                "field": "user",
                "returnType": "User|null",
                "args": { "id": "string" },
                "description": "Look up a user"
            })
        );
    }
}
