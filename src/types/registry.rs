//! # Type Registry
//!
//! Built once through `TypeRegistryBuilder`, then read-only. There is no way
//! to register on a built registry, so sharing it behind an `Arc` across
//! threads is safe.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use super::builtin::{
    ArrayType, BooleanType, DateTimeType, DateType, EmailType, FloatType, HostnameType,
    IntegerType, IpType, ObjectType, TextType, TimeType, UrlType, UuidType,
};
use super::errors::{TypeError, TypeResult};
use super::value_type::ValueType;

/// Collects types in registration order.
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    entries: Vec<(TypeId, Arc<dyn ValueType>)>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the built-in types.
    ///
    /// Guessable order: uuid, email, url, datetime, date, time, ip, integer,
    /// float, boolean. Integer precedes float so `"42"` guesses integer.
    pub fn with_defaults() -> TypeResult<Self> {
        Self::new()
            .register(TextType::new())?
            .register(UuidType::new())?
            .register(EmailType::new()?)?
            .register(UrlType::new()?)?
            .register(DateTimeType::new())?
            .register(DateType::new())?
            .register(TimeType::new())?
            .register(IpType::new())?
            .register(HostnameType::new()?)?
            .register(IntegerType::new())?
            .register(FloatType::new())?
            .register(BooleanType::new())?
            .register(ArrayType::new())?
            .register(ObjectType::new())
    }

    /// Register a type. Names must be unique.
    ///
    /// Registration order is the guessing priority: the first guessable type
    /// that accepts a string wins.
    pub fn register<T: ValueType + 'static>(mut self, value_type: T) -> TypeResult<Self> {
        if self.entries.iter().any(|(_, t)| t.name() == value_type.name()) {
            return Err(TypeError::AlreadyRegistered(value_type.name().to_string()));
        }
        self.entries.push((TypeId::of::<T>(), Arc::new(value_type)));
        Ok(self)
    }

    /// Freeze into a read-only registry
    pub fn build(self) -> TypeRegistry {
        let mut by_name = HashMap::with_capacity(self.entries.len());
        let mut by_id = HashMap::with_capacity(self.entries.len());
        let mut ordered = Vec::with_capacity(self.entries.len());

        for (id, value_type) in self.entries {
            by_name.insert(value_type.name().to_string(), Arc::clone(&value_type));
            // Several instances of one Rust type: identity lookup finds the first.
            by_id.entry(id).or_insert_with(|| Arc::clone(&value_type));
            ordered.push(value_type);
        }

        let guessable = ordered
            .iter()
            .filter(|t| t.is_guessable())
            .cloned()
            .collect();

        TypeRegistry {
            by_name,
            by_id,
            ordered,
            guessable,
        }
    }
}

/// Read-only catalog of value types
#[derive(Debug)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<dyn ValueType>>,
    by_id: HashMap<TypeId, Arc<dyn ValueType>>,
    ordered: Vec<Arc<dyn ValueType>>,
    /// Guessable types in registration order, computed at build time
    guessable: Vec<Arc<dyn ValueType>>,
}

impl TypeRegistry {
    /// Start a new registry
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Registry holding the built-in types
    pub fn with_defaults() -> TypeResult<Self> {
        Ok(TypeRegistryBuilder::with_defaults()?.build())
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> TypeResult<Arc<dyn ValueType>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| TypeError::NotFound(name.to_string()))
    }

    /// Get a type by its Rust identity
    pub fn get_by_id<T: ValueType + 'static>(&self) -> TypeResult<Arc<dyn ValueType>> {
        self.by_id
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or_else(|| TypeError::NotFound(std::any::type_name::<T>().to_string()))
    }

    /// Check if a type name is registered
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Guessable types in registration order
    pub fn guessable_types(&self) -> &[Arc<dyn ValueType>] {
        &self.guessable
    }

    /// All type names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|t| t.name()).collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtin::PatternType;

    #[test]
    fn test_register_and_get() {
        let registry = TypeRegistry::builder()
            .register(TextType::new())
            .unwrap()
            .register(IntegerType::new())
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.has("text"));
        assert_eq!(registry.get("integer").unwrap().name(), "integer");
        assert_eq!(registry.get_by_id::<TextType>().unwrap().name(), "text");
    }

    #[test]
    fn test_missing_type_not_found() {
        let registry = TypeRegistry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(
            registry.get("email").unwrap_err(),
            TypeError::NotFound("email".into())
        );
        assert!(registry.get_by_id::<EmailType>().is_err());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = TypeRegistry::builder()
            .register(TextType::new())
            .unwrap()
            .register(TextType::new());
        assert_eq!(result.unwrap_err(), TypeError::AlreadyRegistered("text".into()));
    }

    #[test]
    fn test_guessable_cache_keeps_order() {
        let registry = TypeRegistry::with_defaults().unwrap();
        let names: Vec<&str> = registry.guessable_types().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "uuid", "email", "url", "datetime", "date", "time", "ip", "integer", "float",
                "boolean"
            ]
        );
    }

    #[test]
    fn test_identity_lookup_returns_first_instance() {
        let registry = TypeRegistry::builder()
            .register(PatternType::new("zip", "^[0-9]{5}$").unwrap())
            .unwrap()
            .register(PatternType::new("sku", "^[A-Z]{3}-[0-9]+$").unwrap())
            .unwrap()
            .build();

        assert_eq!(registry.get_by_id::<PatternType>().unwrap().name(), "zip");
        assert_eq!(registry.get("sku").unwrap().name(), "sku");
        assert_eq!(registry.names(), vec!["zip", "sku"]);
    }
}
