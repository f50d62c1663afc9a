//! Cache key construction.
//!
//! Keys have the shape `scope:identity:arg1:arg2`. String arguments are
//! written as-is and every other value as compact JSON, in the order the
//! caller supplies them. No normalization happens, so `("a", 1)` and
//! `(1, "a")` are different keys.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::ports::{escape_glob, CacheError};

/// Builder for structured cache keys.
#[derive(Debug, Clone)]
pub struct CacheKey {
    segments: Vec<String>,
    error: Option<CacheError>,
}

impl CacheKey {
    /// Starts a key from its scope (usually the entity name) and operation.
    pub fn new(scope: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            segments: vec![scope.into(), identity.into()],
            error: None,
        }
    }

    /// Appends one call argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::to_value(value) {
            Ok(JsonValue::String(raw)) => self.segments.push(raw),
            Ok(other) => self.segments.push(other.to_string()),
            Err(e) => self.error = Some(CacheError::Serialization(e.to_string())),
        }
        self
    }

    /// Renders the key, failing if any argument could not be serialized.
    pub fn build(self) -> Result<String, CacheError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.segments.join(":")),
        }
    }
}

/// Pattern covering every key of an entity, or every key of one entity id.
///
/// `entity:*` without an id, `entity:*:id` with one. Both names are
/// escaped, so an id like `c[1]` only matches keys ending in `c[1]`.
pub fn entity_pattern(entity: &str, id: Option<&str>) -> String {
    let entity = escape_glob(entity);
    match id {
        Some(id) => format!("{}:*:{}", entity, escape_glob(id)),
        None => format!("{}:*", entity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::glob_match;
    use crate::domain::foundation::CourseId;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn strings_are_raw_and_other_values_are_json() {
        let key = CacheKey::new("course", "list")
            .arg("t-1")
            .arg(&2_u32)
            .arg(&true)
            .arg(&json!({ "published": true }))
            .build()
            .unwrap();

        assert_eq!(key, r#"course:list:t-1:2:true:{"published":true}"#);
    }

    #[test]
    fn string_ids_render_raw() {
        let id = CourseId::new("c-1").unwrap();
        let key = CacheKey::new("course", "get").arg(&id).build().unwrap();
        assert_eq!(key, "course:get:c-1");
    }

    #[test]
    fn argument_order_is_preserved_verbatim() {
        let a = CacheKey::new("lesson", "search").arg("x").arg(&1).build().unwrap();
        let b = CacheKey::new("lesson", "search").arg(&1).arg("x").build().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unserializable_argument_fails_build() {
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);

        let result = CacheKey::new("course", "get").arg(&bad).arg("later").build();
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn entity_patterns() {
        assert_eq!(entity_pattern("course", None), "course:*");
        assert_eq!(entity_pattern("course", Some("c-1")), "course:*:c-1");
    }

    #[test]
    fn entity_pattern_ids_match_literally() {
        let pattern = entity_pattern("course", Some("c[1]"));
        assert_eq!(pattern, r"course:*:c\[1\]");
        assert!(glob_match(&pattern, "course:get:c[1]"));
        assert!(!glob_match(&pattern, "course:get:c1"));

        let starred = entity_pattern("course", Some("*"));
        assert!(glob_match(&starred, "course:get:*"));
        assert!(!glob_match(&starred, "course:get:c-1"));
    }
}
