//! State-type identity.
//!
//! States are registered by the concrete Rust type that implements them. The
//! registry key is the compiler-issued [`TypeId`], which is unique per type;
//! the type name only rides along for logs and diagnostics.

use serde::{Serialize, Serializer};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a concrete state type.
///
/// Two ids compare equal exactly when they were built from the same type.
///
/// # Example
///
/// ```rust
/// use automata::core::StateId;
///
/// struct Idle;
/// struct Patrol;
///
/// assert_eq!(StateId::of::<Idle>(), StateId::of::<Idle>());
/// assert_ne!(StateId::of::<Idle>(), StateId::of::<Patrol>());
/// assert_eq!(StateId::of::<Idle>().short_name(), "Idle");
/// ```
#[derive(Clone, Copy)]
pub struct StateId {
    type_id: TypeId,
    name: &'static str,
}

impl StateId {
    /// Identity of `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let path = self.name.split('<').next().unwrap_or(self.name);
        match path.rfind("::") {
            Some(idx) => &self.name[idx + 2..],
            None => self.name,
        }
    }

    /// Whether this id belongs to `T`.
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for StateId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StateId {}

impl Hash for StateId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateId").field(&self.name).finish()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for StateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Alpha;
    struct Beta;

    mod nested {
        pub struct Alpha;
    }

    #[test]
    fn same_type_yields_equal_ids() {
        assert_eq!(StateId::of::<Alpha>(), StateId::of::<Alpha>());
    }

    #[test]
    fn distinct_types_yield_distinct_ids() {
        assert_ne!(StateId::of::<Alpha>(), StateId::of::<Beta>());
    }

    #[test]
    fn same_short_name_in_other_module_is_distinct() {
        let outer = StateId::of::<Alpha>();
        let inner = StateId::of::<nested::Alpha>();

        assert_eq!(outer.short_name(), inner.short_name());
        assert_ne!(outer, inner);
    }

    #[test]
    fn ids_work_as_hash_keys() {
        let mut set = HashSet::new();
        set.insert(StateId::of::<Alpha>());
        set.insert(StateId::of::<Alpha>());
        set.insert(StateId::of::<Beta>());

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn is_checks_the_underlying_type() {
        let id = StateId::of::<Beta>();
        assert!(id.is::<Beta>());
        assert!(!id.is::<Alpha>());
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(StateId::of::<Beta>().to_string(), "Beta");
        assert!(StateId::of::<Beta>().name().ends_with("::Beta"));
    }

    #[test]
    fn serializes_as_type_name() {
        let json = serde_json::to_string(&StateId::of::<Alpha>()).unwrap();
        assert!(json.ends_with("::Alpha\""));
    }
}
