use std::fmt::{Display, Formatter};

use gpui::{ElementId, SharedString};

#[track_caller]
pub fn stable_auto_id(prefix: &str) -> String {
    let location = std::panic::Location::caller();
    let seed = format!(
        "{prefix}:{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    );
    format!("{prefix}-{:016x}", fnv1a64(seed.as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Identifier of the element a field renders, unique per form instance.
///
/// Fields owned by a form use `field-<identification>-<name>`, detached
/// fields use `field-<name>`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldElementId(SharedString);

impl FieldElementId {
    pub fn for_form(identification: &str, name: &str) -> Self {
        Self(format!("field-{identification}-{name}").into())
    }

    pub fn detached(name: &str) -> Self {
        Self(format!("field-{name}").into())
    }

    /// Identifier of one option rendered inside a grouped field.
    pub fn child(&self, suffix: &str) -> Self {
        Self(format!("{}-{suffix}", self.0).into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl Display for FieldElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FieldElementId> for ElementId {
    fn from(id: FieldElementId) -> Self {
        ElementId::Name(id.0)
    }
}

impl From<&FieldElementId> for ElementId {
    fn from(id: &FieldElementId) -> Self {
        ElementId::Name(id.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn call_once() -> String {
        stable_auto_id("form")
    }

    #[test]
    fn id_is_stable_for_same_callsite() {
        let ids = (0..3).map(|_| call_once()).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn id_differs_for_different_callsites() {
        let first = call_once();
        let second = stable_auto_id("form");
        assert_ne!(first, second);
    }

    #[test]
    fn field_ids_are_namespaced_by_form() {
        let id = FieldElementId::for_form("signup", "address.city");
        assert_eq!(id.as_str(), "field-signup-address.city");
        assert_eq!(id.child("berlin").as_str(), "field-signup-address.city-berlin");
        assert_eq!(FieldElementId::detached("age").to_string(), "field-age");
        assert_ne!(id, FieldElementId::for_form("login", "address.city"));
    }

    #[test]
    fn field_ids_convert_into_gpui_element_ids() {
        let id = FieldElementId::for_form("signup", "email");
        let element: ElementId = (&id).into();
        assert_eq!(element, ElementId::Name("field-signup-email".into()));
    }
}
