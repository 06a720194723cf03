//! Element descriptors: logical identities for UI elements.
//!
//! A descriptor says *which* element a page means; the query layer decides
//! *how* the driver finds it. Three kinds exist:
//!
//! - enum-backed, via `#[derive(ElementDescriptor)]` (feature `derive`)
//! - plain strings (`&str`, `String`)
//! - [`DynamicDescriptor`], built at runtime from live data such as a row label
//!
//! ```
//! use pomkit::{DynamicDescriptor, ElementDescriptor};
//!
//! let row = DynamicDescriptor::new(format!("row-{}", 42));
//! assert_eq!(row.id(), "row-42");
//! assert_eq!("loginButton".id(), "loginButton");
//! ```

use std::fmt;

/// Anything that can name a UI element by a stable string identifier.
///
/// `id` must be pure: calling it repeatedly on the same value returns the
/// same string.
pub trait ElementDescriptor {
    /// The accessibility identifier of the element
    fn id(&self) -> String;
}

impl ElementDescriptor for str {
    fn id(&self) -> String {
        self.to_owned()
    }
}

impl ElementDescriptor for String {
    fn id(&self) -> String {
        self.clone()
    }
}

impl<T: ElementDescriptor + ?Sized> ElementDescriptor for &T {
    fn id(&self) -> String {
        (**self).id()
    }
}

/// Descriptor for an element that displays live information.
///
/// The identifier is captured once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicDescriptor {
    descriptor: String,
}

impl DynamicDescriptor {
    /// Capture a runtime identifier
    #[must_use]
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
        }
    }

    /// Borrow the captured identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.descriptor
    }
}

impl ElementDescriptor for DynamicDescriptor {
    fn id(&self) -> String {
        self.descriptor.clone()
    }
}

impl fmt::Display for DynamicDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

/// Type-erased descriptor, for storing a mix of descriptor kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// Compile-time identifier (typically from an enum)
    Static(&'static str),
    /// Literal string identifier
    Literal(String),
    /// Runtime-constructed identifier
    Dynamic(DynamicDescriptor),
}

impl Descriptor {
    /// Erase any descriptor into a literal
    #[must_use]
    pub fn of(descriptor: &impl ElementDescriptor) -> Self {
        Self::Literal(descriptor.id())
    }
}

impl ElementDescriptor for Descriptor {
    fn id(&self) -> String {
        match self {
            Self::Static(id) => (*id).to_owned(),
            Self::Literal(id) => id.clone(),
            Self::Dynamic(dynamic) => dynamic.id(),
        }
    }
}

impl From<&'static str> for Descriptor {
    fn from(id: &'static str) -> Self {
        Self::Static(id)
    }
}

impl From<String> for Descriptor {
    fn from(id: String) -> Self {
        Self::Literal(id)
    }
}

impl From<DynamicDescriptor> for Descriptor {
    fn from(dynamic: DynamicDescriptor) -> Self {
        Self::Dynamic(dynamic)
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(id) => f.write_str(id),
            Self::Literal(id) => f.write_str(id),
            Self::Dynamic(dynamic) => write!(f, "{dynamic}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod string_tests {
        use super::*;

        #[test]
        fn test_str_descriptor() {
            assert_eq!("loginButton".id(), "loginButton");
        }

        #[test]
        fn test_string_descriptor() {
            let id = String::from("submitButton");
            assert_eq!(id.id(), "submitButton");
        }

        #[test]
        fn test_reference_descriptor() {
            let id = String::from("nested");
            let by_ref = &&id;
            assert_eq!(by_ref.id(), "nested");
        }
    }

    mod dynamic_tests {
        use super::*;

        #[test]
        fn test_dynamic_from_runtime_string() {
            let label = format!("row-{}", 42);
            let descriptor = DynamicDescriptor::new(label);
            assert_eq!(descriptor.id(), "row-42");
            assert_eq!(descriptor.as_str(), "row-42");
            assert_eq!(descriptor.to_string(), "row-42");
        }

        #[test]
        fn test_dynamic_does_not_track_source_after_construction() {
            let mut label = String::from("row-1");
            let descriptor = DynamicDescriptor::new(label.clone());
            label.push_str("-changed");
            assert_eq!(descriptor.id(), "row-1");
        }
    }

    mod erased_tests {
        use super::*;

        #[test]
        fn test_descriptor_variants() {
            let all: Vec<Descriptor> = vec![
                "static".into(),
                String::from("literal").into(),
                DynamicDescriptor::new("dynamic").into(),
            ];
            let ids: Vec<String> = all.iter().map(ElementDescriptor::id).collect();
            assert_eq!(ids, ["static", "literal", "dynamic"]);
        }

        #[test]
        fn test_descriptor_of() {
            let erased = Descriptor::of(&DynamicDescriptor::new("cell-7"));
            assert_eq!(erased, Descriptor::Literal("cell-7".into()));
            assert_eq!(erased.to_string(), "cell-7");
        }
    }

    proptest! {
        #[test]
        fn prop_id_is_idempotent(raw in ".*") {
            let dynamic = DynamicDescriptor::new(raw.clone());
            prop_assert_eq!(dynamic.id(), dynamic.id());
            prop_assert_eq!(dynamic.id(), raw.clone());
            prop_assert_eq!(raw.as_str().id(), raw.as_str().id());
            let erased = Descriptor::from(raw.clone());
            prop_assert_eq!(erased.id(), raw);
        }
    }
}
