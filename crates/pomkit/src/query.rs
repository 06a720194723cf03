//! Driver query model.
//!
//! An [`ElementQuery`] is the path a driver walks from the application root
//! to reach an element: "all buttons below the root, then the one with id
//! `login`". It is plain data and is re-resolved by the driver on every
//! property access, so a query never goes stale.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ELEMENT TYPE
// =============================================================================

/// UI element categories the query layer can filter by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// Matches every element
    Any,
    /// Top-level window
    Window,
    /// Button
    Button,
    /// Editable text field
    TextField,
    /// Editable text field with obscured input
    SecureTextField,
    /// Non-editable text
    StaticText,
    /// On/off switch
    Switch,
    /// Stepper control (a pair of buttons)
    Stepper,
    /// Navigation bar
    NavigationBar,
    /// Tab bar
    TabBar,
    /// Software keyboard
    Keyboard,
    /// Key on a software keyboard
    Key,
    /// Alert dialog
    Alert,
    /// Scroll view
    ScrollView,
    /// Generic container ("other element")
    Other,
    /// Activity (busy) indicator
    ActivityIndicator,
    /// Page indicator dots
    PageIndicator,
    /// Collection view
    CollectionView,
    /// Cell of a table or collection view
    Cell,
}

impl ElementType {
    /// Name used when rendering queries
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Window => "window",
            Self::Button => "button",
            Self::TextField => "textField",
            Self::SecureTextField => "secureTextField",
            Self::StaticText => "staticText",
            Self::Switch => "switch",
            Self::Stepper => "stepper",
            Self::NavigationBar => "navigationBar",
            Self::TabBar => "tabBar",
            Self::Keyboard => "keyboard",
            Self::Key => "key",
            Self::Alert => "alert",
            Self::ScrollView => "scrollView",
            Self::Other => "other",
            Self::ActivityIndicator => "activityIndicator",
            Self::PageIndicator => "pageIndicator",
            Self::CollectionView => "collectionView",
            Self::Cell => "cell",
        }
    }

    /// Whether an element of type `other` satisfies this filter
    #[must_use]
    pub fn matches(&self, other: Self) -> bool {
        *self == Self::Any || *self == other
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// One step of an element query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryStep {
    /// Every descendant (any depth) of the given type
    Descendants(ElementType),
    /// Direct children of the given type
    Children(ElementType),
    /// The element with this identifier
    Identifier(String),
    /// Narrow the set to elements with this identifier, keeping it a set
    MatchingIdentifier(String),
    /// The element at this position in the set
    Index(usize),
    /// The first element of the set
    FirstMatch,
    /// The single element of the set
    Only,
}

/// Path from the application root to an element or set of elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementQuery {
    steps: Vec<QueryStep>,
}

impl ElementQuery {
    /// The application root itself
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a query from explicit steps
    #[must_use]
    pub fn from_steps(steps: Vec<QueryStep>) -> Self {
        Self { steps }
    }

    /// Extend the query with one more step
    #[must_use]
    pub fn then(&self, step: QueryStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Steps in evaluation order
    #[must_use]
    pub fn steps(&self) -> &[QueryStep] {
        &self.steps
    }

    /// Whether this is the application root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Identifier this query was last narrowed by
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| match step {
            QueryStep::Identifier(id) | QueryStep::MatchingIdentifier(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("app")?;
        for step in &self.steps {
            match step {
                QueryStep::Descendants(ElementType::Switch) => f.write_str(".switches")?,
                QueryStep::Descendants(ElementType::Other) => f.write_str(".otherElements")?,
                QueryStep::Descendants(ElementType::Any) => f.write_str(".descendants")?,
                QueryStep::Descendants(ty) => write!(f, ".{ty}s")?,
                QueryStep::Children(ty) => write!(f, ".children({ty})")?,
                QueryStep::Identifier(id) => write!(f, "[{id:?}]")?,
                QueryStep::MatchingIdentifier(id) => write!(f, ".matching({id:?})")?,
                QueryStep::Index(i) => write!(f, ".element({i})")?,
                QueryStep::FirstMatch => f.write_str(".firstMatch")?,
                QueryStep::Only => f.write_str(".element")?,
            }
        }
        Ok(())
    }
}
