//! UiDriver - the UI automation boundary.
//!
//! pomkit never talks to a device itself. Element lookup, hit-testing,
//! gesture injection and accessibility scans belong to a driver that
//! implements [`UiDriver`]. Every method receives the full [`ElementQuery`]
//! and must evaluate it against the *current* UI tree.
//!
//! # Implementations
//!
//! - [`MockDriver`](crate::mock::MockDriver) - scripted in-memory tree for unit tests
//! - bridges to a real automation framework live downstream

use crate::query::ElementQuery;
use crate::result::PomResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    /// Finger moves up
    Up,
    /// Finger moves down
    Down,
    /// Finger moves left
    Left,
    /// Finger moves right
    Right,
}

/// Velocity of a swipe gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SwipeVelocity {
    /// Slow swipe
    Slow,
    /// Driver default
    Default,
    /// Fast swipe
    Fast,
    /// Explicit velocity in points per second
    Custom(f64),
}

impl SwipeVelocity {
    /// Velocity in points per second
    #[must_use]
    pub const fn points_per_second(&self) -> f64 {
        match self {
            Self::Slow => 600.0,
            Self::Default => 1500.0,
            Self::Fast => 2500.0,
            Self::Custom(v) => *v,
        }
    }
}

/// Kind of check an accessibility audit performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditType {
    /// Text and background contrast
    Contrast,
    /// Elements that are not exposed to assistive technologies
    ElementDetection,
    /// Hit regions too small to interact with
    HitRegion,
    /// Missing or unhelpful accessibility labels
    SufficientElementDescription,
    /// Text that does not scale with Dynamic Type
    DynamicType,
    /// Clipped text
    TextClipped,
    /// Wrong or missing accessibility traits
    Trait,
    /// Actions not exposed to assistive technologies
    Action,
    /// Inconsistent parent/child accessibility relationships
    ParentChild,
}

impl AuditType {
    /// Every audit type
    pub const ALL: &'static [Self] = &[
        Self::Contrast,
        Self::ElementDetection,
        Self::HitRegion,
        Self::SufficientElementDescription,
        Self::DynamicType,
        Self::TextClipped,
        Self::Trait,
        Self::Action,
        Self::ParentChild,
    ];

    /// Short name for reports
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contrast => "contrast",
            Self::ElementDetection => "element-detection",
            Self::HitRegion => "hit-region",
            Self::SufficientElementDescription => "sufficient-element-description",
            Self::DynamicType => "dynamic-type",
            Self::TextClipped => "text-clipped",
            Self::Trait => "trait",
            Self::Action => "action",
            Self::ParentChild => "parent-child",
        }
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue found by the driver's accessibility scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditIssue {
    /// Which check produced the issue
    pub audit_type: AuditType,
    /// One-line summary
    pub compact_description: String,
    /// Longer explanation
    pub detailed_description: String,
    /// Offending element, when the scan can attribute one
    pub element: Option<ElementQuery>,
}

impl AuditIssue {
    /// Create an issue without an attributed element
    #[must_use]
    pub fn new(audit_type: AuditType, compact_description: impl Into<String>) -> Self {
        let compact_description = compact_description.into();
        Self {
            audit_type,
            detailed_description: compact_description.clone(),
            compact_description,
            element: None,
        }
    }

    /// Attribute the issue to an element
    #[must_use]
    pub fn with_element(mut self, element: ElementQuery) -> Self {
        self.element = Some(element);
        self
    }

    /// Add a detailed description
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detailed_description = detail.into();
        self
    }
}

/// An unsuppressed audit issue, in the form reported to the test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    /// Which check produced the issue
    pub audit_type: AuditType,
    /// What is wrong
    pub description: String,
    /// Identifier of the offending element
    pub element: Option<String>,
    /// Driver snapshot of the offending element
    pub debug_description: Option<String>,
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.audit_type, self.description)?;
        if let Some(element) = &self.element {
            write!(f, " (element `{element}`)")?;
        }
        if let Some(debug) = &self.debug_description {
            write!(f, "\n    {debug}")?;
        }
        Ok(())
    }
}

/// Abstract UI automation driver.
///
/// All methods take `&self`: the driver is shared by every page and robot
/// built on the same application handle. Property methods (`exists`,
/// `is_hittable`, `count`) are infallible because "not there" is an answer,
/// not an error.
pub trait UiDriver {
    /// Whether the query currently resolves to an element
    fn exists(&self, query: &ElementQuery) -> bool;

    /// Whether the resolved element can receive a simulated interaction
    fn is_hittable(&self, query: &ElementQuery) -> bool;

    /// Number of elements the query currently matches
    fn count(&self, query: &ElementQuery) -> usize;

    /// Accessibility identifier of the resolved element, if it exists
    fn identifier(&self, query: &ElementQuery) -> Option<String>;

    /// Human-readable snapshot of the element, for failure reports
    fn debug_description(&self, query: &ElementQuery) -> String;

    /// Tap the element
    fn tap(&self, query: &ElementQuery) -> PomResult<()>;

    /// Type text into the element
    fn type_text(&self, query: &ElementQuery, text: &str) -> PomResult<()>;

    /// Swipe on the element
    fn swipe(
        &self,
        query: &ElementQuery,
        direction: SwipeDirection,
        velocity: SwipeVelocity,
    ) -> PomResult<()>;

    /// Run an accessibility scan over the current screen
    fn accessibility_audit(&self, types: &[AuditType]) -> PomResult<Vec<AuditIssue>>;
}
