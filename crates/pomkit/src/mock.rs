//! Scripted in-memory driver for unit testing page objects.
//!
//! [`MockDriver`] keeps a small UI tree whose nodes appear, disappear and
//! become hittable at scripted points in virtual time read from a
//! [`ManualClock`]. Because the wait loop sleeps through the same clock, a
//! ten-second scenario runs instantly and deterministically.
//!
//! ```
//! use pomkit::mock::{MockDriver, MockNode};
//! use pomkit::{App, ElementType, ManualClock, PomConfig};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let driver = MockDriver::new(clock.clone());
//! driver.add(MockDriver::ROOT, MockNode::button("submit").appears_at(Duration::from_secs(2)));
//!
//! let app = App::with_clock(driver, PomConfig::default(), clock.clone()).unwrap();
//! let submit = app.descendants(ElementType::Button).get("submit");
//! assert!(!submit.exists());
//! clock.advance(Duration::from_secs(2));
//! assert!(submit.exists());
//! ```

use crate::clock::{Clock, ManualClock};
use crate::driver::{AuditIssue, AuditType, SwipeDirection, SwipeVelocity, UiDriver};
use crate::query::{ElementQuery, ElementType, QueryStep};
use crate::result::{PomError, PomResult};
use std::cell::RefCell;
use std::time::Duration;

/// A node of the scripted UI tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockNode {
    element_type: ElementType,
    identifier: Option<String>,
    label: Option<String>,
    appears_at: Duration,
    disappears_at: Option<Duration>,
    hittable_from: Option<Duration>,
}

impl MockNode {
    /// A node of the given type, present and hittable from time zero
    #[must_use]
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            identifier: None,
            label: None,
            appears_at: Duration::ZERO,
            disappears_at: None,
            hittable_from: Some(Duration::ZERO),
        }
    }

    /// A button with an identifier
    #[must_use]
    pub fn button(identifier: impl Into<String>) -> Self {
        Self::new(ElementType::Button).id(identifier)
    }

    /// A static text with an identifier
    #[must_use]
    pub fn static_text(identifier: impl Into<String>) -> Self {
        Self::new(ElementType::StaticText).id(identifier)
    }

    /// A window
    #[must_use]
    pub fn window() -> Self {
        Self::new(ElementType::Window)
    }

    /// Set the accessibility identifier
    #[must_use]
    pub fn id(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the visible label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Node enters the tree at `at`
    #[must_use]
    pub fn appears_at(mut self, at: Duration) -> Self {
        self.appears_at = at;
        self
    }

    /// Node leaves the tree at `at`
    #[must_use]
    pub fn disappears_at(mut self, at: Duration) -> Self {
        self.disappears_at = Some(at);
        self
    }

    /// Node becomes hittable at `at` (if present by then)
    #[must_use]
    pub fn hittable_at(mut self, at: Duration) -> Self {
        self.hittable_from = Some(at);
        self
    }

    /// Node is never hittable
    #[must_use]
    pub fn never_hittable(mut self) -> Self {
        self.hittable_from = None;
        self
    }

    fn present(&self, now: Duration) -> bool {
        now >= self.appears_at && self.disappears_at.map_or(true, |gone| now < gone)
    }

    fn hittable(&self, now: Duration) -> bool {
        self.present(now) && self.hittable_from.is_some_and(|from| now >= from)
    }

    fn answers_to(&self, identifier: &str) -> bool {
        self.identifier.as_deref() == Some(identifier) || self.label.as_deref() == Some(identifier)
    }
}

#[derive(Debug)]
struct Entry {
    node: MockNode,
    parent: Option<usize>,
}

#[derive(Debug, Default)]
struct AuditScript {
    issues: Vec<AuditIssue>,
    failure: Option<String>,
    requested: Vec<Vec<AuditType>>,
}

/// Driver over a scripted UI tree
#[derive(Debug)]
pub struct MockDriver {
    clock: ManualClock,
    nodes: RefCell<Vec<Entry>>,
    actions: RefCell<Vec<String>>,
    audit: RefCell<AuditScript>,
}

impl MockDriver {
    /// Index of the application root node
    pub const ROOT: usize = 0;

    /// Create a driver whose tree holds only the application root
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            nodes: RefCell::new(vec![Entry {
                node: MockNode::new(ElementType::Any).id("application"),
                parent: None,
            }]),
            actions: RefCell::new(Vec::new()),
            audit: RefCell::new(AuditScript::default()),
        }
    }

    /// Add a node under `parent`, returning its index
    pub fn add(&self, parent: usize, node: MockNode) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Entry {
            node,
            parent: Some(parent),
        });
        nodes.len() - 1
    }

    /// Issues the next accessibility scans will report
    pub fn set_audit_issues(&self, issues: Vec<AuditIssue>) {
        self.audit.borrow_mut().issues = issues;
    }

    /// Make the next accessibility scans fail outright
    pub fn fail_audit(&self, message: impl Into<String>) {
        self.audit.borrow_mut().failure = Some(message.into());
    }

    /// Audit types requested by each scan so far
    #[must_use]
    pub fn audit_requests(&self) -> Vec<Vec<AuditType>> {
        self.audit.borrow().requested.clone()
    }

    /// Interactions performed so far, oldest first
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }

    fn present_children(&self, parent: usize, now: Duration) -> Vec<usize> {
        self.nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent == Some(parent) && e.node.present(now))
            .map(|(i, _)| i)
            .collect()
    }

    fn collect_descendants(&self, parent: usize, now: Duration, out: &mut Vec<usize>) {
        for child in self.present_children(parent, now) {
            out.push(child);
            self.collect_descendants(child, now, out);
        }
    }

    /// Indices of the nodes a query currently resolves to
    fn resolve(&self, query: &ElementQuery) -> Vec<usize> {
        let now = self.clock.now();
        let mut current = vec![Self::ROOT];
        for step in query.steps() {
            current = match step {
                QueryStep::Descendants(ty) => {
                    let mut found = Vec::new();
                    for &node in &current {
                        let mut below = Vec::new();
                        self.collect_descendants(node, now, &mut below);
                        for index in below {
                            if !found.contains(&index) {
                                found.push(index);
                            }
                        }
                    }
                    self.filter_type(found, *ty)
                }
                QueryStep::Children(ty) => {
                    let found = current
                        .iter()
                        .flat_map(|&node| self.present_children(node, now))
                        .collect();
                    self.filter_type(found, *ty)
                }
                QueryStep::Identifier(id) => self
                    .filter_identifier(current, id)
                    .into_iter()
                    .take(1)
                    .collect(),
                QueryStep::MatchingIdentifier(id) => self.filter_identifier(current, id),
                QueryStep::Index(i) => current.get(*i).copied().into_iter().collect(),
                QueryStep::FirstMatch => current.first().copied().into_iter().collect(),
                QueryStep::Only => {
                    if current.len() == 1 {
                        current
                    } else {
                        Vec::new()
                    }
                }
            };
        }
        current
    }

    fn filter_type(&self, found: Vec<usize>, ty: ElementType) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        found
            .into_iter()
            .filter(|&i| ty.matches(nodes[i].node.element_type))
            .collect()
    }

    fn filter_identifier(&self, found: Vec<usize>, id: &str) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        found
            .into_iter()
            .filter(|&i| nodes[i].node.answers_to(id))
            .collect()
    }

    fn resolve_one(&self, query: &ElementQuery) -> Option<MockNode> {
        let index = *self.resolve(query).first()?;
        Some(self.nodes.borrow()[index].node.clone())
    }

    fn interact(&self, query: &ElementQuery, action: String) -> PomResult<()> {
        let node = self
            .resolve_one(query)
            .ok_or_else(|| PomError::driver(format!("no element matches {query}")))?;
        if !node.hittable(self.clock.now()) {
            return Err(PomError::driver(format!("element {query} is not hittable")));
        }
        self.actions.borrow_mut().push(action);
        Ok(())
    }
}

impl UiDriver for MockDriver {
    fn exists(&self, query: &ElementQuery) -> bool {
        !self.resolve(query).is_empty()
    }

    fn is_hittable(&self, query: &ElementQuery) -> bool {
        self.resolve_one(query)
            .is_some_and(|node| node.hittable(self.clock.now()))
    }

    fn count(&self, query: &ElementQuery) -> usize {
        self.resolve(query).len()
    }

    fn identifier(&self, query: &ElementQuery) -> Option<String> {
        self.resolve_one(query).and_then(|node| node.identifier)
    }

    fn debug_description(&self, query: &ElementQuery) -> String {
        match self.resolve_one(query) {
            Some(node) => format!(
                "{}, identifier: '{}', label: '{}', hittable: {} ({query})",
                node.element_type,
                node.identifier.as_deref().unwrap_or(""),
                node.label.as_deref().unwrap_or(""),
                node.hittable(self.clock.now()),
            ),
            None => format!("No matches found for {query}"),
        }
    }

    fn tap(&self, query: &ElementQuery) -> PomResult<()> {
        self.interact(query, format!("tap {query}"))
    }

    fn type_text(&self, query: &ElementQuery, text: &str) -> PomResult<()> {
        self.interact(query, format!("type {text:?} into {query}"))
    }

    fn swipe(
        &self,
        query: &ElementQuery,
        direction: SwipeDirection,
        velocity: SwipeVelocity,
    ) -> PomResult<()> {
        self.interact(
            query,
            format!(
                "swipe {direction:?} at {} on {query}",
                velocity.points_per_second()
            ),
        )
    }

    fn accessibility_audit(&self, types: &[AuditType]) -> PomResult<Vec<AuditIssue>> {
        let mut audit = self.audit.borrow_mut();
        audit.requested.push(types.to_vec());
        if let Some(message) = &audit.failure {
            return Err(PomError::driver(message.clone()));
        }
        Ok(audit
            .issues
            .iter()
            .filter(|issue| types.contains(&issue.audit_type))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn q(steps: Vec<QueryStep>) -> ElementQuery {
        ElementQuery::from_steps(steps)
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_root_always_exists() {
            let driver = MockDriver::new(ManualClock::new());
            assert!(driver.exists(&ElementQuery::root()));
        }

        #[test]
        fn test_descendants_in_document_order() {
            let driver = MockDriver::new(ManualClock::new());
            let window = driver.add(MockDriver::ROOT, MockNode::window());
            let form = driver.add(window, MockNode::new(ElementType::Other).id("form"));
            driver.add(form, MockNode::button("a"));
            driver.add(window, MockNode::button("b"));
            let buttons = q(vec![QueryStep::Descendants(ElementType::Button)]);
            assert_eq!(driver.count(&buttons), 2);
            let first = buttons.then(QueryStep::Index(0));
            assert_eq!(driver.identifier(&first).as_deref(), Some("a"));
        }

        #[test]
        fn test_children_are_direct_only() {
            let driver = MockDriver::new(ManualClock::new());
            let window = driver.add(MockDriver::ROOT, MockNode::window());
            driver.add(window, MockNode::button("nested"));
            let children = q(vec![QueryStep::Children(ElementType::Button)]);
            assert_eq!(driver.count(&children), 0);
            let windows = q(vec![QueryStep::Children(ElementType::Window)]);
            assert_eq!(driver.count(&windows), 1);
        }

        #[test]
        fn test_absent_parent_hides_subtree() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            let sheet = driver.add(
                MockDriver::ROOT,
                MockNode::new(ElementType::Other).appears_at(Duration::from_secs(1)),
            );
            driver.add(sheet, MockNode::button("inside"));
            let inside = q(vec![
                QueryStep::Descendants(ElementType::Button),
                QueryStep::Identifier("inside".into()),
            ]);
            assert!(!driver.exists(&inside));
            clock.advance(Duration::from_secs(1));
            assert!(driver.exists(&inside));
        }

        #[test]
        fn test_label_matches_identifier_step() {
            let driver = MockDriver::new(ManualClock::new());
            driver.add(MockDriver::ROOT, MockNode::new(ElementType::Key).label("return"));
            let key = q(vec![
                QueryStep::Descendants(ElementType::Key),
                QueryStep::Identifier("return".into()),
            ]);
            assert!(driver.exists(&key));
        }

        #[test]
        fn test_disappearing_node() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            driver.add(
                MockDriver::ROOT,
                MockNode::new(ElementType::ActivityIndicator)
                    .id("loading")
                    .disappears_at(Duration::from_secs(3)),
            );
            let spinner = q(vec![
                QueryStep::Descendants(ElementType::ActivityIndicator),
                QueryStep::Identifier("loading".into()),
            ]);
            assert!(driver.exists(&spinner));
            clock.advance(Duration::from_secs(3));
            assert!(!driver.exists(&spinner));
        }
    }

    mod interaction_tests {
        use super::*;

        #[test]
        fn test_tap_requires_hittable() {
            let driver = MockDriver::new(ManualClock::new());
            driver.add(MockDriver::ROOT, MockNode::button("covered").never_hittable());
            let covered = q(vec![
                QueryStep::Descendants(ElementType::Button),
                QueryStep::Identifier("covered".into()),
            ]);
            let err = driver.tap(&covered).unwrap_err();
            assert!(err.to_string().contains("not hittable"));
            assert!(driver.actions().is_empty());
        }

        #[test]
        fn test_debug_description_for_missing() {
            let driver = MockDriver::new(ManualClock::new());
            let missing = q(vec![QueryStep::Descendants(ElementType::Alert), QueryStep::Only]);
            assert!(driver.debug_description(&missing).starts_with("No matches found"));
        }
    }

    mod audit_tests {
        use super::*;

        #[test]
        fn test_scripted_issues_filtered_by_type() {
            let driver = MockDriver::new(ManualClock::new());
            driver.set_audit_issues(vec![
                AuditIssue::new(AuditType::Contrast, "low contrast"),
                AuditIssue::new(AuditType::DynamicType, "fixed font"),
            ]);
            let issues = driver.accessibility_audit(&[AuditType::Contrast]).unwrap();
            assert_eq!(issues.len(), 1);
            assert_eq!(driver.audit_requests(), vec![vec![AuditType::Contrast]]);
        }

        #[test]
        fn test_failed_scan() {
            let driver = MockDriver::new(ManualClock::new());
            driver.fail_audit("scan crashed");
            assert!(driver.accessibility_audit(AuditType::ALL).is_err());
        }
    }
}
