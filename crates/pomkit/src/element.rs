//! Live element handles.
//!
//! [`App`] is the shared application root. [`Element`] and [`ElementSet`]
//! pair the shared session with an [`ElementQuery`]; every property access
//! re-asks the driver, so a handle always reflects the current UI tree.
//!
//! All three types hold the session in an `Rc` and are therefore neither
//! `Send` nor `Sync`: queries, checks and gestures can only run on the
//! thread that created the application handle.
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//! assert_send::<pomkit::App<pomkit::mock::MockDriver>>();
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::PomConfig;
use crate::driver::{SwipeDirection, SwipeVelocity, UiDriver};
use crate::query::{ElementQuery, ElementType, QueryStep};
use crate::result::PomResult;
use crate::wait::wait_for_existence;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Readiness of an element, derived at check time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// The query does not resolve
    Absent,
    /// Resolved but cannot receive interaction
    PresentNotInteractable,
    /// Resolved and hittable
    PresentInteractable,
}

impl ElementState {
    /// Whether the element exists at all
    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

pub(crate) struct Session<D> {
    driver: D,
    config: PomConfig,
    clock: Box<dyn Clock>,
}

// =============================================================================
// APP
// =============================================================================

/// Shared handle to the application under test.
///
/// Cloning is cheap and every clone refers to the same driver, config and
/// clock. Pages and robots hold clones; none of them can replace the root.
pub struct App<D> {
    session: Rc<Session<D>>,
}

impl<D> Clone for App<D> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
        }
    }
}

impl<D: UiDriver> App<D> {
    /// Create an application handle using the wall clock
    pub fn new(driver: D, config: PomConfig) -> PomResult<Self> {
        Self::with_clock(driver, config, SystemClock::new())
    }

    /// Create an application handle with an explicit clock
    pub fn with_clock(driver: D, config: PomConfig, clock: impl Clock + 'static) -> PomResult<Self> {
        config.validate()?;
        Ok(Self {
            session: Rc::new(Session {
                driver,
                config,
                clock: Box::new(clock),
            }),
        })
    }

    /// The driver all queries go through
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.session.driver
    }

    /// Configuration fixed at construction
    #[must_use]
    pub fn config(&self) -> &PomConfig {
        &self.session.config
    }

    /// The application root as an element
    #[must_use]
    pub fn root(&self) -> Element<D> {
        Element::new(Rc::clone(&self.session), ElementQuery::root())
    }

    /// Whether two handles share the same root
    #[must_use]
    pub fn same_root(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session)
    }

    /// Descendants of the root of the given type
    #[must_use]
    pub fn descendants(&self, ty: ElementType) -> ElementSet<D> {
        self.root().descendants(ty)
    }

    /// Direct children of the root of the given type
    #[must_use]
    pub fn children(&self, ty: ElementType) -> ElementSet<D> {
        self.root().children(ty)
    }

    /// Re-bind a query to this application
    #[must_use]
    pub fn element(&self, query: ElementQuery) -> Element<D> {
        Element::new(Rc::clone(&self.session), query)
    }
}

impl<D> fmt::Debug for App<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.session.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// Live handle to a single element
pub struct Element<D> {
    session: Rc<Session<D>>,
    query: ElementQuery,
}

impl<D> Clone for Element<D> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            query: self.query.clone(),
        }
    }
}

impl<D> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.query.to_string()).finish()
    }
}

impl<D: UiDriver> Element<D> {
    fn new(session: Rc<Session<D>>, query: ElementQuery) -> Self {
        Self { session, query }
    }

    fn set(&self, step: QueryStep) -> ElementSet<D> {
        ElementSet {
            session: Rc::clone(&self.session),
            query: self.query.then(step),
        }
    }

    /// The query this handle re-evaluates
    #[must_use]
    pub fn query(&self) -> &ElementQuery {
        &self.query
    }

    /// Application handle this element belongs to
    #[must_use]
    pub fn app(&self) -> App<D> {
        App {
            session: Rc::clone(&self.session),
        }
    }

    pub(crate) fn config(&self) -> &PomConfig {
        &self.session.config
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.session.clock.as_ref()
    }

    /// Whether the element currently exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.session.driver.exists(&self.query)
    }

    /// Whether the element can currently receive interaction
    #[must_use]
    pub fn is_hittable(&self) -> bool {
        self.session.driver.is_hittable(&self.query)
    }

    /// Current readiness
    #[must_use]
    pub fn state(&self) -> ElementState {
        if !self.exists() {
            ElementState::Absent
        } else if self.is_hittable() {
            ElementState::PresentInteractable
        } else {
            ElementState::PresentNotInteractable
        }
    }

    /// Accessibility identifier, falling back to the one queried for
    #[must_use]
    pub fn identifier(&self) -> String {
        self.session
            .driver
            .identifier(&self.query)
            .or_else(|| self.query.identifier().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Driver snapshot for failure reports
    #[must_use]
    pub fn debug_description(&self) -> String {
        self.session.driver.debug_description(&self.query)
    }

    /// Descendants of this element of the given type
    #[must_use]
    pub fn descendants(&self, ty: ElementType) -> ElementSet<D> {
        self.set(QueryStep::Descendants(ty))
    }

    /// Direct children of this element of the given type
    #[must_use]
    pub fn children(&self, ty: ElementType) -> ElementSet<D> {
        self.set(QueryStep::Children(ty))
    }

    /// Resolve to the first element this handle matches
    #[must_use]
    pub fn first_match(&self) -> Self {
        Self::new(Rc::clone(&self.session), self.query.then(QueryStep::FirstMatch))
    }

    /// Descendant buttons
    #[must_use]
    pub fn buttons(&self) -> ElementSet<D> {
        self.descendants(ElementType::Button)
    }

    /// Descendant static texts
    #[must_use]
    pub fn static_texts(&self) -> ElementSet<D> {
        self.descendants(ElementType::StaticText)
    }

    /// Descendant text fields
    #[must_use]
    pub fn text_fields(&self) -> ElementSet<D> {
        self.descendants(ElementType::TextField)
    }

    /// Descendant generic containers
    #[must_use]
    pub fn other_elements(&self) -> ElementSet<D> {
        self.descendants(ElementType::Other)
    }

    /// Tap the element
    pub fn tap(&self) -> PomResult<()> {
        self.session.driver.tap(&self.query)
    }

    /// Type text into the element
    pub fn type_text(&self, text: &str) -> PomResult<()> {
        self.session.driver.type_text(&self.query, text)
    }

    /// Swipe in a direction at a velocity
    pub fn swipe(&self, direction: SwipeDirection, velocity: SwipeVelocity) -> PomResult<()> {
        self.session.driver.swipe(&self.query, direction, velocity)
    }

    /// Swipe up
    pub fn swipe_up(&self, velocity: SwipeVelocity) -> PomResult<()> {
        self.swipe(SwipeDirection::Up, velocity)
    }

    /// Swipe down
    pub fn swipe_down(&self, velocity: SwipeVelocity) -> PomResult<()> {
        self.swipe(SwipeDirection::Down, velocity)
    }

    /// Swipe left
    pub fn swipe_left(&self, velocity: SwipeVelocity) -> PomResult<()> {
        self.swipe(SwipeDirection::Left, velocity)
    }

    /// Swipe right
    pub fn swipe_right(&self, velocity: SwipeVelocity) -> PomResult<()> {
        self.swipe(SwipeDirection::Right, velocity)
    }

    /// The clear-text button of a text field: its first button, once ready.
    ///
    /// `None` uses the configured default timeout.
    pub fn text_field_clear_button(&self, timeout: Option<Duration>) -> PomResult<Self> {
        let timeout = timeout.unwrap_or_else(|| self.config().default_timeout());
        wait_for_existence(self.buttons().first_match(), timeout, true)
    }
}

// =============================================================================
// ELEMENT SET
// =============================================================================

/// Live handle to every element a query matches
pub struct ElementSet<D> {
    session: Rc<Session<D>>,
    query: ElementQuery,
}

impl<D> Clone for ElementSet<D> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            query: self.query.clone(),
        }
    }
}

impl<D> fmt::Debug for ElementSet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementSet")
            .field(&self.query.to_string())
            .finish()
    }
}

impl<D: UiDriver> ElementSet<D> {
    fn single(&self, step: QueryStep) -> Element<D> {
        Element::new(Rc::clone(&self.session), self.query.then(step))
    }

    fn narrowed(&self, step: QueryStep) -> Self {
        Self {
            session: Rc::clone(&self.session),
            query: self.query.then(step),
        }
    }

    /// The query this set re-evaluates
    #[must_use]
    pub fn query(&self) -> &ElementQuery {
        &self.query
    }

    /// The element with the given identifier
    #[must_use]
    pub fn get(&self, identifier: impl Into<String>) -> Element<D> {
        self.single(QueryStep::Identifier(identifier.into()))
    }

    /// The element at `index`
    #[must_use]
    pub fn element_bound_by(&self, index: usize) -> Element<D> {
        self.single(QueryStep::Index(index))
    }

    /// The first matching element
    #[must_use]
    pub fn first_match(&self) -> Element<D> {
        self.single(QueryStep::FirstMatch)
    }

    /// The single matching element
    #[must_use]
    pub fn element(&self) -> Element<D> {
        self.single(QueryStep::Only)
    }

    /// Narrow to elements with the given identifier
    #[must_use]
    pub fn matching_identifier(&self, identifier: impl Into<String>) -> Self {
        self.narrowed(QueryStep::MatchingIdentifier(identifier.into()))
    }

    /// Descendants of every element in the set
    #[must_use]
    pub fn descendants(&self, ty: ElementType) -> Self {
        self.narrowed(QueryStep::Descendants(ty))
    }

    /// Direct children of every element in the set
    #[must_use]
    pub fn children(&self, ty: ElementType) -> Self {
        self.narrowed(QueryStep::Children(ty))
    }

    /// Number of elements currently matched. Never waits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.session.driver.count(&self.query)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::mock::{MockDriver, MockNode};

    fn app_with(driver: MockDriver, clock: &ManualClock) -> App<MockDriver> {
        App::with_clock(driver, PomConfig::default(), clock.clone()).unwrap()
    }

    mod app_tests {
        use super::*;

        #[test]
        fn test_invalid_config_rejected() {
            let clock = ManualClock::new();
            let config = PomConfig::new().with_poll_interval(Duration::ZERO);
            let result = App::with_clock(MockDriver::new(clock.clone()), config, clock);
            assert!(result.is_err());
        }

        #[test]
        fn test_clones_share_root() {
            let clock = ManualClock::new();
            let app = app_with(MockDriver::new(clock.clone()), &clock);
            let other = app.clone();
            assert!(app.same_root(&other));
            assert!(app.root().app().same_root(&app));
        }

        #[test]
        fn test_root_exists() {
            let clock = ManualClock::new();
            let app = app_with(MockDriver::new(clock.clone()), &clock);
            assert!(app.root().exists());
            assert!(app.root().query().is_root());
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_state_transitions_follow_live_tree() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            driver.add(
                MockDriver::ROOT,
                MockNode::button("save")
                    .appears_at(Duration::from_secs(1))
                    .hittable_at(Duration::from_secs(2)),
            );
            let app = app_with(driver, &clock);
            let save = app.descendants(ElementType::Button).get("save");

            assert_eq!(save.state(), ElementState::Absent);
            clock.advance(Duration::from_secs(1));
            assert_eq!(save.state(), ElementState::PresentNotInteractable);
            clock.advance(Duration::from_secs(1));
            assert_eq!(save.state(), ElementState::PresentInteractable);
            assert!(save.state().exists());
        }

        #[test]
        fn test_identifier_falls_back_to_query() {
            let clock = ManualClock::new();
            let app = app_with(MockDriver::new(clock.clone()), &clock);
            let ghost = app.descendants(ElementType::Button).get("ghost");
            assert_eq!(ghost.identifier(), "ghost");
        }

        #[test]
        fn test_interactions_are_recorded() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            driver.add(MockDriver::ROOT, MockNode::new(ElementType::TextField).id("email"));
            let app = app_with(driver, &clock);
            let email = app.root().text_fields().get("email");
            email.tap().unwrap();
            email.type_text("a@b.c").unwrap();
            email.swipe_left(SwipeVelocity::Slow).unwrap();
            let actions = app.driver().actions();
            assert_eq!(actions.len(), 3);
            assert!(actions[1].contains("a@b.c"));
        }

        #[test]
        fn test_interaction_on_absent_element_fails() {
            let clock = ManualClock::new();
            let app = app_with(MockDriver::new(clock.clone()), &clock);
            assert!(app.root().buttons().get("nope").tap().is_err());
        }

        #[test]
        fn test_clear_button_of_text_field() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            let field = driver.add(MockDriver::ROOT, MockNode::new(ElementType::TextField).id("search"));
            driver.add(field, MockNode::button("Clear text"));
            let app = app_with(driver, &clock);
            let clear = app
                .root()
                .text_fields()
                .get("search")
                .text_field_clear_button(Some(Duration::from_secs(1)))
                .unwrap();
            assert_eq!(clear.identifier(), "Clear text");
            assert_eq!(clock.sleeps(), 0);
        }
    }

    mod set_tests {
        use super::*;

        #[test]
        fn test_count_and_matching() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            for _ in 0..3 {
                driver.add(MockDriver::ROOT, MockNode::static_text("price"));
            }
            driver.add(MockDriver::ROOT, MockNode::static_text("total"));
            let app = app_with(driver, &clock);
            let texts = app.root().static_texts();
            assert_eq!(texts.count(), 4);
            assert_eq!(texts.matching_identifier("price").count(), 3);
            assert_eq!(texts.matching_identifier("missing").count(), 0);
        }

        #[test]
        fn test_element_requires_single_match() {
            let clock = ManualClock::new();
            let driver = MockDriver::new(clock.clone());
            driver.add(MockDriver::ROOT, MockNode::new(ElementType::Alert).id("first"));
            let app = app_with(driver, &clock);
            let alerts = app.descendants(ElementType::Alert);
            assert!(alerts.element().exists());
            app.driver()
                .add(MockDriver::ROOT, MockNode::new(ElementType::Alert).id("second"));
            assert!(!alerts.element().exists());
            assert!(alerts.first_match().exists());
            assert!(alerts.element_bound_by(1).exists());
            assert!(!alerts.element_bound_by(2).exists());
        }
    }
}
