//! Page objects.
//!
//! A screen is any type that holds an [`App`] and implements [`Page`]. Every
//! accessor follows the same shape: build a query for an element category
//! and identifier, scope it under a container (the app root unless told
//! otherwise), then hand it to [`wait_for_existence`].
//!
//! ```
//! use pomkit::mock::{MockDriver, MockNode};
//! use pomkit::page::{FromApp, Page};
//! use pomkit::{App, ManualClock, PomConfig, PomResult};
//!
//! struct LoginScreen {
//!     app: App<MockDriver>,
//! }
//!
//! impl Page<MockDriver> for LoginScreen {
//!     fn app(&self) -> &App<MockDriver> {
//!         &self.app
//!     }
//! }
//!
//! impl FromApp<MockDriver> for LoginScreen {
//!     fn from_app(app: App<MockDriver>) -> Self {
//!         Self { app }
//!     }
//! }
//!
//! impl LoginScreen {
//!     fn log_in(&self) -> PomResult<()> {
//!         self.button("loginButton")?.tap()
//!     }
//! }
//!
//! let clock = ManualClock::new();
//! let driver = MockDriver::new(clock.clone());
//! driver.add(MockDriver::ROOT, MockNode::button("loginButton"));
//! let app = App::with_clock(driver, PomConfig::default(), clock).unwrap();
//! LoginScreen::from_app(app).log_in().unwrap();
//! ```

use crate::descriptor::ElementDescriptor;
use crate::driver::{SwipeVelocity, UiDriver};
use crate::element::{App, Element, ElementSet};
use crate::query::ElementType;
use crate::result::PomResult;
use crate::wait::wait_for_existence;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Construct a screen from a shared application root
pub trait FromApp<D> {
    /// Build the screen over `app`
    fn from_app(app: App<D>) -> Self;
}

/// Per-screen catalogue of element accessors.
///
/// Only [`Page::app`] is required. The provided methods use the configured
/// default timeout and the app root as scope; call [`Page::lookup`] to
/// change either.
pub trait Page<D: UiDriver> {
    /// Application root this screen reads from
    fn app(&self) -> &App<D>;

    /// Accessor builder with default options
    fn lookup(&self) -> Lookup<'_, D> {
        Lookup::new(self.app())
    }

    /// Button with the given identifier
    fn button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().button(locator)
    }

    /// Button inside the tab bar
    fn tab_bar_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().tab_bar_button(locator)
    }

    /// Text field
    fn text_field(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().text_field(locator)
    }

    /// Secure text field
    fn secure_text_field(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().secure_text_field(locator)
    }

    /// Static text; hittability is not required
    fn static_text(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().static_text(locator)
    }

    /// Switch
    fn switch(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().switch(locator)
    }

    /// Decrement half of a stepper
    fn stepper_minus_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().stepper_minus_button(locator)
    }

    /// Increment half of a stepper
    fn stepper_plus_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().stepper_plus_button(locator)
    }

    /// Menu
    fn menu(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().menu(locator)
    }

    /// Navigation bar
    fn navigation_bar(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().navigation_bar(locator)
    }

    /// Key of the on-screen keyboard
    fn keyboard_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().keyboard_button(locator)
    }

    /// Alert
    fn alert(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().alert(locator)
    }

    /// Title of the presented alert
    fn alert_title(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().alert_title(locator)
    }

    /// Button of the presented alert by position
    fn alert_button(&self, index: usize) -> PomResult<Element<D>> {
        self.lookup().alert_button(index)
    }

    /// Activity indicator
    fn activity_indicator(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().activity_indicator(locator)
    }

    /// First page indicator
    fn page_indicator(&self) -> PomResult<Element<D>> {
        self.lookup().page_indicator()
    }

    /// Collection view
    fn collection_view(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().collection_view(locator)
    }

    /// Generic container
    fn other_element(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.lookup().other_element(locator)
    }

    /// Back button of the navigation bar
    fn back_button(&self) -> PomResult<Element<D>> {
        self.lookup().back_button()
    }

    /// Static texts currently matching the identifier
    fn static_text_count(&self, locator: impl ElementDescriptor) -> usize {
        self.lookup().static_text_count(locator)
    }

    /// Buttons currently matching the identifier
    fn button_count(&self, locator: impl ElementDescriptor) -> usize {
        self.lookup().button_count(locator)
    }

    /// Generic containers currently matching the identifier
    fn other_element_count(&self, locator: impl ElementDescriptor) -> usize {
        self.lookup().other_element_count(locator)
    }

    /// Swipe the main window up
    fn swipe_up_screen(&self) -> PomResult<()> {
        self.lookup().swipe_up_screen()
    }

    /// Swipe the main window down, e.g. to dismiss a sheet
    fn swipe_down_screen(&self) -> PomResult<()> {
        self.lookup().swipe_down_screen()
    }
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Accessor builder carrying timeout, scope and hittability options.
///
/// ```ignore
/// let row = screen
///     .lookup()
///     .timeout(Duration::from_secs(2))
///     .within(&list)
///     .static_text(DynamicDescriptor::new(format!("row-{id}")))?;
/// ```
///
/// Navigation bars, alerts and the back button always resolve from the app
/// root; `within` does not apply to them.
pub struct Lookup<'a, D> {
    app: &'a App<D>,
    timeout: Option<Duration>,
    scope: Option<Element<D>>,
    check_hittable: Option<bool>,
}

impl<D> fmt::Debug for Lookup<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("timeout", &self.timeout)
            .field("scope", &self.scope)
            .field("check_hittable", &self.check_hittable)
            .finish()
    }
}

impl<'a, D: UiDriver> Lookup<'a, D> {
    /// Builder over `app` with default options
    #[must_use]
    pub fn new(app: &'a App<D>) -> Self {
        Self {
            app,
            timeout: None,
            scope: None,
            check_hittable: None,
        }
    }

    /// Wait at most `timeout`
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Search under `container` instead of the app root
    #[must_use]
    pub fn within(mut self, container: &Element<D>) -> Self {
        self.scope = Some(container.clone());
        self
    }

    /// Override whether hittability is required
    #[must_use]
    pub fn check_hittable(mut self, check_hittable: bool) -> Self {
        self.check_hittable = Some(check_hittable);
        self
    }

    fn scope(&self) -> Element<D> {
        self.scope.clone().unwrap_or_else(|| self.app.root())
    }

    fn scoped(&self, ty: ElementType) -> ElementSet<D> {
        self.scope().descendants(ty)
    }

    fn rooted(&self, ty: ElementType) -> ElementSet<D> {
        self.app.descendants(ty)
    }

    fn wait(&self, element: Element<D>, hittable_by_default: bool) -> PomResult<Element<D>> {
        let timeout = self
            .timeout
            .unwrap_or_else(|| self.app.config().default_timeout());
        let check_hittable = self.check_hittable.unwrap_or(hittable_by_default);
        wait_for_existence(element, timeout, check_hittable)
    }

    /// Button with the given identifier
    pub fn button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.scoped(ElementType::Button).get(locator.id()), true)
    }

    /// Button inside a tab bar
    pub fn tab_bar_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let button = self
            .scoped(ElementType::TabBar)
            .descendants(ElementType::Button)
            .get(locator.id());
        self.wait(button, true)
    }

    /// Text field
    pub fn text_field(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.scoped(ElementType::TextField).get(locator.id()), true)
    }

    /// Secure text field
    pub fn secure_text_field(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let field = self.scoped(ElementType::SecureTextField).get(locator.id());
        self.wait(field, true)
    }

    /// Static text; hittability is not required unless overridden
    pub fn static_text(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.scoped(ElementType::StaticText).get(locator.id()), false)
    }

    /// The switch control inside the switch with the given identifier
    pub fn switch(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let control = self
            .scoped(ElementType::Switch)
            .get(locator.id())
            .descendants(ElementType::Switch)
            .element_bound_by(0);
        self.wait(control, true)
    }

    /// Button `index` of a stepper
    pub fn stepper_button(
        &self,
        locator: impl ElementDescriptor,
        index: usize,
    ) -> PomResult<Element<D>> {
        let button = self
            .scoped(ElementType::Stepper)
            .get(locator.id())
            .buttons()
            .element_bound_by(index);
        self.wait(button, true)
    }

    /// Decrement half of a stepper
    pub fn stepper_minus_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.stepper_button(locator, 0)
    }

    /// Increment half of a stepper
    pub fn stepper_plus_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.stepper_button(locator, 1)
    }

    /// Menu, exposed as static text.
    ///
    /// On platforms that wrap menus in containers the handle is narrowed to
    /// its first match.
    pub fn menu(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let text = self.static_text(locator)?;
        if self.app.config().capabilities.requires_descendant_drill_down {
            debug!(identifier = %text.identifier(), "menu drill-down");
            Ok(text.first_match())
        } else {
            Ok(text)
        }
    }

    /// Navigation bar
    pub fn navigation_bar(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.rooted(ElementType::NavigationBar).get(locator.id()), true)
    }

    /// Key of the on-screen keyboard
    pub fn keyboard_button(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let key = self
            .scoped(ElementType::Keyboard)
            .descendants(ElementType::Button)
            .get(locator.id());
        self.wait(key, true)
    }

    /// Alert
    pub fn alert(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.rooted(ElementType::Alert).get(locator.id()), true)
    }

    /// Title of the single presented alert; hittability not required
    pub fn alert_title(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let title = self
            .rooted(ElementType::Alert)
            .element()
            .static_texts()
            .get(locator.id());
        self.wait(title, false)
    }

    /// Button `index` of the presented alert
    pub fn alert_button(&self, index: usize) -> PomResult<Element<D>> {
        let button = self
            .rooted(ElementType::Alert)
            .descendants(ElementType::ScrollView)
            .descendants(ElementType::Other)
            .descendants(ElementType::Button)
            .element_bound_by(index);
        self.wait(button, true)
    }

    /// Activity indicator
    pub fn activity_indicator(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let spinner = self.scoped(ElementType::ActivityIndicator).get(locator.id());
        self.wait(spinner, true)
    }

    /// First page indicator
    pub fn page_indicator(&self) -> PomResult<Element<D>> {
        self.wait(self.scoped(ElementType::PageIndicator).element_bound_by(0), true)
    }

    /// Collection view
    pub fn collection_view(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        let view = self.scoped(ElementType::CollectionView).get(locator.id());
        self.wait(view, true)
    }

    /// Generic container
    pub fn other_element(&self, locator: impl ElementDescriptor) -> PomResult<Element<D>> {
        self.wait(self.scoped(ElementType::Other).get(locator.id()), true)
    }

    /// First button of the first navigation bar
    pub fn back_button(&self) -> PomResult<Element<D>> {
        let back = self
            .rooted(ElementType::NavigationBar)
            .first_match()
            .buttons()
            .element_bound_by(0);
        self.wait(back, true)
    }

    /// Static texts currently matching the identifier. Never waits.
    #[must_use]
    pub fn static_text_count(&self, locator: impl ElementDescriptor) -> usize {
        self.scoped(ElementType::StaticText)
            .matching_identifier(locator.id())
            .count()
    }

    /// Buttons currently matching the identifier. Never waits.
    #[must_use]
    pub fn button_count(&self, locator: impl ElementDescriptor) -> usize {
        self.scoped(ElementType::Button)
            .matching_identifier(locator.id())
            .count()
    }

    /// Generic containers currently matching the identifier. Never waits.
    #[must_use]
    pub fn other_element_count(&self, locator: impl ElementDescriptor) -> usize {
        self.scoped(ElementType::Other)
            .matching_identifier(locator.id())
            .count()
    }

    fn main_window(&self) -> PomResult<Element<D>> {
        self.wait(self.app.children(ElementType::Window).element_bound_by(0), true)
    }

    /// Swipe the main window up
    pub fn swipe_up_screen(&self) -> PomResult<()> {
        self.main_window()?.swipe_up(SwipeVelocity::Fast)
    }

    /// Swipe the main window down
    pub fn swipe_down_screen(&self) -> PomResult<()> {
        self.main_window()?.swipe_down(SwipeVelocity::Fast)
    }
}

// =============================================================================
// BASE PAGE
// =============================================================================

/// A page with no accessors beyond the [`Page`] defaults
pub struct BasePage<D> {
    app: App<D>,
}

impl<D: UiDriver> BasePage<D> {
    /// Page over `app`
    #[must_use]
    pub fn new(app: App<D>) -> Self {
        Self { app }
    }

    /// Page sharing the root of another page
    #[must_use]
    pub fn from_page(page: &impl Page<D>) -> Self {
        Self::new(page.app().clone())
    }
}

impl<D: UiDriver> Page<D> for BasePage<D> {
    fn app(&self) -> &App<D> {
        &self.app
    }
}

impl<D: UiDriver> FromApp<D> for BasePage<D> {
    fn from_app(app: App<D>) -> Self {
        Self::new(app)
    }
}

impl<D> Clone for BasePage<D> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
        }
    }
}

impl<D> fmt::Debug for BasePage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasePage").field("app", &self.app).finish()
    }
}
