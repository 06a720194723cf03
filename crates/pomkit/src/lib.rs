//! pomkit: Page-Object-Model helpers for UI test automation
//!
//! Typed element accessors over a UI automation driver, backed by one
//! bounded wait that tells "never appeared" apart from "appeared but not
//! interactable".
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Test         │   │ Page / Robot │   │ wait_for_    │   │ UiDriver     │
//! │ (descriptor) │──►│ accessor     │──►│ existence    │──►│ (device or   │
//! │              │   │ builds query │   │ polls query  │   │  MockDriver) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pomkit::mock::{MockDriver, MockNode};
//! use pomkit::page::{FromApp, Page};
//! use pomkit::{App, ElementDescriptor, ManualClock, PomConfig, PomResult};
//!
//! #[derive(ElementDescriptor)]
//! enum Login {
//!     UsernameField,
//!     #[descriptor(id = "login.submit")]
//!     Submit,
//! }
//!
//! struct LoginPage {
//!     app: App<MockDriver>,
//! }
//!
//! impl Page<MockDriver> for LoginPage {
//!     fn app(&self) -> &App<MockDriver> {
//!         &self.app
//!     }
//! }
//!
//! impl FromApp<MockDriver> for LoginPage {
//!     fn from_app(app: App<MockDriver>) -> Self {
//!         Self { app }
//!     }
//! }
//!
//! impl LoginPage {
//!     fn log_in(&self, user: &str) -> PomResult<()> {
//!         self.text_field(Login::UsernameField)?.type_text(user)?;
//!         self.button(Login::Submit)?.tap()
//!     }
//! }
//!
//! let clock = ManualClock::new();
//! let driver = MockDriver::new(clock.clone());
//! driver.add(
//!     MockDriver::ROOT,
//!     MockNode::new(pomkit::ElementType::TextField).id("usernameField"),
//! );
//! driver.add(MockDriver::ROOT, MockNode::button("login.submit"));
//!
//! let app = App::with_clock(driver, PomConfig::default(), clock).unwrap();
//! LoginPage::from_app(app).log_in("ada").unwrap();
//! ```
//!
//! # Threading
//!
//! Handles share their session through an `Rc` and cannot leave the thread
//! that created the [`App`]. Every query, check and gesture therefore runs
//! on the UI thread that owns the driver.

#![warn(missing_docs)]

extern crate self as pomkit;

mod capabilities;
mod clock;
mod config;
mod descriptor;
mod driver;
mod element;
mod query;
mod result;
mod wait;

/// Scripted in-memory driver for unit tests
pub mod mock;

/// Page trait, accessor builder and base page
#[allow(clippy::missing_errors_doc)]
pub mod page;

/// Robot trait, base robot and accessibility audit
#[allow(clippy::missing_errors_doc)]
pub mod robot;

/// Log initialisation helpers
pub mod tracing_support;

pub use capabilities::{Platform, PlatformCapabilities, PlatformVersion};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FailureClassification, PomConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use descriptor::{Descriptor, DynamicDescriptor, ElementDescriptor};
pub use driver::{
    AuditFinding, AuditIssue, AuditType, SwipeDirection, SwipeVelocity, UiDriver,
};
pub use element::{App, Element, ElementSet, ElementState};
pub use query::{ElementQuery, ElementType, QueryStep};
pub use result::{PomError, PomResult};
pub use wait::{wait_for_existence, wait_with, WaitOptions};

/// `#[derive(ElementDescriptor)]` for fieldless enums
#[cfg(feature = "derive")]
pub use pomkit_derive::ElementDescriptor;

/// Everything a page-object module usually needs
pub mod prelude {
    pub use crate::page::{BasePage, FromApp, Lookup, Page};
    pub use crate::robot::{BaseRobot, Robot};
    pub use crate::{
        App, DynamicDescriptor, Element, ElementDescriptor, ElementSet, ElementType, PomConfig,
        PomError, PomResult, SwipeVelocity, UiDriver,
    };
}
