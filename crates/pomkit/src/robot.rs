//! Robots: screen-level operations.
//!
//! A robot holds the same shared [`App`] as the pages it drives and adds
//! operations that concern a whole screen rather than one element. Robots
//! are composed from pages, never derived from them:
//!
//! ```
//! use pomkit::mock::{MockDriver, MockNode};
//! use pomkit::page::{BasePage, Page};
//! use pomkit::robot::{BaseRobot, Robot};
//! use pomkit::{App, ManualClock, PomConfig};
//!
//! let clock = ManualClock::new();
//! let driver = MockDriver::new(clock.clone());
//! driver.add(MockDriver::ROOT, MockNode::button("next"));
//! let app = App::with_clock(driver, PomConfig::default(), clock).unwrap();
//!
//! let robot = BaseRobot::new(app);
//! let page: BasePage<_> = robot.page();
//! page.button("next").unwrap().tap().unwrap();
//! ```

use crate::driver::UiDriver;
use crate::element::App;
use crate::page::FromApp;
use std::fmt;

#[cfg(feature = "audit")]
use crate::{
    capabilities::{Platform, PlatformCapabilities},
    driver::{AuditFinding, AuditType},
    element::Element,
    result::{PomError, PomResult},
};
#[cfg(feature = "audit")]
use tracing::{debug, error, warn};

/// Caller predicate deciding whether an audit issue on an element is ignored
#[cfg(feature = "audit")]
pub type AuditHandler<'h, D> = &'h mut dyn FnMut(&Element<D>) -> PomResult<bool>;

/// Screen-level façade over a shared application root
pub trait Robot<D: UiDriver> {
    /// Application root shared with the pages this robot uses
    fn app(&self) -> &App<D>;

    /// Build a page over the same root
    fn page<P: FromApp<D>>(&self) -> P {
        P::from_app(self.app().clone())
    }

    /// Run an accessibility scan over the current screen.
    ///
    /// `handler` is called once for every issue attributed to an element.
    /// Returning `Ok(true)` suppresses that issue; an `Err` aborts the audit.
    /// Issues without an element are always reported. All reported issues
    /// are collected into one [`PomError::AuditFailure`].
    ///
    /// A handler error is returned as is when nothing has been reported
    /// yet. Otherwise it comes back as [`PomError::AuditAborted`] together
    /// with the findings collected so far.
    ///
    /// Fails with [`PomError::Unsupported`] before scanning when the
    /// platform cannot run audits.
    #[cfg(feature = "audit")]
    fn perform_accessibility_audit(
        &self,
        types: &[AuditType],
        handler: Option<AuditHandler<'_, D>>,
    ) -> PomResult<()> {
        run_audit(self.app(), types, handler)
    }
}

#[cfg(feature = "audit")]
fn run_audit<D: UiDriver>(
    app: &App<D>,
    types: &[AuditType],
    mut handler: Option<AuditHandler<'_, D>>,
) -> PomResult<()> {
    if !app.config().capabilities.supports_accessibility_audit {
        warn!("accessibility audit requested on an unsupported platform");
        return Err(PomError::Unsupported {
            operation: "accessibility audit".into(),
            requirement: audit_requirements(),
        });
    }

    let issues = app.driver().accessibility_audit(types)?;
    debug!(issues = issues.len(), "accessibility scan finished");

    let mut findings = Vec::new();
    for issue in issues {
        let element = issue.element.map(|query| app.element(query));
        if let (Some(element), Some(handler)) = (&element, handler.as_deref_mut()) {
            let suppressed = match handler(element) {
                Ok(suppressed) => suppressed,
                Err(source) if findings.is_empty() => return Err(source),
                Err(source) => {
                    error!(
                        reported = findings.len(),
                        "audit handler failed: {source}"
                    );
                    return Err(PomError::AuditAborted {
                        findings,
                        source: Box::new(source),
                    });
                }
            };
            if suppressed {
                debug!(
                    audit_type = %issue.audit_type,
                    identifier = %element.identifier(),
                    "audit issue suppressed"
                );
                continue;
            }
        }

        let finding = AuditFinding {
            audit_type: issue.audit_type,
            description: issue.compact_description,
            element: element.as_ref().map(Element::identifier),
            debug_description: element.as_ref().map(Element::debug_description),
        };
        error!(
            audit_type = %finding.audit_type,
            element = finding.element.as_deref().unwrap_or("<none>"),
            detail = %issue.detailed_description,
            "{}",
            finding.description
        );
        findings.push(finding);
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(PomError::AuditFailure { findings })
    }
}

#[cfg(feature = "audit")]
fn audit_requirements() -> String {
    let minimums = [
        Platform::Ios,
        Platform::TvOs,
        Platform::MacOs,
        Platform::WatchOs,
        Platform::VisionOs,
    ]
    .map(PlatformCapabilities::audit_requirement);
    format!("requires one of {}", minimums.join(", "))
}

/// A robot with no operations beyond the [`Robot`] defaults
pub struct BaseRobot<D> {
    app: App<D>,
}

impl<D: UiDriver> BaseRobot<D> {
    /// Robot over `app`
    #[must_use]
    pub fn new(app: App<D>) -> Self {
        Self { app }
    }

    /// Sibling robot sharing another robot's root
    #[must_use]
    pub fn from_robot(robot: &impl Robot<D>) -> Self {
        Self::new(robot.app().clone())
    }
}

impl<D: UiDriver> Robot<D> for BaseRobot<D> {
    fn app(&self) -> &App<D> {
        &self.app
    }
}

impl<D: UiDriver> FromApp<D> for BaseRobot<D> {
    fn from_app(app: App<D>) -> Self {
        Self::new(app)
    }
}

impl<D> Clone for BaseRobot<D> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
        }
    }
}

impl<D> fmt::Debug for BaseRobot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseRobot").field("app", &self.app).finish()
    }
}
