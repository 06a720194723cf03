//! Bounded existence/hittability wait.
//!
//! Every accessor in pomkit ends here: given a live element handle and a
//! deadline, return the handle once it exists (and, by default, is
//! hittable) or fail with a classified error.
//!
//! ## Algorithm
//!
//! 1. Check once immediately. A settled UI returns without sleeping.
//! 2. Otherwise sleep `min(poll_interval, remaining)` and re-check until
//!    ready or until the elapsed time reaches the timeout. The final check
//!    happens at the deadline, so a failure is never reported early.
//! 3. On timeout, an element observed existing at any check is reported as
//!    [`PomError::NotHittable`], otherwise as [`PomError::NotFound`]. With
//!    [`FailureClassification::Collapsed`] both are reported as `NotFound`.
//!
//! A zero poll interval never advances time and is rejected with
//! [`PomError::InvalidConfig`] before the first check.

use crate::config::FailureClassification;
use crate::driver::UiDriver;
use crate::element::{Element, ElementState};
use crate::result::{PomError, PomResult};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Options for a single wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// How long to wait before failing
    pub timeout: Duration,
    /// Whether hittability is required in addition to existence
    pub check_hittable: bool,
    /// Delay between checks; `None` uses the application's config
    pub poll_interval: Option<Duration>,
    /// Failure reporting; `None` uses the application's config
    pub classification: Option<FailureClassification>,
}

impl WaitOptions {
    /// Wait up to `timeout` for an existing, hittable element
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            check_hittable: true,
            poll_interval: None,
            classification: None,
        }
    }

    /// Set whether hittability is required
    #[must_use]
    pub const fn with_check_hittable(mut self, check_hittable: bool) -> Self {
        self.check_hittable = check_hittable;
        self
    }

    /// Override the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Override the failure classification
    #[must_use]
    pub const fn with_classification(mut self, classification: FailureClassification) -> Self {
        self.classification = Some(classification);
        self
    }
}

/// Wait for `element` to exist and, if `check_hittable`, to be hittable.
///
/// Returns the same handle on success. See the module docs for the exact
/// polling and failure rules.
pub fn wait_for_existence<D: UiDriver>(
    element: Element<D>,
    timeout: Duration,
    check_hittable: bool,
) -> PomResult<Element<D>> {
    wait_with(
        element,
        WaitOptions::new(timeout).with_check_hittable(check_hittable),
    )
}

/// Wait for `element` using explicit options
pub fn wait_with<D: UiDriver>(element: Element<D>, options: WaitOptions) -> PomResult<Element<D>> {
    let poll_interval = options
        .poll_interval
        .unwrap_or_else(|| element.config().poll_interval());
    if poll_interval.is_zero() {
        return Err(PomError::InvalidConfig {
            message: "poll interval must be greater than zero".into(),
        });
    }
    let classification = options
        .classification
        .unwrap_or(element.config().failure_classification);
    let identifier = element.identifier();

    let ready = |state: ElementState| match state {
        ElementState::PresentInteractable => true,
        ElementState::PresentNotInteractable => !options.check_hittable,
        ElementState::Absent => false,
    };

    let state = check(&element, options.check_hittable);
    trace!(identifier = %identifier, ?state, "initial check");
    if ready(state) {
        debug!(identifier = %identifier, "element exists");
        return Ok(element);
    }

    let clock = element.clock();
    let start = clock.now();
    let mut seen = state.exists();
    let mut polls = 0_u32;

    loop {
        let elapsed = clock.now().saturating_sub(start);
        if elapsed >= options.timeout {
            break;
        }
        clock.sleep(poll_interval.min(options.timeout - elapsed));
        polls += 1;

        let state = check(&element, options.check_hittable);
        seen |= state.exists();
        trace!(identifier = %identifier, ?state, polls, "poll");
        if ready(state) {
            debug!(
                identifier = %identifier,
                elapsed_ms = clock.now().saturating_sub(start).as_millis() as u64,
                polls,
                "element appears"
            );
            return Ok(element);
        }
    }

    Err(timeout_error(&element, identifier, options, seen, classification))
}

/// Observe the element. Hittability is only asked for when it matters.
fn check<D: UiDriver>(element: &Element<D>, check_hittable: bool) -> ElementState {
    if !element.exists() {
        ElementState::Absent
    } else if check_hittable && !element.is_hittable() {
        ElementState::PresentNotInteractable
    } else {
        ElementState::PresentInteractable
    }
}

fn timeout_error<D: UiDriver>(
    element: &Element<D>,
    identifier: String,
    options: WaitOptions,
    seen: bool,
    classification: FailureClassification,
) -> PomError {
    let debug_description = element.debug_description();
    let query = element.query().to_string();
    let timeout_ms = options.timeout.as_millis() as u64;

    if seen && options.check_hittable && classification == FailureClassification::Distinct {
        warn!(identifier = %identifier, timeout_ms, "element exists, but is not hittable");
        PomError::NotHittable {
            identifier,
            query,
            timeout_ms,
            debug_description,
        }
    } else {
        warn!(
            identifier = %identifier,
            timeout_ms,
            debug = %debug_description,
            "element did not appear within the timeout"
        );
        PomError::NotFound {
            identifier,
            query,
            timeout_ms,
            debug_description,
        }
    }
}
