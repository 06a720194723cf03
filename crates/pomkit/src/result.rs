//! Result and error types for pomkit.

use crate::driver::AuditFinding;
use thiserror::Error;

/// Result type for pomkit operations
pub type PomResult<T> = Result<T, PomError>;

/// Errors that can occur in pomkit
#[derive(Debug, Error)]
pub enum PomError {
    /// Element never reached existence within the timeout
    #[error(
        "Element `{identifier}` ({query}) did not appear within {timeout_ms}ms\n\
         Element debug description:\n{debug_description}"
    )]
    NotFound {
        /// Logical identifier the element was looked up by
        identifier: String,
        /// Rendered query path
        query: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
        /// Driver snapshot of the element at failure time
        debug_description: String,
    },

    /// Element existed but never became hittable within the timeout
    #[error(
        "Element `{identifier}` ({query}) exists but was not hittable within {timeout_ms}ms\n\
         Element debug description:\n{debug_description}"
    )]
    NotHittable {
        /// Logical identifier the element was looked up by
        identifier: String,
        /// Rendered query path
        query: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
        /// Driver snapshot of the element at failure time
        debug_description: String,
    },

    /// Accessibility audit reported issues that were not suppressed
    #[error("Accessibility audit failed with {} issue(s):\n{}", findings.len(), render_findings(findings))]
    AuditFailure {
        /// One finding per unsuppressed issue
        findings: Vec<AuditFinding>,
    },

    /// Audit handler failed after some issues had already been reported
    #[error("Accessibility audit aborted by handler: {source}\n{} issue(s) reported before the abort:\n{}", findings.len(), render_findings(findings))]
    AuditAborted {
        /// Findings collected before the handler failed
        findings: Vec<AuditFinding>,
        /// Error returned by the handler
        #[source]
        source: Box<PomError>,
    },

    /// Operation not available on the configured platform
    #[error("{operation} is not supported: {requirement}")]
    Unsupported {
        /// Operation that was refused
        operation: String,
        /// What the platform is missing
        requirement: String,
    },

    /// Underlying driver failed to perform an interaction
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration is malformed or inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PomError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this is one of the two wait failures
    #[must_use]
    pub const fn is_wait_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotHittable { .. })
    }

    /// Identifier of the element this error is about, if any
    #[must_use]
    pub fn element_identifier(&self) -> Option<&str> {
        match self {
            Self::NotFound { identifier, .. } | Self::NotHittable { identifier, .. } => {
                Some(identifier)
            }
            _ => None,
        }
    }
}

fn render_findings(findings: &[AuditFinding]) -> String {
    findings
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::driver::AuditType;

    #[test]
    fn test_not_found_message_names_element() {
        let err = PomError::NotFound {
            identifier: "missingField".into(),
            query: "app.textFields[\"missingField\"]".into(),
            timeout_ms: 1000,
            debug_description: "<absent>".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("missingField"));
        assert!(msg.contains("1000ms"));
        assert!(msg.contains("<absent>"));
        assert!(err.is_wait_failure());
        assert_eq!(err.element_identifier(), Some("missingField"));
    }

    #[test]
    fn test_not_hittable_message() {
        let err = PomError::NotHittable {
            identifier: "submit".into(),
            query: "app.buttons[\"submit\"]".into(),
            timeout_ms: 250,
            debug_description: "Button, identifier: 'submit'".into(),
        };
        assert!(err.to_string().contains("not hittable"));
        assert!(err.is_wait_failure());
    }

    #[test]
    fn test_audit_failure_lists_findings() {
        let err = PomError::AuditFailure {
            findings: vec![
                AuditFinding {
                    audit_type: AuditType::Contrast,
                    description: "Low contrast".into(),
                    element: Some("title".into()),
                    debug_description: None,
                },
                AuditFinding {
                    audit_type: AuditType::HitRegion,
                    description: "Hit region too small".into(),
                    element: None,
                    debug_description: None,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 issue(s)"));
        assert!(msg.contains("Low contrast"));
        assert!(msg.contains("Hit region too small"));
        assert!(!err.is_wait_failure());
        assert!(err.element_identifier().is_none());
    }

    #[test]
    fn test_audit_aborted_keeps_findings_and_source() {
        use std::error::Error as _;

        let err = PomError::AuditAborted {
            findings: vec![AuditFinding {
                audit_type: AuditType::Contrast,
                description: "Low contrast".into(),
                element: Some("logo".into()),
                debug_description: None,
            }],
            source: Box::new(PomError::driver("predicate failed")),
        };
        let msg = err.to_string();
        assert!(msg.contains("predicate failed"));
        assert!(msg.contains("1 issue(s)"));
        assert!(msg.contains("Low contrast"));
        assert!(err.source().is_some());
        assert!(!err.is_wait_failure());
    }

    #[test]
    fn test_driver_helper() {
        let err = PomError::driver("gesture injection failed");
        assert_eq!(err.to_string(), "Driver error: gesture injection failed");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err: PomError = io.into();
        assert!(matches!(err, PomError::Io(_)));
    }
}
