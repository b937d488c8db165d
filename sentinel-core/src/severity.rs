use std::fmt;

/// Labels the model is asked to assign to each log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Suspicious,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Suspicious, Severity::Info];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Suspicious => "SUSPICIOUS",
            Severity::Info => "INFO",
        }
    }

    /// Guidance line written into the prompt for this tier.
    pub fn guidance(&self) -> &'static str {
        match self {
            Severity::Critical => {
                "Immediate threat. Privilege escalation, public exposure of data, \
                 or activity from a known-malicious source. Examples: an IAM policy \
                 such as AdministratorAccess attached to a user or role, a bucket \
                 ACL or policy opened to everyone, failed root console logins."
            }
            Severity::Suspicious => {
                "Needs a closer look. Repeated failed logins, unauthorized or \
                 AccessDenied attempts, activity from an unusual region or source IP."
            }
            Severity::Info => {
                "Routine, expected activity. Do NOT include these entries in the output."
            }
        }
    }

    /// Whether entries of this tier belong in the report.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Severity::Info)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
