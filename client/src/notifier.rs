use qkart::{Notify, Severity};
use tracing::{error, info, warn};

/// Sends user-facing outcomes to the log, for hosts without a UI.
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => info!(%severity, "{message}"),
            Severity::Warning => warn!(%severity, "{message}"),
            Severity::Error => error!(%severity, "{message}"),
        }
    }
}
