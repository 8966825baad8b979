//! Capture controller
//!
//! Runs once at the end of a process's life: inspects the last recorded
//! fatal condition, applies the inclusion policy, writes the error log,
//! consults the throttle ledger and hands the rendered alert to the mail
//! sink. Every failure path is a terminal no-op -- the process is already
//! unwinding, so nothing here may panic, block, or propagate an error.

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::AlertConfig;
use crate::environment::{EnvSnapshot, RuntimeMode};
use crate::fingerprint;
use crate::kind::ErrorKind;
use crate::mail::{is_valid_email, ContentType, MailSink};
use crate::render;
use crate::store::{ErrorStore, NewError};
use crate::throttle::ThrottleLedger;

static CAPTURE_ARMED: OnceCell<()> = OnceCell::new();

/// Install the capture hook exactly once per process.
///
/// Returns true when this call armed it; any later call is a no-op and
/// returns false, so initialization code that runs more than once still
/// yields at most one capture attempt.
pub fn install_capture_hook() -> bool {
    CAPTURE_ARMED.set(()).is_ok()
}

/// The last fatal condition recorded by the host before shutdown
#[derive(Debug, Clone)]
pub struct FatalCondition {
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
}

/// Terminal state of one capture run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// No fatal condition was recorded, or its kind is outside the fatal set
    NoFatal,
    /// Policy excluded this context (CLI, cron, or non-front-end)
    FilteredOut,
    /// Logged, but suppressed by the throttle window
    Throttled { log_id: Option<i64> },
    /// Logged, but no syntactically valid recipient could be resolved
    NoRecipient { log_id: Option<i64> },
    /// Logged and rendered, but the sink did not accept the message.
    /// Throttle state is left untouched so the next fatal gets a fresh try.
    SendFailed { log_id: Option<i64> },
    /// Alert accepted for delivery; throttle window started
    Notified { log_id: Option<i64> },
}

/// Execute the capture sequence for a terminating process.
///
/// `store` is an optional dependency: hosts without persistence pass None and
/// alerts go out with a "(not recorded)" log reference. A store insert
/// failure is tolerated the same way -- history degrades, notification still
/// proceeds.
pub fn capture(
    last_error: Option<FatalCondition>,
    config: &AlertConfig,
    env: &EnvSnapshot,
    store: Option<&ErrorStore>,
    ledger: &mut ThrottleLedger,
    sink: &dyn MailSink,
) -> CaptureOutcome {
    let Some(error) = last_error else {
        return CaptureOutcome::NoFatal;
    };
    if !error.kind.is_fatal() {
        return CaptureOutcome::NoFatal;
    }

    // Policy filters, in order; any one short-circuits silently
    if config.ignore_cli && env.mode == RuntimeMode::Cli {
        debug!("fatal in CLI context ignored by policy");
        return CaptureOutcome::FilteredOut;
    }
    if config.ignore_cron && env.mode == RuntimeMode::Cron {
        debug!("fatal in cron context ignored by policy");
        return CaptureOutcome::FilteredOut;
    }
    if config.only_frontend && env.is_admin_context {
        debug!("fatal in admin context ignored by front-end-only policy");
        return CaptureOutcome::FilteredOut;
    }

    let sig = fingerprint::signature(&error.message, &error.file, error.line, error.kind);

    // Logging is unconditional; a write failure degrades history but never
    // aborts the notification.
    let log_id = store.and_then(|s| {
        let new = NewError {
            signature: sig.clone(),
            kind: error.kind,
            message: error.message.clone(),
            file: error.file.clone(),
            line: error.line,
            url: env.request_url.clone().unwrap_or_default(),
            user_id: env.user_id.unwrap_or(0),
            runtime_mode: env.mode.as_str().to_string(),
        };
        match s.insert(&new) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("error log write failed, proceeding without record: {}", e);
                None
            }
        }
    });

    let now = env.now.timestamp();
    if !ledger.should_notify(&sig, now, config.throttle_minutes) {
        debug!("alert for signature {} suppressed by throttle", sig);
        return CaptureOutcome::Throttled { log_id };
    }

    // Configured recipient, else the host fallback; neither valid means a
    // silent skip -- never an error at process death.
    let to = match resolve_recipient(config, env) {
        Some(to) => to,
        None => {
            warn!("no valid alert recipient configured, skipping notification");
            return CaptureOutcome::NoRecipient { log_id };
        }
    };

    let content = render::render(&error, config, env, log_id);
    let body = content.to_plain_text();

    if sink.send(&to, &content.subject, &body, ContentType::PlainText) {
        if let Some(s) = store {
            if let Err(e) = ledger.record(s, &sig, now) {
                warn!("failed to persist throttle ledger: {}", e);
            }
        }
        info!("fatal error alert sent to {} (signature {})", to, sig);
        CaptureOutcome::Notified { log_id }
    } else {
        // No throttle update: a failed send must not suppress the next alert
        warn!("mail sink did not accept fatal error alert");
        CaptureOutcome::SendFailed { log_id }
    }
}

fn resolve_recipient(config: &AlertConfig, env: &EnvSnapshot) -> Option<String> {
    let configured = config.to_email.trim();
    if is_valid_email(configured) {
        return Some(configured.to_string());
    }
    let fallback = env.fallback_admin_email.as_deref().unwrap_or("").trim();
    if is_valid_email(fallback) {
        return Some(fallback.to_string());
    }
    None
}
