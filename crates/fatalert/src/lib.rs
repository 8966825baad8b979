//! Fatalert - fatal-error capture and alerting
//!
//! Captures the fatal condition a process dies with, appends it to a durable
//! SQLite log, deduplicates notifications by error signature with a time
//! window, and hands a rendered plain-text/HTML alert to a host-supplied
//! mail sink. The capture path runs once per process, synchronously, at
//! shutdown, and never fails outward.

pub mod capture;
pub mod config;
pub mod environment;
pub mod fingerprint;
pub mod kind;
pub mod mail;
pub mod render;
pub mod store;
pub mod throttle;

pub use capture::{capture, install_capture_hook, CaptureOutcome, FatalCondition};
pub use config::{AlertConfig, ConfigProvider, FileConfigProvider};
pub use environment::{EnvSnapshot, RuntimeMode};
pub use kind::ErrorKind;
pub use mail::{ContentType, MailSink, NoopSink};
pub use store::{ErrorRecord, ErrorStore, NewError};
pub use throttle::ThrottleLedger;
