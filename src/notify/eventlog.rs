//! System event log.
//!
//! On Windows events go to the Application log through `ReportEventW`. On
//! other platforms, and on Windows when the source cannot be registered,
//! each event becomes a log line under the `event_log` target.

use log::Level;

use crate::config::{EVENT_ID, EVENT_LOG_NAME};
use crate::error_handling::NotifyError;

use super::Severity;

enum SourceState {
    Unregistered,
    Registered(platform::EventSource),
    Unavailable,
}

/// Handle to the event log for one event source.
///
/// The source is registered on first use; after a failed registration every
/// later event is written as a log line instead.
pub struct EventLog {
    source_name: String,
    state: SourceState,
}

impl EventLog {
    /// Creates a handle for `source_name` without touching the system log yet.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            state: SourceState::Unregistered,
        }
    }

    /// Event source name.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Whether events currently reach the system log.
    pub fn is_registered(&self) -> bool {
        matches!(self.state, SourceState::Registered(_))
    }

    /// Registers the event source if that has not been attempted yet.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::EventSourceRegistration` on the attempt that
    /// fails. Later calls return `Ok(())` and the handle stays degraded.
    pub fn ensure_registered(&mut self) -> Result<(), NotifyError> {
        if !matches!(self.state, SourceState::Unregistered) {
            return Ok(());
        }
        match platform::EventSource::register(&self.source_name) {
            Ok(source) => {
                self.state = SourceState::Registered(source);
                Ok(())
            }
            Err(e) => {
                self.state = SourceState::Unavailable;
                Err(e)
            }
        }
    }

    /// Writes one event with the fixed event id.
    pub fn write(&mut self, message: &str, severity: Severity) -> Result<(), NotifyError> {
        match &self.state {
            SourceState::Registered(source) => source.report(EVENT_ID, severity, message),
            SourceState::Unregistered | SourceState::Unavailable => {
                write_diagnostic_line(&self.source_name, message, severity);
                Ok(())
            }
        }
    }
}

fn write_diagnostic_line(source_name: &str, message: &str, severity: Severity) {
    let level = match severity {
        Severity::Info => Level::Info,
        Severity::Warning => Level::Warn,
        Severity::Error => Level::Error,
    };
    log::log!(
        target: "event_log",
        level,
        "[{EVENT_LOG_NAME}/{source_name}] event {EVENT_ID} ({severity}): {}",
        message.trim_end()
    );
}

#[cfg(windows)]
mod platform {
    use windows::core::HSTRING;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{HANDLE, PSID};
    use windows::Win32::System::EventLog::{
        DeregisterEventSource, RegisterEventSourceW, ReportEventW, EVENTLOG_ERROR_TYPE,
        EVENTLOG_INFORMATION_TYPE, EVENTLOG_WARNING_TYPE,
    };

    use super::Severity;
    use crate::error_handling::NotifyError;

    pub(super) struct EventSource {
        handle: HANDLE,
    }

    impl EventSource {
        pub(super) fn register(source_name: &str) -> Result<Self, NotifyError> {
            let wide_source = HSTRING::from(source_name);
            let handle = unsafe { RegisterEventSourceW(PCWSTR::null(), &wide_source) }
                .map_err(|e| NotifyError::EventSourceRegistration {
                    source_name: source_name.to_string(),
                    reason: e.to_string(),
                })?;
            if handle.is_invalid() {
                return Err(NotifyError::EventSourceRegistration {
                    source_name: source_name.to_string(),
                    reason: "invalid handle".to_string(),
                });
            }
            Ok(Self { handle })
        }

        pub(super) fn report(
            &self,
            event_id: u32,
            severity: Severity,
            message: &str,
        ) -> Result<(), NotifyError> {
            let event_type = match severity {
                Severity::Info => EVENTLOG_INFORMATION_TYPE,
                Severity::Warning => EVENTLOG_WARNING_TYPE,
                Severity::Error => EVENTLOG_ERROR_TYPE,
            };
            let wide_message = HSTRING::from(message);
            let strings = [PCWSTR(wide_message.as_ptr())];
            unsafe {
                ReportEventW(
                    self.handle,
                    event_type,
                    0,
                    event_id,
                    PSID::default(),
                    0,
                    Some(&strings),
                    None,
                )
            }
            .map_err(|e| NotifyError::EventWrite(e.to_string()))
        }
    }

    impl Drop for EventSource {
        fn drop(&mut self) {
            unsafe {
                let _ = DeregisterEventSource(self.handle);
            }
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use super::{write_diagnostic_line, Severity};
    use crate::error_handling::NotifyError;

    pub(super) struct EventSource {
        source_name: String,
    }

    impl EventSource {
        pub(super) fn register(source_name: &str) -> Result<Self, NotifyError> {
            Ok(Self {
                source_name: source_name.to_string(),
            })
        }

        pub(super) fn report(
            &self,
            _event_id: u32,
            severity: Severity,
            message: &str,
        ) -> Result<(), NotifyError> {
            write_diagnostic_line(&self.source_name, message, severity);
            Ok(())
        }
    }
}
