//! Shared helpers for command handlers.

use chrono::Utc;

use hydrawise_api::Timestamp;

use crate::cli::{RunOpts, SuspendOpts};
use crate::error::CliError;

/// Run length in whole seconds; 0 means "use the zone's default".
pub fn run_seconds(run: &RunOpts) -> Result<i64, CliError> {
    let Some(duration) = run.duration else {
        return Ok(0);
    };
    i64::try_from(duration.as_secs()).map_err(|_| CliError::Validation {
        field: "duration".into(),
        reason: format!("{duration} is too long"),
    })
}

/// Resolve `--until` / `--for` to an absolute end time.
pub fn suspend_until(when: &SuspendOpts) -> Result<Timestamp, CliError> {
    if let Some(ref text) = when.until {
        return chrono::DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CliError::Validation {
                field: "until".into(),
                reason: format!("expected RFC 3339 (e.g. 2030-06-01T08:00:00Z): {e}"),
            });
    }

    let Some(duration) = when.for_duration else {
        return Err(CliError::Validation {
            field: "until".into(),
            reason: "pass --until or --for".into(),
        });
    };
    chrono::Duration::from_std(*duration)
        .ok()
        .and_then(|d| Utc::now().checked_add_signed(d))
        .ok_or_else(|| CliError::Validation {
            field: "for".into(),
            reason: format!("{duration} is too long"),
        })
}
