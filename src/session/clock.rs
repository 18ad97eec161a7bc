use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Default display zone for notification timestamps
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Wall clock that renders timestamps in a fixed zone
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    zone: Tz,
}

impl WallClock {
    /// Create a clock for an IANA zone name such as `America/New_York`
    pub fn new(zone: &str) -> Result<Self> {
        let zone: Tz = zone
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Unknown time zone: {}", zone))?;
        Ok(Self { zone })
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Current time rendered for display
    pub fn now_string(&self) -> String {
        self.format(Utc::now())
    }

    /// Render an instant the way an en-US locale would: `10/18/2026, 3:04:05 PM`
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.zone)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string()
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self { zone: chrono_tz::America::New_York }
    }
}
