use chrono::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Dosewise";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Timing policy for dose classification and alert evaluation.
///
/// The defaults are product inferences, not clinical constants; every
/// value can be overridden per engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum distance between an intake's `scheduled_time` and an
    /// occurrence for the two to be considered the same dose event.
    pub match_window: Duration,
    /// How long after `scheduled_at` an unrecorded dose stays pending
    /// before it is classified missed.
    pub grace: Duration,
    /// How far before `scheduled_at` a reminder may fire. Zero means the
    /// reminder fires exactly at the scheduled time.
    pub reminder_lead: Duration,
    /// Alert evaluation look-back from `now`. Must exceed `grace` by at
    /// least one tick interval for a dose that exhausted its grace to be
    /// evaluated as missed before it leaves the window.
    pub look_back: Duration,
    /// Alert evaluation look-ahead from `now`.
    pub look_ahead: Duration,
    /// Rolling window for compliance statistics, in days.
    pub compliance_window_days: i64,
    /// Evaluation loop cadence, in seconds.
    pub tick_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            match_window: Duration::hours(2),
            grace: Duration::hours(3),
            reminder_lead: Duration::zero(),
            look_back: Duration::hours(3) + Duration::seconds(60),
            look_ahead: Duration::hours(24),
            compliance_window_days: 7,
            tick_interval_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_names_crate() {
        assert!(default_log_filter().contains("dosewise"));
    }

    #[test]
    fn default_windows() {
        let config = EngineConfig::default();
        assert_eq!(config.match_window, Duration::hours(2));
        assert_eq!(config.grace, Duration::hours(3));
        assert_eq!(config.reminder_lead, Duration::zero());
        assert_eq!(config.look_ahead, Duration::hours(24));
        assert_eq!(config.compliance_window_days, 7);
    }

    #[test]
    fn look_back_covers_grace_plus_one_tick() {
        let config = EngineConfig::default();
        assert!(
            config.look_back
                >= config.grace + Duration::seconds(config.tick_interval_secs as i64)
        );
    }
}
