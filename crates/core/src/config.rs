// Queue configuration (thresholds, paging, scheduler cadence)

use crate::application::constants::*;
use crate::domain::Priority;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment prefix for overrides, e.g. `HANDOFF_MEDIUM_BOOST_AFTER_MINUTES=20`
pub const ENV_PREFIX: &str = "HANDOFF";

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// `high` -> `urgent` after this many minutes
    pub high_boost_after_minutes: i64,

    /// `medium` -> `high` after this many minutes
    pub medium_boost_after_minutes: i64,

    /// `low` -> `medium` after this many minutes
    pub low_boost_after_minutes: i64,

    pub default_page_size: usize,
    pub max_page_size: usize,

    /// Boost scheduler tick (seconds)
    pub boost_interval_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            high_boost_after_minutes: DEFAULT_HIGH_BOOST_AFTER_MINUTES,
            medium_boost_after_minutes: DEFAULT_MEDIUM_BOOST_AFTER_MINUTES,
            low_boost_after_minutes: DEFAULT_LOW_BOOST_AFTER_MINUTES,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            boost_interval_secs: DEFAULT_BOOST_INTERVAL_SECS,
        }
    }
}

impl QueueConfig {
    /// Load defaults overlaid with `HANDOFF_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load from an explicit environment source (tests inject a map here)
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config: QueueConfig = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the coordinator cannot work with
    pub fn validate(&self) -> Result<()> {
        for (name, minutes) in [
            ("high_boost_after_minutes", self.high_boost_after_minutes),
            ("medium_boost_after_minutes", self.medium_boost_after_minutes),
            ("low_boost_after_minutes", self.low_boost_after_minutes),
        ] {
            if minutes <= 0 {
                return Err(AppError::Config(format!(
                    "{} must be positive (got {})",
                    name, minutes
                )));
            }
            if minutes > MAX_BOOST_AFTER_MINUTES {
                return Err(AppError::Config(format!(
                    "{} too large (got {}, max {})",
                    name, minutes, MAX_BOOST_AFTER_MINUTES
                )));
            }
        }

        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(AppError::Config("page sizes must be positive".to_string()));
        }

        if self.default_page_size > self.max_page_size {
            return Err(AppError::Config(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }

        if self.boost_interval_secs == 0 {
            return Err(AppError::Config("boost_interval_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Age (ms) an item of `priority` must strictly exceed to be promoted.
    /// `None` for `Urgent`, which is never boosted.
    pub fn boost_threshold_millis(&self, priority: Priority) -> Option<i64> {
        let minutes = match priority {
            Priority::Urgent => return None,
            Priority::High => self.high_boost_after_minutes,
            Priority::Medium => self.medium_boost_after_minutes,
            Priority::Low => self.low_boost_after_minutes,
        };
        Some(minutes.saturating_mul(MILLIS_PER_MINUTE))
    }

    /// Resolve a requested page size against the configured bounds
    pub fn page_size(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            None => Ok(self.default_page_size),
            Some(0) => Err(AppError::Validation(
                "limit must be at least 1".to_string(),
            )),
            Some(limit) if limit > self.max_page_size => Err(AppError::Validation(format!(
                "limit {} out of range (max {})",
                limit, self.max_page_size
            ))),
            Some(limit) => Ok(limit),
        }
    }

    pub fn boost_interval(&self) -> Duration {
        Duration::from_secs(self.boost_interval_secs)
    }
}
