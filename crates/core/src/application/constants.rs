// Queue constants (ADR: No magic values)

/// Age after which a `high` item is promoted to `urgent` (45 minutes)
pub const DEFAULT_HIGH_BOOST_AFTER_MINUTES: i64 = 45;

/// Age after which a `medium` item is promoted to `high` (30 minutes)
pub const DEFAULT_MEDIUM_BOOST_AFTER_MINUTES: i64 = 30;

/// Age after which a `low` item is promoted to `medium` (60 minutes)
pub const DEFAULT_LOW_BOOST_AFTER_MINUTES: i64 = 60;

/// Page size used when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page a single listing may request
pub const MAX_PAGE_SIZE: usize = 100;

/// How often the boost scheduler sweeps its tenants (60s)
pub const DEFAULT_BOOST_INTERVAL_SECS: u64 = 60;

/// `boostReason` value written by age-based promotion
pub const BOOST_REASON_AGE_THRESHOLD: &str = "age_threshold";

pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Largest boost threshold whose millisecond value still fits in an `i64`
pub const MAX_BOOST_AFTER_MINUTES: i64 = i64::MAX / MILLIS_PER_MINUTE;
