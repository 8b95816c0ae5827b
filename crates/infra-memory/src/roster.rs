// Operator roster kept next to the items so workload can be derived from them

use handoff_core::domain::{OperatorId, OperatorWorkload};

/// Static description of an operator serving a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorProfile {
    pub operator_id: OperatorId,
    pub max_capacity: Option<u32>,
    /// Off-shift operators keep their workload row but receive no new work
    pub available: bool,
}

impl OperatorProfile {
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            max_capacity: None,
            available: true,
        }
    }

    pub fn with_capacity(mut self, max_capacity: u32) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// UTC day index of an epoch-millisecond timestamp
pub(crate) fn day_of(now_millis: i64) -> i64 {
    now_millis.div_euclid(MILLIS_PER_DAY)
}

#[derive(Debug, Clone)]
pub(crate) struct RosterEntry {
    pub(crate) profile: OperatorProfile,
    resolved_today: u32,
    // Day the counter belongs to; a counter from an earlier day reads as zero
    resolved_day: i64,
}

impl RosterEntry {
    pub(crate) fn new(profile: OperatorProfile) -> Self {
        Self {
            profile,
            resolved_today: 0,
            resolved_day: 0,
        }
    }

    pub(crate) fn credit_resolution(&mut self, today: i64) {
        if self.resolved_day != today {
            self.resolved_day = today;
            self.resolved_today = 0;
        }
        self.resolved_today = self.resolved_today.saturating_add(1);
    }

    pub(crate) fn resolved_on(&self, today: i64) -> u32 {
        if self.resolved_day == today {
            self.resolved_today
        } else {
            0
        }
    }

    pub(crate) fn workload(&self, current_load: u32, today: i64) -> OperatorWorkload {
        OperatorWorkload {
            operator_id: self.profile.operator_id.clone(),
            current_load,
            resolved_today: self.resolved_on(today),
            max_capacity: self.profile.max_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_boundaries() {
        assert_eq!(day_of(0), 0);
        assert_eq!(day_of(MILLIS_PER_DAY - 1), 0);
        assert_eq!(day_of(MILLIS_PER_DAY), 1);
        assert_eq!(day_of(-1), -1);
    }

    #[test]
    fn test_counter_rolls_over_at_day_change() {
        let mut entry = RosterEntry::new(OperatorProfile::new("op-1"));
        entry.credit_resolution(20_000);
        entry.credit_resolution(20_000);
        assert_eq!(entry.resolved_on(20_000), 2);

        // Nothing resolved yet on the next day
        assert_eq!(entry.resolved_on(20_001), 0);
        assert_eq!(entry.workload(3, 20_001).resolved_today, 0);

        entry.credit_resolution(20_001);
        assert_eq!(entry.resolved_on(20_001), 1);
    }
}
