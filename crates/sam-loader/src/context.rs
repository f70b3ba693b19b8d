//! Per-run transformation context.
//!
//! One `SyncContext` value is threaded through the whole import in
//! place of module-level mutable state: the cross-file DMPP key set,
//! the drop-audit counters and the run's reference date.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

/// Mutable state shared across the files of one sync run.
#[derive(Debug, Clone)]
pub struct SyncContext {
    today: NaiveDate,
    dmpp_keys: HashSet<String>,
    drops: BTreeMap<String, usize>,
}

impl SyncContext {
    /// Creates a context for a run dated `today` (used for expiry
    /// filtering downstream).
    pub fn new(today: NaiveDate) -> Self {
        SyncContext {
            today,
            dmpp_keys: HashSet::new(),
            drops: BTreeMap::new(),
        }
    }

    /// The run's reference date.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Composite DMPP key, `"code:deliveryEnvironment"`.
    pub fn dmpp_key(code: &str, delivery_environment: &str) -> String {
        format!("{code}:{delivery_environment}")
    }

    /// Registers a DMPP seen while transforming the AMP file.
    pub fn register_dmpp(&mut self, code: &str, delivery_environment: &str) {
        self.dmpp_keys
            .insert(Self::dmpp_key(code, delivery_environment));
    }

    /// True if the pair was registered earlier in this run.
    pub fn has_dmpp(&self, code: &str, delivery_environment: &str) -> bool {
        self.dmpp_keys
            .contains(&Self::dmpp_key(code, delivery_environment))
    }

    /// Number of registered DMPP keys.
    pub fn dmpp_count(&self) -> usize {
        self.dmpp_keys.len()
    }

    /// Counts one dropped source element, keyed by entity and reason.
    pub fn record_drop(&mut self, entity: &str, reason: &str) {
        *self.drops.entry(format!("{entity}: {reason}")).or_insert(0) += 1;
    }

    /// Drop-audit counters accumulated so far.
    pub fn drops(&self) -> &BTreeMap<String, usize> {
        &self.drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SyncContext {
        SyncContext::new(NaiveDate::from_ymd_opt(2022, 7, 1).unwrap())
    }

    #[test]
    fn test_dmpp_membership() {
        let mut ctx = ctx();
        assert!(!ctx.has_dmpp("0039347", "P"));
        ctx.register_dmpp("0039347", "P");
        assert!(ctx.has_dmpp("0039347", "P"));
        assert!(!ctx.has_dmpp("0039347", "H"));
        assert_eq!(ctx.dmpp_count(), 1);
    }

    #[test]
    fn test_drop_counters_accumulate() {
        let mut ctx = ctx();
        ctx.record_drop("Substance", "missing code");
        ctx.record_drop("Substance", "missing code");
        ctx.record_drop("Amp", "missing name");
        assert_eq!(ctx.drops().get("Substance: missing code"), Some(&2));
        assert_eq!(ctx.drops().get("Amp: missing name"), Some(&1));
    }
}
