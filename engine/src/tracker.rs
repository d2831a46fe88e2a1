use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::forge::WeaponRecord;

/// Running counters over every batch this process has generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationStats {
    pub total_generated: u64,
    pub successful_generations: u64,
    /// Mean wall time of successful batches, in seconds.
    pub average_time: f64,
    pub last_generation: Option<DateTime<Utc>>,
    pub personality_counts: BTreeMap<String, u64>,
    pub arena_theme_counts: BTreeMap<String, u64>,
}

impl GenerationStats {
    pub fn record_batch(
        &mut self,
        weapons: &[WeaponRecord],
        elapsed: Duration,
        arena_theme: &str,
        stamp: DateTime<Utc>,
    ) {
        self.total_generated += weapons.len() as u64;
        self.successful_generations += 1;
        let n = self.successful_generations as f64;
        self.average_time += (elapsed.as_secs_f64() - self.average_time) / n;
        self.last_generation = Some(stamp);

        *self.arena_theme_counts.entry(arena_theme.to_string()).or_default() += 1;
        for weapon in weapons {
            let key = if weapon.personality.is_empty() {
                "unknown"
            } else {
                weapon.personality.as_str()
            };
            *self.personality_counts.entry(key.to_string()).or_default() += 1;
        }
    }

    pub fn record_failure(&mut self, stamp: DateTime<Utc>) {
        self.last_generation = Some(stamp);
    }
}
