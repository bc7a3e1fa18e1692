//! Polling scheduler.
//!
//! One task per configured source. Each task owns its sampler baseline state
//! (no shared baseline table across sources) and publishes under its own
//! write key, so sources never disturb each other's registry entries. A
//! failed probe skips the cycle; the next tick retries with the old
//! baseline.

use std::time::{Duration, SystemTime};

use tokio::time::MissedTickBehavior;

use linkmeter_core::registry::{MetricRegistry, WriteKey};
use linkmeter_core::sampler::{CounterSource, RateSampler};
use linkmeter_core::value::{Value, ValueSet};
use linkmeter_core::Result;

use crate::app_state::AppState;
use crate::source::tr064::Tr064Source;

/// Spawn one polling task per configured source.
pub fn spawn_pollers(state: &AppState) -> Result<()> {
    for cfg in &state.cfg().sources {
        let source = Tr064Source::new(cfg)?;
        let state = state.clone();
        let name = cfg.name.clone();
        let interval = Duration::from_secs(cfg.interval_secs);

        tokio::spawn(async move {
            let key = WriteKey::new(name.clone());
            let mut sampler = RateSampler::new();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                run_cycle(&mut sampler, &source, state.registry(), &key, &name).await;
            }
        });
    }
    Ok(())
}

/// One probe-and-publish cycle.
async fn run_cycle(
    sampler: &mut RateSampler,
    source: &dyn CounterSource,
    registry: &MetricRegistry,
    key: &WriteKey,
    prefix: &str,
) {
    match sampler.probe(source, SystemTime::now()).await {
        Ok(set) => {
            let set = prefixed(prefix, set);
            match registry.write(&[set], Some(key)) {
                Ok(()) => tracing::debug!(source = %prefix, "poll cycle published"),
                Err(e) => tracing::warn!(source = %prefix, error = %e, "registry write rejected"),
            }
        }
        Err(e) => tracing::warn!(source = %prefix, error = %e, "poll cycle skipped"),
    }
}

/// Prefix every value name with the source name.
fn prefixed(prefix: &str, set: ValueSet) -> ValueSet {
    let mut out = ValueSet::with_label_keys(set.label_keys);
    out.values = set
        .values
        .into_iter()
        .map(|v| Value {
            name: format!("{prefix}_{}", v.name),
            ..v
        })
        .collect();
    out
}
