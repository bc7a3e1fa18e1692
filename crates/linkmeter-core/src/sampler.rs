//! Rate sampling over cumulative counters.
//!
//! Devices expose monotonically increasing 32-bit counters that wrap to zero
//! past `MAX_COUNTER`. The sampler keeps the previous reading per counter and
//! derives a per-second rate on each poll, correcting for wraparound.

use std::collections::HashMap;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::Result;
use crate::value::{Value, ValueSet};

/// Largest representable counter reading (uint32).
pub const MAX_COUNTER: u64 = 4_294_967_295;

/// One named cumulative counter reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterReading {
    pub name: String,
    pub value: u32,
}

impl CounterReading {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Supplies named cumulative counter readings on demand.
///
/// Implementations talk to whatever device holds the counters. A failed
/// fetch surfaces as an error and the caller skips the cycle; the sampler
/// performs no retries of its own.
#[async_trait]
pub trait CounterSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CounterReading>>;
}

/// Derives per-second rates from cumulative counter readings.
///
/// Holds the baseline state for exactly one source instance. Sources polled
/// concurrently must each own their own sampler; the baselines are never
/// shared.
#[derive(Default)]
pub struct RateSampler {
    last_time: Option<SystemTime>,
    last_raw: HashMap<String, u32>,
}

impl RateSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll the source once.
    ///
    /// Always emits each counter's raw total under its own name. For every
    /// counter that already had a baseline, also emits a `<name>_sec` rate
    /// over the elapsed interval, correcting for wraparound. The first probe
    /// (or the first sighting of a new counter) only establishes the
    /// baseline.
    ///
    /// A fetch error propagates without touching the baseline state; the
    /// next successful probe then spans the missed interval and reports a
    /// proportionally inflated rate, which is accepted behavior.
    ///
    /// Intervals that truncate to zero whole seconds, or run backwards after
    /// a wall-clock step, produce no rates for the cycle (the division is
    /// skipped, raw totals still flow).
    pub async fn probe(&mut self, source: &dyn CounterSource, now: SystemTime) -> Result<ValueSet> {
        let readings = source.fetch().await?;

        let elapsed_secs = self
            .last_time
            .and_then(|last| now.duration_since(last).ok())
            .map(|d| d.as_secs());

        let mut out = ValueSet::new();
        for reading in &readings {
            out.add(Value::new(reading.name.clone(), f64::from(reading.value)))?;

            let baseline = self.last_raw.insert(reading.name.clone(), reading.value);
            let Some(baseline) = baseline else {
                continue;
            };

            match elapsed_secs {
                Some(secs) if secs > 0 => {
                    let delta = counter_delta(baseline, reading.value);
                    out.add(Value::new(
                        format!("{}_sec", reading.name),
                        delta as f64 / secs as f64,
                    ))?;
                }
                _ => {
                    tracing::debug!(counter = %reading.name, "interval too short, skipping rate");
                }
            }
        }
        self.last_time = Some(now);
        Ok(out)
    }
}

/// Interval delta with uint32 wraparound correction.
fn counter_delta(baseline: u32, current: u32) -> u64 {
    if current >= baseline {
        u64::from(current - baseline)
    } else {
        (MAX_COUNTER - u64::from(baseline)) + u64::from(current)
    }
}
