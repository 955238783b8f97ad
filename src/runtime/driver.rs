use std::collections::BTreeMap;

use crate::foundation::core::{Value, WorkletId};
use crate::foundation::error::{FrameletError, FrameletResult};
use crate::interp::eval::{FrameBinding, Interpreter};
use crate::ir::node::Program;
use crate::runtime::view::{PropertyValue, ViewId, ViewProperty, ViewRegistry, apply_property};
use crate::transport::envelope::{DeliveryAck, Envelope, EnvelopeSink};

/// Reserved parameter name the scheduler binds to elapsed seconds.
pub const TIME_PARAM: &str = "time";

/// One display-refresh tick, supplied by the clock the host owns.
#[derive(Clone, Debug, Default)]
pub struct FrameTick {
    /// Elapsed seconds since the animation started; bound as `time`.
    pub elapsed_secs: f64,
    /// Additional per-frame inputs (gesture deltas and the like). These
    /// override config constants of the same name.
    pub inputs: BTreeMap<String, Value>,
}

impl FrameTick {
    /// Tick with elapsed time only.
    pub fn at(elapsed_secs: f64) -> Self {
        Self {
            elapsed_secs,
            inputs: BTreeMap::new(),
        }
    }
}

/// Counters for one [`FrameScheduler::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceStats {
    /// Registrations evaluated this tick.
    pub evaluated: usize,
    /// Fresh results applied to a view.
    pub applied: usize,
    /// Failed evaluations recovered by re-applying the previous value.
    pub recovered: usize,
    /// Frames skipped entirely (no previous value, missing view, or a
    /// result kind with no property mapping).
    pub skipped: usize,
}

struct Registration {
    program: Program,
    config: BTreeMap<String, Value>,
    target: Option<(ViewId, ViewProperty)>,
    last_good: Option<Value>,
}

/// Execution-domain scheduler: holds delivered programs, binds them to view
/// properties, and evaluates every bound worklet once per tick.
///
/// The scheduler never owns or starts the frame clock; the host invokes
/// [`FrameScheduler::advance`] from its display-refresh callback. The
/// interpreter itself stays stateless; the only per-worklet state kept
/// here is the last known-good value used for frame-level recovery.
#[derive(Default)]
pub struct FrameScheduler {
    worklets: BTreeMap<WorkletId, Registration>,
}

impl EnvelopeSink for FrameScheduler {
    /// Store a delivered program. The ack is issued only after the program
    /// is fully in place, so no partially-received program is ever
    /// evaluated. Re-delivery for a known id replaces the prior program and
    /// clears its recovery value.
    fn deliver(&mut self, envelope: &Envelope) -> FrameletResult<DeliveryAck> {
        self.worklets.insert(
            envelope.id.clone(),
            Registration {
                program: envelope.program.clone(),
                config: envelope.config.clone(),
                target: None,
                last_good: None,
            },
        );
        Ok(DeliveryAck::new(envelope.id.clone()))
    }
}

impl FrameScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an acknowledged worklet to a view property.
    ///
    /// Requiring the ack (rather than a bare id) makes "delivered before
    /// first evaluation" a property of the API.
    pub fn bind(
        &mut self,
        ack: &DeliveryAck,
        view: ViewId,
        property: ViewProperty,
    ) -> FrameletResult<()> {
        let Some(reg) = self.worklets.get_mut(ack.id()) else {
            return Err(FrameletError::transport(format!(
                "no delivered program for worklet '{}'",
                ack.id()
            )));
        };
        reg.target = Some((view, property));
        Ok(())
    }

    /// Remove a worklet registration.
    ///
    /// Call before the bound view handle is torn down; any value computed
    /// for the worklet after this returns is discarded, never applied.
    pub fn unregister(&mut self, id: &WorkletId) -> bool {
        self.worklets.remove(id).is_some()
    }

    /// Number of registered worklets.
    pub fn len(&self) -> usize {
        self.worklets.len()
    }

    /// Whether no worklets are registered.
    pub fn is_empty(&self) -> bool {
        self.worklets.is_empty()
    }

    /// Evaluate every bound worklet once and apply the results.
    ///
    /// A failing worklet re-applies its previous value (or skips the frame
    /// if it has none) and never stops the clock for the others. A missing
    /// view means the component is mid-teardown; the result is discarded.
    #[tracing::instrument(skip(self, tick, views), fields(worklets = self.worklets.len()))]
    pub fn advance(&mut self, tick: &FrameTick, views: &mut ViewRegistry) -> AdvanceStats {
        let mut stats = AdvanceStats::default();

        for (id, reg) in &mut self.worklets {
            let Some((view, property)) = reg.target.clone() else {
                continue;
            };
            stats.evaluated += 1;

            let binding = build_binding(&reg.config, tick);
            let (value, fresh) = match Interpreter::evaluate(&reg.program, &binding) {
                Ok(value) => {
                    reg.last_good = Some(value.clone());
                    (Some(value), true)
                }
                Err(err) => {
                    tracing::warn!(worklet = %id, %err, "evaluation failed, holding previous value");
                    if reg.last_good.is_some() {
                        stats.recovered += 1;
                    } else {
                        stats.skipped += 1;
                    }
                    (reg.last_good.clone(), false)
                }
            };

            let Some(value) = value else { continue };
            let Some(payload) = PropertyValue::from_value(&value) else {
                tracing::warn!(worklet = %id, kind = %value.kind(), "result kind has no property mapping");
                stats.skipped += 1;
                continue;
            };
            let Some(handle) = views.get_mut(&view) else {
                tracing::debug!(worklet = %id, view = %view, "view gone, discarding result");
                stats.skipped += 1;
                continue;
            };
            if apply_property(handle, property, payload) && fresh {
                stats.applied += 1;
            }
        }

        stats
    }
}

fn build_binding(config: &BTreeMap<String, Value>, tick: &FrameTick) -> FrameBinding {
    let mut binding = FrameBinding::new();
    for (name, value) in config {
        binding.set(name.clone(), value.clone());
    }
    binding.set(TIME_PARAM, Value::Number(tick.elapsed_secs));
    for (name, value) in &tick.inputs {
        binding.set(name.clone(), value.clone());
    }
    binding
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/driver.rs"]
mod tests;
