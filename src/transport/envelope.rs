use std::collections::{BTreeMap, HashMap};

use crate::foundation::core::{Value, ValueKind, WorkletId};
use crate::foundation::error::{FrameletError, FrameletResult};
use crate::foundation::math::Fnv1a64;
use crate::ir::node::Program;
use crate::ir::validate::validate;

/// The package that crosses the authoring/execution boundary.
///
/// Delivered at most once per component mount or explicit reconfiguration,
/// never inside the per-frame loop. A configuration change produces a fresh
/// envelope; live programs are never mutated in place.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Worklet identity, stable across re-deliveries.
    pub id: WorkletId,
    /// The compiled program as a wire IR tree.
    pub program: Program,
    /// Declared parameter names, in order.
    pub parameter_names: Vec<String>,
    /// Declared kind of the result value.
    pub declared_return_kind: ValueKind,
    /// Named constant values merged into every frame binding.
    pub config: BTreeMap<String, Value>,
}

impl Envelope {
    /// Serialize to the JSON wire form.
    pub fn to_wire_json(&self) -> FrameletResult<String> {
        serde_json::to_string(self).map_err(|e| FrameletError::serde(e.to_string()))
    }

    /// Parse the JSON wire form back into an envelope.
    pub fn from_wire_json(json: &str) -> FrameletResult<Self> {
        serde_json::from_str(json).map_err(|e| FrameletError::serde(e.to_string()))
    }
}

/// Acknowledgement that an execution-side sink has stored a program.
///
/// Only an [`EnvelopeSink`] issues acks, and only after the envelope is
/// fully stored, so holding an ack proves the ordering guarantee: the
/// program is in place before any frame-driven evaluation can be bound to
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryAck {
    id: WorkletId,
}

impl DeliveryAck {
    /// Issue an ack. Sinks call this after storing the envelope, never
    /// before.
    pub fn new(id: WorkletId) -> Self {
        Self { id }
    }

    /// Worklet the ack refers to.
    pub fn id(&self) -> &WorkletId {
        &self.id
    }
}

/// The boundary-crossing seam to the execution domain.
///
/// The packer does not know how delivery is transported; a failed delivery
/// surfaces as a transport error and the owning component falls back to a
/// static visual state.
pub trait EnvelopeSink {
    /// Store the envelope on the execution side and acknowledge it.
    fn deliver(&mut self, envelope: &Envelope) -> FrameletResult<DeliveryAck>;
}

/// Outcome of a pack-and-deliver call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackOutcome {
    /// A fresh envelope was delivered and acknowledged.
    Sent(DeliveryAck),
    /// Program and config were byte-identical to the last delivery for this
    /// id; nothing was re-sent. Carries the previously issued ack.
    Unchanged(DeliveryAck),
}

impl PackOutcome {
    /// The ack, whether fresh or cached.
    pub fn ack(&self) -> &DeliveryAck {
        match self {
            Self::Sent(ack) | Self::Unchanged(ack) => ack,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fingerprint {
    hi: u64,
    lo: u64,
}

/// Packs validated programs into envelopes and hands them to a sink,
/// skipping re-delivery when the program and config are unchanged.
#[derive(Debug, Default)]
pub struct EnvelopePacker {
    delivered: HashMap<WorkletId, (Fingerprint, DeliveryAck)>,
}

impl EnvelopePacker {
    /// Empty packer with no delivery history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, pack, and deliver a program with its configuration.
    ///
    /// Idempotent for an unchanged program+config pair: the identical
    /// payload is not re-sent and the cached ack is returned.
    #[tracing::instrument(skip(self, program, config, sink), fields(worklet = %id))]
    pub fn pack_and_deliver(
        &mut self,
        id: WorkletId,
        program: &Program,
        config: &BTreeMap<String, Value>,
        sink: &mut dyn EnvelopeSink,
    ) -> FrameletResult<PackOutcome> {
        validate(program)?;

        let fingerprint = fingerprint_payload(program, config)?;
        if let Some((prev, ack)) = self.delivered.get(&id)
            && *prev == fingerprint
        {
            tracing::debug!(worklet = %id, "unchanged program+config, skipping re-transport");
            return Ok(PackOutcome::Unchanged(ack.clone()));
        }

        let envelope = Envelope {
            id: id.clone(),
            parameter_names: program.params.iter().map(|p| p.name.clone()).collect(),
            declared_return_kind: program.return_kind,
            program: program.clone(),
            config: config.clone(),
        };
        let ack = sink.deliver(&envelope)?;
        if ack.id() != &id {
            return Err(FrameletError::transport(format!(
                "sink acknowledged '{}' for envelope '{id}'",
                ack.id()
            )));
        }
        self.delivered.insert(id, (fingerprint, ack.clone()));
        Ok(PackOutcome::Sent(ack))
    }

    /// Drop the delivery history for a worklet (on component teardown).
    pub fn forget(&mut self, id: &WorkletId) {
        self.delivered.remove(id);
    }
}

/// 128-bit fingerprint over the canonical wire encoding.
///
/// `BTreeMap` keeps the config encoding order-stable, so hashing the JSON
/// text is canonical enough here.
fn fingerprint_payload(
    program: &Program,
    config: &BTreeMap<String, Value>,
) -> FrameletResult<Fingerprint> {
    let program_json = program.to_wire_json()?;
    let config_json =
        serde_json::to_string(config).map_err(|e| FrameletError::serde(e.to_string()))?;

    let mut hi = Fnv1a64::new_default();
    let mut lo = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);
    for h in [&mut hi, &mut lo] {
        h.write_u64(program_json.len() as u64);
        h.write_bytes(program_json.as_bytes());
        h.write_u64(config_json.len() as u64);
        h.write_bytes(config_json.as_bytes());
    }
    Ok(Fingerprint {
        hi: hi.finish(),
        lo: lo.finish(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transport/envelope.rs"]
mod tests;
