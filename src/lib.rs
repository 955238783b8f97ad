//! Framelet compiles restricted animation expressions once and evaluates
//! them every frame on the side that owns the views, so steady-state
//! animation never re-crosses a slow authoring/execution boundary.
//!
//! # Pipeline overview
//!
//! 1. **Compile**: `WorkletSource -> Program` (restricted expression grammar
//!    lowered 1:1 to IR nodes)
//! 2. **Validate**: name resolution and arity checks against the declared
//!    parameter list
//! 3. **Pack & deliver**: `Program + config -> Envelope`, handed to an
//!    [`EnvelopeSink`] at most once per mount or reconfiguration
//! 4. **Drive**: a host-owned ~60 Hz clock calls
//!    [`FrameScheduler::advance`]; each tick builds a fresh [`FrameBinding`],
//!    evaluates, and applies the result to a view property
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Compile once, evaluate repeatedly**: programs are immutable after
//!   construction and unchanged payloads are never re-delivered.
//! - **Stateless interpreter**: each evaluation is a pure function of the
//!   program and its frame binding; elapsed time arrives as an input.
//! - **Per-frame failure containment**: a failing evaluation holds the
//!   previous value or skips the frame; it never stops the clock for other
//!   worklets and never crashes the host.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compiler;
mod foundation;
mod interp;
mod ir;
mod runtime;
mod transport;

pub use compiler::parser::{WorkletSource, compile};
pub use foundation::core::{ParamSpec, Value, ValueKind, WorkletId};
pub use foundation::error::{FrameletError, FrameletResult};
pub use interp::eval::{FrameBinding, Interpreter};
pub use ir::node::{
    BinaryOperator, LiteralValue, MathFn, MethodName, Node, Program, PropertyName, UnaryOperator,
};
pub use ir::validate::validate;
pub use runtime::driver::{AdvanceStats, FrameScheduler, FrameTick, TIME_PARAM};
pub use runtime::view::{
    PropertyValue, ViewHandle, ViewId, ViewProperty, ViewRegistry, apply_property,
};
pub use transport::envelope::{
    DeliveryAck, Envelope, EnvelopePacker, EnvelopeSink, PackOutcome,
};
