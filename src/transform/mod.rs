//! The transform protocol.
//!
//! - [`traits`]: the [`Transform`] trait every transform implements
//! - [`runner`]: dispatch (in place, input→output, shared handles, batches)
//! - [`spec`]: serde chain specifications

pub mod runner;
pub mod spec;
pub mod traits;

pub use runner::{
    inout, inplace, inplace_always, inplace_batch, inplace_shared, plan_inout, plan_inplace,
    transformed, transformed_copy, try_inplace, DispatchPlan,
};
pub use spec::{TransformChainSpec, TransformSpec};
pub use traits::{NoopTransform, Transform, TransformMode};
