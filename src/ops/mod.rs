//! Concrete transforms and the algorithms behind them.

pub mod isolate_start_state;
pub mod push_weights;
pub mod spans;
pub mod sub_union;
pub mod union;

pub use isolate_start_state::IsolateStartState;
pub use push_weights::{
    push_costs_to_start, push_weights_to_final, PushCostsResult, PushWeights, PushWeightsResult,
    PushWeightsToFinal,
};
pub use spans::{infer_spans, StateSpans};
pub use sub_union::{sub_union, SubUnion, SubUnionOptions};
pub use union::{union_into, StandardUnion};
