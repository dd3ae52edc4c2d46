//! Request-scoped data carried through the prediction pipeline.

pub mod prediction;
pub mod query;
pub mod region;
pub mod scored;
