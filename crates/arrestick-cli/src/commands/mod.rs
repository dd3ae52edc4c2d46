pub mod predict;
pub mod resolve;
