//! # Engine Module
//!
//! Long-lived state and request plumbing shared by every prediction: the
//! validated configuration, the immutable [`context::EngineContext`], and the
//! fetch machinery with its timeout, retry and cancellation policies.
//!
//! ## Key Components
//!
//! - [`config`] - Builder-validated prediction configuration
//! - [`context`] - Loaded model parameters and entry index, plus query resolution
//! - [`fetcher`] - Timeout-bounded, cancellable confidence retrieval with retries
//! - [`cancel`] - Cooperative cancellation signals
//! - [`progress`] / [`state`] - Stage tracking reported to callers
//! - [`error`] - Startup and per-request error types

pub mod cancel;
pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod progress;
pub mod state;
