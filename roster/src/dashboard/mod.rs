//! Dashboard client: fetches the connectivity check and the user list from a running server.
//!
//! - [`fetch`]: the [`FetchDashboard`] trait and its `reqwest` implementation
//! - [`poller`]: bounded retry state machine publishing every transition on a `watch` channel
//!
//! ```text
//! Idle ──▶ Fetching(1) ──▶ Success
//!               │
//!               ▼ (error, delay)
//!          Fetching(2) ──▶ ... ──▶ Fetching(max) ──▶ Failed
//! ```
//!
//! A manual retry after `Failed` is just another [`Poller::run`], which starts over at attempt 1.

pub mod fetch;
pub mod poller;

pub use fetch::{DashboardSnapshot, FetchDashboard, FetchDashboardReqwest};
pub use poller::{PollState, Poller, RetryPolicy};
