//! 请求调度模块：对受限速的上游接口进行串行化与限速调用。
//!
//! # Request Governor Module
//!
//! Serializes and paces outbound calls to a rate-limited upstream so that the
//! caller never exceeds the allowed rate, without dropping or reordering work.
//!
//! ## Guarantees
//!
//! - **Single in-flight**: at most one task executes at a time
//! - **FIFO**: tasks start in the order they were submitted
//! - **Pacing between starts**: consecutive start times are at least
//!   `1s / max_requests_per_second` apart; a slow task is neither compensated
//!   nor penalized
//! - **Isolation**: a failing or panicking task only settles its own handle
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RequestGovernor`] | Caller-owned queue with a single dispatcher task |
//! | [`GovernorConfig`] | Rate configuration, validated up front |
//! | [`TaskHandle`] | Future settling with the task's result |
//! | [`TaskError`] | Failure, panic or abandonment of one task |
//!
//! ```rust,no_run
//! use flightwatch::governor::RequestGovernor;
//!
//! # async fn demo() -> flightwatch::Result<()> {
//! let governor = RequestGovernor::with_rate(1.0)?;
//! let handle = governor.submit(|| async { Ok::<_, std::io::Error>("pong") });
//! let value = handle.await.expect("task failed");
//! assert_eq!(value, "pong");
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatcher;
mod handle;

pub use config::{GovernorConfig, MAX_INTERVAL};
pub use dispatcher::{GovernorSnapshot, RequestGovernor};
pub use handle::{TaskError, TaskHandle};
