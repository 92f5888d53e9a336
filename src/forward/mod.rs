//! Forwards event batches to the scanner collect endpoint.
//!
//! Messages are serialized, packed into newline-delimited batches under a
//! byte-size ceiling, and delivered one batch at a time with bounded
//! exponential-backoff retry. A 4XX response is terminal and aborts the
//! whole invocation; 5XX responses and transport failures are retried.

mod batch;
mod client;
mod error;
mod retry;
mod tests;

pub use batch::{build_batches, Batch};
pub use client::Forwarder;
pub use error::{ForwardError, ForwardResult};
pub use retry::send_batch_with_retry;
