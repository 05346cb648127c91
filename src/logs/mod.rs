// Logs module.
// Tails CloudWatch log groups through the aws program with time-range filtering.

pub mod since;
pub mod streamer;

pub use since::{format_since, parse_since};
pub use streamer::{LogStreamer, TailRequest};
