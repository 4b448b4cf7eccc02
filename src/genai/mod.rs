//! Hosted generative language model integration.
//!
//! Every webhook ends by handing its computed figures to the model and
//! returning the phrased reply to the dialogue platform. The model is
//! consumed as a streamed SSE response and concatenated into one string.

mod client;
pub mod prompts;
mod sse;

pub use client::GenAiClient;
