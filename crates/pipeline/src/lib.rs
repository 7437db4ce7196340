//! The Lumina request/response pipeline.
//!
//! Every feature of the application goes through the same five stages:
//! build a model request, send it through the same-origin relay, survive
//! transient overload with bounded backoff, extract the JSON payload
//! embedded in the generated text, and validate it into a typed domain
//! shape. [`client::StudyPipeline`] composes the stages; the individual
//! modules are public so callers can drive a single stage in isolation.

pub mod audio;
pub mod client;
pub mod extract;
pub mod invoker;
pub mod request;
pub mod transport;
pub mod validate;

// Re-exports for convenience.
pub use client::StudyPipeline;
pub use extract::ExtractedPayload;
pub use invoker::ResilientInvoker;
pub use request::{GenerationOptions, ModelRequest, PromptPart, RequestBuilder, SourceMaterial};
pub use transport::{HttpRelayTransport, ProxyResponse, RelayTransport};
