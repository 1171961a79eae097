//! Event submission layer
//!
//! - CaptureEvent: the analytics event sent once per task
//! - EventSink: the synchronous submit seam workers call
//! - HttpCaptureClient: EventSink over a PostHog-style `/capture/` route

pub mod event;
pub mod http;

pub use event::{CaptureEvent, EventSink, TEST_TYPE};
pub use http::HttpCaptureClient;
