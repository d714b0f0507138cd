//! gurl: a small command line HTTP client.
//!
//! One invocation sends one request. The request and response heads are traced to a control
//! sink, the response body is streamed untouched to a body sink.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
