//! Request/response normalization shared by all endpoints.
//!
//! Inbound proxy events are parsed into a [`request::Request`], the stage is
//! resolved by [`environment::resolve_environment`] and every outcome,
//! including errors, leaves as a [`response::Response`] envelope.

pub mod claims;
pub mod environment;
pub mod error;
pub mod request;
pub mod response;
pub mod validation;
