//! # Greetings
//!
//! Serverless greeting endpoints for AWS Lambda behind API Gateway.
//!
//! Every endpoint shares one normalization layer: the stage of the inbound
//! request is resolved into an environment label, an optional item is looked
//! up by id in a pluggable store, and the outcome is wrapped into a uniform
//! JSON envelope.
//!
//! ## Modules
//!
//! - [`web`] - Request model, environment resolution, response envelopes, errors
//! - [`store`] - Item lookup against DynamoDB, the RDS Data API or PostgreSQL
//! - [`handlers`] - The `hello`, `goodbye`, `hello_item` and `goodbye_item` endpoints
//! - [`runtime`] - Lambda runtime integration
//! - [`config`] - Environment based configuration
//! - [`logging`] - Tracing setup with optional OpenTelemetry export
//!
//! ## Feature Flags
//!
//! - `aws_dynamodb` - DynamoDB item store
//! - `aws_rds_data` - Aurora item store via the RDS Data API
//! - `postgres` - PostgreSQL item store via `sqlx`
//! - `open_telemetry` - OpenTelemetry tracing export
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `APP_NAME` | Service identifier used in logs and traces | `GREETINGS` |
//! | `APP_VERSION` | Version string | `DEVELOPMENT-SNAPSHOT-VERSION` |
//! | `ITEMS_BACKEND` | `dynamodb`, `rds-data`, `postgres` or `memory` | per binary |
//!
//! See [`config`] for the store specific variables.

use std::env;
use std::sync::LazyLock;

/// Environment based configuration.
pub mod config;

/// Endpoint implementations.
pub mod handlers;

/// Logging and tracing infrastructure.
pub mod logging;

/// Lambda runtime glue.
pub mod runtime;

/// Item stores and the lookup adapter.
pub mod store;

/// Request/response normalization.
pub mod web;

/// Application name from `APP_NAME` environment variable.
///
/// Used as service name in traces. Defaults to `"GREETINGS"`.
pub static APP_NAME: LazyLock<String> =
    LazyLock::new(|| env::var("APP_NAME").unwrap_or("GREETINGS".to_string()));

/// Application version from `APP_VERSION` environment variable.
pub static APP_VERSION: LazyLock<String> =
    LazyLock::new(|| env::var("APP_VERSION").unwrap_or("DEVELOPMENT-SNAPSHOT-VERSION".to_string()));
