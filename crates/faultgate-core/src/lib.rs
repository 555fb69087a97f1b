//! faultgate Core - Domain types and port definitions
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `Severity`, `Breadcrumb`, `ReportedError`, `CaptureOptions`,
//!   `ContextSnapshot`, `DedupKey`
//! - **Port definitions** - Traits for adapters: `IReportingBackend`, `IReportingClient`,
//!   `IRandomSource`
//! - **Configuration** - YAML-backed `Config` with validation and a builder
//!
//! # Architecture
//!
//! The domain module holds plain data with no knowledge of any particular
//! error-reporting service. Ports define the trait interfaces that the
//! telemetry crate implements (Sentry adapter, thread RNG) and that tests
//! replace with recording doubles.

pub mod config;
pub mod domain;
pub mod ports;
