//! Multi-factor phishing risk engine.
//!
//! Feed one collector capture in, get one verdict back: independent
//! detectors (typosquat similarity, registration age, certificate trust,
//! CT issuance patterns, page signals) each contribute a weighted factor,
//! and the aggregator always produces a well-formed result even when
//! every network lookup fails.

pub mod config;
pub mod core;
pub mod detectors;
pub mod pipeline;
pub mod sources;
