//! Per-factor risk detectors. Each one is independent, order-free and
//! returns exactly one `FactorResult`; network acquisition lives in
//! `sources` so everything here stays pure and unit-testable.

pub mod ct;
pub mod domain;
pub mod domain_age;
pub mod page;
pub mod ssl;
pub mod typosquat;
