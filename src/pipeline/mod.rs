//! Post-detector stages: weighted aggregation into the final verdict.

pub mod aggregator;
