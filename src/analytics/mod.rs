//! Structured journal of refresh cycles.

pub mod logger;
