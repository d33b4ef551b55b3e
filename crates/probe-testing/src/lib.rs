//! Test utilities for probe services.
//!
//! Provides `MockProbe` to stand in for the dependency handle and network
//! helpers for simulating an unreachable dependency.
//! Import in tests only — never in production code.

pub mod net;
pub mod probe;
