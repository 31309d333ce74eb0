//! Host-side imports for spec-runner.
//!
//! Test modules from the spec suite may import from a host module named
//! `spectest`. This crate provides the deliberately narrow stub of it that the
//! runner instantiates every module against.
//!
//! # Interfaces
//!
//! - [`spectest`]: The [`SpectestResolver`] import stub

pub mod spectest;

pub use spectest::SpectestResolver;
