//! Pure audit evaluation (no IO).
//!
//! Input: a project model (config tree, optional source tree, package deps)
//! constructed elsewhere, plus the ignore policy.
//! Output: ordered issues, blocking/warning partitions and a verdict.

#![forbid(unsafe_code)]

pub mod checks;
pub mod cost;
pub mod model;
pub mod policy;
pub mod report;
pub mod scanner;

mod engine;

pub use engine::{decide, evaluate};

#[cfg(test)]
mod proptest;
#[cfg(test)]
pub(crate) mod test_support;
