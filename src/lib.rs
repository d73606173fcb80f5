//! stablecheck library crate.
//!
//! Drives randomized oracle trials against stable-matching implementations.
//! The checking primitives live in [`stablecheck_core`]; this crate adds the
//! candidate contracts, the trial drivers, bundled reference candidates,
//! configuration, and report rendering used by the `stablecheck` binary.
//!
//! # Usage
//!
//! ```rust
//! use stablecheck::{OracleConfig, reference::Builtin, run_result_oracle};
//!
//! let config = OracleConfig::new(20, 8).with_seed(3);
//! run_result_oracle(&config, &Builtin::GaleShapley).assert_pass();
//! ```

pub mod candidate;
pub mod case;
pub mod config;
pub mod error;
pub mod format;
pub mod oracle;
pub mod reference;
pub mod telemetry;

pub use candidate::{InstrumentedAlgorithm, MatchingAlgorithm, Named};
pub use config::{Config, OracleConfig};
pub use error::OracleError;
pub use oracle::{OracleKind, OracleReport, TrialFailure, Verdict, run_result_oracle, run_trace_oracle};
pub use stablecheck_core::{Instance, Offer, Pairing, Ranking, Run, Side, Violation};
