//! Stable-matching oracle primitives.
//!
//! Pure, I/O-free building blocks for checking implementations of the
//! two-sided stable-matching problem:
//!
//! - [`Instance`] / [`generate_rankings`]: random complete strict rankings
//! - [`check_matching`]: completeness, validity, and stability of a matching
//! - [`check_trace`]: fidelity of a proposal trace to greedy proposal order
//! - [`Violation`] and friends: typed, serializable failure descriptions
//!
//! # Usage
//!
//! ```rust
//! use rand::SeedableRng;
//! use stablecheck_core::{Instance, Pairing, check_matching};
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let instance = Instance::random(&mut rng, 3).unwrap();
//! let matching = vec![Pairing::new(0, 0)];
//! assert!(check_matching(&instance, &matching).is_err());
//! ```

pub mod fidelity;
pub mod generate;
pub mod instance;
pub mod rank;
pub mod stability;
pub mod types;
pub mod violation;

pub use fidelity::check_trace;
pub use generate::generate_rankings;
pub use instance::{Instance, validate_ranking};
pub use rank::RankTable;
pub use stability::{
    blocking_pairs, check_completeness, check_matching, check_stability, check_validity,
};
pub use types::{Offer, Pairing, ParticipantId, Ranking, Run, Side};
pub use violation::{
    ContractViolation, GenerationError, StabilityViolation, TraceViolation, Violation,
};
