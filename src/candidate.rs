//! Contracts for the algorithm under test.
//!
//! The oracle treats a candidate as a black box: it hands over two slices of
//! rankings and gets back either a matching or an instrumented [`Run`]. An
//! `Err` or a panic from the candidate is captured as a
//! [`ContractViolation`] instead of unwinding through the oracle.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use stablecheck_core::{ContractViolation, Pairing, Ranking, Run};

/// A stable-matching implementation checked by the result oracle.
pub trait MatchingAlgorithm {
    /// Name shown in reports.
    fn name(&self) -> &str {
        "candidate"
    }

    /// Compute a matching for the given left and right rankings.
    ///
    /// # Errors
    /// Any error is reported as a contract violation by the candidate.
    fn matching(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Vec<Pairing>>;
}

/// An instrumented implementation checked by the trace oracle.
pub trait InstrumentedAlgorithm {
    /// Name shown in reports.
    fn name(&self) -> &str {
        "candidate"
    }

    /// Run the algorithm and return every offer it made, in order.
    ///
    /// # Errors
    /// Any error is reported as a contract violation by the candidate.
    fn run(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Run>;
}

impl<F> MatchingAlgorithm for F
where
    F: Fn(&[Ranking], &[Ranking]) -> anyhow::Result<Vec<Pairing>>,
{
    fn matching(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Vec<Pairing>> {
        self(left, right)
    }
}

impl<F> InstrumentedAlgorithm for F
where
    F: Fn(&[Ranking], &[Ranking]) -> anyhow::Result<Run>,
{
    fn run(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Run> {
        self(left, right)
    }
}

/// Give a closure a name for reports.
pub struct Named<F> {
    name: String,
    inner: F,
}

impl<F> Named<F> {
    /// Wrap `inner` under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, inner: F) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<F> MatchingAlgorithm for Named<F>
where
    F: Fn(&[Ranking], &[Ranking]) -> anyhow::Result<Vec<Pairing>>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matching(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Vec<Pairing>> {
        (self.inner)(left, right)
    }
}

impl<F> InstrumentedAlgorithm for Named<F>
where
    F: Fn(&[Ranking], &[Ranking]) -> anyhow::Result<Run>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, left: &[Ranking], right: &[Ranking]) -> anyhow::Result<Run> {
        (self.inner)(left, right)
    }
}

/// Call into the candidate, converting an error or panic into a
/// [`ContractViolation`].
///
/// # Errors
/// Returns `Errored` if `call` returns `Err` and `Panicked` if it panics.
pub fn invoke<T>(call: impl FnOnce() -> anyhow::Result<T>) -> Result<T, ContractViolation> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ContractViolation::Errored {
            message: format!("{e:#}"),
        }),
        Err(payload) => Err(ContractViolation::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic payload>".to_owned())
}
