use crate::policy::FailOn;
use confguard_types::{ResultSet, Verdict};

/// Verdict of a run: failures always fail, warnings fail only under [`FailOn::Warning`].
pub fn compute_verdict(results: &ResultSet, fail_on: FailOn) -> Verdict {
    if !results.failures.is_empty() {
        return Verdict::Fail;
    }

    if !results.warnings.is_empty() {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Failure => Verdict::Warn,
        };
    }

    Verdict::Pass
}
