//! Parity bookkeeping
//!
//! A parity case compares our output with the reference CMM's output for
//! the same input and records the deltaE statistics.

use std::fmt;

use crate::accuracy::{DeltaEStats, compare_rgb_buffers};

/// Default pass threshold: imperceptible
pub const PARITY_DELTA_E: f64 = 1.0;

#[derive(Debug)]
pub struct ParityResult {
    pub name: String,
    pub delta_e: DeltaEStats,
    pub passed: bool,
    pub notes: Option<String>,
}

impl ParityResult {
    pub fn is_exact(&self) -> bool {
        self.delta_e.max < 0.0001
    }
}

impl fmt::Display for ParityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (mean {:.4}, p95 {:.4}, max {:.4}, n={})",
            self.name,
            if self.passed { "pass" } else { "FAIL" },
            self.delta_e.mean,
            self.delta_e.p95,
            self.delta_e.max,
            self.delta_e.count
        )?;
        if let Some(notes) = &self.notes {
            write!(f, " [{}]", notes)?;
        }
        Ok(())
    }
}

/// One comparison against lcms2
pub struct ParityTest {
    pub name: String,
    pub threshold: f64,
    /// Known divergence; the case passes only while it still diverges
    pub expected_fail: Option<String>,
}

impl ParityTest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: PARITY_DELTA_E,
            expected_fail: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn expected_fail(mut self, reason: impl Into<String>) -> Self {
        self.expected_fail = Some(reason.into());
        self
    }

    pub fn run(&self, ours: &[u8], reference: &[u8]) -> ParityResult {
        self.judge(compare_rgb_buffers(reference, ours))
    }

    pub fn judge(&self, delta_e: DeltaEStats) -> ParityResult {
        let within = delta_e.max < self.threshold;
        ParityResult {
            name: self.name.clone(),
            passed: within != self.expected_fail.is_some(),
            delta_e,
            notes: self.expected_fail.clone(),
        }
    }
}

/// Results collected over a test run
#[derive(Default)]
pub struct ParityReport {
    results: Vec<ParityResult>,
}

impl ParityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ParityResult) {
        self.results.push(result);
    }

    pub fn failures(&self) -> Vec<&ParityResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    pub fn results(&self) -> &[ParityResult] {
        &self.results
    }
}

impl fmt::Display for ParityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}
