//! Observation chain: one step per observed umbrella flag.
//!
//! Steps live in a flat vector; predecessor and successor are index lookups.

use super::InferenceError;

/// One time step of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    /// Zero-based position in input order.
    pub index: usize,
    /// Whether the umbrella was seen at this step.
    pub observed: bool,
}

/// Read-only sequence of time steps. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    steps: Vec<TimeStep>,
}

impl Chain {
    /// Build a chain from observation flags.
    pub fn build(observations: &[bool]) -> Result<Self, InferenceError> {
        if observations.is_empty() {
            return Err(InferenceError::EmptyObservations);
        }
        let steps = observations
            .iter()
            .enumerate()
            .map(|(index, &observed)| TimeStep { index, observed })
            .collect();
        Ok(Chain { steps })
    }

    /// Build a chain from `0`/`1` symbols. Any other character, whitespace
    /// included, is rejected.
    pub fn from_symbols(symbols: &str) -> Result<Self, InferenceError> {
        let observations = symbols
            .chars()
            .enumerate()
            .map(|(position, symbol)| match symbol {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(InferenceError::InvalidSymbol { position, symbol }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(&observations)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TimeStep> {
        self.steps.get(index)
    }

    pub fn head(&self) -> &TimeStep {
        &self.steps[0]
    }

    pub fn last(&self) -> &TimeStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Successor of `step`, None at the tail.
    pub fn next(&self, step: &TimeStep) -> Option<&TimeStep> {
        self.steps.get(step.index + 1)
    }

    /// Predecessor of `step`, None at the head.
    pub fn prev(&self, step: &TimeStep) -> Option<&TimeStep> {
        step.index.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeStep> {
        self.steps.iter()
    }

    /// Observation flags in order.
    pub fn observations(&self) -> Vec<bool> {
        self.steps.iter().map(|s| s.observed).collect()
    }

    /// Observations rendered back as `0`/`1` symbols.
    pub fn to_symbols(&self) -> String {
        self.steps
            .iter()
            .map(|s| if s.observed { '1' } else { '0' })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a TimeStep;
    type IntoIter = std::slice::Iter<'a, TimeStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
