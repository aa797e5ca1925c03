use serde::Serialize;

/// Result of a mutating operation (`insert` or `delete`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<S> {
    /// Whether the key set changed
    pub changed: bool,
    /// Steps taken, in execution order. Empty when tracing is disabled
    pub trace: Vec<S>,
}

/// Result of a `search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup<S> {
    pub found: bool,
    pub trace: Vec<S>,
}

/// Collect the steps of a single operation.
/// Steps are built lazily, so a disabled tracer costs nothing but a branch
#[derive(Debug)]
pub(crate) struct Tracer<S> {
    enabled: bool,
    steps: Vec<S>,
}

impl<S> Tracer<S> {
    pub(crate) fn new(enabled: bool) -> Self {
        Tracer {
            enabled,
            steps: Vec::new(),
        }
    }

    pub(crate) fn record<F>(&mut self, make_step: F)
    where
        F: FnOnce() -> S,
    {
        if self.enabled {
            self.steps.push(make_step());
        }
    }

    pub(crate) fn outcome(self, changed: bool) -> Outcome<S> {
        Outcome {
            changed,
            trace: self.steps,
        }
    }

    pub(crate) fn lookup(self, found: bool) -> Lookup<S> {
        Lookup {
            found,
            trace: self.steps,
        }
    }
}
