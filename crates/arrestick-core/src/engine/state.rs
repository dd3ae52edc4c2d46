use super::progress::{Progress, ProgressReporter};
use std::fmt;
use tracing::trace;

/// Lifecycle of a single prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Received,
    Validating,
    Rejected,
    Resolving,
    Fetching,
    Scoring,
    Extracting,
    Assembled,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Received => "Received",
            Stage::Validating => "Validating input",
            Stage::Rejected => "Rejected",
            Stage::Resolving => "Resolving identifier",
            Stage::Fetching => "Fetching structural confidence",
            Stage::Scoring => "Scoring sequence",
            Stage::Extracting => "Extracting regions",
            Stage::Assembled => "Assembled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Rejected | Stage::Assembled)
    }

    pub fn can_advance_to(&self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Received, Validating)
                | (Validating, Rejected)
                | (Validating, Resolving)
                | (Resolving, Rejected)
                | (Resolving, Fetching)
                | (Resolving, Scoring)
                | (Fetching, Rejected)
                | (Fetching, Scoring)
                | (Scoring, Rejected)
                | (Scoring, Extracting)
                | (Extracting, Assembled)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) struct StageTracker<'a> {
    current: Stage,
    reporter: &'a ProgressReporter<'a>,
}

impl<'a> StageTracker<'a> {
    pub(crate) fn new(reporter: &'a ProgressReporter<'a>) -> Self {
        Self {
            current: Stage::Received,
            reporter,
        }
    }

    pub(crate) fn current(&self) -> Stage {
        self.current
    }

    pub(crate) fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal stage transition {:?} -> {:?}",
            self.current,
            next
        );
        trace!("Stage transition: {:?} -> {:?}", self.current, next);
        self.current = next;
        self.reporter.report(Progress::StageStart { stage: next });
    }
}
