// AccentFlow Pipeline
// Single-consumer loop from the input source through the router

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::compose::{EventRouter, RouteOutcome};
use crate::error::AccentResult;
use crate::feedback::Feedback;
use crate::input::{EventSource, SourceError};
use crate::output::KeySink;

/// Longest wait for an event before the stop flag is checked again.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub events: u64,
    pub forwarded: u64,
    pub consumed: u64,
    pub previews: u64,
    pub committed: u64,
    pub dropped: u64,
}

impl PipelineStats {
    fn record(&mut self, outcome: &RouteOutcome) {
        self.events += 1;
        match outcome {
            RouteOutcome::Forwarded => self.forwarded += 1,
            RouteOutcome::Consumed => self.consumed += 1,
            RouteOutcome::Previewed { .. } => self.previews += 1,
            RouteOutcome::Committed(_) => self.committed += 1,
            RouteOutcome::Dropped { .. } => self.dropped += 1,
        }
    }
}

pub struct Pipeline<'a, E: EventSource, S: KeySink, F: Feedback> {
    source: E,
    router: EventRouter<'a, S, F>,
}

impl<'a, E: EventSource, S: KeySink, F: Feedback> Pipeline<'a, E, S, F> {
    pub fn new(source: E, router: EventRouter<'a, S, F>) -> Self {
        Self { source, router }
    }

    pub fn router(&self) -> &EventRouter<'a, S, F> {
        &self.router
    }

    /// Process events until `running` is cleared or the source runs dry.
    ///
    /// Read and write failures end the run with an error. The caller owns
    /// the devices and releases them when the pipeline is dropped.
    pub fn run(&mut self, running: &AtomicBool) -> AccentResult<PipelineStats> {
        let mut stats = PipelineStats::default();

        while running.load(Ordering::SeqCst) {
            let event = match self.source.next_event(POLL_TIMEOUT) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(SourceError::Exhausted) => {
                    log::debug!("Input source exhausted");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            let outcome = self.router.route(&event)?;
            if !matches!(outcome, RouteOutcome::Forwarded) {
                log::trace!("{:?} -> {:?}", event, outcome);
            }
            stats.record(&outcome);
        }

        log::debug!("Pipeline stopped: {:?}", stats);
        Ok(stats)
    }

    pub fn into_parts(self) -> (E, S, F) {
        let (sink, feedback) = self.router.into_parts();
        (self.source, sink, feedback)
    }
}
