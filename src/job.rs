//! Background planning.
//!
//! [`PlanningJob`] runs [`ExamPlanner::plan_exam_schedule_with_cancel`] on
//! its own thread and streams progress over a channel, so a host UI thread
//! stays responsive. The last event is always exactly one
//! [`PlanningEvent::Finished`].

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::config::PlanningParams;
use crate::planner::{ExamPlanner, PlanOutcome};
use crate::progress::CancelFlag;
use crate::providers::{ClassroomProvider, CourseProvider, StudentProvider};

/// Event emitted by a running job.
#[derive(Debug, Clone)]
pub enum PlanningEvent {
    /// Intermediate progress.
    Progress { percent: u8, message: String },
    /// Final outcome.
    Finished(PlanOutcome),
}

/// Exam planning running on a worker thread.
#[derive(Debug)]
pub struct PlanningJob {
    events: Receiver<PlanningEvent>,
    cancel: CancelFlag,
    handle: JoinHandle<()>,
}

impl PlanningJob {
    /// Starts planning in the background.
    pub fn spawn<C>(catalog: Arc<C>, params: PlanningParams) -> Self
    where
        C: CourseProvider + ClassroomProvider + StudentProvider + Send + Sync + 'static,
    {
        Self::spawn_with_cancel(catalog, params, CancelFlag::new())
    }

    /// Starts planning in the background, observing an existing cancel flag.
    pub fn spawn_with_cancel<C>(catalog: Arc<C>, params: PlanningParams, cancel: CancelFlag) -> Self
    where
        C: CourseProvider + ClassroomProvider + StudentProvider + Send + Sync + 'static,
    {
        let (tx, events) = mpsc::channel();
        let flag = cancel.clone();

        let handle = thread::spawn(move || {
            let planner = ExamPlanner::from_catalog(&*catalog);
            let progress_tx = tx.clone();
            let mut sink = |percent: u8, message: &str| {
                // A dropped receiver only means nobody is listening.
                let _ = progress_tx.send(PlanningEvent::Progress {
                    percent,
                    message: message.to_string(),
                });
            };
            let outcome = planner.plan_exam_schedule_with_cancel(&params, &mut sink, &flag);
            debug!(success = outcome.success, "planning job finished");
            let _ = tx.send(PlanningEvent::Finished(outcome));
        });

        Self {
            events,
            cancel,
            handle,
        }
    }

    /// Event stream; disconnects after [`PlanningEvent::Finished`].
    pub fn events(&self) -> &Receiver<PlanningEvent> {
        &self.events
    }

    /// Requests cancellation; the job finishes with the best schedule so far.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Blocks until the job finishes, discarding remaining progress events.
    ///
    /// Returns `None` if the worker thread panicked.
    pub fn wait(self) -> Option<PlanOutcome> {
        let outcome = self.events.iter().find_map(|event| match event {
            PlanningEvent::Finished(outcome) => Some(outcome),
            PlanningEvent::Progress { .. } => None,
        });
        self.handle.join().ok()?;
        outcome
    }
}
