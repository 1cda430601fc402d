//! Timed execution of pointer-action plans.
//!
//! The scheduler turns an accepted [`ActionPlan`] into absolute fire times
//! once, at acceptance, then drives the [`ActionExecutor`] from a single
//! timer task. At most one plan is in flight; later submissions are rejected
//! rather than queued, and a rejection never perturbs the in-flight
//! schedule.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use tether_protocol::{ActionPlan, ActionStep};

use crate::error::{Error, Result};
use crate::events::{EventBus, EventStream};
use crate::host::ActionExecutor;

/// Minimum enforced time between consecutive taps, independent of the
/// caller-specified per-step delay.
///
/// The per-step `delay_ms` is "wait before this tap"; the spacing floor is
/// added on top between steps so scripted sequences keep a human-like
/// cadence even when every delay is zero.
pub const MIN_ACTION_SPACING: Duration = Duration::from_millis(300);

/// Events emitted while a plan executes.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    /// One step was handed to the executor.
    StepFired {
        /// Position of the step in its plan
        index: usize,
        /// X coordinate of the tap
        x: f32,
        /// Y coordinate of the tap
        y: f32,
        /// Whether the host reported the gesture dispatched
        dispatched: bool,
    },
    /// Every step of the accepted plan has fired.
    PlanCompleted {
        /// Number of steps that fired
        steps: usize,
    },
    /// `cancel()` stopped the plan before all steps fired.
    PlanCancelled {
        /// Steps that fired before cancellation
        fired: usize,
        /// Steps in the accepted plan
        total: usize,
    },
}

/// One step bound to its absolute fire time.
#[derive(Debug, Clone, Copy)]
struct ScheduledFire {
    at: Instant,
    step: ActionStep,
}

/// Computes absolute fire times for a plan accepted at `submitted_at`.
///
/// Running cumulative offset: each step first advances the offset by the
/// spacing floor (from the second step on), then by its own pre-delay. Fire
/// times are therefore monotonic non-decreasing regardless of the delays.
fn compute_fires(submitted_at: Instant, steps: &[ActionStep]) -> Vec<ScheduledFire> {
    let mut offset = Duration::ZERO;
    let mut fires = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        if index > 0 {
            offset += MIN_ACTION_SPACING;
        }
        offset += Duration::from_millis(step.delay_ms);
        fires.push(ScheduledFire {
            at: submitted_at + offset,
            step: *step,
        });
    }
    fires
}

struct SchedulerInner {
    executor: Arc<dyn ActionExecutor>,
    events: EventBus<SchedulerEvent>,
    // Some while a plan is in flight; the Notify cancels it.
    current: Mutex<Option<Arc<Notify>>>,
}

impl SchedulerInner {
    async fn run_plan(self: Arc<Self>, fires: Vec<ScheduledFire>, cancel: Arc<Notify>) {
        let total = fires.len();
        let mut fired = 0usize;
        for (index, fire) in fires.into_iter().enumerate() {
            tokio::select! {
                _ = cancel.notified() => {
                    *self.current.lock() = None;
                    debug!(target: "tether.scheduler", fired, total, "plan cancelled");
                    self.events.emit(SchedulerEvent::PlanCancelled { fired, total });
                    return;
                }
                _ = sleep_until(fire.at) => {}
            }
            let dispatched = self.executor.execute(fire.step.x, fire.step.y);
            if !dispatched {
                warn!(target: "tether.scheduler", index, "tap was not dispatched");
            }
            self.events.emit(SchedulerEvent::StepFired {
                index,
                x: fire.step.x,
                y: fire.step.y,
                dispatched,
            });
            fired += 1;
        }
        // Return to idle before announcing completion so a subscriber may
        // submit the next plan from the event.
        *self.current.lock() = None;
        debug!(target: "tether.scheduler", steps = total, "plan completed");
        self.events.emit(SchedulerEvent::PlanCompleted { steps: total });
    }
}

/// Drives an [`ActionExecutor`] through one plan at a time.
pub struct ActionScheduler {
    inner: Arc<SchedulerInner>,
}

impl ActionScheduler {
    /// Creates a scheduler driving `executor`.
    pub fn new(executor: Arc<dyn ActionExecutor>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                executor,
                events: EventBus::default(),
                current: Mutex::new(None),
            }),
        }
    }

    /// Accepts a plan and schedules its steps.
    ///
    /// Fire times are fixed here, at acceptance; the plan is never mutated
    /// afterward. The call never blocks on execution: steps fire from a
    /// spawned timer task.
    ///
    /// # Errors
    ///
    /// - [`Error::SchedulerBusy`] while another plan is in flight
    /// - [`Error::EmptyPlan`] for a plan with no steps
    pub fn submit(&self, plan: ActionPlan) -> Result<()> {
        if plan.is_empty() {
            return Err(Error::EmptyPlan);
        }
        let cancel = {
            let mut current = self.inner.current.lock();
            if current.is_some() {
                return Err(Error::SchedulerBusy);
            }
            let cancel = Arc::new(Notify::new());
            *current = Some(cancel.clone());
            cancel
        };

        let fires = compute_fires(Instant::now(), &plan.steps);
        debug!(target: "tether.scheduler", steps = fires.len(), "plan accepted");

        let inner = self.inner.clone();
        tokio::spawn(inner.run_plan(fires, cancel));
        Ok(())
    }

    /// Aborts any steps not yet fired.
    ///
    /// A step already handed to the executor is not recalled; dispatch to
    /// the host display primitive is fire-and-forget. Cancelling an idle
    /// scheduler is a no-op.
    pub fn cancel(&self) {
        if let Some(cancel) = self.inner.current.lock().as_ref() {
            cancel.notify_one();
        }
    }

    /// True while a plan is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.current.lock().is_some()
    }

    /// Subscribes to step, completion, and cancellation events.
    pub fn subscribe(&self) -> EventStream<SchedulerEvent> {
        EventStream::new(self.inner.events.subscribe())
    }
}
