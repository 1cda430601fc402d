//! Maps command verbs to handlers and produces acknowledgments.

use std::sync::Arc;

use tracing::info;

use tether_protocol::{
    Ack, ActionPlan, Command, LaunchParams, TapParams, TapSequenceParams, ToastParams,
};

use crate::error::Error;
use crate::host::HostServices;
use crate::scheduler::ActionScheduler;

/// Routes inbound commands to their handlers.
///
/// The verb table is fixed at construction; there is no runtime
/// registration. Unknown verbs fail with `"unknown action"`. A handler
/// either performs its side effect synchronously (`launch`, `toast`) or
/// hands a plan to the scheduler, in which case the ack reports acceptance
/// only; completion is observable on the scheduler's event stream and is
/// not reported upstream.
pub struct CommandDispatcher {
    host: Arc<dyn HostServices>,
    scheduler: Arc<ActionScheduler>,
}

impl CommandDispatcher {
    /// Creates a dispatcher over the given host services and scheduler.
    pub fn new(host: Arc<dyn HostServices>, scheduler: Arc<ActionScheduler>) -> Self {
        Self { host, scheduler }
    }

    /// Dispatches one command and returns its acknowledgment.
    ///
    /// The ack always echoes the command's verb and correlation id.
    pub fn dispatch(&self, command: &Command) -> Ack {
        let ack = match command.action.as_str() {
            "launch" => self.launch(command),
            "toast" => self.toast(command),
            "tap" => self.tap(command),
            "tap_sequence" => self.tap_sequence(command),
            _ => Ack::fail(&command.action, "unknown action"),
        };
        info!(
            target: "tether.dispatch",
            action = %command.action,
            ok = ack.ok,
            msg = %ack.msg,
            "command handled"
        );
        ack.with_id(command.id.clone())
    }

    fn launch(&self, command: &Command) -> Ack {
        let params: LaunchParams = match command.params() {
            Ok(params) => params,
            Err(e) => return Ack::fail("launch", format!("bad parameters: {e}")),
        };
        if params.package.is_empty() {
            return Ack::fail("launch", "no package");
        }
        if self.host.launch_application(&params.package) {
            Ack::ok("launch", format!("launched {}", params.package))
        } else {
            Ack::fail("launch", format!("failed to launch {}", params.package))
        }
    }

    fn toast(&self, command: &Command) -> Ack {
        let params: ToastParams = match command.params() {
            Ok(params) => params,
            Err(e) => return Ack::fail("toast", format!("bad parameters: {e}")),
        };
        self.host.show_transient_message(&params.text);
        Ack::ok("toast", "ok")
    }

    fn tap(&self, command: &Command) -> Ack {
        let params: TapParams = match command.params() {
            Ok(params) => params,
            Err(e) => return Ack::fail("tap", format!("bad parameters: {e}")),
        };
        self.submit_plan("tap", ActionPlan::single(params.x, params.y, params.delay_ms))
    }

    fn tap_sequence(&self, command: &Command) -> Ack {
        let params: TapSequenceParams = match command.params() {
            Ok(params) => params,
            Err(e) => return Ack::fail("tap_sequence", format!("bad parameters: {e}")),
        };
        self.submit_plan("tap_sequence", ActionPlan::new(params.steps))
    }

    fn submit_plan(&self, action: &str, plan: ActionPlan) -> Ack {
        let steps = plan.len();
        match self.scheduler.submit(plan) {
            Ok(()) => {
                let noun = if steps == 1 { "step" } else { "steps" };
                Ack::ok(action, format!("submitted {steps} {noun}"))
            }
            Err(Error::SchedulerBusy) => Ack::fail(action, "busy"),
            Err(Error::EmptyPlan) => Ack::fail(action, "no steps"),
            Err(e) => Ack::fail(action, e.to_string()),
        }
    }
}
