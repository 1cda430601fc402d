//! Pointer-action steps and plans as they ride the wire.

use serde::{Deserialize, Serialize};

/// One pointer tap at a screen coordinate, with a pre-delay.
///
/// `delay_ms` is the wait *before* this tap fires, not after. It defaults to
/// zero when omitted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    /// X coordinate in screen pixels
    pub x: f32,
    /// Y coordinate in screen pixels
    pub y: f32,
    /// Milliseconds to wait before this tap
    #[serde(default)]
    pub delay_ms: u64,
}

impl ActionStep {
    /// Creates a step at `(x, y)` firing after `delay_ms`.
    pub fn new(x: f32, y: f32, delay_ms: u64) -> Self {
        Self { x, y, delay_ms }
    }
}

/// An ordered sequence of taps executed as one unit.
///
/// Immutable once accepted by the scheduler; steps always fire in list
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Steps in execution order
    pub steps: Vec<ActionStep>,
}

impl ActionPlan {
    /// Creates a plan from a list of steps.
    pub fn new(steps: Vec<ActionStep>) -> Self {
        Self { steps }
    }

    /// Creates a one-step plan, the single-tap convenience path.
    pub fn single(x: f32, y: f32, delay_ms: u64) -> Self {
        Self {
            steps: vec![ActionStep::new(x, y, delay_ms)],
        }
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the plan has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<ActionStep>> for ActionPlan {
    fn from(steps: Vec<ActionStep>) -> Self {
        ActionPlan::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_delay_defaults_to_zero() {
        let step: ActionStep = serde_json::from_str(r#"{"x":10.0,"y":20.0}"#).unwrap();
        assert_eq!(step, ActionStep::new(10.0, 20.0, 0));
    }

    #[test]
    fn plan_round_trips() {
        let plan = ActionPlan::new(vec![
            ActionStep::new(10.0, 20.0, 0),
            ActionStep::new(10.0, 20.0, 1000),
        ]);
        let json = serde_json::to_string(&plan).unwrap();
        let back: ActionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn single_builds_one_step() {
        let plan = ActionPlan::single(1.5, 2.5, 40);
        assert_eq!(plan.len(), 1);
        assert!(!plan.is_empty());
        assert_eq!(plan.steps[0], ActionStep::new(1.5, 2.5, 40));
    }
}
