//! Per-attribute plan modifiers
//!
//! Modifiers run in declaration order over the value proposed by
//! [`crate::plan::plan_resource_change`]. Each may rewrite the planned value
//! or flag that changing the attribute forces a new resource.

use crate::types::{Diagnostics, Dynamic};

/// Values seen by one modifier call for one attribute
#[derive(Debug, Clone)]
pub struct PlanModifyRequest {
    pub state: Dynamic,
    pub plan: Dynamic,
    pub config: Dynamic,
    pub attribute_path: String,
}

#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan_value: Dynamic,
    pub requires_replace: bool,
    pub diagnostics: Diagnostics,
}

impl PlanModifyResponse {
    /// Plans `value` in place: no replacement, no diagnostics
    pub fn keep(value: Dynamic) -> Self {
        Self {
            plan_value: value,
            requires_replace: false,
            diagnostics: Diagnostics::new(),
        }
    }
}

pub trait PlanModifier: Send + Sync {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse;
}

/// Any settled change to the attribute forces a replacement. Unknown on
/// either side never does, since the final value is not yet decided.
pub struct RequiresReplaceIfChanged;

impl PlanModifier for RequiresReplaceIfChanged {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let settled = !request.state.is_unknown() && !request.plan.is_unknown();
        let changed = settled && !values_equal(&request.state, &request.plan);

        let mut response = PlanModifyResponse::keep(request.plan);
        response.requires_replace = changed;
        response
    }
}

/// Server-assigned values (ids, creation stamps) keep their recorded value
/// instead of going unknown on every update
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let undecided = matches!(request.plan, Dynamic::Unknown | Dynamic::Null);
        if undecided && !request.state.is_null() {
            return PlanModifyResponse::keep(request.state);
        }
        PlanModifyResponse::keep(request.plan)
    }
}

/// Structural equality; numbers compare within `f64::EPSILON`
pub fn values_equal(a: &Dynamic, b: &Dynamic) -> bool {
    use Dynamic::*;

    match (a, b) {
        (Null, Null) | (Unknown, Unknown) => true,
        (Bool(x), Bool(y)) => x == y,
        (Number(x), Number(y)) => (x - y).abs() < f64::EPSILON,
        (String(x), String(y)) => x == y,
        (List(xs), List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Map(xs), Map(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}
