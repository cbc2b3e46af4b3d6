//! Planning of resource changes
//!
//! Computes the planned state for a resource from its prior state and new
//! configuration, applying defaults and plan modifiers, and classifies the
//! change the host engine must apply.

use crate::plan_modifier::{values_equal, PlanModifyRequest};
use crate::schema::{Attribute, Schema};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// What applying a plan will do to the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    NoOp,
    Create,
    Update,
    Replace,
    Delete,
}

/// Result of planning a single resource
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub action: PlanAction,
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn plan_resource_change(
    schema: &Schema,
    prior_state: &DynamicValue,
    config: &DynamicValue,
) -> PlannedChange {
    if config.is_null() {
        let action = if prior_state.is_null() {
            PlanAction::NoOp
        } else {
            PlanAction::Delete
        };
        return PlannedChange {
            action,
            planned_state: DynamicValue::null(),
            requires_replace: Vec::new(),
            diagnostics: Vec::new(),
        };
    }

    let creating = prior_state.is_null();
    let mut planned = DynamicValue::object();
    let mut requires_replace = Vec::new();
    let mut diagnostics = Vec::new();

    // Proposed new state: configured values win; computed attributes carry
    // their prior value forward, or stay unknown until the server fills them
    for attr in &schema.attributes {
        let config_value = lookup(config, &attr.name);
        let prior_value = lookup(prior_state, &attr.name);

        let value = if !config_value.is_null() {
            config_value
        } else if let (Some(default), true) = (&attr.default, attr.optional && attr.computed) {
            default.value()
        } else if attr.computed {
            if creating {
                Dynamic::Unknown
            } else {
                prior_value
            }
        } else {
            Dynamic::Null
        };
        planned.set_attribute(&attr.name, value);
    }

    for attr in &schema.attributes {
        let replace = apply_modifiers(attr, prior_state, config, &mut planned, &mut diagnostics);
        if replace && !creating {
            requires_replace.push(AttributePath::new(&attr.name));
        }
    }

    let has_changes = !creating
        && schema
            .attributes
            .iter()
            .any(|attr| !values_equal(&lookup(&planned, &attr.name), &lookup(prior_state, &attr.name)));

    // Server-managed attributes may change on any update unless a modifier
    // pins them to state
    if has_changes {
        for attr in &schema.attributes {
            if attr.computed && lookup(config, &attr.name).is_null() && attr.default.is_none() {
                planned.set_attribute(&attr.name, Dynamic::Unknown);
                apply_modifiers(attr, prior_state, config, &mut planned, &mut diagnostics);
            }
        }
    }

    let action = if creating {
        PlanAction::Create
    } else if !requires_replace.is_empty() {
        PlanAction::Replace
    } else if has_changes {
        PlanAction::Update
    } else {
        PlanAction::NoOp
    };

    tracing::debug!(
        ?action,
        replace = requires_replace.len(),
        "planned resource change"
    );

    PlannedChange {
        action,
        planned_state: planned,
        requires_replace,
        diagnostics,
    }
}

/// Runs every modifier of `attr` in order, rewriting the planned value.
/// Returns true when any modifier requires replacement.
fn apply_modifiers(
    attr: &Attribute,
    prior_state: &DynamicValue,
    config: &DynamicValue,
    planned: &mut DynamicValue,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let path = AttributePath::new(&attr.name);
    let state_value = lookup(prior_state, &attr.name);
    let config_value = lookup(config, &attr.name);
    let mut current = lookup(planned, &attr.name);
    let mut replace = false;

    for modifier in &attr.plan_modifiers {
        let response = modifier.modify_plan(PlanModifyRequest {
            state: state_value.clone(),
            plan: current,
            config: config_value.clone(),
            attribute_path: attr.name.clone(),
        });
        current = response.plan_value;
        replace |= response.requires_replace;
        diagnostics.extend(response.diagnostics.into_vec(&path));
    }

    planned.set_attribute(&attr.name, current);
    replace
}

fn lookup(value: &DynamicValue, name: &str) -> Dynamic {
    value.attribute(name).cloned().unwrap_or(Dynamic::Null)
}
