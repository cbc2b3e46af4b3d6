//! Typed access to attribute maps
//!
//! Null and unknown values read as absent. Numbers are f64 on the wire.

use serde_json::Value;
use tfplug::types::{Dynamic, DynamicValue};

use crate::api::common::Patch;
use crate::error::{PipesError, Result};
use crate::json;

pub trait Attrs {
    fn string(&self, name: &str) -> Option<String>;
    fn required_string(&self, name: &str) -> Result<String>;
    fn int(&self, name: &str) -> Option<i64>;
    fn string_list(&self, name: &str) -> Option<Vec<String>>;
    /// Parsed JSON blob; absent when the attribute is null or unknown
    fn json(&self, name: &str) -> Result<Option<Value>>;
    fn required_json(&self, name: &str) -> Result<Value>;

    fn put_string(&mut self, name: &str, value: impl Into<String>);
    fn put_opt_string(&mut self, name: &str, value: Option<&str>);
    fn put_int(&mut self, name: &str, value: i64);
    fn put_string_list(&mut self, name: &str, values: &[String]);
    /// Store a JSON blob in its canonical string form
    fn put_json(&mut self, name: &str, value: Option<&Value>);
}

impl Attrs for DynamicValue {
    fn string(&self, name: &str) -> Option<String> {
        self.attribute(name)
            .and_then(Dynamic::as_string)
            .map(str::to_string)
    }

    fn required_string(&self, name: &str) -> Result<String> {
        self.string(name)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PipesError::MissingAttribute(name.to_string()))
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.attribute(name)
            .and_then(Dynamic::as_number)
            .map(|n| n as i64)
    }

    fn string_list(&self, name: &str) -> Option<Vec<String>> {
        self.attribute(name).and_then(Dynamic::as_list).map(|items| {
            items
                .iter()
                .filter_map(Dynamic::as_string)
                .map(str::to_string)
                .collect()
        })
    }

    fn json(&self, name: &str) -> Result<Option<Value>> {
        match self.string(name) {
            Some(raw) => json::parse_attribute(name, &raw).map(Some),
            None => Ok(None),
        }
    }

    fn required_json(&self, name: &str) -> Result<Value> {
        self.json(name)?
            .ok_or_else(|| PipesError::MissingAttribute(name.to_string()))
    }

    fn put_string(&mut self, name: &str, value: impl Into<String>) {
        self.set_attribute(name, Dynamic::String(value.into()));
    }

    fn put_opt_string(&mut self, name: &str, value: Option<&str>) {
        let value = value.map_or(Dynamic::Null, |v| Dynamic::String(v.to_string()));
        self.set_attribute(name, value);
    }

    fn put_int(&mut self, name: &str, value: i64) {
        self.set_attribute(name, Dynamic::Number(value as f64));
    }

    fn put_string_list(&mut self, name: &str, values: &[String]) {
        self.set_attribute(
            name,
            Dynamic::List(values.iter().cloned().map(Dynamic::String).collect()),
        );
    }

    fn put_json(&mut self, name: &str, value: Option<&Value>) {
        let value = match value {
            Some(Value::Null) | None => Dynamic::Null,
            Some(v) => Dynamic::String(json::to_state_string(v)),
        };
        self.set_attribute(name, value);
    }
}

/// The planned value of `name` when it differs from the prior state. Only
/// for attributes a plan never nulls: required ones or computed ones.
pub fn changed_string(prior: &DynamicValue, plan: &DynamicValue, name: &str) -> Option<String> {
    let planned = plan.string(name)?;
    (prior.string(name).as_deref() != Some(planned.as_str())).then_some(planned)
}

pub fn changed_string_list(
    prior: &DynamicValue,
    plan: &DynamicValue,
    name: &str,
) -> Option<Vec<String>> {
    let planned = plan.string_list(name)?;
    (prior.string_list(name).as_ref() != Some(&planned)).then_some(planned)
}

/// The planned JSON value of `name` when it differs semantically from the
/// prior state
pub fn changed_json(prior: &DynamicValue, plan: &DynamicValue, name: &str) -> Result<Option<Value>> {
    let Some(planned) = plan.json(name)? else {
        return Ok(None);
    };
    let before = prior.string(name).and_then(|raw| json::canonicalize(&raw).ok());
    Ok((before.as_ref() != Some(&planned)).then_some(planned))
}

/// Like [`changed_string`], for optional attributes that may be removed from
/// configuration. A planned null over a prior value clears the field; an
/// unknown leaves it to the server.
pub fn patch_string(prior: &DynamicValue, plan: &DynamicValue, name: &str) -> Patch<String> {
    match plan.attribute(name) {
        Some(Dynamic::String(planned)) => {
            (prior.string(name).as_deref() != Some(planned.as_str())).then(|| Some(planned.clone()))
        }
        Some(Dynamic::Null) => prior.string(name).map(|_| None),
        _ => None,
    }
}

/// [`patch_string`] for JSON blobs, compared by value
pub fn patch_json(prior: &DynamicValue, plan: &DynamicValue, name: &str) -> Result<Patch<Value>> {
    match plan.attribute(name) {
        Some(Dynamic::Null) => Ok(prior.string(name).map(|_| None)),
        _ => Ok(changed_json(prior, plan, name)?.map(Some)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_and_null_read_as_absent() {
        let mut state = DynamicValue::from(json!({"handle": null}));
        state.set_attribute("plugin", Dynamic::Unknown);

        assert_eq!(state.string("handle"), None);
        assert_eq!(state.string("plugin"), None);
        assert!(matches!(
            state.required_string("handle"),
            Err(PipesError::MissingAttribute(name)) if name == "handle"
        ));
    }

    #[test]
    fn json_blobs_are_parsed_and_canonicalized() {
        let mut state = DynamicValue::from(json!({"config": "{\"b\":1,\"a\":[true]}"}));
        let value = state.required_json("config").unwrap();
        state.put_json("config", Some(&value));

        assert_eq!(
            state.string("config").unwrap(),
            "{\n  \"a\": [\n    true\n  ],\n  \"b\": 1\n}"
        );

        state.put_string("config", "{oops");
        assert!(matches!(
            state.json("config"),
            Err(PipesError::InvalidJson { attribute, .. }) if attribute == "config"
        ));
    }

    #[test]
    fn changed_helpers_only_report_differences() {
        let prior = DynamicValue::from(json!({
            "title": "nightly",
            "args": "{\n  \"a\": 1\n}",
            "connections": ["aws_*"]
        }));
        let plan = DynamicValue::from(json!({
            "title": "hourly",
            "args": "{\"a\":1}",
            "connections": ["aws_*"]
        }));

        assert_eq!(changed_string(&prior, &plan, "title").as_deref(), Some("hourly"));
        assert_eq!(changed_json(&prior, &plan, "args").unwrap(), None);
        assert_eq!(changed_string_list(&prior, &plan, "connections"), None);
    }

    #[test]
    fn removed_optional_attributes_are_cleared() {
        let prior = DynamicValue::from(json!({
            "display_name": "Acme",
            "url": null,
            "config": "{\n  \"regions\": [\n    \"*\"\n  ]\n}"
        }));
        let mut plan = DynamicValue::from(json!({
            "display_name": null,
            "url": null,
            "config": null
        }));

        assert_eq!(patch_string(&prior, &plan, "display_name"), Some(None));
        assert_eq!(patch_string(&prior, &plan, "url"), None);
        assert_eq!(patch_json(&prior, &plan, "config").unwrap(), Some(None));

        plan.put_string("display_name", "Acme Corp");
        plan.set_attribute("url", Dynamic::Unknown);
        plan.put_string("config", "{\"regions\":[\"*\"]}");
        assert_eq!(
            patch_string(&prior, &plan, "display_name"),
            Some(Some("Acme Corp".to_string()))
        );
        assert_eq!(patch_string(&prior, &plan, "url"), None);
        assert_eq!(patch_json(&prior, &plan, "config").unwrap(), None);
    }
}
