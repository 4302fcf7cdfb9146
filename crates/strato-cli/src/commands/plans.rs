use super::SERVICE_ROOT;
use serde_json::Value;
use strato_engine::CommandContext;
use strato_engine::client::command_error;
use strato_types::{Error, Result};

/// List endpoints wrap their results in a `value` envelope; unwrap it,
/// tolerating a bare array.
pub(crate) fn items(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(records) => records.clone(),
        Value::Object(map) => map
            .get("value")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub(crate) fn encode_query(value: &str) -> String {
    value.replace(' ', "%20")
}

pub(crate) async fn get_plans_by_group_id(
    ctx: &CommandContext<'_>,
    group_id: &str,
) -> Result<Vec<Value>> {
    let url = format!("{}/v1/groups/{}/plans", SERVICE_ROOT, group_id);
    let body = ctx.client().get(&url).await.map_err(command_error)?;
    Ok(items(&body))
}

/// Resolve an owner group's id from its display name. Ambiguous and
/// unknown names are command errors, not empty results.
pub(crate) async fn resolve_group_id(ctx: &CommandContext<'_>, name: &str) -> Result<String> {
    let url = format!(
        "{}/v1/groups?displayName={}",
        SERVICE_ROOT,
        encode_query(name)
    );
    let body = ctx.client().get(&url).await.map_err(command_error)?;
    let groups = items(&body);

    let ids: Vec<String> = groups
        .iter()
        .filter(|group| {
            group["displayName"]
                .as_str()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
        })
        .filter_map(|group| group["id"].as_str().map(str::to_string))
        .collect();

    match ids.len() {
        0 => Err(Error::Command(format!(
            "The specified group '{}' does not exist.",
            name
        ))),
        1 => Ok(ids.into_iter().next().unwrap_or_default()),
        _ => Err(Error::Command(format!(
            "Multiple groups with name '{}' found: {}.",
            name,
            ids.join(", ")
        ))),
    }
}

/// Resolve a plan's id from its title, case-insensitively.
pub(crate) async fn resolve_plan_id(ctx: &CommandContext<'_>, title: &str) -> Result<String> {
    let url = format!("{}/v1/plans?title={}", SERVICE_ROOT, encode_query(title));
    let body = ctx.client().get(&url).await.map_err(command_error)?;
    let plans = items(&body);

    let ids: Vec<String> = plans
        .iter()
        .filter(|plan| {
            plan["title"]
                .as_str()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(title))
        })
        .filter_map(|plan| plan["id"].as_str().map(str::to_string))
        .collect();

    match ids.len() {
        0 => Err(Error::Command(format!(
            "The specified plan '{}' does not exist.",
            title
        ))),
        1 => Ok(ids.into_iter().next().unwrap_or_default()),
        _ => Err(Error::Command(format!(
            "Multiple plans with title '{}' found: {}.",
            title,
            ids.join(", ")
        ))),
    }
}
