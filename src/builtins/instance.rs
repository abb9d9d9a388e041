// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Operators that read instance, process, application and language state.

use crate::builtins::lookup::find_component;
use crate::builtins::utils::{ensure_string, opt_string};
use crate::builtins::Func;
use crate::error::{ExprError, Result};
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

use log::warn;
use url::form_urlencoded;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("instanceContext", Func::InstanceContext);
    m.insert("frontendSettings", Func::FrontendSettings);
    m.insert("text", Func::Text);
    m.insert("language", Func::Language);
    m.insert("gatewayAction", Func::GatewayAction);
    m.insert("countDataElements", Func::CountDataElements);
    m.insert("authContext", Func::AuthContext);
    m.insert("hasRole", Func::HasRole);
    m.insert("linkToPage", Func::LinkToPage);
    m.insert("linkToComponent", Func::LinkToComponent);
}

const AUTH_CONTEXT_KEYS: &[&str] = &["read", "write", "instantiate", "confirm", "sign", "reject"];

fn opt_value(s: Option<&String>) -> Value {
    match s {
        Some(s) => Value::from(s.as_str()),
        None => Value::Null,
    }
}

/// Unknown keys read as `null`.
pub fn instance_context(interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    let Some(instance) = &interp.sources().instance else {
        return Ok(Value::Null);
    };
    Ok(match opt_string(args, 0) {
        Some("instanceId") => opt_value(instance.instance_id.as_ref()),
        Some("appId") => opt_value(instance.app_id.as_ref()),
        Some("instanceOwnerPartyId") => opt_value(instance.instance_owner_party_id.as_ref()),
        Some("instanceOwnerPartyType") => opt_value(instance.instance_owner_party_type.as_ref()),
        _ => Value::Null,
    })
}

pub fn frontend_settings(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let key = ensure_string(call, args, 0, "setting")?;
    Ok(interp
        .sources()
        .application_settings
        .get(key)
        .cloned()
        .unwrap_or(Value::Null))
}

/// Text resource of the current language. Unknown keys read as `null`.
pub fn text(interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(match opt_string(args, 0).and_then(|k| interp.sources().text(k)) {
        Some(t) => Value::from(t),
        None => Value::Null,
    })
}

pub fn language(interp: &Interpreter, _call: &Call, _args: &[Value]) -> Result<Value> {
    Ok(Value::from(
        interp.sources().language.current_language.as_str(),
    ))
}

pub fn gateway_action(interp: &Interpreter, _call: &Call, _args: &[Value]) -> Result<Value> {
    Ok(opt_value(
        interp
            .sources()
            .process
            .as_ref()
            .and_then(|p| p.gateway_action.as_ref()),
    ))
}

/// Number of data elements of the given type on the instance.
pub fn count_data_elements(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let data_type = ensure_string(call, args, 0, "data type")?;
    let count = match &interp.sources().instance {
        Some(instance) => instance
            .data_elements
            .iter()
            .filter(|e| e.data_type == data_type)
            .count(),
        None => 0,
    };
    Ok(Value::from(count))
}

/// Whether the current user may perform `key` in the current task.
pub fn auth_context(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let key = match opt_string(args, 0) {
        Some(k) if AUTH_CONTEXT_KEYS.contains(&k) => k,
        _ => {
            return Err(ExprError::runtime(
                &call.path,
                format!("unknown auth context property {}", args[0]),
            ))
        }
    };
    let task = interp
        .sources()
        .process
        .as_ref()
        .and_then(|p| p.current_task.as_ref());
    let allowed = match task {
        Some(task) => {
            let action = task.actions.get(key).copied().unwrap_or(false);
            match key {
                "read" => task.read || action,
                "write" => task.write || action,
                _ => action,
            }
        }
        None => false,
    };
    Ok(Value::Bool(allowed))
}

pub fn has_role(interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(match opt_string(args, 0) {
        Some(role) => interp.sources().roles.iter().any(|r| r == role),
        None => false,
    }))
}

/// URL of `page`, inside the current instance and task when both are known.
fn page_url(interp: &Interpreter, page: &str) -> String {
    let sources = interp.sources();
    let task_id = sources
        .process
        .as_ref()
        .and_then(|p| p.current_task.as_ref())
        .map(|t| t.element_id.as_str())
        .filter(|t| !t.is_empty());
    let instance_id = sources
        .instance
        .as_ref()
        .and_then(|i| i.instance_id.as_deref());
    match (instance_id, task_id) {
        (Some(instance_id), Some(task_id)) => format!("/instance/{instance_id}/{task_id}/{page}"),
        _ => format!("/{page}"),
    }
}

pub fn link_to_page(interp: &Interpreter, _call: &Call, args: &[Value]) -> Result<Value> {
    let Some(page) = opt_string(args, 1) else {
        warn!("Page id was empty but must be set for linkToPage to work");
        return Ok(Value::Null);
    };
    let Some(text) = opt_string(args, 0) else {
        warn!("Link text was empty but must be set for linkToPage to work");
        return Ok(Value::Null);
    };
    let url = page_url(interp, page);
    Ok(Value::from(format!(
        "<a href=\"{url}\" data-link-type=\"LinkToPotentialPage\">{text}</a>"
    )))
}

pub fn link_to_component(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let Some(id) = opt_string(args, 1) else {
        warn!("Component id was empty but must be set for linkToComponent to work");
        return Ok(Value::Null);
    };
    let Some(text) = opt_string(args, 0) else {
        warn!("Link text was empty but must be set for linkToComponent to work");
        return Ok(Value::Null);
    };
    let info = find_component(interp, call, id)?;
    let focus = interp
        .node()
        .instance_id_for(id, info.simple_binding.as_deref());
    let url = page_url(interp, &info.page);
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("focusComponentId", &focus)
        .finish();
    Ok(Value::from(format!(
        "<a href=\"{url}?{query}\" data-link-type=\"LinkToPotentialNode\">{text}</a>"
    )))
}
