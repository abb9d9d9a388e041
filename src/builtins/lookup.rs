// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Operators that read form data and component state.

use crate::builtins::utils::{ensure_string, opt_string};
use crate::builtins::Func;
use crate::error::{ExprError, Result};
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::reference::pick_simple_value;
use crate::sources::{ComponentInfo, ComponentKind};
use crate::value::Value;

use std::collections::HashMap;

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("dataModel", Func::DataModel);
    m.insert("component", Func::Component);
    m.insert("displayValue", Func::DisplayValue);
    m.insert("argv", Func::Argv);
    m.insert("value", Func::Value);
    m.insert("externalApi", Func::ExternalApi);
}

/// Read a scalar from form data, relative to the rows enclosing the node.
pub fn data_model(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let reference = ensure_string(call, args, 0, "dataModel")?;
    let data = interp.data_model(opt_string(args, 1), &call.path)?;
    pick_simple_value(interp.node(), reference, data, &call.path)
}

pub(crate) fn find_component<'a>(
    interp: &Interpreter<'a>,
    call: &Call,
    id: &str,
) -> Result<&'a ComponentInfo> {
    interp
        .sources()
        .component(id)
        .ok_or_else(|| ExprError::ComponentNotFound {
            path: call.path.to_string(),
            id: id.to_string(),
        })
}

fn is_hidden(interp: &Interpreter, id: &str, info: &ComponentInfo) -> bool {
    let instance_id = interp
        .node()
        .instance_id_for(id, info.simple_binding.as_deref());
    interp.sources().is_hidden(id, &instance_id, &info.page)
}

fn bound_value(interp: &Interpreter, call: &Call, info: &ComponentInfo) -> Result<Value> {
    match &info.simple_binding {
        Some(binding) => {
            let data = interp.data_model(info.data_type.as_deref(), &call.path)?;
            pick_simple_value(interp.node(), binding, data, &call.path)
        }
        None => Ok(Value::Null),
    }
}

/// The value bound to a sibling component, or `null` when it is hidden.
pub fn component(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let id = ensure_string(call, args, 0, "component")?;
    let info = find_component(interp, call, id)?;
    if info.simple_binding.is_none() {
        return Err(ExprError::runtime(
            &call.path,
            format!("component `{id}` does not have a simpleBinding"),
        ));
    }
    if is_hidden(interp, id, info) {
        return Ok(Value::Null);
    }
    bound_value(interp, call, info)
}

/// The text a component shows for its current value, or `null` when it is
/// hidden.
pub fn display_value(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let id = ensure_string(call, args, 0, "component")?;
    let info = find_component(interp, call, id)?;
    if matches!(
        info.kind,
        ComponentKind::Paragraph | ComponentKind::RepeatingGroup
    ) {
        return Err(ExprError::runtime(
            &call.path,
            format!("component `{id}` does not have a displayValue"),
        ));
    }
    if is_hidden(interp, id, info) {
        return Ok(Value::Null);
    }

    let sources = interp.sources();
    let text = match info.kind {
        ComponentKind::FileUpload => {
            let instance_id = interp
                .node()
                .instance_id_for(id, info.simple_binding.as_deref());
            let names: Vec<&str> = sources
                .attachments
                .get(&instance_id)
                .map(|files| files.iter().map(|f| f.name.as_str()).collect())
                .unwrap_or_default();
            names.join(", ")
        }
        ComponentKind::Dropdown | ComponentKind::RadioButtons | ComponentKind::Checkboxes => {
            let raw = bound_value(interp, call, info)?.to_text().unwrap_or_default();
            let selected: Vec<&str> = if info.kind == ComponentKind::Checkboxes {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            } else if raw.is_empty() {
                vec![]
            } else {
                vec![raw.as_str()]
            };
            let options = info
                .options_id
                .as_deref()
                .and_then(|o| sources.options.get(o));

            let labels: Vec<&str> = selected
                .into_iter()
                .map(|v| {
                    let option = options.and_then(|list| {
                        list.iter()
                            .find(|o| o.value.to_text().as_deref() == Some(v))
                    });
                    match option {
                        Some(o) => sources.text(&o.label).unwrap_or(o.label.as_str()),
                        None => v,
                    }
                })
                .collect();
            labels.join(", ")
        }
        _ => bound_value(interp, call, info)?.to_text().unwrap_or_default(),
    };
    Ok(Value::from(text))
}

/// Positional argument supplied by the caller.
pub fn argv(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let index = match &args[0] {
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    let positional = &interp.options().positional_args;
    match index.and_then(|i| positional.get(i as usize)) {
        Some(v) => Ok(v.clone()),
        None => Err(ExprError::runtime(
            &call.path,
            format!(
                "`argv` index {} is out of range, {} positional arguments were given",
                args[0],
                positional.len()
            ),
        )),
    }
}

/// Named argument supplied by the caller. Without a key, the configured
/// default key is used.
pub fn value(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let Some(value_args) = &interp.options().value_args else {
        return Err(ExprError::runtime(
            &call.path,
            "`value` used where no value arguments are available",
        ));
    };
    let key = match opt_string(args, 0).or(value_args.default_key.as_deref()) {
        Some(k) => k,
        None => {
            return Err(ExprError::runtime(
                &call.path,
                "`value` needs a key when no default key is configured",
            ))
        }
    };
    match value_args.data.get(key) {
        Some(v) => Ok(v.clone()),
        None => Err(ExprError::runtime(
            &call.path,
            format!("unknown value argument `{key}`"),
        )),
    }
}

// Keys separated by dots, with `[n]` or a numeric key indexing arrays.
fn pick<'a>(path: &str, data: &'a Value) -> &'a Value {
    path.split(['.', '[', ']'])
        .filter(|key| !key.is_empty())
        .fold(data, |current, key| match current {
            Value::Array(_) => match key.parse::<usize>() {
                Ok(idx) => &current[idx],
                Err(_) => &Value::Undefined,
            },
            _ => &current[key],
        })
}

/// A scalar from the data an external API returned, as text. Empty values
/// (`false`, `0`, `""`) as well as objects and arrays read as `null`.
pub fn external_api(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let Some(api) = opt_string(args, 0) else {
        return Err(ExprError::runtime(&call.path, "expected an external API id"));
    };
    let Some(path) = opt_string(args, 1).filter(|p| !p.is_empty()) else {
        return Ok(Value::Null);
    };

    let data = interp
        .sources()
        .external_apis
        .get(api)
        .unwrap_or(&Value::Undefined);
    let picked = match data {
        Value::Object(_) | Value::Array(_) => pick(path, data),
        _ => data,
    };

    Ok(match picked {
        Value::Bool(false) | Value::Object(_) | Value::Array(_) => Value::Null,
        Value::Number(n) if n.as_f64() == 0.0 => Value::Null,
        Value::String(s) if s.is_empty() => Value::Null,
        v => Value::from(v.to_text()),
    })
}
