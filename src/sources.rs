// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::value::Value;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Everything an expression may read, supplied fresh for each render pass.
///
/// The interpreter only ever borrows this bundle; it is never mutated during
/// evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextDataSources {
    pub form_data: FormData,
    /// Uploaded files keyed by the render-tree id of the upload component.
    pub attachments: BTreeMap<String, Vec<Attachment>>,
    pub layout: LayoutSettings,
    /// Component ids (base ids, or render-tree ids such as `name-1`) that are
    /// currently hidden.
    pub hidden: BTreeSet<String>,
    pub options: BTreeMap<String, Vec<OptionItem>>,
    pub application_settings: BTreeMap<String, Value>,
    /// Data returned by external APIs, keyed by API id.
    pub external_apis: BTreeMap<String, Value>,
    pub instance: Option<InstanceDataSources>,
    pub process: Option<ProcessContext>,
    pub roles: Vec<String>,
    pub dev_tools: DevToolsState,
    pub language: LanguageSources,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    /// Data type read by `dataModel` when no data type is given.
    pub default_data_type: Option<String>,
    pub models: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attachment {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    /// Visible pages in navigation order. Empty means every page is shown.
    pub order: Vec<String>,
    pub hidden_pages: BTreeSet<String>,
    pub components: BTreeMap<String, ComponentInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    #[default]
    Input,
    TextArea,
    Dropdown,
    RadioButtons,
    Checkboxes,
    FileUpload,
    RepeatingGroup,
    Paragraph,
}

/// What expressions need to know about a component definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentInfo {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub page: String,
    pub simple_binding: Option<String>,
    pub data_type: Option<String>,
    pub options_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionItem {
    pub value: Value,
    /// Text resource key or literal label.
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceDataSources {
    pub instance_id: Option<String>,
    pub app_id: Option<String>,
    pub instance_owner_party_id: Option<String>,
    pub instance_owner_party_type: Option<String>,
    pub data_elements: Vec<DataElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataElement {
    pub id: String,
    pub data_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessContext {
    pub current_task: Option<ProcessTask>,
    /// Action performed to reach the current gateway, e.g. `sign` or `reject`.
    pub gateway_action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessTask {
    pub element_id: String,
    /// Actions the current user may perform, e.g. `{"write": true}`.
    pub actions: BTreeMap<String, bool>,
    pub read: bool,
    pub write: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevToolsState {
    /// Developer tooling asked for hidden components to be shown.
    pub show_hidden_components: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageSources {
    pub current_language: String,
    /// Text resources of the current language.
    pub texts: BTreeMap<String, String>,
}

impl Default for LanguageSources {
    fn default() -> Self {
        Self {
            current_language: "nb".to_string(),
            texts: BTreeMap::new(),
        }
    }
}

impl ContextDataSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources with a single data model used as the default.
    pub fn with_form_data(data: Value) -> Self {
        let mut sources = Self::default();
        sources.set_data_model("default", data);
        sources.form_data.default_data_type = Some("default".to_string());
        sources
    }

    pub fn set_data_model(&mut self, data_type: &str, data: Value) {
        self.form_data.models.insert(data_type.to_string(), data);
        if self.form_data.default_data_type.is_none() {
            self.form_data.default_data_type = Some(data_type.to_string());
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_json_str(c.as_str()),
            Err(e) => bail!("Failed to read {}. {e}", path.display()),
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Whether a component is hidden, checked by base id, render-tree id and
    /// the page it lives on.
    pub fn is_hidden(&self, base_id: &str, instance_id: &str, page: &str) -> bool {
        if self.dev_tools.show_hidden_components {
            return false;
        }
        self.hidden.contains(base_id)
            || self.hidden.contains(instance_id)
            || self.is_page_hidden(page)
    }

    /// A page is hidden when listed in `hiddenPages` or left out of a
    /// non-empty page order.
    pub fn is_page_hidden(&self, page: &str) -> bool {
        let layout = &self.layout;
        layout.hidden_pages.contains(page)
            || (!layout.order.is_empty() && !layout.order.iter().any(|p| p == page))
    }

    pub fn component(&self, id: &str) -> Option<&ComponentInfo> {
        self.layout.components.get(id)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.language.texts.get(key).map(String::as_str)
    }
}
