// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::reference::DataReference;
use crate::Rc;

use serde::{Deserialize, Serialize};

/// One enclosing repeating-group row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowFrame {
    /// Unindexed data model path of the group, e.g. `Outer.Inner`.
    pub binding: Rc<str>,
    pub index: usize,
}

/// The chain of repeating-group rows enclosing a node, outermost first.
///
/// Computed once per node by the layout collaborator and never mutated;
/// [`RowChain::push`] returns a new chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowChain(Rc<[RowFrame]>);

impl Default for RowChain {
    fn default() -> Self {
        RowChain(Vec::new().into())
    }
}

impl RowChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, binding: &str, index: usize) -> RowChain {
        let mut frames = self.0.to_vec();
        frames.push(RowFrame {
            binding: binding.into(),
            index,
        });
        RowChain(frames.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn frames(&self) -> &[RowFrame] {
        &self.0
    }

    pub fn innermost_first(&self) -> impl Iterator<Item = &RowFrame> {
        self.0.iter().rev()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.0.iter().map(|f| f.index).collect()
    }

    /// The fully indexed data model location of the innermost row, e.g.
    /// `Outer[1].Inner[3]`. `None` outside repeating groups.
    ///
    /// Frames whose binding cannot be parsed are skipped.
    pub fn location(&self) -> Option<DataReference> {
        let mut location: Option<DataReference> = None;
        for frame in self.0.iter() {
            let Ok(mut binding) = DataReference::parse(&frame.binding) else {
                continue;
            };
            if let Some(outer) = &location {
                binding = binding.transpose(outer);
            }
            binding.set_last_index(frame.index);
            location = Some(binding);
        }
        location
    }
}

/// The component instance (or page) an expression is evaluated for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeContext {
    pub component: Option<Rc<str>>,
    pub page: Option<Rc<str>>,
    pub rows: RowChain,
}

impl NodeContext {
    /// An expression attached to a page rather than to a component.
    pub fn page(page: &str) -> Self {
        Self {
            page: Some(page.into()),
            ..Self::default()
        }
    }

    pub fn component(id: &str) -> Self {
        Self {
            component: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn on_page(mut self, page: &str) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Place the node inside row `index` of the group bound to `binding`.
    /// Call once per enclosing group, outermost first.
    pub fn in_row(mut self, binding: &str, index: usize) -> Self {
        self.rows = self.rows.push(binding, index);
        self
    }

    /// Render-tree id of `base_id` as it appears next to this node: the base
    /// id followed by the row indices it shares with this node, e.g.
    /// `name-1-0`.
    ///
    /// `binding` is the target's own data binding; only the rows enclosing that
    /// binding are shared. Targets without a binding share every row.
    pub fn instance_id_for(&self, base_id: &str, binding: Option<&str>) -> String {
        let target = binding.and_then(|b| DataReference::parse(b).ok());
        let mut id = base_id.to_string();
        for frame in self.rows.frames() {
            let shared = match (&target, DataReference::parse(&frame.binding)) {
                (Some(target), Ok(group)) => group.is_name_prefix_of(target),
                (None, _) => true,
                (Some(_), Err(_)) => false,
            };
            if shared {
                id.push('-');
                id.push_str(&frame.index.to_string());
            }
        }
        id
    }

    /// Render-tree id of this node itself.
    pub fn instance_id(&self) -> Option<String> {
        self.component
            .as_deref()
            .map(|id| self.instance_id_for(id, None))
    }
}
