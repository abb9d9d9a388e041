// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Data model references and row-relative resolution.
//!
//! A reference is a dot separated path where any segment may carry a row
//! index: `Group[2].Field`. References written inside repeating groups are
//! usually unindexed (`Group.Field`); [`resolve_reference`] fills in the row
//! indices of the requesting node so the same expression works for every row.

use crate::error::{ExprError, Result};
use crate::node::NodeContext;
use crate::value::Value;
use crate::Rc;

use core::fmt;

use anyhow::bail;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: Rc<str>,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataReference {
    segments: Vec<Segment>,
}

impl DataReference {
    pub fn parse(path: &str) -> anyhow::Result<DataReference> {
        let path = path.trim();
        if path.is_empty() {
            bail!("empty data model reference");
        }

        let mut segments = vec![];
        for part in path.split('.') {
            let (name, index) = match part.find('[') {
                None => (part, None),
                Some(open) => {
                    let digits = match part[open + 1..].strip_suffix(']') {
                        Some(d) => d,
                        None => bail!("unterminated index in `{part}`"),
                    };
                    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                        bail!("invalid index in `{part}`");
                    }
                    (&part[..open], Some(digits.parse::<usize>()?))
                }
            };
            if name.is_empty() || name.contains([']', '[']) || name.contains(char::is_whitespace)
            {
                bail!("invalid segment `{part}`");
            }
            segments.push(Segment {
                name: name.into(),
                index,
            });
        }

        Ok(DataReference { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn set_last_index(&mut self, index: usize) {
        if let Some(last) = self.segments.last_mut() {
            last.index = Some(index);
        }
    }

    /// Whether the segment names of `self` are a leading run of `other`'s.
    pub fn is_name_prefix_of(&self, other: &DataReference) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a.name == b.name)
    }

    /// Fill unindexed segments from `location`, the indexed path of the row
    /// the requesting node lives in.
    ///
    /// Segments are matched from the root while their names agree. An index
    /// written in the reference wins for that segment only; matching
    /// continues past it. The last segment is never indexed implicitly, so
    /// a reference to the group itself still addresses the whole group.
    pub fn transpose(&self, location: &DataReference) -> DataReference {
        let mut out = self.clone();
        let last = out.segments.len().saturating_sub(1);
        for (i, ours) in location.segments.iter().enumerate() {
            let Some(theirs) = out.segments.get_mut(i) else {
                break;
            };
            if theirs.name != ours.name {
                break;
            }
            if theirs.index.is_none() && i < last {
                theirs.index = ours.index;
            }
        }
        out
    }

    /// Walk `data` along the reference.
    ///
    /// Missing object keys yield `Undefined`. An index into something that is
    /// not an array long enough yields `Err` with the position of the
    /// offending segment.
    pub fn walk<'a>(&self, data: &'a Value) -> core::result::Result<&'a Value, usize> {
        let mut current = data;
        for (i, seg) in self.segments.iter().enumerate() {
            current = &current[seg.name.as_ref()];
            if let Some(idx) = seg.index {
                match current {
                    Value::Array(rows) if idx < rows.len() => current = &rows[idx],
                    _ => return Err(i),
                }
            }
        }
        Ok(current)
    }

    fn prefix(&self, len: usize) -> DataReference {
        DataReference {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }
}

impl fmt::Display for DataReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&seg.name)?;
            if let Some(idx) = seg.index {
                write!(f, "[{idx}]")?;
            }
        }
        Ok(())
    }
}

/// Resolve `reference` for `node` against `data` into a concrete path.
///
/// Fails with `InvalidReference` if the text is not a reference and with
/// `NodeNotFoundWithoutContext` if the resolved path points at a row that
/// does not exist in `data`.
pub fn resolve_reference(
    node: &NodeContext,
    reference: &str,
    data: &Value,
    path: &str,
) -> Result<DataReference> {
    let subject = DataReference::parse(reference).map_err(|_| ExprError::InvalidReference {
        path: path.to_string(),
        reference: reference.to_string(),
    })?;

    let resolved = match node.rows.location() {
        Some(location) => subject.transpose(&location),
        None => subject,
    };

    match resolved.walk(data) {
        Ok(_) => Ok(resolved),
        Err(failed) => Err(ExprError::NodeNotFoundWithoutContext {
            path: path.to_string(),
            reference: resolved.prefix(failed + 1).to_string(),
        }),
    }
}

/// Resolve `reference` and read the scalar stored there. Objects, arrays
/// and missing values read as `null`.
pub fn pick_simple_value(
    node: &NodeContext,
    reference: &str,
    data: &Value,
    path: &str,
) -> Result<Value> {
    let resolved = resolve_reference(node, reference, data, path)?;
    Ok(match resolved.walk(data) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v.clone(),
        _ => Value::Null,
    })
}
