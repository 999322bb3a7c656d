//! Forward identifier tables and their inverse views.
//!
//! A table is built once per version pair by joining the old and new
//! identifier lists on their identifier strings, with an optional diff
//! overlay applied on top. After construction it is immutable and shared.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{MappingError, Result};

/// Raw cell for an id with no counterpart. Eligible for miss diagnostics.
pub(crate) const RAW_NONE: i32 = -1;
/// Raw cell for an id a diff overlay removed. Expected, never diagnosed.
pub(crate) const RAW_REMOVED: i32 = -2;

/// Forward lookup table from old-version ids to new-version ids.
///
/// The cell vector's index space is exactly the old version's id space;
/// lookups outside it simply return `None`. Ids without a counterpart keep
/// a sentinel cell so misses can be told apart from deliberate removals.
#[derive(Debug)]
pub struct IdMappings {
    cells: Vec<i32>,
    mapped: usize,
}

impl IdMappings {
    /// Join two ordered identifier arrays.
    ///
    /// Each old id maps to the new id holding the same identifier string.
    /// Diff entries override the join per id; see [`Self::from_objects`]
    /// for the accepted key and value forms.
    pub fn from_arrays(
        old: &[Value],
        new: &[Value],
        diff: Option<&Map<String, Value>>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(new.len());
        for (id, identifier) in new.iter().enumerate() {
            // Keep the first occurrence when an identifier repeats.
            index.entry(identifier_key(identifier)?).or_insert(id as i32);
        }

        let mut cells = Vec::with_capacity(old.len());
        for (id, identifier) in old.iter().enumerate() {
            let key = identifier_key(identifier)?;
            cells.push(resolve_cell(id, &key, &index, diff)?);
        }
        Ok(Self::from_cells(cells))
    }

    /// Join two id-keyed identifier objects.
    ///
    /// Object tables are sparse: keys are decimal ids, values identifiers.
    /// Ids absent from the old object fall outside the mapped set.
    ///
    /// Diff keys name either the old identifier string or the decimal old
    /// id; diff values name a new identifier string, a literal new id, or
    /// `null` to mark the id as removed. An empty string counts as removed.
    pub fn from_objects(
        old: &Map<String, Value>,
        new: &Map<String, Value>,
        diff: Option<&Map<String, Value>>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(new.len());
        for (id, identifier) in new {
            index.entry(identifier_key(identifier)?).or_insert(parse_id(id)?);
        }

        let mut cells = vec![RAW_NONE; object_domain(old)?];
        for (id, identifier) in old {
            let id = parse_id(id)? as usize;
            let key = identifier_key(identifier)?;
            cells[id] = resolve_cell(id, &key, &index, diff)?;
        }
        Ok(Self::from_cells(cells))
    }

    fn from_cells(cells: Vec<i32>) -> Self {
        let mapped = cells.iter().filter(|&&cell| cell >= 0).count();
        Self { cells, mapped }
    }

    /// Forward lookup: the new-version id for an old-version id.
    pub fn get_new_id(&self, id: i32) -> Option<i32> {
        if id < 0 {
            return None;
        }
        match self.cells.get(id as usize) {
            Some(&cell) if cell >= 0 => Some(cell),
            _ => None,
        }
    }

    /// Inverse projection: the old-version id whose cell holds `target`.
    ///
    /// A linear scan. Tables are at most a few thousand entries and reverse
    /// lookups sit on paths that tolerate it, so no second structure is
    /// kept.
    pub fn find_source_id(&self, target: i32) -> Option<i32> {
        if target < 0 {
            return None;
        }
        self.cells
            .iter()
            .position(|&cell| cell == target)
            .map(|id| id as i32)
    }

    /// Raw cell value, sentinels included. Used to classify misses.
    pub(crate) fn raw(&self, id: i32) -> i32 {
        if id < 0 {
            return RAW_NONE;
        }
        self.cells.get(id as usize).copied().unwrap_or(RAW_NONE)
    }

    /// Size of the old version's id space.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// How many old ids have a counterpart.
    pub fn mapped_count(&self) -> usize {
        self.mapped
    }
}

/// Read-only reverse projection over a forward table.
///
/// Holds a handle to the forward table rather than owning a second one;
/// both views always agree because there is only one set of cells.
#[derive(Debug, Clone)]
pub struct InverseView {
    forward: Arc<IdMappings>,
}

impl InverseView {
    pub fn new(forward: Arc<IdMappings>) -> Self {
        Self { forward }
    }

    /// The source id mapping onto `target`, if any.
    pub fn get(&self, target: i32) -> Option<i32> {
        self.forward.find_source_id(target)
    }

    /// The forward table this view projects.
    pub fn forward(&self) -> &Arc<IdMappings> {
        &self.forward
    }
}

/// The identifier string a table element joins on.
///
/// Plain strings join as-is. Compound identifiers join on their `name`
/// field when present and on their canonical JSON text otherwise, so two
/// structurally equal compounds always match.
fn identifier_key(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(fields) => match fields.get("name") {
            Some(Value::String(name)) => Ok(name.clone()),
            _ => Ok(value.to_string()),
        },
        Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
        Value::Null | Value::Array(_) => Err(MappingError::Malformed(format!(
            "unusable identifier element: {value}"
        ))),
    }
}

fn parse_id(key: &str) -> Result<i32> {
    key.parse::<u16>()
        .map(i32::from)
        .map_err(|_| MappingError::Malformed(format!("id key is not a valid id: {key:?}")))
}

fn object_domain(old: &Map<String, Value>) -> Result<usize> {
    let mut max = 0usize;
    for key in old.keys() {
        max = max.max(parse_id(key)? as usize + 1);
    }
    Ok(max)
}

fn resolve_cell(
    old_id: usize,
    key: &str,
    index: &HashMap<String, i32>,
    diff: Option<&Map<String, Value>>,
) -> Result<i32> {
    if let Some(diff) = diff {
        let entry = diff.get(key).or_else(|| diff.get(&old_id.to_string()));
        if let Some(value) = entry {
            return resolve_override(key, value, index);
        }
    }
    Ok(index.get(key).copied().unwrap_or(RAW_NONE))
}

fn resolve_override(key: &str, value: &Value, index: &HashMap<String, i32>) -> Result<i32> {
    match value {
        Value::Null => Ok(RAW_REMOVED),
        Value::String(target) if target.is_empty() => Ok(RAW_REMOVED),
        Value::String(target) => match index.get(target.as_str()) {
            Some(&id) => Ok(id),
            None => {
                tracing::warn!(
                    "Diff override for '{}' names unknown identifier '{}'",
                    key,
                    target
                );
                Ok(RAW_NONE)
            }
        },
        Value::Number(_) => numeric_id(key, value),
        // Replacement records override the id too; their remaining fields
        // are the store's business, not the join's.
        Value::Object(fields) => match fields.get("id") {
            Some(id) => numeric_id(key, id),
            None => Err(MappingError::Malformed(format!(
                "diff override record for {key:?} lacks an id"
            ))),
        },
        _ => Err(MappingError::Malformed(format!(
            "diff override for {key:?} has an unsupported shape"
        ))),
    }
}

/// A replacement id given as a JSON number or a decimal string.
pub(crate) fn numeric_id(key: &str, value: &Value) -> Result<i32> {
    let id = match value {
        Value::Number(id) => id.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(id) => id.parse::<i32>().ok(),
        _ => None,
    };
    id.ok_or_else(|| MappingError::Malformed(format!("diff override for {key:?} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn array(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| json!(v)).collect()
    }

    #[test]
    fn test_join_by_identifier() {
        let old = array(&["stone", "grass", "dirt"]);
        let new = array(&["grass", "dirt", "gravel", "stone"]);
        let table = IdMappings::from_arrays(&old, &new, None).unwrap();

        assert_eq!(table.get_new_id(0), Some(3));
        assert_eq!(table.get_new_id(1), Some(0));
        assert_eq!(table.get_new_id(2), Some(1));
        assert_eq!(table.mapped_count(), 3);
    }

    #[test]
    fn test_unmatched_identifier_has_no_mapping() {
        let old = array(&["stone", "old_thing"]);
        let new = array(&["stone"]);
        let table = IdMappings::from_arrays(&old, &new, None).unwrap();

        assert_eq!(table.get_new_id(1), None);
        assert_eq!(table.raw(1), RAW_NONE);
    }

    #[test]
    fn test_out_of_domain_lookup() {
        let old = array(&["stone"]);
        let new = array(&["stone"]);
        let table = IdMappings::from_arrays(&old, &new, None).unwrap();

        assert_eq!(table.get_new_id(5), None);
        assert_eq!(table.get_new_id(-1), None);
    }

    #[test]
    fn test_diff_overrides_join() {
        let old = array(&["stone", "grass"]);
        let new = array(&["stone", "grass"]);
        let diff = json!({ "stone": "grass" });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        // The join alone would say 0; the override wins.
        assert_eq!(table.get_new_id(0), Some(1));
        assert_eq!(table.get_new_id(1), Some(1));
    }

    #[test]
    fn test_diff_keyed_by_old_id() {
        let old = array(&["stone", "grass"]);
        let new = array(&["stone", "grass"]);
        let diff = json!({ "1": "stone" });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        assert_eq!(table.get_new_id(1), Some(0));
    }

    #[test]
    fn test_diff_numeric_target() {
        let old = array(&["stone"]);
        let new = array(&["grass", "stone"]);
        let diff = json!({ "stone": 0 });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        assert_eq!(table.get_new_id(0), Some(0));
    }

    #[test]
    fn test_diff_null_marks_removed() {
        let old = array(&["stone", "gone"]);
        let new = array(&["stone", "gone"]);
        let diff = json!({ "gone": null });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        assert_eq!(table.get_new_id(1), None);
        assert_eq!(table.raw(1), RAW_REMOVED);
    }

    #[test]
    fn test_diff_empty_string_marks_removed() {
        let old = array(&["gone"]);
        let new = array(&["other"]);
        let diff = json!({ "gone": "" });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        assert_eq!(table.raw(0), RAW_REMOVED);
    }

    #[test]
    fn test_diff_unknown_target_leaves_unmapped() {
        let old = array(&["stone"]);
        let new = array(&["stone"]);
        let diff = json!({ "stone": "no_such_identifier" });
        let table =
            IdMappings::from_arrays(&old, &new, Some(diff.as_object().unwrap())).unwrap();

        assert_eq!(table.get_new_id(0), None);
        assert_eq!(table.raw(0), RAW_NONE);
    }

    #[test]
    fn test_object_join() {
        let old = json!({ "0": "creeper", "5": "zombie", "7": "pig" });
        let new = json!({ "0": "creeper", "1": "zombie" });
        let table = IdMappings::from_objects(
            old.as_object().unwrap(),
            new.as_object().unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(table.get_new_id(0), Some(0));
        assert_eq!(table.get_new_id(5), Some(1));
        assert_eq!(table.get_new_id(7), None);
        // Holes in the sparse old object are unmapped, not errors.
        assert_eq!(table.get_new_id(3), None);
    }

    #[test]
    fn test_compound_identifiers_join_on_name() {
        let old = json!([{ "name": "piston", "states": 2 }, { "name": "lever", "states": 8 }]);
        let new = json!([{ "name": "lever", "states": 8 }, { "name": "piston", "states": 4 }]);
        let table = IdMappings::from_arrays(
            old.as_array().unwrap(),
            new.as_array().unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(table.get_new_id(0), Some(1));
        assert_eq!(table.get_new_id(1), Some(0));
    }

    #[test]
    fn test_inverse_view_agrees_with_forward() {
        let old = array(&["stone", "grass", "dirt"]);
        let new = array(&["dirt", "stone", "grass"]);
        let table = Arc::new(IdMappings::from_arrays(&old, &new, None).unwrap());
        let inverse = InverseView::new(Arc::clone(&table));

        for old_id in 0..3 {
            let new_id = table.get_new_id(old_id).unwrap();
            assert_eq!(inverse.get(new_id), Some(old_id));
        }
        assert_eq!(inverse.get(9), None);
    }

    #[test]
    fn test_rejects_unusable_identifier() {
        let old = vec![json!(null)];
        let new = array(&["stone"]);
        assert!(IdMappings::from_arrays(&old, &new, None).is_err());
    }
}
