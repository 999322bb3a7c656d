//! The mapping store: named identifier tables plus extra lookup tables.
//!
//! A store belongs to one version-pair module. It is built once from the
//! pair's documents, immutable afterwards, and shared by every connection
//! the module serves.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use backport_core::strip_default_namespace;

use crate::loader::{object_to_string_map, MappingDocument};
use crate::table::{numeric_id, IdMappings, InverseView, RAW_REMOVED};
use crate::{MappingError, Result};

/// Tables whose id spaces drift too much between versions for every id to
/// have a counterpart. Misses on these are routine and stay quiet unless a
/// `TableSpec` opts back in.
const QUIET_TABLES: [&str; 4] = ["items", "blocks", "statistics", "entities"];

/// How a table lays out its identifiers in the source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// An ordered array; the element index is the id.
    Array,
    /// A sparse object keyed by decimal id.
    Object,
}

/// Where a table's data comes from.
pub enum TableSource {
    /// Joined locally from the old and new documents.
    Document(TableLayout),
    /// Adopted from a sibling module. The sibling's table runs opposite to
    /// this store (new ids to old ids) and is read through its inverse
    /// view, so no second copy exists.
    Foreign(Arc<IdMappings>),
}

/// Declares one identifier table a store should carry.
pub struct TableSpec {
    name: String,
    source: TableSource,
    warn_on_missing: bool,
    required: bool,
}

impl TableSpec {
    /// A table whose documents hold ordered identifier arrays.
    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name.into(), TableSource::Document(TableLayout::Array))
    }

    /// A table whose documents hold id-keyed identifier objects.
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name.into(), TableSource::Document(TableLayout::Object))
    }

    /// Adopt a sibling module's already built table under `name`.
    pub fn foreign(name: impl Into<String>, table: Arc<IdMappings>) -> Self {
        Self::new(name.into(), TableSource::Foreign(table))
    }

    fn new(name: String, source: TableSource) -> Self {
        let warn_on_missing = !QUIET_TABLES.contains(&name.as_str());
        Self {
            name,
            source,
            warn_on_missing,
            required: false,
        }
    }

    /// Override the miss-diagnostic policy for this table.
    pub fn warn_on_missing(mut self, warn: bool) -> Self {
        self.warn_on_missing = warn;
        self
    }

    /// Fail the load outright when either document lacks this table.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Replacement record for an item the new version dropped or renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedItem {
    /// Id the item is shown as on the old version.
    pub id: i32,
    /// Display name override, when the replacement looks different enough
    /// to need labelling.
    pub name: Option<String>,
}

enum TableHandle {
    Owned(Arc<IdMappings>),
    Foreign(InverseView),
}

impl TableHandle {
    fn new_id(&self, id: i32) -> Option<i32> {
        match self {
            Self::Owned(table) => table.get_new_id(id),
            Self::Foreign(view) => view.get(id),
        }
    }

    fn old_id(&self, id: i32) -> Option<i32> {
        match self {
            Self::Owned(table) => table.find_source_id(id),
            Self::Foreign(view) => view.forward().get_new_id(id),
        }
    }

    // Removal markers live in whichever table the inverse lookup indexes
    // directly, which for adopted tables is the sibling's own.
    fn old_miss_diagnosable(&self, id: i32) -> bool {
        match self {
            Self::Owned(_) => true,
            Self::Foreign(view) => view.forward().raw(id) != RAW_REMOVED,
        }
    }
}

struct TableEntry {
    handle: TableHandle,
    warn_on_missing: bool,
}

/// Identifier tables and extra lookups for one version pair.
pub struct MappingStore {
    tables: HashMap<String, TableEntry>,
    item_overrides: HashMap<i32, MappedItem>,
    sound_overrides: Option<HashMap<String, String>>,
    entity_names: Option<HashMap<String, String>>,
}

impl MappingStore {
    /// Build the store from the pair's documents.
    ///
    /// Joins every requested table, applies the diff overlay, and parses
    /// the diff's extra sections. A requested table absent from either
    /// document is skipped (its lookups return `None`) unless it was
    /// marked required. Malformed data is always fatal.
    pub fn load(
        old_doc: &MappingDocument,
        new_doc: &MappingDocument,
        diff_doc: Option<&MappingDocument>,
        specs: Vec<TableSpec>,
    ) -> Result<Self> {
        let mut tables = HashMap::new();
        for spec in specs {
            let TableSpec {
                name,
                source,
                warn_on_missing,
                required,
            } = spec;

            let handle = match source {
                TableSource::Foreign(sibling) => {
                    Some(TableHandle::Foreign(InverseView::new(sibling)))
                }
                TableSource::Document(layout) => {
                    match (old_doc.get(&name), new_doc.get(&name)) {
                        (Some(old), Some(new)) => {
                            let diff = diff_section(diff_doc, &name)?;
                            Some(TableHandle::Owned(Arc::new(join_table(
                                &name, layout, old, new, diff,
                            )?)))
                        }
                        _ if required => return Err(MappingError::MissingTable(name)),
                        _ => None,
                    }
                }
            };
            if let Some(handle) = handle {
                tables.insert(
                    name,
                    TableEntry {
                        handle,
                        warn_on_missing,
                    },
                );
            }
        }

        let mut item_overrides = HashMap::new();
        let mut sound_overrides = None;
        let mut entity_names = None;
        if let Some(diff) = diff_doc {
            if let Some(items) = diff.get("items") {
                item_overrides = parse_item_overrides(expect_object("items", items)?)?;
            }
            if let Some(sounds) = diff.get("sounds") {
                sound_overrides = Some(string_entries(expect_object("sounds", sounds)?));
            }
            if let Some(names) = diff.get("entitynames") {
                entity_names = Some(object_to_string_map(
                    "entitynames",
                    expect_object("entitynames", names)?,
                )?);
            }
        }

        Ok(Self {
            tables,
            item_overrides,
            sound_overrides,
            entity_names,
        })
    }

    /// Forward lookup: the new-version id for `id` on the named table.
    ///
    /// Never diagnoses a miss; callers on this side decide what absence
    /// means.
    pub fn get_new_id(&self, table: &str, id: i32) -> Option<i32> {
        self.tables.get(table)?.handle.new_id(id)
    }

    /// Inverse lookup: the old-version id for `id` on the named table.
    ///
    /// A miss on a warning table logs exactly one `warn` event, unless the
    /// id was deliberately removed by the diff overlay.
    pub fn get_old_id(&self, table: &str, id: i32) -> Option<i32> {
        let entry = self.tables.get(table)?;
        let mapped = entry.handle.old_id(id);
        if mapped.is_none() && entry.warn_on_missing && entry.handle.old_miss_diagnosable(id) {
            tracing::warn!("Missing {} mapping for id {}", table, id);
        }
        mapped
    }

    /// Whether misses on the named table are diagnosed.
    pub fn warns_on_missing(&self, table: &str) -> bool {
        self.tables
            .get(table)
            .map_or(false, |entry| entry.warn_on_missing)
    }

    /// The locally joined table under `name`, for adoption by a sibling
    /// module. Adopted tables are not re-exported.
    pub fn table(&self, name: &str) -> Option<&Arc<IdMappings>> {
        match &self.tables.get(name)?.handle {
            TableHandle::Owned(table) => Some(table),
            TableHandle::Foreign(_) => None,
        }
    }

    /// Replacement record for an old item id, if the diff ships one.
    pub fn mapped_item(&self, id: i32) -> Option<&MappedItem> {
        self.item_overrides.get(&id)
    }

    /// Mapped sound key for `key`, if the diff renames it.
    ///
    /// Keys are matched with the implicit `minecraft:` namespace stripped.
    /// A miss is silent: most sounds carry over by name.
    pub fn mapped_sound(&self, key: &str) -> Option<&str> {
        let sounds = self.sound_overrides.as_ref()?;
        sounds.get(strip_default_namespace(key)).map(String::as_str)
    }

    /// Mapped display name for an entity type.
    ///
    /// Every entity type is expected to have an entry, so a miss is data
    /// breakage and logs an `error` event.
    pub fn mapped_entity_name(&self, name: &str) -> Option<&str> {
        let mapped = self
            .entity_names
            .as_ref()
            .and_then(|names| names.get(name));
        if mapped.is_none() {
            tracing::error!("No entity name mapping for '{}'", name);
        }
        mapped.map(String::as_str)
    }
}

fn join_table(
    name: &str,
    layout: TableLayout,
    old: &Value,
    new: &Value,
    diff: Option<&Map<String, Value>>,
) -> Result<IdMappings> {
    let table = match layout {
        TableLayout::Array => {
            IdMappings::from_arrays(expect_array(name, old)?, expect_array(name, new)?, diff)?
        }
        TableLayout::Object => {
            IdMappings::from_objects(expect_object(name, old)?, expect_object(name, new)?, diff)?
        }
    };
    tracing::debug!(
        "Joined '{}' table: {} of {} ids mapped",
        name,
        table.mapped_count(),
        table.len()
    );
    Ok(table)
}

fn diff_section<'a>(
    diff_doc: Option<&'a MappingDocument>,
    name: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match diff_doc.and_then(|diff| diff.get(name)) {
        Some(section) => Ok(Some(expect_object(name, section)?)),
        None => Ok(None),
    }
}

fn expect_array<'a>(name: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| MappingError::Malformed(format!("'{name}' table is not an array")))
}

fn expect_object<'a>(name: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| MappingError::Malformed(format!("'{name}' section is not an object")))
}

/// String-to-string entries of a diff section, ignoring everything else.
/// The sound section doubles as join overrides, so ids and nulls are legal
/// there and belong to the join.
fn string_entries(object: &Map<String, Value>) -> HashMap<String, String> {
    object
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key.clone(), s.clone())),
            _ => None,
        })
        .collect()
}

/// Item replacement records: keys are old ids (`"452"`) optionally with a
/// data suffix (`"452:1"`), values hold the replacement id and an optional
/// display name. Later entries win on the same id.
fn parse_item_overrides(items: &Map<String, Value>) -> Result<HashMap<i32, MappedItem>> {
    let mut overrides = HashMap::new();
    for (key, value) in items {
        let Value::Object(fields) = value else {
            // Plain join overrides share this section; not ours.
            continue;
        };
        let id_part = key.split_once(':').map_or(key.as_str(), |(id, _)| id);
        let old_id = id_part.parse::<i32>().map_err(|_| {
            MappingError::Malformed(format!("item override key is not an id: {key:?}"))
        })?;
        let id = match fields.get("id") {
            Some(id) => numeric_id(key, id)?,
            None => {
                return Err(MappingError::Malformed(format!(
                    "item override {key:?} lacks an id"
                )))
            }
        };
        let name = match fields.get("name") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => {
                return Err(MappingError::Malformed(format!(
                    "item override {key:?} has a non-string name"
                )))
            }
            None => None,
        };
        overrides.insert(old_id, MappedItem { id, name });
    }
    Ok(overrides)
}
