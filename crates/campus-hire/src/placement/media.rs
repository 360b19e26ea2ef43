use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::categories::next_catalog_id;
use super::domain::{MediaDraft, MediaEntry, MediaId, MediaPatch};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::{FieldIssue, Validate, ValidationError};

const CSV_HEADER: [&str; 5] = ["id", "name", "type", "path", "category"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

/// Audio and video library used by placement training sessions.
pub struct MediaCatalog {
    entries: Arc<dyn RecordStore<MediaEntry>>,
    fetch_limit: usize,
}

impl MediaCatalog {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            entries: stores.media.clone(),
            fetch_limit,
        }
    }

    /// Entries whose name contains `filter`, ignoring case.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<MediaEntry>, PlacementError> {
        let needle = filter
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());
        let matches = |entry: &MediaEntry| match &needle {
            Some(needle) => entry.name.to_lowercase().contains(needle.as_str()),
            None => true,
        };
        Ok(self.entries.find(&matches, self.fetch_limit)?)
    }

    pub fn add(&self, draft: MediaDraft) -> Result<MediaEntry, PlacementError> {
        draft.validate()?;
        let mut entry = MediaEntry {
            id: self.next_id()?,
            name: String::new(),
            media_type: String::new(),
            path: String::new(),
            category: String::new(),
        };
        entry.apply(MediaPatch {
            name: Some(draft.name),
            media_type: Some(draft.media_type),
            path: Some(draft.path),
            category: Some(draft.category),
        });

        let stored = self.entries.insert(entry).map_err(|err| {
            PlacementError::from_store(err, "Media entry", "media id already taken")
        })?;
        info!(media_id = %stored.id, name = %stored.name, kind = %stored.media_type, "media entry added");
        Ok(stored)
    }

    /// Overwrite only the fields present in `patch`.
    pub fn update(&self, id: MediaId, patch: MediaPatch) -> Result<MediaEntry, PlacementError> {
        patch.validate()?;
        let mut entry = self
            .entries
            .fetch(&id)?
            .ok_or_else(|| PlacementError::not_found("Media entry"))?;
        entry.apply(patch);

        let stored = self.entries.update(entry).map_err(|err| {
            PlacementError::from_store(err, "Media entry", "media id already taken")
        })?;
        info!(media_id = %stored.id, "media entry updated");
        Ok(stored)
    }

    /// Deleting an unknown id is not an error.
    pub fn remove(&self, id: MediaId) -> Result<(), PlacementError> {
        if self.entries.remove(&id)? {
            info!(media_id = %id, "media entry deleted");
        }
        Ok(())
    }

    /// Append entries from an `id,name,type,path,category` CSV export.
    ///
    /// The category column takes the rest of the line, so it may contain commas. Every row is
    /// checked before the first one is stored.
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<Vec<MediaEntry>, PlacementError> {
        let rows = parse_rows(reader)?;

        let mut seen = HashSet::new();
        for entry in &rows {
            let taken = !seen.insert(entry.id) || self.entries.fetch(&entry.id)?.is_some();
            if taken {
                return Err(PlacementError::Conflict(format!(
                    "Media entry {} already exists",
                    entry.id
                )));
            }
        }

        let mut imported = Vec::with_capacity(rows.len());
        for entry in rows {
            let stored = self.entries.insert(entry).map_err(|err| {
                PlacementError::from_store(err, "Media entry", "media id already taken")
            })?;
            imported.push(stored);
        }

        info!(count = imported.len(), "media entries imported");
        Ok(imported)
    }

    pub fn export_csv(&self) -> Result<String, PlacementError> {
        let entries = self.list(None)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .map_err(PlacementError::Export)?;
        for entry in &entries {
            writer
                .write_record([
                    entry.id.to_string().as_str(),
                    &entry.name,
                    &entry.media_type,
                    &entry.path,
                    &entry.category,
                ])
                .map_err(PlacementError::Export)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| PlacementError::Export(csv::Error::from(err.into_error())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn next_id(&self) -> Result<MediaId, PlacementError> {
        let taken = self
            .entries
            .find(&|_: &MediaEntry| true, usize::MAX)?
            .into_iter()
            .map(|entry| entry.id.0);
        next_catalog_id(taken, "media").map(MediaId)
    }
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<MediaEntry>, PlacementError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut issues = Vec::new();
        let id = record
            .get(0)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|id| *id > 0);
        if id.is_none() {
            issues.push(FieldIssue {
                field: "id",
                problem: "must be a positive integer",
            });
        }

        let mut column = |index: usize, field: &'static str| {
            let value = record.get(index).map(str::trim).unwrap_or_default();
            if value.is_empty() {
                issues.push(FieldIssue {
                    field,
                    problem: "must not be blank",
                });
            }
            value.to_string()
        };
        let name = column(1, "name");
        let media_type = column(2, "type");
        let path = column(3, "path");
        let category = record.iter().skip(4).collect::<Vec<_>>().join(",");

        match id {
            Some(id) if issues.is_empty() => rows.push(MediaEntry {
                id: MediaId(id),
                name,
                media_type,
                path,
                category: category.trim().to_string(),
            }),
            _ => {
                return Err(ValidationError {
                    entity: "media import row",
                    issues,
                }
                .into())
            }
        }
    }

    Ok(rows)
}
