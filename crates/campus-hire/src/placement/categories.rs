use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::domain::{Category, CategoryDraft, CategoryId};
use super::error::PlacementError;
use super::store::{PlacementStores, RecordStore};
use super::validation::{FieldIssue, Validate, ValidationError};

const CSV_HEADER: [&str; 2] = ["id", "name"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

/// Flat catalog of categories with spreadsheet import and export.
pub struct CategoryCatalog {
    categories: Arc<dyn RecordStore<Category>>,
    fetch_limit: usize,
}

impl CategoryCatalog {
    pub fn new(stores: &PlacementStores, fetch_limit: usize) -> Self {
        Self {
            categories: stores.categories.clone(),
            fetch_limit,
        }
    }

    /// Categories whose name contains `filter`, ignoring case. A blank filter lists everything.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<Category>, PlacementError> {
        let needle = filter
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());
        let matches = |category: &Category| match &needle {
            Some(needle) => category.name.to_lowercase().contains(needle.as_str()),
            None => true,
        };
        Ok(self.categories.find(&matches, self.fetch_limit)?)
    }

    /// Store a new category under the next free id.
    pub fn add(&self, draft: CategoryDraft) -> Result<Category, PlacementError> {
        draft.validate()?;
        let category = Category {
            id: self.next_id()?,
            name: draft.name.trim().to_string(),
        };

        let stored = self.categories.insert(category).map_err(|err| {
            PlacementError::from_store(err, "Category", "category id already taken")
        })?;
        info!(category_id = %stored.id, name = %stored.name, "category added");
        Ok(stored)
    }

    pub fn rename(&self, id: CategoryId, draft: CategoryDraft) -> Result<Category, PlacementError> {
        draft.validate()?;
        let mut category = self
            .categories
            .fetch(&id)?
            .ok_or_else(|| PlacementError::not_found("Category"))?;
        category.name = draft.name.trim().to_string();

        let stored = self
            .categories
            .update(category)
            .map_err(|err| PlacementError::from_store(err, "Category", "category id already taken"))?;
        info!(category_id = %stored.id, name = %stored.name, "category renamed");
        Ok(stored)
    }

    /// Deleting an unknown id is not an error.
    pub fn remove(&self, id: CategoryId) -> Result<(), PlacementError> {
        if self.categories.remove(&id)? {
            info!(category_id = %id, "category deleted");
        }
        Ok(())
    }

    /// Append categories from an `id,name` CSV export.
    ///
    /// Everything after the first comma is the name, so unquoted names may contain commas.
    /// All rows are checked before the first one is stored.
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<Vec<Category>, PlacementError> {
        let rows = parse_rows(reader)?;

        let mut seen = HashSet::new();
        for category in &rows {
            let taken = !seen.insert(category.id) || self.categories.fetch(&category.id)?.is_some();
            if taken {
                return Err(PlacementError::Conflict(format!(
                    "Category {} already exists",
                    category.id
                )));
            }
        }

        let mut imported = Vec::with_capacity(rows.len());
        for category in rows {
            let stored = self.categories.insert(category).map_err(|err| {
                PlacementError::from_store(err, "Category", "category id already taken")
            })?;
            imported.push(stored);
        }

        info!(count = imported.len(), "categories imported");
        Ok(imported)
    }

    /// Render the catalog as `id,name` CSV in listing order.
    pub fn export_csv(&self) -> Result<String, PlacementError> {
        let categories = self.list(None)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .map_err(PlacementError::Export)?;
        for category in &categories {
            writer
                .write_record([category.id.to_string(), category.name.clone()])
                .map_err(PlacementError::Export)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| PlacementError::Export(csv::Error::from(err.into_error())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn next_id(&self) -> Result<CategoryId, PlacementError> {
        let taken = self
            .categories
            .find(&|_: &Category| true, usize::MAX)?
            .into_iter()
            .map(|category| category.id.0);
        next_catalog_id(taken, "category").map(CategoryId)
    }
}

/// One past the highest id in use, starting at 1. Fails once `u32::MAX` is taken.
pub(crate) fn next_catalog_id(
    taken: impl Iterator<Item = u32>,
    catalog: &str,
) -> Result<u32, PlacementError> {
    taken
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| PlacementError::Conflict(format!("no {catalog} ids left to assign")))
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<Category>, PlacementError> {
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

        let name = record.iter().skip(1).collect::<Vec<_>>().join(",");
        let name = name.trim();
        if name.is_empty() {
            issues.push(FieldIssue {
                field: "name",
                problem: "must not be blank",
            });
        }

        match id {
            Some(id) if issues.is_empty() => rows.push(Category {
                id: CategoryId(id),
                name: name.to_string(),
            }),
            _ => {
                return Err(ValidationError {
                    entity: "category import row",
                    issues,
                }
                .into())
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(&PlacementStores::in_memory(), 100)
    }

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
        }
    }

    #[test]
    fn add_assigns_next_id_after_highest() {
        let catalog = catalog();
        catalog
            .import_csv("id,name\n7,Books\n".as_bytes())
            .expect("import");
        let added = catalog.add(draft(" Electronics ")).expect("add");
        assert_eq!(added.id, CategoryId(8));
        assert_eq!(added.name, "Electronics");

        let fresh = super::CategoryCatalog::new(&PlacementStores::in_memory(), 100);
        assert_eq!(fresh.add(draft("Books")).expect("add").id, CategoryId(1));
    }

    #[test]
    fn add_after_highest_possible_id_is_a_conflict() {
        let catalog = catalog();
        catalog
            .import_csv("id,name\n4294967295,Books\n".as_bytes())
            .expect("largest id imports");

        match catalog.add(draft("Music")) {
            Err(PlacementError::Conflict(message)) => {
                assert_eq!(message, "no category ids left to assign")
            }
            other => panic!("expected exhausted ids, got {other:?}"),
        }
        assert_eq!(catalog.list(None).expect("list").len(), 1);
    }

    #[test]
    fn list_filters_case_insensitively() {
        let catalog = catalog();
        catalog.add(draft("Books")).expect("add");
        catalog.add(draft("Electronics")).expect("add");
        catalog.add(draft("E-books")).expect("add");

        let names: Vec<String> = catalog
            .list(Some("BOOK"))
            .expect("list")
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, vec!["Books".to_string(), "E-books".to_string()]);
        assert_eq!(catalog.list(Some("  ")).expect("list").len(), 3);
    }

    #[test]
    fn import_keeps_commas_in_names_and_skips_blank_lines() {
        let catalog = catalog();
        let imported = catalog
            .import_csv("id,name\n3,Books, Rare\n\n4,Music\n".as_bytes())
            .expect("import");

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Books, Rare");
        assert_eq!(imported[1].id, CategoryId(4));
    }

    #[test]
    fn import_rejects_bad_rows_without_writing() {
        let catalog = catalog();
        let err = catalog
            .import_csv("id,name\n1,Books\nx,Music\n".as_bytes())
            .expect_err("bad id rejected");
        assert!(matches!(err, PlacementError::Validation(ref v) if v.has_issue("id")));
        assert!(catalog.list(None).expect("list").is_empty());

        catalog.add(draft("Books")).expect("add");
        let err = catalog
            .import_csv("id,name\n2,Music\n1,Films\n".as_bytes())
            .expect_err("existing id rejected");
        assert!(matches!(err, PlacementError::Conflict(_)));
        assert_eq!(catalog.list(None).expect("list").len(), 1);
    }

    #[test]
    fn export_round_trips_through_import() {
        let source = catalog();
        source.add(draft("Books")).expect("add");
        source.add(draft("Films, Classic")).expect("add");

        let exported = source.export_csv().expect("export");
        assert!(exported.starts_with("id,name\n1,Books\n"));

        let target = catalog();
        let imported = target.import_csv(exported.as_bytes()).expect("import");
        assert_eq!(imported, source.list(None).expect("list"));
    }

    #[test]
    fn rename_and_remove() {
        let catalog = catalog();
        let books = catalog.add(draft("Books")).expect("add");

        let renamed = catalog.rename(books.id, draft("Novels")).expect("rename");
        assert_eq!(renamed.name, "Novels");
        assert!(matches!(
            catalog.rename(CategoryId(99), draft("Ghost")),
            Err(PlacementError::NotFound { entity: "Category" })
        ));

        catalog.remove(books.id).expect("remove");
        catalog.remove(books.id).expect("second remove is a no-op");
        assert!(catalog.list(None).expect("list").is_empty());
    }
}
