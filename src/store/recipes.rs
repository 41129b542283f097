//! JSON-file-backed recipe storage
//!
//! Holds the recipe collection and the id counter in one file shaped as
//! `{ "nextId": u64, "recipes": [...] }`. Ids are monotonic and never reused,
//! even across deletes and restarts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the recipe store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required input was missing or malformed
    #[error("validation failed: {0}")]
    Validation(String),

    /// No recipe exists with the requested id
    #[error("no recipe with id {0}")]
    NotFound(u64),

    /// Reading or writing the backing file failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds JSON the store cannot understand
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name as entered by the user
    pub name: String,
    /// Quantity in `unit`
    pub amount: f64,
    /// Unit string, e.g. "g", "ml", "cup"
    pub unit: String,
}

/// One instruction step of a recipe
///
/// Step numbers are contiguous starting at 1; the store renumbers on every
/// write, so callers may submit steps with any numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub number: u32,
    pub text: String,
}

/// A stored recipe record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Server-assigned identifier, immutable for the record's lifetime
    pub id: u64,
    /// Recipe title, always non-empty
    pub title: String,
    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    /// Number of servings the ingredient amounts are sized for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Step>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a recipe; the store assigns id and timestamps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRecipe {
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Step>,
}

/// Partial update for an existing recipe
///
/// Fields left out of the payload (or sent as JSON `null`) keep their prior
/// values. An `id` in the payload is ignored; the path parameter wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<Vec<Step>>,
}

/// On-disk layout of the store file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    next_id: u64,
    recipes: Vec<Recipe>,
}

/// File-backed recipe store with write-through persistence
///
/// The interior lock serializes writers, which is enough to keep the backing
/// file consistent; concurrent writers to the same id are last-write-wins.
pub struct RecipeStore {
    path: PathBuf,
    inner: RwLock<StoreFile>,
}

impl RecipeStore {
    /// Opens the store at `path`, creating an empty one if the file is absent
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let inner = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreFile {
                next_id: 1,
                recipes: Vec::new(),
            },
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            inner: RwLock::new(inner),
        })
    }

    /// Creates a recipe and returns the stored record including its new id
    pub fn create(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let title = validated_title(&new.title)?;
        validate_servings(new.servings)?;

        let mut inner = self.write_lock();
        let now = Utc::now();

        let mut recipe = Recipe {
            id: inner.next_id,
            title,
            image: new.image,
            ready_in_minutes: new.ready_in_minutes,
            servings: new.servings,
            ingredients: new.ingredients,
            instructions: new.instructions,
            created_at: now,
            updated_at: now,
        };
        renumber_steps(&mut recipe.instructions);

        inner.next_id += 1;
        inner.recipes.push(recipe.clone());
        self.persist(&inner)?;

        Ok(recipe)
    }

    /// Returns all recipes in insertion order
    pub fn list(&self) -> Vec<Recipe> {
        self.read_lock().recipes.clone()
    }

    /// Returns the recipe with `id`
    pub fn get(&self, id: u64) -> Result<Recipe, StoreError> {
        self.read_lock()
            .recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Merges `patch` onto the recipe with `id` and returns the result
    pub fn update(&self, id: u64, patch: RecipePatch) -> Result<Recipe, StoreError> {
        let title = patch.title.as_deref().map(validated_title).transpose()?;
        if patch.servings.is_some() {
            validate_servings(patch.servings)?;
        }

        let mut inner = self.write_lock();
        let recipe = inner
            .recipes
            .iter_mut()
            .find(|recipe| recipe.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(title) = title {
            recipe.title = title;
        }
        if let Some(image) = patch.image {
            recipe.image = Some(image);
        }
        if let Some(minutes) = patch.ready_in_minutes {
            recipe.ready_in_minutes = Some(minutes);
        }
        if let Some(servings) = patch.servings {
            recipe.servings = Some(servings);
        }
        if let Some(ingredients) = patch.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(mut instructions) = patch.instructions {
            renumber_steps(&mut instructions);
            recipe.instructions = instructions;
        }
        recipe.updated_at = Utc::now();

        let updated = recipe.clone();
        self.persist(&inner)?;

        Ok(updated)
    }

    /// Removes the recipe with `id`
    ///
    /// A repeat delete reports `NotFound` rather than success.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.write_lock();
        let index = inner
            .recipes
            .iter()
            .position(|recipe| recipe.id == id)
            .ok_or(StoreError::NotFound(id))?;

        inner.recipes.remove(index);
        self.persist(&inner)
    }

    /// Resolves a list of ids to their records, silently omitting unknown ids
    ///
    /// Used by the favorites route. An empty id list is a validation error so
    /// the caller can distinguish "asked for nothing" from "nothing matched".
    pub fn get_many(&self, ids: &[u64]) -> Result<Vec<Recipe>, StoreError> {
        if ids.is_empty() {
            return Err(StoreError::Validation(
                "ids list must not be empty".to_string(),
            ));
        }

        let inner = self.read_lock();
        Ok(ids
            .iter()
            .filter_map(|id| inner.recipes.iter().find(|recipe| recipe.id == *id))
            .cloned()
            .collect())
    }

    /// Loads starter recipes when the store is empty; returns how many landed
    pub fn seed_if_empty(&self, seeds: Vec<NewRecipe>) -> Result<usize, StoreError> {
        {
            let inner = self.read_lock();
            if !inner.recipes.is_empty() {
                return Ok(0);
            }
        }

        let mut count = 0;
        for seed in seeds {
            self.create(seed)?;
            count += 1;
        }
        Ok(count)
    }

    /// Writes the current state to disk via a temp file and atomic rename
    fn persist(&self, inner: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(inner)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, StoreFile> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, StoreFile> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Trims and checks a title, rejecting empty ones
fn validated_title(title: &str) -> Result<String, StoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Rejects a zero servings count; `None` is fine
fn validate_servings(servings: Option<u32>) -> Result<(), StoreError> {
    if servings == Some(0) {
        return Err(StoreError::Validation("servings must be positive".to_string()));
    }
    Ok(())
}

/// Renumbers instruction steps to be contiguous starting at 1
fn renumber_steps(steps: &mut [Step]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.number = index as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_test_store() -> (RecipeStore, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store =
            RecipeStore::open(dir.path().join("recipes.json")).expect("Failed to open store");
        (store, dir)
    }

    fn tea() -> NewRecipe {
        NewRecipe {
            title: "Tea".to_string(),
            servings: Some(1),
            ingredients: vec![Ingredient {
                name: "Water".to_string(),
                amount: 250.0,
                unit: "ml".to_string(),
            }],
            instructions: vec![
                Step {
                    number: 7,
                    text: "Boil water".to_string(),
                },
                Step {
                    number: 2,
                    text: "Steep for 3 minutes".to_string(),
                },
            ],
            ..NewRecipe::default()
        }
    }

    #[test]
    fn test_create_then_get_returns_stored_record() {
        let (store, _dir) = open_test_store();

        let created = store.create(tea()).expect("create should succeed");
        let fetched = store.get(created.id).expect("get should succeed");

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Tea");
        assert_eq!(fetched.servings, Some(1));
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let (store, _dir) = open_test_store();

        let result = store.create(NewRecipe {
            title: "   ".to_string(),
            ..NewRecipe::default()
        });

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.list().is_empty(), "Failed create must not persist");
    }

    #[test]
    fn test_create_rejects_zero_servings() {
        let (store, _dir) = open_test_store();

        let result = store.create(NewRecipe {
            title: "Broth".to_string(),
            servings: Some(0),
            ..NewRecipe::default()
        });

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_steps_are_renumbered_contiguously() {
        let (store, _dir) = open_test_store();

        let created = store.create(tea()).expect("create should succeed");

        let numbers: Vec<u32> = created.instructions.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_update_merges_only_supplied_fields() {
        let (store, _dir) = open_test_store();
        let created = store.create(tea()).expect("create should succeed");

        let updated = store
            .update(
                created.id,
                RecipePatch {
                    title: Some("Green Tea".to_string()),
                    ready_in_minutes: Some(5),
                    ..RecipePatch::default()
                },
            )
            .expect("update should succeed");

        assert_eq!(updated.id, created.id, "id must never change");
        assert_eq!(updated.title, "Green Tea");
        assert_eq!(updated.ready_in_minutes, Some(5));
        // Unspecified fields retain prior values
        assert_eq!(updated.servings, created.servings);
        assert_eq!(updated.ingredients, created.ingredients);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (store, _dir) = open_test_store();

        let result = store.update(999, RecipePatch::default());

        assert!(matches!(result, Err(StoreError::NotFound(999))));
    }

    #[test]
    fn test_update_rejects_empty_title() {
        let (store, _dir) = open_test_store();
        let created = store.create(tea()).expect("create should succeed");

        let result = store.update(
            created.id,
            RecipePatch {
                title: Some(String::new()),
                ..RecipePatch::default()
            },
        );

        assert!(matches!(result, Err(StoreError::Validation(_))));
        let kept = store.get(created.id).expect("record should still exist");
        assert_eq!(kept.title, "Tea");
    }

    #[test]
    fn test_delete_makes_subsequent_operations_fail() {
        let (store, _dir) = open_test_store();
        let created = store.create(tea()).expect("create should succeed");

        store.delete(created.id).expect("delete should succeed");

        assert!(matches!(
            store.get(created.id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update(created.id, RecipePatch::default()),
            Err(StoreError::NotFound(_))
        ));
        // Idempotent failure: second delete also reports NotFound
        assert!(matches!(
            store.delete(created.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_ids_are_never_reused_after_delete() {
        let (store, _dir) = open_test_store();
        let first = store.create(tea()).expect("create should succeed");
        store.delete(first.id).expect("delete should succeed");

        let second = store.create(tea()).expect("create should succeed");

        assert!(second.id > first.id, "Deleted ids must not come back");
    }

    #[test]
    fn test_get_many_omits_unknown_ids() {
        let (store, _dir) = open_test_store();
        let kept = store.create(tea()).expect("create should succeed");

        let found = store
            .get_many(&[kept.id, 9999])
            .expect("get_many should succeed");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, kept.id);
    }

    #[test]
    fn test_get_many_rejects_empty_id_list() {
        let (store, _dir) = open_test_store();

        let result = store.get_many(&[]);

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("recipes.json");

        let created = {
            let store = RecipeStore::open(&path).expect("Failed to open store");
            store.create(tea()).expect("create should succeed")
        };

        let reopened = RecipeStore::open(&path).expect("Failed to reopen store");
        let fetched = reopened.get(created.id).expect("get should succeed");

        assert_eq!(fetched, created);

        // The id counter survives too
        let next = reopened.create(tea()).expect("create should succeed");
        assert!(next.id > created.id);
    }

    #[test]
    fn test_seed_only_populates_an_empty_store() {
        let (store, _dir) = open_test_store();

        let seeded = store
            .seed_if_empty(vec![tea(), tea()])
            .expect("seed should succeed");
        assert_eq!(seeded, 2);
        assert_eq!(store.list().len(), 2);

        let reseeded = store
            .seed_if_empty(vec![tea()])
            .expect("seed should succeed");
        assert_eq!(reseeded, 0, "Non-empty store must not be reseeded");
        assert_eq!(store.list().len(), 2);
    }
}
