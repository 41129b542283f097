//! Client-held user data (favorites, pantry, meal plan, shopping list)
//!
//! The browser keeps this state in local storage under dedicated keys; this
//! module models the same thing as an explicit repository interface so the
//! storage can later move behind the server without touching any view logic.
//! The file implementation writes one JSON file per key, read at mount and
//! written on every mutation. None of it is synchronized with the recipe
//! store, and deleting a recipe server-side does not cascade here.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::planner::{MealPlan, ShoppingItem};

/// Storage key for the weekly meal plan
pub const MEAL_PLAN_KEY: &str = "mealPlan";
/// Storage key for the derived shopping list
pub const SHOPPING_LIST_KEY: &str = "shoppingList";
/// Storage key for pantry ingredient names
pub const PANTRY_ITEMS_KEY: &str = "pantryItems";
/// Storage key for favorite recipe ids
pub const FAVORITE_RECIPES_KEY: &str = "favoriteRecipes";

/// Key-value persistence seam for client-held state
///
/// Mirrors the local-storage contract: string values under string keys,
/// absence is not an error. Swap the implementation to move this state to a
/// real backend.
pub trait StateRepository {
    /// Returns the stored value for `key`, if any
    fn load(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, overwriting any previous value
    fn save(&self, key: &str, value: &str) -> io::Result<()>;

    /// Removes the value under `key`; removing an absent key is fine
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// File-backed repository storing one `<key>.json` per entry
#[derive(Debug, Clone)]
pub struct FileStateRepository {
    dir: PathBuf,
}

impl FileStateRepository {
    /// Creates a repository in the XDG data directory
    ///
    /// Returns `None` if the platform data directory cannot be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "cookstash")?;
        Some(Self {
            dir: project_dirs.data_dir().join("userdata"),
        })
    }

    /// Creates a repository in a specific directory (for tests)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateRepository for FileStateRepository {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Typed access to the reserved user-data keys
///
/// Unreadable or missing values fall back to empty defaults rather than
/// erroring, the same way the client treats a blank local storage.
pub struct UserData<R: StateRepository> {
    repo: R,
}

impl<R: StateRepository> UserData<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn meal_plan(&self) -> MealPlan {
        self.read_or_default(MEAL_PLAN_KEY)
    }

    pub fn set_meal_plan(&self, plan: &MealPlan) -> io::Result<()> {
        self.write_json(MEAL_PLAN_KEY, plan)
    }

    pub fn shopping_list(&self) -> Vec<ShoppingItem> {
        self.read_or_default(SHOPPING_LIST_KEY)
    }

    pub fn set_shopping_list(&self, list: &[ShoppingItem]) -> io::Result<()> {
        self.write_json(SHOPPING_LIST_KEY, &list)
    }

    pub fn clear_shopping_list(&self) -> io::Result<()> {
        self.repo.remove(SHOPPING_LIST_KEY)
    }

    pub fn pantry_items(&self) -> Vec<String> {
        self.read_or_default(PANTRY_ITEMS_KEY)
    }

    /// Adds a pantry item, ignoring blanks and duplicates
    pub fn add_pantry_item(&self, item: &str) -> io::Result<()> {
        let item = item.trim();
        if item.is_empty() {
            return Ok(());
        }

        let mut items = self.pantry_items();
        if items.iter().any(|existing| existing == item) {
            return Ok(());
        }
        items.push(item.to_string());
        self.write_json(PANTRY_ITEMS_KEY, &items)
    }

    pub fn remove_pantry_item(&self, item: &str) -> io::Result<()> {
        let mut items = self.pantry_items();
        items.retain(|existing| existing != item);
        self.write_json(PANTRY_ITEMS_KEY, &items)
    }

    pub fn favorite_recipes(&self) -> Vec<u64> {
        self.read_or_default(FAVORITE_RECIPES_KEY)
    }

    /// Marks a recipe id as favorite; already-marked ids are kept once
    pub fn add_favorite(&self, id: u64) -> io::Result<()> {
        let mut ids = self.favorite_recipes();
        if ids.contains(&id) {
            return Ok(());
        }
        ids.push(id);
        self.write_json(FAVORITE_RECIPES_KEY, &ids)
    }

    /// Unmarks a recipe id
    ///
    /// The server does not cascade deletes into favorites; calling this after
    /// a DELETE is the owner's job.
    pub fn remove_favorite(&self, id: u64) -> io::Result<()> {
        let mut ids = self.favorite_recipes();
        ids.retain(|existing| *existing != id);
        self.write_json(FAVORITE_RECIPES_KEY, &ids)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.repo
            .load(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.repo.save(key, &json)
    }
}
