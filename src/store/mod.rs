//! Persistent recipe store
//!
//! Durable CRUD over user-created recipes, backed by a single JSON file on
//! disk. Every mutating operation rewrites the file (temp file + atomic
//! rename) before returning success, so a crash never leaves a half-written
//! store behind.

mod recipes;

pub use recipes::{
    Ingredient, NewRecipe, Recipe, RecipePatch, RecipeStore, Step, StoreError,
};
