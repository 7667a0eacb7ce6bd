//! Puzzle catalog: load-once, in-process cache of the movie list.
//!
//! The catalog is immutable at runtime. It is constructed once at startup
//! from `data/puzzles.json` and handed to request handlers as an
//! `Arc<Catalog>`, the same shape the precomputed context takes elsewhere
//! in this codebase rather than a hidden module-level singleton.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;

use crate::types::Puzzle;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no puzzles")]
    Empty,
    #[error("duplicate puzzle id {0}")]
    DuplicateId(u32),
}

/// Ordered, immutable puzzle list with an id lookup index.
#[derive(Debug)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
    by_id: HashMap<u32, usize>,
}

impl Catalog {
    /// Build a catalog from an already-loaded puzzle list. Rejects empty
    /// lists and duplicate ids; the 10-clue shape is enforced by the type.
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError> {
        if puzzles.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        let mut by_id = HashMap::with_capacity(puzzles.len());
        for (pos, p) in puzzles.iter().enumerate() {
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id));
            }
            by_id.insert(p.id, pos);
        }
        Ok(Self { puzzles, by_id })
    }

    /// Load and validate the catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let puzzles: Vec<Puzzle> = serde_json::from_str(&raw)?;
        Self::new(puzzles)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Puzzle at a catalog position, as produced by the daily selector.
    pub fn by_index(&self, index: usize) -> Option<&Puzzle> {
        self.puzzles.get(index)
    }

    pub fn by_id(&self, id: u32) -> Option<&Puzzle> {
        self.by_id.get(&id).map(|&pos| &self.puzzles[pos])
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Catalog ids in original order, the selector's input.
    pub fn ids(&self) -> Vec<u32> {
        self.puzzles.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(id: u32, title: &str) -> Puzzle {
        Puzzle {
            id,
            title: title.to_string(),
            year: Some(1999),
            emoji_clues: std::array::from_fn(|_| "🎬".to_string()),
            imdb_rank: None,
            imdb_id: None,
        }
    }

    #[test]
    fn test_lookup() {
        let cat = Catalog::new(vec![puzzle(10, "a"), puzzle(20, "b")]).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.by_id(20).unwrap().title, "b");
        assert_eq!(cat.by_index(0).unwrap().id, 10);
        assert!(cat.contains_id(10));
        assert!(!cat.contains_id(30));
        assert_eq!(cat.ids(), vec![10, 20]);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
        let dup = Catalog::new(vec![puzzle(1, "a"), puzzle(1, "b")]);
        assert!(matches!(dup, Err(CatalogError::DuplicateId(1))));
    }
}
