// src/analysis/characters.rs

use std::collections::HashMap;
use std::path::Path;

use crate::error::PipelineError;

/// Columns of the character report.
pub const CHARACTER_COLUMNS: &[&str] = &["row_id", "character_name", "male", "female"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Gender {
    pub male: bool,
    pub female: bool,
}

/// An entity recognized as a person.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    /// Zero-based position in the entity list.
    pub row_id: usize,
    pub name: String,
    pub gender: Gender,
}

impl Character {
    pub fn to_row(&self) -> Vec<String> {
        let flag = |b: bool| s!(if b { "1" } else { "0" });
        vec![self.row_id.to_string(), self.name.clone(), flag(self.gender.male), flag(self.gender.female)]
    }
}

/// Given names with their gender flags. A name can be both.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    names: HashMap<String, Gender>,
}

impl NameTable {
    /// One name per line in each list. Lookups ignore case.
    pub fn from_lists(male: &str, female: &str) -> Self {
        let mut names: HashMap<String, Gender> = HashMap::new();
        for name in male.lines().map(str::trim).filter(|n| !n.is_empty()) {
            names.entry(name.to_lowercase()).or_default().male = true;
        }
        for name in female.lines().map(str::trim).filter(|n| !n.is_empty()) {
            names.entry(name.to_lowercase()).or_default().female = true;
        }
        Self { names }
    }

    pub fn load(male: &Path, female: &Path) -> Result<Self, PipelineError> {
        let read = |p: &Path| std::fs::read_to_string(p).map_err(|e| PipelineError::io(p, e));
        Ok(Self::from_lists(&read(male)?, &read(female)?))
    }

    pub fn len(&self) -> usize { self.names.len() }
    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn lookup(&self, word: &str) -> Option<Gender> {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        self.names.get(&word.to_lowercase()).copied()
    }

    /// The last word of `entity` that is a known name decides; `None` when no
    /// word is.
    pub fn infer(&self, entity: &str) -> Option<Gender> {
        entity.split_whitespace().filter_map(|w| self.lookup(w)).last()
    }

    /// Entities (one per line, blank lines included in the numbering) that
    /// turn out to be people.
    pub fn find_characters(&self, entities: &str) -> Vec<Character> {
        entities
            .lines()
            .enumerate()
            .filter_map(|(row_id, entity)| {
                let gender = self.infer(entity)?;
                (gender.male || gender.female).then(|| Character { row_id, name: s!(entity.trim()), gender })
            })
            .collect()
    }
}
