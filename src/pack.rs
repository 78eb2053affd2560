//! Content packs: named bundles of prompt templates, concepts, and constraints.
//!
//! The built-in pack ships with the binary. User packs are written by the pack
//! creator as JSON files under the pack directory and merged field-by-field
//! with the built-in pack when loaded, so a damaged file never breaks a game.

use crate::error::{GameError, GameResult};
use crate::types::{PackName, BUILTIN_PACK_NAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const BUILTIN_PROMPTS: &[&str] = &[
    "Invent a new holiday that combines {A} and {B}.",
    "Write a slogan for {A}.",
    "Describe what happens if {A} meets {B} in the future.",
    "Design a product for {A} that also solves a problem with {B}.",
    "Write a short story beginning with: '{A}'",
    "Imagine a world where {A} and {B} are everyday realities. What changes?",
];

const BUILTIN_CONCEPTS: &[&str] = &[
    "robots",
    "bananas",
    "astronauts",
    "time travel",
    "umbrellas",
    "dragons",
    "dinosaurs",
    "TikTok",
    "AI",
    "pirates",
    "coffee",
    "self-driving cars",
];

/// Each entry reads as a clause after "but it".
const BUILTIN_CONSTRAINTS: &[&str] = &[
    "must rhyme",
    "must be told from the point of view of {A}",
    "must make {B} the villain",
    "must end with a plot twist",
    "must be written as a job advertisement",
    "must never mention {A} by name",
    "must be set in the year 3000",
    "must include a secret password",
    "must be exactly three sentences long",
    "must sound like a weather forecast",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentPack {
    pub name: PackName,
    pub prompts: Vec<String>,
    pub concepts: Vec<String>,
    pub constraints: Vec<String>,
}

/// On-disk and export shape of a pack (the name lives in the file name)
#[derive(Debug, Serialize)]
struct PackFile<'a> {
    prompts: &'a [String],
    concepts: &'a [String],
    constraints: &'a [String],
}

impl ContentPack {
    /// The pack compiled into the binary. Always complete.
    pub fn builtin() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            name: BUILTIN_PACK_NAME.to_string(),
            prompts: owned(BUILTIN_PROMPTS),
            concepts: owned(BUILTIN_CONCEPTS),
            constraints: owned(BUILTIN_CONSTRAINTS),
        }
    }

    /// Concepts with duplicates removed, first occurrence wins
    pub fn distinct_concepts(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.concepts
            .iter()
            .map(String::as_str)
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Pretty-printed JSON offered as a download. Non-ASCII stays literal.
    pub fn to_export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&PackFile {
            prompts: &self.prompts,
            concepts: &self.concepts,
            constraints: &self.constraints,
        })
    }
}

/// Reasons a persisted pack could not be read. Always recovered from.
#[derive(Debug, thiserror::Error)]
enum PackLoadError {
    #[error("failed to read pack file: {0}")]
    Read(#[from] std::io::Error),

    #[error("pack file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("pack file is not a JSON object")]
    NotAnObject,
}

/// Turn a user-supplied pack name into a safe file stem.
///
/// Keeps ASCII letters, digits, underscores and hyphens. Whitespace runs
/// become a single underscore and everything else is dropped.
pub fn sanitize_pack_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-'))
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Directory-backed store for user packs
#[derive(Debug, Clone)]
pub struct PackStore {
    dir: PathBuf,
}

impl PackStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the pack directory from `PACKS_DIR` (default `packs`)
    pub fn from_env() -> Self {
        let dir = std::env::var("PACKS_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "packs".to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Built-in name plus every persisted pack, sorted and deduplicated
    pub fn list_packs(&self) -> Vec<PackName> {
        let mut names = BTreeSet::new();
        names.insert(BUILTIN_PACK_NAME.to_string());

        match std::fs::read_dir(&self.dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("json") {
                        continue;
                    }
                    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    // Only names that load_pack would read back
                    if sanitize_pack_name(stem) == stem {
                        names.insert(stem.to_string());
                    } else {
                        tracing::debug!("Skipping pack file with unsafe name: {}", path.display());
                    }
                }
            }
            Err(e) => {
                tracing::debug!("Pack directory {} not readable: {}", self.dir.display(), e);
            }
        }

        names.into_iter().collect()
    }

    /// Load a pack by name. Never fails: anything missing or unreadable is
    /// taken from the built-in pack, field by field.
    pub fn load_pack(&self, name: &str) -> ContentPack {
        let builtin = ContentPack::builtin();
        let safe_name = sanitize_pack_name(name);
        if name == BUILTIN_PACK_NAME || safe_name.is_empty() {
            return builtin;
        }

        let raw = match self.read_pack_object(&safe_name) {
            Ok(obj) => obj,
            Err(e) => {
                tracing::warn!(
                    "Pack '{}' could not be loaded, using built-in content: {}",
                    safe_name,
                    e
                );
                serde_json::Map::new()
            }
        };

        let field = |key: &str, fallback: Vec<String>| -> Vec<String> {
            let parsed = raw
                .get(key)
                .cloned()
                .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
                .map(clean_entries)
                .unwrap_or_default();
            if parsed.is_empty() {
                tracing::debug!("Pack '{}' field '{}' falls back to built-in", safe_name, key);
                fallback
            } else {
                parsed
            }
        };

        ContentPack {
            prompts: field("prompts", builtin.prompts),
            concepts: field("concepts", builtin.concepts),
            constraints: field("constraints", builtin.constraints),
            name: safe_name,
        }
    }

    fn read_pack_object(
        &self,
        name: &str,
    ) -> Result<serde_json::Map<String, serde_json::Value>, PackLoadError> {
        let text = std::fs::read_to_string(self.path_for(name))?;
        match serde_json::from_str(&text)? {
            serde_json::Value::Object(obj) => Ok(obj),
            _ => Err(PackLoadError::NotAnObject),
        }
    }

    /// Validate and persist a user pack.
    ///
    /// Every violated rule is reported at once and nothing is written unless
    /// all of them pass. Returns the sanitized name the pack was stored under.
    pub fn save_pack(
        &self,
        name: &str,
        prompts: Vec<String>,
        concepts: Vec<String>,
        constraints: Vec<String>,
    ) -> GameResult<PackName> {
        let prompts = clean_entries(prompts);
        let concepts = clean_entries(concepts);
        let constraints = clean_entries(constraints);
        let safe_name = sanitize_pack_name(name);

        let mut violations = Vec::new();
        if name.trim().is_empty() {
            violations.push("Pack name is required".to_string());
        } else if safe_name.is_empty() {
            violations.push("Pack name must contain at least one letter or digit".to_string());
        } else if safe_name.eq_ignore_ascii_case(BUILTIN_PACK_NAME) {
            violations.push(format!(
                "Pack name '{}' is reserved for the built-in pack",
                BUILTIN_PACK_NAME
            ));
        }
        if prompts.is_empty() {
            violations.push("At least one prompt template is required".to_string());
        }
        if concepts.iter().collect::<BTreeSet<_>>().len() < 2 {
            violations.push("At least two distinct concepts are required".to_string());
        }
        if constraints.is_empty() {
            violations.push("At least one constraint is required".to_string());
        }
        if !violations.is_empty() {
            return Err(GameError::PackValidation(violations));
        }

        let pack = ContentPack {
            name: safe_name.clone(),
            prompts,
            concepts,
            constraints,
        };
        let json = pack
            .to_export_json()
            .map_err(|e| GameError::Storage(e.into()))?;

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(&safe_name), json)?;
        tracing::info!("Saved pack '{}' to {}", safe_name, self.dir.display());

        Ok(safe_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store() -> (tempfile::TempDir, PackStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PackStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_builtin_pack_is_complete() {
        let pack = ContentPack::builtin();
        assert_eq!(pack.name, BUILTIN_PACK_NAME);
        assert_eq!(pack.prompts.len(), 6);
        assert_eq!(pack.concepts.len(), 12);
        assert!(!pack.constraints.is_empty());
        assert_eq!(pack.distinct_concepts().len(), pack.concepts.len());
    }

    #[test]
    fn test_sanitize_pack_name() {
        assert_eq!(sanitize_pack_name("My Pack!! 2024"), "My_Pack_2024");
        assert_eq!(sanitize_pack_name("  spaced   out  "), "spaced_out");
        assert_eq!(sanitize_pack_name("keep-dash_and_under"), "keep-dash_and_under");
        assert_eq!(sanitize_pack_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_pack_name("!!!"), "");
        assert_eq!(sanitize_pack_name("Café ²"), "Caf");
        assert_eq!(sanitize_pack_name("tab\tsplit"), "tab_split");
    }

    #[test]
    fn test_list_packs_without_directory() {
        let store = PackStore::new("/nonexistent/creativity-duel/packs");
        assert_eq!(store.list_packs(), vec![BUILTIN_PACK_NAME.to_string()]);
    }

    #[test]
    fn test_list_packs_sorted_and_deduplicated() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("zebra.json"), "{}").unwrap();
        std::fs::write(dir.path().join("apple.json"), "{}").unwrap();
        std::fs::write(dir.path().join("default.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_packs(), strings(&["apple", "default", "zebra"]));
    }

    #[test]
    fn test_listed_packs_are_loadable() {
        let (dir, store) = store();
        let custom = r#"{"prompts": ["Pitch {A}."], "concepts": ["owls", "jazz"], "constraints": ["must rhyme"]}"#;
        std::fs::write(dir.path().join("my pack.json"), custom).unwrap();
        std::fs::write(dir.path().join("Käse.json"), custom).unwrap();
        std::fs::write(dir.path().join("my_pack.json"), custom).unwrap();

        let names = store.list_packs();
        assert_eq!(names, strings(&["default", "my_pack"]));
        for name in names.iter().filter(|n| n.as_str() != BUILTIN_PACK_NAME) {
            let pack = store.load_pack(name);
            assert_eq!(&pack.name, name);
            assert_eq!(pack.concepts, strings(&["owls", "jazz"]));
        }
    }

    #[test]
    fn test_load_builtin_ignores_files() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join("default.json"),
            r#"{"prompts": ["hijacked"]}"#,
        )
        .unwrap();

        assert_eq!(store.load_pack(BUILTIN_PACK_NAME), ContentPack::builtin());
    }

    #[test]
    fn test_load_missing_pack_falls_back_entirely() {
        let (_dir, store) = store();
        let pack = store.load_pack("ghost");
        let builtin = ContentPack::builtin();

        assert_eq!(pack.name, "ghost");
        assert_eq!(pack.prompts, builtin.prompts);
        assert_eq!(pack.concepts, builtin.concepts);
        assert_eq!(pack.constraints, builtin.constraints);
    }

    #[test]
    fn test_load_malformed_pack_falls_back() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let pack = store.load_pack("broken");
        assert_eq!(pack.prompts, ContentPack::builtin().prompts);
    }

    #[test]
    fn test_load_falls_back_per_field() {
        let (dir, store) = store();
        std::fs::write(
            dir.path().join("partial.json"),
            r#"{"prompts": ["Sell {A} to {B}."], "concepts": [], "constraints": 42}"#,
        )
        .unwrap();

        let pack = store.load_pack("partial");
        let builtin = ContentPack::builtin();
        assert_eq!(pack.prompts, strings(&["Sell {A} to {B}."]));
        assert_eq!(pack.concepts, builtin.concepts);
        assert_eq!(pack.constraints, builtin.constraints);
    }

    #[test]
    fn test_save_collects_all_violations_without_writing() {
        let (dir, store) = store();
        let result = store.save_pack("", vec![], strings(&["only one"]), vec![]);

        match result {
            Err(GameError::PackValidation(violations)) => {
                assert_eq!(violations.len(), 4);
                assert!(violations[0].contains("name"));
            }
            other => panic!("Expected PackValidation, got {:?}", other),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_save_rejects_each_missing_field() {
        let (_dir, store) = store();
        let prompts = strings(&["Pitch {A}."]);
        let concepts = strings(&["owls", "jazz"]);
        let constraints = strings(&["must rhyme"]);

        let cases = [
            store.save_pack("", prompts.clone(), concepts.clone(), constraints.clone()),
            store.save_pack("p", vec![], concepts.clone(), constraints.clone()),
            store.save_pack("p", prompts.clone(), vec![], constraints.clone()),
            store.save_pack("p", prompts.clone(), concepts.clone(), vec![]),
            store.save_pack("p", prompts.clone(), strings(&["owls", "owls"]), constraints),
        ];
        for result in cases {
            assert!(matches!(result, Err(GameError::PackValidation(_))));
        }
        assert_eq!(store.list_packs(), vec![BUILTIN_PACK_NAME.to_string()]);
    }

    #[test]
    fn test_save_rejects_reserved_name() {
        let (_dir, store) = store();
        let result = store.save_pack(
            "Default",
            strings(&["Pitch {A}."]),
            strings(&["owls", "jazz"]),
            strings(&["must rhyme"]),
        );
        match result {
            Err(GameError::PackValidation(v)) => assert!(v[0].contains("reserved")),
            other => panic!("Expected PackValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let (_dir, store) = store();
        let prompts = strings(&["Pitch {A} to {B}.", "Write an ode to {A}."]);
        let concepts = strings(&["owls", "jazz", "tax returns"]);
        let constraints = strings(&["must rhyme", "must mention {B} twice"]);

        let name = store
            .save_pack(
                "My Pack!! 2024",
                prompts.clone(),
                concepts.clone(),
                constraints.clone(),
            )
            .unwrap();
        assert_eq!(name, "My_Pack_2024");
        assert!(store.list_packs().contains(&name));

        let pack = store.load_pack(&name);
        assert_eq!(pack.name, name);
        assert_eq!(pack.prompts, prompts);
        assert_eq!(pack.concepts, concepts);
        assert_eq!(pack.constraints, constraints);
    }

    #[test]
    fn test_save_trims_blank_entries() {
        let (_dir, store) = store();
        let name = store
            .save_pack(
                "tidy",
                strings(&["  Pitch {A}.  ", ""]),
                strings(&["owls", " ", "jazz"]),
                strings(&["must rhyme"]),
            )
            .unwrap();

        let pack = store.load_pack(&name);
        assert_eq!(pack.prompts, strings(&["Pitch {A}."]));
        assert_eq!(pack.concepts, strings(&["owls", "jazz"]));
    }

    #[test]
    fn test_export_preserves_non_ascii() {
        let pack = ContentPack {
            name: "umlaute".to_string(),
            prompts: strings(&["Schreib über {A}."]),
            concepts: strings(&["Käse", "Drachen"]),
            constraints: strings(&["muss reimen"]),
        };

        let json = pack.to_export_json().unwrap();
        assert!(json.contains("Käse"));
        assert!(!json.contains("\\u"));
        assert!(json.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["concepts"][0], "Käse");
        assert!(parsed.get("name").is_none());
    }
}
