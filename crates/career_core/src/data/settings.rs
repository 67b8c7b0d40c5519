//! User settings and the style table: the two loader outputs the rest of the
//! application needs after ingestion.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CareerError, Result};

pub const ALLOW_RUSSIA: &str = "Allow Russia";
pub const VIEW_PROGRESS: &str = "View progress";
pub const EXCEPTION_TRACEBACK: &str = "Exception traceback";

const YES: &str = "Yes";
const NO: &str = "No";

/// One entry of `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub name: String,
    pub description: String,
    pub set_to: String,
    pub values: Vec<String>,
}

impl Setting {
    fn yes_no(name: &str, description: &str, set_to: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            set_to: set_to.to_string(),
            values: vec![YES.to_string(), NO.to_string()],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.values.contains(&self.set_to) {
            return Err(CareerError::validation(format!(
                "{} setting: {} is not in [{}].",
                self.name,
                self.set_to,
                self.values.join(", ")
            )));
        }
        Ok(())
    }

    pub fn is_yes(&self) -> bool {
        self.set_to.eq_ignore_ascii_case(YES)
    }
}

/// Ordered settings; the first three entries have fixed meanings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<Setting>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entries: vec![
                Setting::yes_no(
                    ALLOW_RUSSIA,
                    "Whether players from Russia can appear in generated squads.",
                    NO,
                ),
                Setting::yes_no(VIEW_PROGRESS, "Show progress while the game loads.", YES),
                Setting::yes_no(
                    EXCEPTION_TRACEBACK,
                    "Show the full error chain when the database is incomplete.",
                    NO,
                ),
            ],
        }
    }
}

impl Settings {
    pub fn from_entries(entries: Vec<Setting>) -> Result<Self> {
        if entries.len() < 3 {
            return Err(CareerError::validation(format!(
                "The settings file must list at least 3 settings, found {}.",
                entries.len()
            )));
        }
        let mut entries = entries;
        for entry in &mut entries {
            entry.description = entry.description.replace("\\n", "\n");
            entry.validate()?;
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|source| CareerError::Io { path: path.to_path_buf(), source })?;
        let entries: Vec<Setting> = serde_yaml::from_str(&contents)
            .map_err(|source| CareerError::Parse { path: path.to_path_buf(), source })?;
        Self::from_entries(entries)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let entries: Vec<Setting> = self
            .entries
            .iter()
            .map(|s| Setting { description: s.description.replace('\n', "\\n"), ..s.clone() })
            .collect();
        let yaml = serde_yaml::to_string(&entries)
            .map_err(|source| CareerError::Parse { path: path.to_path_buf(), source })?;
        fs::write(path, yaml).map_err(|source| CareerError::Io { path: path.to_path_buf(), source })
    }

    pub fn entries(&self) -> &[Setting] {
        &self.entries
    }

    pub fn allow_russia(&self) -> bool {
        self.entries[0].is_yes()
    }

    pub fn view_progress(&self) -> bool {
        self.entries[1].is_yes()
    }

    pub fn exception_traceback(&self) -> bool {
        self.entries[2].is_yes()
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CareerError::NotFound { entity: "setting", query: name.to_string() })?;
        let previous = std::mem::replace(&mut entry.set_to, value.to_string());
        if let Err(err) = entry.validate() {
            entry.set_to = previous;
            return Err(err);
        }
        Ok(())
    }
}

/// Style code → color. Codes are what presentation markup refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    styles: HashMap<String, String>,
}

impl StyleTable {
    /// A code ending in `!` registers only its foreground style; any other
    /// code also gets a `bg<code>` background variant.
    pub fn from_mapping(mapping: Vec<(String, String)>) -> Self {
        let mut styles = HashMap::new();
        for (code, color) in mapping {
            if let Some(plain) = code.strip_suffix('!') {
                styles.insert(plain.to_string(), color);
                continue;
            }
            styles.insert(format!("bg{}", code), format!("bg:{}", color));
            styles.insert(code, color);
        }
        Self { styles }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.styles.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(!settings.allow_russia());
        assert!(settings.view_progress());
        assert!(!settings.exception_traceback());
    }

    #[test]
    fn test_value_outside_choices_is_rejected() {
        let mut entries = Settings::default().entries().to_vec();
        entries[1].set_to = "Maybe".into();
        let err = Settings::from_entries(entries).unwrap_err();
        assert!(err.to_string().contains("View progress setting: Maybe"));
    }

    #[test]
    fn test_set_keeps_previous_value_on_error() {
        let mut settings = Settings::default();
        assert!(settings.set("allow russia", "Maybe").is_err());
        assert!(!settings.allow_russia());
        settings.set("Allow Russia", "Yes").unwrap();
        assert!(settings.allow_russia());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        let mut settings = Settings::default();
        settings.set(EXCEPTION_TRACEBACK, "Yes").unwrap();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_style_background_variants() {
        let table = StyleTable::from_mapping(vec![
            ("ured".into(), "#ff0000".into()),
            ("bold!".into(), "bold".into()),
        ]);
        assert_eq!(table.get("ured"), Some("#ff0000"));
        assert_eq!(table.get("bgured"), Some("bg:#ff0000"));
        assert_eq!(table.get("bold"), Some("bold"));
        assert_eq!(table.get("bgbold"), None);
        assert_eq!(table.len(), 3);
    }
}
