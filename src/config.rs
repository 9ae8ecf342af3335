use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::records::City;
use crate::sources::rule_for;

/// Maps each city to the CSV file it is read from.
///
/// Defaults to the city's published file name inside a data directory.
/// Individual paths can be overridden by a plain JSON object on disk:
/// ```json
/// {
///   "kanazawa": "kanazawa_2023.csv",
///   "chiba": "/srv/data/chiba.csv"
/// }
/// ```
/// Relative override paths resolve against the data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePaths {
    entries: BTreeMap<City, PathBuf>,
}

impl SourcePaths {
    /// Every city at its default file name under `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        let entries = City::ALL
            .into_iter()
            .map(|city| (city, data_dir.join(rule_for(city).file_name)))
            .collect();
        Self { entries }
    }

    /// Defaults under `data_dir`, with overrides from the JSON file at `path`.
    pub fn load(data_dir: &Path, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read source config '{}'", path.display()))?;
        let overrides: HashMap<String, PathBuf> = serde_json::from_str(&content)
            .with_context(|| format!("invalid source config '{}'", path.display()))?;

        let mut paths = Self::in_dir(data_dir);
        for (name, file) in overrides {
            let city: City = name.parse()?;
            paths.entries.insert(city, data_dir.join(file));
        }
        Ok(paths)
    }

    /// Returns the input path for `city`.
    pub fn get(&self, city: City) -> &Path {
        self.entries
            .get(&city)
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(rule_for(city).file_name))
    }

    /// Iterates over all `(city, path)` pairs in city order.
    pub fn iter(&self) -> impl Iterator<Item = (City, &Path)> {
        self.entries.iter().map(|(c, p)| (*c, p.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_use_published_file_names() {
        let paths = SourcePaths::in_dir(Path::new("data"));
        assert_eq!(paths.get(City::Toyama), Path::new("data/富山ごみ.csv"));
        assert_eq!(paths.iter().count(), 4);
        assert_eq!(paths.iter().next().map(|(c, _)| c), Some(City::Kanazawa));
    }

    #[test]
    fn test_load_overrides_resolve_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("sources.json");
        fs::write(
            &config,
            r#"{"Kanazawa": "k.csv", "chiba": "/srv/chiba.csv"}"#,
        )
        .unwrap();

        let paths = SourcePaths::load(Path::new("data"), &config).unwrap();
        assert_eq!(paths.get(City::Kanazawa), Path::new("data/k.csv"));
        assert_eq!(paths.get(City::Chiba), Path::new("/srv/chiba.csv"));
        assert_eq!(paths.get(City::Sakai), Path::new("data/堺市ごみ.csv"));
    }

    #[test]
    fn test_load_rejects_unknown_city() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("sources.json");
        fs::write(&config, r#"{"osaka": "o.csv"}"#).unwrap();

        let err = SourcePaths::load(Path::new("."), &config).unwrap_err();
        assert!(err.to_string().contains("osaka"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(SourcePaths::load(Path::new("."), Path::new("/nonexistent/sources.json")).is_err());
    }
}
