use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// JSON-файл учёта проката
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_file: String,
}

/// Текстовые файлы каталога фильмов
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub suppliers_file: String,
    pub films_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: "cinema_rental_data.json".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            suppliers_file: "suppliers.txt".to_string(),
            films_file: "films.txt".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[storage]
data_file = "cinema_rental_data.json"

[catalog]
suppliers_file = "suppliers.txt"
films_file = "films.txt"
"#;

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Some(exe_dir) = exe_dir() {
        let config_path = exe_dir.join("config.toml");

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::warn!("config.toml not found at: {}", config_path.display());
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn get_data_file_path(config: &Config) -> PathBuf {
    resolve_path(&config.storage.data_file)
}

pub fn get_suppliers_file_path(config: &Config) -> PathBuf {
    resolve_path(&config.catalog.suppliers_file)
}

pub fn get_films_file_path(config: &Config) -> PathBuf {
    resolve_path(&config.catalog.films_file)
}

/// Resolves relative paths relative to the executable directory
fn resolve_path(value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match exe_dir() {
        Some(dir) => dir.join(path),
        // Fallback: relative to current directory
        None => path.to_path_buf(),
    }
}

fn exe_dir() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    exe_path.parent().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.storage.data_file, "cinema_rental_data.json");
        assert_eq!(config.catalog.suppliers_file, "suppliers.txt");
        assert_eq!(config.catalog.films_file, "films.txt");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[catalog]\nsuppliers_file = \"s.txt\"\nfilms_file = \"f.txt\"\n").unwrap();
        assert_eq!(config.storage.data_file, "cinema_rental_data.json");
        assert_eq!(config.catalog.films_file, "f.txt");
    }

    #[test]
    fn test_relative_paths_resolve_next_to_exe() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        let path = get_films_file_path(&config);
        assert!(path.is_absolute());
        assert!(path.ends_with("films.txt"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let absolute = std::env::temp_dir().join("data.json");
        let toml = format!("[storage]\ndata_file = {:?}\n", absolute.display().to_string());
        let config = parse_config(&toml).unwrap();
        assert_eq!(get_data_file_path(&config), absolute);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(parse_config("[storage\n").is_err());
    }
}
