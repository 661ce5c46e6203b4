use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::{annotate_toml_array_of_tables, annotate_toml_table},
    dialect::Dialect,
    error::{ConfigError, Result},
    options::{DialectOptions, DEFAULT_MAX_PAGE_SIZE},
};

/// sqlward configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQL dialect shared by every table: sqlite, postgres, mysql or sqlserver.
    pub dialect: Dialect,

    /// Largest page size accepted by paginated selects.
    /// Default: 1000
    pub max_page_size: Option<u64>,

    /// Whitelisted tables.
    pub tables: Vec<TableConfig>,
}

/// A whitelisted table.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Documented, DocumentedFields)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table name. May be schema-qualified (`schema.table`).
    pub name: String,

    /// Columns that filters, ordering and writes may reference.
    pub columns: Vec<String>,

    /// Column holding generated identifiers, reported by inserts.
    pub id_column: Option<String>,

    /// Override for the dialect's bound parameter ceiling.
    pub max_params: Option<usize>,

    /// Override for the dialect's per-statement INSERT row ceiling.
    pub max_insert_rows: Option<usize>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("SQLWARD_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("sqlward").join("config.toml"),
    })
});

fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".config")
        })
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            dialect: Dialect::Sqlite,
            max_page_size: Some(DEFAULT_MAX_PAGE_SIZE),
            tables: vec![TableConfig {
                name: "users".to_string(),
                columns: ["id", "name", "email", "created_at"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                id_column: Some("id".to_string()),
                max_params: None,
                max_insert_rows: None,
            }],
        }
    }

    /// Loads the configuration from [`CONFIG_PATH`], falling back to the
    /// default configuration when the file does not exist.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;
        Ok(config)
    }

    /// Loads and resolves the configuration file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.resolve()?;
        Ok(config)
    }

    /// Fills defaults and checks that every table yields valid options.
    pub fn resolve(&mut self) -> Result<()> {
        self.max_page_size.get_or_insert(DEFAULT_MAX_PAGE_SIZE);

        let mut seen = HashSet::new();
        for table in &self.tables {
            if !seen.insert(table.name.as_str()) {
                return Err(ConfigError::DuplicateTable(table.name.clone()));
            }
        }

        for table in &self.tables {
            self.build_options(table)?;
        }

        Ok(())
    }

    pub fn get_table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Dialect options for the configured table `name`.
    pub fn options_for(&self, name: &str) -> Result<DialectOptions> {
        let table = self
            .get_table(name)
            .ok_or_else(|| ConfigError::MissingTable(name.to_string()))?;
        self.build_options(table)
    }

    fn build_options(&self, table: &TableConfig) -> Result<DialectOptions> {
        let options = DialectOptions::new(self.dialect, &table.name, &table.columns)?;

        let mut overrides: Vec<(&str, JsonValue)> = Vec::new();
        if let Some(id_column) = &table.id_column {
            overrides.push(("id_column", json!(id_column)));
        }
        if let Some(max_params) = table.max_params {
            overrides.push(("max_params", json!(max_params)));
        }
        if let Some(max_insert_rows) = table.max_insert_rows {
            overrides.push(("max_insert_rows", json!(max_insert_rows)));
        }
        if let Some(max_page_size) = self.max_page_size {
            overrides.push(("max_page_size", json!(max_page_size)));
        }

        options.reconfigure(overrides)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serialized)?;
        Ok(())
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(tables) = doc
            .get_mut("tables")
            .and_then(|item| item.as_array_of_tables_mut())
        {
            annotate_toml_array_of_tables::<TableConfig>(tables)?;
        }

        Ok(doc)
    }
}

/// Writes an annotated default configuration to [`CONFIG_PATH`].
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = CONFIG_PATH.read().unwrap().to_path_buf();
    generate_default_config_at(&config_path)?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(config_path)
}

pub fn generate_default_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, annotated_doc.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    fn table(name: &str) -> TableConfig {
        TableConfig {
            name: name.to_string(),
            columns: vec!["id".to_string(), "title".to_string()],
            id_column: None,
            max_params: None,
            max_insert_rows: None,
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.dialect, Dialect::Sqlite);
        assert_eq!(config.max_page_size, Some(1000));
        assert!(config.get_table("users").is_some());
    }

    #[test]
    fn test_options_for_applies_overrides() {
        let mut config = Config::default_config();
        config.dialect = Dialect::SqlServer;
        config.max_page_size = Some(50);
        config.tables.push(TableConfig {
            max_params: Some(100),
            max_insert_rows: Some(10),
            id_column: Some("id".to_string()),
            ..table("posts")
        });

        let options = config.options_for("posts").unwrap();
        assert_eq!(options.dialect(), Dialect::SqlServer);
        assert_eq!(options.max_params(), 100);
        assert_eq!(options.max_insert_rows(), Some(10));
        assert_eq!(options.max_page_size(), 50);
        assert_eq!(options.id_column(), Some("id"));

        let users = config.options_for("users").unwrap();
        assert_eq!(users.max_params(), 2_099);
    }

    #[test]
    fn test_options_for_missing_table() {
        let config = Config::default_config();
        let result = config.options_for("nope");
        assert!(matches!(result, Err(ConfigError::MissingTable(_))));
    }

    #[test]
    fn test_resolve_duplicate_table() {
        let mut config = Config::default_config();
        config.tables.push(table("posts"));
        config.tables.push(table("posts"));

        let result = config.resolve();
        assert!(matches!(result, Err(ConfigError::DuplicateTable(_))));
    }

    #[test]
    fn test_resolve_invalid_table() {
        let mut config = Config::default_config();
        config.tables.push(TableConfig {
            max_params: Some(0),
            ..table("posts")
        });

        let result = config.resolve();
        assert!(matches!(result, Err(ConfigError::InvalidOptionValue { .. })));
    }

    #[test]
    fn test_resolve_sets_defaults() {
        let mut config = Config::default_config();
        config.max_page_size = None;

        config.resolve().unwrap();

        assert_eq!(config.max_page_size, Some(DEFAULT_MAX_PAGE_SIZE));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let content = r#"
            dialect = "postgres"
            timeout = 5

            [[tables]]
            name = "users"
            columns = ["id"]
        "#;

        let result: std::result::Result<Config, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default_config();
        config.dialect = Dialect::Postgres;
        config.save_to(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.dialect, Dialect::Postgres);
        assert_eq!(loaded.tables, config.tables);
    }

    #[test]
    fn test_generate_default_config_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        generate_default_config_at(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, Config::default_config());

        let again = generate_default_config_at(&path);
        assert!(matches!(again, Err(ConfigError::ConfigAlreadyExists)));
    }

    #[test]
    #[serial]
    fn test_xdg_config_home_env_override() {
        with_env(vec![("XDG_CONFIG_HOME", "/custom/config")], || {
            assert_eq!(xdg_config_home(), PathBuf::from("/custom/config"));
        });
    }
}
