//! Scenario catalogs.
//!
//! The built-in catalog covers the posts/comments contract. Alternative
//! catalogs are loaded from YAML or JSON files, picked by extension, and may
//! carry their own harness settings.

mod builtin;

pub use builtin::{MALFORMED_CONTENT_TYPE, builtin_catalog, builtin_scenarios};

use std::path::{Path, PathBuf};

use restcheck_domain::{DomainError, HarnessSettings, Scenario, ScenarioCatalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Catalog path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for a catalog.
    #[error("invalid YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file is not valid JSON for a catalog.
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// The extension is neither YAML nor JSON.
    #[error("unsupported catalog format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedExtension(String),

    /// The catalog parsed but is not valid.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// On-disk catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Settings overriding the defaults for this catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<HarnessSettings>,
    /// Scenarios in run order.
    pub scenarios: Vec<Scenario>,
}

/// A validated catalog and the settings it declared.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    /// The scenarios.
    pub catalog: ScenarioCatalog,
    /// Settings from the file, if any.
    pub settings: Option<HarnessSettings>,
}

/// Catalog file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl CatalogFormat {
    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnsupportedExtension` for anything else.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(CatalogError::UnsupportedExtension(ext)),
        }
    }
}

/// Parses catalog text in the given format and validates it.
///
/// # Errors
///
/// Returns a parse error, or `CatalogError::Domain` for empty or duplicate
/// scenarios and invalid settings.
pub fn parse_catalog(text: &str, format: CatalogFormat) -> Result<LoadedCatalog, CatalogError> {
    let file: CatalogFile = match format {
        CatalogFormat::Yaml => serde_yaml::from_str(text)?,
        CatalogFormat::Json => serde_json::from_str(text)?,
    };
    if let Some(settings) = &file.settings {
        settings.validate()?;
    }
    let catalog = ScenarioCatalog::new(file.scenarios)?;
    Ok(LoadedCatalog {
        catalog,
        settings: file.settings,
    })
}

/// Reads and parses a catalog file.
///
/// # Errors
///
/// See [`parse_catalog`]; also fails if the file cannot be read or has an
/// unknown extension.
pub async fn load_catalog(path: &Path) -> Result<LoadedCatalog, CatalogError> {
    let format = CatalogFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let loaded = parse_catalog(&text, format)?;
    debug!(
        path = %path.display(),
        scenarios = loaded.catalog.scenarios.len(),
        "catalog loaded"
    );
    Ok(loaded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{Assertion, Endpoint, HttpMethod, Payload};

    const YAML: &str = r"
settings:
  base_url: http://localhost:8080
  timeout_secs: 5
scenarios:
  - name: GET post
    fixtures:
      - label: post 3
        method: GET
        endpoint:
          resource: post
          id: 3
        expect:
          - type: status_code
            expected: 200
          - type: body_contains_keys
            keys: [userId, title]
  - name: POST comment
    fixtures:
      - label: comment
        method: POST
        endpoint:
          resource: post_comments
          post_id: 1
        payload:
          postId: 1
          name: n
          email: e@example.com
          body: b
        expect:
          - type: status_code
            expected: [200, 201]
          - type: body_not_empty
";

    #[test]
    fn test_parse_yaml_catalog() {
        let loaded = parse_catalog(YAML, CatalogFormat::Yaml).unwrap();

        let settings = loaded.settings.unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.max_concurrent_reads, 4);

        let get = &loaded.catalog.scenarios[0].fixtures[0];
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.endpoint, Endpoint::Post { id: 3 });
        assert_eq!(get.content_type, "application/json");
        assert_eq!(get.expect[0], Assertion::status(200));

        let comment = &loaded.catalog.scenarios[1].fixtures[0];
        assert!(matches!(comment.payload, Some(Payload::Comment(_))));
        assert_eq!(comment.expect[0], Assertion::status_one_of(&[200, 201]));
    }

    #[test]
    fn test_parse_json_catalog() {
        let json = serde_json::to_string(&CatalogFile {
            settings: None,
            scenarios: builtin_scenarios(),
        })
        .unwrap();

        let loaded = parse_catalog(&json, CatalogFormat::Json).unwrap();
        assert!(loaded.settings.is_none());
        assert_eq!(loaded.catalog, builtin_catalog());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = r"
scenarios:
  - name: same
    fixtures:
      - { label: a, method: GET, endpoint: { resource: posts } }
  - name: same
    fixtures:
      - { label: b, method: GET, endpoint: { resource: posts } }
";
        let err = parse_catalog(yaml, CatalogFormat::Yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Domain(DomainError::InvalidScenario(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("a.YML")).unwrap(),
            CatalogFormat::Yaml
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("dir/a.json")).unwrap(),
            CatalogFormat::Json
        );
        assert!(matches!(
            CatalogFormat::from_path(Path::new("a.toml")),
            Err(CatalogError::UnsupportedExtension(ext)) if ext == "toml"
        ));
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, YAML).unwrap();

        let loaded = load_catalog(&path).await.unwrap();
        assert_eq!(loaded.catalog.case_count(), 2);

        let missing = load_catalog(&dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }
}
