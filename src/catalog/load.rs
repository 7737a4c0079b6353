use super::types::{Catalog, Scenario};
use std::fmt;
use std::path::{Path, PathBuf};

/// Catalog loading failure.
///
/// Both variants are fatal: the orchestrator never attempts partial
/// recovery from a missing or corrupt catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The locator resolved neither as a bundled resource nor as a
    /// filesystem path.
    NotFound { locator: String },
    /// The document was located but could not be parsed into scenarios.
    Parse {
        locator: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound { locator } => {
                write!(f, "scenario catalog not found: '{locator}'")
            }
            CatalogError::Parse { locator, source } => {
                write!(f, "cannot parse scenario catalog '{locator}': {source}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::NotFound { .. } => None,
            CatalogError::Parse { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Resolve a catalog locator in two ordered steps: first as a resource
/// bundled under `resources_dir`, then as a filesystem path (absolute or
/// relative to the working directory).
fn resolve_locator(locator: &str, resources_dir: &Path) -> Option<PathBuf> {
    let bundled = resources_dir.join(locator);
    if bundled.is_file() {
        return Some(bundled);
    }
    let direct = PathBuf::from(locator);
    if direct.is_file() {
        return Some(direct);
    }
    None
}

/// Load the scenario catalog named by `locator`, preserving declaration
/// order. Documents are YAML when the locator ends in `.yaml`/`.yml`,
/// JSON otherwise.
pub fn load_catalog(locator: &str, resources_dir: &Path) -> Result<Vec<Scenario>, CatalogError> {
    let path = resolve_locator(locator, resources_dir).ok_or_else(|| CatalogError::NotFound {
        locator: locator.to_string(),
    })?;

    let content = std::fs::read_to_string(&path).map_err(|e| CatalogError::Parse {
        locator: locator.to_string(),
        source: Box::new(e),
    })?;

    let catalog: Catalog = if locator.ends_with(".yaml") || locator.ends_with(".yml") {
        serde_yaml::from_str(&content).map_err(|e| CatalogError::Parse {
            locator: locator.to_string(),
            source: Box::new(e),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
            locator: locator.to_string(),
            source: Box::new(e),
        })?
    };

    validate(&catalog).map_err(|msg| CatalogError::Parse {
        locator: locator.to_string(),
        source: msg.into(),
    })?;

    Ok(catalog.scenarios)
}

/// Structural checks the serde model cannot express.
fn validate(catalog: &Catalog) -> Result<(), String> {
    for scenario in &catalog.scenarios {
        if scenario.query.is_empty() {
            return Err("scenario with empty 'query'".to_string());
        }
        if let Some(range) = &scenario.version {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(format!(
                        "scenario '{}': version min {min} exceeds max {max}",
                        scenario.query
                    ));
                }
            }
        }
        for (profile, expectation) in &scenario.expectations {
            if let (Some(min), Some(max)) = (expectation.min, expectation.max) {
                if min > max {
                    return Err(format!(
                        "scenario '{}', profile '{profile}': expectation min {min} exceeds max {max}",
                        scenario.query
                    ));
                }
            }
        }
        for fixture in &scenario.fixtures {
            if fixture.on_create_path.is_empty() || fixture.on_conflict_path.is_empty() {
                return Err(format!(
                    "scenario '{}': fixture requires both onCreatePath and onConflictPath",
                    scenario.query
                ));
            }
        }
    }
    Ok(())
}
