//! Generator configuration loading from YAML files
//!
//! Settings that would otherwise be repeated on every command line (import
//! search path, extra package overrides) can be kept in a YAML file:
//!
//! ```yaml
//! version: 1
//! extension: ".proto"
//! import_paths: ["third_party"]
//! package_overrides:
//!   acme.common: com.acme.shared
//! lenient_syntax: false
//! ```

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_EXTENSION: &str = ".proto";

/// Root structure of a generator configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// File name suffix of interface-definition files
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Roots searched, in order, for imported files
    #[serde(default)]
    pub import_paths: Vec<PathBuf>,
    /// Extra proto package → output package mappings
    #[serde(default)]
    pub package_overrides: BTreeMap<String, String>,
    /// Skip files the grammar cannot match instead of failing
    #[serde(default)]
    pub lenient_syntax: bool,
}

fn default_version() -> u32 {
    1
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            extension: default_extension(),
            import_paths: Vec::new(),
            package_overrides: BTreeMap::new(),
            lenient_syntax: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    ///
    /// Relative import paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent() {
            config.import_paths = config
                .import_paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Append an import search root
    pub fn with_import_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_paths.push(path.into());
        self
    }

    /// Add a proto package → output package mapping
    pub fn with_package_override(mut self, proto_package: &str, output_package: &str) -> Self {
        self.package_overrides
            .insert(proto_package.to_string(), output_package.to_string());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GeneratorError::Config(format!(
                "Unsupported config version: {}",
                self.version
            )));
        }
        if self.extension.is_empty() {
            return Err(GeneratorError::Config(
                "File extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_mapping() {
        let config = GeneratorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.extension, ".proto");
        assert!(!config.lenient_syntax);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
version: 1
extension: ".proto3"
import_paths: ["/opt/protos", "vendor"]
package_overrides:
  acme.common: com.acme.shared
lenient_syntax: true
"#;
        let config = GeneratorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.extension, ".proto3");
        assert_eq!(config.import_paths.len(), 2);
        assert_eq!(
            config.package_overrides.get("acme.common"),
            Some(&"com.acme.shared".to_string())
        );
        assert!(config.lenient_syntax);
    }

    #[test]
    fn test_unsupported_version() {
        let err = GeneratorConfig::from_yaml("version: 2").unwrap_err();
        assert!(matches!(err, GeneratorError::Config(_)));
    }

    #[test]
    fn test_load_resolves_relative_import_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "import_paths: [\"third_party\", \"/abs/protos\"]").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.import_paths[0], dir.path().join("third_party"));
        assert_eq!(config.import_paths[1], PathBuf::from("/abs/protos"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/generator.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
