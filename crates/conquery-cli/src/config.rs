use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!("failed to read config file {}: {e}", config_path.display())
        })?;
        Self::from_toml(config_path, &raw)
    }

    pub fn from_toml(config_path: &Path, raw: &str) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let file: ConfigFile = toml::from_str(raw).map_err(|e| {
            anyhow::anyhow!("failed to parse config file {}: {e}", config_path.display())
        })?;
        file.validate()?;

        Ok(Self { config_dir, file })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub generate: Vec<GenerateJob>,
}

/// One `[[generate]]` entry: every `#[orm(external)]` query type found in the
/// `input` files is rendered into a single `output` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateJob {
    pub input: Vec<String>,
    pub output: String,
    /// Module the generated file imports the query types from.
    #[serde(default = "default_module")]
    pub module: String,
}

fn default_module() -> String {
    "super".to_string()
}

impl ConfigFile {
    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        let mut outputs = std::collections::HashSet::<&str>::new();
        for job in &self.generate {
            if job.input.is_empty() {
                anyhow::bail!("generate.input must not be empty (output: {})", job.output);
            }
            if job.output.trim().is_empty() {
                anyhow::bail!("generate.output must not be empty");
            }
            if job.module.trim().is_empty() {
                anyhow::bail!("generate.module must not be empty (output: {})", job.output);
            }
            if !outputs.insert(job.output.as_str()) {
                anyhow::bail!("duplicate generate.output: {}", job.output);
            }
        }

        Ok(())
    }
}
