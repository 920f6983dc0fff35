//! mallcoord configuration types and loading

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, TemplateHandler};
use crate::coordinator::{CoordinatorConfig, Journal};
use crate::domain::Category;

/// Main mallcoord configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinator limits and buffers
    pub coordinator: CoordinatorConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Agent roster
    pub agents: AgentsConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Builds the agent roster once so bad templates, empty categories and
    /// name or category clashes are reported at startup.
    pub fn validate(&self) -> Result<()> {
        self.build_agents().map(|_| ())
    }

    /// Build every configured agent, built-ins first
    pub fn build_agents(&self) -> Result<Vec<Agent>> {
        let mut agents = if self.agents.builtin { Agent::builtin() } else { Vec::new() };

        for custom in &self.agents.custom {
            agents.push(custom.build()?);
        }

        let mut names = HashSet::new();
        let mut categories = HashSet::new();
        for agent in &agents {
            if !names.insert(agent.name()) {
                return Err(eyre!("Agent name {} is configured more than once", agent.name()));
            }
            if !categories.insert(agent.capability()) {
                return Err(eyre!(
                    "Category {} is claimed by more than one agent (second: {})",
                    agent.capability(),
                    agent.name()
                ));
            }
        }

        Ok(agents)
    }

    /// Journal for routed responses, if enabled
    pub fn journal(&self) -> Option<Journal> {
        self.storage
            .journal_enabled
            .then(|| Journal::new(self.storage.journal_path()))
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .mallcoord.yml
        let local_config = PathBuf::from(".mallcoord.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/mallcoord/mallcoord.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("mallcoord").join("mallcoord.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the response journal
    #[serde(rename = "journal-dir")]
    pub journal_dir: String,

    /// Whether routed responses are journaled
    #[serde(rename = "journal-enabled")]
    pub journal_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/mallcoord on Linux)
        let journal_dir = dirs::data_dir()
            .map(|d| d.join("mallcoord"))
            .unwrap_or_else(|| PathBuf::from(".mallcoord"))
            .to_string_lossy()
            .into_owned();

        Self {
            journal_dir,
            journal_enabled: true,
        }
    }
}

impl StorageConfig {
    /// Journal directory with ~/ expanded
    pub fn journal_path(&self) -> PathBuf {
        match self.journal_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.journal_dir)),
            None => PathBuf::from(&self.journal_dir),
        }
    }
}

/// Agent roster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Register Atlas, Aurora, Mercury and Sentinel
    pub builtin: bool,

    /// Additional template-backed agents
    pub custom: Vec<CustomAgentConfig>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            custom: Vec::new(),
        }
    }
}

/// A template-backed agent defined in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAgentConfig {
    pub name: String,
    pub category: String,

    /// Handlebars template with `agent`, `category` and `payload`
    pub template: String,

    #[serde(default)]
    pub description: String,
}

impl CustomAgentConfig {
    pub fn build(&self) -> Result<Agent> {
        if self.name.trim().is_empty() {
            return Err(eyre!("Custom agent name must not be empty"));
        }
        let category =
            Category::new(&self.category).with_context(|| format!("Invalid category for agent {}", self.name))?;
        let handler = TemplateHandler::new(&self.name, &self.template)?;

        Ok(Agent::new(&self.name, category, handler).with_description(&self.description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.agents.builtin);
        assert!(config.agents.custom.is_empty());
        assert!(config.storage.journal_enabled);
        assert_eq!(config.coordinator.inbox_buffer, 100);
        assert_eq!(config.build_agents().unwrap().len(), 4);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
coordinator:
  inbox-buffer: 8
  max-payload-size: 2048
  activity-capacity: 20

storage:
  journal-dir: /tmp/mallcoord-test
  journal-enabled: false

agents:
  builtin: true
  custom:
    - name: Concierge
      category: guest-services
      template: "{{agent}} will help with {{payload}}"
      description: Front desk requests
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.coordinator.inbox_buffer, 8);
        assert_eq!(config.coordinator.max_payload_size, 2048);
        assert_eq!(config.coordinator.channel_buffer, 1000);
        assert!(config.journal().is_none());
        assert_eq!(config.storage.journal_path(), PathBuf::from("/tmp/mallcoord-test"));

        let agents = config.build_agents().unwrap();
        assert_eq!(agents.len(), 5);
        assert_eq!(agents[4].name(), "Concierge");
        assert_eq!(agents[4].description(), "Front desk requests");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
agents:
  builtin: false
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert!(!config.agents.builtin);
        assert!(config.storage.journal_enabled);
        assert!(config.build_agents().unwrap().is_empty());
    }

    #[test]
    fn test_category_clash_rejected() {
        let yaml = r#"
agents:
  custom:
    - name: Festival
      category: mall-event
      template: "{{payload}}"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mall-event"));
    }

    #[test]
    fn test_name_clash_rejected() {
        let yaml = r#"
agents:
  builtin: false
  custom:
    - name: Desk
      category: a
      template: "{{payload}}"
    - name: Desk
      category: b
      template: "{{payload}}"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("Desk"));
    }

    #[test]
    fn test_bad_template_rejected() {
        let agent = CustomAgentConfig {
            name: "Broken".to_string(),
            category: "x".to_string(),
            template: "{{#each}}".to_string(),
            description: String::new(),
        };
        assert!(agent.build().is_err());
    }

    #[test]
    fn test_empty_category_rejected() {
        let agent = CustomAgentConfig {
            name: "Blank".to_string(),
            category: "  ".to_string(),
            template: "{{payload}}".to_string(),
            description: String::new(),
        };
        assert!(agent.build().unwrap_err().to_string().contains("Blank"));
    }

    #[test]
    fn test_journal_path_expands_home() {
        let storage = StorageConfig {
            journal_dir: "~/mall".to_string(),
            journal_enabled: true,
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.journal_path(), home.join("mall"));
        }
    }
}
