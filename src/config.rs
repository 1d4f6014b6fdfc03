use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub env_name: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Trace tokens and the parsed tree to stderr before evaluating.
    #[serde(default)]
    pub debug: bool,
    /// Print the parsed tree instead of evaluating it.
    #[serde(default)]
    pub print_ast: bool,
}

fn default_prompt() -> String {
    String::from("> ")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            env_name: env_name(),
            prompt: default_prompt(),
            debug: false,
            print_ast: false,
        }
    }
}

impl Config {
    /// Loads the config for the current environment. A missing or malformed
    /// file falls back to defaults; environment overrides apply on top.
    pub fn load() -> Self {
        let config = fs::read_to_string(Self::get_config_path())
            .ok()
            .and_then(|contents| Self::from_json(&contents))
            .unwrap_or_default();

        config.with_env_overrides()
    }

    pub fn from_json(contents: &str) -> Option<Self> {
        serde_json::from_str(contents).ok()
    }

    pub fn to_json(&self) -> io::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self) -> io::Result<()> {
        let config_path = Self::get_config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, self.to_json()?)
    }

    pub fn get_config_path() -> PathBuf {
        let home = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        PathBuf::from(env::var(home).unwrap_or_else(|_| String::from(".")))
            .join(".lox")
            .join(env_name())
            .join("config.json")
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(debug) = env::var("LOX_DEBUG") {
            self.debug = parse_flag(&debug);
        }
        if let Ok(prompt) = env::var("LOX_PROMPT") {
            self.prompt = prompt;
        }
        self
    }
}

fn env_name() -> String {
    env::var("LOX_ENV").unwrap_or_else(|_| String::from("default"))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_json(r#"{ "env_name": "dev" }"#).unwrap();
        assert_eq!(config.env_name, "dev");
        assert_eq!(config.prompt, "> ");
        assert!(!config.debug);
        assert!(!config.print_ast);
    }

    #[test]
    fn json_round_trip() {
        let config = Config {
            env_name: "ci".into(),
            prompt: "lox> ".into(),
            debug: true,
            print_ast: true,
        };
        let json = config.to_json().unwrap();
        assert_eq!(Config::from_json(&json), Some(config));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert_eq!(Config::from_json("{ not json"), None);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" on "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
    }
}
