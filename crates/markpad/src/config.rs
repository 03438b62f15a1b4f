use anyhow::Result;
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

use mdview::MarkdownStyles;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub editor: EditorConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub syntax_theme: String,
    /// Borders, the action bar and the preview frame.
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Raw-source text when syntax highlighting is off.
    #[serde(default)]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub highlight_source: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub show_on_start: bool,
    #[serde(default)]
    pub heading_color: Option<String>,
    #[serde(default)]
    pub link_color: Option<String>,
    #[serde(default)]
    pub mail_to_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme {
                name: String::from("dark"),
                syntax_theme: String::from("base16-ocean.dark"),
                accent_color: Some(String::from("#52C2AF")),
                text_color: None,
            },
            editor: EditorConfig {
                tab_size: 4,
                highlight_source: true,
                placeholder: String::from("Write a long message"),
            },
            preview: PreviewConfig {
                show_on_start: false,
                heading_color: Some(String::from("#800080")),
                link_color: Some(String::from("#FFC0CB")),
                mail_to_color: Some(String::from("#FFA500")),
                text_color: Some(String::from("#555555")),
            },
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                // Keep the broken file around for inspection
                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to create config directory {}: {}",
                        parent.display(),
                        e
                    )
                })?;
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!("Failed to write config {}: {}", config_path.display(), e)
            })?;
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones.
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
            has_issues = true;
        }

        if self.theme.name.is_empty() {
            log::warn!("Empty theme name, using default");
            self.theme.name = "dark".to_string();
            has_issues = true;
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = "base16-ocean.dark".to_string();
            has_issues = true;
        }

        for color in [
            &mut self.theme.accent_color,
            &mut self.theme.text_color,
            &mut self.preview.heading_color,
            &mut self.preview.link_color,
            &mut self.preview.mail_to_color,
            &mut self.preview.text_color,
        ] {
            if let Some(value) = color {
                if parse_hex_color(value).is_none() {
                    log::warn!("Invalid color value: {}, ignoring", value);
                    *color = None;
                    has_issues = true;
                }
            }
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    /// The accent color used for borders and buttons.
    pub fn accent(&self) -> Color {
        self.theme
            .accent_color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(Color::Rgb(82, 194, 175))
    }

    pub fn input_text_color(&self) -> Option<Color> {
        self.theme.text_color.as_deref().and_then(parse_hex_color)
    }

    /// The preview style configuration handed to the markup renderer.
    pub fn markdown_styles(&self) -> MarkdownStyles {
        let defaults = MarkdownStyles::default();
        MarkdownStyles {
            heading: self
                .preview
                .heading_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(defaults.heading),
            link: self
                .preview
                .link_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(defaults.link),
            mail_to: self
                .preview
                .mail_to_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(defaults.mail_to),
            text: self
                .preview
                .text_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(defaults.text),
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("MARKPAD_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("MARKPAD_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "markpad", "markpad")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

/// Parses `#RRGGBB` into a terminal color.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
