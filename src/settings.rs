use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub dark_mode: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self { dark_mode: false }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserSettings {
    theme: ThemeSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: ThemeSettings::default(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn theme(&self) -> ThemeSettings {
        self.data.read().unwrap().theme.clone()
    }

    pub fn update_theme(&self, settings: ThemeSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.theme = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
