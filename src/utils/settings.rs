use log::warn;
use serde::{Deserialize, Serialize};

use super::storage::{KeyValueStore, load_json, save_json};
use super::word_list::WordMode;

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub word_mode: WordMode,
}

fn default_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            word_mode: WordMode::default(),
        }
    }
}

impl Settings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, SETTINGS_KEY) {
            Ok(Some(mut settings)) => {
                settings.migrate();
                settings
            }
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("{e:#}, using default settings");
                Settings::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> anyhow::Result<()> {
        save_json(store, SETTINGS_KEY, self)
    }

    fn migrate(&mut self) {
        if self.version == 0 {
            self.version = 1;
        }
    }
}
