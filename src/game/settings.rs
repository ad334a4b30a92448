//! Persisted user settings and the storage port they go through.

use micromap::Map;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, FromRepr, IntoStaticStr};
use tracing::{debug, warn};

use crate::error::{GameResult, StorageError};

/// Names of the stored settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCountMacro, IntoStaticStr)]
pub enum SettingKey {
    #[strum(serialize = "HIGHDSCORE")]
    HighScore,
    #[strum(serialize = "OPERATION")]
    Operation,
    #[strum(serialize = "EXTRA_MODE")]
    ExtraMode,
    #[strum(serialize = "DEBUG_MODE")]
    DebugMode,
    #[strum(serialize = "LANGUAGE")]
    Language,
    #[strum(serialize = "SETTING")]
    Setting,
}

/// Which input the player steers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, FromRepr)]
#[repr(u8)]
pub enum OperationMode {
    #[default]
    Swipe = 0,
    Touch,
    Accel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, FromRepr)]
#[repr(u8)]
pub enum Language {
    #[default]
    English = 0,
    Japanese,
}

/// Whether stored settings survive the next launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, FromRepr)]
#[repr(u8)]
pub enum ResetSetting {
    /// Start from defaults on the next load.
    #[default]
    Clear = 0,
    Keep,
}

/// Integer key-value storage for settings. Missing keys read as `None`.
pub trait SettingsStorage {
    fn get(&self, key: SettingKey) -> Result<Option<i64>, StorageError>;
    fn set(&mut self, key: SettingKey, value: i64) -> Result<(), StorageError>;
}

/// Settings storage kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: Map<SettingKey, i64, { SettingKey::COUNT }>,
}

impl SettingsStorage for MemoryStorage {
    fn get(&self, key: SettingKey) -> Result<Option<i64>, StorageError> {
        Ok(self.values.get(&key).copied())
    }

    fn set(&mut self, key: SettingKey, value: i64) -> Result<(), StorageError> {
        self.values.insert(key, value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub high_score: u32,
    pub operation_mode: OperationMode,
    /// Plays the alternate maze.
    pub extra_mode: bool,
    pub debug_mode: bool,
    pub language: Language,
    pub reset_setting: ResetSetting,
}

impl Settings {
    /// Reads every setting from `storage`, treating missing keys as zero.
    ///
    /// When the stored reset policy is [`ResetSetting::Clear`] the defaults are returned
    /// instead; storage is left untouched until the next [`Settings::save`].
    pub fn load(storage: &dyn SettingsStorage) -> GameResult<Self> {
        let mut settings = Self::default();
        for key in SettingKey::iter() {
            let value = storage.get(key)?.unwrap_or(0);
            if let Err(error) = settings.apply(key, value) {
                warn!(%error, "Ignoring stored setting");
            }
        }

        if settings.reset_setting == ResetSetting::Clear {
            debug!("Stored settings are set to clear, using defaults");
            return Ok(Self::default());
        }

        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    pub fn save(&self, storage: &mut dyn SettingsStorage) -> GameResult<()> {
        for key in SettingKey::iter() {
            storage.set(key, self.value_of(key))?;
        }
        Ok(())
    }

    /// Score at which the single extra life is awarded.
    pub fn extend_score(&self) -> u32 {
        match self.language {
            Language::English => 20_000,
            Language::Japanese => 10_000,
        }
    }

    fn value_of(&self, key: SettingKey) -> i64 {
        match key {
            SettingKey::HighScore => i64::from(self.high_score),
            SettingKey::Operation => self.operation_mode as i64,
            SettingKey::ExtraMode => i64::from(self.extra_mode),
            SettingKey::DebugMode => i64::from(self.debug_mode),
            SettingKey::Language => self.language as i64,
            SettingKey::Setting => self.reset_setting as i64,
        }
    }

    fn apply(&mut self, key: SettingKey, value: i64) -> Result<(), StorageError> {
        let out_of_range = || StorageError::OutOfRange { key: key.into(), value };
        let repr = || u8::try_from(value).map_err(|_| out_of_range());

        match key {
            SettingKey::HighScore => self.high_score = u32::try_from(value).map_err(|_| out_of_range())?,
            SettingKey::Operation => self.operation_mode = OperationMode::from_repr(repr()?).ok_or_else(out_of_range)?,
            SettingKey::ExtraMode => self.extra_mode = Self::flag(value).ok_or_else(out_of_range)?,
            SettingKey::DebugMode => self.debug_mode = Self::flag(value).ok_or_else(out_of_range)?,
            SettingKey::Language => self.language = Language::from_repr(repr()?).ok_or_else(out_of_range)?,
            SettingKey::Setting => self.reset_setting = ResetSetting::from_repr(repr()?).ok_or_else(out_of_range)?,
        }
        Ok(())
    }

    fn flag(value: i64) -> Option<bool> {
        match value {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}
