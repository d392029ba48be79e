//! Provider settings persisted next to the collections.

use serde::Serialize;

use closet_core::error::Result;
use closet_core::Provider;

use crate::storage::{KeyValueStore, API_KEY_KEY, PROVIDER_KEY};
use crate::wardrobe::Wardrobe;

/// The user's provider choice and API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Empty when no key has been saved.
    pub api_key: String,
    pub provider: Provider,
}

impl<S: KeyValueStore> Wardrobe<S> {
    /// Read the stored settings. A missing key reads as empty; a missing or
    /// unrecognized provider reads as [`Provider::Gemini`].
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    pub fn settings(&self) -> Result<Settings> {
        let api_key = self.storage().get(API_KEY_KEY)?.unwrap_or_default();
        let provider = match self.storage().get(PROVIDER_KEY)? {
            Some(name) => name.parse().unwrap_or_else(|_| {
                tracing::warn!(stored = %name, "ignoring unknown provider setting");
                Provider::default()
            }),
            None => Provider::default(),
        };
        Ok(Settings { api_key, provider })
    }

    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        self.storage_mut().put(API_KEY_KEY, key.trim())
    }

    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_provider(&mut self, provider: Provider) -> Result<()> {
        self.storage_mut().put(PROVIDER_KEY, provider.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn defaults_when_nothing_stored() {
        let store = Wardrobe::open(MemoryStorage::new()).unwrap();
        let settings = store.settings().unwrap();
        assert_eq!(settings.api_key, "");
        assert_eq!(settings.provider, Provider::Gemini);
    }

    #[test]
    fn settings_survive_reopen() {
        let mut store = Wardrobe::open(MemoryStorage::new()).unwrap();
        store.set_api_key("  sk-test  ").unwrap();
        store.set_provider(Provider::OpenAi).unwrap();

        let store = Wardrobe::open(store.close().unwrap()).unwrap();
        let settings = store.settings().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.provider, Provider::OpenAi);
    }

    #[test]
    fn unknown_stored_provider_falls_back_to_gemini() {
        let mut storage = MemoryStorage::new();
        storage.put(PROVIDER_KEY, "anthropic").unwrap();

        let store = Wardrobe::open(storage).unwrap();
        assert_eq!(store.settings().unwrap().provider, Provider::Gemini);
    }
}
