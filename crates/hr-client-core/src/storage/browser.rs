use anyhow::{anyhow, Context};

use super::SessionStorage;

/// `window.localStorage` of the current page
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage() -> anyhow::Result<web_sys::Storage> {
        let window = web_sys::window().context("no window found")?;
        window
            .local_storage()
            .map_err(|e| anyhow!("local storage not accessible: {e:?}"))?
            .context("local storage not available")
    }
}

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| anyhow!("failed to read {key:?} from local storage: {e:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| anyhow!("failed to write {key:?} to local storage: {e:?}"))
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        Self::local_storage()?
            .remove_item(key)
            .map_err(|e| anyhow!("failed to remove {key:?} from local storage: {e:?}"))
    }
}
