use std::{collections::HashMap, ffi::OsString, io::ErrorKind, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::{errors::StorageError, kv_store::KeyValueStore};

/// JSON file-backed string map.
///
/// The whole map is loaded on open and rewritten after every mutation,
/// which suits a handful of small values such as session credentials.
#[derive(Clone)]
pub struct JsonFileStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`. Creates the file with an empty map if missing;
    /// content that is not a JSON string map is treated as empty. Other read
    /// failures are returned and leave the file untouched.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, StorageError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(event = "store_corrupt", path = %file_path.display(), error = %e, "ignoring unreadable store contents");
                HashMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty: HashMap<String, String> = HashMap::new();
                write_replace(&file_path, serde_json::to_vec(&empty)?).await?;
                empty
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(map)), file_path }))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn save(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_vec(map)?;
        write_replace(&self.file_path, data).await
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// Readers see either the old or the new contents, never a partial write.
async fn write_replace(path: &Path, data: Vec<u8>) -> Result<(), StorageError> {
    let staging = staging_path(path);
    fs::write(&staging, data).await?;
    fs::rename(&staging, path).await?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value.to_string());
        self.save(&map).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut map = self.inner.write().await;
        let existed = map.remove(key).is_some();
        if existed {
            self.save(&map).await?;
        }
        Ok(existed)
    }
}
