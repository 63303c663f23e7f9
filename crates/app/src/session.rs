use std::{collections::BTreeMap, fs, path::PathBuf};

use api_types::user::User;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

const USER_KEY: &str = "user";

/// Small JSON-file key-value store. Values are opaque to the store.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_all()?.remove(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// The signed-in user, persisted between runs.
#[derive(Debug, Clone)]
pub struct Session {
    store: KeyValueStore,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: KeyValueStore::new(path),
        }
    }

    pub fn user(&self) -> Result<Option<User>> {
        self.store.get(USER_KEY)
    }

    pub fn sign_in(&self, user: &User) -> Result<()> {
        self.store.set(USER_KEY, user)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_sessions")
            .join(format!("session_{}.json", uuid::Uuid::new_v4()))
    }

    fn alice() -> User {
        User {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[test]
    fn missing_file_means_signed_out() {
        let session = Session::new(temp_path());
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn sign_in_persists_across_instances() {
        let path = temp_path();
        Session::new(&path).sign_in(&alice()).unwrap();

        let reopened = Session::new(&path);
        assert_eq!(reopened.user().unwrap(), Some(alice()));

        reopened.sign_out().unwrap();
        assert_eq!(Session::new(&path).user().unwrap(), None);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn other_keys_survive_sign_out() {
        let path = temp_path();
        let store = KeyValueStore::new(&path);
        store.set("theme", &"dark").unwrap();

        let session = Session::new(&path);
        session.sign_in(&alice()).unwrap();
        session.sign_out().unwrap();

        assert_eq!(store.get::<String>("theme").unwrap().as_deref(), Some("dark"));
        let _ = fs::remove_file(path);
    }
}
