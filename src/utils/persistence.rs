use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::errors::StoreError;
use crate::subscription::{Payment, Subscription};

/// Writes records to disk atomically by staging to a temporary file.
pub fn save_records<T: Serialize>(records: &[T], path: &Path) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    debug!(path = %path.display(), count = records.len(), "saved records");
    Ok(())
}

/// Loads a JSON array of records, returning structured errors on failure.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let data = fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&data)?;
    debug!(path = %path.display(), count = records.len(), "loaded records");
    Ok(records)
}

pub fn load_subscriptions(path: &Path) -> Result<Vec<Subscription>, StoreError> {
    load_records(path)
}

pub fn load_payments(path: &Path) -> Result<Vec<Payment>, StoreError> {
    load_records(path)
}
