///! Typed access to `/access` resources
///!
///! Each family (realms, groups, roles, users) implements [`Resource`] and
///! gets the same five operations: list, get, add, edit, delete. `list`
///! expands the index: one request for the sparse index, then one `get` per
///! identifier, in index order.

mod groups;
mod realms;
mod roles;
mod users;

use crate::error::{ClientError, Result};
use crate::form::IntoForm;
use crate::payload::{decode_record, string_field, Payload};
use crate::session::Session;
use pve_common::IndexEntry;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// A resource family under `/access`
pub trait Resource: DeserializeOwned + Send + Sized {
    /// Endpoint prefix, e.g. `/access/groups`
    const PATH: &'static str;
    /// Identifier field in index entries and form bodies
    const ID_FIELD: &'static str;

    /// Overwrite the identifier with the one the record was fetched by
    fn set_id(&mut self, id: &str);

    /// Build a record from a per-id payload
    fn decode(id: &str, data: Map<String, Value>) -> Result<Self> {
        let mut record: Self = decode_record(data)?;
        record.set_id(id);
        Ok(record)
    }
}

pub(crate) fn resource_path<T: Resource>(id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(ClientError::invalid(format!("empty id for {}", T::PATH)));
    }
    Ok(format!("{}/{}", T::PATH, urlencoding::encode(id)))
}

impl Session {
    /// Subdirectories of `/access`, e.g. `["users", "groups", ...]`
    pub async fn access_subdirs(&self) -> Result<Vec<String>> {
        self.get("/access")
            .await?
            .into_objects()?
            .iter()
            .map(|entry| string_field(entry, "subdir").map(str::to_string))
            .collect()
    }

    /// Sparse index of a family, without fetching each record
    pub async fn index<T: Resource>(&self) -> Result<Vec<IndexEntry>> {
        self.get(T::PATH).await?.into_objects()
    }

    /// Index followed by one `get` per identifier. Fails on the first
    /// failed fetch; partial results are dropped.
    pub async fn list<T: Resource>(&self) -> Result<Vec<T>> {
        let index = self.index::<T>().await?;
        let mut records = Vec::with_capacity(index.len());
        for entry in &index {
            let id = string_field(entry, T::ID_FIELD)?;
            debug!(path = T::PATH, id, "expanding index entry");
            records.push(self.fetch::<T>(id).await?);
        }
        Ok(records)
    }

    /// One record by identifier
    pub async fn fetch<T: Resource>(&self, id: &str) -> Result<T> {
        let data = self.get(&resource_path::<T>(id)?).await?.into_object()?;
        T::decode(id, data)
    }

    /// Create a record; returns the server's reply
    pub async fn create<T: Resource>(&self, record: impl IntoForm) -> Result<Payload> {
        self.post_form(T::PATH, &record.into_form()).await
    }

    /// Modify a record. The identifier travels in the path, so it is
    /// dropped from the body.
    pub async fn update<T: Resource>(&self, id: &str, record: impl IntoForm) -> Result<Payload> {
        let path = resource_path::<T>(id)?;
        let mut form = record.into_form();
        form.remove(T::ID_FIELD);
        self.post_form(&path, &form).await
    }

    pub async fn destroy<T: Resource>(&self, id: &str) -> Result<()> {
        self.delete(&resource_path::<T>(id)?).await?;
        Ok(())
    }
}
