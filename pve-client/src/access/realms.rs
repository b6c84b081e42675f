///! Authentication realms (`/access/domains`)
///!
///! The index is readable by anyone, but each realm's details need
///! `Realm.Allocate` or `Sys.Audit`. Without those, `list_realms` fails on
///! the first detail fetch; use `index_realms` instead.

use super::Resource;
use crate::error::Result;
use crate::form::IntoForm;
use crate::payload::Payload;
use crate::session::Session;
use pve_common::{IndexEntry, Realm};

impl Resource for Realm {
    const PATH: &'static str = "/access/domains";
    const ID_FIELD: &'static str = "realm";

    fn set_id(&mut self, id: &str) {
        self.name = id.to_string();
    }
}

impl Session {
    pub async fn index_realms(&self) -> Result<Vec<IndexEntry>> {
        self.index::<Realm>().await
    }

    pub async fn list_realms(&self) -> Result<Vec<Realm>> {
        self.list::<Realm>().await
    }

    pub async fn get_realm(&self, name: &str) -> Result<Realm> {
        self.fetch::<Realm>(name).await
    }

    pub async fn add_realm(&self, realm: impl IntoForm) -> Result<Payload> {
        self.create::<Realm>(realm).await
    }

    pub async fn edit_realm(&self, name: &str, realm: impl IntoForm) -> Result<Payload> {
        self.update::<Realm>(name, realm).await
    }

    pub async fn delete_realm(&self, name: &str) -> Result<()> {
        self.destroy::<Realm>(name).await
    }
}
