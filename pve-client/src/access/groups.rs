///! Permission groups (`/access/groups`)

use super::Resource;
use crate::error::Result;
use crate::form::IntoForm;
use crate::payload::Payload;
use crate::session::Session;
use pve_common::{Group, IndexEntry};

impl Resource for Group {
    const PATH: &'static str = "/access/groups";
    const ID_FIELD: &'static str = "groupid";

    // The per-group payload does not name the group.
    fn set_id(&mut self, id: &str) {
        self.name = id.to_string();
    }
}

impl Session {
    pub async fn index_groups(&self) -> Result<Vec<IndexEntry>> {
        self.index::<Group>().await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.list::<Group>().await
    }

    pub async fn get_group(&self, name: &str) -> Result<Group> {
        self.fetch::<Group>(name).await
    }

    pub async fn add_group(&self, group: impl IntoForm) -> Result<Payload> {
        self.create::<Group>(group).await
    }

    pub async fn edit_group(&self, name: &str, group: impl IntoForm) -> Result<Payload> {
        self.update::<Group>(name, group).await
    }

    pub async fn delete_group(&self, name: &str) -> Result<()> {
        self.destroy::<Group>(name).await
    }
}
