///! Roles (`/access/roles`)

use super::Resource;
use crate::error::Result;
use crate::form::IntoForm;
use crate::payload::Payload;
use crate::session::Session;
use pve_common::{IndexEntry, Role};
use serde_json::{Map, Value};

impl Resource for Role {
    const PATH: &'static str = "/access/roles";
    const ID_FIELD: &'static str = "roleid";

    fn set_id(&mut self, id: &str) {
        self.role_id = id.to_string();
    }

    /// The per-role payload is the privilege map itself:
    /// `{"VM.Allocate": 1, "Sys.Audit": 1}`. Only the keys are kept.
    fn decode(id: &str, data: Map<String, Value>) -> Result<Self> {
        Ok(Role {
            role_id: id.to_string(),
            privileges: data.into_iter().map(|(privilege, _)| privilege).collect(),
        })
    }
}

impl Session {
    pub async fn index_roles(&self) -> Result<Vec<IndexEntry>> {
        self.index::<Role>().await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list::<Role>().await
    }

    pub async fn get_role(&self, role_id: &str) -> Result<Role> {
        self.fetch::<Role>(role_id).await
    }

    pub async fn add_role(&self, role: impl IntoForm) -> Result<Payload> {
        self.create::<Role>(role).await
    }

    pub async fn edit_role(&self, role_id: &str, role: impl IntoForm) -> Result<Payload> {
        self.update::<Role>(role_id, role).await
    }

    pub async fn delete_role(&self, role_id: &str) -> Result<()> {
        self.destroy::<Role>(role_id).await
    }
}
