///! Users (`/access/users`)

use super::Resource;
use crate::error::Result;
use crate::form::IntoForm;
use crate::payload::Payload;
use crate::session::Session;
use pve_common::{IndexEntry, User};

impl Resource for User {
    const PATH: &'static str = "/access/users";
    const ID_FIELD: &'static str = "userid";

    fn set_id(&mut self, id: &str) {
        self.user_id = id.to_string();
    }
}

impl Session {
    pub async fn index_users(&self) -> Result<Vec<IndexEntry>> {
        self.index::<User>().await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.list::<User>().await
    }

    /// `user_id` is the full `name@realm`
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.fetch::<User>(user_id).await
    }

    pub async fn add_user(&self, user: impl IntoForm) -> Result<Payload> {
        self.create::<User>(user).await
    }

    pub async fn edit_user(&self, user_id: &str, user: impl IntoForm) -> Result<Payload> {
        self.update::<User>(user_id, user).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.destroy::<User>(user_id).await
    }
}
