//! Client for the Proxmox VE access API
//!
//! A [`Session`] logs in with a user name and password, keeps the ticket as
//! the `PVEAuthCookie` and sends the CSRF token on mutating requests. On top
//! of it sit typed operations for realms, groups, roles and users.
//!
//! ```no_run
//! # async fn run() -> pve_client::Result<()> {
//! let session = pve_client::Session::login("pve.example.com", "root", "secret").await?;
//! for group in session.list_groups().await? {
//!     println!("{}: {:?}", group.name, group.members);
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod form;
pub mod payload;
pub mod session;
pub mod transport;

pub use access::Resource;
pub use config::SessionOptions;
pub use error::{ClientError, Result};
pub use form::{Form, IntoForm};
pub use payload::Payload;
pub use pve_common::{Group, IndexEntry, Realm, Role, User};
pub use session::Session;
pub use transport::Method;
