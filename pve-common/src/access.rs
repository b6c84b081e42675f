///! Access control records: realms, groups, roles and users
///!
///! Field names follow the server's wire names (`groupid`, `firstname`, ...)
///! through serde renames. Every field defaults to its zero value when the
///! server omits it.

use crate::de;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sparse object returned by an index endpoint, e.g. `{"groupid": "admins"}`
pub type IndexEntry = serde_json::Map<String, serde_json::Value>;

/// Authentication realm ("domain"), e.g. `pam`, `pve` or an LDAP server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Realm {
    #[serde(rename = "realm")]
    pub name: String,
    pub comment: String,
    pub digest: String,
    pub plugin: String,
    #[serde(rename = "type")]
    pub realm_type: String,
    /// Whether this realm is preselected on the login form
    #[serde(deserialize_with = "de::flag")]
    pub default: bool,
    /// Two-factor configuration string, if any
    pub tfa: String,
}

/// Permission group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(rename = "groupid")]
    pub name: String,
    pub comment: String,
    /// Fully-qualified user ids (`name@realm`)
    #[serde(deserialize_with = "de::string_list")]
    pub members: Vec<String>,
}

/// Role: a named set of privileges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    #[serde(rename = "roleid")]
    pub role_id: String,
    #[serde(rename = "privs", deserialize_with = "de::privilege_set")]
    pub privileges: BTreeSet<String>,
}

impl Role {
    pub fn has_privilege(&self, privilege: &str) -> bool {
        self.privileges.contains(privilege)
    }
}

/// User account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "userid")]
    pub user_id: String,
    pub comment: String,
    pub email: String,
    #[serde(deserialize_with = "de::flag")]
    pub enable: bool,
    /// Account expiry as a unix timestamp, `0` for never
    #[serde(deserialize_with = "de::epoch")]
    pub expire: i64,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    /// Second-factor key ids, as the server stores them
    #[serde(rename = "keys")]
    pub key_ids: String,
    #[serde(deserialize_with = "de::string_list")]
    pub groups: Vec<String>,
}

impl User {
    /// Name part of `name@realm`
    pub fn name(&self) -> &str {
        self.user_id
            .rsplit_once('@')
            .map(|(name, _)| name)
            .unwrap_or(&self.user_id)
    }

    /// Realm part of `name@realm`, if the id is qualified
    pub fn realm(&self) -> Option<&str> {
        self.user_id.rsplit_once('@').map(|(_, realm)| realm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_wire_names() {
        let user: User = serde_json::from_value(json!({
            "userid": "alice@pve",
            "firstname": "Alice",
            "lastname": "Liddell",
            "email": "alice@example.com",
            "enable": 1,
            "expire": 0,
            "keys": "x!abc",
            "groups": ["admins"],
            "tokens": {}
        }))
        .unwrap();

        assert_eq!(user.user_id, "alice@pve");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(user.last_name, "Liddell");
        assert!(user.enable);
        assert_eq!(user.key_ids, "x!abc");
        assert_eq!(user.groups, vec!["admins"]);
        assert_eq!(user.name(), "alice");
        assert_eq!(user.realm(), Some("pve"));
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let user: User = serde_json::from_value(json!({})).unwrap();
        assert_eq!(user, User::default());

        let realm: Realm = serde_json::from_value(json!({"type": "ldap"})).unwrap();
        assert_eq!(realm.realm_type, "ldap");
        assert!(realm.name.is_empty());
        assert!(!realm.default);
    }

    #[test]
    fn test_role_from_index_entry() {
        let role: Role = serde_json::from_value(json!({
            "roleid": "PVEAuditor",
            "privs": "Sys.Audit,VM.Audit",
            "special": 1
        }))
        .unwrap();

        assert!(role.has_privilege("Sys.Audit"));
        assert!(role.has_privilege("VM.Audit"));
        assert!(!role.has_privilege("VM.Allocate"));
    }

    #[test]
    fn test_group_rejects_object_members() {
        let result: Result<Group, _> =
            serde_json::from_value(json!({"members": {"alice@pve": 1}}));
        assert!(result.is_err());
    }
}
