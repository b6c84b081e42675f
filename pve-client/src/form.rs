///! Form bodies for mutating requests

use pve_common::{Group, Realm, Role, User};
use std::collections::BTreeMap;

/// URL-encoded form body. A key may carry several values; each is sent as
/// its own `key=value` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: BTreeMap<String, Vec<String>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut form = Self::new();
        for (key, value) in pairs {
            form.append(key, value);
        }
        form
    }

    /// Add a value, keeping any existing ones for the key
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values for the key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(key.into(), vec![value.into()]);
        self
    }

    /// Set the key only when the value is non-empty
    pub fn set_nonempty(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.set(key, value);
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }

    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.fields {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// Anything `add_*`/`edit_*` can send: a raw [`Form`] or a typed record
pub trait IntoForm {
    fn into_form(self) -> Form;
}

impl IntoForm for Form {
    fn into_form(self) -> Form {
        self
    }
}

impl IntoForm for &Form {
    fn into_form(self) -> Form {
        self.clone()
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

impl IntoForm for &Realm {
    fn into_form(self) -> Form {
        let mut form = Form::new();
        form.set_nonempty("realm", &self.name)
            .set_nonempty("type", &self.realm_type)
            .set_nonempty("comment", &self.comment)
            .set_nonempty("tfa", &self.tfa)
            .set_nonempty("digest", &self.digest);
        if self.default {
            form.set("default", flag(true));
        }
        form
    }
}

impl IntoForm for &Group {
    fn into_form(self) -> Form {
        let mut form = Form::new();
        form.set_nonempty("groupid", &self.name)
            .set_nonempty("comment", &self.comment);
        form
    }
}

impl IntoForm for &Role {
    fn into_form(self) -> Form {
        let privs = self
            .privileges
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let mut form = Form::new();
        form.set_nonempty("roleid", &self.role_id)
            .set_nonempty("privs", &privs);
        form
    }
}

impl IntoForm for &User {
    fn into_form(self) -> Form {
        let mut form = Form::new();
        form.set_nonempty("userid", &self.user_id)
            .set_nonempty("comment", &self.comment)
            .set_nonempty("email", &self.email)
            .set("enable", flag(self.enable))
            .set("expire", self.expire.to_string())
            .set_nonempty("firstname", &self.first_name)
            .set_nonempty("lastname", &self.last_name)
            .set_nonempty("keys", &self.key_ids)
            .set_nonempty("groups", &self.groups.join(","));
        form
    }
}
