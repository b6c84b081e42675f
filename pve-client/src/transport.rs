///! Request dispatch
///!
///! One dispatcher serves all four verbs: it builds the request, attaches the
///! CSRF token to mutating verbs, and unwraps the response envelope.

use crate::error::{ClientError, Result};
use crate::form::Form;
use crate::payload::Payload;
use crate::session::Session;
use pve_common::CSRF_HEADER;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// HTTP verbs the API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Mutating verbs carry the CSRF token
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }

    fn takes_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ClientError::invalid(format!("invalid method: \"{}\"", s))),
        }
    }
}

impl Session {
    /// Issue one request against `path` (relative to the API base) and
    /// return the unwrapped `data` payload.
    ///
    /// POST and PUT require a non-empty form; GET and DELETE take none.
    pub async fn request(&self, method: Method, path: &str, form: Option<&Form>) -> Result<Payload> {
        if path.is_empty() {
            return Err(ClientError::invalid(format!("{} with an empty path", method)));
        }
        if !path.starts_with('/') {
            return Err(ClientError::invalid(format!(
                "path must start with '/': {}",
                path
            )));
        }

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.to_reqwest(), &url);

        match (method.takes_body(), form) {
            (true, None) => {
                return Err(ClientError::invalid(format!("{} {} without a form", method, path)));
            }
            (true, Some(form)) if form.is_empty() => {
                return Err(ClientError::protocol(format!(
                    "{} {} with an empty form body",
                    method, path
                )));
            }
            (true, Some(form)) => {
                let body = form.encode();
                request = request
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(CONTENT_LENGTH, body.len())
                    .body(body);
            }
            (false, Some(_)) => {
                return Err(ClientError::invalid(format!("{} does not take a body", method)));
            }
            (false, None) => {}
        }

        if method.is_mutating() && !self.csrf_token.is_empty() {
            request = request.header(CSRF_HEADER, self.csrf_token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "api request");

        if status != StatusCode::OK {
            warn!(%method, path, %status, "api request failed");
            return Err(ClientError::Http {
                status,
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        let body = response.bytes().await?;
        Payload::from_body(&body)
    }

    pub async fn get(&self, path: &str) -> Result<Payload> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post_form(&self, path: &str, form: &Form) -> Result<Payload> {
        self.request(Method::Post, path, Some(form)).await
    }

    pub async fn put_form(&self, path: &str, form: &Form) -> Result<Payload> {
        self.request(Method::Put, path, Some(form)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload> {
        self.request(Method::Delete, path, None).await
    }
}
