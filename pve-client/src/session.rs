///! Authenticated session
///!
///! A [`Session`] only exists after a successful login: the ticket and CSRF
///! token are written once and never refreshed. When the server expires the
///! ticket, requests fail with HTTP 401 and the caller logs in again.

use crate::config::SessionOptions;
use crate::error::{ClientError, Result};
use crate::form::Form;
use crate::payload::Payload;
use pve_common::{API_PREFIX, AUTH_COOKIE};
use reqwest::cookie::{CookieStore, Jar};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Authenticated connection to one PVE host
#[derive(Clone)]
pub struct Session {
    pub(crate) client: reqwest::Client,
    jar: Arc<Jar>,
    pub(crate) base_url: String,
    host_url: Url,
    username: String,
    ticket: String,
    pub(crate) csrf_token: String,
    tls_skip_verify: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("ticket", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .field("tls_skip_verify", &self.tls_skip_verify)
            .finish()
    }
}

/// Prefix `https://` unless the hostname already names an HTTP scheme
pub fn normalize_host(hostname: &str) -> String {
    let hostname = hostname.trim().trim_end_matches('/');
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        hostname.to_string()
    } else {
        format!("https://{}", hostname)
    }
}

/// Qualify a bare user name with `realm`
pub fn normalize_username(username: &str, realm: &str) -> String {
    let username = username.trim();
    if username.contains('@') {
        username.to_string()
    } else {
        format!("{}@{}", username, realm)
    }
}

/// API base for a normalized host: the host's own port if it has one,
/// `default_port` otherwise, followed by `/api2/json`. Hosts carrying a
/// path, query or fragment are rejected.
pub fn api_base_url(host: &str, default_port: u16) -> Result<String> {
    let parsed = Url::parse(host)?;
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ClientError::invalid(format!(
            "hostname must not contain a path: {}",
            host
        )));
    }

    let authority = host.split_once("://").map(|(_, rest)| rest).unwrap_or(host);
    let has_port = authority
        .rsplit_once(':')
        .map(|(_, port)| port.parse::<u16>().is_ok())
        .unwrap_or(false);

    let base_url = if has_port {
        format!("{}{}", host, API_PREFIX)
    } else {
        format!("{}:{}{}", host, default_port, API_PREFIX)
    };

    Url::parse(&base_url)?;
    Ok(base_url)
}

impl Session {
    /// Log in with default [`SessionOptions`]
    pub async fn login(hostname: &str, username: &str, password: &str) -> Result<Self> {
        Self::login_with(hostname, username, password, &SessionOptions::default()).await
    }

    /// Acquire a ticket from `/access/ticket` and install it as the
    /// `PVEAuthCookie` for the host.
    pub async fn login_with(
        hostname: &str,
        username: &str,
        password: &str,
        options: &SessionOptions,
    ) -> Result<Self> {
        if hostname.trim().is_empty() {
            return Err(ClientError::invalid("hostname must not be empty"));
        }
        if username.trim().is_empty() {
            return Err(ClientError::invalid("username must not be empty"));
        }

        let host = normalize_host(hostname);
        let username = normalize_username(username, &options.default_realm);
        let base_url = api_base_url(&host, options.port)?;

        let mut host_url = Url::parse(&base_url)?;
        host_url.set_path("/");

        let jar = Arc::new(Jar::default());
        let client = build_client(options, jar.clone())?;

        let mut session = Self {
            client,
            jar,
            base_url,
            host_url,
            username,
            ticket: String::new(),
            csrf_token: String::new(),
            tls_skip_verify: options.tls_skip_verify,
        };

        let form = Form::from_pairs([
            ("username", session.username.as_str()),
            ("password", password),
        ]);
        debug!(user = %session.username, url = %session.base_url, "requesting ticket");

        let data = session.post_form("/access/ticket", &form).await?;
        let Payload::Object(data) = data else {
            return Err(ClientError::Authentication(
                "ticket response is not an object".to_string(),
            ));
        };

        let ticket = credential(&data, "ticket")?;
        let csrf_token = credential(&data, "CSRFPreventionToken")?;

        session.jar.add_cookie_str(
            &format!("{}={}; Path=/", AUTH_COOKIE, ticket),
            &session.host_url,
        );
        session.ticket = ticket;
        session.csrf_token = csrf_token;

        info!(user = %session.username, host = %session.host_url, "logged in");
        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scheme, host and port of the server, with path `/`
    pub fn host_url(&self) -> &Url {
        &self.host_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn ticket(&self) -> &str {
        &self.ticket
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    pub fn tls_skip_verify(&self) -> bool {
        self.tls_skip_verify
    }

    /// `Cookie` header the jar attaches to requests for the session host
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.host_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

fn build_client(options: &SessionOptions, jar: Arc<Jar>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .cookie_provider(jar)
        .danger_accept_invalid_certs(options.tls_skip_verify)
        .pool_max_idle_per_host(options.pool_max_idle_per_host)
        .pool_idle_timeout(None::<Duration>)
        .tcp_keepalive(Duration::from_secs(60))
        .user_agent(options.user_agent.as_str());

    if let Some(timeout) = options.timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = options.connect_timeout() {
        builder = builder.connect_timeout(timeout);
    }

    Ok(builder.build()?)
}

fn credential(data: &serde_json::Map<String, serde_json::Value>, key: &str) -> Result<String> {
    match data.get(key).and_then(|value| value.as_str()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ClientError::Authentication(format!(
            "ticket response is missing '{}'",
            key
        ))),
    }
}
