//! Viewer configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file,
//! `RDVIEW_*` environment variables, then command-line flags (applied
//! by `main`).

use std::fmt;
use std::path::Path;

use rdview_core::{Credentials, InputPolicy, SessionTarget, ViewError};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides (`RDVIEW_HOST`, `RDVIEW_PORT`, ...).
pub const ENV_PREFIX: &str = "RDVIEW_";

/// Top-level configuration for the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Remote session settings.
    pub session: SessionConfig,
    /// Input forwarding settings.
    pub input: InputConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Remote session settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Remote host name or IP address.
    pub host: String,
    /// Remote port.
    pub port: u16,
    /// Login domain; may be empty.
    pub domain: String,
    pub user: String,
    pub password: String,
}

/// Input forwarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Forward mouse events.
    pub capture_mouse: bool,
    /// Forward keyboard events.
    pub capture_keyboard: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3389,
            domain: String::new(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            capture_mouse: true,
            capture_keyboard: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ViewerConfig {
    /// Load from a TOML file.
    ///
    /// A missing file gives `Ok(None)`. A file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ViewError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .map(Some)
                .map_err(|e| ViewError::Config(format!("{}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ViewError::Config(format!("{}: {e}", path.display()))),
        }
    }

    pub fn parse(text: &str) -> Result<Self, ViewError> {
        toml::from_str(text).map_err(|e| ViewError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ViewError> {
        toml::to_string_pretty(self).map_err(|e| ViewError::Config(e.to_string()))
    }

    /// Apply `RDVIEW_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ViewError> {
        self.apply_vars(|name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
    }

    /// Apply overrides from `lookup`, keyed by the unprefixed name
    /// (`HOST`, `PORT`, `DOMAIN`, `USER`, `PASSWORD`).
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ViewError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.session.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.session.port = port
                .trim()
                .parse()
                .map_err(|_| ViewError::Config(format!("{ENV_PREFIX}PORT is not a port: {port:?}")))?;
        }
        if let Some(domain) = lookup("DOMAIN") {
            self.session.domain = domain;
        }
        if let Some(user) = lookup("USER") {
            self.session.user = user;
        }
        if let Some(password) = lookup("PASSWORD") {
            self.session.password = password;
        }
        Ok(())
    }

    /// Reject settings the viewer cannot start with.
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.session.host.trim().is_empty() {
            return Err(ViewError::Config(format!(
                "no remote host configured (set session.host or {ENV_PREFIX}HOST)"
            )));
        }
        if self.session.port == 0 {
            return Err(ViewError::Config("session.port must be non-zero".into()));
        }
        Ok(())
    }

    // ── Conversions ──────────────────────────────────────────────

    /// `host:port`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.session.host, self.session.port)
    }

    pub fn target(&self, width: u32, height: u32) -> SessionTarget {
        SessionTarget {
            address: self.address(),
            width,
            height,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            domain: self.session.domain.clone(),
            user: self.session.user.clone(),
            password: self.session.password.clone(),
        }
    }

    pub fn input_policy(&self) -> InputPolicy {
        InputPolicy {
            forward_keyboard: self.input.capture_keyboard,
            forward_mouse: self.input.capture_mouse,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
