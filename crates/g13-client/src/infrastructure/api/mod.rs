//! REST client for the daemon's profile/macro persistence service.
//!
//! The sync core never calls this service itself — the recorder hands its
//! finished step list to a caller, and the caller persists it here.  Every
//! operation is plain request/response and can fail, unlike the
//! fire-and-forget command channel.
//!
//! Endpoints (relative to the configured base URL, default
//! `http://127.0.0.1:8765/api`):
//!
//! | method | path | operation |
//! |---|---|---|
//! | GET    | `/profiles`                 | list profiles |
//! | GET    | `/profiles/{name}`          | fetch one profile |
//! | POST   | `/profiles/{name}`          | create/update a profile |
//! | DELETE | `/profiles/{name}`          | delete a profile |
//! | POST   | `/profiles/{name}/activate` | make a profile active |
//! | GET    | `/macros`                   | list macros |
//! | GET    | `/macros/{id}`              | fetch one macro |
//! | POST   | `/macros`                   | create a macro, returns its id |
//! | DELETE | `/macros/{id}`              | delete a macro |
//! | GET    | `/status`                   | current device status |

use std::collections::BTreeMap;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use g13_core::{Backlight, Macro, Mode};

/// Errors from persistence-service calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// body decode failure, …).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

// ── Resource types ────────────────────────────────────────────────────────────

/// Summary row from the profile listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileListItem {
    pub name: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub description: String,
}

/// What a mapped button does: a single key, or a labelled chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingTarget {
    Key(String),
    Chord { keys: Vec<String>, label: String },
}

/// Joystick behaviour stored with a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoystickSettings {
    pub mode: String,
    pub deadzone: u32,
}

/// A full mapping profile as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub mappings: BTreeMap<String, MappingTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlight: Option<Backlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joystick: Option<JoystickSettings>,
}

/// Summary row from the macro listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroListItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps_count: usize,
}

/// Snapshot summary from the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub connected: bool,
    pub active_profile: Option<String>,
    pub active_mode: Mode,
}

// List envelopes used by the service.
#[derive(Deserialize)]
struct ProfileListEnvelope {
    profiles: Vec<ProfileListItem>,
}

#[derive(Deserialize)]
struct MacroListEnvelope {
    macros: Vec<MacroListItem>,
}

#[derive(Deserialize)]
struct CreatedMacro {
    id: String,
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Asynchronous client for the persistence service.
#[derive(Clone)]
pub struct G13ApiClient {
    http: Client,
    base_url: String,
}

impl G13ApiClient {
    /// Creates a client for the service at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    // ── Profiles ──────────────────────────────────────────────────────────────

    pub async fn list_profiles(&self) -> Result<Vec<ProfileListItem>, ApiError> {
        let url = format!("{}/profiles", self.base_url);
        let res = expect_success(self.http.get(url).send().await?).await?;
        Ok(res.json::<ProfileListEnvelope>().await?.profiles)
    }

    pub async fn get_profile(&self, name: &str) -> Result<Profile, ApiError> {
        let url = format!("{}/profiles/{name}", self.base_url);
        let res = expect_success(self.http.get(url).send().await?).await?;
        Ok(res.json().await?)
    }

    /// Creates or replaces the profile stored under `name`.
    pub async fn save_profile(&self, name: &str, profile: &Profile) -> Result<(), ApiError> {
        let url = format!("{}/profiles/{name}", self.base_url);
        expect_success(self.http.post(url).json(profile).send().await?).await?;
        Ok(())
    }

    pub async fn delete_profile(&self, name: &str) -> Result<(), ApiError> {
        let url = format!("{}/profiles/{name}", self.base_url);
        expect_success(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    /// Makes `name` the active profile on the device.
    pub async fn activate_profile(&self, name: &str) -> Result<(), ApiError> {
        let url = format!("{}/profiles/{name}/activate", self.base_url);
        expect_success(self.http.post(url).send().await?).await?;
        Ok(())
    }

    // ── Macros ────────────────────────────────────────────────────────────────

    pub async fn list_macros(&self) -> Result<Vec<MacroListItem>, ApiError> {
        let url = format!("{}/macros", self.base_url);
        let res = expect_success(self.http.get(url).send().await?).await?;
        Ok(res.json::<MacroListEnvelope>().await?.macros)
    }

    pub async fn get_macro(&self, id: &str) -> Result<Macro, ApiError> {
        let url = format!("{}/macros/{id}", self.base_url);
        let res = expect_success(self.http.get(url).send().await?).await?;
        Ok(res.json().await?)
    }

    /// Stores a macro draft and returns the id the service assigned.
    pub async fn create_macro(&self, draft: &Macro) -> Result<String, ApiError> {
        let url = format!("{}/macros", self.base_url);
        let res = expect_success(self.http.post(url).json(draft).send().await?).await?;
        Ok(res.json::<CreatedMacro>().await?.id)
    }

    pub async fn delete_macro(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/macros/{id}", self.base_url);
        expect_success(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    // ── Status ────────────────────────────────────────────────────────────────

    pub async fn device_status(&self) -> Result<DeviceStatus, ApiError> {
        let url = format!("{}/status", self.base_url);
        let res = expect_success(self.http.get(url).send().await?).await?;
        Ok(res.json().await?)
    }
}

/// Maps a non-success response to [`ApiError::Status`], preserving the body
/// for the log line.
async fn expect_success(res: Response) -> Result<Response, ApiError> {
    if res.status().is_success() {
        Ok(res)
    } else {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::Status { status, body })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
