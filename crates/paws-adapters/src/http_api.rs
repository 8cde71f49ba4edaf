//! # REST Adapter
//!
//! Implements the catalog, favorite, interest and label-source ports against
//! the Pawsibilities REST backend via `reqwest`.
//!
//! Every response body is decoded into a private wire type first. A body that
//! does not fit the schema is reported as [`ApiError::Decode`], never
//! half-applied. Non-2xx answers become [`ApiError::Status`] carrying the
//! backend's `error`/`message` field when it sends one.
//!
//! This module is only available when the `http-api` feature is enabled (default).

use paws_core::{
    error::ApiError,
    ports::{FavoritePort, InterestPort, LabelSourcePort, PetCatalogPort},
    types::{
        AdopterSummary, ImagePayload, InterestAck, LabelAnalysis, NewPet, OwnerProfile, Pet, PetId,
        UserId,
    },
};
use serde::de::DeserializeOwned;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "https://pawsibilities-api.onrender.com/api";

/// REST client for the Pawsibilities backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for HttpApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured `reqwest` client (proxy, TLS, timeouts).
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "backend rejected request");
            return Err(ApiError::Status { status: status.as_u16(), message: error_message(&body) });
        }
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        tracing::debug!(error = %err, "transport failure");
        ApiError::Transport(err.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Pull `error` or `message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<wire::ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.trim().to_string())
}

/// JSON for the `data` part of a new-pet upload. Failing here is a
/// request-side problem, so it is reported as a transport error.
fn encode_new_pet(pet: &NewPet, owner: &UserId) -> Result<String, ApiError> {
    serde_json::to_string(&wire::NewPetBody::new(pet, owner))
        .map_err(|err| ApiError::Transport(format!("cannot encode pet: {err}")))
}

fn image_part(image: &ImagePayload) -> Result<reqwest::multipart::Part, ApiError> {
    reqwest::multipart::Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|err| ApiError::Transport(err.to_string()))
}

// ── Ports ────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl PetCatalogPort for HttpApiClient {
    async fn list_pets(&self) -> Result<Vec<Pet>, ApiError> {
        let records: Vec<wire::PetRecord> = self.fetch(self.client.get(self.url("/pets"))).await?;
        Ok(records.into_iter().map(Pet::from).collect())
    }

    async fn list_owner_pets(&self, owner: &UserId) -> Result<Vec<Pet>, ApiError> {
        let records: Vec<wire::PetRecord> =
            self.fetch(self.client.get(self.url(&format!("/user/{owner}/pets")))).await?;
        Ok(records.into_iter().map(Pet::from).collect())
    }

    async fn owner_profile(&self, owner: &UserId) -> Result<OwnerProfile, ApiError> {
        let record: wire::UserRecord =
            self.fetch(self.client.get(self.url(&format!("/user/{owner}")))).await?;
        Ok(OwnerProfile { user_id: owner.clone(), username: record.username })
    }

    async fn create_pet(
        &self,
        pet: &NewPet,
        owner: &UserId,
        image: &ImagePayload,
    ) -> Result<(), ApiError> {
        let data = encode_new_pet(pet, owner)?;
        let form = reqwest::multipart::Form::new().text("data", data).part("image", image_part(image)?);
        self.send(self.client.post(self.url("/pets")).multipart(form)).await?;
        Ok(())
    }

    async fn set_availability(&self, pet: &PetId, available: bool) -> Result<(), ApiError> {
        let body = serde_json::json!({ "available": available });
        self.send(self.client.patch(self.url(&format!("/pet/{pet}"))).json(&body)).await?;
        Ok(())
    }

    async fn delete_pet(&self, pet: &PetId) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&format!("/pet/{pet}")))).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FavoritePort for HttpApiClient {
    async fn toggle_favorite(&self, user: &UserId, pet: &PetId) -> Result<(), ApiError> {
        let body = serde_json::json!({ "userId": user });
        self.send(self.client.patch(self.url(&format!("/pet/{pet}/favorite"))).json(&body)).await?;
        Ok(())
    }

    async fn list_favorites(&self, user: &UserId) -> Result<Vec<Pet>, ApiError> {
        let records: Vec<wire::PetRecord> =
            self.fetch(self.client.get(self.url(&format!("/user/{user}/favorites")))).await?;
        Ok(records.into_iter().map(Pet::from).collect())
    }
}

#[async_trait::async_trait]
impl InterestPort for HttpApiClient {
    async fn express_interest(&self, user: &UserId, pet: &PetId) -> Result<InterestAck, ApiError> {
        let body = serde_json::json!({ "userId": user });
        let reply: wire::MessageBody = self
            .fetch(self.client.patch(self.url(&format!("/pet/{pet}/interest"))).json(&body))
            .await?;
        Ok(InterestAck { message: reply.message })
    }

    async fn interested_adopters(&self, pet: &PetId) -> Result<Vec<AdopterSummary>, ApiError> {
        let records: Vec<wire::AdopterRecord> = self
            .fetch(self.client.get(self.url(&format!("/pet/{pet}/interested-adopters"))))
            .await?;
        Ok(records.into_iter().map(AdopterSummary::from).collect())
    }
}

#[async_trait::async_trait]
impl LabelSourcePort for HttpApiClient {
    async fn analyze(&self, image: &ImagePayload) -> Result<LabelAnalysis, ApiError> {
        let form = reqwest::multipart::Form::new().part("image", image_part(image)?);
        let reply: wire::AnalyzeBody =
            self.fetch(self.client.post(self.url("/upload-and-analyze")).multipart(form)).await?;
        Ok(LabelAnalysis { image_url: reply.image_url, labels: reply.labels })
    }
}

// ── Wire Schema ──────────────────────────────────────────────────────

mod wire {
    use paws_core::types::{AdopterSummary, NewPet, Pet, PetId, UserId};
    use serde::{Deserialize, Serialize};

    /// `age` arrives as a number or as free text depending on who wrote the row.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub(super) enum Age {
        Whole(u64),
        Fractional(f64),
        Text(String),
    }

    impl Age {
        fn into_display(self) -> String {
            match self {
                Self::Whole(n) => n.to_string(),
                Self::Fractional(n) => n.to_string(),
                Self::Text(s) => s,
            }
        }
    }

    /// Owner reference; populated by some endpoints.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub(super) enum OwnerRef {
        Id(String),
        Populated {
            #[serde(rename = "_id")]
            id: String,
        },
    }

    impl OwnerRef {
        fn into_id(self) -> String {
            match self {
                Self::Id(id) | Self::Populated { id } => id,
            }
        }
    }

    fn default_available() -> bool {
        true
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PetRecord {
        #[serde(rename = "_id")]
        pub id: String,
        pub name: String,
        pub species: String,
        pub breed: String,
        #[serde(default)]
        pub age: Option<Age>,
        pub gender: String,
        #[serde(default)]
        pub size: String,
        pub color: String,
        #[serde(default)]
        pub description: String,
        #[serde(default = "default_available")]
        pub available: bool,
        pub owner: OwnerRef,
        #[serde(default)]
        pub interested_adopters: Vec<String>,
        #[serde(default)]
        pub image_url: Option<String>,
    }

    impl From<PetRecord> for Pet {
        fn from(r: PetRecord) -> Self {
            Self {
                id: PetId::new(r.id),
                name: r.name,
                species: r.species,
                breed: r.breed,
                age: r.age.map(Age::into_display).unwrap_or_default(),
                gender: r.gender,
                size: r.size,
                color: r.color,
                description: r.description,
                available: r.available,
                owner: UserId::new(r.owner.into_id()),
                interested_adopters: r.interested_adopters.into_iter().map(UserId::new).collect(),
                image_url: r.image_url,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct UserRecord {
        pub username: String,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct AdopterRecord {
        #[serde(rename = "_id")]
        pub id: String,
        pub username: String,
        #[serde(default)]
        pub email: Option<String>,
    }

    impl From<AdopterRecord> for AdopterSummary {
        fn from(r: AdopterRecord) -> Self {
            Self { user_id: UserId::new(r.id), username: r.username, email: r.email }
        }
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct MessageBody {
        #[serde(default)]
        pub message: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct AnalyzeBody {
        #[serde(default)]
        pub image_url: Option<String>,
        pub labels: Vec<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct ErrorBody {
        pub error: Option<String>,
        pub message: Option<String>,
    }

    /// JSON sent in the `data` part of a new-pet upload.
    #[derive(Debug, Serialize)]
    pub(super) struct NewPetBody<'a> {
        name: &'a str,
        species: &'a str,
        breed: &'a str,
        age: u32,
        gender: &'a str,
        size: &'a str,
        color: &'a str,
        description: &'a str,
        available: bool,
        owner: &'a UserId,
        #[serde(skip_serializing_if = "Option::is_none")]
        longitude: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        latitude: Option<f64>,
    }

    impl<'a> NewPetBody<'a> {
        pub(super) fn new(pet: &'a NewPet, owner: &'a UserId) -> Self {
            Self {
                name: &pet.name,
                species: &pet.species,
                breed: &pet.breed,
                age: pet.age,
                gender: &pet.gender,
                size: &pet.size,
                color: &pet.color,
                description: &pet.description,
                available: pet.available,
                owner,
                longitude: pet.longitude,
                latitude: pet.latitude,
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
