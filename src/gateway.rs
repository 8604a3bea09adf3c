//! Typed gateway over the SwapSpec REST API
//!
//! One method per remote capability. Every method builds a
//! [`RequestDescriptor`], runs it through the shared dispatch path (bearer
//! attach, 401 teardown, error normalization), and decodes the typed
//! response. No business logic lives here beyond paths, queries, and the
//! local VIN length guard.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{error_message, ApiError, Result};
use crate::session::{SessionHandle, TokenStore};
use crate::transport::{HttpTransport, RawResponse, RequestDescriptor, ReqwestTransport};
use crate::types::*;

/// Fixed width of a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

/// Typed client for the SwapSpec API.
///
/// Owns the transport and the session: every operation attaches the current
/// bearer, yields exactly one typed result, and never retries on its own.
/// Construct once and share (`Arc`) across the auth manager, workflows, and
/// screens; independent clients carry independent sessions.
pub struct SwapSpecClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionHandle,
}

impl SwapSpecClient {
    /// Client over the real HTTP adapter.
    pub fn new(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        Ok(Self::with_transport(transport, store))
    }

    /// Client over any transport implementation (tests use the mock).
    pub fn with_transport(transport: Arc<dyn HttpTransport>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            session: SessionHandle::new(store),
        }
    }

    /// The session this client reads its bearer from.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// One exchange: attach the current token, run the transport, normalize
    /// the outcome. A 401 tears the session down before the error is
    /// returned; any other non-2xx maps to the server's `detail` message or
    /// a status-derived fallback.
    async fn dispatch(&self, request: RequestDescriptor) -> Result<RawResponse> {
        let token = self.session.token();
        let raw = self.transport.execute(&request, token.as_deref()).await?;

        if raw.status == 401 {
            self.session.invalidate();
            return Err(ApiError::Auth {
                message: error_message(401, &raw.body),
            });
        }
        if !raw.is_success() {
            debug!(status = raw.status, path = %request.path, "request rejected");
            return Err(ApiError::Request {
                status: raw.status,
                message: error_message(raw.status, &raw.body),
            });
        }
        Ok(raw)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        let raw = self.dispatch(request).await?;
        serde_json::from_slice(&raw.body)
            .map_err(|e| ApiError::Transport(format!("could not decode response: {e}")))
    }

    async fn send_no_content(&self, request: RequestDescriptor) -> Result<()> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn download(&self, request: RequestDescriptor) -> Result<Vec<u8>> {
        self.dispatch(request).await.map(|raw| raw.body)
    }

    // ==================== Auth ====================

    /// Creates an account. Does not establish a session; logging in
    /// afterwards is a separate, explicit step.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.send(RequestDescriptor::post("/api/auth/register").with_json(request)?)
            .await
    }

    /// Exchanges credentials for a bearer token. The endpoint speaks the
    /// OAuth2 password flow, so the email travels as `username` in a
    /// form-encoded body.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        let request = RequestDescriptor::post("/api/auth/login")
            .with_form(&[("username", email), ("password", password)]);
        self.send(request).await
    }

    /// Profile of the session's account.
    pub async fn me(&self) -> Result<User> {
        self.send(RequestDescriptor::get("/api/auth/me")).await
    }

    // ==================== Vehicles ====================

    pub async fn vehicles(&self, filter: &VehicleFilter) -> Result<VehicleList> {
        let request =
            RequestDescriptor::get("/api/vehicles").with_query_pairs(filter.query_pairs());
        self.send(request).await
    }

    pub async fn vehicle(&self, id: &str) -> Result<Vehicle> {
        self.send(RequestDescriptor::get(format!("/api/vehicles/{}", encode(id))))
            .await
    }

    pub async fn create_vehicle(&self, vehicle: &VehicleCreate) -> Result<Vehicle> {
        self.send(RequestDescriptor::post("/api/vehicles").with_json(vehicle)?)
            .await
    }

    /// Decodes a VIN into draft vehicle fields. VINs are fixed-width; any
    /// other length is rejected locally without touching the network.
    pub async fn decode_vin(&self, vin: &str) -> Result<VinDecodeResponse> {
        let vin = vin.trim();
        if vin.len() != VIN_LENGTH {
            return Err(ApiError::Validation(format!(
                "VIN must be exactly {VIN_LENGTH} characters, got {}",
                vin.len()
            )));
        }
        self.send(RequestDescriptor::get(format!(
            "/api/vehicles/decode-vin/{}",
            encode(vin)
        )))
        .await
    }

    // ==================== Engines ====================

    pub async fn engines(&self, filter: &EngineFilter) -> Result<EngineList> {
        let request =
            RequestDescriptor::get("/api/engines").with_query_pairs(filter.query_pairs());
        self.send(request).await
    }

    pub async fn engine(&self, id: &str) -> Result<Engine> {
        self.send(RequestDescriptor::get(format!("/api/engines/{}", encode(id))))
            .await
    }

    pub async fn create_engine(&self, engine: &EngineCreate) -> Result<Engine> {
        self.send(RequestDescriptor::post("/api/engines").with_json(engine)?)
            .await
    }

    // ==================== Transmissions ====================

    pub async fn transmissions(&self, filter: &TransmissionFilter) -> Result<TransmissionList> {
        let request =
            RequestDescriptor::get("/api/transmissions").with_query_pairs(filter.query_pairs());
        self.send(request).await
    }

    pub async fn transmission(&self, id: &str) -> Result<Transmission> {
        self.send(RequestDescriptor::get(format!("/api/transmissions/{}", encode(id))))
            .await
    }

    /// Transmissions that bolt to the given engine, as decided server-side;
    /// no local filtering.
    pub async fn compatible_transmissions(&self, engine_id: &str) -> Result<TransmissionList> {
        self.send(RequestDescriptor::get(format!(
            "/api/transmissions/compatible/{}",
            encode(engine_id)
        )))
        .await
    }

    pub async fn create_transmission(
        &self,
        transmission: &TransmissionCreate,
    ) -> Result<Transmission> {
        self.send(RequestDescriptor::post("/api/transmissions").with_json(transmission)?)
            .await
    }

    // ==================== Builds ====================

    pub async fn builds(&self, filter: &BuildFilter) -> Result<BuildList> {
        let request = RequestDescriptor::get("/api/builds").with_query_pairs(filter.query_pairs());
        self.send(request).await
    }

    pub async fn build(&self, id: &str) -> Result<Build> {
        self.send(RequestDescriptor::get(format!("/api/builds/{}", encode(id))))
            .await
    }

    pub async fn create_build(&self, build: &BuildCreate) -> Result<Build> {
        self.send(RequestDescriptor::post("/api/builds").with_json(build)?)
            .await
    }

    pub async fn update_build(&self, id: &str, update: &BuildUpdate) -> Result<Build> {
        self.send(
            RequestDescriptor::put(format!("/api/builds/{}", encode(id))).with_json(update)?,
        )
        .await
    }

    /// Full JSON export with resolved components and fitment
    /// recommendations.
    pub async fn export_build(&self, id: &str) -> Result<BuildExport> {
        self.send(RequestDescriptor::get(format!("/api/builds/{}/export", encode(id))))
            .await
    }

    /// Renders the build report server-side and returns the raw PDF bytes;
    /// persisting or presenting them is the caller's business.
    pub async fn download_build_pdf(&self, id: &str) -> Result<Vec<u8>> {
        self.download(RequestDescriptor::get(format!(
            "/api/builds/{}/export/pdf",
            encode(id)
        )))
        .await
    }

    // ==================== Advisor ====================

    /// Sends one question to the build advisor. Responses are never cached;
    /// every call is a fresh round trip.
    pub async fn send_advisor_message(&self, request: &AdvisorRequest) -> Result<AdvisorResponse> {
        self.send(RequestDescriptor::post("/api/advisor/chat").with_json(request)?)
            .await
    }

    pub async fn chat_history(&self, build_id: &str) -> Result<ChatHistoryResponse> {
        self.send(RequestDescriptor::get(format!(
            "/api/advisor/chat/{}/history",
            encode(build_id)
        )))
        .await
    }

    pub async fn clear_chat_history(&self, build_id: &str) -> Result<()> {
        self.send_no_content(RequestDescriptor::delete(format!(
            "/api/advisor/chat/{}/history",
            encode(build_id)
        )))
        .await
    }

    // ==================== Files ====================

    /// Uploads an arbitrary attachment as a multipart request.
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<FileUploadResponse> {
        self.send(RequestDescriptor::post("/api/files/upload").with_multipart(filename, bytes))
            .await
    }

    /// Uploads a 3D mesh. The server only accepts mesh extensions
    /// (`.obj`, `.stl`, `.fbx`, `.gltf`, `.glb`) and rejects anything else
    /// with a 400 whose `detail` is surfaced unchanged.
    pub async fn upload_mesh(&self, filename: &str, bytes: Vec<u8>) -> Result<FileUploadResponse> {
        self.send(
            RequestDescriptor::post("/api/files/upload/mesh").with_multipart(filename, bytes),
        )
        .await
    }

    /// Deletes an uploaded file by its server-issued stored path. The path
    /// may contain `/`, so it is appended verbatim rather than encoded.
    pub async fn delete_file(&self, stored_path: &str) -> Result<()> {
        self.send_no_content(RequestDescriptor::delete(format!("/api/files/{stored_path}")))
            .await
    }
}

/// Percent-encodes one path segment (ids, VINs).
fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
