//! Rust client core for the SwapSpec engine-swap planning API
//!
//! Typed gateway over the REST endpoints, durable bearer-token session,
//! authentication lifecycle, and the guided build-assembly workflow. UI
//! hosts stay thin: they render state and forward events while this crate
//! owns request shapes, error taxonomy, 401 teardown, and sequencing.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swapspec_client::{
//!     AuthManager, BuildWizard, ClientConfig, FileTokenStore, SwapSpecClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client with a file-backed session
//! let store = Arc::new(FileTokenStore::new("/tmp/swapspec/token"));
//! let client = Arc::new(SwapSpecClient::new(&ClientConfig::default(), store)?);
//!
//! // Establish a session
//! let auth = AuthManager::new(client.clone());
//! auth.login("swap@example.com", "hunter2").await?;
//!
//! // Walk the build wizard
//! let mut wizard = BuildWizard::new(client.clone());
//! let vehicles = client.vehicles(&Default::default()).await?;
//! wizard.select_vehicle(vehicles.vehicles[0].clone());
//! wizard.advance().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod transport;
pub mod types;
pub mod workflow;

// Re-export main types
pub use auth::{AuthManager, AuthState};
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use gateway::{SwapSpecClient, VIN_LENGTH};
pub use session::{FileTokenStore, MemoryTokenStore, SessionHandle, TokenStore};
pub use transport::{HttpTransport, MockTransport, ReqwestTransport};
pub use workflow::{BuildWizard, VinDecodeOutcome, WizardStep};
pub use types::*;
