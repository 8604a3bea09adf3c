//! Wire types for the SwapSpec API
//!
//! Response shapes mirror the server's schemas one to one. Request shapes
//! skip omitted optional fields entirely so the server's own defaults apply.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth
// ============================================================================

/// Billing tier chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Hobbyist,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Free,
    PerProject,
    Subscription,
}

/// Account profile returned by `/api/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub account_type: AccountType,
    pub subscription_status: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

/// Bearer credential returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Payload for account creation; registering does not log in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Server defaults to `hobbyist` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

// ============================================================================
// Data provenance
// ============================================================================

/// Where a catalog field's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Manufacturer,
    CarqueryApi,
    NhtsaApi,
    UserContributed,
}

/// Per-field provenance map (field name → source)
pub type DataSources = HashMap<String, DataSource>;

// ============================================================================
// Vehicles
// ============================================================================

/// Moderation state of a community-contributed catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    Pending,
    Approved,
    Rejected,
}

/// Catalog vehicle with engine-bay and chassis measurements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub year: i32,
    pub make: String,
    pub model: String,
    pub trim: Option<String>,
    pub vin_pattern: Option<String>,
    pub bay_scan_mesh_url: Option<String>,
    pub contributor_id: Option<String>,
    pub quality_status: QualityStatus,
    pub modifications: Option<serde_json::Value>,
    // bay and chassis measurements
    pub engine_bay_length_in: Option<f64>,
    pub engine_bay_width_in: Option<f64>,
    pub engine_bay_height_in: Option<f64>,
    pub firewall_to_radiator_in: Option<f64>,
    pub driveline_angle_deg: Option<f64>,
    pub transmission_tunnel_width_in: Option<f64>,
    pub transmission_tunnel_height_in: Option<f64>,
    pub curb_weight_lbs: Option<f64>,
    pub stock_weight_distribution_front_pct: Option<f64>,
    pub steering_type: Option<String>,
    pub steering_clearance_notes: Option<String>,
    pub stock_ground_clearance_in: Option<f64>,
    // provenance
    pub data_sources: Option<DataSources>,
    pub data_source_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for contributing a vehicle to the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleCreate {
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bay_scan_mesh_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifications: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_bay_length_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_bay_width_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_bay_height_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firewall_to_radiator_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driveline_angle_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_tunnel_width_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_tunnel_height_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curb_weight_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_weight_distribution_front_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steering_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steering_clearance_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_ground_clearance_in: Option<f64>,
}

/// Response from the vehicle list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleList {
    pub vehicles: Vec<Vehicle>,
    pub total: u64,
}

/// Decoded VIN fields; any of them may be missing for unusual VINs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VinDecodeResponse {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub engine: Option<String>,
    pub raw_data: Option<serde_json::Value>,
}

// ============================================================================
// Engines
// ============================================================================

/// Catalog engine with fitment, internal, thermal, and electronic specs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    pub make: String,
    pub model: String,
    pub variant: Option<String>,
    pub dimensions_h: Option<f64>,
    pub dimensions_w: Option<f64>,
    pub dimensions_l: Option<f64>,
    pub weight: Option<f64>,
    pub fuel_pressure_psi: Option<f64>,
    pub fuel_flow_lph: Option<f64>,
    pub cooling_btu_min: Option<f64>,
    pub power_hp: Option<f64>,
    pub torque_lb_ft: Option<f64>,
    pub mesh_file_url: Option<String>,
    pub mount_points: Option<serde_json::Value>,
    // internals
    pub displacement_liters: Option<f64>,
    pub compression_ratio: Option<f64>,
    pub valve_train: Option<String>,
    pub bore_mm: Option<f64>,
    pub stroke_mm: Option<f64>,
    pub balance_type: Option<String>,
    pub cam_intake_lift_in: Option<f64>,
    pub cam_exhaust_lift_in: Option<f64>,
    pub cam_intake_duration_deg: Option<f64>,
    pub cam_exhaust_duration_deg: Option<f64>,
    pub redline_rpm: Option<u32>,
    pub idle_rpm: Option<u32>,
    // geometry
    pub oil_pan_depth_in: Option<f64>,
    pub oil_pan_type: Option<String>,
    pub front_accessory_drive_depth_in: Option<f64>,
    // thermal
    pub cooling_system_type: Option<String>,
    pub thermostat_temp_f: Option<f64>,
    pub exhaust_port_shape: Option<String>,
    pub exhaust_header_primary_od_in: Option<f64>,
    pub recommended_radiator_rows: Option<u32>,
    // electronics
    pub can_bus_protocol: Option<String>,
    pub ecu_type: Option<String>,
    pub starter_position: Option<String>,
    pub distributor_type: Option<String>,
    // provenance
    pub data_sources: Option<DataSources>,
    pub data_source_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for contributing an engine to the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineCreate {
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_pressure_psi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_flow_lph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling_btu_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_hp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torque_lb_ft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_points: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_liters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valve_train: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bore_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam_intake_lift_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam_exhaust_lift_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam_intake_duration_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cam_exhaust_duration_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redline_rpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_rpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oil_pan_depth_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oil_pan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_accessory_drive_depth_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling_system_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thermostat_temp_f: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhaust_port_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exhaust_header_primary_od_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_radiator_rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_bus_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_type: Option<String>,
}

/// Response from the engine list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineList {
    pub engines: Vec<Engine>,
    pub total: u64,
}

// ============================================================================
// Transmissions
// ============================================================================

/// Catalog transmission with gearbox and fitment specs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transmission {
    pub id: String,
    pub make: String,
    pub model: String,
    pub dimensions_h: Option<f64>,
    pub dimensions_w: Option<f64>,
    pub dimensions_l: Option<f64>,
    pub weight: Option<f64>,
    pub bellhousing_pattern: Option<String>,
    pub mesh_file_url: Option<String>,
    // gearbox specs
    pub trans_type: Option<String>,
    pub gear_count: Option<u32>,
    pub gear_ratios: Option<HashMap<String, f64>>,
    pub input_shaft_spline: Option<String>,
    pub output_shaft_spline: Option<String>,
    pub max_torque_capacity_lb_ft: Option<f64>,
    pub shift_linkage_type: Option<String>,
    pub crossmember_drop_in: Option<f64>,
    pub tailhousing_length_in: Option<f64>,
    pub speedometer_drive: Option<String>,
    // provenance
    pub data_sources: Option<DataSources>,
    pub data_source_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for contributing a transmission to the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransmissionCreate {
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions_l: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bellhousing_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gear_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gear_ratios: Option<HashMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_shaft_spline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_shaft_spline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_torque_capacity_lb_ft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_linkage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossmember_drop_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailhousing_length_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speedometer_drive: Option<String>,
}

/// Response from the transmission list and compatibility endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransmissionList {
    pub transmissions: Vec<Transmission>,
    pub total: u64,
}

// ============================================================================
// Builds
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Draft,
    Complete,
}

/// A saved engine-swap build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub engine_id: String,
    pub transmission_id: Option<String>,
    pub engine_position: Option<serde_json::Value>,
    pub accessory_config: Option<serde_json::Value>,
    pub collision_data: Option<serde_json::Value>,
    pub status: BuildStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a build; the transmission is optional and its key
/// is omitted entirely when unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildCreate {
    pub vehicle_id: String,
    pub engine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_id: Option<String>,
}

/// Partial update for a build; unset fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_position: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessory_config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BuildStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_id: Option<String>,
}

/// Response from the build list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildList {
    pub builds: Vec<Build>,
    pub total: u64,
}

/// Full JSON export of a build with its resolved components.
///
/// The server trims each component down to an export summary rather than
/// re-sending the catalog record, so the component payloads stay untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildExport {
    pub build: Build,
    pub vehicle: serde_json::Value,
    pub engine: serde_json::Value,
    pub transmission: Option<serde_json::Value>,
    pub recommendations: Option<Vec<String>>,
}

// ============================================================================
// Advisor chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One persisted advisor chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    pub id: String,
    pub build_id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Response from the chat history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessageRecord>,
    pub total: u64,
}

/// Question sent to the advisor, scoped to one build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub build_id: String,
    pub message: String,
}

/// Advisor answer with optional source citations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

// ============================================================================
// Files
// ============================================================================

/// Response from the upload endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub filename: String,
    pub stored_path: String,
    pub url: String,
    pub size_bytes: u64,
}

// ============================================================================
// List filters
// ============================================================================

/// Filter for the vehicle list endpoint
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl VehicleFilter {
    /// Query pairs for the list endpoint. Unset, empty, and zero fields
    /// contribute nothing, so a default filter yields no query string.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_number(&mut pairs, "year", self.year.map(i64::from));
        push_text(&mut pairs, "make", self.make.as_deref());
        push_text(&mut pairs, "model", self.model.as_deref());
        push_number(&mut pairs, "skip", self.skip.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        pairs
    }
}

/// Filter for the engine list endpoint
#[derive(Debug, Clone, Default)]
pub struct EngineFilter {
    pub make: Option<String>,
    pub min_hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl EngineFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "make", self.make.as_deref());
        push_number(&mut pairs, "min_hp", self.min_hp.map(i64::from));
        push_number(&mut pairs, "max_hp", self.max_hp.map(i64::from));
        push_number(&mut pairs, "skip", self.skip.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        pairs
    }
}

/// Filter for the transmission list endpoint
#[derive(Debug, Clone, Default)]
pub struct TransmissionFilter {
    pub make: Option<String>,
    pub bellhousing_pattern: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl TransmissionFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "make", self.make.as_deref());
        push_text(&mut pairs, "bellhousing_pattern", self.bellhousing_pattern.as_deref());
        push_number(&mut pairs, "skip", self.skip.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        pairs
    }
}

/// Pagination for the build list endpoint
#[derive(Debug, Clone, Default)]
pub struct BuildFilter {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl BuildFilter {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_number(&mut pairs, "skip", self.skip.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        pairs
    }
}

// Falsy filter values (empty strings, zero) are treated as unset so they
// never reach the query string.
fn push_text(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            pairs.push((key.to_string(), v.to_string()));
        }
    }
}

fn push_number(pairs: &mut Vec<(String, String)>, key: &str, value: Option<i64>) {
    if let Some(v) = value {
        if v != 0 {
            pairs.push((key.to_string(), v.to_string()));
        }
    }
}
