//! Guided build assembly
//!
//! A four-step wizard (vehicle, engine, transmission, review) that owns the
//! in-progress selections and sequencing rules. Hosts render the current
//! step and forward events; the wizard decides what advances, what fetches,
//! and what finally becomes a build on the server.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::gateway::SwapSpecClient;
use crate::types::{
    Build, BuildCreate, Engine, QualityStatus, Transmission, TransmissionList, Vehicle,
    VehicleCreate, VehicleFilter, VinDecodeResponse,
};

/// Steps of the build wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectVehicle,
    SelectEngine,
    SelectTransmission,
    Review,
}

impl WizardStep {
    /// Zero-based position in the flow.
    pub fn index(&self) -> usize {
        match self {
            WizardStep::SelectVehicle => 0,
            WizardStep::SelectEngine => 1,
            WizardStep::SelectTransmission => 2,
            WizardStep::Review => 3,
        }
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectVehicle => Some(WizardStep::SelectEngine),
            WizardStep::SelectEngine => Some(WizardStep::SelectTransmission),
            WizardStep::SelectTransmission => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectVehicle => None,
            WizardStep::SelectEngine => Some(WizardStep::SelectVehicle),
            WizardStep::SelectTransmission => Some(WizardStep::SelectEngine),
            WizardStep::Review => Some(WizardStep::SelectTransmission),
        }
    }
}

/// What a VIN decode found, pending the user's decision.
#[derive(Debug, Clone)]
pub enum VinDecodeOutcome {
    /// The decode matches an approved catalog vehicle; the user chooses
    /// between adopting it and adding the draft anyway.
    DuplicateFound {
        existing: Vehicle,
        draft: VehicleCreate,
    },
    /// Nothing matches; the draft awaits an explicit add.
    NoMatch { draft: VehicleCreate },
}

/// Four-step guided assembly of a new build.
///
/// Selections survive backwards navigation; compatible-transmission
/// candidates are fetched on entering the transmission step and dropped the
/// moment a different engine is chosen. Completion hands back the created
/// [`Build`] and the wizard refuses to submit twice.
pub struct BuildWizard {
    client: Arc<SwapSpecClient>,
    step: WizardStep,
    vehicle: Option<Vehicle>,
    engine: Option<Engine>,
    transmission: Option<Transmission>,
    candidates: Option<TransmissionList>,
    pending_decode: Option<VinDecodeOutcome>,
    completed: bool,
}

impl BuildWizard {
    pub fn new(client: Arc<SwapSpecClient>) -> Self {
        Self {
            client,
            step: WizardStep::SelectVehicle,
            vehicle: None,
            engine: None,
            transmission: None,
            candidates: None,
            pending_decode: None,
            completed: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref()
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn transmission(&self) -> Option<&Transmission> {
        self.transmission.as_ref()
    }

    /// Compatible transmissions for the selected engine, once loaded.
    /// `None` means not fetched yet or the last fetch failed.
    pub fn transmission_candidates(&self) -> Option<&TransmissionList> {
        self.candidates.as_ref()
    }

    pub fn pending_decode(&self) -> Option<&VinDecodeOutcome> {
        self.pending_decode.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn select_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = Some(vehicle);
    }

    /// Selecting an engine drops any cached candidates so they can never
    /// describe a previously selected engine.
    pub fn select_engine(&mut self, engine: Engine) {
        self.candidates = None;
        self.engine = Some(engine);
    }

    pub fn select_transmission(&mut self, transmission: Transmission) {
        self.transmission = Some(transmission);
    }

    /// The transmission is optional; clearing it is the same as never
    /// having chosen one.
    pub fn clear_transmission(&mut self) {
        self.transmission = None;
    }

    /// Whether the current step's guard allows moving forward.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::SelectVehicle => self.vehicle.is_some(),
            WizardStep::SelectEngine => self.engine.is_some(),
            WizardStep::SelectTransmission => true,
            WizardStep::Review => false,
        }
    }

    /// Moves one step forward when the guard allows it; otherwise a no-op
    /// reporting the unchanged step. Entering the transmission step fetches
    /// the candidates for the selected engine; the step still advances when
    /// that fetch fails, and the error is surfaced so the caller can retry
    /// via [`reload_transmission_candidates`](Self::reload_transmission_candidates).
    pub async fn advance(&mut self) -> Result<WizardStep> {
        if !self.can_advance() {
            debug!(step = self.step.index(), "advance blocked by unmet selection");
            return Ok(self.step);
        }
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        self.step = next;
        if next == WizardStep::SelectTransmission {
            self.reload_transmission_candidates().await?;
        }
        Ok(self.step)
    }

    /// Moves one step backward, keeping every selection. Never touches the
    /// network and never goes past the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Fetches compatible transmissions keyed by the selected engine. With
    /// no engine selected nothing is issued and the list comes back empty.
    pub async fn reload_transmission_candidates(&mut self) -> Result<()> {
        let Some(engine_id) = self.engine.as_ref().map(|e| e.id.clone()) else {
            self.candidates = Some(TransmissionList {
                transmissions: Vec::new(),
                total: 0,
            });
            return Ok(());
        };
        match self.client.compatible_transmissions(&engine_id).await {
            Ok(list) => {
                self.candidates = Some(list);
                Ok(())
            }
            Err(e) => {
                self.candidates = None;
                Err(e)
            }
        }
    }

    /// Decodes a VIN and checks the catalog for an approved vehicle with
    /// the same year, make, and model (make and model compared
    /// case-insensitively). The outcome stays pending until resolved by
    /// [`use_existing_vehicle`], [`create_decoded_vehicle`], or
    /// [`discard_decode`].
    ///
    /// [`use_existing_vehicle`]: Self::use_existing_vehicle
    /// [`create_decoded_vehicle`]: Self::create_decoded_vehicle
    /// [`discard_decode`]: Self::discard_decode
    pub async fn decode_vin(&mut self, vin: &str) -> Result<VinDecodeOutcome> {
        let decoded = self.client.decode_vin(vin).await?;
        let draft = draft_from_decode(&decoded)?;

        let filter = VehicleFilter {
            year: Some(draft.year),
            make: Some(draft.make.clone()),
            model: Some(draft.model.clone()),
            ..VehicleFilter::default()
        };
        let existing = self.client.vehicles(&filter).await?;
        let duplicate = existing.vehicles.into_iter().find(|v| {
            v.quality_status == QualityStatus::Approved
                && v.year == draft.year
                && v.make.eq_ignore_ascii_case(&draft.make)
                && v.model.eq_ignore_ascii_case(&draft.model)
        });

        let outcome = match duplicate {
            Some(existing) => VinDecodeOutcome::DuplicateFound { existing, draft },
            None => VinDecodeOutcome::NoMatch { draft },
        };
        self.pending_decode = Some(outcome.clone());
        Ok(outcome)
    }

    /// Adopts the existing approved vehicle from a pending duplicate. No
    /// network call; the decoded draft is discarded.
    pub fn use_existing_vehicle(&mut self) -> Result<Vehicle> {
        match self.pending_decode.take() {
            Some(VinDecodeOutcome::DuplicateFound { existing, .. }) => {
                info!(vehicle_id = %existing.id, "adopting existing vehicle for build");
                self.vehicle = Some(existing.clone());
                Ok(existing)
            }
            other => {
                self.pending_decode = other;
                Err(ApiError::Validation(
                    "no duplicate candidate to adopt".to_string(),
                ))
            }
        }
    }

    /// Creates a vehicle from the pending draft ("add anyway" for a
    /// duplicate, a plain add otherwise) and adopts it. Exactly one
    /// creation call per confirmation; a failed call leaves the pending
    /// decode in place for retry.
    pub async fn create_decoded_vehicle(&mut self) -> Result<Vehicle> {
        let draft = match self.pending_decode.as_ref() {
            Some(VinDecodeOutcome::DuplicateFound { draft, .. })
            | Some(VinDecodeOutcome::NoMatch { draft }) => draft.clone(),
            None => {
                return Err(ApiError::Validation(
                    "no decoded vehicle to add".to_string(),
                ))
            }
        };
        let created = self.client.create_vehicle(&draft).await?;
        self.pending_decode = None;
        self.vehicle = Some(created.clone());
        Ok(created)
    }

    /// Drops the pending decode without resolving it.
    pub fn discard_decode(&mut self) {
        self.pending_decode = None;
    }

    /// Submits the build at the review step and hands back the created
    /// record. On failure the wizard stays at review with its selections
    /// intact, ready for retry; after a success it refuses to submit again.
    pub async fn submit(&mut self) -> Result<Build> {
        if self.completed {
            return Err(ApiError::Validation("build was already created".to_string()));
        }
        if self.step != WizardStep::Review {
            return Err(ApiError::Validation(
                "finish the wizard before submitting".to_string(),
            ));
        }
        let (Some(vehicle), Some(engine)) = (self.vehicle.as_ref(), self.engine.as_ref()) else {
            return Err(ApiError::Validation(
                "a vehicle and an engine are required".to_string(),
            ));
        };

        let request = BuildCreate {
            vehicle_id: vehicle.id.clone(),
            engine_id: engine.id.clone(),
            transmission_id: self.transmission.as_ref().map(|t| t.id.clone()),
        };
        let build = self.client.create_build(&request).await?;
        self.completed = true;
        info!(build_id = %build.id, "build created");
        Ok(build)
    }
}

/// Builds a creation draft from decoded fields. Year, make, and model are
/// required by the catalog schema; a decode missing any of them cannot
/// produce a draft.
fn draft_from_decode(decoded: &VinDecodeResponse) -> Result<VehicleCreate> {
    match (decoded.year, decoded.make.as_deref(), decoded.model.as_deref()) {
        (Some(year), Some(make), Some(model)) if !make.is_empty() && !model.is_empty() => {
            Ok(VehicleCreate {
                year,
                make: make.to_string(),
                model: model.to_string(),
                trim: decoded.trim.clone(),
                ..VehicleCreate::default()
            })
        }
        _ => Err(ApiError::Validation(
            "VIN decode did not return year, make, and model".to_string(),
        )),
    }
}
