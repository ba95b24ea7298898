//! External service boundaries: persistence, auto-layout engines,
//! rendering, and artwork upload.
//!
//! The editor core never talks to a network itself; callers hand it
//! implementations of these traits. Responses are normalized through the
//! same path as loaded files, so a misbehaving service cannot corrupt the
//! model, and a failed call leaves the model untouched.

use tracing::{debug, warn};

use imposekit_core::error::ServiceError;

use crate::editor_state::EditorState;
use crate::model::Design;
use crate::serialization::{DesignData, LayoutFile};

/// Where finished layouts are stored.
pub trait PersistenceEndpoint {
    fn save_layout(&self, file: &LayoutFile) -> Result<(), ServiceError>;
}

/// A request for an automatic imposition run.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub layout: LayoutFile,
    pub engine: String,
}

/// An imposition engine that proposes a complete layout.
pub trait LayoutEngine {
    fn auto_layout(&self, request: &EngineRequest) -> Result<LayoutFile, ServiceError>;
}

/// Address of a rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrl(pub String);

/// Produces previews and print-ready output from a layout.
pub trait RenderService {
    fn preview(&self, file: &LayoutFile) -> Result<AssetUrl, ServiceError>;
    fn pdf(&self, file: &LayoutFile) -> Result<AssetUrl, ServiceError>;
}

/// One artwork file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Accepts artwork uploads and returns the resulting design records.
pub trait UploadEndpoint {
    fn upload(&self, files: &[UploadFile]) -> Result<Vec<DesignData>, ServiceError>;
}

impl EditorState {
    /// Sends the current layout to an imposition engine and replaces the
    /// model with the (normalized) response. The engine's answer always
    /// wins over whatever happened since the request was built; the
    /// pre-request state stays one undo step away.
    pub fn request_auto_layout(
        &mut self,
        engine: &impl LayoutEngine,
    ) -> Result<(), ServiceError> {
        let request = EngineRequest {
            layout: LayoutFile::from_layout(&self.layout, ""),
            engine: self.layout.imposition_engine.clone(),
        };
        debug!(engine = %request.engine, "requesting auto layout");
        let response = engine.auto_layout(&request)?;
        self.replace_layout(response.into_layout());
        Ok(())
    }

    /// Saves the layout through a persistence endpoint. The model is not
    /// modified either way.
    pub fn save(&self, endpoint: &impl PersistenceEndpoint, name: &str) -> Result<(), ServiceError> {
        let file = LayoutFile::from_layout(&self.layout, name);
        endpoint.save_layout(&file)
    }

    /// Requests a preview render of the current layout. The model is not
    /// modified.
    pub fn request_preview(
        &self,
        service: &impl RenderService,
    ) -> Result<AssetUrl, ServiceError> {
        service.preview(&LayoutFile::from_layout(&self.layout, ""))
    }

    /// Requests print-ready output for the current layout. The model is
    /// not modified.
    pub fn request_pdf(&self, service: &impl RenderService) -> Result<AssetUrl, ServiceError> {
        service.pdf(&LayoutFile::from_layout(&self.layout, ""))
    }

    /// Uploads artwork and merges the returned designs into the layout,
    /// replacing any existing design with the same ref. Returns the refs.
    /// One snapshot is recorded for the whole batch.
    pub fn upload_designs(
        &mut self,
        endpoint: &impl UploadEndpoint,
        files: &[UploadFile],
    ) -> Result<Vec<String>, ServiceError> {
        let responses = endpoint.upload(files)?;
        let mut refs = Vec::with_capacity(responses.len());
        for data in responses {
            if data.design_ref.is_empty() {
                warn!("upload response missing a design ref, skipped");
                continue;
            }
            refs.push(data.design_ref.clone());
            self.layout.upsert_design(Design {
                design_ref: data.design_ref,
                filename: data.filename,
                width_mm: data.width_mm,
                height_mm: data.height_mm,
                bleed_mm: data
                    .bleed_mm
                    .unwrap_or(self.layout.sheet.default_bleed_mm),
                allow_rotation: data.allow_rotation,
                forms_per_plate: data.forms_per_plate.max(1),
                work_id: data.work_id,
            });
        }
        if !refs.is_empty() {
            self.commit();
        }
        Ok(refs)
    }
}
