//! Pariksha - inspection pipeline controller
//!
//! Coordinates a scan → surface detection → operator selection pipeline
//! under concurrent service requests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                service / threads/                   │  ← Runtime
//! │   (dispatch pool, region cloud publisher, notifier) │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   controller/                       │  ← Orchestration
//! │          (action table, request protocol)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │        params/  ·  state/  ·  stages/               │  ← Pipeline state
//! │ (current/default store, result cache, stage traits) │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              core/  ·  streaming/                   │  ← Foundation
//! │      (poses, clouds, surfaces, broadcast topics)    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Surface detection actions
//!
//! | Code | Action | Parameters touched | Stages |
//! |------|--------|--------------------|--------|
//! | 1 | GET_CURRENT_PARAMETERS | - | - |
//! | 2 | GET_DEFAULT_PARAMETERS | - | - |
//! | 3 | PUBLISH_SCAN_PATH | scan | preview |
//! | 4 | SCAN_AND_FIND_ONLY | scan, detection | scan, find |
//! | 5 | SCAN_FIND_AND_RETURN | scan, detection | scan, find |
//! | 6 | FIND_ONLY | detection | find |
//! | 7 | FIND_AND_RETURN | detection | find |
//! | 8 | RETURN_LATEST_RESULTS | - | - |

pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod params;
pub mod service;
pub mod stages;
pub mod state;
pub mod streaming;
pub mod threads;

pub use config::{ParikshaConfig, ServiceConfig};
pub use controller::{
    Action, PipelineController, SelectAction, SelectSurfaceRequest, SurfaceDetectionRequest,
    SurfaceDetectionResponse,
};
pub use error::{ParikshaError, Result};
pub use params::{
    BlendingParameters, DetectionParameters, ParameterSet, ParameterStore, ScanParameters,
};
pub use service::{StageSet, SurfaceService, Topics};
pub use state::{CancelTicket, DetectionResult, ResultCache};
