// Mesa de Ayuda - help-desk client for media service requests
// This exposes the core components for testing and integration

pub mod api;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod observability;
pub mod session;
pub mod telemetry;
pub mod views;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ApiError, ApiGateway, ApiResult, HttpGateway, Solicitud, SolicitudesApi};
pub use config::MesaAyudaConfig;
pub use handlers::{ActionHandlers, HandlerError, Refreshed, Screen};
pub use observability::{api_metrics, OperationTimer};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionPersistence};
pub use telemetry::{create_action_span, generate_correlation_id, init_telemetry};
pub use views::ViewKind;
pub use workflows::{authorize, legal_actions, Action, Intent, Role, Status, Transition, Viewer};
