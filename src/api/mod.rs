pub mod auth;
pub mod client;
pub mod errors;
pub mod solicitudes;
pub mod types;

pub use auth::AuthApi;
pub use client::{decode, ApiGateway, HttpGateway};
pub use errors::{ApiError, ApiResult};
pub use solicitudes::{transition_call, SolicitudesApi};
pub use types::{
    Collaborator, Comment, LoginRequest, LoginResponse, NewSolicitud, RegisterRequest,
    RequestFormat, Solicitud,
};
