use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use super::client::{decode, ApiGateway};
use super::errors::ApiResult;
use super::types::{Collaborator, NewSolicitud, Solicitud};
use crate::session::Session;
use crate::workflows::{Status, Transition};

/// Escapes everything but `-`, `_` and `~`, so dots and slashes stay inside the segment
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

fn segment(id: &str) -> String {
    utf8_percent_encode(id, ID_SEGMENT).to_string()
}

/// Typed access to the `/Solicitudes` endpoints on behalf of a session
pub struct SolicitudesApi<'a> {
    gateway: &'a dyn ApiGateway,
    session: &'a Session,
}

impl<'a> SolicitudesApi<'a> {
    pub fn new(gateway: &'a dyn ApiGateway, session: &'a Session) -> Self {
        Self { gateway, session }
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Option<Value>> {
        self.gateway.request(Some(self.session), method, path, body).await
    }

    /// Requests visible to the viewer; the backend filters by role and identity
    pub async fn list(&self) -> ApiResult<Vec<Solicitud>> {
        let path = "/Solicitudes";
        decode(path, self.call(Method::GET, path, None).await?)
    }

    /// One request with its comment thread
    pub async fn get(&self, id: &str) -> ApiResult<Solicitud> {
        let path = format!("/Solicitudes/{}", segment(id));
        decode(&path, self.call(Method::GET, &path, None).await?)
    }

    /// Submit a new request. The created request is returned when the backend
    /// sends it back.
    pub async fn create(&self, new: &NewSolicitud) -> ApiResult<Option<Solicitud>> {
        let path = "/Solicitudes";
        let body = serde_json::to_value(new).map_err(|e| super::ApiError::decode(path, e))?;
        match self.call(Method::POST, path, Some(body)).await? {
            Some(value) => {
                let created: Solicitud = decode(path, Some(value))?;
                info!(request_id = %created.id, "Request created");
                Ok(Some(created))
            }
            None => Ok(None),
        }
    }

    pub async fn collaborators(&self) -> ApiResult<Vec<Collaborator>> {
        let path = "/Solicitudes/colaboradores";
        decode(path, self.call(Method::GET, path, None).await?)
    }

    /// Send a validated transition. Any 2xx, including an empty 204, is success.
    pub async fn apply(&self, id: &str, transition: &Transition) -> ApiResult<()> {
        let (method, path, body) = transition_call(id, transition);
        self.call(method, &path, Some(body)).await?;
        Ok(())
    }

    pub async fn comment(&self, id: &str, content: &str) -> ApiResult<()> {
        let path = format!("/Solicitudes/comment/{}", segment(id));
        self.call(Method::POST, &path, Some(json!({ "contenido": content })))
            .await?;
        Ok(())
    }
}

/// Endpoint and structured body for each transition
pub fn transition_call(id: &str, transition: &Transition) -> (Method, String, Value) {
    let id = segment(id);
    match transition {
        Transition::Assign { collaborator_id } => (
            Method::PUT,
            format!("/Solicitudes/assign/{id}"),
            json!({ "colaboradorId": collaborator_id }),
        ),
        Transition::Approve { comment } => (
            Method::PUT,
            format!("/Solicitudes/approve/{id}"),
            json!({ "comentarios": comment }),
        ),
        Transition::Reject { comment } => (
            Method::PUT,
            format!("/Solicitudes/reject/{id}"),
            json!({ "comentarios": comment }),
        ),
        Transition::ReturnForCorrection { comment } => (
            Method::PUT,
            format!("/Solicitudes/update-status/{id}"),
            json!({
                "estado": Status::ReturnedForCorrection.wire_name(),
                "comentarios": comment,
            }),
        ),
        Transition::MarkInProcess => (
            Method::PUT,
            format!("/Solicitudes/update-status/{id}"),
            json!({ "estado": Status::InProcess.wire_name() }),
        ),
        Transition::MarkResolved => (
            Method::PUT,
            format!("/Solicitudes/update-status/{id}"),
            json!({ "estado": Status::Resolved.wire_name() }),
        ),
        Transition::Reopen { reason } => (
            Method::PUT,
            format!("/Solicitudes/reopen/{id}"),
            json!({ "motivoReapertura": reason }),
        ),
        Transition::Rate { score, comment } => (
            Method::PUT,
            format!("/Solicitudes/rate/{id}"),
            json!({
                "calificacionServicio": score,
                "comentariosCalificacion": comment,
            }),
        ),
    }
}
