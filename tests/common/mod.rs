//! Shared fixtures: an in-memory help-desk backend and request builders

#![allow(dead_code)]

use async_trait::async_trait;
use mesa_ayuda::api::{ApiError, ApiGateway, ApiResult};
use mesa_ayuda::session::Session;
use mesa_ayuda::workflows::Role;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub authenticated: bool,
}

type Mutation = Box<dyn Fn(&str, &Value, &mut Value) + Send + Sync>;

/// Serves one request. Mutations are recorded and, when a rule is set,
/// applied to the stored request so the next fetch reflects them.
pub struct FakeBackend {
    request: Mutex<Value>,
    calls: Mutex<Vec<Call>>,
    on_mutation: Option<Mutation>,
    mutation_error: Option<ApiError>,
    gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn serving(request: Value) -> Self {
        Self {
            request: Mutex::new(request),
            calls: Mutex::new(Vec::new()),
            on_mutation: None,
            mutation_error: None,
            gate: None,
        }
    }

    pub fn on_mutation(mut self, rule: impl Fn(&str, &Value, &mut Value) + Send + Sync + 'static) -> Self {
        self.on_mutation = Some(Box::new(rule));
        self
    }

    pub fn failing_mutations(mut self, error: ApiError) -> Self {
        self.mutation_error = Some(error);
        self
    }

    /// Mutations wait until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != Method::GET)
            .collect()
    }

    pub fn current(&self) -> Value {
        self.request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiGateway for FakeBackend {
    async fn request(
        &self,
        session: Option<&Session>,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<Option<Value>> {
        self.calls.lock().unwrap().push(Call {
            method: method.clone(),
            path: path.to_string(),
            body: body.clone(),
            authenticated: session.is_some(),
        });

        if method == Method::GET {
            let current = self.current();
            return Ok(Some(if path == "/Solicitudes" {
                json!([current])
            } else {
                current
            }));
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(error) = &self.mutation_error {
            return Err(error.clone());
        }
        if let Some(rule) = &self.on_mutation {
            let mut request = self.request.lock().unwrap();
            rule(path, body.as_ref().unwrap_or(&Value::Null), &mut request);
        }
        Ok(None)
    }
}

pub fn session(user_id: &str, roles: &[Role]) -> Session {
    Session {
        token: format!("token-{user_id}"),
        user_id: user_id.to_string(),
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        display_name: format!("User {user_id}"),
        default_department: Some("Ingeniería".to_string()),
    }
}

pub fn solicitud(id: &str, status: &str, requester: &str, collaborator: Option<&str>, rating: Option<u8>) -> Value {
    json!({
        "id": id,
        "numeroSolicitud": format!("SOL-{id}"),
        "titulo": "Cobertura de ceremonia",
        "descripcion": "Video de la ceremonia de grados",
        "formatoRequerido": "Video",
        "solicitanteId": requester,
        "solicitanteNombre": "Ana Pérez",
        "solicitanteEmail": "ana@example.edu",
        "facultadOrigen": "Ingeniería",
        "estado": status,
        "colaboradorAsignadoId": collaborator,
        "colaboradorAsignadoNombre": collaborator.map(|_| "Beto Ruiz"),
        "calificacionServicio": rating,
        "fechaCreacion": "2025-03-01T10:00:00",
        "comentarios": []
    })
}
