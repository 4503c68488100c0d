use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::workflows::{Status, Subject, ValidationError};

/// Service formats a request can ask for ("formatoRequerido")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestFormat {
    #[serde(rename = "Video")]
    Video,
    #[serde(rename = "Fotografia", alias = "Photography")]
    Photography,
    #[serde(rename = "Transmision", alias = "Broadcast")]
    Broadcast,
    #[serde(rename = "CursoVirtual", alias = "VirtualCourse")]
    VirtualCourse,
    #[serde(rename = "Animacion", alias = "Animation")]
    Animation,
    #[serde(rename = "DisenoGrafico", alias = "GraphicDesign")]
    GraphicDesign,
}

impl RequestFormat {
    pub const ALL: [RequestFormat; 6] = [
        RequestFormat::Video,
        RequestFormat::Photography,
        RequestFormat::Broadcast,
        RequestFormat::VirtualCourse,
        RequestFormat::Animation,
        RequestFormat::GraphicDesign,
    ];

    fn names(self) -> (&'static str, &'static str) {
        match self {
            RequestFormat::Video => ("Video", "Video"),
            RequestFormat::Photography => ("Fotografia", "Photography"),
            RequestFormat::Broadcast => ("Transmision", "Broadcast"),
            RequestFormat::VirtualCourse => ("CursoVirtual", "VirtualCourse"),
            RequestFormat::Animation => ("Animacion", "Animation"),
            RequestFormat::GraphicDesign => ("DisenoGrafico", "GraphicDesign"),
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.names().1)
    }
}

impl FromStr for RequestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        RequestFormat::ALL
            .into_iter()
            .find(|format| {
                let (wire, english) = format.names();
                wire.to_lowercase() == wanted || english.to_lowercase() == wanted
            })
            .ok_or_else(|| {
                let known: Vec<String> = RequestFormat::ALL.iter().map(|f| f.to_string()).collect();
                format!("unknown format '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// A service request ("Solicitud") as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitud {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "numeroSolicitud", default, deserialize_with = "wire::optional_id")]
    pub number: Option<String>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default, deserialize_with = "wire::null_as_default")]
    pub description: String,
    #[serde(rename = "formatoRequerido")]
    pub format: RequestFormat,
    #[serde(rename = "solicitanteId", deserialize_with = "wire::id")]
    pub requester_id: String,
    #[serde(rename = "solicitanteNombre", default, deserialize_with = "wire::null_as_default")]
    pub requester_name: String,
    #[serde(rename = "solicitanteEmail", default, deserialize_with = "wire::null_as_default")]
    pub requester_email: String,
    #[serde(rename = "facultadOrigen", default, deserialize_with = "wire::null_as_default")]
    pub department: String,
    #[serde(rename = "fechaEvento", default)]
    pub event_date: Option<String>,
    #[serde(rename = "horaEvento", default)]
    pub event_time: Option<String>,
    #[serde(rename = "lugarEvento", default)]
    pub event_place: Option<String>,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "colaboradorAsignadoId", default, deserialize_with = "wire::optional_id")]
    pub collaborator_id: Option<String>,
    #[serde(rename = "colaboradorAsignadoNombre", default)]
    pub collaborator_name: Option<String>,
    #[serde(rename = "calificacionServicio", default)]
    pub rating: Option<u8>,
    #[serde(rename = "comentariosCalificacion", default)]
    pub rating_comment: Option<String>,
    #[serde(rename = "fechaCreacion", deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "comentarios", default, deserialize_with = "wire::null_as_default")]
    pub comments: Vec<Comment>,
}

impl Solicitud {
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }

    /// Authorization facts for the workflow engine
    pub fn subject(&self) -> Subject {
        Subject {
            status: self.status,
            requester_id: self.requester_id.clone(),
            collaborator_id: self.collaborator_id.clone(),
            rated: self.is_rated(),
        }
    }

    /// Human-facing reference: the sequential number when present, the id otherwise
    pub fn reference(&self) -> &str {
        self.number.as_deref().unwrap_or(&self.id)
    }

    /// Comments oldest first; the backend order is not relied on
    pub fn comments_in_order(&self) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self.comments.iter().collect();
        comments.sort_by_key(|c| c.created_at);
        comments
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "autorId", deserialize_with = "wire::id")]
    pub author_id: String,
    #[serde(rename = "autorNombre", default, deserialize_with = "wire::null_as_default")]
    pub author_name: String,
    #[serde(rename = "contenido")]
    pub content: String,
    #[serde(rename = "fechaCreacion", deserialize_with = "wire::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Assignment candidate from `GET /Solicitudes/colaboradores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(rename = "nombreCompleto", default, deserialize_with = "wire::null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, ValidationError> {
        let request = Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        };
        if request.email.is_empty() {
            return Err(ValidationError::MissingField { field: "email" });
        }
        if request.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId", deserialize_with = "wire::id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub roles: Vec<String>,
    #[serde(rename = "nombreCompleto", default, deserialize_with = "wire::null_as_default")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nombre_completo: String,
    pub numero_identificacion: String,
    pub numero_celular: String,
    #[serde(rename = "rolTdeA")]
    pub rol_tdea: String,
    pub sede: String,
    pub facultad_dependencia: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("email", &self.email),
            ("password", &self.password),
            ("name", &self.nombre_completo),
            ("id-number", &self.numero_identificacion),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }
        Ok(())
    }
}

/// Body of `POST /Solicitudes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSolicitud {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "formatoRequerido")]
    pub format: RequestFormat,
    #[serde(rename = "fechaEvento", skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(rename = "horaEvento", skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(rename = "lugarEvento", skip_serializing_if = "Option::is_none")]
    pub event_place: Option<String>,
    #[serde(rename = "facultadOrigen")]
    pub department: String,
}

impl NewSolicitud {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "title" });
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "description" });
        }
        if self.department.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "department" });
        }
        Ok(())
    }
}

/// Lenient decoders for what the backend may send
pub(crate) mod wire {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_id<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(E::custom(format!("expected a string or number id, got {other}"))),
        }
    }

    /// Ids arrive as GUID strings or integers
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        value_to_id(Value::deserialize(deserializer)?)
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value_to_id(value).map(Some),
        }
    }

    /// `null` reads as the empty value, same as a missing field
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// RFC 3339, or a zone-less ISO timestamp taken as UTC
    pub fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
