//! The HTTP contract of the order endpoint.
//!
//! Field names follow the storefront's order endpoint, which expects the
//! Spanish form keys (`nombre`, `codigoPostal`, ...).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assemble::OrderPayload;
use crate::errors::{FieldMessage, OrderError, SubmissionFailure};

/// Where the endpoint redirects after a successful order.
pub const DEFAULT_SUCCESS_REDIRECT: &str = "/pedido-exitoso";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StreetType {
    #[default]
    Calle,
    Avenida,
    Plaza,
    Paseo,
    Carretera,
}

impl StreetType {
    pub fn name(&self) -> &'static str {
        match self {
            StreetType::Calle => "Calle",
            StreetType::Avenida => "Avenida",
            StreetType::Plaza => "Plaza",
            StreetType::Paseo => "Paseo",
            StreetType::Carretera => "Carretera",
        }
    }
}

fn default_country() -> String {
    "España".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub street_type: StreetType,
    pub address: String,
    /// Floor, door and the like.
    #[serde(default)]
    pub extra: String,
    /// Five digits; checked by the endpoint, not here.
    pub postal_code: String,
    pub city: String,
    pub province: String,
    #[serde(default = "default_country")]
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "DNI")]
    Dni,
    #[serde(rename = "CIF")]
    Cif,
}

impl DocumentKind {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Dni => "DNI",
            DocumentKind::Cif => "CIF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub kind: DocumentKind,
    pub number: String,
}

/// Everything the order endpoint needs: customer details plus the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub contact: ContactDetails,
    pub address: ShippingAddress,
    #[serde(default)]
    pub document: Option<IdentityDocument>,
    #[serde(default)]
    pub comments: Option<String>,
    pub payload: OrderPayload,
}

/// Flat wire body, in the endpoint's field names.
#[derive(Debug, Serialize)]
struct WireBody<'a> {
    nombre: &'a str,
    email: &'a str,
    telefono: &'a str,
    #[serde(rename = "tipoVia")]
    tipo_via: &'static str,
    direccion: &'a str,
    #[serde(rename = "otrosDatos")]
    otros_datos: &'a str,
    #[serde(rename = "codigoPostal")]
    codigo_postal: &'a str,
    poblacion: &'a str,
    provincia: &'a str,
    pais: &'a str,
    #[serde(rename = "tipoDocumento")]
    tipo_documento: &'static str,
    documento: &'a str,
    talla: &'static str,
    genero: &'static str,
    #[serde(rename = "logoSize")]
    logo_size: &'static str,
    #[serde(rename = "logoPosition")]
    logo_position: String,
    #[serde(rename = "selectedLogo")]
    selected_logo: String,
    comentarios: &'a str,
    /// The order design, JSON-encoded.
    pedido: String,
    #[serde(rename = "diseñoImagen")]
    diseno_imagen: String,
}

impl OrderRequest {
    fn wire_body(&self) -> Result<WireBody<'_>, OrderError> {
        let design = &self.payload.design;
        let pedido = serde_json::to_string(design).map_err(|e| OrderError::Serialization {
            reason: e.to_string(),
        })?;
        let (tipo_documento, documento) = match &self.document {
            Some(doc) => (doc.kind.name(), doc.number.as_str()),
            None => ("", ""),
        };

        Ok(WireBody {
            nombre: &self.contact.name,
            email: &self.contact.email,
            telefono: &self.contact.phone,
            tipo_via: self.address.street_type.name(),
            direccion: &self.address.address,
            otros_datos: &self.address.extra,
            codigo_postal: &self.address.postal_code,
            poblacion: &self.address.city,
            provincia: &self.address.province,
            pais: &self.address.country,
            tipo_documento,
            documento,
            talla: design.garment.size.name(),
            genero: design.garment.gender.name(),
            logo_size: design.size_tier.label(),
            logo_position: design
                .logos
                .iter()
                .map(|l| l.region_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            selected_logo: design
                .logos
                .iter()
                .map(|l| l.asset.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            comentarios: self.comments.as_deref().unwrap_or(""),
            pedido,
            diseno_imagen: self.payload.preview.to_data_url(),
        })
    }

    /// `application/json` request body.
    pub fn to_json_body(&self) -> Result<String, OrderError> {
        serde_json::to_string(&self.wire_body()?).map_err(|e| OrderError::Serialization {
            reason: e.to_string(),
        })
    }

    /// `application/x-www-form-urlencoded` request body.
    pub fn to_form_body(&self) -> Result<String, OrderError> {
        let value = serde_json::to_value(self.wire_body()?).map_err(|e| OrderError::Serialization {
            reason: e.to_string(),
        })?;
        let serde_json::Value::Object(fields) = value else {
            return Err(OrderError::Serialization {
                reason: "order body is not an object".to_string(),
            });
        };
        let pairs: Vec<String> = fields
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(&value))
            })
            .collect();
        Ok(pairs.join("&"))
    }
}

/// The endpoint's answer, as seen by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub status: u16,
    #[serde(default)]
    pub body: String,
    /// `Location` header of a redirect, if any.
    #[serde(default)]
    pub location: Option<String>,
}

/// A successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub redirect: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldMessage>,
}

impl SubmissionResponse {
    /// 2xx/3xx accept; 4xx carries field-level validation messages; 5xx is a
    /// server or delivery fault.
    pub fn classify(&self) -> Result<Accepted, SubmissionFailure> {
        match self.status {
            200..=399 => Ok(Accepted {
                redirect: self
                    .location
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUCCESS_REDIRECT.to_string()),
            }),
            400..=499 => Err(SubmissionFailure::Validation {
                messages: self.field_messages(),
            }),
            500..=599 => Err(SubmissionFailure::Server {
                status: self.status,
                message: self.error_body().message.unwrap_or_else(|| self.body.clone()),
            }),
            status => {
                warn!(status, "unexpected order endpoint status");
                Err(SubmissionFailure::UnexpectedStatus { status })
            }
        }
    }

    fn error_body(&self) -> ErrorBody {
        serde_json::from_str(&self.body).unwrap_or_default()
    }

    /// Field messages from a 4xx body.
    ///
    /// Understands `{"errors": [{"path", "message"}]}` and the endpoint's
    /// `{"message": "Prefix: path: msg, path: msg"}` form.
    pub fn field_messages(&self) -> Vec<FieldMessage> {
        let body = self.error_body();
        if !body.errors.is_empty() {
            return body.errors;
        }
        match body.message {
            Some(message) => parse_field_list(&message),
            None if self.body.trim().is_empty() => Vec::new(),
            None => vec![FieldMessage {
                path: String::new(),
                message: self.body.trim().to_string(),
            }],
        }
    }
}

fn parse_field_list(message: &str) -> Vec<FieldMessage> {
    let list = match message.split_once(": ") {
        Some((_, rest)) if rest.contains(": ") => rest,
        _ => {
            return vec![FieldMessage {
                path: String::new(),
                message: message.to_string(),
            }]
        }
    };

    let mut out: Vec<FieldMessage> = Vec::new();
    for item in list.split(", ") {
        match item.split_once(": ") {
            Some((path, msg)) if !path.contains(' ') => out.push(FieldMessage {
                path: path.to_string(),
                message: msg.to_string(),
            }),
            // A comma inside the previous message.
            _ => match out.last_mut() {
                Some(last) => {
                    last.message.push_str(", ");
                    last.message.push_str(item);
                }
                None => out.push(FieldMessage {
                    path: String::new(),
                    message: item.to_string(),
                }),
            },
        }
    }
    out
}
