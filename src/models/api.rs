use serde::Deserialize;
use crate::models::acopiador::Acopiador;

/// Sobre uniforme de todas las respuestas del backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Mensaje legible: `error` si viene, si no `message`
    pub fn failure_message(&self) -> String {
        match self.error.as_deref() {
            Some(e) if !e.is_empty() => e.to_string(),
            _ => self.message.clone(),
        }
    }
}

/// Bloque de paginación reportado por el servidor
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// Página de acopiadores
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AcopiadoresPage {
    #[serde(default)]
    pub acopiadores: Vec<Acopiador>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAcopiador {
    pub id_proveedor: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paginated_envelope() {
        let json = r#"{
            "success": true, "message": "ok",
            "data": {
                "acopiadores": [{"idProveedor": 1, "nombre": "A"}],
                "pagination": {"page": 2, "limit": 10, "total": 25, "totalPages": 3}
            }
        }"#;
        let r: ApiResponse<AcopiadoresPage> = serde_json::from_str(json).unwrap();
        let page = r.data.unwrap();
        assert_eq!(page.acopiadores.len(), 1);
        assert_eq!(page.pagination.unwrap().total_pages, 3);
    }

    #[test]
    fn failure_message_prefers_error_field() {
        let json = r#"{"success": false, "message": "Bad request", "error": "RFC duplicado"}"#;
        let r: ApiResponse<()> = serde_json::from_str(json).unwrap();
        assert_eq!(r.failure_message(), "RFC duplicado");

        let json = r#"{"success": false, "message": "Sin datos"}"#;
        let r: ApiResponse<()> = serde_json::from_str(json).unwrap();
        assert_eq!(r.failure_message(), "Sin datos");
    }
}
