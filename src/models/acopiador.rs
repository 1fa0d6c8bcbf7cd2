use serde::{Deserialize, Serialize, Deserializer, de::Visitor};
use std::fmt;

/// Par de coordenadas GPS. Un acopiador tiene las dos o ninguna.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitud: f64,
    pub longitud: f64,
}

impl Coordinates {
    /// Construye el par solo si ambas mitades existen
    pub fn from_parts(latitud: Option<f64>, longitud: Option<f64>) -> Option<Self> {
        match (latitud, longitud) {
            (Some(latitud), Some(longitud)) => Some(Self { latitud, longitud }),
            _ => None,
        }
    }
}

/// Acopiador (proveedor de miel) tal como lo maneja la consola
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AcopiadorWire", into = "AcopiadorWire")]
pub struct Acopiador {
    pub id_proveedor: i64,
    pub tipo: Option<String>,
    pub nombre: String,
    pub id_comprador: Option<i64>,
    pub id_datos_fiscales: i64,
    pub id_direccion: i64,
    pub id_sagarpa: String,
    pub tipo_de_miel: i32,
    pub empresa: i32,
    pub cantidad: f64,
    pub id_estado: Option<i64>,
    /// 0 = Activo, 1 = Inactivo
    pub activo_inactivo: i32,
    /// Borrado lógico: 0 = Activo, 1 = Inactivo
    pub delete_prove: i32,
    pub ubicacion: Option<Coordinates>,

    // Campos del JOIN con datos fiscales / dirección
    pub razon_social: Option<String>,
    pub rfc: Option<String>,
    pub curp: Option<String>,
    pub direccion: Option<String>,
    pub has_csf: bool,
    pub csf_file: Option<String>,
}

impl Acopiador {
    /// Activo según el borrado lógico (deleteProve = 0)
    pub fn is_active(&self) -> bool {
        self.delete_prove == 0
    }

    /// Tiene una constancia CSF almacenada en el backend
    pub fn has_stored_csf(&self) -> bool {
        self.has_csf && self.csf_file.as_deref().map_or(false, |f| !f.is_empty())
    }

    /// ID de datos fiscales, si el registro tiene uno vinculado
    pub fn fiscal_id(&self) -> Option<i64> {
        (self.id_datos_fiscales > 0).then_some(self.id_datos_fiscales)
    }

    /// Nombre del archivo al descargar la CSF
    pub fn csf_download_name(&self) -> String {
        format!("CSF_{}_{}.pdf", self.nombre, self.id_sagarpa)
    }
}

/// Forma JSON del backend (latitud/longitud independientes)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcopiadorWire {
    id_proveedor: i64,
    #[serde(default)]
    tipo: Option<String>,
    #[serde(default)]
    nombre: String,
    #[serde(default)]
    id_comprador: Option<i64>,
    #[serde(default)]
    id_datos_fiscales: Option<i64>,
    #[serde(default)]
    id_direccion: Option<i64>,
    #[serde(default)]
    id_sagarpa: Option<String>,
    #[serde(default)]
    tipo_de_miel: Option<i32>,
    #[serde(default)]
    empresa: Option<i32>,
    #[serde(default)]
    cantidad: Option<f64>,
    #[serde(default)]
    id_estado: Option<i64>,
    #[serde(default)]
    activo_inactivo: Option<i32>,
    #[serde(default)]
    delete_prove: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    latitud: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    longitud: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    razon_social: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rfc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    curp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direccion: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    has_csf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    csf_file: Option<String>,
}

impl From<AcopiadorWire> for Acopiador {
    fn from(wire: AcopiadorWire) -> Self {
        let ubicacion = Coordinates::from_parts(wire.latitud, wire.longitud);
        if ubicacion.is_none() && (wire.latitud.is_some() || wire.longitud.is_some()) {
            log::warn!("⚠️ Acopiador {} con coordenadas incompletas, se ignora la ubicación", wire.id_proveedor);
        }
        Self {
            id_proveedor: wire.id_proveedor,
            tipo: wire.tipo,
            nombre: wire.nombre,
            id_comprador: wire.id_comprador,
            id_datos_fiscales: wire.id_datos_fiscales.unwrap_or(0),
            id_direccion: wire.id_direccion.unwrap_or(0),
            id_sagarpa: wire.id_sagarpa.unwrap_or_default(),
            tipo_de_miel: wire.tipo_de_miel.unwrap_or(0),
            empresa: wire.empresa.unwrap_or(1),
            cantidad: wire.cantidad.unwrap_or(0.0),
            id_estado: wire.id_estado,
            activo_inactivo: wire.activo_inactivo.unwrap_or(1),
            delete_prove: wire.delete_prove.unwrap_or(0),
            ubicacion,
            razon_social: wire.razon_social,
            rfc: wire.rfc,
            curp: wire.curp,
            direccion: wire.direccion,
            has_csf: wire.has_csf,
            csf_file: wire.csf_file,
        }
    }
}

impl From<Acopiador> for AcopiadorWire {
    fn from(a: Acopiador) -> Self {
        Self {
            id_proveedor: a.id_proveedor,
            tipo: a.tipo,
            nombre: a.nombre,
            id_comprador: a.id_comprador,
            id_datos_fiscales: Some(a.id_datos_fiscales),
            id_direccion: Some(a.id_direccion),
            id_sagarpa: Some(a.id_sagarpa),
            tipo_de_miel: Some(a.tipo_de_miel),
            empresa: Some(a.empresa),
            cantidad: Some(a.cantidad),
            id_estado: a.id_estado,
            activo_inactivo: Some(a.activo_inactivo),
            delete_prove: Some(a.delete_prove),
            latitud: a.ubicacion.map(|c| c.latitud),
            longitud: a.ubicacion.map(|c| c.longitud),
            razon_social: a.razon_social,
            rfc: a.rfc,
            curp: a.curp,
            direccion: a.direccion,
            has_csf: a.has_csf,
            csf_file: a.csf_file,
        }
    }
}

/// Coordenadas para el mapa (`GET /acopiadores/map/all`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CoordinatesWire")]
pub struct AcopiadorCoordinates {
    pub id_proveedor: i64,
    pub nombre: String,
    pub ubicacion: Option<Coordinates>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinatesWire {
    id_proveedor: i64,
    #[serde(default)]
    nombre: String,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    latitud: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    longitud: Option<f64>,
}

impl From<CoordinatesWire> for AcopiadorCoordinates {
    fn from(wire: CoordinatesWire) -> Self {
        Self {
            id_proveedor: wire.id_proveedor,
            nombre: wire.nombre,
            ubicacion: Coordinates::from_parts(wire.latitud, wire.longitud),
        }
    }
}

impl From<&Acopiador> for AcopiadorCoordinates {
    fn from(a: &Acopiador) -> Self {
        Self {
            id_proveedor: a.id_proveedor,
            nombre: a.nombre.clone(),
            ubicacion: a.ubicacion,
        }
    }
}

/// Alta de acopiador. El backend crea también datos fiscales y dirección.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAcopiadorRequest {
    pub tipo: String,
    pub nombre: String,
    pub id_sagarpa: String,
    pub tipo_de_miel: i32,
    pub razon_social: String,
    pub rfc: String,
    pub curp: String,
    pub direccion: String,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub id_datos_fiscales: i64,
    pub id_direccion: i64,
    pub empresa: i32,
    pub cantidad: f64,
    pub activo_inactivo: i32,
}

/// Actualización parcial: solo viajan los campos presentes
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAcopiadorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_sagarpa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_de_miel: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razon_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitud: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitud: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_datos_fiscales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_direccion: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo_inactivo: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_prove: Option<i32>,
}

impl From<CreateAcopiadorRequest> for UpdateAcopiadorRequest {
    fn from(req: CreateAcopiadorRequest) -> Self {
        Self {
            tipo: Some(req.tipo),
            nombre: Some(req.nombre),
            id_sagarpa: Some(req.id_sagarpa),
            tipo_de_miel: Some(req.tipo_de_miel),
            razon_social: Some(req.razon_social),
            rfc: Some(req.rfc),
            curp: Some(req.curp),
            direccion: Some(req.direccion),
            latitud: req.latitud,
            longitud: req.longitud,
            id_datos_fiscales: Some(req.id_datos_fiscales),
            id_direccion: Some(req.id_direccion),
            empresa: Some(req.empresa),
            cantidad: Some(req.cantidad),
            activo_inactivo: Some(req.activo_inactivo),
            delete_prove: None,
        }
    }
}

/// El backend (MySQL DECIMAL) puede enviar coordenadas como número o como string
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CoordinateVisitor;

    impl<'de> Visitor<'de> for CoordinateVisitor {
        type Value = Option<f64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("number, numeric string or null")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(value as f64))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map(Some).map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(CoordinateVisitor)
}

/// `hasCsf` llega como booleano o como 0/1 según la consulta
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_i64().map_or(false, |n| n != 0),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_record_with_string_coordinates() {
        let json = r#"{
            "idProveedor": 7, "tipo": "INDIVIDUAL", "nombre": "Juan",
            "idDatosFiscales": 3, "idDireccion": 4, "idSagarpa": "OAX-01",
            "tipoDeMiel": 2, "empresa": 1, "cantidad": 0, "activoInactivo": 1,
            "deleteProve": 0, "latitud": "17.0732", "longitud": -96.7266,
            "hasCsf": 1, "csfFile": "csf_3.pdf"
        }"#;
        let a: Acopiador = serde_json::from_str(json).unwrap();
        assert_eq!(a.id_proveedor, 7);
        assert_eq!(a.ubicacion, Some(Coordinates { latitud: 17.0732, longitud: -96.7266 }));
        assert!(a.is_active());
        assert!(a.has_stored_csf());
        assert_eq!(a.fiscal_id(), Some(3));
    }

    #[test]
    fn half_set_location_decodes_as_none() {
        let json = r#"{"idProveedor": 1, "nombre": "X", "latitud": 17.0, "longitud": null}"#;
        let a: Acopiador = serde_json::from_str(json).unwrap();
        assert_eq!(a.ubicacion, None);
        assert_eq!(a.fiscal_id(), None);
        assert!(!a.has_stored_csf());
    }

    #[test]
    fn partial_update_only_serializes_present_fields() {
        let req = UpdateAcopiadorRequest {
            nombre: Some("Pedro".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"nombre":"Pedro"}"#);
    }

    #[test]
    fn download_name_uses_name_and_sagarpa() {
        let json = r#"{"idProveedor": 1, "nombre": "Miel Sur", "idSagarpa": "S-9"}"#;
        let a: Acopiador = serde_json::from_str(json).unwrap();
        assert_eq!(a.csf_download_name(), "CSF_Miel Sur_S-9.pdf");
    }
}
