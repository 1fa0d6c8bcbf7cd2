// ============================================================================
// VALIDACIÓN - RFC / CURP y errores de validación local
// ============================================================================

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref RFC_PATTERN: Regex =
        Regex::new(r"^[A-ZÑ&]{3,4}[0-9]{6}[A-Z0-9]{3}$").expect("RFC pattern");
    static ref CURP_PATTERN: Regex =
        Regex::new(r"^[A-Z]{4}[0-9]{6}[HM][A-Z]{2}[BCDFGHJKLMNPQRSTVWXYZ]{3}[0-9A-Z]{2}$")
            .expect("CURP pattern");
}

/// Errores que se detectan en el cliente y nunca llegan a la red
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor complete todos los campos requeridos en todos los pasos")]
    IncompleteForm,
    #[error("Formato de RFC inválido (ej: PEGJ800101ABC)")]
    InvalidRfc,
    #[error("Formato de CURP inválido (18 caracteres)")]
    InvalidCurp,
    #[error("Por favor selecciona un archivo PDF válido.")]
    NotPdf,
    #[error("Selecciona un archivo PDF antes de subir.")]
    NoFileSelected,
    #[error("El acopiador no tiene datos fiscales asociados.")]
    MissingFiscalData,
    #[error("Este acopiador no tiene coordenadas GPS registradas.")]
    MissingCoordinates,
}

/// Normaliza a mayúsculas (RFC/CURP se capturan sin distinción)
pub fn normalize_upper(value: &str) -> String {
    value.trim().to_uppercase()
}

/// RFC: 3-4 letras (incluye Ñ y &), 6 dígitos de fecha, 3 de homoclave
pub fn is_valid_rfc(rfc: &str) -> bool {
    RFC_PATTERN.is_match(&normalize_upper(rfc))
}

/// CURP de 18 caracteres. Vacía cuenta como válida (campo opcional).
pub fn is_valid_curp(curp: &str) -> bool {
    let curp = normalize_upper(curp);
    curp.is_empty() || CURP_PATTERN.is_match(&curp)
}

/// Mensaje de error para RFC (None si está vacío o es válido)
pub fn rfc_error(rfc: &str) -> Option<ValidationError> {
    if rfc.trim().is_empty() || is_valid_rfc(rfc) {
        None
    } else {
        Some(ValidationError::InvalidRfc)
    }
}

/// Mensaje de error para CURP (None si está vacía o es válida)
pub fn curp_error(curp: &str) -> Option<ValidationError> {
    if is_valid_curp(curp) {
        None
    } else {
        Some(ValidationError::InvalidCurp)
    }
}

/// Coerción tipo `parseInt`: toma el prefijo entero del texto
pub fn parse_leading_int(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i32>().ok().map(|n| n * sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_accepts_valid_and_lowercase() {
        assert!(is_valid_rfc("PEGJ800101ABC"));
        assert!(is_valid_rfc("pegj800101abc"));
        assert!(is_valid_rfc("ÑAB800101A1C"));
        assert!(is_valid_rfc("A&B800101XY9"));
    }

    #[test]
    fn rfc_rejects_short_value() {
        assert!(!is_valid_rfc("peg800101ab"));
        assert!(!is_valid_rfc(""));
        assert_eq!(rfc_error("peg800101ab"), Some(ValidationError::InvalidRfc));
        assert_eq!(rfc_error(""), None);
    }

    #[test]
    fn curp_empty_is_valid() {
        assert!(is_valid_curp(""));
        assert!(is_valid_curp("   "));
        assert_eq!(curp_error(""), None);
    }

    #[test]
    fn curp_checks_sex_position() {
        assert!(is_valid_curp("PEGJ800101HOCRRN09"));
        assert!(is_valid_curp("pegj800101mocrrn09"));
        // Dígito en lugar de H/M
        assert!(!is_valid_curp("PEGJ8001011OCRRN09"));
        assert_eq!(curp_error("PEGJ8001011OCRRN09"), Some(ValidationError::InvalidCurp));
    }

    #[test]
    fn leading_int_mimics_parse_int() {
        assert_eq!(parse_leading_int("1"), Some(1));
        assert_eq!(parse_leading_int(" 3 "), Some(3));
        assert_eq!(parse_leading_int("2.9"), Some(2));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
