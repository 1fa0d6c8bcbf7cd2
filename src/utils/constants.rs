/// Número de pasos del formulario de alta/edición
pub const MAX_FORM_STEPS: usize = 3;

/// Único tipo de archivo aceptado para la CSF
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Campo multipart que espera el backend al subir la CSF
pub const CSF_FORM_FIELD: &str = "csf";

/// Tipo de acopiador por defecto en altas
pub const DEFAULT_TIPO_ACOPIADOR: &str = "INDIVIDUAL";

pub const KEY_CONFIRM: &str = "Enter";
pub const KEY_CANCEL: &str = "Escape";
