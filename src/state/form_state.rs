// ============================================================================
// FORM STATE - Wizard de 3 pasos para alta/edición de acopiadores
// ============================================================================
// Paso 1: identidad | Paso 2: datos fiscales | Paso 3: dirección y ubicación
// ============================================================================

use crate::models::{Acopiador, Coordinates, CreateAcopiadorRequest, UpdateAcopiadorRequest};
use crate::utils::{
    curp_error, is_valid_curp, is_valid_rfc, normalize_upper, parse_leading_int, rfc_error,
    ValidationError, DEFAULT_TIPO_ACOPIADOR, MAX_FORM_STEPS,
};

/// Alta nueva o edición de un registro existente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftKind {
    New,
    Edit { original_id: i64 },
}

/// Copia de trabajo del formulario (nunca comparte identidad con el registro)
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    // Paso 1
    pub nombre: String,
    pub id_sagarpa: String,
    /// Texto tal como viene del `<select>`; se convierte a entero al enviar
    pub tipo_de_miel: String,

    // Paso 2
    pub razon_social: String,
    pub rfc: String,
    pub curp: String,

    // Paso 3
    pub direccion: String,
    pub ubicacion: Option<Coordinates>,

    // Campos técnicos
    pub tipo: String,
    pub id_datos_fiscales: i64,
    pub id_direccion: i64,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            id_sagarpa: String::new(),
            tipo_de_miel: "1".to_string(),
            razon_social: String::new(),
            rfc: String::new(),
            curp: String::new(),
            direccion: String::new(),
            ubicacion: None,
            tipo: DEFAULT_TIPO_ACOPIADOR.to_string(),
            id_datos_fiscales: 0,
            id_direccion: 0,
        }
    }
}

impl FormDraft {
    /// Copia los datos del registro; sin razón social se usa el nombre
    pub fn from_record(record: &Acopiador) -> Self {
        let razon_social = record
            .razon_social
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| record.nombre.clone());
        let tipo_de_miel = if record.tipo_de_miel > 0 { record.tipo_de_miel } else { 1 };
        Self {
            nombre: record.nombre.clone(),
            id_sagarpa: record.id_sagarpa.clone(),
            tipo_de_miel: tipo_de_miel.to_string(),
            razon_social,
            rfc: record.rfc.clone().unwrap_or_default(),
            curp: record.curp.clone().unwrap_or_default(),
            direccion: record.direccion.clone().unwrap_or_default(),
            ubicacion: record.ubicacion,
            tipo: record
                .tipo
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TIPO_ACOPIADOR.to_string()),
            id_datos_fiscales: record.id_datos_fiscales,
            id_direccion: record.id_direccion,
        }
    }

    pub fn honey_type(&self) -> Option<i32> {
        parse_leading_int(&self.tipo_de_miel)
    }

    /// Ubicación desde los dos inputs; si falta uno, no hay ubicación
    pub fn set_coordinates_text(&mut self, latitud: &str, longitud: &str) {
        let parse = |v: &str| v.trim().parse::<f64>().ok();
        self.ubicacion = Coordinates::from_parts(parse(latitud), parse(longitud));
    }

    fn validate_step(&self, step: usize) -> bool {
        match step {
            1 => !self.nombre.trim().is_empty() && self.honey_type().map_or(false, |t| t > 0),
            2 => {
                !self.razon_social.trim().is_empty()
                    && !self.rfc.trim().is_empty()
                    && is_valid_rfc(&self.rfc)
                    && is_valid_curp(&self.curp)
            }
            3 => !self.direccion.trim().is_empty(),
            _ => false,
        }
    }

    fn to_create_request(&self) -> CreateAcopiadorRequest {
        CreateAcopiadorRequest {
            tipo: self.tipo.clone(),
            nombre: self.nombre.trim().to_string(),
            id_sagarpa: self.id_sagarpa.trim().to_string(),
            tipo_de_miel: self.honey_type().unwrap_or(1),
            razon_social: self.razon_social.trim().to_string(),
            rfc: normalize_upper(&self.rfc),
            curp: normalize_upper(&self.curp),
            direccion: self.direccion.trim().to_string(),
            latitud: self.ubicacion.map(|c| c.latitud),
            longitud: self.ubicacion.map(|c| c.longitud),
            id_datos_fiscales: self.id_datos_fiscales,
            id_direccion: self.id_direccion,
            empresa: 1,
            cantidad: 0.0,
            activo_inactivo: 1,
        }
    }
}

/// Lo que el ViewModel debe mandar al backend
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(CreateAcopiadorRequest),
    Update { id: i64, request: UpdateAcopiadorRequest },
}

impl Submission {
    /// Prefijo del mensaje de error según la operación
    pub fn error_label(&self) -> &'static str {
        match self {
            Submission::Create(_) => "Error al crear: ",
            Submission::Update { .. } => "Error al actualizar: ",
        }
    }
}

/// Estado del wizard
#[derive(Debug, Clone)]
pub struct FormWizard {
    pub visible: bool,
    pub kind: DraftKind,
    pub draft: FormDraft,
    pub step: usize,
    pub valid_steps: [bool; MAX_FORM_STEPS],
    pub saving: bool,
    pub error: Option<String>,
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            visible: false,
            kind: DraftKind::New,
            draft: FormDraft::default(),
            step: 1,
            valid_steps: [false; MAX_FORM_STEPS],
            saving: false,
            error: None,
        }
    }

    /// Formulario vacío para un alta
    pub fn open_new(&mut self) {
        *self = Self::new();
        self.visible = true;
    }

    /// Formulario precargado; los tres pasos se validan de entrada
    pub fn open_edit(&mut self, record: &Acopiador) {
        *self = Self::new();
        self.kind = DraftKind::Edit { original_id: record.id_proveedor };
        self.draft = FormDraft::from_record(record);
        self.validate_all_steps();
        self.visible = true;
    }

    pub fn cancel(&mut self) {
        self.visible = false;
        self.kind = DraftKind::New;
        self.step = 1;
        self.saving = false;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.kind, DraftKind::Edit { .. })
    }

    /// Valida el paso indicado; solo toca la bandera de ese paso
    pub fn validate_step(&mut self, step: usize) -> bool {
        if step < 1 || step > MAX_FORM_STEPS {
            return false;
        }
        let valid = self.draft.validate_step(step);
        self.valid_steps[step - 1] = valid;
        valid
    }

    pub fn validate_current_step(&mut self) -> bool {
        self.validate_step(self.step)
    }

    /// Valida 1..3 sin mover el paso actual
    pub fn validate_all_steps(&mut self) {
        for step in 1..=MAX_FORM_STEPS {
            self.validate_step(step);
        }
    }

    pub fn is_step_valid(&self, step: usize) -> bool {
        step >= 1 && step <= MAX_FORM_STEPS && self.valid_steps[step - 1]
    }

    pub fn is_form_valid(&self) -> bool {
        self.valid_steps.iter().all(|v| *v)
    }

    pub fn next_step(&mut self) -> bool {
        if self.step < MAX_FORM_STEPS && self.validate_current_step() {
            self.step += 1;
            return true;
        }
        false
    }

    pub fn previous_step(&mut self) -> bool {
        if self.step > 1 {
            self.step -= 1;
            return true;
        }
        false
    }

    /// Salto directo, sin importar la validez
    pub fn go_to_step(&mut self, step: usize) -> bool {
        if step >= 1 && step <= MAX_FORM_STEPS {
            self.step = step;
            return true;
        }
        false
    }

    /// RFC en mayúsculas conforme se escribe
    pub fn set_rfc(&mut self, value: &str) {
        self.draft.rfc = value.to_uppercase();
        self.validate_current_step();
    }

    pub fn set_curp(&mut self, value: &str) {
        self.draft.curp = value.to_uppercase();
        self.validate_current_step();
    }

    pub fn rfc_error(&self) -> Option<ValidationError> {
        rfc_error(&self.draft.rfc)
    }

    pub fn curp_error(&self) -> Option<ValidationError> {
        curp_error(&self.draft.curp)
    }

    /// Valida todo y arma la petición; marca `saving` si procede.
    /// `Ok(None)` mientras otra petición sigue en curso.
    pub fn prepare_submission(&mut self) -> Result<Option<Submission>, ValidationError> {
        if self.saving {
            return Ok(None);
        }
        self.validate_all_steps();
        if !self.is_form_valid() {
            let err = ValidationError::IncompleteForm;
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.saving = true;
        self.error = None;

        let request = self.draft.to_create_request();
        Ok(Some(match self.kind {
            DraftKind::New => Submission::Create(request),
            DraftKind::Edit { original_id } => Submission::Update {
                id: original_id,
                request: request.into(),
            },
        }))
    }

    /// Éxito: cerrar el formulario
    pub fn finish_submission(&mut self) {
        self.cancel();
        self.error = None;
    }

    /// Fallo: el borrador queda intacto y el formulario abierto
    pub fn fail_submission(&mut self, message: String) {
        self.saving = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn juan_wizard() -> FormWizard {
        let mut wizard = FormWizard::new();
        wizard.open_new();
        wizard.draft.nombre = "Juan".into();
        wizard.draft.tipo_de_miel = "1".into();
        assert!(wizard.next_step());
        wizard.draft.razon_social = "Juan Perez".into();
        wizard.draft.rfc = "pegj800101abc".into();
        assert!(wizard.next_step());
        wizard.draft.direccion = "Calle 1".into();
        wizard
    }

    #[test]
    fn create_scenario_normalizes_payload() {
        let mut wizard = juan_wizard();
        let submission = wizard.prepare_submission().unwrap().unwrap();
        assert_eq!(wizard.valid_steps, [true, true, true]);
        assert!(wizard.saving);

        match submission {
            Submission::Create(req) => {
                assert_eq!(req.rfc, "PEGJ800101ABC");
                assert_eq!(req.tipo_de_miel, 1);
                assert_eq!(req.empresa, 1);
                assert_eq!(req.cantidad, 0.0);
                assert_eq!(req.activo_inactivo, 1);
                assert_eq!(req.tipo, "INDIVIDUAL");
            }
            other => panic!("esperaba Create, llegó {:?}", other),
        }
    }

    #[test]
    fn next_step_blocked_with_empty_name() {
        let mut wizard = FormWizard::new();
        wizard.open_new();
        assert!(!wizard.next_step());
        assert_eq!(wizard.step, 1);
        assert!(!wizard.is_step_valid(1));
    }

    #[test]
    fn honey_type_must_be_positive() {
        let mut wizard = FormWizard::new();
        wizard.open_new();
        wizard.draft.nombre = "Ana".into();
        wizard.draft.tipo_de_miel = "0".into();
        assert!(!wizard.next_step());
        wizard.draft.tipo_de_miel = "3 ".into();
        assert!(wizard.next_step());
    }

    #[test]
    fn invalid_curp_blocks_step_two() {
        let mut wizard = juan_wizard();
        wizard.go_to_step(2);
        wizard.set_curp("pegj8001011ocrrn09");
        assert!(!wizard.is_step_valid(2));
        assert_eq!(wizard.curp_error(), Some(ValidationError::InvalidCurp));
        wizard.set_curp("pegj800101hocrrn09");
        assert_eq!(wizard.draft.curp, "PEGJ800101HOCRRN09");
        assert!(wizard.is_step_valid(2));
        assert_eq!(wizard.curp_error(), None);
    }

    #[test]
    fn go_to_step_ignores_validity_but_not_range() {
        let mut wizard = FormWizard::new();
        wizard.open_new();
        assert!(wizard.go_to_step(3));
        assert_eq!(wizard.step, 3);
        assert!(!wizard.go_to_step(4));
        assert!(!wizard.go_to_step(0));
        assert!(wizard.previous_step());
        assert!(wizard.previous_step());
        assert!(!wizard.previous_step());
    }

    #[test]
    fn submit_with_incomplete_step_keeps_form_open() {
        let mut wizard = juan_wizard();
        wizard.draft.direccion = "   ".into();
        assert_eq!(wizard.prepare_submission(), Err(ValidationError::IncompleteForm));
        assert!(wizard.visible);
        assert!(!wizard.saving);
        assert_eq!(
            wizard.error.as_deref(),
            Some("Por favor complete todos los campos requeridos en todos los pasos")
        );
    }

    #[test]
    fn edit_prefills_and_validates_without_moving_focus() {
        let record: Acopiador = serde_json::from_str(
            r#"{"idProveedor": 12, "nombre": "Miel del Valle", "tipoDeMiel": 2,
                "rfc": "MDV900101AB1", "direccion": "Centro", "idDatosFiscales": 5,
                "latitud": 17.1, "longitud": -96.7}"#,
        )
        .unwrap();
        let mut wizard = FormWizard::new();
        wizard.open_edit(&record);

        assert_eq!(wizard.kind, DraftKind::Edit { original_id: 12 });
        assert_eq!(wizard.step, 1);
        assert_eq!(wizard.draft.razon_social, "Miel del Valle");
        assert!(wizard.is_form_valid());

        match wizard.prepare_submission().unwrap().unwrap() {
            Submission::Update { id, request } => {
                assert_eq!(id, 12);
                assert_eq!(request.tipo_de_miel, Some(2));
                assert_eq!(request.id_datos_fiscales, Some(5));
                assert_eq!(request.latitud, Some(17.1));
            }
            other => panic!("esperaba Update, llegó {:?}", other),
        }
    }

    #[test]
    fn double_submit_sends_once() {
        let mut wizard = juan_wizard();
        assert!(wizard.prepare_submission().unwrap().is_some());
        assert_eq!(wizard.prepare_submission(), Ok(None));

        wizard.fail_submission("Error al crear: timeout".to_string());
        assert!(wizard.prepare_submission().unwrap().is_some());
    }

    #[test]
    fn failed_submission_keeps_draft() {
        let mut wizard = juan_wizard();
        let submission = wizard.prepare_submission().unwrap().unwrap();
        wizard.fail_submission(format!("{}{}", submission.error_label(), "RFC duplicado"));
        assert!(wizard.visible);
        assert!(!wizard.saving);
        assert_eq!(wizard.draft.nombre, "Juan");
        assert_eq!(wizard.error.as_deref(), Some("Error al crear: RFC duplicado"));

        wizard.finish_submission();
        assert!(!wizard.visible);
        assert_eq!(wizard.step, 1);
    }

    #[test]
    fn half_set_coordinates_are_dropped() {
        let mut draft = FormDraft::default();
        draft.set_coordinates_text("17.07", "");
        assert_eq!(draft.ubicacion, None);
        draft.set_coordinates_text("17.07", "-96.72");
        assert_eq!(draft.ubicacion, Some(Coordinates { latitud: 17.07, longitud: -96.72 }));
    }
}
