// ============================================================================
// INLINE EDIT - Edición en la tabla de ID SAGARPA y nombre
// ============================================================================

use crate::models::{Acopiador, UpdateAcopiadorRequest};
use crate::utils::{KEY_CANCEL, KEY_CONFIRM};

/// Campos editables directamente en la tabla
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    IdSagarpa,
    Nombre,
}

impl EditableField {
    pub fn value_of<'a>(&self, record: &'a Acopiador) -> &'a str {
        match self {
            EditableField::IdSagarpa => &record.id_sagarpa,
            EditableField::Nombre => &record.nombre,
        }
    }

    pub fn apply(&self, record: &mut Acopiador, value: String) {
        match self {
            EditableField::IdSagarpa => record.id_sagarpa = value,
            EditableField::Nombre => record.nombre = value,
        }
    }

    /// Actualización parcial con solo este campo
    pub fn update_request(&self, value: &str) -> UpdateAcopiadorRequest {
        let value = Some(value.to_string());
        match self {
            EditableField::IdSagarpa => UpdateAcopiadorRequest { id_sagarpa: value, ..Default::default() },
            EditableField::Nombre => UpdateAcopiadorRequest { nombre: value, ..Default::default() },
        }
    }

    pub fn error_label(&self) -> &'static str {
        match self {
            EditableField::IdSagarpa => "Error al actualizar ID SAGARPA: ",
            EditableField::Nombre => "Error al actualizar nombre: ",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            EditableField::IdSagarpa => "ID SAGARPA",
            EditableField::Nombre => "Nombre",
        }
    }
}

/// Qué hacer al pedir guardar
#[derive(Debug, Clone, PartialEq)]
pub enum SaveDecision {
    /// Guardando ya, o buffer vacío
    Ignore,
    /// Mismo valor: se cerró la edición sin llamar al backend
    Unchanged,
    Send { id: i64, value: String, request: UpdateAcopiadorRequest },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Save,
    Cancel,
    Ignore,
}

impl KeyAction {
    pub fn from_key(key: &str) -> Self {
        match key {
            KEY_CONFIRM => KeyAction::Save,
            KEY_CANCEL => KeyAction::Cancel,
            _ => KeyAction::Ignore,
        }
    }
}

/// Editor de un campo: un solo registro a la vez
#[derive(Debug, Clone)]
pub struct InlineEditor {
    pub field: EditableField,
    pub editing_id: Option<i64>,
    pub buffer: String,
    pub saving: bool,
}

impl InlineEditor {
    pub fn new(field: EditableField) -> Self {
        Self {
            field,
            editing_id: None,
            buffer: String::new(),
            saving: false,
        }
    }

    /// Empezar a editar otro registro descarta la edición anterior
    pub fn start(&mut self, record: &Acopiador) {
        self.editing_id = Some(record.id_proveedor);
        self.buffer = self.field.value_of(record).to_string();
    }

    pub fn cancel(&mut self) {
        self.editing_id = None;
        self.buffer.clear();
    }

    pub fn is_editing(&self, id: i64) -> bool {
        self.editing_id == Some(id)
    }

    pub fn begin_save(&mut self, record: &Acopiador) -> SaveDecision {
        let value = self.buffer.trim().to_string();
        if self.saving || value.is_empty() {
            return SaveDecision::Ignore;
        }
        if value == self.field.value_of(record).trim() {
            self.cancel();
            return SaveDecision::Unchanged;
        }
        self.saving = true;
        SaveDecision::Send {
            id: record.id_proveedor,
            request: self.field.update_request(&value),
            value,
        }
    }

    /// Éxito: el registro en memoria toma el valor y se sale de edición
    pub fn finish_save(&mut self, record: Option<&mut Acopiador>, value: String) {
        if let Some(record) = record {
            self.field.apply(record, value);
        }
        self.saving = false;
        self.cancel();
    }

    /// Fallo: se queda en edición con el buffer para reintentar
    pub fn fail_save(&mut self) {
        self.saving = false;
    }
}

/// Los dos editores de la tabla
#[derive(Debug, Clone)]
pub struct InlineEditState {
    pub id_sagarpa: InlineEditor,
    pub nombre: InlineEditor,
}

impl Default for InlineEditState {
    fn default() -> Self {
        Self {
            id_sagarpa: InlineEditor::new(EditableField::IdSagarpa),
            nombre: InlineEditor::new(EditableField::Nombre),
        }
    }
}

impl InlineEditState {
    pub fn editor(&self, field: EditableField) -> &InlineEditor {
        match field {
            EditableField::IdSagarpa => &self.id_sagarpa,
            EditableField::Nombre => &self.nombre,
        }
    }

    pub fn editor_mut(&mut self, field: EditableField) -> &mut InlineEditor {
        match field {
            EditableField::IdSagarpa => &mut self.id_sagarpa,
            EditableField::Nombre => &mut self.nombre,
        }
    }
}
