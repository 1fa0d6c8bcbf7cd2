// ============================================================================
// ACOPIADORES VIEWMODEL - Tabla, filtros, formulario y edición inline
// ============================================================================
// Muta el estado, espera al gateway y aplica el resultado. Ningún borrow de
// RefCell cruza un `.await`.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::{Acopiador, UpdateAcopiadorRequest};
use crate::services::{Dialogs, RecordGateway};
use crate::state::form_state::{FormWizard, Submission};
use crate::state::inline_edit::{EditableField, InlineEditState, KeyAction, SaveDecision};
use crate::state::list_state::{FilterCriteria, FilterKind, ListQuery, ListState};

/// Confirmación antes de eliminar un acopiador
pub const CONFIRM_DELETE_ACOPIADOR: &str = "¿Eliminar acopiador?";

pub struct AcopiadoresViewModel<G: RecordGateway, H: Dialogs> {
    gateway: Rc<G>,
    dialogs: Rc<H>,
    pub list: Rc<RefCell<ListState>>,
    pub form: Rc<RefCell<FormWizard>>,
    pub inline: Rc<RefCell<InlineEditState>>,
    /// Menú de acciones abierto (uno a la vez)
    pub menu_open: Rc<RefCell<Option<i64>>>,
    on_change: Rc<dyn Fn()>,
}

impl<G: RecordGateway, H: Dialogs> Clone for AcopiadoresViewModel<G, H> {
    fn clone(&self) -> Self {
        Self {
            gateway: Rc::clone(&self.gateway),
            dialogs: Rc::clone(&self.dialogs),
            list: Rc::clone(&self.list),
            form: Rc::clone(&self.form),
            inline: Rc::clone(&self.inline),
            menu_open: Rc::clone(&self.menu_open),
            on_change: Rc::clone(&self.on_change),
        }
    }
}

impl<G: RecordGateway, H: Dialogs> AcopiadoresViewModel<G, H> {
    pub fn new(gateway: Rc<G>, dialogs: Rc<H>, page_size: u32, on_change: Rc<dyn Fn()>) -> Self {
        Self {
            gateway,
            dialogs,
            list: Rc::new(RefCell::new(ListState::new(page_size))),
            form: Rc::new(RefCell::new(FormWizard::new())),
            inline: Rc::new(RefCell::new(InlineEditState::default())),
            menu_open: Rc::new(RefCell::new(None)),
            on_change,
        }
    }

    pub fn gateway(&self) -> &Rc<G> {
        &self.gateway
    }

    fn notify(&self) {
        (self.on_change)();
    }

    /// Mensaje de error a nivel página
    pub fn set_error(&self, message: String) {
        log::error!("❌ {}", message);
        self.list.borrow_mut().error = Some(message);
        self.notify();
    }

    pub fn clear_error(&self) {
        self.list.borrow_mut().error = None;
        self.notify();
    }

    pub fn record(&self, id: i64) -> Option<Acopiador> {
        self.list.borrow().find(id).cloned()
    }

    // ========================================================================
    // LISTA / FILTROS / PAGINACIÓN
    // ========================================================================

    async fn run(&self, query: ListQuery) {
        self.notify();
        let result = self.gateway.list(query.page, query.page_size, &query.filters).await;
        let applied = self.list.borrow_mut().finish_fetch(&query, result);
        if applied {
            self.notify();
        }
    }

    /// Recargar la página actual
    pub async fn load(&self) {
        log::info!("📋 Cargando acopiadores...");
        let (page, page_size) = {
            let list = self.list.borrow();
            (list.page.current_page, list.page.page_size)
        };
        self.fetch_page(page, page_size).await;
    }

    pub async fn apply_filters(&self, criteria: FilterCriteria) {
        let query = self.list.borrow_mut().apply_filters(criteria);
        self.run(query).await;
    }

    pub async fn remove_filter(&self, kind: FilterKind) {
        let query = self.list.borrow_mut().remove_filter(kind);
        self.run(query).await;
    }

    pub async fn clear_filters(&self) {
        let query = self.list.borrow_mut().clear_filters();
        self.run(query).await;
    }

    pub async fn fetch_page(&self, page: u32, page_size: u32) {
        let query = self.list.borrow_mut().begin_fetch(page, page_size);
        self.run(query).await;
    }

    pub async fn next_page(&self) {
        let query = self.list.borrow_mut().next_page();
        if let Some(query) = query {
            self.run(query).await;
        }
    }

    pub async fn previous_page(&self) {
        let query = self.list.borrow_mut().previous_page();
        if let Some(query) = query {
            self.run(query).await;
        }
    }

    pub async fn go_to_page(&self, page: u32) {
        let query = self.list.borrow_mut().go_to_page(page);
        if let Some(query) = query {
            self.run(query).await;
        }
    }

    pub async fn change_page_size(&self, page_size: u32) {
        let query = self.list.borrow_mut().change_page_size(page_size);
        self.run(query).await;
    }

    // ========================================================================
    // FORMULARIO
    // ========================================================================

    pub fn open_new_form(&self) {
        self.form.borrow_mut().open_new();
        self.notify();
    }

    /// Prellena con el registro vigente del servidor; sin él, usa la copia de la tabla
    pub async fn open_edit_form(&self, id: i64) {
        *self.menu_open.borrow_mut() = None;
        let record = match self.gateway.get_by_id(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("⚠️ No se pudo obtener el acopiador {}: {}", id, e);
                self.record(id)
            }
        };
        if let Some(record) = record {
            self.form.borrow_mut().open_edit(&record);
            self.notify();
        }
    }

    pub fn cancel_form(&self) {
        self.form.borrow_mut().cancel();
        self.notify();
    }

    /// Avanza solo si el paso actual es válido
    pub fn next_form_step(&self) {
        let moved = self.form.borrow_mut().next_step();
        if !moved {
            log::warn!("⚠️ Paso {} incompleto", self.form.borrow().step);
        }
        self.notify();
    }

    pub fn previous_form_step(&self) {
        self.form.borrow_mut().previous_step();
        self.notify();
    }

    pub fn go_to_form_step(&self, step: usize) {
        if self.form.borrow_mut().go_to_step(step) {
            self.notify();
        }
    }

    /// Escritura en el borrador sin re-render (el input conserva el foco)
    pub fn edit_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut FormWizard),
    {
        let mut form = self.form.borrow_mut();
        edit(&mut form);
        form.validate_current_step();
    }

    /// Crear o actualizar según el tipo de borrador
    pub async fn save_form(&self) {
        let prepared = self.form.borrow_mut().prepare_submission();
        let submission = match prepared {
            Ok(Some(s)) => s,
            Ok(None) => {
                log::warn!("⚠️ Guardado en curso, se ignora el clic");
                return;
            }
            Err(e) => {
                log::warn!("⚠️ Formulario incompleto: {}", e);
                self.notify();
                return;
            }
        };
        self.notify();

        let result = match &submission {
            Submission::Create(request) => self.gateway.create(request).await.map(|id| {
                log::info!("✅ Acopiador {} creado", id);
            }),
            Submission::Update { id, request } => self.gateway.update(*id, request).await,
        };

        match result {
            Ok(()) => {
                self.form.borrow_mut().finish_submission();
                self.load().await;
            }
            Err(e) => {
                let message = format!("{}{}", submission.error_label(), e.user_message());
                log::error!("❌ {}", message);
                self.form.borrow_mut().fail_submission(message);
                self.notify();
            }
        }
    }

    // ========================================================================
    // EDICIÓN INLINE
    // ========================================================================

    pub fn start_inline(&self, field: EditableField, id: i64) {
        if let Some(record) = self.record(id) {
            self.inline.borrow_mut().editor_mut(field).start(&record);
            self.notify();
        }
    }

    pub fn set_inline_buffer(&self, field: EditableField, value: String) {
        self.inline.borrow_mut().editor_mut(field).buffer = value;
    }

    pub fn cancel_inline(&self, field: EditableField) {
        self.inline.borrow_mut().editor_mut(field).cancel();
        self.notify();
    }

    pub async fn save_inline(&self, field: EditableField, id: i64) {
        let decision = {
            let list = self.list.borrow();
            let Some(record) = list.find(id) else { return };
            self.inline.borrow_mut().editor_mut(field).begin_save(record)
        };

        let (id, value, request) = match decision {
            SaveDecision::Ignore => return,
            SaveDecision::Unchanged => {
                self.notify();
                return;
            }
            SaveDecision::Send { id, value, request } => (id, value, request),
        };
        self.notify();

        match self.gateway.update(id, &request).await {
            Ok(()) => {
                let mut list = self.list.borrow_mut();
                self.inline.borrow_mut().editor_mut(field).finish_save(list.find_mut(id), value);
            }
            Err(e) => {
                self.inline.borrow_mut().editor_mut(field).fail_save();
                self.list.borrow_mut().error = Some(format!("{}{}", field.error_label(), e.user_message()));
            }
        }
        self.notify();
    }

    /// Enter guarda, Escape cancela
    pub async fn handle_inline_key(&self, field: EditableField, id: i64, key: &str) {
        match KeyAction::from_key(key) {
            KeyAction::Save => self.save_inline(field, id).await,
            KeyAction::Cancel => self.cancel_inline(field),
            KeyAction::Ignore => {}
        }
    }

    // ========================================================================
    // ACCIONES DE FILA
    // ========================================================================

    pub fn toggle_menu(&self, id: i64) {
        {
            let mut menu = self.menu_open.borrow_mut();
            *menu = if *menu == Some(id) { None } else { Some(id) };
        }
        self.notify();
    }

    /// Click en cualquier parte del documento
    pub fn close_menu(&self) {
        let was_open = self.menu_open.borrow_mut().take().is_some();
        if was_open {
            self.notify();
        }
    }

    pub async fn delete_acopiador(&self, id: i64) {
        *self.menu_open.borrow_mut() = None;
        if !self.dialogs.confirm(CONFIRM_DELETE_ACOPIADOR) {
            return;
        }
        match self.gateway.delete(id).await {
            Ok(()) => {
                log::info!("🗑️ Acopiador {} eliminado", id);
                self.load().await;
            }
            Err(e) => self.set_error(format!("Error: {}", e.user_message())),
        }
    }

    /// Alterna el borrado lógico (deleteProve 0 <-> 1)
    pub async fn toggle_status(&self, id: i64) {
        *self.menu_open.borrow_mut() = None;
        let Some(record) = self.record(id) else { return };
        let request = UpdateAcopiadorRequest {
            delete_prove: Some(if record.delete_prove == 0 { 1 } else { 0 }),
            ..Default::default()
        };
        match self.gateway.update(id, &request).await {
            Ok(()) => self.load().await,
            Err(e) => self.set_error(format!("Error: {}", e.user_message())),
        }
    }
}
