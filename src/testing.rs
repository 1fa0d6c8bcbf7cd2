// Dobles en memoria para los tests de estado y ViewModels

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use async_trait::async_trait;
use crate::config::MapConfig;
use crate::maps::{MapError, MapMarker, MapRenderer};
use crate::models::api::Pagination;
use crate::models::{
    AcopiadoresPage, Acopiador, AcopiadorCoordinates, CreateAcopiadorRequest, UpdateAcopiadorRequest,
};
use crate::services::gateway::{FilterParams, GatewayError};
use crate::services::{Dialogs, DocumentHost, RecordGateway};

#[derive(Debug, Clone, PartialEq)]
pub struct MockFile {
    pub name: String,
    pub media_type: String,
}

impl MockFile {
    pub fn new(name: &str, media_type: &str) -> Self {
        Self { name: name.to_string(), media_type: media_type.to_string() }
    }

    pub fn pdf(name: &str) -> Self {
        Self::new(name, "application/pdf")
    }
}

/// Host que cuenta object URLs y responde confirmaciones con un valor fijo
#[derive(Default)]
pub struct MockHost {
    created: RefCell<Vec<String>>,
    revoked: RefCell<Vec<String>>,
    cleared: Cell<usize>,
    pub downloads: RefCell<Vec<(String, String)>>,
    pub confirm_answer: Cell<bool>,
    pub confirms: RefCell<Vec<String>>,
    pub alerts: RefCell<Vec<String>>,
}

impl MockHost {
    pub fn confirming(answer: bool) -> Self {
        let host = Self::default();
        host.confirm_answer.set(answer);
        host
    }

    pub fn created(&self) -> Vec<String> {
        self.created.borrow().clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.borrow().clone()
    }

    pub fn live_urls(&self) -> usize {
        self.created.borrow().len() - self.revoked.borrow().len()
    }

    pub fn cleared_inputs(&self) -> usize {
        self.cleared.get()
    }

    fn next_url(&self) -> String {
        let url = format!("blob:mock/{}", self.created.borrow().len() + 1);
        self.created.borrow_mut().push(url.clone());
        url
    }
}

impl DocumentHost for MockHost {
    type File = MockFile;

    fn media_type(&self, file: &MockFile) -> String {
        file.media_type.clone()
    }

    fn file_name(&self, file: &MockFile) -> String {
        file.name.clone()
    }

    fn file_url(&self, _file: &MockFile) -> Result<String, String> {
        Ok(self.next_url())
    }

    fn bytes_url(&self, _bytes: &[u8], _media_type: &str) -> Result<String, String> {
        Ok(self.next_url())
    }

    fn revoke_url(&self, url: &str) {
        self.revoked.borrow_mut().push(url.to_string());
    }

    fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), String> {
        self.downloads.borrow_mut().push((url.to_string(), file_name.to_string()));
        Ok(())
    }

    fn clear_file_input(&self) {
        self.cleared.set(self.cleared.get() + 1);
    }
}

impl Dialogs for MockHost {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

/// Gateway que registra cada llamada y contesta con respuestas en cola
#[derive(Default)]
pub struct MockGateway {
    calls: RefCell<Vec<String>>,
    pub pages: RefCell<VecDeque<Result<AcopiadoresPage, GatewayError>>>,
    pub fail_next: RefCell<Option<GatewayError>>,
    pub map_points: RefCell<Vec<AcopiadorCoordinates>>,
    /// Registros que devuelve `get_by_id`
    pub stored: RefCell<Vec<Acopiador>>,
    pub document: RefCell<Vec<u8>>,
    pub last_update: RefCell<Option<UpdateAcopiadorRequest>>,
    pub last_create: RefCell<Option<CreateAcopiadorRequest>>,
}

impl MockGateway {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn queue_page(&self, records: Vec<Acopiador>, page: u32, limit: u32, total: u64) {
        let total_pages = ((total + limit as u64 - 1) / limit as u64) as u32;
        self.pages.borrow_mut().push_back(Ok(AcopiadoresPage {
            acopiadores: records,
            pagination: Some(Pagination { page, limit, total, total_pages }),
        }));
    }

    pub fn fail_with(&self, err: GatewayError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn record(&self, call: String) -> Result<(), GatewayError> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl RecordGateway for MockGateway {
    type Upload = MockFile;

    async fn list(&self, page: u32, limit: u32, filters: &FilterParams) -> Result<AcopiadoresPage, GatewayError> {
        self.record(format!("list:{}:{}:{:?}", page, limit, filters))?;
        self.pages.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(AcopiadoresPage { acopiadores: Vec::new(), pagination: None })
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Acopiador, GatewayError> {
        self.record(format!("get:{}", id))?;
        self.stored
            .borrow()
            .iter()
            .find(|a| a.id_proveedor == id)
            .cloned()
            .ok_or_else(|| GatewayError::Http { status: 404, message: "Acopiador no encontrado".to_string() })
    }

    async fn create(&self, request: &CreateAcopiadorRequest) -> Result<i64, GatewayError> {
        self.record(format!("create:{}", request.nombre))?;
        *self.last_create.borrow_mut() = Some(request.clone());
        Ok(100)
    }

    async fn update(&self, id: i64, request: &UpdateAcopiadorRequest) -> Result<(), GatewayError> {
        self.record(format!("update:{}", id))?;
        *self.last_update.borrow_mut() = Some(request.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.record(format!("delete:{}", id))
    }

    async fn map_data(&self) -> Result<Vec<AcopiadorCoordinates>, GatewayError> {
        self.record("map_data".to_string())?;
        Ok(self.map_points.borrow().clone())
    }

    async fn upload_document(&self, fiscal_id: i64, file: &MockFile) -> Result<(), GatewayError> {
        self.record(format!("upload:{}:{}", fiscal_id, file.name))
    }

    async fn download_document(&self, fiscal_id: i64) -> Result<Vec<u8>, GatewayError> {
        self.record(format!("download:{}", fiscal_id))?;
        Ok(self.document.borrow().clone())
    }

    async fn delete_document(&self, fiscal_id: i64) -> Result<(), GatewayError> {
        self.record(format!("delete_document:{}", fiscal_id))
    }

    fn document_url(&self, fiscal_id: i64) -> String {
        format!("http://backend/api/datosfiscales/{}/csf", fiscal_id)
    }
}

/// Renderer que guarda lo último que se le pidió
#[derive(Default)]
pub struct MockRenderer {
    pub ready: bool,
    pub markers: Vec<MapMarker>,
    pub fits: usize,
}

impl MapRenderer for MockRenderer {
    fn initialize(&mut self, _container_id: &str, _config: &MapConfig) -> Result<(), MapError> {
        self.ready = true;
        Ok(())
    }

    fn set_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError> {
        if !self.ready {
            return Err(MapError::NotReady);
        }
        self.markers = markers.to_vec();
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), MapError> {
        self.markers.clear();
        Ok(())
    }

    fn fit_to_markers(&mut self) -> Result<(), MapError> {
        if !self.ready {
            return Err(MapError::NotReady);
        }
        self.fits += 1;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Registro de prueba a partir de JSON del backend
pub fn acopiador(json: &str) -> Acopiador {
    serde_json::from_str(json).unwrap()
}
