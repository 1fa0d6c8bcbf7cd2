// ============================================================================
// CSF VIEWMODEL - Subir, ver, descargar y eliminar la constancia fiscal
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::models::Acopiador;
use crate::services::{Dialogs, DocumentHost, RecordGateway};
use crate::state::csf_state::{document_error, CsfModal, PreviewHandle};
use crate::utils::{ValidationError, PDF_MEDIA_TYPE};
use super::acopiadores_viewmodel::AcopiadoresViewModel;

pub struct CsfViewModel<G, H>
where
    G: RecordGateway<Upload = H::File>,
    H: DocumentHost + Dialogs,
{
    acopiadores: AcopiadoresViewModel<G, H>,
    host: Rc<H>,
    pub modal: Rc<RefCell<CsfModal<H>>>,
    on_change: Rc<dyn Fn()>,
}

impl<G, H> Clone for CsfViewModel<G, H>
where
    G: RecordGateway<Upload = H::File>,
    H: DocumentHost + Dialogs,
{
    fn clone(&self) -> Self {
        Self {
            acopiadores: self.acopiadores.clone(),
            host: Rc::clone(&self.host),
            modal: Rc::clone(&self.modal),
            on_change: Rc::clone(&self.on_change),
        }
    }
}

impl<G, H> CsfViewModel<G, H>
where
    G: RecordGateway<Upload = H::File>,
    H: DocumentHost + Dialogs,
{
    pub fn new(acopiadores: AcopiadoresViewModel<G, H>, host: Rc<H>, on_change: Rc<dyn Fn()>) -> Self {
        Self {
            acopiadores,
            modal: Rc::new(RefCell::new(CsfModal::new(Rc::clone(&host)))),
            host,
            on_change,
        }
    }

    fn notify(&self) {
        (self.on_change)();
    }

    /// Registro con datos fiscales, o error a nivel página
    fn fiscal_record(&self, id: i64) -> Option<(Acopiador, i64)> {
        let record = self.acopiadores.record(id)?;
        match record.fiscal_id() {
            Some(fiscal_id) => Some((record, fiscal_id)),
            None => {
                self.acopiadores.set_error(ValidationError::MissingFiscalData.to_string());
                None
            }
        }
    }

    pub fn open(&self, id: i64) {
        let Some(record) = self.acopiadores.record(id) else { return };
        self.acopiadores.close_menu();
        let gateway = Rc::clone(self.acopiadores.gateway());
        self.modal.borrow_mut().open(record, |fiscal_id| gateway.document_url(fiscal_id));
        self.notify();
    }

    pub fn close(&self) {
        self.modal.borrow_mut().close();
        self.notify();
    }

    pub fn switch_to_upload(&self) {
        self.modal.borrow_mut().switch_to_upload();
        self.notify();
    }

    pub fn switch_to_view(&self) {
        let gateway = Rc::clone(self.acopiadores.gateway());
        self.modal.borrow_mut().switch_to_view(|fiscal_id| gateway.document_url(fiscal_id));
        self.notify();
    }

    pub fn select_file(&self, file: H::File) {
        if let Err(e) = self.modal.borrow_mut().select_file(file) {
            log::warn!("⚠️ {}", e);
        }
        self.notify();
    }

    pub fn remove_file(&self) {
        self.modal.borrow_mut().remove_file();
        self.notify();
    }

    pub async fn upload(&self) {
        let prepared = self.modal.borrow_mut().begin_upload();
        let (fiscal_id, file) = match prepared {
            Ok(Some(ready)) => ready,
            Ok(None) => {
                log::warn!("⚠️ Subida de CSF en curso, se ignora el clic");
                return;
            }
            Err(e) => {
                log::warn!("⚠️ {}", e);
                self.notify();
                return;
            }
        };
        self.notify();

        match self.acopiadores.gateway().upload_document(fiscal_id, &file).await {
            Ok(()) => {
                let nombre = {
                    let mut modal = self.modal.borrow_mut();
                    let nombre = modal.record.as_ref().map(|r| r.nombre.clone()).unwrap_or_default();
                    modal.close();
                    nombre
                };
                log::info!("✅ CSF subida para {}", nombre);
                self.host.alert(&format!("CSF subido exitosamente para {}", nombre));
                self.notify();
                self.acopiadores.load().await;
            }
            Err(e) => {
                log::error!("❌ Error subiendo CSF: {}", e);
                self.modal.borrow_mut().fail_upload(document_error("subir", &e));
                self.notify();
            }
        }
    }

    /// Descarga como `CSF_<nombre>_<idSagarpa>.pdf`; el object URL se libera al terminar
    pub async fn download(&self, id: i64) {
        let Some((record, fiscal_id)) = self.fiscal_record(id) else { return };

        let bytes = match self.acopiadores.gateway().download_document(fiscal_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.acopiadores.set_error(document_error("descargar", &e));
                return;
            }
        };

        let handle = match PreviewHandle::for_bytes(&self.host, &bytes, PDF_MEDIA_TYPE) {
            Ok(handle) => handle,
            Err(e) => {
                self.acopiadores.set_error(format!("Error al descargar el archivo CSF: {}", e));
                return;
            }
        };
        if let Err(e) = self.host.trigger_download(handle.url(), &record.csf_download_name()) {
            self.acopiadores.set_error(format!("Error al descargar el archivo CSF: {}", e));
        }
        drop(handle);
    }

    /// Pide confirmación; si se rechaza no hay llamada al backend
    pub async fn delete(&self, id: i64) {
        let Some((record, fiscal_id)) = self.fiscal_record(id) else { return };

        let question = format!("¿Estás seguro de que quieres eliminar el CSF de {}?", record.nombre);
        if !self.host.confirm(&question) {
            return;
        }

        match self.acopiadores.gateway().delete_document(fiscal_id).await {
            Ok(()) => {
                {
                    let mut modal = self.modal.borrow_mut();
                    if modal.record.as_ref().map(|r| r.id_proveedor) == Some(id) {
                        modal.close();
                    }
                }
                self.host.alert(&format!("CSF eliminado exitosamente para {}", record.nombre));
                self.acopiadores.load().await;
            }
            Err(e) => self.acopiadores.set_error(document_error("eliminar", &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use crate::services::gateway::GatewayError;
    use crate::state::csf_state::CsfMode;
    use crate::testing::{acopiador, MockFile, MockGateway, MockHost};

    fn setup(confirm: bool) -> (Rc<MockGateway>, Rc<MockHost>, CsfViewModel<MockGateway, MockHost>) {
        let gateway = Rc::new(MockGateway::default());
        let host = Rc::new(MockHost::confirming(confirm));
        let on_change: Rc<dyn Fn()> = Rc::new(|| {});
        let list_vm = AcopiadoresViewModel::new(Rc::clone(&gateway), Rc::clone(&host), 10, Rc::clone(&on_change));
        gateway.queue_page(
            vec![
                acopiador(
                    r#"{"idProveedor": 1, "nombre": "Ana", "idSagarpa": "S1", "idDatosFiscales": 8,
                        "hasCsf": true, "csfFile": "csf_8.pdf"}"#,
                ),
                acopiador(r#"{"idProveedor": 2, "nombre": "Luis", "idSagarpa": "S2", "idDatosFiscales": 9}"#),
                acopiador(r#"{"idProveedor": 3, "nombre": "Sin fiscales"}"#),
            ],
            1,
            10,
            3,
        );
        block_on(list_vm.load());
        let vm = CsfViewModel::new(list_vm, Rc::clone(&host), on_change);
        (gateway, host, vm)
    }

    #[test]
    fn declining_delete_issues_no_calls() {
        let (gateway, host, vm) = setup(false);
        let before = gateway.calls().len();
        block_on(vm.delete(1));
        assert_eq!(host.confirms.borrow().len(), 1);
        assert_eq!(gateway.calls().len(), before);
    }

    #[test]
    fn confirmed_delete_refreshes_list() {
        let (gateway, host, vm) = setup(true);
        block_on(vm.delete(1));
        assert_eq!(
            host.confirms.borrow()[0],
            "¿Estás seguro de que quieres eliminar el CSF de Ana?"
        );
        assert_eq!(gateway.count("delete_document:8"), 1);
        assert_eq!(gateway.count("list"), 2);
    }

    #[test]
    fn delete_from_open_modal_closes_it() {
        let (_, _, vm) = setup(true);
        vm.open(1);
        block_on(vm.delete(1));
        assert!(!vm.modal.borrow().visible);
    }

    #[test]
    fn open_uses_gateway_document_url() {
        let (_, _, vm) = setup(true);
        vm.open(1);
        let modal = vm.modal.borrow();
        assert_eq!(modal.mode, CsfMode::View);
        assert_eq!(modal.preview_url(), Some("http://backend/api/datosfiscales/8/csf"));
    }

    #[test]
    fn upload_success_closes_and_reloads() {
        let (gateway, host, vm) = setup(true);
        vm.open(2);
        vm.select_file(MockFile::pdf("constancia.pdf"));
        block_on(vm.upload());

        assert_eq!(gateway.count("upload:9:constancia.pdf"), 1);
        assert_eq!(gateway.count("list"), 2);
        assert!(!vm.modal.borrow().visible);
        assert_eq!(host.live_urls(), 0);
        assert_eq!(host.alerts.borrow()[0], "CSF subido exitosamente para Luis");
    }

    #[test]
    fn upload_without_fiscal_data_is_local_error() {
        let (gateway, _, vm) = setup(true);
        vm.open(3);
        vm.select_file(MockFile::pdf("a.pdf"));
        block_on(vm.upload());
        assert_eq!(gateway.count("upload"), 0);
        assert_eq!(
            vm.modal.borrow().error.as_deref(),
            Some("El acopiador no tiene datos fiscales asociados.")
        );
    }

    #[test]
    fn upload_failure_keeps_modal_open() {
        let (gateway, _, vm) = setup(true);
        vm.open(2);
        vm.select_file(MockFile::pdf("a.pdf"));
        gateway.fail_with(GatewayError::Http { status: 413, message: "Archivo muy grande".into() });
        block_on(vm.upload());
        let modal = vm.modal.borrow();
        assert!(modal.visible);
        assert!(!modal.uploading);
        assert_eq!(modal.error.as_deref(), Some("Error al subir el archivo CSF: Archivo muy grande"));
    }

    #[test]
    fn download_names_file_and_revokes_url() {
        let (gateway, host, vm) = setup(true);
        *gateway.document.borrow_mut() = b"%PDF-1.4".to_vec();
        block_on(vm.download(1));

        let downloads = host.downloads.borrow();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].1, "CSF_Ana_S1.pdf");
        assert_eq!(host.revoked(), vec![downloads[0].0.clone()]);
    }

    #[test]
    fn download_without_fiscal_data_never_calls_gateway() {
        let (gateway, _, vm) = setup(true);
        block_on(vm.download(3));
        assert_eq!(gateway.count("download"), 0);
        assert_eq!(
            vm.acopiadores.list.borrow().error.as_deref(),
            Some("El acopiador no tiene datos fiscales asociados.")
        );
    }
}
