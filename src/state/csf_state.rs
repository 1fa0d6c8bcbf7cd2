// ============================================================================
// CSF STATE - Modal de Constancia de Situación Fiscal (subir / ver)
// ============================================================================
// Las vistas previas locales son object URLs: PreviewHandle las libera al
// soltarse, así que reemplazar o cerrar nunca deja URLs vivas.
// ============================================================================

use std::rc::Rc;
use crate::models::Acopiador;
use crate::services::browser_host::DocumentHost;
use crate::services::gateway::GatewayError;
use crate::utils::{ValidationError, PDF_MEDIA_TYPE};

/// Dueño de un object URL; al soltarse lo revoca
pub struct PreviewHandle<H: DocumentHost> {
    host: Rc<H>,
    url: String,
}

impl<H: DocumentHost> PreviewHandle<H> {
    pub fn for_file(host: &Rc<H>, file: &H::File) -> Result<Self, String> {
        let url = host.file_url(file)?;
        Ok(Self { host: Rc::clone(host), url })
    }

    pub fn for_bytes(host: &Rc<H>, bytes: &[u8], media_type: &str) -> Result<Self, String> {
        let url = host.bytes_url(bytes, media_type)?;
        Ok(Self { host: Rc::clone(host), url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<H: DocumentHost> Drop for PreviewHandle<H> {
    fn drop(&mut self) {
        self.host.revoke_url(&self.url);
    }
}

impl<H: DocumentHost> std::fmt::Debug for PreviewHandle<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// Lo que se muestra en el iframe del modal
#[derive(Debug)]
pub enum DocumentPreview<H: DocumentHost> {
    /// Archivo local recién seleccionado
    Local(PreviewHandle<H>),
    /// CSF almacenada en el backend (URL directa)
    Remote(String),
}

impl<H: DocumentHost> DocumentPreview<H> {
    pub fn url(&self) -> &str {
        match self {
            DocumentPreview::Local(handle) => handle.url(),
            DocumentPreview::Remote(url) => url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsfMode {
    Upload,
    View,
}

/// Mensaje de error para una operación sobre la CSF
pub fn document_error(action: &str, err: &GatewayError) -> String {
    match err {
        GatewayError::Rejected(msg) if msg.is_empty() => format!("Error al {} el archivo CSF", action),
        GatewayError::Rejected(msg) => msg.clone(),
        other => format!("Error al {} el archivo CSF: {}", action, other.user_message()),
    }
}

/// Estado del modal CSF
pub struct CsfModal<H: DocumentHost> {
    host: Rc<H>,
    pub visible: bool,
    pub mode: CsfMode,
    pub record: Option<Acopiador>,
    pub selected_file: Option<H::File>,
    pub preview: Option<DocumentPreview<H>>,
    pub uploading: bool,
    pub error: Option<String>,
}

impl<H: DocumentHost> CsfModal<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            visible: false,
            mode: CsfMode::Upload,
            record: None,
            selected_file: None,
            preview: None,
            uploading: false,
            error: None,
        }
    }

    /// Abre en modo vista si el registro ya tiene CSF, si no en modo subida
    pub fn open<F>(&mut self, record: Acopiador, document_url: F)
    where
        F: Fn(i64) -> String,
    {
        self.release();
        self.error = None;
        self.uploading = false;
        self.visible = true;
        if record.has_stored_csf() {
            self.mode = CsfMode::View;
            self.preview = Some(DocumentPreview::Remote(document_url(record.id_datos_fiscales)));
        } else {
            self.mode = CsfMode::Upload;
        }
        self.record = Some(record);
    }

    pub fn close(&mut self) {
        self.release();
        self.visible = false;
        self.record = None;
        self.uploading = false;
        self.error = None;
        self.mode = CsfMode::Upload;
    }

    pub fn switch_to_upload(&mut self) {
        self.mode = CsfMode::Upload;
        self.release();
    }

    pub fn switch_to_view<F>(&mut self, document_url: F)
    where
        F: Fn(i64) -> String,
    {
        self.mode = CsfMode::View;
        if let Some(record) = self.record.as_ref().filter(|r| r.has_csf) {
            let url = document_url(record.id_datos_fiscales);
            self.selected_file = None;
            self.preview = Some(DocumentPreview::Remote(url));
        }
    }

    /// Solo PDF. Un archivo rechazado limpia el input y la selección.
    pub fn select_file(&mut self, file: H::File) -> Result<(), ValidationError> {
        // La vista previa anterior se libera antes de crear otra
        self.release();

        let media_type = self.host.media_type(&file);
        if media_type != PDF_MEDIA_TYPE {
            log::warn!("⚠️ Archivo rechazado ({}): {}", media_type, self.host.file_name(&file));
            self.host.clear_file_input();
            let err = ValidationError::NotPdf;
            self.error = Some(err.to_string());
            return Err(err);
        }

        match PreviewHandle::for_file(&self.host, &file) {
            Ok(handle) => self.preview = Some(DocumentPreview::Local(handle)),
            Err(e) => log::warn!("⚠️ No se pudo generar la vista previa: {}", e),
        }
        self.selected_file = Some(file);
        self.error = None;
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.release();
    }

    /// Valida y marca la subida; devuelve (id datos fiscales, archivo).
    /// `Ok(None)` si ya hay una subida en curso.
    pub fn begin_upload(&mut self) -> Result<Option<(i64, H::File)>, ValidationError> {
        if self.uploading {
            return Ok(None);
        }
        let result = match (&self.selected_file, &self.record) {
            (Some(file), Some(record)) => record
                .fiscal_id()
                .map(|fiscal_id| (fiscal_id, file.clone()))
                .ok_or(ValidationError::MissingFiscalData),
            _ => Err(ValidationError::NoFileSelected),
        };
        match &result {
            Ok(_) => {
                self.uploading = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        result.map(Some)
    }

    pub fn fail_upload(&mut self, message: String) {
        self.uploading = false;
        self.error = Some(message);
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.url())
    }

    fn release(&mut self) {
        self.preview = None;
        self.selected_file = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFile, MockHost};

    fn record_with_csf() -> Acopiador {
        serde_json::from_str(
            r#"{"idProveedor": 1, "nombre": "Ana", "idSagarpa": "S1", "idDatosFiscales": 8,
                "hasCsf": true, "csfFile": "csf_8.pdf"}"#,
        )
        .unwrap()
    }

    fn record_without_csf() -> Acopiador {
        serde_json::from_str(r#"{"idProveedor": 2, "nombre": "Luis", "idDatosFiscales": 0}"#).unwrap()
    }

    #[test]
    fn open_picks_mode_from_stored_document() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_with_csf(), |id| format!("http://api/datosfiscales/{}/csf", id));
        assert_eq!(modal.mode, CsfMode::View);
        assert_eq!(modal.preview_url(), Some("http://api/datosfiscales/8/csf"));

        modal.open(record_without_csf(), |id| format!("http://api/{}", id));
        assert_eq!(modal.mode, CsfMode::Upload);
        assert_eq!(modal.preview_url(), None);
    }

    #[test]
    fn non_pdf_is_rejected() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_without_csf(), |_| String::new());
        assert_eq!(modal.select_file(MockFile::new("foto.png", "image/png")), Err(ValidationError::NotPdf));
        assert!(modal.selected_file.is_none());
        assert_eq!(modal.error.as_deref(), Some("Por favor selecciona un archivo PDF válido."));
        assert_eq!(host.cleared_inputs(), 1);
        assert!(host.created().is_empty());
    }

    #[test]
    fn replacing_and_closing_release_previews() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_without_csf(), |_| String::new());

        modal.select_file(MockFile::pdf("a.pdf")).unwrap();
        modal.select_file(MockFile::pdf("b.pdf")).unwrap();
        assert_eq!(host.created().len(), 2);
        assert_eq!(host.revoked(), vec![host.created()[0].clone()]);

        // Un archivo inválido también libera la vista previa vigente
        let _ = modal.select_file(MockFile::new("c.txt", "text/plain"));
        assert_eq!(host.revoked().len(), 2);

        modal.select_file(MockFile::pdf("d.pdf")).unwrap();
        modal.close();
        assert_eq!(host.live_urls(), 0);
    }

    #[test]
    fn switching_modes_releases_local_preview() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_with_csf(), |id| format!("remote/{}", id));
        modal.switch_to_upload();
        assert_eq!(modal.preview_url(), None);

        modal.select_file(MockFile::pdf("nueva.pdf")).unwrap();
        modal.switch_to_view(|id| format!("remote/{}", id));
        assert_eq!(modal.preview_url(), Some("remote/8"));
        assert_eq!(host.live_urls(), 0);
    }

    #[test]
    fn upload_requires_file_and_fiscal_data() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_without_csf(), |_| String::new());
        assert_eq!(modal.begin_upload().unwrap_err(), ValidationError::NoFileSelected);

        modal.select_file(MockFile::pdf("a.pdf")).unwrap();
        assert_eq!(modal.begin_upload().unwrap_err(), ValidationError::MissingFiscalData);
        assert!(!modal.uploading);

        modal.open(record_with_csf(), |_| String::new());
        modal.switch_to_upload();
        modal.select_file(MockFile::pdf("a.pdf")).unwrap();
        let (fiscal_id, file) = modal.begin_upload().unwrap().unwrap();
        assert_eq!(fiscal_id, 8);
        assert_eq!(file.name, "a.pdf");
        assert!(modal.uploading);
    }

    #[test]
    fn second_upload_click_waits_for_the_first() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_with_csf(), |_| String::new());
        modal.switch_to_upload();
        modal.select_file(MockFile::pdf("a.pdf")).unwrap();

        assert!(modal.begin_upload().unwrap().is_some());
        assert!(modal.begin_upload().unwrap().is_none());
        assert!(modal.uploading);

        modal.fail_upload("Error al subir el archivo CSF".to_string());
        assert!(modal.begin_upload().unwrap().is_some());
    }

    #[test]
    fn closing_forgets_previous_error() {
        let host = Rc::new(MockHost::default());
        let mut modal = CsfModal::new(Rc::clone(&host));
        modal.open(record_with_csf(), |_| String::new());
        modal.fail_upload("Disco lleno".to_string());
        modal.close();
        assert!(modal.error.is_none());

        modal.open(record_without_csf(), |_| String::new());
        assert!(modal.error.is_none());
    }

    #[test]
    fn error_messages_prefer_server_text() {
        let http = GatewayError::Http { status: 500, message: "Disco lleno".into() };
        assert_eq!(document_error("subir", &http), "Error al subir el archivo CSF: Disco lleno");
        assert_eq!(document_error("eliminar", &GatewayError::Rejected(String::new())), "Error al eliminar el archivo CSF");
        assert_eq!(document_error("subir", &GatewayError::Rejected("No permitido".into())), "No permitido");
    }
}
