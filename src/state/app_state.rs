// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================
// Agrupa los ViewModels (cada uno con su estado en Rc<RefCell>) y la lista
// de subscribers que disparan el re-render.
// ============================================================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use crate::config::CONFIG;
use crate::maps::WebMapRenderer;
use crate::services::{ApiClient, BrowserHost};
use crate::viewmodels::{AcopiadoresViewModel, CsfViewModel, MapViewModel};

pub type ListViewModel = AcopiadoresViewModel<ApiClient, BrowserHost>;
pub type DocumentViewModel = CsfViewModel<ApiClient, BrowserHost>;
pub type AgentsMapViewModel = MapViewModel<ApiClient, WebMapRenderer>;

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub acopiadores: ListViewModel,
    pub csf: DocumentViewModel,
    pub map: AgentsMapViewModel,

    // UI State
    pub show_map_panel: Rc<RefCell<bool>>,

    // Reactivity: callbacks para notificar cambios
    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    /// Crear nuevo estado de aplicación
    pub fn new() -> Self {
        let change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>> = Rc::new(RefCell::new(Vec::new()));
        let on_change: Rc<dyn Fn()> = {
            let subscribers = Rc::clone(&change_subscribers);
            Rc::new(move || {
                // Copia para que un callback pueda suscribir otro sin re-borrow
                let callbacks: Vec<Rc<dyn Fn()>> = subscribers.borrow().clone();
                for callback in callbacks {
                    callback();
                }
            })
        };

        let gateway = Rc::new(ApiClient::new());
        let host = Rc::new(BrowserHost::new());

        let acopiadores = AcopiadoresViewModel::new(
            Rc::clone(&gateway),
            Rc::clone(&host),
            CONFIG.list_config.default_page_size,
            Rc::clone(&on_change),
        );
        let csf = CsfViewModel::new(acopiadores.clone(), Rc::clone(&host), Rc::clone(&on_change));
        let map = MapViewModel::new(
            gateway,
            WebMapRenderer::new(),
            CONFIG.map_config.clone(),
            Rc::clone(&on_change),
        );

        Self {
            acopiadores,
            csf,
            map,
            show_map_panel: Rc::new(RefCell::new(false)),
            change_subscribers,
        }
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers
    pub fn notify_subscribers(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in callbacks {
            callback();
        }
    }

    /// Ejecutar una acción async del ViewModel en el event loop del navegador
    pub fn spawn<F>(future: F)
    where
        F: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(future);
    }

    pub fn set_show_map_panel(&self, show: bool) {
        *self.show_map_panel.borrow_mut() = show;
        self.notify_subscribers();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
