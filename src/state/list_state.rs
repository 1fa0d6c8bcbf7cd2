// ============================================================================
// LIST STATE - Filtros, paginación y registros mostrados
// ============================================================================
// Transiciones puras: el ViewModel pide un ListQuery, llama al gateway y
// entrega el resultado junto con la misma query. Solo se aplica la
// respuesta de la última petición emitida, y página/tamaño solo cambian
// cuando esa respuesta llega bien.
// ============================================================================

use crate::models::{AcopiadoresPage, Acopiador};
use crate::services::gateway::{FilterParams, GatewayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapFilter {
    #[default]
    All,
    WithMap,
    WithoutMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SagarpaFilter {
    #[default]
    All,
    WithSagarpa,
    WithoutSagarpa,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "active" => StatusFilter::Active,
            "inactive" => StatusFilter::Inactive,
            _ => StatusFilter::All,
        }
    }
}

impl MapFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapFilter::All => "all",
            MapFilter::WithMap => "with-map",
            MapFilter::WithoutMap => "without-map",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "with-map" => MapFilter::WithMap,
            "without-map" => MapFilter::WithoutMap,
            _ => MapFilter::All,
        }
    }
}

impl SagarpaFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SagarpaFilter::All => "all",
            SagarpaFilter::WithSagarpa => "with-sagarpa",
            SagarpaFilter::WithoutSagarpa => "without-sagarpa",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "with-sagarpa" => SagarpaFilter::WithSagarpa,
            "without-sagarpa" => SagarpaFilter::WithoutSagarpa,
            _ => SagarpaFilter::All,
        }
    }
}

/// Criterio individual (para quitar un chip de filtro)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    SearchText,
    Status,
    MapStatus,
    SagarpaStatus,
}

/// Criterios de filtrado. Todo en default = sin restricción.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub search_text: String,
    pub status: StatusFilter,
    pub map_status: MapFilter,
    pub sagarpa_status: SagarpaFilter,
}

impl FilterCriteria {
    /// Algún criterio difiere de su default
    pub fn has_active_filters(&self) -> bool {
        !self.search_text.trim().is_empty()
            || self.status != StatusFilter::All
            || self.map_status != MapFilter::All
            || self.sagarpa_status != SagarpaFilter::All
    }

    /// Query params solo para los criterios no-default
    pub fn to_params(&self) -> FilterParams {
        let mut params = FilterParams::new();
        let search = self.search_text.trim();
        if !search.is_empty() {
            params.push(("nombre", search.to_string()));
        }
        // deleteProve: 0 = Activo, 1 = Inactivo
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Active => params.push(("deleteProve", "0".to_string())),
            StatusFilter::Inactive => params.push(("deleteProve", "1".to_string())),
        }
        if self.map_status != MapFilter::All {
            params.push(("mapStatus", self.map_status.as_str().to_string()));
        }
        if self.sagarpa_status != SagarpaFilter::All {
            params.push(("sagarpaStatus", self.sagarpa_status.as_str().to_string()));
        }
        params
    }

    pub fn reset(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::SearchText => self.search_text.clear(),
            FilterKind::Status => self.status = StatusFilter::All,
            FilterKind::MapStatus => self.map_status = MapFilter::All,
            FilterKind::SagarpaStatus => self.sagarpa_status = SagarpaFilter::All,
        }
    }
}

/// Paginación: página/tamaño los pide el cliente, totales los reporta el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            total_pages: 0,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

/// Petición lista para enviar al gateway (página/tamaño pedidos, aún sin aplicar)
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub seq: u64,
    pub page: u32,
    pub page_size: u32,
    pub filters: FilterParams,
}

/// Estado de la tabla de acopiadores
#[derive(Debug, Clone)]
pub struct ListState {
    pub records: Vec<Acopiador>,
    pub criteria: FilterCriteria,
    pub page: PageState,
    pub loading: bool,
    pub error: Option<String>,
    latest_seq: u64,
}

impl ListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            page: PageState::new(page_size),
            loading: false,
            error: None,
            latest_seq: 0,
        }
    }

    /// Emite una petición para la página/tamaño indicados con los criterios actuales
    pub fn begin_fetch(&mut self, page: u32, page_size: u32) -> ListQuery {
        self.latest_seq += 1;
        self.loading = true;
        self.error = None;
        ListQuery {
            seq: self.latest_seq,
            page: page.max(1),
            page_size: page_size.max(1),
            filters: self.criteria.to_params(),
        }
    }

    /// Guarda criterios y vuelve a la página 1
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> ListQuery {
        self.criteria = criteria;
        self.begin_fetch(1, self.page.page_size)
    }

    pub fn remove_filter(&mut self, kind: FilterKind) -> ListQuery {
        self.criteria.reset(kind);
        self.begin_fetch(1, self.page.page_size)
    }

    pub fn clear_filters(&mut self) -> ListQuery {
        self.criteria = FilterCriteria::default();
        self.begin_fetch(1, self.page.page_size)
    }

    pub fn change_page_size(&mut self, page_size: u32) -> ListQuery {
        self.begin_fetch(1, page_size)
    }

    /// None si la página está fuera de [1, total_pages]
    pub fn go_to_page(&mut self, page: u32) -> Option<ListQuery> {
        if !self.page.contains(page) {
            return None;
        }
        Some(self.begin_fetch(page, self.page.page_size))
    }

    pub fn next_page(&mut self) -> Option<ListQuery> {
        self.go_to_page(self.page.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<ListQuery> {
        let target = self.page.current_page.checked_sub(1)?;
        self.go_to_page(target)
    }

    /// Aplica la respuesta; devuelve false si era de una petición vieja.
    /// Un fallo deja registros y paginación como estaban.
    pub fn finish_fetch(&mut self, query: &ListQuery, result: Result<AcopiadoresPage, GatewayError>) -> bool {
        if query.seq != self.latest_seq {
            log::warn!("⏭️ Respuesta obsoleta #{} descartada (última #{})", query.seq, self.latest_seq);
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => {
                self.records = data.acopiadores;
                self.page.current_page = query.page;
                self.page.page_size = query.page_size;
                if let Some(p) = data.pagination {
                    self.page.current_page = p.page;
                    self.page.page_size = p.limit.max(1);
                    self.page.total_items = p.total;
                    self.page.total_pages = p.total_pages;
                }
            }
            Err(e) => {
                log::error!("❌ Error cargando acopiadores: {}", e);
                self.error = Some(format!("Error al cargar los acopiadores: {}", e.user_message()));
            }
        }
        true
    }

    pub fn find(&self, id: i64) -> Option<&Acopiador> {
        self.records.iter().find(|a| a.id_proveedor == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut Acopiador> {
        self.records.iter_mut().find(|a| a.id_proveedor == id)
    }

    /// Numeración descendente: el primero de la página 1 muestra el total
    pub fn row_index(&self, index: usize) -> i64 {
        let offset = (self.page.current_page.saturating_sub(1) as u64) * self.page.page_size as u64;
        self.page.total_items as i64 - (offset + index as u64) as i64
    }

    /// Primer y último registro mostrado (1-based)
    pub fn displayed_range(&self) -> (u64, u64) {
        if self.page.total_items == 0 {
            return (0, 0);
        }
        let page = self.page.current_page.max(1) as u64;
        let size = self.page.page_size as u64;
        let first = (page - 1) * size + 1;
        let last = (page * size).min(self.page.total_items);
        (first.min(last), last)
    }

    pub fn has_active_filters(&self) -> bool {
        self.criteria.has_active_filters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::api::Pagination;

    fn page_of(total: u64, page: u32, limit: u32) -> AcopiadoresPage {
        AcopiadoresPage {
            acopiadores: Vec::new(),
            pagination: Some(Pagination {
                page,
                limit,
                total,
                total_pages: ((total + limit as u64 - 1) / limit as u64) as u32,
            }),
        }
    }

    #[test]
    fn apply_filters_always_resets_to_first_page() {
        let criteria_set = vec![
            FilterCriteria::default(),
            FilterCriteria { search_text: "juan".into(), ..Default::default() },
            FilterCriteria { status: StatusFilter::Inactive, ..Default::default() },
            FilterCriteria {
                search_text: " x ".into(),
                status: StatusFilter::Active,
                map_status: MapFilter::WithoutMap,
                sagarpa_status: SagarpaFilter::WithSagarpa,
            },
        ];
        for criteria in criteria_set {
            let mut state = ListState::new(10);
            let q = state.begin_fetch(1, 10);
            state.finish_fetch(&q, Ok(page_of(100, 1, 10)));
            let q = state.go_to_page(5).unwrap();
            state.finish_fetch(&q, Ok(page_of(100, 5, 10)));
            let query = state.apply_filters(criteria.clone());
            assert_eq!(query.page, 1);
            assert_eq!(query.filters, criteria.to_params());
            state.finish_fetch(&query, Ok(page_of(100, 1, 10)));
            assert_eq!(state.page.current_page, 1);
        }
    }

    #[test]
    fn only_non_default_criteria_are_sent() {
        assert!(FilterCriteria::default().to_params().is_empty());
        let criteria = FilterCriteria {
            search_text: "  Miel  ".into(),
            status: StatusFilter::Active,
            map_status: MapFilter::WithMap,
            sagarpa_status: SagarpaFilter::All,
        };
        assert_eq!(
            criteria.to_params(),
            vec![
                ("nombre", "Miel".to_string()),
                ("deleteProve", "0".to_string()),
                ("mapStatus", "with-map".to_string()),
            ]
        );
    }

    #[test]
    fn has_active_filters_ignores_blank_search() {
        let mut criteria = FilterCriteria { search_text: "   ".into(), ..Default::default() };
        assert!(!criteria.has_active_filters());
        criteria.sagarpa_status = SagarpaFilter::WithoutSagarpa;
        assert!(criteria.has_active_filters());
        criteria.reset(FilterKind::SagarpaStatus);
        assert!(!criteria.has_active_filters());
    }

    #[test]
    fn go_to_page_respects_server_total_pages() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(1, 10);
        state.finish_fetch(&q, Ok(page_of(25, 1, 10)));
        assert_eq!(state.page.total_pages, 3);

        assert!(state.go_to_page(4).is_none());
        assert!(state.go_to_page(0).is_none());
        assert_eq!(state.page.current_page, 1);

        let q = state.go_to_page(3).unwrap();
        assert_eq!(q.page, 3);
        state.finish_fetch(&q, Ok(page_of(25, 3, 10)));
        assert!(state.next_page().is_none());
        assert_eq!(state.previous_page().unwrap().page, 2);
    }

    #[test]
    fn previous_on_first_page_is_noop() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(1, 10);
        state.finish_fetch(&q, Ok(page_of(5, 1, 10)));
        assert!(state.previous_page().is_none());
    }

    #[test]
    fn changing_page_size_resets_page() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(1, 10);
        state.finish_fetch(&q, Ok(page_of(100, 1, 10)));
        state.go_to_page(4).unwrap();
        let q = state.change_page_size(25);
        assert_eq!((q.page, q.page_size), (1, 25));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = ListState::new(10);
        let first = state.apply_filters(FilterCriteria { search_text: "a".into(), ..Default::default() });
        let second = state.apply_filters(FilterCriteria { search_text: "ab".into(), ..Default::default() });

        let mut newer = page_of(1, 1, 10);
        newer.acopiadores = vec![serde_json::from_str(r#"{"idProveedor": 2, "nombre": "ab"}"#).unwrap()];
        assert!(state.finish_fetch(&second, Ok(newer)));

        let mut older = page_of(2, 1, 10);
        older.acopiadores = vec![serde_json::from_str(r#"{"idProveedor": 1, "nombre": "a"}"#).unwrap()];
        assert!(!state.finish_fetch(&first, Ok(older)));

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records[0].id_proveedor, 2);
        assert_eq!(state.page.total_items, 1);
    }

    #[test]
    fn failure_keeps_previous_records() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(1, 10);
        let mut data = page_of(1, 1, 10);
        data.acopiadores = vec![serde_json::from_str(r#"{"idProveedor": 9, "nombre": "z"}"#).unwrap()];
        state.finish_fetch(&q, Ok(data));

        let q = state.begin_fetch(1, 10);
        state.finish_fetch(&q, Err(GatewayError::Network("offline".into())));
        assert_eq!(state.records.len(), 1);
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Error al cargar los acopiadores: Network error: offline")
        );
    }

    #[test]
    fn failed_page_or_size_change_keeps_pagination() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(1, 10);
        let mut data = page_of(25, 1, 10);
        data.acopiadores = vec![serde_json::from_str(r#"{"idProveedor": 9, "nombre": "z"}"#).unwrap()];
        state.finish_fetch(&q, Ok(data));

        let q = state.go_to_page(3).unwrap();
        assert_eq!(q.page, 3);
        state.finish_fetch(&q, Err(GatewayError::Network("offline".into())));
        assert_eq!(state.page.current_page, 1);
        assert_eq!(state.row_index(0), 25);
        assert_eq!(state.next_page().map(|q| q.page), Some(2));

        let q = state.change_page_size(50);
        assert_eq!((q.page, q.page_size), (1, 50));
        state.finish_fetch(&q, Err(GatewayError::Http { status: 500, message: "caído".into() }));
        assert_eq!(state.page.page_size, 10);
        assert_eq!(state.displayed_range(), (1, 10));
        assert_eq!(state.records.len(), 1);
    }

    #[test]
    fn success_without_pagination_block_commits_request() {
        let mut state = ListState::new(10);
        let q = state.change_page_size(25);
        state.finish_fetch(&q, Ok(AcopiadoresPage { acopiadores: Vec::new(), pagination: None }));
        assert_eq!(state.page.page_size, 25);
        assert_eq!(state.page.current_page, 1);
    }

    #[test]
    fn row_index_and_range() {
        let mut state = ListState::new(10);
        let q = state.begin_fetch(2, 10);
        state.finish_fetch(&q, Ok(page_of(518, 2, 10)));
        assert_eq!(state.row_index(0), 508);
        assert_eq!(state.row_index(9), 499);
        assert_eq!(state.displayed_range(), (11, 20));

        let q = state.begin_fetch(52, 10);
        state.finish_fetch(&q, Ok(page_of(518, 52, 10)));
        assert_eq!(state.displayed_range(), (511, 518));
    }
}
