use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub map_config: MapConfig,
    pub list_config: ListConfig,
    pub google_maps_api_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:3000".to_string(),
            backend_url_production: "http://localhost:3000".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            map_config: MapConfig::default(),
            list_config: ListConfig::default(),
            google_maps_api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Oaxaca, México
        Self {
            default_center_lat: 17.0732,
            default_center_lng: -96.7266,
            default_zoom: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 25, 50, 100],
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .unwrap_or("http://localhost:3000").to_string(),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(|s| s.to_string())
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            map_config: MapConfig {
                default_center_lat: option_env!("DEFAULT_MAP_CENTER_LAT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lat),
                default_center_lng: option_env!("DEFAULT_MAP_CENTER_LNG")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lng),
                default_zoom: option_env!("DEFAULT_MAP_ZOOM")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_zoom),
            },
            list_config: ListConfig {
                default_page_size: option_env!("DEFAULT_PAGE_SIZE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.list_config.default_page_size),
                page_size_options: defaults.list_config.page_size_options,
            },
            google_maps_api_key: option_env!("GOOGLE_MAPS_API_KEY")
                .unwrap_or("").to_string(),
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    /// Base de los endpoints de acopiadores
    pub fn acopiadores_url(&self) -> String {
        format!("{}/api/acopiadores", self.backend_url().trim_end_matches('/'))
    }

    /// Base de los endpoints de datos fiscales / CSF
    pub fn datos_fiscales_url(&self) -> String {
        format!("{}/api/datosfiscales", self.backend_url().trim_end_matches('/'))
    }

    /// Script de Google Maps JS (con la librería places)
    pub fn google_maps_script_url(&self) -> String {
        format!(
            "https://maps.googleapis.com/maps/api/js?key={}&libraries=places",
            self.google_maps_api_key
        )
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_environment() {
        let mut config = AppConfig::default();
        config.backend_url_development = "http://dev:3000/".to_string();
        config.backend_url_production = "https://api.aup.mx".to_string();
        assert_eq!(config.acopiadores_url(), "http://dev:3000/api/acopiadores");

        config.environment = "production".to_string();
        assert_eq!(config.datos_fiscales_url(), "https://api.aup.mx/api/datosfiscales");
    }
}
