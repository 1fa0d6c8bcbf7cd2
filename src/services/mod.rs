pub mod gateway;
pub mod api_client;
pub mod browser_host;

pub use gateway::RecordGateway;
pub use api_client::ApiClient;
pub use browser_host::{BrowserHost, Dialogs, DocumentHost, CSF_FILE_INPUT_ID};
