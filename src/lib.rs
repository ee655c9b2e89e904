pub mod config;
pub mod document;
pub mod documents;
pub mod history;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use config::{read_settings, write_settings, Settings, SettingsError};
pub use document::Doc;
pub use documents::{find_documents, Documents, DocumentsError, FilesystemDocument};
pub use history::{
    history_from_documents, read_history, write_history, HistoryEntry, HistoryError,
    PublishHistory,
};
pub use server::{
    service_url_from_connection_file, RestServiceCatalog, ServerError, ServiceCatalog, ServiceRef,
};
