mod auth;
mod store;

pub use auth::TokenManager;
pub use store::DataStore;
pub use store::RenameReport;
pub use store::StoreError;
pub use store::list_files;
pub use store::read_json_file;
pub use store::rename_files;
