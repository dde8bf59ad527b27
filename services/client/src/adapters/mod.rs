pub mod console;
pub mod http_api;
pub mod session_file;

pub use console::{ConsoleConfirm, ConsoleNavigator, ConsoleNotifier};
pub use http_api::HttpRepositoryApi;
pub use session_file::FileSessionStorage;
