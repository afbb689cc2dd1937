pub mod file;
pub mod persist;
pub mod traits;

pub use file::FileDietRepository;
pub use persist::{log_error_hook, ErrorHook, PersistWorker};
pub use traits::DietRepository;
