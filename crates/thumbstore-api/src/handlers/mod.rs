pub mod dispatch;
pub mod file_download;
pub mod file_upload;

pub use dispatch::dispatch;
