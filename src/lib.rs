pub mod cli;
pub mod cloudinary;
pub mod config;
pub mod error;
pub mod exclude;
pub mod logging;
pub mod remote;
pub mod upload;
pub mod util;

pub use error::UploadError;
