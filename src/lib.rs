pub mod cli;
pub mod config;
pub mod error;
pub mod toast;

pub use config::ToasterConfig;
pub use error::{ToasterError, ToasterResult};
pub use toast::{ToastHandle, ToastPatch, ToastPayload, Toaster};
