use std::{env, path::PathBuf, sync::Arc, time::Duration};

use common::{
    auth::{IAdminAuth, PasswordAdminAuth},
    persistence::{IPostStore, MemoryPostStore},
};
use transform::{
    convert::{ConvertService, IConvertService},
    decode::LibHeifDecoder,
    transform::{init_pdfium, PdfiumPdfWrapper},
};

pub type Services = Arc<ServiceCollection>;

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub admin_password: Option<String>,
    pub max_upload_bytes: usize,
    pub request_timeout: Duration,
    pub temp_dir: PathBuf,
    pub pdfium_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: 8000,
            cors_origins: vec!["*".to_string()],
            admin_password: None,
            max_upload_bytes: 100 * 1024 * 1024,
            request_timeout: Duration::from_secs(59),
            temp_dir: env::temp_dir(),
            pdfium_path: "./".to_string(),
        }
    }
}

pub struct ServiceCollection {
    pub convert_service: Arc<dyn IConvertService>,
    pub post_store: Arc<dyn IPostStore>,
    pub admin_auth: Arc<dyn IAdminAuth>,
}

impl ServiceCollection {
    pub fn build(settings: &Settings) -> Result<Services, &'static str> {
        let pdfium = init_pdfium(&settings.pdfium_path)?;
        let convert_service = Arc::new(ConvertService::new(
            Arc::new(LibHeifDecoder),
            Arc::new(PdfiumPdfWrapper { pdfium }),
            settings.temp_dir.clone(),
        ));
        Ok(Arc::new(ServiceCollection {
            convert_service,
            post_store: Arc::new(MemoryPostStore::new()),
            admin_auth: Arc::new(PasswordAdminAuth::new(settings.admin_password.clone())),
        }))
    }
}
