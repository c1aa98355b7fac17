use log::{debug, info};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::converter_model::{
    ConversionOptions, ConversionOutcome, ConversionPreview, ConvertRequest, StatementFile,
};
use super::converter_traits::ConverterGatewayTrait;
use crate::errors::{Error, Result};
use crate::state::{or_default, read_lock, write_lock, RequestSequence, StatusCell, StoreStatus};

pub const CONVERSION_SUCCESS_MESSAGE: &str = "Conversion & DB Sync successful!";

#[derive(Default)]
struct ConverterState {
    file: Option<StatementFile>,
    preview: Option<ConversionPreview>,
    success_message: Option<String>,
    password_protected: bool,
}

/// Upload workflow of the converter page: pick a file, preview, confirm.
pub struct ConverterStore {
    gateway: Arc<dyn ConverterGatewayTrait>,
    state: RwLock<ConverterState>,
    status: StatusCell,
    /// Previews and password checks answer for the file selected when they
    /// were issued; selecting another file invalidates them.
    runs: RequestSequence,
    mutations: Mutex<()>,
}

impl ConverterStore {
    pub fn new(gateway: Arc<dyn ConverterGatewayTrait>) -> Self {
        Self {
            gateway,
            state: RwLock::new(ConverterState::default()),
            status: StatusCell::default(),
            runs: RequestSequence::default(),
            mutations: Mutex::new(()),
        }
    }

    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    pub fn file(&self) -> Option<StatementFile> {
        read_lock(&self.state).file.clone()
    }

    pub fn preview(&self) -> Option<ConversionPreview> {
        read_lock(&self.state).preview.clone()
    }

    pub fn success_message(&self) -> Option<String> {
        read_lock(&self.state).success_message.clone()
    }

    pub fn is_password_protected(&self) -> bool {
        read_lock(&self.state).password_protected
    }

    /// Replaces the selected file and forgets the previous run.
    pub fn set_file(&self, file: StatementFile) {
        let mut state = write_lock(&self.state);
        state.file = Some(file);
        state.preview = None;
        state.success_message = None;
        state.password_protected = false;
        drop(state);
        self.runs.issue();
        self.status.clear_error();
    }

    fn request(&self, options: ConversionOptions, preview: bool) -> Result<ConvertRequest> {
        let file = read_lock(&self.state)
            .file
            .clone()
            .ok_or_else(|| Error::invalid_input("No file selected"))?;
        let request = ConvertRequest {
            file,
            options,
            preview,
        };
        request.validate()?;
        Ok(request)
    }

    /// Parses the selected file without committing it.
    pub async fn upload_file(&self, options: ConversionOptions) -> Result<ConversionOutcome> {
        const FAILED: &str = "Failed to convert statement";
        let _loading = self.status.begin();
        self.status.clear_error();
        let request = self
            .request(options, true)
            .map_err(|e| self.status.fail(e, FAILED))?;
        let token = self.runs.issue();
        let outcome = self.gateway.convert(&request).await.map_err(|e| {
            if self.runs.is_latest(token) {
                self.status.fail(e, FAILED)
            } else {
                e
            }
        })?;
        if let ConversionOutcome::Preview(preview) = &outcome {
            debug!("Preview parsed {} rows ({})", preview.data.len(), preview.bank_type);
            if self.runs.is_latest(token) {
                write_lock(&self.state).preview = Some(preview.clone());
            }
        }
        Ok(outcome)
    }

    /// Asks the backend whether the selected PDF needs a password. Any
    /// failure counts as "not protected".
    pub async fn check_password(&self) -> bool {
        let Some(file) = self.file() else {
            return false;
        };
        let _loading = self.status.begin();
        let token = self.runs.issue();
        let check = or_default(
            self.gateway.check_password(&file).await,
            Default::default(),
            "Password check failed",
        );
        if self.runs.is_latest(token) {
            write_lock(&self.state).password_protected = check.password_protected;
        }
        check.password_protected
    }

    /// Runs the conversion for real, writing the rows to the ledger.
    pub async fn confirm_save(&self, options: ConversionOptions) -> Result<ConversionOutcome> {
        const FAILED: &str = "Failed to save statement";
        let _guard = self.mutations.lock().await;
        let _loading = self.status.begin();
        self.status.clear_error();
        let request = self
            .request(options, false)
            .map_err(|e| self.status.fail(e, FAILED))?;
        let outcome = self
            .gateway
            .convert(&request)
            .await
            .map_err(|e| self.status.fail(e, FAILED))?;
        info!("Statement {} synced", request.file.file_name);
        write_lock(&self.state).success_message = Some(CONVERSION_SUCCESS_MESSAGE.to_string());
        Ok(outcome)
    }
}
