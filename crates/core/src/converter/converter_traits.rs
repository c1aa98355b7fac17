use async_trait::async_trait;

use super::converter_model::{ConversionOutcome, ConvertRequest, PasswordCheck, StatementFile};
use crate::errors::Result;

/// Remote calls for statement conversion. Both are multipart uploads.
#[async_trait]
pub trait ConverterGatewayTrait: Send + Sync {
    async fn convert(&self, request: &ConvertRequest) -> Result<ConversionOutcome>;
    async fn check_password(&self, file: &StatementFile) -> Result<PasswordCheck>;
}
