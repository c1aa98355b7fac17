use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use ledgerdesk_core::converter::{
    ConversionOutcome, ConversionPreview, ConvertRequest, ConverterGatewayTrait, PasswordCheck,
    StatementFile, StatementKind,
};
use ledgerdesk_core::errors::{Error, Result};

use crate::client::ApiClient;

/// Multipart field carrying the statement, whatever its type.
const FILE_FIELD: &str = "pdf_file";

fn file_part(file: &StatementFile) -> Result<Part> {
    let mime = match file.kind() {
        Some(StatementKind::Csv) => "text/csv",
        _ => "application/pdf",
    };
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(mime)
        .map_err(|e| Error::Unexpected(format!("Invalid statement part: {}", e)))
}

fn convert_form(request: &ConvertRequest) -> Result<Form> {
    let options = &request.options;
    let mut form = Form::new()
        .part(FILE_FIELD, file_part(&request.file)?)
        .text("bank_type", options.bank_code.clone())
        .text("output_format", options.output_format.as_str())
        .text("preview", if request.preview { "true" } else { "false" });
    if let Some(company_id) = &options.company_id {
        form = form.text("company_id", company_id.clone());
    }
    if let Some(password) = options.password.as_ref().filter(|p| !p.is_empty()) {
        form = form.text("password", password.clone());
    }
    if let Some(year) = options.statement_year {
        form = form.text("statement_year", year.to_string());
    }
    Ok(form)
}

#[async_trait]
impl ConverterGatewayTrait for ApiClient {
    /// A preview run answers JSON; a committed run streams the spreadsheet.
    async fn convert(&self, request: &ConvertRequest) -> Result<ConversionOutcome> {
        let form = convert_form(request)?;
        let response = self
            .send(self.request(Method::POST, "/convert", &[]).multipart(form))
            .await?;
        if ApiClient::is_json(&response) {
            let preview: ConversionPreview = ApiClient::json_body(response).await?;
            Ok(ConversionOutcome::Preview(preview))
        } else {
            Ok(ConversionOutcome::File(ApiClient::blob_body(response).await?))
        }
    }

    async fn check_password(&self, file: &StatementFile) -> Result<PasswordCheck> {
        let form = Form::new().part(FILE_FIELD, file_part(file)?);
        let response = self
            .send(self.request(Method::POST, "/check-password", &[]).multipart(form))
            .await?;
        ApiClient::json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_core::converter::ConversionOptions;

    #[test]
    fn test_csv_part_gets_csv_mime() {
        let file = StatementFile::new("mutasi.CSV", b"a,b".to_vec());
        assert!(file_part(&file).is_ok());
    }

    #[test]
    fn test_convert_form_builds_with_all_options() {
        let request = ConvertRequest {
            file: StatementFile::new("jan.pdf", vec![1, 2, 3]),
            options: ConversionOptions {
                company_id: Some("3".into()),
                password: Some("secret".into()),
                statement_year: Some(2024),
                ..Default::default()
            },
            preview: false,
        };
        let form = convert_form(&request).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
