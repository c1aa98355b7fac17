//! Bank statement conversion: upload a PDF/CSV statement, preview the parsed
//! rows, then commit them to the ledger.

mod converter_model;
mod converter_store;
mod converter_traits;

pub use converter_model::{
    ConversionOptions, ConversionOutcome, ConversionPreview, ConvertRequest, PasswordCheck,
    StatementFile, StatementKind,
};
pub use converter_store::{ConverterStore, CONVERSION_SUCCESS_MESSAGE};
pub use converter_traits::ConverterGatewayTrait;
