use std::path::{Path, PathBuf};

use ledgerdesk_core::converter::{ConversionOptions, ConversionOutcome, StatementFile};
use ledgerdesk_core::exports::{ExportFormat, ExportedFile};
use ledgerdesk_core::utils::time_utils::today;
use ledgerdesk_core::Session;

use crate::fmt::payload;

pub struct ConvertArgs {
    pub file: PathBuf,
    pub options: ConversionOptions,
    pub commit: bool,
}

async fn read_statement(path: &Path) -> anyhow::Result<StatementFile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;
    Ok(StatementFile::new(file_name, bytes))
}

/// Previews the statement, or with `commit` writes it to the ledger and
/// saves the converted spreadsheet.
pub async fn run(session: &Session, args: ConvertArgs, out: &Path) -> anyhow::Result<()> {
    let converter = session.converter();
    converter.set_file(read_statement(&args.file).await?);

    if args.options.password.is_none() && converter.check_password().await {
        anyhow::bail!("{} is password protected; pass --password", args.file.display());
    }

    let format: ExportFormat = args.options.output_format;
    let outcome = if args.commit {
        converter.confirm_save(args.options).await?
    } else {
        converter.upload_file(args.options).await?
    };

    match outcome {
        ConversionOutcome::Preview(preview) => {
            println!("{} rows ({})", preview.data.len(), preview.bank_type);
            for row in &preview.data {
                println!("{}", payload(row));
            }
        }
        ConversionOutcome::File(blob) => {
            let file = ExportedFile::from_blob("converted", format, blob, today());
            let path = file.save_to(out).await?;
            println!("Wrote {}", path.display());
        }
    }
    if let Some(message) = converter.success_message() {
        println!("{message}");
    }
    Ok(())
}
