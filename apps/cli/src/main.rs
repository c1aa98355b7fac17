mod cli;
mod config;
mod fmt;
mod main_lib;

use clap::Parser;
use ledgerdesk_core::converter::ConversionOptions;

use cli::convert::ConvertArgs;
use cli::{Cli, Commands, ReportCommands, TransactionCommands};
use config::Config;
use main_lib::{init_tracing, open_session};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config);

    if let Err(e) = run(cli, &config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let sort = match &cli.command {
        Commands::Transactions {
            command: TransactionCommands::List { sort, .. },
        } => sort.to_sort(),
        _ => None,
    };
    let session = open_session(config, sort)?;

    match cli.command {
        Commands::Transactions { command } => match command {
            TransactionCommands::List { filters, page, .. } => {
                cli::transactions::list(&session, &filters, page).await
            }
            TransactionCommands::BulkMark { mark, filters } => {
                cli::transactions::bulk_mark(&session, &mark, &filters).await
            }
            TransactionCommands::BulkCompany { target, filters } => {
                cli::transactions::bulk_company(&session, &target, &filters).await
            }
            TransactionCommands::BulkDelete { filters, yes } => {
                cli::transactions::bulk_delete(&session, &filters, yes).await
            }
            TransactionCommands::Notes { id, notes } => {
                cli::transactions::notes(&session, &id, &notes).await
            }
            TransactionCommands::Export {
                filters,
                format,
                out,
            } => {
                let out = out.unwrap_or_else(|| config.export_dir.clone());
                cli::transactions::export(&session, &filters, format.into(), out).await
            }
            TransactionCommands::Sources => cli::transactions::sources(&session).await,
            TransactionCommands::DeleteSource {
                source_file,
                bank,
                company,
                yes,
            } => cli::transactions::delete_source(&session, source_file, bank, company, yes).await,
        },
        Commands::Report { command } => match command {
            ReportCommands::Income(period) => cli::reports::income(&session, &period).await,
            ReportCommands::Balance { as_of, company } => {
                cli::reports::balance(&session, as_of.as_deref(), company.as_deref()).await
            }
            ReportCommands::Cashflow(period) => cli::reports::cash_flow(&session, &period).await,
            ReportCommands::Payroll(period) => cli::reports::payroll(&session, &period).await,
            ReportCommands::Revenue { year, company } => {
                cli::reports::revenue(&session, &year, company.as_deref()).await
            }
            ReportCommands::Years { company } => {
                cli::reports::years(&session, company.as_deref()).await
            }
            ReportCommands::All => cli::reports::all(&session).await,
            ReportCommands::Export {
                report_type,
                period,
                format,
                out,
            } => {
                let out = out.unwrap_or_else(|| config.export_dir.clone());
                cli::reports::export(&session, &report_type, &period, format.into(), out).await
            }
        },
        Commands::Convert {
            file,
            bank,
            company,
            password,
            year,
            format,
            commit,
        } => {
            let args = ConvertArgs {
                file,
                options: ConversionOptions {
                    bank_code: bank,
                    company_id: company,
                    password,
                    statement_year: year,
                    output_format: format.into(),
                },
                commit,
            };
            cli::convert::run(&session, args, &config.export_dir).await
        }
        Commands::Companies => cli::lookups::companies(&session).await,
        Commands::Marks => cli::lookups::marks(&session).await,
        Commands::Coa => cli::lookups::coa(&session).await,
        Commands::Open { path } => cli::open::run(&session, &path).await,
    }
}
