use clap::Parser;
use expense_tracker::advice::{self, AdviceClient};
use expense_tracker::args::{
    Args, Command, ExpenseCommand, ExportCommand, LimitCommand, NotificationsCommand,
    ProfileCommand,
};
use expense_tracker::ocr::SimulatedScanner;
use expense_tracker::{commands, Config, Result};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expenses_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Expense(expense_command) => {
            let config = Config::load(home).await?;
            match expense_command {
                ExpenseCommand::Add(args) => commands::add_expense(&config, args).await?.print(),
                ExpenseCommand::Update(args) => {
                    commands::update_expense(&config, args).await?.print()
                }
                ExpenseCommand::Delete(args) => {
                    commands::delete_expense(&config, args).await?.print()
                }
                ExpenseCommand::Search(args) => {
                    commands::search_expenses(&config, args).await?.print()
                }
            }
        }

        Command::Limit(limit_command) => {
            let config = Config::load(home).await?;
            match limit_command {
                LimitCommand::Add(args) => commands::add_limit(&config, args).await?.print(),
                LimitCommand::Update(args) => commands::update_limit(&config, args).await?.print(),
                LimitCommand::Delete(args) => commands::delete_limit(&config, args).await?.print(),
                LimitCommand::List => commands::list_limits(&config).await?.print(),
            }
        }

        Command::Profile(profile_command) => {
            let mut config = Config::load(home).await?;
            match profile_command {
                ProfileCommand::Show => commands::show_profile(&config)?.print(),
                ProfileCommand::Update(args) => {
                    commands::update_profile(&mut config, args).await?.print()
                }
            }
        }

        Command::Dashboard => commands::dashboard(&Config::load(home).await?)
            .await?
            .print(),

        Command::Notifications(notifications_command) => {
            let config = Config::load(home).await?;
            match notifications_command {
                NotificationsCommand::List(args) => {
                    commands::list_notifications(&config, args).await?.print()
                }
                NotificationsCommand::Read(args) => {
                    commands::mark_read(&config, args).await?.print()
                }
                NotificationsCommand::ReadAll => commands::mark_all_read(&config).await?.print(),
            }
        }

        Command::Export(export_command) => {
            let config = Config::load(home).await?;
            match export_command {
                ExportCommand::Json(args) => commands::export_json(&config, args).await?.print(),
                ExportCommand::Csv(args) => commands::export_csv(&config, args).await?.print(),
            }
        }

        Command::Scan(scan_args) => {
            let config = Config::load(home).await?;
            let scanner = SimulatedScanner::new(Duration::from_millis(scan_args.delay_ms()));
            commands::scan(&config, &scanner, scan_args).await?.print()
        }

        Command::Advise(advise_args) => {
            let config = Config::load(home).await?;
            let api_key = advice::resolve_api_key(config.ai().provider, advise_args.api_key());
            let client = AdviceClient::new(
                config.ai(),
                api_key,
                Duration::from_secs(advise_args.timeout_secs()),
            )?;
            let out = commands::advise(&config, &client, &advise_args.question()).await?;
            // The reply is the point of this command, so it goes to stdout.
            println!("{}", out.message());
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
