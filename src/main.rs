//! Campus records CLI - login check and ad-hoc stored-procedure calls
//! against the records database.

use campus_records::actions::auth;
use campus_records::db::{ProcedureRegistry, SpInvoker, TiberiusProvider};
use campus_records::{Config, Session, SpParam};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Parser)]
#[command(name = "campus-records", version, about = "Campus records data-access client")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify credentials against the server and print the assigned role
    /// and clearance.
    Login {
        username: String,
        password: String,
    },
    /// Invoke a stored procedure and print the result as JSON.
    Call {
        /// Procedure name, e.g. sp_Get_PublicCourses.
        procedure: String,
        /// Positional arguments; integers and floats are bound numerically,
        /// the literal `null` binds NULL, everything else binds as text.
        args: Vec<String>,
        /// Run inside a transaction and print the affected-row count
        /// instead of rows.
        #[arg(long)]
        non_query: bool,
    },
}

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

fn parse_arg(raw: &str) -> SpParam {
    if raw.eq_ignore_ascii_case("null") {
        return SpParam::Null;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return SpParam::Int(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return SpParam::Float(v);
    }
    SpParam::text(raw)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.config);

    let client_config = cli.config.to_client_config()?;
    let invoker = SpInvoker::with_registry(
        TiberiusProvider::new(client_config),
        ProcedureRegistry::builtin(),
    );

    match cli.command {
        Command::Login { username, password } => {
            let mut session = Session::new();
            match auth::login(&invoker, &mut session, &username, &password).await? {
                Some(outcome) => {
                    println!(
                        "Logged in as {} ({}, clearance {})",
                        outcome.username, outcome.role, outcome.clearance
                    );
                }
                None => {
                    eprintln!("Invalid username or password");
                    std::process::exit(1);
                }
            }
        }
        Command::Call {
            procedure,
            args,
            non_query,
        } => {
            let params: Vec<SpParam> = args.iter().map(|a| parse_arg(a)).collect();

            if non_query {
                match invoker.call_non_query(&procedure, &params).await {
                    Ok(affected) => println!("{affected} row(s) affected"),
                    Err(e) => {
                        error!(procedure = %procedure, error = %e, "Non-query failed");
                        println!("{}", serde_json::to_string_pretty(&e.report())?);
                        std::process::exit(1);
                    }
                }
            } else {
                match invoker.call_rows(&procedure, &params).await {
                    Ok(rows) => println!("{}", serde_json::to_string_pretty(&rows)?),
                    Err(e) => {
                        error!(procedure = %procedure, error = %e, "Query failed");
                        println!("{}", serde_json::to_string_pretty(&e.report())?);
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}
