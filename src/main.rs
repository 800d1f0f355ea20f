//! carequeue CLI - Move patient visits through the clinic's department queues

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use carequeue::cli::commands::{self, handoff::HandoffArgs};
use carequeue::cli::{Cli, Commands, RecordCommand};
use carequeue::errors::to_exit_code;
use carequeue::schemas::Vitals;
use carequeue::CareQueueError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let watching = matches!(cli.command, Some(Commands::Queue { watch: true, .. }));
    let result = if watching {
        // The watch loop handles Ctrl-C itself and exits cleanly
        run(cli).await
    } else {
        tokio::select! {
            result = run(cli) => result,
            _ = tokio::signal::ctrl_c() => Err(CareQueueError::Interrupted),
        }
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> carequeue::Result<()> {
    let home = cli.home.as_deref();
    let json = cli.json;
    match cli.command {
        Some(Commands::Login { email, password }) => {
            commands::auth::login(home, json, &email, password.as_deref()).await
        }
        Some(Commands::Logout) => commands::auth::logout(home, json).await,
        Some(Commands::Stages) => commands::stages::run(json).await,
        Some(Commands::Queue { stage, page, watch }) => {
            commands::queue::run(home, json, stage, page, watch).await
        }
        Some(Commands::Show { visit }) => commands::visit::show(home, json, &visit).await,
        Some(Commands::Transitions { visit }) => {
            commands::visit::transitions(home, json, &visit).await
        }
        Some(Commands::Register { patient, notes }) => {
            commands::register::run(home, json, &patient, notes).await
        }
        Some(Commands::ClockIn { visit }) => commands::visit::clock_in(home, json, &visit).await,
        Some(Commands::Handoff {
            visit,
            to,
            staff,
            notes,
            next_action,
        }) => {
            let args = HandoffArgs {
                to,
                staff,
                notes,
                next_action,
            };
            commands::handoff::run(home, json, &visit, args).await
        }
        Some(Commands::Complete { visit, notes }) => {
            commands::handoff::complete(home, json, &visit, notes).await
        }
        Some(Commands::Reassign { visit, staff }) => {
            commands::reassign::run(home, json, &visit, &staff).await
        }
        Some(Commands::Record { record }) => match record {
            RecordCommand::Vitals {
                visit,
                bp,
                temperature,
                pulse,
                respiratory_rate,
                spo2,
                weight,
                height,
            } => {
                let vitals = Vitals {
                    blood_pressure: bp,
                    temperature,
                    pulse,
                    respiratory_rate,
                    spo2,
                    weight_kg: weight,
                    height_cm: height,
                };
                commands::record::vitals(home, json, &visit, vitals).await
            }
            RecordCommand::Diagnosis {
                visit,
                diagnosis,
                prescriptions,
                lab_orders,
                notes,
            } => {
                commands::record::diagnosis(
                    home,
                    json,
                    &visit,
                    &diagnosis,
                    &prescriptions,
                    &lab_orders,
                    notes,
                )
                .await
            }
            RecordCommand::Lab { visit, results } => {
                commands::record::lab(home, json, &visit, &results).await
            }
            RecordCommand::Dispense { visit, items } => {
                commands::record::dispense(home, json, &visit, &items).await
            }
        },
        Some(Commands::Pay {
            visit,
            amount,
            method,
            reference,
        }) => commands::pay::run(home, json, &visit, amount, method, reference).await,
        Some(Commands::Staff { stage }) => commands::staff::run(home, json, stage).await,
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
