use clap::Parser;
use std::process;
use stride::cli::{Cli, Commands};
use stride::cli_handlers;
use stride::config::ServerConfig;
use stride::server;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = cli.db.as_path();

    let result = match cli.command {
        Commands::Init => cli_handlers::handle_init(db),
        Commands::Serve { addr } => {
            if let Err(e) = server::serve(ServerConfig::new(db, addr)).await {
                eprintln!("Server error: {e:#}");
                process::exit(1);
            }
            return;
        }
        Commands::Add { title, fields } => cli_handlers::handle_add(db, title, fields),
        Commands::Edit { id, title, fields } => cli_handlers::handle_edit(db, id, title, fields),
        Commands::Show { id } => cli_handlers::handle_show(db, id),
        Commands::Today => cli_handlers::handle_today(db),
        Commands::List => cli_handlers::handle_list(db),
        Commands::Schedule => cli_handlers::handle_schedule(db),
        Commands::Rm { id } => cli_handlers::handle_rm(db, id),
        Commands::Settings {
            start,
            end,
            excluded,
        } => cli_handlers::handle_settings(
            db,
            start.as_deref(),
            end.as_deref(),
            excluded.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
