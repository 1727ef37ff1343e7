use cashflow::api::{Cli, Command, run_http_server, run_projection_command};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => {
            if let Err(e) = run_http_server(args.socket_addr()).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Project(args) => match run_projection_command(&args) {
            Ok(output) => print!("{output}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}
