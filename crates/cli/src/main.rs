use anyhow::Context;
use clap::{Parser, Subcommand};
use shelfie_kernel::{settings::Settings, Rfc3339Time};

#[derive(Parser)]
#[command(name = "shelfie-cli")]
#[command(about = "Shelfie configuration and timestamp tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active environment and database endpoint
    Config,

    /// Print the current UTC time in canonical RFC 3339 form
    Now,

    /// Parse an RFC 3339 UTC timestamp and print it in canonical form
    Parse {
        /// Timestamp such as 2024-03-05T14:09:02.123Z
        text: String,
    },

    /// Compare two timestamps; prints before, after, or equal
    Compare { a: String, b: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            let settings = Settings::load().with_context(|| "failed to load Shelfie settings")?;
            println!("environment: {}", settings.environment.as_str());
            println!("database: {}", settings.current_database().endpoint);
            println!("max_page_size: {}", settings.max_page_size);
        }
        Commands::Now => println!("{}", Rfc3339Time::now()),
        Commands::Parse { text } => {
            let parsed = Rfc3339Time::parse(&text)?;
            println!("{parsed}");
        }
        Commands::Compare { a, b } => {
            let a = Rfc3339Time::parse(&a).context("invalid first timestamp")?;
            let b = Rfc3339Time::parse(&b).context("invalid second timestamp")?;
            let verdict = if a.is_before(&b) {
                "before"
            } else if a.is_after(&b) {
                "after"
            } else {
                "equal"
            };
            println!("{verdict}");
        }
    }

    Ok(())
}
