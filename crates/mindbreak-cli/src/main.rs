use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mindbreak-cli", version, about = "Mindbreak CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select one intention activity for a context and record it
    Select {
        /// App or category bundle identifier that triggered the restriction
        context: String,
    },
    /// Preview ranked activities without recording a selection
    Recommend {
        /// App or category bundle identifier
        context: String,
        /// Number of activities to show
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Report a completed activity
    Complete {
        /// Activity identifier
        activity: String,
        /// App or category bundle identifier
        context: String,
    },
    /// Restriction schedule management and evaluation
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Preference management
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Activity catalog management
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Usage history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Select { context } => commands::select::run_select(&context),
        Commands::Recommend { context, count } => commands::select::run_recommend(&context, count),
        Commands::Complete { activity, context } => {
            commands::select::run_complete(&activity, &context)
        }
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::History { action } => commands::history::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
