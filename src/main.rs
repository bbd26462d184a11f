use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use setlog::config::{ClientConfig, ServerConfig};
use setlog::dates::{self, SystemClock};
use setlog::{db, migrations, routes, ApiClient, NewSet};

#[derive(Parser)]
#[command(name = "setlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log workout sets against a setlog backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides SETLOG_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the backend API server
    Serve,

    /// List exercises
    Exercises,

    /// List the sets logged for an exercise
    Sets {
        exercise_id: i64,
    },

    /// Log a new set
    Log {
        #[arg(short, long)]
        exercise: i64,
        #[arg(short, long)]
        weight: f64,
        #[arg(short, long)]
        reps: u32,
        #[arg(short, long)]
        user: i64,
        /// When the set was done (default: now). Local time unless an offset is given
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Change the weight or reps of a logged set
    Update {
        set_id: i64,
        /// Exercise the set belongs to
        #[arg(short, long)]
        exercise: i64,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        reps: Option<u32>,
    },

    /// Delete a logged set
    Delete {
        set_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setlog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let api_url = cli.api_url;

    match cli.command {
        Commands::Serve => serve(ServerConfig::from_env()?).await?,
        Commands::Exercises => {
            let client = connect(api_url)?;
            for exercise in client.read_exercises().await? {
                println!("{:>4}  {}", exercise.exercise_id, exercise.exercise_name);
            }
        }
        Commands::Sets { exercise_id } => {
            let client = connect(api_url)?;
            let clock = SystemClock;
            for set in client.read_sets_by_exercise(exercise_id).await? {
                let day = set.local_date();
                let marker = if dates::is_today(&day, &clock) {
                    "  (today)"
                } else {
                    ""
                };
                println!(
                    "#{:<6} {}  {:>7.1} x {:<3} user {}{}",
                    set.set_id,
                    dates::format_date(&day),
                    set.weight,
                    set.repetitions,
                    set.user_id,
                    marker
                );
            }
        }
        Commands::Log {
            exercise,
            weight,
            reps,
            user,
            time,
        } => {
            let client = connect(api_url)?;
            let time = match time {
                Some(input) => dates::parse_date_like(&input)?
                    .and_local_timezone(Local)
                    .earliest()
                    .with_context(|| format!("{} does not exist in the local time zone", input))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let set = client
                .create_set(&NewSet::new(exercise, user, weight, reps, time))
                .await?;
            println!(
                "Logged set #{}: {} x {} on {}",
                set.set_id,
                set.weight,
                set.repetitions,
                dates::format_date(&set.local_date())
            );
        }
        Commands::Update {
            set_id,
            exercise,
            weight,
            reps,
        } => {
            let client = connect(api_url)?;
            let mut set = client
                .read_sets_by_exercise(exercise)
                .await?
                .into_iter()
                .find(|s| s.set_id == set_id)
                .with_context(|| format!("Set #{} not found for exercise {}", set_id, exercise))?;

            if let Some(weight) = weight {
                set.weight = weight;
            }
            if let Some(reps) = reps {
                set.repetitions = reps;
            }
            client.update_set(&set).await?;
            println!("Updated set #{}", set_id);
        }
        Commands::Delete { set_id } => {
            let client = connect(api_url)?;
            client.delete_set(set_id).await?;
            println!("Deleted set #{}", set_id);
        }
    }

    Ok(())
}

fn connect(api_url: Option<String>) -> anyhow::Result<ApiClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config.base_url = url;
    }
    Ok(ApiClient::new(&config)?)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    migrations::run_migrations(&pool)?;

    let app = routes::app(pool);

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
