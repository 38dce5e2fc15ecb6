//! Maintenance CLI for the analytics engine: manual triggers, backfills and
//! quick dashboard reads against the configured database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use training_analytics::{commands, AppState};

#[derive(Parser, Debug)]
#[command(name = "training-analytics")]
#[command(about = "Recompute and inspect training analytics facts")]
#[command(version)]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Recompute one session fact and its day rollup
  RecomputeSession { session_id: String },

  /// Recompute one workout fact
  RecomputeWorkout { workout_log_id: String },

  /// Reconcile a session that may have been deleted
  RetireSession { session_id: String },

  /// Recompute the rollup for one day
  RecomputeDaily {
    #[arg(long)]
    org: String,
    #[arg(long)]
    day: String,
    #[arg(long)]
    athlete: Option<String>,
  },

  /// Recompute every day in a range, oldest first
  Backfill {
    #[arg(long)]
    org: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
  },

  /// Print the KPI summary for a range
  Kpis {
    #[arg(long)]
    org: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
  },

  /// Print the volume leaderboard for a range
  Leaderboard {
    #[arg(long)]
    org: String,
    #[arg(long)]
    from: String,
    #[arg(long)]
    to: String,
    #[arg(long)]
    limit: Option<i64>,
    #[arg(long)]
    offset: Option<i64>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "training_analytics=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let args = Args::parse();

  let state = AppState::from_env()
    .await
    .context("Failed to initialize analytics database")?;

  match args.command {
    Command::RecomputeSession { session_id } => {
      print_json(&commands::recompute_for_session(&state, &session_id).await?)?
    }
    Command::RecomputeWorkout { workout_log_id } => {
      print_json(&commands::recompute_for_workout_log(&state, &workout_log_id).await?)?
    }
    Command::RetireSession { session_id } => {
      print_json(&commands::retire_session(&state, &session_id).await?)?
    }
    Command::RecomputeDaily { org, day, athlete } => {
      let refreshed = commands::recompute_daily(&state, &org, &day, athlete.as_deref()).await?;
      info!("Refreshed {} athlete rollups for {}", refreshed, day);
    }
    Command::Backfill { org, from, to } => {
      print_json(&commands::backfill_range(&state, &org, &from, &to).await?)?
    }
    Command::Kpis { org, from, to } => {
      print_json(&commands::get_dashboard_kpis(&state, &org, &from, &to).await?)?
    }
    Command::Leaderboard { org, from, to, limit, offset } => {
      print_json(&commands::get_leaderboard(&state, &org, &from, &to, limit, offset).await?)?
    }
  }

  state.db.close().await;
  Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
