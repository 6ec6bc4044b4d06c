//! dashboard-cli - terminal frontend for the chessevo analysis service.
//!
//! Thin shell over the dashboard controller: parses a subcommand, drives
//! the controller or the client, prints plain text. All state and policy
//! live in `dashboard_cli::Dashboard` and `analysis_client`.

use analysis_client::{
    Analysis, AnalysisClient, AnalysisService, ClientConfig, GameMode, SessionStore,
};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dashboard_cli::{view_details_enabled, Dashboard, StatusBadge};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(
    name = "dashboard-cli",
    about = "Track chess evolution analyses from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and start a session.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and clear the stored session.
    Logout,
    /// Show the account profile.
    Profile,
    /// Show the dashboard: summary counts plus all analyses.
    Dashboard,
    /// Start a new analysis. This is a billed operation.
    Create {
        /// The player's handle on the chess platform.
        #[arg(long)]
        chess_username: String,
        /// Consider opponents up to this date (YYYY-MM-DD).
        #[arg(long)]
        end_date: String,
        /// One of: rapid, blitz, bullet, daily.
        #[arg(long, default_value = "rapid")]
        game_mode: String,
    },
    /// Poll the status of one analysis.
    Status { id: Uuid },
    /// Show one analysis in full.
    Show { id: Uuid },
    /// Show the opponent-rating breakdown of an analysis.
    Opponents { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    let session = match &config.session_path {
        Some(path) => SessionStore::at_path(path.clone()),
        None => SessionStore::open_default(),
    };
    let client = AnalysisClient::new(&config, session)?.with_session_expired_hook(Arc::new(|| {
        eprintln!("Session expired. Please log in again with `dashboard-cli login`.");
    }));

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let user = client.register(&username, &email, &password).await?;
            println!("Account created. Logged in as {}.", user.username);
        }
        Commands::Login { username, password } => {
            let user = client.login(&username, &password).await?;
            println!("Logged in as {}.", user.username);
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out.");
        }
        Commands::Profile => {
            let profile = client.get_profile().await?;
            println!("{}", profile.username);
            if let Some(email) = &profile.email {
                println!("  email: {email}");
            }
            println!("  total analyses: {}", profile.total_analyses);
        }
        Commands::Dashboard => {
            let username = client.session().user().map(|u| u.username);
            let mut dashboard = Dashboard::new(client);
            dashboard.load().await;
            render_dashboard(&dashboard, username.as_deref());
        }
        Commands::Create {
            chess_username,
            end_date,
            game_mode,
        } => {
            let game_mode: GameMode = game_mode.parse().map_err(anyhow::Error::msg)?;
            let mut dashboard = Dashboard::new(client);
            dashboard.open_create_dialog();
            let form = dashboard.form_mut();
            form.chess_username = chess_username;
            form.end_date = end_date;
            form.game_mode = game_mode;
            if !dashboard.can_submit() {
                bail!("both --chess-username and --end-date are required");
            }
            dashboard.submit_create().await;
            if let Some(err) = dashboard.error() {
                bail!("{err}");
            }
            let created = dashboard
                .analyses()
                .first()
                .context("create reported success but returned no analysis")?;
            println!("Analysis {} created ({}).", created.id, created.status);
        }
        Commands::Status { id } => {
            let info = client.get_analysis_status(id).await?;
            println!("{}: {}", info.id, info.status);
            if let Some(progress) = info.progress {
                println!("  progress: {progress}%");
            }
            if let Some(msg) = &info.error_message {
                println!("  error: {msg}");
            }
        }
        Commands::Show { id } => {
            let analysis = client.get_analysis(id).await?;
            print_analysis(&analysis);
        }
        Commands::Opponents { id } => {
            let report = client.get_opponent_ratings(id).await?;
            println!("{} opponents compared", report.total_opponents);
            if let (Some(position), Some(percentile)) = (report.user_position, report.percentile) {
                println!("  your position: {position} (percentile {percentile:.1})");
            }
            for opponent in &report.opponents {
                println!(
                    "  {:<24} {}",
                    opponent.opponent_username, opponent.current_rating
                );
            }
        }
    }

    Ok(())
}

fn render_dashboard<S: AnalysisService>(dashboard: &Dashboard<S>, username: Option<&str>) {
    if let Some(name) = username {
        println!("Welcome back, {name}!");
    }
    println!(
        "Completed: {}   Processing: {}   Shown: {}",
        dashboard.completed_count(),
        dashboard.processing_count(),
        dashboard.analyses().len()
    );
    if let Some(err) = dashboard.error() {
        println!("! {err}");
    }
    if dashboard.analyses().is_empty() {
        println!("No analyses yet. Create your first with `dashboard-cli create`.");
        return;
    }
    println!();
    for analysis in dashboard.analyses() {
        print_row(analysis);
    }
}

fn print_row(analysis: &Analysis) {
    let badge = badge_marker(StatusBadge::from(analysis.status));
    let mut line = format!(
        "{badge} {:<20} {:<7} until {}  {}",
        analysis.chess_username,
        analysis.game_mode.label(),
        analysis.end_date,
        analysis.status,
    );
    if let Some(ranking) = analysis.ranking() {
        line.push_str(&format!(
            "  position {}/{} (percentile {:.1})",
            ranking.position, ranking.total_opponents, ranking.percentile
        ));
    }
    println!("{line}");
    if view_details_enabled(analysis) {
        println!("    details: dashboard-cli show {}", analysis.id);
    }
}

fn print_analysis(analysis: &Analysis) {
    println!("{}", analysis.id);
    println!("  player:     {}", analysis.chess_username);
    println!("  mode:       {}", analysis.game_mode.label());
    println!("  until:      {}", analysis.end_date);
    println!("  status:     {}", analysis.status);
    if let Some(rating) = analysis.user_current_rating {
        println!("  rating:     {rating}");
    }
    if let Some(ranking) = analysis.ranking() {
        println!(
            "  position:   {} of {}",
            ranking.position, ranking.total_opponents
        );
        println!("  percentile: {:.1}", ranking.percentile);
    }
    if let Some(msg) = &analysis.error_message {
        println!("  error:      {msg}");
    }
    if let Some(done) = analysis.completed_at {
        println!("  completed:  {done}");
    }
}

fn badge_marker(badge: StatusBadge) -> &'static str {
    match badge {
        StatusBadge::Success => "+",
        StatusBadge::InProgress => "~",
        StatusBadge::Attention => "!",
        StatusBadge::Neutral => "-",
    }
}
