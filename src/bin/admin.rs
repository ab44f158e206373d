//! CLI administration tool for the bookmarks service.
//!
//! Provides commands for managing users, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List registered users
//! cargo run --bin admin -- user list
//!
//! # Delete a user and all of their bookmarks
//! cargo run --bin admin -- user delete alice@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use bookmarks_api::domain::repositories::UserRepository;
use bookmarks_api::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the bookmarks service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Delete a user and their bookmarks
    Delete {
        /// Email address of the user
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::List => list_users(&repo).await,
        UserAction::Delete { email, yes } => delete_user(&repo, &email, yes).await,
    }
}

/// Lists all users, oldest first.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID    Email                                    Registered
///   ──────────────────────────────────────────────────────────────────
///   1     alice@example.com                        2024-01-15 10:30
/// ```
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<40} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Registered".bright_white().bold()
    );
    println!("  {}", "─".repeat(66).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<40} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a user by email after confirmation (default: No).
///
/// Bookmarks owned by the user are removed by the `ON DELETE CASCADE` foreign key.
async fn delete_user(repo: &PgUserRepository, email: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete User".bright_blue().bold());
    println!();

    let email = email.trim().to_lowercase();

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    println!("  Email: {}", user.email.cyan());
    println!("  ID:    {}", user.id.to_string().bright_black());
    println!();
    println!(
        "{}",
        "⚠️  All bookmarks of this user will be deleted as well."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this user?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete user: {}", e))?;

    if deleted {
        println!("{}", "✅ User deleted".green().bold());
    } else {
        println!("{}", "⚠️  User was already removed".yellow());
    }
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of users
/// - Total number of bookmarks
/// - Sum of all visit counters
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let (bookmarks_count, total_visits): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(visits), 0)::BIGINT FROM bookmarks")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:        {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Bookmarks:    {}",
        bookmarks_count.to_string().bright_green().bold()
    );
    println!(
        "  Total visits: {}",
        total_visits.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migration: Option<i64> =
                sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(None);

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Migration:  {}",
                migration
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "none applied".to_string())
                    .bright_white()
            );
            println!();
        }
    }

    Ok(())
}
