//! CLI administration tool for shortlink.
//!
//! Provides commands for managing users, session tokens, and links,
//! plus quick statistics and database checks, without requiring HTTP
//! API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user
//! cargo run --bin admin -- user create --name alice
//!
//! # Issue a session token for a user (valid 7 days by default)
//! cargo run --bin admin -- session create --user alice --days 14
//!
//! # Create a short link (alias auto-generated when omitted)
//! cargo run --bin admin -- link create --user alice --url https://example.com/page
//!
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `SESSION_SIGNING_SECRET` (required for `session create`)
//! - `BASE_URL` (optional): used to print full short URLs

use shortlink::application::services::auth::hash_session_token;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;

/// CLI tool for managing shortlink.
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

    /// Manage session tokens
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
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
    /// Create a new user
    Create {
        /// User name (unique)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List all users
    List,
}

/// Session management subcommands.
#[derive(Subcommand)]
enum SessionAction {
    /// Issue a new session token for a user
    Create {
        /// User name to issue the session for
        #[arg(short, long)]
        user: String,

        /// Session lifetime in days
        #[arg(short, long, default_value_t = 7)]
        days: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Owning user name
        #[arg(short, long)]
        user: String,

        /// Destination URL
        #[arg(long)]
        url: String,

        /// Custom alias (auto-generated if not provided)
        #[arg(short, long)]
        alias: Option<String>,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Forward the incoming query string to the destination
        #[arg(long)]
        forward_params: bool,

        /// Maximum number of visits (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_visits: i64,

        /// Expiry in days from now (omit for no expiry)
        #[arg(long)]
        expires_days: Option<i64>,
    },

    /// List links for a user
    List {
        /// Owning user name
        #[arg(short, long)]
        user: String,
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
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Session { action } => handle_session_action(action, &pool).await?,
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    match action {
        UserAction::Create { name } => create_user(pool, name).await?,
        UserAction::List => list_users(pool).await?,
    }

    Ok(())
}

async fn create_user(pool: &PgPool, name: Option<String>) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let user_name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("User name").interact_text()?,
    };

    let user_id: i64 =
        sqlx::query_scalar("INSERT INTO users (name) VALUES ($1) RETURNING id")
            .bind(&user_name)
            .fetch_one(pool)
            .await
            .context("Failed to create user (name already taken?)")?;

    println!();
    println!("{}", "✅ User created!".green().bold());
    println!("  ID:   {}", user_id.to_string().bright_black());
    println!("  Name: {}", user_name.cyan());
    println!();

    Ok(())
}

async fn list_users(pool: &PgPool) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users: Vec<(i64, String)> =
        sqlx::query_as("SELECT id, name FROM users ORDER BY id")
            .fetch_all(pool)
            .await?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    for (id, name) in &users {
        println!("  {:<4} {}", id.to_string().bright_black(), name.cyan());
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Dispatches session management commands.
async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    match action {
        SessionAction::Create { user, days, yes } => {
            create_session(pool, user, days, yes).await?;
        }
    }

    Ok(())
}

/// Issues a session token for a user.
///
/// # Flow
///
/// 1. Look up the user by name
/// 2. Generate a random token
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Store the HMAC-SHA256 hash of the token
/// 5. Display the raw token once
///
/// # Security
///
/// - Only the keyed hash is stored in the database
/// - Raw token is displayed once and cannot be retrieved later
async fn create_session(pool: &PgPool, user: String, days: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔑 Create Session".bright_blue().bold());
    println!();

    if days < 1 {
        anyhow::bail!("--days must be at least 1");
    }

    let secret = std::env::var("SESSION_SIGNING_SECRET")
        .context("SESSION_SIGNING_SECRET must be set")?;

    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE name = $1")
        .bind(&user)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("User '{user}' not found"))?;

    let token = generate_token();
    let expires_at = Utc::now() + Duration::days(days);

    println!("  User:    {}", user.cyan());
    println!("  Token:   {}", token.bright_yellow().bold());
    println!(
        "  Expires: {}",
        expires_at.format("%Y-%m-%d %H:%M UTC").to_string().bright_black()
    );
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this session?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_session_token(&secret, &token);

    sqlx::query(
        "INSERT INTO auth_sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(&token_hash)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    println!();
    println!("{}", "✅ Session created!".green().bold());
    println!();
    println!("{}", "Send it as a cookie:".bright_white());
    println!(
        "  curl -H \"Cookie: shortlink_session={}\" {}/stats/my-alias",
        token.bright_yellow(),
        base_url()
    );
    println!();

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    match action {
        LinkAction::Create {
            user,
            url,
            alias,
            description,
            forward_params,
            max_visits,
            expires_days,
        } => {
            create_link(
                pool,
                user,
                url,
                alias,
                description,
                forward_params,
                max_visits,
                expires_days,
            )
            .await?;
        }
        LinkAction::List { user } => list_links(pool, &user).await?,
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn create_link(
    pool: &PgPool,
    user: String,
    url: String,
    alias: Option<String>,
    description: Option<String>,
    forward_params: bool,
    max_visits: i64,
    expires_days: Option<i64>,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("Destination URL must start with http:// or https://");
    }

    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE name = $1")
        .bind(&user)
        .fetch_optional(pool)
        .await?
        .with_context(|| format!("User '{user}' not found"))?;

    let expires_at = expires_days.map(|d| Utc::now() + Duration::days(d));

    // Custom alias inserts once; generated aliases get a bounded number of
    // collision retries before giving up.
    let attempts = if alias.is_some() { 1 } else { 5 };
    let mut created: Option<(i64, String)> = None;

    for _ in 0..attempts {
        let candidate = alias.clone().unwrap_or_else(generate_alias);

        let inserted: Option<i64> = sqlx::query_scalar(
            "INSERT INTO short_links \
                 (user_id, alias, destination_url, description, forward_params, max_visits, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (alias) DO NOTHING \
             RETURNING id",
        )
        .bind(user_id)
        .bind(&candidate)
        .bind(&url)
        .bind(&description)
        .bind(forward_params)
        .bind(max_visits)
        .bind(expires_at)
        .fetch_optional(pool)
        .await?;

        if let Some(id) = inserted {
            created = Some((id, candidate));
            break;
        }
    }

    let Some((id, final_alias)) = created else {
        anyhow::bail!("Alias already taken (or generation kept colliding); try again");
    };

    println!("{}", "✅ Link created!".green().bold());
    println!("  ID:        {}", id.to_string().bright_black());
    println!("  Alias:     {}", final_alias.cyan());
    println!("  Short URL: {}", format!("{}/s/{}", base_url(), final_alias).bright_yellow());
    println!("  Target:    {}", url.bright_white());
    println!();

    Ok(())
}

async fn list_links(pool: &PgPool, user: &str) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links: Vec<(i64, String, String, i64)> = sqlx::query_as(
        "SELECT l.id, l.alias, l.destination_url, l.visit_count \
         FROM short_links l JOIN users u ON u.id = l.user_id \
         WHERE u.name = $1 ORDER BY l.id",
    )
    .bind(user)
    .fetch_all(pool)
    .await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<10} {}",
        "ID".bright_white().bold(),
        "Alias".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (id, alias, destination, visits) in &links {
        println!(
            "  {:<4} {:<20} {:<10} {}",
            id.to_string().bright_black(),
            alias.cyan(),
            visits.to_string().bright_green(),
            destination.bright_black()
        );
    }

    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of users, links, and recorded visits
/// - Number of active (unexpired) sessions
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let visits_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_link_visits")
        .fetch_one(pool)
        .await?;

    let sessions_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM auth_sessions WHERE expires_at > NOW()")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:           {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:           {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:          {}",
        visits_count.to_string().bright_green().bold()
    );
    println!(
        "  Active sessions: {}",
        sessions_count.to_string().bright_green().bold()
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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random session token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generates a random short alias.
///
/// Uses an alphabet without lookalike characters (0/O, 1/l/I) so aliases
/// survive being read aloud or written down.
fn generate_alias() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    const ALIAS_LEN: usize = 7;

    let mut rng = rand::rng();

    (0..ALIAS_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

fn base_url() -> String {
    std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
