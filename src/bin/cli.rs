use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

use edutrack::cli::create_admin;
use edutrack::cli::seeder::{SeedConfig, clear_seeded_data, seed_database};
use edutrack_config::DatabaseConfig;
use edutrack_db::{init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "edutrack-cli")]
#[command(about = "Edutrack CLI - Administrative tools for Edutrack", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with a fake school
    Seed {
        /// Number of levels to create
        #[arg(short = 'l', long, default_value = "6")]
        levels: usize,

        /// Number of classrooms per level
        #[arg(short = 'c', long, default_value = "2")]
        classrooms: usize,

        /// Number of students per classroom
        #[arg(short = 's', long, default_value = "20")]
        students: usize,
    },
    /// Clear all school records (keeps user accounts)
    ClearSeed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateAdmin { username, password } => {
            handle_create_admin(&pool, username, password).await
        }
        Commands::Migrate => {
            run_migrations(&pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
        Commands::Seed {
            levels,
            classrooms,
            students,
        } => {
            let config = SeedConfig {
                levels,
                classrooms_per_level: classrooms,
                students_per_classroom: students,
            };
            handle_seed(&pool, &config).await
        }
        Commands::ClearSeed => {
            println!("🧹 Clearing school records...");
            clear_seeded_data(&pool).await?;
            println!("✅ Done");
            Ok(())
        }
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let user = create_admin(pool, &username, &password).await?;
    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", user.id);
    println!("   Username: {}", user.username);
    Ok(())
}

async fn handle_seed(pool: &PgPool, config: &SeedConfig) -> anyhow::Result<()> {
    println!("🌱 Seeding database with {:?}", config);
    let summary = seed_database(pool, config).await?;

    println!("\n✅ Seed complete");
    println!("   Levels: {}", summary.levels);
    println!("   Classrooms: {}", summary.classrooms);
    println!("   Teachers: {}", summary.teachers);
    println!("   Parents: {}", summary.parents);
    println!("   Students: {}", summary.students);
    println!("   Subjects: {}", summary.subjects);
    Ok(())
}
