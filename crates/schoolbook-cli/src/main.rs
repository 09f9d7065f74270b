use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use schoolbook_cli::seeder::{self, SeedConfig};
use schoolbook_config::DatabaseConfig;
use schoolbook_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "schoolbook-cli")]
#[command(about = "Schoolbook CLI - development database tools", long_about = None)]
struct Cli {
    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a session, classes, subjects, students, results and fee structures
    Seed {
        /// Number of class levels (JSS 1 to SSS 3)
        #[arg(short = 'l', long, default_value = "6")]
        levels: usize,

        /// Number of arms per level
        #[arg(short = 'a', long, default_value = "2")]
        arms: usize,

        /// Number of students per class
        #[arg(short = 's', long, default_value = "25")]
        students: usize,

        /// Number of subjects
        #[arg(long, default_value = "8")]
        subjects: usize,
    },
    /// Regenerate results for the current term
    SeedResults,
    /// Delete all academic and finance data
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let pool = match connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Seed {
            levels,
            arms,
            students,
            subjects,
        } => {
            let config = SeedConfig::default()
                .with_classes(levels, arms)
                .with_students_per_class(students)
                .with_subjects(subjects);
            handle_seed(&pool, &config).await
        }
        Commands::SeedResults => {
            if confirm(cli.yes, "Replace all results for the current term?") {
                handle_seed_results(&pool).await
            }
        }
        Commands::ClearSeed => {
            if confirm(cli.yes, "Delete ALL academic and finance data?") {
                handle_clear_seed(&pool).await
            }
        }
    }
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

fn confirm(skip: bool, prompt: &str) -> bool {
    if skip {
        return true;
    }
    match Confirm::new().with_prompt(prompt).default(false).interact() {
        Ok(answer) => {
            if !answer {
                println!("Aborted.");
            }
            answer
        }
        Err(e) => {
            eprintln!("❌ Failed to read confirmation: {}", e);
            false
        }
    }
}

async fn handle_seed(pool: &PgPool, config: &SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("\n❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_seed_results(pool: &PgPool) {
    match seeder::results::reseed_current_term(pool).await {
        Ok(count) => println!("✅ Seeded {} results", count),
        Err(e) => {
            eprintln!("\n❌ Error seeding results: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &PgPool) {
    match seeder::clear_all(pool).await {
        Ok(_) => println!("✅ Cleared seeded data"),
        Err(e) => {
            eprintln!("\n❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
