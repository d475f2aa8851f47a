//! Load the development dataset into the configured database.
//!
//! Safe to run repeatedly: existing rows are left untouched.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use carzone_api::config::Config;

/// Number of accounts whose credentials are printed after seeding.
const SHOWN_CREDENTIALS: usize = 5;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error seeding database: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("carzone_api={},sea_orm=warn", config.log_level).into()
    });
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = carzone_api::db::connect_and_migrate(&config.database_url).await?;

    println!("Seeding database...");
    let summary = carzone_api::seed::run(&db).await?;

    println!("Database seeded successfully!");
    println!();
    println!("Summary:");
    print!("{summary}");
    println!();
    println!("Sample login credentials:");
    for (username, password) in carzone_api::seed::credentials(SHOWN_CREDENTIALS) {
        println!("  {username} / {password}");
    }

    Ok(())
}
