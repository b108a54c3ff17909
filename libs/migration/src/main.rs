use migration::Migrator;
use sea_orm_migration::cli;

/// Run with `cargo run -p migration -- up` (DATABASE_URL must be set)
#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
