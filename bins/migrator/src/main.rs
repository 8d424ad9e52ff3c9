//! Migration runner for the Arqo schema.
//!
//! Subcommands: `up` (apply pending), `down` (roll back one), `status`,
//! and `fresh` (drop everything and re-apply). Reads `DATABASE_URL` from
//! the environment or a `.env` file.

use arqo_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // cli::run_cli reads DATABASE_URL and sets up its own tracing.
    cli::run_cli(Migrator).await;
}
