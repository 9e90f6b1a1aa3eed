//! Migrate command - applies, reverts and inspects schema migrations.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Migrations are driven explicitly here; skip the automatic `up`
    // that server startup performs.
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(wrap_db_err)?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(wrap_db_err)?;
            tracing::info!("Schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(wrap_db_err)?;
            tracing::info!("Rolled back one migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await.map_err(wrap_db_err)? {
                println!("{} {}", if applied { "[x]" } else { "[ ]" }, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await.map_err(wrap_db_err)?;
            tracing::info!("Database rebuilt from scratch");
        }
    }

    Ok(())
}

/// Surface migration failures as internal errors without leaking
/// connection details.
fn wrap_db_err(e: sea_orm::DbErr) -> AppError {
    AppError::internal(format!("Migration command failed: {}", e))
}
