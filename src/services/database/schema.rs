use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_appointments_table(conn)?;
    run_appointment_migrations(conn)?;
    create_indexes(conn)?;
    Ok(())
}

fn create_appointments_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day TEXT NOT NULL,
            start_time TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            label TEXT NOT NULL,
            color TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create appointments table")?;

    Ok(())
}

fn run_appointment_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "appointments",
        "color",
        "ALTER TABLE appointments ADD COLUMN color TEXT",
    )?;

    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_appointments_day ON appointments(day)",
        [],
    )
    .context("Failed to create appointments day index")?;

    Ok(())
}
