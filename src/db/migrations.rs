use anyhow::Context;
use rusqlite::Connection;

// Applied in order, recorded by name so re-runs are no-ops.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_appointments",
    "CREATE TABLE appointments (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        contact_number TEXT NOT NULL,
        address TEXT NOT NULL,
        village TEXT NOT NULL,
        pincode TEXT NOT NULL,
        district TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT '',
        work_category TEXT NOT NULL,
        gunta REAL,
        acre REAL,
        area TEXT,
        seven_twelve_number TEXT,
        khata_number TEXT,
        pickup_location TEXT,
        delivery_location TEXT,
        kilometers REAL,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        remark TEXT,
        payment_mode TEXT NOT NULL DEFAULT 'online',
        payment_status TEXT NOT NULL DEFAULT 'pending',
        razorpay_order_id TEXT,
        razorpay_payment_id TEXT,
        attempted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX idx_appointments_date ON appointments(date);
    CREATE INDEX idx_appointments_status ON appointments(payment_status);",
)];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}
