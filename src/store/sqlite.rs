//! Relational backend: one `patients` table, sequential rowid identifiers.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::error::{Error, Result};
use crate::models::{NewPatientRecord, PatientRecord, RecordId};

pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL,
            hypertension INTEGER NOT NULL,
            heart_disease INTEGER NOT NULL,
            smoking_history TEXT NOT NULL,
            bmi REAL NOT NULL,
            hba1c_level REAL NOT NULL,
            blood_glucose_level INTEGER NOT NULL,
            result TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidIdentifier(raw.to_owned()))
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> PatientRecord {
    PatientRecord {
        id: RecordId::Seq(row.get("id")),
        gender: row.get("gender"),
        age: row.get("age"),
        hypertension: row.get("hypertension"),
        heart_disease: row.get("heart_disease"),
        smoking_history: row.get("smoking_history"),
        bmi: row.get("bmi"),
        hba1c_level: row.get("hba1c_level"),
        blood_glucose_level: row.get("blood_glucose_level"),
        result: row.get("result"),
    }
}

pub async fn create(pool: &SqlitePool, record: &NewPatientRecord) -> Result<RecordId> {
    let done = sqlx::query(
        "INSERT INTO patients (
            gender, age, hypertension, heart_disease, smoking_history,
            bmi, hba1c_level, blood_glucose_level, result
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.gender)
    .bind(record.age)
    .bind(record.hypertension)
    .bind(record.heart_disease)
    .bind(&record.smoking_history)
    .bind(record.bmi)
    .bind(record.hba1c_level)
    .bind(record.blood_glucose_level)
    .bind(&record.result)
    .execute(pool)
    .await?;

    Ok(RecordId::Seq(done.last_insert_rowid()))
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<PatientRecord>> {
    let rows = sqlx::query("SELECT * FROM patients ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

pub async fn get(pool: &SqlitePool, raw_id: &str) -> Result<PatientRecord> {
    let id = parse_id(raw_id)?;
    let row = sqlx::query("SELECT * FROM patients WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref()
        .map(record_from_row)
        .ok_or_else(|| Error::NotFound(raw_id.to_owned()))
}

pub async fn delete(pool: &SqlitePool, raw_id: &str) -> Result<()> {
    let id = parse_id(raw_id)?;
    let done = sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(Error::NotFound(raw_id.to_owned()));
    }
    Ok(())
}
