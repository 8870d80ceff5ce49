//! Battle participation rows

use sqlx::SqliteConnection;

/// Record that a character attacked a monster
pub async fn insert_participation(
    conn: &mut SqliteConnection,
    monster_id: i64,
    character_id: i64,
) -> Result<(), sqlx::Error> {
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO battle_participation (monster_id, character_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(monster_id)
    .bind(character_id)
    .bind(&created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Number of attacks recorded against a monster
pub async fn count_participation(
    conn: &mut SqliteConnection,
    monster_id: i64,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM battle_participation WHERE monster_id = ?")
            .bind(monster_id)
            .fetch_one(&mut *conn)
            .await?;

    Ok(row.0)
}
