pub use crate::items::repo_types::Item;
use sqlx::PgPool;

const ITEM_COLUMNS: &str = "id, name, description, category, condition, zipcode, image, \
                            comments, age_days, age_years, date_added, updated_at";

/// Every item in storage, materialized. No pagination or filtering.
pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Item>> {
    let rows = sqlx::query_as::<_, Item>(&format!("SELECT {ITEM_COLUMNS} FROM items"))
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(item)
}

/// Largest assigned id, compared numerically. Ids are decimal strings, so a
/// lexicographic MAX over the column would misorder "9" and "10".
pub async fn max_numeric_id(db: &PgPool) -> anyhow::Result<Option<i64>> {
    let max = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(id::BIGINT) FROM items")
        .fetch_one(db)
        .await?;
    Ok(max)
}

pub async fn insert(db: &PgPool, item: &Item) -> anyhow::Result<Item> {
    let created = sqlx::query_as::<_, Item>(&format!(
        r#"
        INSERT INTO items
            (id, name, description, category, condition, zipcode, image,
             comments, age_days, age_years, date_added, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(&item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.category)
    .bind(&item.condition)
    .bind(&item.zipcode)
    .bind(&item.image)
    .bind(&item.comments)
    .bind(item.age_days)
    .bind(item.age_years)
    .bind(item.date_added)
    .bind(item.updated_at)
    .fetch_one(db)
    .await?;
    Ok(created)
}

/// Replace the mutable fields of the row matching this item's id. Returns
/// the number of rows the update touched.
pub async fn replace_by_id(db: &PgPool, item: &Item) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET name = $2, description = $3, category = $4, condition = $5,
            zipcode = $6, image = $7, comments = $8, age_days = $9,
            age_years = $10, updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(&item.id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.category)
    .bind(&item.condition)
    .bind(&item.zipcode)
    .bind(&item.image)
    .bind(&item.comments)
    .bind(item.age_days)
    .bind(item.age_years)
    .bind(item.updated_at)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_id(db: &PgPool, id: &str) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
