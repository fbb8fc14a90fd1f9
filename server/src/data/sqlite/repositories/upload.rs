//! Upload repository for SQLite operations
//!
//! `insert_upload` always writes `created_at` in one canonical layout
//! (`YYYY-MM-DDTHH:MM:SS.ffffffZ`). Those rows compare as plain text and group
//! in SQL. Rows in any other layout are never judged by SQLite's date
//! functions: they are handed back and `parse_created_at` decides.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{
    HourTally, NewUpload, ShiftCounts, UploadQuery, UploadRow, UploadStamp, UtcHourTallies,
};
use crate::utils::time::format_created_at;

/// Matches rows in the canonical layout that name a real calendar instant
///
/// The `date()` comparison rejects values SQLite would silently normalize,
/// such as day 30 of February or hour 24.
const CANONICAL_ROW: &str = "(created_at GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]T[0-9][0-9]:[0-9][0-9]:[0-9][0-9].[0-9][0-9][0-9][0-9][0-9][0-9]Z' \
     AND IFNULL(date(created_at) = substr(created_at, 1, 10), 0))";

type UploadTuple = (
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    String,
);

fn row_from_tuple(t: UploadTuple) -> UploadRow {
    UploadRow {
        id: t.0,
        user_id: t.1,
        username: t.2,
        image_url: t.3,
        shift: t.4,
        created_at: t.5,
    }
}

/// SELECT narrowed by user and, for canonical rows, by time range
///
/// Non-canonical rows pass the time filter here; callers finish with
/// [`UploadQuery::admits`].
fn filtered_select(columns: &str, query: &UploadQuery) -> String {
    let mut sql = format!("SELECT {} FROM task_uploads WHERE 1 = 1", columns);
    if query.user_id.is_some() {
        sql.push_str(" AND user_id = ?");
    }
    if query.is_bounded() {
        let mut range = Vec::with_capacity(2);
        if query.from.is_some() {
            range.push("created_at >= ?");
        }
        if query.to.is_some() {
            range.push("created_at < ?");
        }
        sql.push_str(&format!(
            " AND (NOT {} OR ({}))",
            CANONICAL_ROW,
            range.join(" AND ")
        ));
    }
    sql.push_str(" ORDER BY created_at ASC, id ASC");
    sql
}

/// Bind values in the order `filtered_select` emits placeholders
fn bind_values(query: &UploadQuery) -> Vec<String> {
    query
        .user_id
        .iter()
        .cloned()
        .chain(query.from.map(format_created_at))
        .chain(query.to.map(format_created_at))
        .collect()
}

/// List uploads matching `query`, oldest first
pub async fn list_uploads(
    pool: &SqlitePool,
    query: &UploadQuery,
) -> Result<Vec<UploadRow>, SqliteError> {
    let sql = filtered_select(
        "id, user_id, username, image_url, shift, created_at",
        query,
    );
    let mut q = sqlx::query_as::<_, UploadTuple>(&sql);
    for value in bind_values(query) {
        q = q.bind(value);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(row_from_tuple)
        .filter(|row| query.admits(&row.created_at))
        .collect())
}

/// Like [`list_uploads`] but reads only `username` and `created_at`
pub async fn list_stamps(
    pool: &SqlitePool,
    query: &UploadQuery,
) -> Result<Vec<UploadStamp>, SqliteError> {
    let sql = filtered_select("username, created_at", query);
    let mut q = sqlx::query_as::<_, (String, String)>(&sql);
    for value in bind_values(query) {
        q = q.bind(value);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .filter(|(_, created_at)| query.admits(created_at))
        .map(|(username, created_at)| UploadStamp {
            username,
            created_at,
        })
        .collect())
}

/// Group uploads by user, UTC date and UTC hour for hours in `[lower, upper)`
pub async fn utc_hour_tallies(
    pool: &SqlitePool,
    lower: u32,
    upper: u32,
) -> Result<UtcHourTallies, SqliteError> {
    let grouped_sql = format!(
        r#"
        SELECT
            username,
            substr(created_at, 1, 10) AS day,
            CAST(strftime('%H', created_at) AS INTEGER) AS hour,
            COUNT(*) AS uploads
        FROM task_uploads
        WHERE {}
          AND CAST(strftime('%H', created_at) AS INTEGER) >= ?
          AND CAST(strftime('%H', created_at) AS INTEGER) < ?
        GROUP BY username, day, hour
        "#,
        CANONICAL_ROW
    );
    let grouped: Vec<(String, String, i64, i64)> = sqlx::query_as(&grouped_sql)
        .bind(i64::from(lower))
        .bind(i64::from(upper))
        .fetch_all(pool)
        .await?;

    let tallies = grouped
        .into_iter()
        .filter_map(|(username, day, hour, count)| {
            let Ok(date) = NaiveDate::parse_from_str(&day, "%Y-%m-%d") else {
                tracing::warn!(%username, %day, "Skipping tally with unreadable date");
                return None;
            };
            Some(HourTally {
                username,
                date,
                hour: hour as u32,
                count: count as u64,
            })
        })
        .collect();

    let residue_sql = format!(
        "SELECT username, created_at FROM task_uploads WHERE NOT {}",
        CANONICAL_ROW
    );
    let residue = sqlx::query_as::<_, (String, String)>(&residue_sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(username, created_at)| UploadStamp {
            username,
            created_at,
        })
        .collect();

    Ok(UtcHourTallies { tallies, residue })
}

/// Insert an upload with a fresh UUID and the current time
pub async fn insert_upload(
    pool: &SqlitePool,
    upload: NewUpload,
) -> Result<UploadRow, SqliteError> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = format_created_at(chrono::Utc::now());

    sqlx::query(
        "INSERT INTO task_uploads (id, user_id, username, image_url, shift, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&upload.user_id)
    .bind(&upload.username)
    .bind(&upload.image_url)
    .bind(&upload.shift)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(UploadRow {
        id,
        user_id: upload.user_id,
        username: upload.username,
        image_url: upload.image_url,
        shift: upload.shift,
        created_at,
    })
}

/// Count uploads per stored shift tag
pub async fn count_by_shift(pool: &SqlitePool) -> Result<ShiftCounts, SqliteError> {
    let (total, morning, evening, night): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN shift = 'morning' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN shift = 'evening' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN shift = 'night' THEN 1 ELSE 0 END), 0)
        FROM task_uploads
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(ShiftCounts {
        total: total as u64,
        morning: morning as u64,
        evening: evening as u64,
        night: night as u64,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    pub(crate) async fn insert_raw(
        pool: &SqlitePool,
        id: &str,
        username: &str,
        shift: Option<&str>,
        created_at: &str,
    ) {
        insert_raw_for(pool, id, None, username, shift, created_at).await;
    }

    pub(crate) async fn insert_raw_for(
        pool: &SqlitePool,
        id: &str,
        user_id: Option<&str>,
        username: &str,
        shift: Option<&str>,
        created_at: &str,
    ) {
        sqlx::query(
            "INSERT INTO task_uploads (id, user_id, username, image_url, shift, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(username)
        .bind(format!("https://img.test/{}.png", id))
        .bind(shift)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
    }

    fn new_upload(username: &str, shift: Option<&str>) -> NewUpload {
        NewUpload {
            user_id: Some("u-1".to_string()),
            username: username.to_string(),
            image_url: "https://img.test/a.png".to_string(),
            shift: shift.map(String::from),
        }
    }

    fn may_first() -> UploadQuery {
        UploadQuery::between(
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_upload() {
        let pool = setup_test_pool().await;
        let row = insert_upload(&pool, new_upload("alice", Some("morning")))
            .await
            .unwrap();

        assert!(!row.id.is_empty());
        assert_eq!(row.username, "alice");
        assert!(crate::utils::time::parse_created_at(&row.created_at).is_some());

        let listed = list_uploads(&pool, &UploadQuery::all()).await.unwrap();
        assert_eq!(listed, vec![row]);
    }

    #[tokio::test]
    async fn test_inserted_rows_are_canonical() {
        let pool = setup_test_pool().await;
        insert_upload(&pool, new_upload("alice", None)).await.unwrap();

        let sql = format!("SELECT COUNT(*) FROM task_uploads WHERE {}", CANONICAL_ROW);
        let (canonical,): (i64,) = sqlx::query_as(&sql).fetch_one(&pool).await.unwrap();
        assert_eq!(canonical, 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_shift() {
        let pool = setup_test_pool().await;
        let result = insert_upload(&pool, new_upload("alice", Some("noon"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_uploads_range_mixed_layouts() {
        let pool = setup_test_pool().await;
        insert_raw(&pool, "a", "alice", None, "2024-05-01T07:59:59Z").await;
        insert_raw(&pool, "b", "alice", None, "2024-05-01 08:00:00").await;
        insert_raw(&pool, "c", "bob", None, "2024-05-01T14:00:00+05:00").await;
        insert_raw(&pool, "d", "bob", None, "2024-05-02T00:00:00.000000Z").await;
        insert_raw(&pool, "e", "carol", None, "not a time").await;
        insert_raw(&pool, "f", "carol", None, "2024-05-01T12:00:00.000000Z").await;

        let rows = list_uploads(&pool, &may_first()).await.unwrap();
        let mut ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        // c is 09:00 UTC
        assert_eq!(ids, vec!["b", "c", "f"]);
    }

    #[tokio::test]
    async fn test_range_keeps_layouts_sqlite_cannot_read() {
        let pool = setup_test_pool().await;
        // Lowercase separator parses in Rust but not in julianday()
        insert_raw(&pool, "a", "alice", None, "2024-05-01t08:10:00Z").await;
        insert_raw(&pool, "b", "bob", None, "2024-05-01T09:10:00.000000Z").await;

        let stamps = list_stamps(&pool, &may_first()).await.unwrap();
        let names: Vec<&str> = stamps.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"alice"));
        assert!(names.contains(&"bob"));
    }

    #[tokio::test]
    async fn test_list_uploads_unbounded_keeps_unreadable() {
        let pool = setup_test_pool().await;
        insert_raw(&pool, "a", "alice", None, "2024-05-01T08:00:00Z").await;
        insert_raw(&pool, "b", "alice", None, "garbage").await;

        let rows = list_uploads(&pool, &UploadQuery::all()).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_list_uploads_for_user() {
        let pool = setup_test_pool().await;
        insert_raw_for(&pool, "a", Some("u-1"), "alice", None, "2024-05-01T09:00:00.000000Z").await;
        insert_raw_for(&pool, "b", Some("u-2"), "bob", None, "2024-05-01T09:00:00.000000Z").await;
        insert_raw_for(&pool, "c", Some("u-1"), "alice", None, "2024-05-03T09:00:00.000000Z").await;

        let rows = list_uploads(&pool, &may_first().for_user("u-1")).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);

        let all = list_stamps(&pool, &UploadQuery::all().for_user("u-1")).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_utc_hour_tallies_group_canonical_rows() {
        let pool = setup_test_pool().await;
        insert_raw(&pool, "a", "alice", None, "2024-05-01T08:05:00.000000Z").await;
        insert_raw(&pool, "b", "alice", None, "2024-05-01T08:45:00.000000Z").await;
        insert_raw(&pool, "c", "alice", None, "2024-05-02T08:15:00.000000Z").await;
        insert_raw(&pool, "d", "bob", None, "2024-05-01T15:59:59.999999Z").await;
        // Outside the morning window
        insert_raw(&pool, "e", "bob", None, "2024-05-01T16:00:00.000000Z").await;
        // Not canonical: left for the caller to parse
        insert_raw(&pool, "f", "carol", None, "2024-05-01 09:00:00").await;
        insert_raw(&pool, "g", "carol", None, "2024-02-30T09:00:00.000000Z").await;

        let result = utc_hour_tallies(&pool, 8, 16).await.unwrap();
        let mut tallies = result.tallies;
        tallies.sort_by(|a, b| (&a.username, a.date, a.hour).cmp(&(&b.username, b.date, b.hour)));

        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        assert_eq!(
            tallies,
            vec![
                HourTally { username: "alice".into(), date: day(1), hour: 8, count: 2 },
                HourTally { username: "alice".into(), date: day(2), hour: 8, count: 1 },
                HourTally { username: "bob".into(), date: day(1), hour: 15, count: 1 },
            ]
        );

        let mut residue: Vec<&str> = result.residue.iter().map(|s| s.created_at.as_str()).collect();
        residue.sort_unstable();
        assert_eq!(residue, vec!["2024-02-30T09:00:00.000000Z", "2024-05-01 09:00:00"]);
    }

    #[tokio::test]
    async fn test_count_by_shift() {
        let pool = setup_test_pool().await;
        let empty = count_by_shift(&pool).await.unwrap();
        assert_eq!(empty, ShiftCounts::default());

        insert_raw(&pool, "a", "alice", Some("morning"), "2024-05-01T08:00:00Z").await;
        insert_raw(&pool, "b", "alice", Some("morning"), "2024-05-01T09:00:00Z").await;
        insert_raw(&pool, "c", "bob", Some("night"), "2024-05-01T01:00:00Z").await;
        insert_raw(&pool, "d", "bob", None, "2024-05-01T17:00:00Z").await;

        let counts = count_by_shift(&pool).await.unwrap();
        assert_eq!(
            counts,
            ShiftCounts {
                total: 4,
                morning: 2,
                evening: 0,
                night: 1,
            }
        );
    }
}
