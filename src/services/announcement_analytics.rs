//! Announcement reach analytics.
//!
//! Raw rows are fetched concurrently, then [`aggregate`] reduces them in
//! memory into the reporting payload. Only read facts belonging to
//! announcements inside the reporting window are counted, so every total
//! refers to the same announcement set.
//!
//! Per-item `unreadCount` and per-user `unreadAnnouncements` are derived
//! from the user population (`users − reads`), not from explicit unread
//! facts. The overview and monthly unread totals are fact-derived.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::announcement::AnnouncementRead;
use crate::services::reporting::{month_key, percent, round2, window_start};

/// Number of recent announcements broken out individually.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementAnalytics {
    pub overview: AnnouncementOverview,
    pub recent_announcements: Vec<AnnouncementStat>,
    pub monthly_trend: Vec<AnnouncementMonth>,
    pub user_read_status: Vec<UserReadStatus>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementOverview {
    pub total_announcements: i64,
    pub total_users: i64,
    pub total_reads: i64,
    pub average_reads: f64,
    pub total_unreads: i64,
    pub overall_read_percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementStat {
    pub id: Uuid,
    pub title: String,
    pub read_count: i64,
    pub unread_count: i64,
    pub read_percentage: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementMonth {
    pub month: String,
    pub announcements: i64,
    pub total_reads: i64,
    pub total_unread: i64,
    pub average_read_rate: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReadStatus {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_role: String,
    pub user_department: String,
    pub read_announcements: i64,
    pub unread_announcements: i64,
}

/// Announcement columns the aggregator needs.
#[derive(Debug, Clone, FromRow)]
pub struct AnnouncementSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// User with role name and department joined.
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsUserRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub department: Option<String>,
    pub role_name: Option<String>,
}

/// Fetch the raw rows in parallel and aggregate them.
pub async fn get_analytics(
    pool: &PgPool,
    window_months: u32,
) -> Result<AnnouncementAnalytics, AppError> {
    let since = window_start(Utc::now(), window_months);

    let (announcements, reads, users) = tokio::try_join!(
        fetch_announcements(pool, since),
        fetch_reads(pool, since),
        fetch_users(pool),
    )?;

    tracing::debug!(
        announcements = announcements.len(),
        reads = reads.len(),
        users = users.len(),
        "Aggregating announcement analytics"
    );

    Ok(aggregate(&announcements, &reads, &users))
}

/// Reduce in-window announcements, read facts and users into the report.
///
/// Facts for announcements not in `announcements` are ignored.
pub fn aggregate(
    announcements: &[AnnouncementSummaryRow],
    reads: &[AnnouncementRead],
    users: &[AnalyticsUserRow],
) -> AnnouncementAnalytics {
    let mut ordered: Vec<&AnnouncementSummaryRow> = announcements.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let in_window: HashSet<Uuid> = ordered.iter().map(|a| a.id).collect();
    let total_announcements = ordered.len() as i64;
    let total_users = users.len() as i64;

    let mut per_announcement: HashMap<Uuid, FactTally> = HashMap::new();
    let mut per_user: HashMap<Uuid, i64> = HashMap::new();
    let mut totals = FactTally::default();

    for fact in reads.iter().filter(|r| in_window.contains(&r.announcement_id)) {
        let tally = per_announcement.entry(fact.announcement_id).or_default();
        if fact.is_read() {
            tally.read += 1;
            totals.read += 1;
            *per_user.entry(fact.user_id).or_default() += 1;
        } else {
            tally.unread += 1;
            totals.unread += 1;
        }
    }

    let average_reads = if total_announcements > 0 {
        round2(totals.read as f64 / total_announcements as f64)
    } else {
        0.0
    };
    let overall_read_percentage = if total_users > 0 && total_announcements > 0 {
        round2(totals.read as f64 / (total_users * total_announcements) as f64 * 100.0)
    } else {
        0.0
    };

    let recent_announcements = ordered
        .iter()
        .take(RECENT_LIMIT)
        .map(|a| {
            let read_count = per_announcement.get(&a.id).map_or(0, |t| t.read);
            AnnouncementStat {
                id: a.id,
                title: a.title.clone(),
                read_count,
                unread_count: (total_users - read_count).max(0),
                read_percentage: percent(read_count, total_users),
                created_at: a.created_at,
            }
        })
        .collect();

    let mut months: BTreeMap<String, MonthTally> = BTreeMap::new();
    for a in &ordered {
        let bucket = months.entry(month_key(&a.created_at)).or_default();
        let tally = per_announcement.get(&a.id).copied().unwrap_or_default();
        bucket.announcements += 1;
        bucket.facts.read += tally.read;
        bucket.facts.unread += tally.unread;
    }
    let monthly_trend = months
        .into_iter()
        .map(|(month, bucket)| AnnouncementMonth {
            month,
            announcements: bucket.announcements,
            total_reads: bucket.facts.read,
            total_unread: bucket.facts.unread,
            average_read_rate: percent(bucket.facts.read, bucket.facts.read + bucket.facts.unread),
        })
        .collect();

    let user_read_status = users
        .iter()
        .map(|u| {
            let read_announcements = per_user.get(&u.id).copied().unwrap_or(0);
            UserReadStatus {
                user_id: u.id,
                user_name: u.name.clone().unwrap_or_else(|| "Unknown User".to_string()),
                user_role: u.role_name.clone().unwrap_or_else(|| "Unknown Role".to_string()),
                user_department: u
                    .department
                    .clone()
                    .unwrap_or_else(|| "Unknown Department".to_string()),
                read_announcements,
                unread_announcements: (total_announcements - read_announcements).max(0),
            }
        })
        .collect();

    AnnouncementAnalytics {
        overview: AnnouncementOverview {
            total_announcements,
            total_users,
            total_reads: totals.read,
            average_reads,
            total_unreads: totals.unread,
            overall_read_percentage,
        },
        recent_announcements,
        monthly_trend,
        user_read_status,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct FactTally {
    read: i64,
    unread: i64,
}

#[derive(Debug, Default)]
struct MonthTally {
    announcements: i64,
    facts: FactTally,
}

/// Announcements created at or after `since`, newest first.
async fn fetch_announcements(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<AnnouncementSummaryRow>, AppError> {
    let rows = sqlx::query_as::<_, AnnouncementSummaryRow>(
        r#"
        SELECT id, title, created_at
        FROM announcements
        WHERE created_at >= $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Read facts for announcements created at or after `since`.
async fn fetch_reads(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<AnnouncementRead>, AppError> {
    let rows = sqlx::query_as::<_, AnnouncementRead>(
        r#"
        SELECT r.announcement_id, r.user_id, r.is_read
        FROM announcement_reads r
        INNER JOIN announcements a ON a.id = r.announcement_id
        WHERE a.created_at >= $1
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All users with role and department.
async fn fetch_users(pool: &PgPool) -> Result<Vec<AnalyticsUserRow>, AppError> {
    let rows = sqlx::query_as::<_, AnalyticsUserRow>(
        r#"
        SELECT u.id, u.name, u.department, r.name AS role_name
        FROM users u
        LEFT JOIN roles r ON r.id = u.role_id
        ORDER BY u.name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
