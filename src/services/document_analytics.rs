//! Document reach analytics with a two-tier data source.
//!
//! The primary path reads per-document counts from the `document_analytics`
//! reporting view. If that query fails (an empty result is not a failure)
//! the report is rebuilt from the denormalized `reads`/`downloads`
//! counters on `documents`. Both paths compute the monthly trend and the
//! type distribution from the rows they read.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentCounterRow, DocumentViewRow};
use crate::services::reporting::{month_key, percent, rounded_mean};

/// Number of recent documents broken out individually.
pub const RECENT_LIMIT: usize = 10;

/// Type label for documents without a stored type.
const UNKNOWN_TYPE: &str = "unknown";

/// Where document analytics rows come from.
pub trait DocumentAnalyticsSource {
    fn user_count(&self) -> impl Future<Output = Result<i64, AppError>> + Send;

    /// Rows of the reporting view, newest first.
    fn view_rows(&self) -> impl Future<Output = Result<Vec<DocumentViewRow>, AppError>> + Send;

    /// Raw document counters, newest first.
    fn counter_rows(
        &self,
    ) -> impl Future<Output = Result<Vec<DocumentCounterRow>, AppError>> + Send;
}

/// PostgreSQL-backed source.
#[derive(Debug, Clone)]
pub struct PgDocumentAnalytics<'a> {
    pool: &'a PgPool,
}

impl<'a> PgDocumentAnalytics<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl DocumentAnalyticsSource for PgDocumentAnalytics<'_> {
    async fn user_count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    async fn view_rows(&self) -> Result<Vec<DocumentViewRow>, AppError> {
        let rows = sqlx::query_as::<_, DocumentViewRow>(
            r#"
            SELECT
                v.id,
                v.title,
                v.created_at,
                COALESCE(v.read_count, 0)::bigint     AS read_count,
                COALESCE(v.download_count, 0)::bigint AS download_count,
                d.type                                AS document_type
            FROM document_analytics v
            LEFT JOIN documents d ON d.id = v.id
            ORDER BY v.created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    async fn counter_rows(&self) -> Result<Vec<DocumentCounterRow>, AppError> {
        let rows = sqlx::query_as::<_, DocumentCounterRow>(
            r#"
            SELECT
                id,
                name,
                created_at,
                COALESCE(reads, 0)::bigint     AS reads,
                COALESCE(downloads, 0)::bigint AS downloads,
                type                           AS document_type
            FROM documents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalytics {
    pub overview: DocumentOverview,
    pub recent_documents: Vec<RecentDocument>,
    pub monthly_trend: Vec<DocumentMonth>,
    pub document_types: Vec<DocumentTypeShare>,
    /// Only present when the reporting view was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_stats: Option<Vec<DocumentStat>>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOverview {
    pub total_documents: i64,
    pub total_users: i64,
    pub total_reads: i64,
    pub total_downloads: i64,
    pub average_reads: i64,
    pub average_downloads: i64,
    pub total_read: i64,
    pub total_not_read: i64,
    pub total_downloaded: i64,
    pub total_not_downloaded: i64,
    pub overall_read_percentage: i64,
    pub overall_download_percentage: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStat {
    pub id: Uuid,
    pub title: String,
    pub read_count: i64,
    pub download_count: i64,
    pub not_read_count: i64,
    pub downloaded_count: i64,
    pub not_downloaded_count: i64,
    pub read_percentage: i64,
    pub download_percentage: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDocument {
    pub id: Uuid,
    pub title: String,
    pub read_count: i64,
    pub download_count: i64,
    pub read_percentage: i64,
    pub download_percentage: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMonth {
    pub month: String,
    pub documents: i64,
    pub total_reads: i64,
    pub total_downloads: i64,
    pub average_read_rate: i64,
    pub average_download_rate: i64,
}

#[derive(Debug, Serialize)]
pub struct DocumentTypeShare {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub count: i64,
    pub percentage: i64,
}

/// Common shape both data paths reduce to before aggregation.
struct DocumentFacts<'a> {
    id: Uuid,
    title: &'a str,
    created_at: DateTime<Utc>,
    reads: i64,
    downloads: i64,
    doc_type: Option<&'a str>,
}

/// Build the document report, falling back to raw counters when the
/// reporting view is unavailable.
pub async fn get_analytics<S: DocumentAnalyticsSource>(
    source: &S,
) -> Result<DocumentAnalytics, AppError> {
    let (total_users, view) = tokio::join!(source.user_count(), source.view_rows());
    let total_users = total_users?;

    match view {
        Ok(rows) => Ok(aggregate_view(&rows, total_users)),
        Err(e) => {
            tracing::warn!(error = %e, "Document analytics view unavailable, using document counters");
            let rows = source.counter_rows().await?;
            Ok(aggregate_counters(&rows, total_users))
        }
    }
}

/// Primary path: per-document statistics from the reporting view.
pub fn aggregate_view(rows: &[DocumentViewRow], total_users: i64) -> DocumentAnalytics {
    let facts: Vec<DocumentFacts<'_>> = rows
        .iter()
        .map(|r| DocumentFacts {
            id: r.id,
            title: r.title.as_deref().unwrap_or("Untitled"),
            created_at: r.created_at,
            reads: r.read_count,
            downloads: r.download_count,
            doc_type: r.document_type.as_deref(),
        })
        .collect();

    let stats: Vec<DocumentStat> = facts
        .iter()
        .map(|f| DocumentStat {
            id: f.id,
            title: f.title.to_string(),
            read_count: f.reads,
            download_count: f.downloads,
            not_read_count: (total_users - f.reads).max(0),
            downloaded_count: f.downloads,
            not_downloaded_count: (total_users - f.downloads).max(0),
            read_percentage: percent(f.reads, total_users),
            download_percentage: percent(f.downloads, total_users),
            created_at: f.created_at,
        })
        .collect();

    let mut overview = build_overview(&facts, total_users);
    overview.total_not_read = stats.iter().map(|s| s.not_read_count).sum();
    overview.total_not_downloaded = stats.iter().map(|s| s.not_downloaded_count).sum();

    let recent_documents = stats
        .iter()
        .take(RECENT_LIMIT)
        .map(|s| RecentDocument {
            id: s.id,
            title: s.title.clone(),
            read_count: s.read_count,
            download_count: s.download_count,
            read_percentage: s.read_percentage,
            download_percentage: s.download_percentage,
            created_at: s.created_at,
        })
        .collect();

    DocumentAnalytics {
        overview,
        recent_documents,
        monthly_trend: monthly_trend(&facts, total_users),
        document_types: type_distribution(&facts),
        document_stats: Some(stats),
    }
}

/// Fallback path: recompute the report from raw document counters.
pub fn aggregate_counters(rows: &[DocumentCounterRow], total_users: i64) -> DocumentAnalytics {
    let facts: Vec<DocumentFacts<'_>> = rows
        .iter()
        .map(|r| DocumentFacts {
            id: r.id,
            title: &r.name,
            created_at: r.created_at,
            reads: r.reads,
            downloads: r.downloads,
            doc_type: r.document_type.as_deref(),
        })
        .collect();

    let overview = build_overview(&facts, total_users);

    let recent_documents = facts
        .iter()
        .take(RECENT_LIMIT)
        .map(|f| RecentDocument {
            id: f.id,
            title: f.title.to_string(),
            read_count: f.reads,
            download_count: f.downloads,
            read_percentage: percent(f.reads, total_users),
            download_percentage: percent(f.downloads, total_users),
            created_at: f.created_at,
        })
        .collect();

    DocumentAnalytics {
        overview,
        recent_documents,
        monthly_trend: monthly_trend(&facts, total_users),
        document_types: type_distribution(&facts),
        document_stats: None,
    }
}

/// Overview totals. The not-read/not-downloaded totals are population
/// derived here; the view path replaces them with per-document sums.
fn build_overview(facts: &[DocumentFacts<'_>], total_users: i64) -> DocumentOverview {
    let total_documents = facts.len() as i64;
    let total_reads: i64 = facts.iter().map(|f| f.reads).sum();
    let total_downloads: i64 = facts.iter().map(|f| f.downloads).sum();
    let reach = total_users * total_documents;

    DocumentOverview {
        total_documents,
        total_users,
        total_reads,
        total_downloads,
        average_reads: rounded_mean(total_reads, total_documents),
        average_downloads: rounded_mean(total_downloads, total_documents),
        total_read: total_reads,
        total_not_read: (reach - total_reads).max(0),
        total_downloaded: total_downloads,
        total_not_downloaded: (reach - total_downloads).max(0),
        overall_read_percentage: percent(total_reads, reach),
        overall_download_percentage: percent(total_downloads, reach),
    }
}

/// Documents grouped by creation month, ascending. Rates are relative to
/// the reach of that month's documents (`users × documents`).
fn monthly_trend(facts: &[DocumentFacts<'_>], total_users: i64) -> Vec<DocumentMonth> {
    let mut months: BTreeMap<String, (i64, i64, i64)> = BTreeMap::new();
    for f in facts {
        let entry = months.entry(month_key(&f.created_at)).or_default();
        entry.0 += 1;
        entry.1 += f.reads;
        entry.2 += f.downloads;
    }

    months
        .into_iter()
        .map(|(month, (documents, reads, downloads))| DocumentMonth {
            month,
            documents,
            total_reads: reads,
            total_downloads: downloads,
            average_read_rate: percent(reads, total_users * documents),
            average_download_rate: percent(downloads, total_users * documents),
        })
        .collect()
}

/// Share of each document type, most common first.
fn type_distribution(facts: &[DocumentFacts<'_>]) -> Vec<DocumentTypeShare> {
    let total = facts.len() as i64;
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for f in facts {
        *counts.entry(f.doc_type.unwrap_or(UNKNOWN_TYPE)).or_default() += 1;
    }

    let mut shares: Vec<DocumentTypeShare> = counts
        .into_iter()
        .map(|(doc_type, count)| DocumentTypeShare {
            doc_type: doc_type.to_string(),
            count,
            percentage: percent(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.doc_type.cmp(&b.doc_type)));
    shares
}
