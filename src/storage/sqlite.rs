use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::models::RoastReport;

/// Roast history in SQLite. The connection sits behind a mutex so one
/// `Storage` can be shared between request handlers.
pub struct Storage {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub roast_score: u32,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_db()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Storage("connection lock poisoned".to_string()))
    }

    fn init_db(&self) -> Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL COLLATE NOCASE,
                name TEXT,
                avatar_url TEXT,
                bio TEXT,
                public_repos INTEGER,
                followers INTEGER,
                following INTEGER,
                created_at TEXT
            );

            CREATE TABLE IF NOT EXISTS roast_reports (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL,
                source TEXT NOT NULL,
                roast_score INTEGER NOT NULL,
                report_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_roast_reports_user_id ON roast_reports(user_id);
            CREATE INDEX IF NOT EXISTS idx_roast_reports_created_at ON roast_reports(created_at);
            "#,
        )?;

        Ok(())
    }

    pub fn save_report(&self, report: &RoastReport) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO users (username, name, avatar_url, bio, public_repos, followers, following, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(username) DO UPDATE SET
                username = excluded.username,
                name = excluded.name,
                avatar_url = excluded.avatar_url,
                bio = excluded.bio,
                public_repos = excluded.public_repos,
                followers = excluded.followers,
                following = excluded.following
            "#,
            params![
                report.user.login,
                report.user.name,
                report.user.avatar_url,
                report.user.bio,
                report.user.public_repos,
                report.user.followers,
                report.user.following,
                report.user.created_at.to_rfc3339(),
            ],
        )?;

        let user_id: i64 = conn.query_row(
            "SELECT id FROM users WHERE username = ?1 COLLATE NOCASE",
            params![report.user.login],
            |row| row.get(0),
        )?;

        let report_json = serde_json::to_string(report)?;
        conn.execute(
            r#"
            INSERT INTO roast_reports (user_id, created_at, source, roast_score, report_json)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user_id,
                report.created_at.to_rfc3339(),
                report.response.source.to_string(),
                report.potential.roast_score,
                report_json,
            ],
        )?;

        Ok(())
    }

    pub fn latest_report(&self, username: &str) -> Result<Option<RoastReport>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            r#"
            SELECT r.report_json
            FROM roast_reports r
            JOIN users u ON r.user_id = u.id
            WHERE u.username = ?1 COLLATE NOCASE
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT 1
            "#,
            params![username],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_reports(&self) -> Result<Vec<ReportSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT u.username, r.created_at, r.source, r.roast_score
            FROM roast_reports r
            JOIN users u ON r.user_id = u.id
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let created_at: String = row.get(1)?;
            Ok(ReportSummary {
                username: row.get(0)?,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_default(),
                source: row.get(2)?,
                roast_score: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::AnalysisResult;
    use crate::models::{GitHubUser, RoastResponse, RoastSource};
    use crate::roast::roast_potential;
    use chrono::{Duration, TimeZone};

    fn report(login: &str, created_at: DateTime<Utc>, roast: &str) -> RoastReport {
        let analysis = AnalysisResult::default();
        RoastReport {
            user: GitHubUser {
                login: login.to_string(),
                name: Some("Test User".to_string()),
                bio: None,
                avatar_url: format!("https://github.com/{}.png", login),
                public_repos: 3,
                followers: 1,
                following: 2,
                created_at: Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap(),
            },
            repositories_analyzed: 3,
            commits_analyzed: 0,
            potential: roast_potential(&analysis),
            analysis,
            response: RoastResponse {
                roasts: vec![roast.to_string()],
                source: RoastSource::Fallback,
                overall_tone: Some("mysterious".to_string()),
                metadata: None,
            },
            created_at,
        }
    }

    #[test]
    fn test_latest_report_returns_newest() {
        let storage = Storage::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        storage.save_report(&report("octocat", now - Duration::days(1), "old")).unwrap();
        storage.save_report(&report("octocat", now, "new")).unwrap();

        let latest = storage.latest_report("octocat").unwrap().unwrap();
        assert_eq!(latest.response.roasts, vec!["new"]);
        assert_eq!(latest.created_at, now);
        assert_eq!(latest.user.following, 2);
    }

    #[test]
    fn test_missing_user_has_no_report() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.latest_report("ghost").unwrap().is_none());
    }

    #[test]
    fn test_list_reports_newest_first() {
        let storage = Storage::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        storage.save_report(&report("alice", now - Duration::hours(2), "a")).unwrap();
        storage.save_report(&report("bob", now, "b")).unwrap();

        let reports = storage.list_reports().unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(reports[0].source, "fallback");
        assert_eq!(reports[0].roast_score, 35);
    }

    #[test]
    fn test_reports_persist_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roasts.db");
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        Storage::new(&path)
            .unwrap()
            .save_report(&report("octocat", now, "saved"))
            .unwrap();

        let reopened = Storage::new(&path).unwrap();
        assert!(reopened.latest_report("octocat").unwrap().is_some());
    }

    #[test]
    fn test_lookup_ignores_login_case() {
        let storage = Storage::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        storage.save_report(&report("octocat", now - Duration::hours(1), "first")).unwrap();
        storage.save_report(&report("OctoCat", now, "second")).unwrap();

        let latest = storage.latest_report("OCTOCAT").unwrap().unwrap();
        assert_eq!(latest.response.roasts, vec!["second"]);

        let reports = storage.list_reports().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.username == "OctoCat"));
    }

    #[test]
    fn test_poisoned_lock_is_storage_error() {
        let storage = std::sync::Arc::new(Storage::in_memory().unwrap());
        let shared = storage.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.conn.lock().unwrap();
            panic!("writer crashed");
        })
        .join();

        let err = storage.latest_report("octocat").unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
