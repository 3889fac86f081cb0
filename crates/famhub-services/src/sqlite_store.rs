//! SQLite implementation of `FamilyBackend`.
//!
//! Mirrors the hosted tables closely enough that either backend can be
//! swapped in through configuration. Attachment blobs live in a `blobs`
//! table and are addressed with `famhub-blob://` URLs.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use famhub_calendar::{DateKey, ScheduleEntry, TimeOfDay};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use uuid::Uuid;

use crate::backend::{FamilyBackend, RepoError, RepoResult};
use crate::types::{
    Attachment, Card, CardBenefit, CardInput, CardSummary, CategoryBenefit, Comment, Company,
    CompanyBenefit, Member, NewAttachment, NewComment, NewPost, NewSchedule, Notice, Post,
    PostUpdate, ScheduleUpdate,
};

const BLOB_URL_PREFIX: &str = "famhub-blob://";

const POST_COLUMNS: &str = "id, title, content, author_id, is_notice, created_at";
const SCHEDULE_COLUMNS: &str = "id, title, schedule_date, schedule_time, author_id";

/// SQLite-based family data store.
pub struct SqliteFamilyStore {
    conn: Connection,
}

impl SqliteFamilyStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path).context("Failed to open family database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests and throwaway sessions.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS family_members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS board_posts (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author_id TEXT NOT NULL,
                is_notice INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS board_comments (
                id TEXT PRIMARY KEY,
                post_id TEXT NOT NULL,
                author_id TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS board_attachments (
                id TEXT PRIMARY KEY,
                post_id TEXT NOT NULL,
                file_name TEXT NOT NULL,
                file_url TEXT NOT NULL,
                file_path TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS family_schedules (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                schedule_date TEXT NOT NULL,
                schedule_time TEXT,
                author_id TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS home_notices (
                author_id TEXT PRIMARY KEY,
                content TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cards (
                id TEXT PRIMARY KEY,
                card_name TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                monthly_requirement TEXT
            );

            CREATE TABLE IF NOT EXISTS card_benefits (
                card_id TEXT NOT NULL,
                category TEXT NOT NULL,
                benefit_description TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS companies (
                id TEXT PRIMARY KEY,
                company_name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS company_benefits (
                company_id TEXT NOT NULL,
                category TEXT NOT NULL,
                content TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS blobs (
                path TEXT PRIMARY KEY,
                content_type TEXT NOT NULL,
                data BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_posts_created ON board_posts(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_comments_post ON board_comments(post_id);
            CREATE INDEX IF NOT EXISTS idx_attachments_post ON board_attachments(post_id);
            CREATE INDEX IF NOT EXISTS idx_schedules_date ON family_schedules(schedule_date);
            CREATE INDEX IF NOT EXISTS idx_card_benefits_card ON card_benefits(card_id);
            CREATE INDEX IF NOT EXISTS idx_card_benefits_category ON card_benefits(category);
            CREATE INDEX IF NOT EXISTS idx_company_benefits_company ON company_benefits(company_id);
            "#,
            )
            .context("Failed to initialize schema")?;
        Ok(())
    }

    /// Add a family member. Members are managed outside the app, so this is
    /// only used to seed a local database.
    pub fn add_member(&self, name: &str) -> RepoResult<Member> {
        let member = Member {
            id: new_id(),
            name: name.to_string(),
        };
        self.conn.execute(
            "INSERT INTO family_members (id, name) VALUES (?1, ?2)",
            params![member.id, member.name],
        )?;
        Ok(member)
    }

    /// Add a company to compare. Seeding only, like `add_member`.
    pub fn add_company(&self, name: &str) -> RepoResult<Company> {
        let company = Company {
            id: new_id(),
            company_name: name.to_string(),
        };
        self.conn.execute(
            "INSERT INTO companies (id, company_name) VALUES (?1, ?2)",
            params![company.id, company.company_name],
        )?;
        Ok(company)
    }

    /// Bytes of an uploaded blob.
    pub fn read_blob(&self, path: &str) -> RepoResult<Option<Vec<u8>>> {
        let data = self
            .conn
            .query_row("SELECT data FROM blobs WHERE path = ?1", params![path], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(data)
    }

    fn query_all<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let items = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn query_one<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<Option<T>> {
        let item = self.conn.query_row(sql, params, map).optional()?;
        Ok(item)
    }

    fn get_schedule(&self, id: &str) -> RepoResult<Option<ScheduleEntry>> {
        self.query_one(
            &format!("SELECT {} FROM family_schedules WHERE id = ?1", SCHEDULE_COLUMNS),
            params![id],
            row_to_schedule,
        )
    }

    fn get_card(&self, id: &str) -> RepoResult<Option<Card>> {
        self.query_one(
            "SELECT id, card_name, owner_id, monthly_requirement FROM cards WHERE id = ?1",
            params![id],
            row_to_card,
        )
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the precision the store keeps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC timestamps so text ordering is chronological.
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn row_to_member(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn row_to_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        is_notice: row.get(4)?,
        created_at: parse_timestamp(row, 5)?,
    })
}

fn row_to_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author_id: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_timestamp(row, 4)?,
    })
}

fn row_to_attachment(row: &Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        file_name: row.get(2)?,
        file_url: row.get(3)?,
        file_path: row.get(4)?,
    })
}

fn row_to_schedule(row: &Row<'_>) -> rusqlite::Result<ScheduleEntry> {
    let date: String = row.get(2)?;
    let time: Option<String> = row.get(3)?;
    Ok(ScheduleEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        date: DateKey::parse(&date).map_err(|e| conversion_error(2, e))?,
        time: match time {
            None => TimeOfDay::AllDay,
            Some(raw) => TimeOfDay::parse(&raw).map_err(|e| conversion_error(3, e))?,
        },
        author_id: row.get(4)?,
    })
}

fn row_to_notice(row: &Row<'_>) -> rusqlite::Result<Notice> {
    Ok(Notice {
        author_id: row.get(0)?,
        content: row.get(1)?,
    })
}

fn row_to_card(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        card_name: row.get(1)?,
        owner_id: row.get(2)?,
        monthly_requirement: row.get(3)?,
    })
}

fn row_to_card_benefit(row: &Row<'_>) -> rusqlite::Result<CardBenefit> {
    Ok(CardBenefit {
        card_id: row.get(0)?,
        category: row.get(1)?,
        benefit_description: row.get(2)?,
    })
}

fn row_to_category_benefit(row: &Row<'_>) -> rusqlite::Result<CategoryBenefit> {
    let card_name: Option<String> = row.get(3)?;
    let owner_id: Option<String> = row.get(4)?;
    let cards = match (card_name, owner_id) {
        (Some(card_name), Some(owner_id)) => Some(CardSummary {
            card_name,
            owner_id,
            monthly_requirement: row.get(5)?,
        }),
        _ => None,
    };
    Ok(CategoryBenefit {
        card_id: row.get(0)?,
        category: row.get(1)?,
        benefit_description: row.get(2)?,
        cards,
    })
}

fn row_to_company(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        company_name: row.get(1)?,
    })
}

fn row_to_company_benefit(row: &Row<'_>) -> rusqlite::Result<CompanyBenefit> {
    Ok(CompanyBenefit {
        company_id: row.get(0)?,
        category: row.get(1)?,
        content: row.get(2)?,
    })
}

impl FamilyBackend for SqliteFamilyStore {
    fn list_members(&self) -> RepoResult<Vec<Member>> {
        self.query_all(
            "SELECT id, name FROM family_members ORDER BY rowid",
            [],
            row_to_member,
        )
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        self.query_all(
            &format!(
                "SELECT {} FROM board_posts ORDER BY created_at DESC, rowid DESC",
                POST_COLUMNS
            ),
            [],
            row_to_post,
        )
    }

    fn recent_posts(&self, limit: usize) -> RepoResult<Vec<Post>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_all(
            &format!(
                "SELECT {} FROM board_posts ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                POST_COLUMNS
            ),
            params![limit],
            row_to_post,
        )
    }

    fn get_post(&self, id: &str) -> RepoResult<Option<Post>> {
        self.query_one(
            &format!("SELECT {} FROM board_posts WHERE id = ?1", POST_COLUMNS),
            params![id],
            row_to_post,
        )
    }

    fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        post.validate()?;

        let created = Post {
            id: new_id(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id.clone(),
            is_notice: post.is_notice,
            created_at: now(),
        };
        self.conn.execute(
            "INSERT INTO board_posts (id, title, content, author_id, is_notice, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                created.id,
                created.title,
                created.content,
                created.author_id,
                created.is_notice,
                timestamp(created.created_at)
            ],
        )?;

        tracing::debug!("Created post {}", created.id);
        Ok(created)
    }

    fn update_post(&self, id: &str, update: &PostUpdate) -> RepoResult<Post> {
        update.validate()?;

        let changed = self.conn.execute(
            "UPDATE board_posts SET title = ?1, content = ?2 WHERE id = ?3",
            params![update.title, update.content, id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(format!("post {}", id)));
        }
        self.get_post(id)?
            .ok_or_else(|| RepoError::not_found(format!("post {}", id)))
    }

    fn delete_post(&self, id: &str) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM board_comments WHERE post_id = ?1", params![id])?;
        tx.execute("DELETE FROM board_attachments WHERE post_id = ?1", params![id])?;
        tx.execute("DELETE FROM board_posts WHERE id = ?1", params![id])?;
        tx.commit()?;

        tracing::debug!("Deleted post {}", id);
        Ok(())
    }

    fn comment_counts(&self) -> RepoResult<HashMap<String, usize>> {
        let rows = self.query_all(
            "SELECT post_id, COUNT(*) FROM board_comments GROUP BY post_id",
            [],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )?;
        Ok(rows
            .into_iter()
            .map(|(post_id, n)| (post_id, usize::try_from(n).unwrap_or(0)))
            .collect())
    }

    fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        self.query_all(
            "SELECT id, post_id, author_id, content, created_at FROM board_comments
             WHERE post_id = ?1 ORDER BY created_at, rowid",
            params![post_id],
            row_to_comment,
        )
    }

    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment> {
        comment.validate()?;

        let created = Comment {
            id: new_id(),
            post_id: comment.post_id.clone(),
            author_id: comment.author_id.clone(),
            content: comment.content.clone(),
            created_at: now(),
        };
        self.conn.execute(
            "INSERT INTO board_comments (id, post_id, author_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created.id,
                created.post_id,
                created.author_id,
                created.content,
                timestamp(created.created_at)
            ],
        )?;
        Ok(created)
    }

    fn delete_comment(&self, id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM board_comments WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_attachments(&self, post_id: &str) -> RepoResult<Vec<Attachment>> {
        self.query_all(
            "SELECT id, post_id, file_name, file_url, file_path FROM board_attachments
             WHERE post_id = ?1 ORDER BY rowid",
            params![post_id],
            row_to_attachment,
        )
    }

    fn add_attachment(&self, attachment: &NewAttachment) -> RepoResult<Attachment> {
        let created = Attachment {
            id: new_id(),
            post_id: attachment.post_id.clone(),
            file_name: attachment.file_name.clone(),
            file_url: attachment.file_url.clone(),
            file_path: attachment.file_path.clone(),
        };
        self.conn.execute(
            "INSERT INTO board_attachments (id, post_id, file_name, file_url, file_path)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created.id,
                created.post_id,
                created.file_name,
                created.file_url,
                created.file_path
            ],
        )?;
        Ok(created)
    }

    fn list_schedules(&self, start: DateKey, end: DateKey) -> RepoResult<Vec<ScheduleEntry>> {
        self.query_all(
            &format!(
                "SELECT {} FROM family_schedules
                 WHERE schedule_date >= ?1 AND schedule_date <= ?2
                 ORDER BY schedule_date, rowid",
                SCHEDULE_COLUMNS
            ),
            params![start.to_string(), end.to_string()],
            row_to_schedule,
        )
    }

    fn create_schedule(&self, schedule: &NewSchedule) -> RepoResult<ScheduleEntry> {
        let created = ScheduleEntry {
            id: new_id(),
            title: schedule.title.clone(),
            date: schedule.schedule_date,
            time: schedule.schedule_time,
            author_id: schedule.author_id.clone(),
        };
        self.conn.execute(
            "INSERT INTO family_schedules (id, title, schedule_date, schedule_time, author_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                created.id,
                created.title,
                created.date.to_string(),
                created.time.to_string(),
                created.author_id
            ],
        )?;

        tracing::debug!("Created schedule {} on {}", created.id, created.date);
        Ok(created)
    }

    fn update_schedule(&self, id: &str, update: &ScheduleUpdate) -> RepoResult<ScheduleEntry> {
        let changed = self.conn.execute(
            "UPDATE family_schedules SET title = ?1, schedule_time = ?2 WHERE id = ?3",
            params![update.title, update.schedule_time.to_string(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(format!("schedule {}", id)));
        }
        self.get_schedule(id)?
            .ok_or_else(|| RepoError::not_found(format!("schedule {}", id)))
    }

    fn delete_schedule(&self, id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM family_schedules WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_notices(&self) -> RepoResult<Vec<Notice>> {
        self.query_all(
            "SELECT author_id, content FROM home_notices ORDER BY rowid",
            [],
            row_to_notice,
        )
    }

    fn upsert_notice(&self, notice: &Notice) -> RepoResult<Notice> {
        self.conn.execute(
            "INSERT INTO home_notices (author_id, content) VALUES (?1, ?2)
             ON CONFLICT(author_id) DO UPDATE SET content = excluded.content",
            params![notice.author_id, notice.content],
        )?;
        Ok(notice.clone())
    }

    fn list_cards(&self) -> RepoResult<Vec<Card>> {
        self.query_all(
            "SELECT id, card_name, owner_id, monthly_requirement FROM cards ORDER BY card_name",
            [],
            row_to_card,
        )
    }

    fn create_card(&self, card: &CardInput) -> RepoResult<Card> {
        card.validate()?;

        let created = Card {
            id: new_id(),
            card_name: card.card_name.clone(),
            owner_id: card.owner_id.clone(),
            monthly_requirement: card.monthly_requirement.clone(),
        };
        self.conn.execute(
            "INSERT INTO cards (id, card_name, owner_id, monthly_requirement)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                created.id,
                created.card_name,
                created.owner_id,
                created.monthly_requirement
            ],
        )?;
        Ok(created)
    }

    fn update_card(&self, id: &str, card: &CardInput) -> RepoResult<Card> {
        card.validate()?;

        let changed = self.conn.execute(
            "UPDATE cards SET card_name = ?1, owner_id = ?2, monthly_requirement = ?3
             WHERE id = ?4",
            params![card.card_name, card.owner_id, card.monthly_requirement, id],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(format!("card {}", id)));
        }
        self.get_card(id)?
            .ok_or_else(|| RepoError::not_found(format!("card {}", id)))
    }

    fn delete_card(&self, id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn card_benefits(&self, card_id: &str) -> RepoResult<Vec<CardBenefit>> {
        self.query_all(
            "SELECT card_id, category, benefit_description FROM card_benefits
             WHERE card_id = ?1 ORDER BY rowid",
            params![card_id],
            row_to_card_benefit,
        )
    }

    fn benefits_by_category(&self, category: &str) -> RepoResult<Vec<CategoryBenefit>> {
        self.query_all(
            "SELECT b.card_id, b.category, b.benefit_description,
                    c.card_name, c.owner_id, c.monthly_requirement
             FROM card_benefits b LEFT JOIN cards c ON c.id = b.card_id
             WHERE b.category = ?1 ORDER BY b.rowid",
            params![category],
            row_to_category_benefit,
        )
    }

    fn delete_card_benefits(&self, card_id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM card_benefits WHERE card_id = ?1", params![card_id])?;
        Ok(())
    }

    fn insert_card_benefits(&self, rows: &[CardBenefit]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO card_benefits (card_id, category, benefit_description)
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![row.card_id, row.category, row.benefit_description])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn list_companies(&self) -> RepoResult<Vec<Company>> {
        self.query_all(
            "SELECT id, company_name FROM companies ORDER BY company_name",
            [],
            row_to_company,
        )
    }

    fn list_company_benefits(&self) -> RepoResult<Vec<CompanyBenefit>> {
        self.query_all(
            "SELECT company_id, category, content FROM company_benefits ORDER BY rowid",
            [],
            row_to_company_benefit,
        )
    }

    fn company_benefits(&self, company_id: &str) -> RepoResult<Vec<CompanyBenefit>> {
        self.query_all(
            "SELECT company_id, category, content FROM company_benefits
             WHERE company_id = ?1 ORDER BY rowid",
            params![company_id],
            row_to_company_benefit,
        )
    }

    fn delete_company_benefits(&self, company_id: &str) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM company_benefits WHERE company_id = ?1",
            params![company_id],
        )?;
        Ok(())
    }

    fn insert_company_benefits(&self, rows: &[CompanyBenefit]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO company_benefits (company_id, category, content) VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![row.company_id, row.category, row.content])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upload_blob(&self, path: &str, data: &[u8], content_type: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO blobs (path, content_type, data) VALUES (?1, ?2, ?3)",
            params![path, content_type, data],
        )?;
        tracing::debug!("Stored blob {} ({} bytes)", path, data.len());
        Ok(())
    }

    fn remove_blobs(&self, paths: &[String]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM blobs WHERE path = ?1")?;
            for path in paths {
                stmt.execute(params![path])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}{}", BLOB_URL_PREFIX, path)
    }
}
