//! Repository for the `issues` table and its vote bookkeeping.
//!
//! Vote mutations run in a transaction holding a row lock on the issue so
//! the toggle decision, the `issue_votes` change, and the score recompute
//! are atomic under concurrent voters. The `(issue_id, user_id)` primary
//! key on `issue_votes` backstops the one-vote-per-actor invariant at the
//! schema level.

use sqlx::{PgExecutor, PgPool};

use communityfix_core::issue::{plan_vote, VoteAction, VoteType};
use communityfix_core::policy::IssueScope;
use communityfix_core::types::DbId;

use crate::models::issue::{CreateIssue, Issue, IssueFilter, UpdateIssue};

/// Column list for `issues` queries (alias `i`), with the vote sets
/// materialized from `issue_votes`.
const COLUMNS: &str = "\
    i.id, i.title, i.description, i.category, i.status, i.priority, \
    i.address, i.lat, i.lng, i.images, i.verification_images, \
    i.reporter_id, i.department_id, i.assigned_user_id, i.vote_score, \
    i.created_at, i.updated_at, \
    ARRAY(SELECT v.user_id FROM issue_votes v \
          WHERE v.issue_id = i.id AND v.vote_type = 'upvote' \
          ORDER BY v.created_at) AS upvotes, \
    ARRAY(SELECT v.user_id FROM issue_votes v \
          WHERE v.issue_id = i.id AND v.vote_type = 'downvote' \
          ORDER BY v.created_at) AS downvotes";

/// Recompute `vote_score` from the vote rows, in the same transaction as
/// the vote mutation. The score is never written from user input.
const RECOMPUTE_SCORE: &str = "\
    UPDATE issues SET \
        vote_score = (SELECT COALESCE(SUM(CASE WHEN vote_type = 'upvote' THEN 1 ELSE -1 END), 0) \
                      FROM issue_votes WHERE issue_id = $1), \
        updated_at = NOW() \
    WHERE id = $1";

/// Provides CRUD and lifecycle operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Fetch the full issue row (vote sets included) by id.
    async fn fetch<'e, E>(executor: E, id: DbId) -> Result<Option<Issue>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM issues i WHERE i.id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new issue, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateIssue) -> Result<Issue, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO issues \
                (title, description, category, priority, address, lat, lng, \
                 images, reporter_id, department_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.priority)
        .bind(&input.address)
        .bind(input.lat)
        .bind(input.lng)
        .bind(&input.images)
        .bind(input.reporter_id)
        .bind(input.department_id)
        .fetch_one(&mut *tx)
        .await?;

        let issue = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;

        // The row was just inserted inside this transaction.
        issue.ok_or(sqlx::Error::RowNotFound)
    }

    /// Find an issue by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        Self::fetch(pool, id).await
    }

    /// Build the WHERE clause shared by `list` and `count`.
    ///
    /// Returns the clause and the next free parameter index. Bind order
    /// must match: scope first, then status, category, priority, search.
    fn where_clause(filter: &IssueFilter, scope: &IssueScope) -> (String, usize) {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        match scope {
            IssueScope::All => {}
            IssueScope::Department(_) => {
                conditions.push(format!(
                    "i.department_id = (SELECT d.id FROM departments d WHERE d.name = ${param_idx})"
                ));
                param_idx += 1;
            }
            IssueScope::Reporter(_) => {
                conditions.push(format!("i.reporter_id = ${param_idx}"));
                param_idx += 1;
            }
        }

        if filter.status.is_some() {
            conditions.push(format!("i.status = ${param_idx}"));
            param_idx += 1;
        }
        if filter.category.is_some() {
            conditions.push(format!("i.category = ${param_idx}"));
            param_idx += 1;
        }
        if filter.priority.is_some() {
            conditions.push(format!("i.priority = ${param_idx}"));
            param_idx += 1;
        }
        if filter.search.is_some() {
            conditions.push(format!(
                "(i.title ILIKE ${param_idx} ESCAPE '\\' OR i.description ILIKE ${param_idx} ESCAPE '\\')"
            ));
            param_idx += 1;
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        (clause, param_idx)
    }

    fn bind_scope_and_filter<'q, O>(
        mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
        filter: &'q IssueFilter,
        scope: &'q IssueScope,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
        match scope {
            IssueScope::All => {}
            IssueScope::Department(dept) => q = q.bind(dept.name()),
            IssueScope::Reporter(reporter_id) => q = q.bind(reporter_id),
        }
        if let Some(ref s) = filter.status {
            q = q.bind(s);
        }
        if let Some(ref c) = filter.category {
            q = q.bind(c);
        }
        if let Some(ref p) = filter.priority {
            q = q.bind(p);
        }
        if let Some(ref pat) = filter.search {
            q = q.bind(pat);
        }
        q
    }

    /// List issues matching the filter within the visibility scope,
    /// newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &IssueFilter,
        scope: &IssueScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Issue>, sqlx::Error> {
        let (where_clause, param_idx) = Self::where_clause(filter, scope);
        let query = format!(
            "SELECT {COLUMNS} FROM issues i {where_clause} \
             ORDER BY i.created_at DESC, i.id DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let q = sqlx::query_as::<_, Issue>(&query);
        let q = Self::bind_scope_and_filter(q, filter, scope);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Total number of issues matching the filter within the scope.
    pub async fn count(
        pool: &PgPool,
        filter: &IssueFilter,
        scope: &IssueScope,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::where_clause(filter, scope);
        let query = format!("SELECT COUNT(*) FROM issues i {where_clause}");

        let q = sqlx::query_as::<_, (i64,)>(&query);
        let q = Self::bind_scope_and_filter(q, filter, scope);
        let (total,) = q.fetch_one(pool).await?;
        Ok(total)
    }

    /// Apply a field update. Only non-`None` fields in `input` are
    /// applied. Returns the updated row, or `None` if the issue is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE issues SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                address = COALESCE($6, address),
                lat = COALESCE($7, lat),
                lng = COALESCE($8, lng),
                images = COALESCE($9, images),
                department_id = COALESCE($10, department_id),
                assigned_user_id = COALESCE($11, assigned_user_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.priority)
        .bind(&input.address)
        .bind(input.lat)
        .bind(input.lng)
        .bind(&input.images)
        .bind(input.department_id)
        .bind(input.assigned_user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let issue = match updated {
            Some(id) => Self::fetch(&mut *tx, id).await?,
            None => None,
        };
        tx.commit().await?;
        Ok(issue)
    }

    /// Transition an issue's status and append the mandatory note, in one
    /// transaction. Guards (policy, transition table, note validation)
    /// are the caller's responsibility.
    ///
    /// `author_id` is `None` for system-authored notes.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
        author_id: Option<DbId>,
        note: &str,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE issues SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(new_status)
        .fetch_optional(&mut *tx)
        .await?;

        let issue = match updated {
            Some(id) => {
                sqlx::query("INSERT INTO issue_notes (issue_id, author_id, note) VALUES ($1, $2, $3)")
                    .bind(id)
                    .bind(author_id)
                    .bind(note)
                    .execute(&mut *tx)
                    .await?;
                Self::fetch(&mut *tx, id).await?
            }
            None => None,
        };
        tx.commit().await?;
        Ok(issue)
    }

    /// Attach verification evidence and move the issue to `verification`,
    /// appending the optional department note in the same transaction.
    pub async fn attach_verification(
        pool: &PgPool,
        id: DbId,
        images: &[String],
        author_id: DbId,
        note: Option<&str>,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE issues SET verification_images = $2, status = 'verification', updated_at = NOW() \
             WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(images)
        .fetch_optional(&mut *tx)
        .await?;

        let issue = match updated {
            Some(id) => {
                if let Some(note) = note {
                    sqlx::query(
                        "INSERT INTO issue_notes (issue_id, author_id, note) VALUES ($1, $2, $3)",
                    )
                    .bind(id)
                    .bind(author_id)
                    .bind(note)
                    .execute(&mut *tx)
                    .await?;
                }
                Self::fetch(&mut *tx, id).await?
            }
            None => None,
        };
        tx.commit().await?;
        Ok(issue)
    }

    /// Apply a vote with toggle semantics and recompute the score, all in
    /// one transaction holding a row lock on the issue.
    ///
    /// Returns the updated issue, or `None` if the issue does not exist.
    pub async fn vote(
        pool: &PgPool,
        issue_id: DbId,
        user_id: DbId,
        requested: VoteType,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the issue row: serializes concurrent votes on this issue.
        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM issues WHERE id = $1 FOR UPDATE")
                .bind(issue_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT vote_type FROM issue_votes WHERE issue_id = $1 AND user_id = $2",
        )
        .bind(issue_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let existing_vote: Option<VoteType> = existing.as_deref().and_then(|s| s.parse().ok());

        match plan_vote(existing_vote, requested) {
            VoteAction::Add(vote) => {
                sqlx::query(
                    "INSERT INTO issue_votes (issue_id, user_id, vote_type) VALUES ($1, $2, $3)",
                )
                .bind(issue_id)
                .bind(user_id)
                .bind(vote.as_str())
                .execute(&mut *tx)
                .await?;
            }
            VoteAction::Retract => {
                sqlx::query("DELETE FROM issue_votes WHERE issue_id = $1 AND user_id = $2")
                    .bind(issue_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            VoteAction::Switch(vote) => {
                sqlx::query(
                    "UPDATE issue_votes SET vote_type = $3 WHERE issue_id = $1 AND user_id = $2",
                )
                .bind(issue_id)
                .bind(user_id)
                .bind(vote.as_str())
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(RECOMPUTE_SCORE)
            .bind(issue_id)
            .execute(&mut *tx)
            .await?;

        let issue = Self::fetch(&mut *tx, issue_id).await?;
        tx.commit().await?;
        Ok(issue)
    }

    /// Hard-delete an issue (votes, notes, and comments cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
