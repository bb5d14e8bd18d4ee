//! Comment repository contracts and SQLite implementation.
//!
//! Comments are append-only: there is no update or delete path. Rows keep
//! their `lead_id` even after the lead itself is deleted.

use super::{ensure_connection_ready, parse_uuid, RepoResult};
use crate::model::comment::{Comment, CommentId};
use crate::model::lead::LeadId;
use rusqlite::{params, Connection, Row};

/// Repository interface for lead comments.
pub trait CommentRepository {
    fn create_comment(&self, comment: &Comment) -> RepoResult<CommentId>;
    /// Lists comments bound to `lead` in insertion order.
    fn list_comments_for_lead(&self, lead: LeadId) -> RepoResult<Vec<Comment>>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, comment: &Comment) -> RepoResult<CommentId> {
        self.conn.execute(
            "INSERT INTO comments (id, lead_id, author_id, comment_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                comment.id.to_string(),
                comment.lead.to_string(),
                comment.author.map(|author| author.to_string()),
                comment.comment_text.as_str(),
                comment.created_at,
            ],
        )?;
        Ok(comment.id)
    }

    fn list_comments_for_lead(&self, lead: LeadId) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, author_id, comment_text, created_at
             FROM comments
             WHERE lead_id = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([lead.to_string()])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let id_text: String = row.get("id")?;
    let lead_text: String = row.get("lead_id")?;
    let author = match row.get::<_, Option<String>>("author_id")? {
        Some(value) => Some(parse_uuid(&value, "comments.author_id")?),
        None => None,
    };

    Ok(Comment {
        id: parse_uuid(&id_text, "comments.id")?,
        lead: parse_uuid(&lead_text, "comments.lead_id")?,
        author,
        comment_text: row.get("comment_text")?,
        created_at: row.get("created_at")?,
    })
}
