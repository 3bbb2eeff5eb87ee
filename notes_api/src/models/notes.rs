use bon::Builder;
use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, PartialEq, Queryable, Selectable, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note ID.
    pub id: i32,
    /// Note title, unique across all notes ignoring case.
    pub title: String,
    /// Note content.
    pub content: String,
    /// Datetime the note was created in ISO format.
    pub created_at: DateTime<Utc>,
    /// Datetime the note was last updated in ISO format.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Overwrite fields with any non-empty trimmed values from `updates`.
    ///
    /// Empty, whitespace-only, and omitted values all count as "no value
    /// supplied", so a field cannot be blanked out through an update.
    pub fn update(&mut self, updates: NoteUpdates) {
        if let Some(title) = normalized(updates.title) {
            self.title = title;
        }
        if let Some(content) = normalized(updates.content) {
            self.content = content;
        }
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Insertable shape of a note; doubles as the changeset for updates. The
/// timestamps fall back to the column defaults when left unset.
#[derive(AsChangeset, Insertable)]
#[diesel(table_name = crate::schema::notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Builder, Deserialize, Serialize, ToSchema)]
pub struct NewNoteRequest {
    /// Note title to add.
    pub title: String,
    /// Note content to add.
    pub content: String,
}

#[derive(Builder, Deserialize, Serialize, ToSchema)]
pub struct NoteUpdates {
    /// New note title. Empty or omitted keeps the stored title.
    pub title: Option<String>,
    /// New note content. Empty or omitted keeps the stored content.
    pub content: Option<String>,
}
