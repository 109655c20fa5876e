//! Wire models for the sync endpoint.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::spaces::Space;
use crate::tags::Tag;
use crate::tasks::Task;
use crate::templates::RepetitiveTaskTemplate;

/// Cursor value meaning "send everything the user has".
pub const INITIAL_CURSOR: i64 = 0;

/// Parse a client-supplied cursor string.
///
/// Absent or blank means [`INITIAL_CURSOR`]; anything that is not a
/// non-negative integer is rejected before any store access happens.
pub fn parse_cursor(raw: Option<&str>) -> Result<i64> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(INITIAL_CURSOR);
    };
    match value.parse::<i64>() {
        Ok(cursor) if cursor >= 0 => Ok(cursor),
        _ => Err(Error::invalid_cursor(format!(
            "'{}' is not a non-negative integer",
            value
        ))),
    }
}

/// Response aggregate for one sync call.
///
/// `latest_change_id` is the new client cursor: the maximum sequence id
/// observed in the batch, or the input cursor unchanged when nothing new
/// exists. Entity groups are omitted from the JSON body when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub latest_change_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<Space>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitive_task_templates: Option<Vec<RepetitiveTaskTemplate>>,
}

impl SyncResult {
    /// An "already up to date" result for the given cursor.
    pub fn up_to_date(cursor: i64) -> Self {
        Self {
            latest_change_id: cursor,
            tasks: None,
            tags: None,
            spaces: None,
            repetitive_task_templates: None,
        }
    }
}
