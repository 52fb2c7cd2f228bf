use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskDraft, TaskId, TaskStatus, TaskUpdate};
use crate::ports::StoreError;

/// Task as the store serves it. Ids may arrive as JSON numbers or
/// strings; both are opaque and normalized to a string. `status` is kept
/// raw here so that an out-of-set value rejects the whole payload during
/// normalization instead of being coerced.
#[derive(Debug, Deserialize)]
pub struct TaskDto {
    pub id: RawId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for TaskId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => TaskId(n.to_string()),
            RawId::Text(s) => TaskId(s),
        }
    }
}

// Request DTOs
#[derive(Debug, Serialize)]
pub struct TaskCreateDto {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskUpdateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl From<&TaskDraft> for TaskCreateDto {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
        }
    }
}

impl From<&TaskUpdate> for TaskUpdateDto {
    fn from(update: &TaskUpdate) -> Self {
        Self {
            title: update.title.clone(),
            description: update.description.clone(),
            status: update.status,
        }
    }
}

impl TryFrom<TaskDto> for Task {
    type Error = StoreError;

    fn try_from(dto: TaskDto) -> Result<Self, Self::Error> {
        let status = dto
            .status
            .parse::<TaskStatus>()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(Task {
            id: dto.id.into(),
            title: dto.title,
            description: dto.description,
            status,
            created_at: parse_timestamp(dto.created_at.as_deref()),
            updated_at: parse_timestamp(dto.updated_at.as_deref()),
        })
    }
}

/// The store emits RFC 3339 timestamps, but naive ones (no offset) show
/// up too and are read as UTC. Anything else is treated as absent, which
/// keeps the task out of the time-filtered views.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    tracing::warn!("Unparseable timestamp from store: {raw}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_and_string_ids_normalize_to_the_same_form() {
        let numeric: TaskDto =
            serde_json::from_str(r#"{"id": 7, "title": "a", "status": "pending"}"#).unwrap();
        let stringy: TaskDto =
            serde_json::from_str(r#"{"id": "7", "title": "a", "status": "pending"}"#).unwrap();

        let a = Task::try_from(numeric).unwrap();
        let b = Task::try_from(stringy).unwrap();
        assert_eq!(a.id, TaskId::from("7"));
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn full_payload_normalizes() {
        let dto: TaskDto = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "water the plants",
                "description": "the ones on the balcony",
                "status": "in_progress",
                "created_at": "2026-08-05T09:30:00+00:00",
                "updated_at": null
            }"#,
        )
        .unwrap();

        let task = Task::try_from(dto).unwrap();
        assert_eq!(task.title, "water the plants");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(
            task.created_at,
            Some(Utc.with_ymd_and_hms(2026, 8, 5, 9, 30, 0).unwrap())
        );
        assert_eq!(task.updated_at, None);
    }

    #[test]
    fn unknown_status_rejects_the_payload() {
        let dto: TaskDto =
            serde_json::from_str(r#"{"id": 1, "title": "a", "status": "urgent"}"#).unwrap();
        let err = Task::try_from(dto).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        assert_eq!(
            parse_timestamp(Some("2026-08-05T09:30:00")),
            Some(Utc.with_ymd_and_hms(2026, 8, 5, 9, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp(Some("2026-08-05T09:30:00.250000")),
            Some(
                Utc.with_ymd_and_hms(2026, 8, 5, 9, 30, 0).unwrap()
                    + chrono::Duration::milliseconds(250)
            )
        );
    }

    #[test]
    fn unparseable_timestamp_becomes_absent() {
        assert_eq!(parse_timestamp(Some("last tuesday")), None);
        assert_eq!(parse_timestamp(None), None);
    }

    #[test]
    fn update_dto_omits_unset_fields() {
        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let json = serde_json::to_string(&TaskUpdateDto::from(&update)).unwrap();
        assert_eq!(json, r#"{"status":"completed"}"#);
    }

    #[test]
    fn update_dto_can_clear_the_description() {
        let update = TaskUpdate {
            description: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&TaskUpdateDto::from(&update)).unwrap();
        assert_eq!(json, r#"{"description":null}"#);
    }
}
