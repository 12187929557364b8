/// Task model and database operations
///
/// Tasks always carry both a project and a workspace reference; the
/// workflows enforce that the project belongs to the same workspace and
/// that any assignee is already a member of that workspace.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('BACKLOG', 'TODO', 'IN_PROGRESS', 'IN_REVIEW', 'DONE');
/// CREATE TYPE task_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_code VARCHAR(32) NOT NULL UNIQUE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     status task_status NOT NULL DEFAULT 'TODO',
///     priority task_priority NOT NULL DEFAULT 'MEDIUM',
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_by UUID NOT NULL REFERENCES users(id),
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::ids::generate_task_code;
use crate::pagination::PageRequest;

const TASK_COLUMNS: &str = "id, task_code, title, description, project_id, workspace_id, \
     status, priority, assigned_to, created_by, due_date, created_at, updated_at";

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "BACKLOG",
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Done => "DONE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "BACKLOG" => Some(TaskStatus::Backlog),
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "IN_REVIEW" => Some(TaskStatus::InReview),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(TaskPriority::Low),
            "MEDIUM" => Some(TaskPriority::Medium),
            "HIGH" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Whether a task counts as overdue at `now`
///
/// A task is overdue when it has a due date in the past and is not DONE.
/// Analytics evaluates this at request time; nothing is cached.
pub fn is_overdue(status: TaskStatus, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match due_date {
        Some(due) => status != TaskStatus::Done && due < now,
        None => false,
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    /// Short unique code, e.g. `task-8d41a0c9`
    pub task_code: String,

    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Uuid,
    pub workspace_id: Uuid,
    /// Defaults to TODO when absent
    pub status: Option<TaskStatus>,
    /// Defaults to MEDIUM when absent
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub due_date: Option<DateTime<Utc>>,
}

/// Full-overwrite input for updating a task
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Conjunctive filter predicates for task listing
#[derive(Debug, Clone, Default)]
pub struct TaskFilters {
    pub project_id: Option<Uuid>,
    pub status: Vec<TaskStatus>,
    pub priority: Vec<TaskPriority>,
    pub assigned_to: Vec<Uuid>,
    /// Case-insensitive substring match on the title
    pub keyword: Option<String>,
    /// Exact due-date match
    pub due_date: Option<DateTime<Utc>>,
}

/// Count-based task analytics, recomputed per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalytics {
    pub total_tasks: i64,
    pub overdue_tasks: i64,
    pub completed_tasks: i64,
}

impl Task {
    /// Creates a task with a freshly generated task code
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (task_code, title, description, project_id, workspace_id,
                                status, priority, assigned_to, created_by, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(generate_task_code())
            .bind(data.title)
            .bind(data.description)
            .bind(data.project_id)
            .bind(data.workspace_id)
            .bind(data.status.unwrap_or(TaskStatus::Todo))
            .bind(data.priority.unwrap_or(TaskPriority::Medium))
            .bind(data.assigned_to)
            .bind(data.created_by)
            .bind(data.due_date)
            .fetch_one(executor)
            .await
    }

    /// Finds a task scoped to its project and workspace
    pub async fn find_scoped(
        executor: impl PgExecutor<'_>,
        task_id: Uuid,
        project_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE id = $1 AND project_id = $2 AND workspace_id = $3"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .bind(workspace_id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a task by id within a workspace
    pub async fn find_in_workspace(
        executor: impl PgExecutor<'_>,
        task_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND workspace_id = $2");

        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(workspace_id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrites a task's mutable fields
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks
             SET title = $2, description = $3, status = $4, priority = $5,
                 assigned_to = $6, due_date = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.assigned_to)
            .bind(data.due_date)
            .fetch_optional(executor)
            .await
    }

    /// One page of a workspace's tasks matching the filters, newest first
    ///
    /// Returns the page together with the total count of matching rows.
    pub async fn list(
        pool: &sqlx::PgPool,
        workspace_id: Uuid,
        filters: &TaskFilters,
        page: PageRequest,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut query = QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));
        push_filters(&mut query, workspace_id, filters);
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(page.page_size);
        query.push(" OFFSET ");
        query.push_bind(page.skip());

        let tasks = query.build_query_as::<Task>().fetch_all(pool).await?;

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM tasks");
        push_filters(&mut count_query, workspace_id, filters);

        let (total_count,): (i64,) = count_query.build_query_as().fetch_one(pool).await?;

        Ok((tasks, total_count))
    }

    /// Deletes a task within a workspace
    pub async fn delete_in_workspace(
        executor: impl PgExecutor<'_>,
        task_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND workspace_id = $2")
            .bind(task_id)
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every task scoped to a workspace (teardown)
    pub async fn delete_by_workspace(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every task in a project
    pub async fn delete_by_project(
        executor: impl PgExecutor<'_>,
        project_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count-based analytics for a workspace, optionally narrowed to one
    /// project
    ///
    /// Overdue = due date before `now` and status ≠ DONE. Evaluated fresh
    /// on every call.
    pub async fn analytics(
        executor: impl PgExecutor<'_>,
        workspace_id: Uuid,
        project_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<TaskAnalytics, sqlx::Error> {
        let (total_tasks, overdue_tasks, completed_tasks): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE due_date < $3 AND status <> 'DONE'),
                COUNT(*) FILTER (WHERE status = 'DONE')
            FROM tasks
            WHERE workspace_id = $1 AND ($2::uuid IS NULL OR project_id = $2)
            "#,
        )
        .bind(workspace_id)
        .bind(project_id)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(TaskAnalytics {
            total_tasks,
            overdue_tasks,
            completed_tasks,
        })
    }
}

/// Appends the WHERE clause shared by the page and count queries
fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    workspace_id: Uuid,
    filters: &TaskFilters,
) {
    query.push(" WHERE workspace_id = ");
    query.push_bind(workspace_id);

    if let Some(project_id) = filters.project_id {
        query.push(" AND project_id = ");
        query.push_bind(project_id);
    }

    if !filters.status.is_empty() {
        let statuses: Vec<String> = filters.status.iter().map(|s| s.as_str().to_string()).collect();
        query.push(" AND status::text = ANY(");
        query.push_bind(statuses);
        query.push(")");
    }

    if !filters.priority.is_empty() {
        let priorities: Vec<String> = filters
            .priority
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        query.push(" AND priority::text = ANY(");
        query.push_bind(priorities);
        query.push(")");
    }

    if !filters.assigned_to.is_empty() {
        query.push(" AND assigned_to = ANY(");
        query.push_bind(filters.assigned_to.clone());
        query.push(")");
    }

    if let Some(keyword) = &filters.keyword {
        query.push(" AND title ILIKE ");
        query.push_bind(format!("%{}%", keyword));
    }

    if let Some(due_date) = filters.due_date {
        query.push(" AND due_date = ");
        query.push_bind(due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            TaskStatus::Backlog,
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::InReview,
            TaskStatus::Done,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("SHIPPED"), None);
    }

    #[test]
    fn test_priority_parse_roundtrip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::parse("URGENT"), None);
    }

    #[test]
    fn test_overdue_classification() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        let future = Some(now + Duration::days(1));

        // past due and not done → overdue
        assert!(is_overdue(TaskStatus::Todo, past, now));
        assert!(is_overdue(TaskStatus::InProgress, past, now));

        // done tasks are never overdue
        assert!(!is_overdue(TaskStatus::Done, past, now));

        // future or absent due dates are not overdue
        assert!(!is_overdue(TaskStatus::InProgress, future, now));
        assert!(!is_overdue(TaskStatus::Todo, None, now));
    }

    #[test]
    fn test_analytics_example_scenario() {
        // statuses {DONE×2, TODO×1 past due, IN_PROGRESS×1 future due}
        let now = Utc::now();
        let tasks = [
            (TaskStatus::Done, None),
            (TaskStatus::Done, None),
            (TaskStatus::Todo, Some(now - Duration::hours(3))),
            (TaskStatus::InProgress, Some(now + Duration::hours(3))),
        ];

        let total = tasks.len() as i64;
        let completed = tasks.iter().filter(|(s, _)| *s == TaskStatus::Done).count() as i64;
        let overdue = tasks
            .iter()
            .filter(|(s, due)| is_overdue(*s, *due, now))
            .count() as i64;

        assert_eq!(
            TaskAnalytics {
                total_tasks: total,
                overdue_tasks: overdue,
                completed_tasks: completed,
            },
            TaskAnalytics {
                total_tasks: 4,
                overdue_tasks: 1,
                completed_tasks: 2,
            }
        );
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(json, "IN_PROGRESS");
        let parsed: TaskStatus = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }
}
