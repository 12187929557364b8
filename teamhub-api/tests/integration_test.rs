/// Integration tests for the Teamhub API
///
/// These tests verify the system end-to-end:
/// - Registration and login over HTTP
/// - The JWT gate on protected routes
/// - Permission checks per workspace role
/// - Project and task flows with the success envelope
///
/// They require a running PostgreSQL database (DATABASE_URL) and a
/// JWT_SECRET in the environment.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use teamhub_shared::auth::permissions::PERMISSION_DENIED_MESSAGE;
use tower::Service as _;
use uuid::Uuid;

async fn send(
    ctx: &TestContext,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("flow-{}@example.com", Uuid::new_v4());

    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Flow User",
                "email": email,
                "password": "SecureP@ss123"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["status"], "success");

    // Registering the same email again conflicts
    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Flow User",
                "email": email,
                "password": "SecureP@ss123"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");

    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "SecureP@ss123" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert!(body["accessToken"].is_string());
    assert!(body["user"]["passwordHash"].is_null());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(&ctx, get_request("/api/user/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) =
        send(&ctx, get_request("/api/user/me", Some(&ctx.auth_header()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], ctx.user.id.to_string());
}

#[tokio::test]
async fn test_validation_failure_returns_422() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Bad Email",
                "email": "not-an-email",
                "password": "SecureP@ss123"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_member_cannot_delete_workspace() {
    let ctx = TestContext::new().await.unwrap();
    let (_joiner, joiner_token) = ctx.register_second_user().await.unwrap();

    // Second user joins the first user's workspace as MEMBER
    let (status, _) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/members/workspaces/{}/join", ctx.workspace.invite_code),
            Some(&format!("Bearer {joiner_token}")),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/workspaces/delete/{}", ctx.workspace.id))
        .header("authorization", format!("Bearer {joiner_token}"))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&ctx, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], PERMISSION_DENIED_MESSAGE);
}

#[tokio::test]
async fn test_double_join_conflicts() {
    let ctx = TestContext::new().await.unwrap();
    let (_joiner, joiner_token) = ctx.register_second_user().await.unwrap();
    let auth = format!("Bearer {joiner_token}");

    let join_uri = format!(
        "/api/members/workspaces/{}/join",
        ctx.workspace.invite_code
    );

    let (status, _) = send(&ctx, json_request("POST", &join_uri, Some(&auth), json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&ctx, json_request("POST", &join_uri, Some(&auth), json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You are already a member of this workspace");
}

#[tokio::test]
async fn test_project_and_task_flow() {
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();
    let workspace_id = ctx.workspace.id;

    // Create a project
    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/projects/workspaces/{workspace_id}/create"),
            Some(&auth),
            json!({ "name": "Rollout", "emoji": "🚀" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create project failed: {body}");
    let project_id = body["project"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["project"]["emoji"], "🚀");

    // Create a task in it
    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/tasks/projects/{project_id}/workspaces/{workspace_id}/create"),
            Some(&auth),
            json!({ "title": "Ship it", "priority": "HIGH" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
    assert_eq!(body["task"]["status"], "TODO");
    assert_eq!(body["task"]["priority"], "HIGH");
    assert!(body["task"]["taskCode"]
        .as_str()
        .unwrap()
        .starts_with("task-"));

    // Filtered listing finds it, with the pagination envelope
    let (status, body) = send(
        &ctx,
        get_request(
            &format!(
                "/api/tasks/workspaces/{workspace_id}/all?priority=HIGH&keyword=ship"
            ),
            Some(&auth),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["totalCount"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);

    // Project analytics sees the task
    let (status, body) = send(
        &ctx,
        get_request(
            &format!("/api/projects/{project_id}/workspaces/{workspace_id}/analytics"),
            Some(&auth),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"]["totalTasks"], 1);
    assert_eq!(body["analytics"]["completedTasks"], 0);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let ctx = TestContext::new().await.unwrap();
    let auth = ctx.auth_header();

    let (status, body) = send(
        &ctx,
        get_request(
            &format!(
                "/api/tasks/workspaces/{}/all?pageNumber={}&pageSize={}",
                ctx.workspace.id,
                i64::MAX,
                i64::MAX
            ),
            Some(&auth),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "huge page request failed: {body}");
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_reset_invite_code_rotates_code() {
    let ctx = TestContext::new().await.unwrap();
    let (_joiner, joiner_token) = ctx.register_second_user().await.unwrap();

    // Second user joins while the original code is still valid
    let (status, _) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/members/workspaces/{}/join", ctx.workspace.invite_code),
            Some(&format!("Bearer {joiner_token}")),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reset_uri = format!("/api/workspaces/reset/invite/{}", ctx.workspace.id);

    let (status, body) = send(
        &ctx,
        json_request("POST", &reset_uri, Some(&ctx.auth_header()), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "reset failed: {body}");
    let new_code = body["workspace"]["inviteCode"].as_str().unwrap();
    assert_ne!(new_code, ctx.workspace.invite_code);

    // The stale code no longer admits anyone
    let (status, _) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/members/workspaces/{}/join", ctx.workspace.invite_code),
            Some(&format!("Bearer {joiner_token}")),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Plain members cannot rotate the code
    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            &reset_uri,
            Some(&format!("Bearer {joiner_token}")),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], PERMISSION_DENIED_MESSAGE);
}

#[tokio::test]
async fn test_assign_non_member_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (outsider, _) = ctx.register_second_user().await.unwrap();
    let auth = ctx.auth_header();
    let workspace_id = ctx.workspace.id;

    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/projects/workspaces/{workspace_id}/create"),
            Some(&auth),
            json!({ "name": "Assignments" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &ctx,
        json_request(
            "POST",
            &format!("/api/tasks/projects/{project_id}/workspaces/{workspace_id}/create"),
            Some(&auth),
            json!({ "title": "For an outsider", "assignedTo": outsider.id }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Assigned user is not a member of this workspace."
    );
}
