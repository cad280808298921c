//! End-to-end retrieval against a mocked GitHub API.

use resume_site_core::{
    config::GitHubConfig,
    models::{FALLBACK_RUN_NAME, RunState, Source},
};
use resume_site_github::{GITHUB_ACCEPT, GitHub, Retrieval, RetrieveOptions, retrieve};
use serde_json::{Value, json};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const RUNS_PATH: &str = "/repos/octo/site/actions/runs";

fn config(server: &MockServer) -> GitHubConfig {
    GitHubConfig {
        api_url: Url::parse(&server.uri()).unwrap(),
        owner: "octo".to_string(),
        repo: "site".to_string(),
        user_agent: "resume-site-tests".to_string(),
        ..Default::default()
    }
}

fn sha(id: u64) -> String { format!("{id:040x}") }

fn run_json(id: u64, status: &str, conclusion: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": "Production CI/CD Pipeline",
        "status": status,
        "conclusion": conclusion,
        "created_at": "2025-07-16T17:00:00Z",
        "updated_at": "2025-07-16T17:03:45Z",
        "head_branch": "main",
        "head_sha": sha(id),
        "actor": { "login": "octocat", "avatar_url": "https://github.com/octocat.png" },
        "event": "push",
        "workflow_id": 42,
        "run_number": id,
        "html_url": format!("https://github.com/octo/site/actions/runs/{id}"),
        "jobs_url": format!("https://api.github.com/repos/octo/site/actions/runs/{id}/jobs"),
        "head_commit": {
            "message": "ignored",
            "author": { "name": "Octo Cat", "email": "octo@example.com" }
        }
    })
}

async fn mount_runs(server: &MockServer, runs: Vec<Value>, total_count: u64) {
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total_count": total_count, "workflow_runs": runs })),
        )
        .mount(server)
        .await;
}

async fn mount_commit(server: &MockServer, id: u64, message: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/site/commits/{}", sha(id))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": sha(id),
            "commit": {
                "message": message,
                "author": { "name": "Octo Cat", "email": "octo@example.com" }
            }
        })))
        .mount(server)
        .await;
}

async fn run_retrieval(server: &MockServer) -> Retrieval {
    let config = config(server);
    let github = GitHub::new(&config).unwrap();
    retrieve(&*github, &RetrieveOptions::from(&config)).await
}

#[tokio::test]
async fn test_service_unavailable_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_retrieval(&server).await;
    assert_eq!(result, Retrieval::fallback());
    assert_eq!(result.source(), Source::Fallback);
    assert_eq!(result.runs().len(), 6);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"workflow_runs\": [oops"))
        .mount(&server)
        .await;

    assert_eq!(run_retrieval(&server).await, Retrieval::fallback());
}

#[tokio::test]
async fn test_missing_required_field_falls_back() {
    let server = MockServer::start().await;
    let mut run = run_json(1, "completed", Some("success"));
    run.as_object_mut().unwrap().remove("head_sha");
    mount_runs(&server, vec![run], 1).await;

    assert_eq!(run_retrieval(&server).await, Retrieval::fallback());
}

#[tokio::test]
async fn test_live_runs_are_capped_and_enriched() {
    let server = MockServer::start().await;
    let runs = (1..=12).rev().map(|id| run_json(id, "completed", Some("success"))).collect();
    mount_runs(&server, runs, 57).await;
    for id in 3..=12 {
        mount_commit(&server, id, &format!("Commit number {id}\n\nMore detail")).await;
    }

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    assert_eq!(result.total_count(), 57);
    assert_eq!(result.runs().len(), 10);
    for (run, id) in result.runs().iter().zip((3..=12).rev()) {
        assert_eq!(run.id, id);
        assert_eq!(run.name, format!("Commit number {id}"));
        assert_eq!(run.workflow_name, "Production CI/CD Pipeline");
        assert_eq!(run.head_sha, &sha(id)[..7]);
        assert_eq!(run.duration, Some(225));
    }
}

#[tokio::test]
async fn test_null_branch_past_cap_is_ignored() {
    let server = MockServer::start().await;
    let mut runs = (1..=30)
        .rev()
        .map(|id| run_json(id, "completed", Some("success")))
        .collect::<Vec<_>>();
    runs[25]["head_branch"] = Value::Null;
    runs[27]["actor"] = Value::Null;
    mount_runs(&server, runs, 30).await;
    for id in 21..=30 {
        mount_commit(&server, id, &format!("Commit number {id}")).await;
    }

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    assert_eq!(result.total_count(), 30);
    assert_eq!(result.runs().len(), 10);
    assert_eq!(result.runs()[0].id, 30);
    assert_eq!(result.runs()[9].id, 21);
}

#[tokio::test]
async fn test_null_branch_inside_cap_stays_live() {
    let server = MockServer::start().await;
    let mut runs = (1..=3)
        .rev()
        .map(|id| run_json(id, "completed", Some("success")))
        .collect::<Vec<_>>();
    runs[1]["head_branch"] = Value::Null;
    mount_runs(&server, runs, 3).await;
    for id in 1..=3 {
        mount_commit(&server, id, &format!("Commit number {id}")).await;
    }

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    let branches = result.runs().iter().map(|r| r.head_branch.as_str()).collect::<Vec<_>>();
    assert_eq!(branches, ["main", "", "main"]);
}

#[tokio::test]
async fn test_failed_commit_lookup_keeps_siblings() {
    let server = MockServer::start().await;
    let runs = vec![
        run_json(3, "completed", Some("success")),
        run_json(2, "completed", Some("failure")),
        run_json(1, "in_progress", None),
    ];
    mount_runs(&server, runs, 3).await;
    mount_commit(&server, 3, "Add PDF viewer").await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/site/commits/{}", sha(2))))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_commit(&server, 1, "Implement theme toggle").await;

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    let runs = result.runs();
    assert_eq!(runs[0].name, "Add PDF viewer");
    assert_eq!(runs[1].name, FALLBACK_RUN_NAME);
    assert_eq!(runs[2].name, "Implement theme toggle");
    assert_eq!(runs[1].state(), RunState::Failure);
    assert_eq!(runs[2].state(), RunState::InProgress);
    assert_eq!(runs[2].duration, None);
}

#[tokio::test]
async fn test_commit_without_message_uses_constant() {
    let server = MockServer::start().await;
    mount_runs(&server, vec![run_json(1, "completed", Some("success"))], 1).await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/site/commits/{}", sha(1))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": sha(1) })))
        .mount(&server)
        .await;

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    assert_eq!(result.runs()[0].name, FALLBACK_RUN_NAME);
}

#[tokio::test]
async fn test_requests_carry_expected_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .and(header("accept", GITHUB_ACCEPT))
        .and(header("user-agent", "resume-site-tests"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total_count": 1, "workflow_runs": [run_json(1, "queued", None)] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/site/commits/{}", sha(1))))
        .and(header("accept", GITHUB_ACCEPT))
        .and(header("user-agent", "resume-site-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": sha(1),
            "commit": { "message": "Queued change", "author": { "name": "a", "email": "b" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = run_retrieval(&server).await;
    assert_eq!(result.source(), Source::GitHub);
    assert_eq!(result.runs()[0].name, "Queued change");
    assert_eq!(result.runs()[0].state(), RunState::Queued);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.headers.contains_key("authorization")));
}

#[tokio::test]
async fn test_responses_are_reused_within_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "workflow_runs": [run_json(2, "completed", Some("success")), run_json(1, "completed", Some("failure"))]
        })))
        .expect(1)
        .mount(&server)
        .await;
    for id in 1..=2 {
        Mock::given(method("GET"))
            .and(path(format!("/repos/octo/site/commits/{}", sha(id))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": sha(id),
                "commit": { "message": format!("Change {id}"), "author": { "name": "a", "email": "b" } }
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = config(&server);
    let github = GitHub::new(&config).unwrap();
    let options = RetrieveOptions::from(&config);
    let first = retrieve(&*github, &options).await;
    let second = retrieve(&*github, &options).await;
    assert_eq!(first.source(), Source::GitHub);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RUNS_PATH))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_runs(&server, vec![run_json(1, "completed", Some("success"))], 1).await;
    mount_commit(&server, 1, "Recovered").await;

    let config = config(&server);
    let github = GitHub::new(&config).unwrap();
    let options = RetrieveOptions::from(&config);
    assert_eq!(retrieve(&*github, &options).await.source(), Source::Fallback);
    let second = retrieve(&*github, &options).await;
    assert_eq!(second.source(), Source::GitHub);
    assert_eq!(second.runs()[0].name, "Recovered");
}
