use std::{str::FromStr, sync::Arc, time::Instant};

use axum::extract::{Query, State};
use maud::{Markup, html};
use resume_site_core::{
    config::Config,
    models::{ALL_FILTERS, DisplayRun, RunFilter},
    util::format_duration,
};
use resume_site_github::{GitHub, Retrieval, RetrieveOptions, retrieve};
use serde::Deserialize;

use crate::handlers::common::{footer, nav_links, page, timeago};

#[derive(Deserialize)]
pub struct WorkflowsQuery {
    status: Option<String>,
}

pub async fn workflows(
    State(config): State<Arc<Config>>,
    State(github): State<Arc<GitHub>>,
    Query(query): Query<WorkflowsQuery>,
) -> Markup {
    let start = Instant::now();
    // Unknown filters show everything
    let filter = query
        .status
        .as_deref()
        .and_then(|s| RunFilter::from_str(s).ok())
        .unwrap_or_default();
    let result = retrieve(&*github, &RetrieveOptions::from(&config.github)).await;
    let runs = result.runs();
    let visible = runs.iter().filter(|run| filter.matches(run)).collect::<Vec<_>>();
    let actions_url = format!("{}/actions", config.github.repo_url());

    let body = html! {
        header {
            nav {
                ul {
                    li {
                        a href="/" { strong { (config.site.owner_name) } }
                    }
                }
                (nav_links())
            }
            .title-group {
                h3 { "CI/CD Workflows" }
                p.muted {
                    "Recent GitHub Actions runs for this site. "
                    a href=(actions_url) target="_blank" { "View on GitHub" }
                }
                @if matches!(result, Retrieval::Fallback { .. }) {
                    small.muted.notice { "GitHub is unavailable, showing recent sample runs." }
                }
            }
        }
        main.grid.workflows-grid {
            aside {
                nav {
                    ul {
                        @for option in ALL_FILTERS {
                            li {
                                a href=(format!("/workflows?status={}", option.key()))
                                    aria-current=[(*option == filter).then_some("page")] {
                                    (option.label())
                                    " "
                                    span.count { (option.count(runs)) }
                                }
                            }
                        }
                    }
                }
            }
            section {
                h4 { "Workflow runs (" (visible.len()) ")" }
                @if visible.is_empty() {
                    article.empty {
                        h5 { "No workflow runs found" }
                        p.muted {
                            @if filter == RunFilter::All {
                                "No workflow runs have been triggered yet."
                            } @else {
                                "No " (filter.key()) " workflow runs found."
                            }
                        }
                    }
                } @else {
                    @for run in visible {
                        (run_row(run))
                    }
                }
            }
        }
        (footer(start, &config.site))
    };
    page(&format!("Workflows • {}", config.site.owner_name), body)
}

fn run_row(run: &DisplayRun) -> Markup {
    let state = run.state();
    html! {
        article.run data-state=(state.as_str()) {
            .run-header {
                span.badge.(format!("badge-{}", state.as_str())) { (state.label()) }
                h5.run-title { (run.name) }
            }
            small.muted {
                (run.workflow_name)
                " #" (run.run_number)
                " | "
                code { (run.head_branch) }
                " | "
                code { (run.head_sha) }
            }
            .run-meta {
                img.avatar src=(run.actor.avatar_url) alt=(run.actor.login) width="20" height="20";
                " " (run.actor.login)
                " | "
                span title=(run.created_at) { (timeago(&run.created_at)) }
                @if let Some(duration) = run.duration {
                    " | "
                    span.duration { (format_duration(duration)) }
                }
                " | "
                a href=(run.html_url) target="_blank" { "View details" }
            }
        }
    }
}
