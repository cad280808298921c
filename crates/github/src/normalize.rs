use resume_site_core::{
    models::{DisplayRun, FALLBACK_RUN_NAME, RunRecord},
    util::elapsed_secs,
};

const SHORT_SHA_LEN: usize = 7;

/// Map an upstream run onto its display shape.
///
/// `title` is the resolved head commit title, if one was looked up. Without it
/// the workflow name is shown, and [`FALLBACK_RUN_NAME`] if that is empty too.
pub fn normalize(record: RunRecord, title: Option<String>) -> DisplayRun {
    // Clock skew upstream can put updated_at before created_at
    let duration = match record.conclusion {
        Some(_) => elapsed_secs(&record.created_at, &record.updated_at).map(|secs| secs.max(0)),
        None => None,
    };
    let workflow_name = record
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_RUN_NAME.to_string());
    let name =
        title.filter(|title| !title.trim().is_empty()).unwrap_or_else(|| workflow_name.clone());
    DisplayRun {
        id: record.id,
        name,
        status: record.status,
        conclusion: record.conclusion,
        created_at: record.created_at,
        updated_at: record.updated_at,
        head_branch: record.head_branch.unwrap_or_default(),
        head_sha: short_sha(&record.head_sha).to_string(),
        actor: record.actor,
        event: record.event,
        workflow_id: record.workflow_id,
        run_number: record.run_number,
        html_url: record.html_url,
        jobs_url: record.jobs_url,
        duration,
        workflow_name,
    }
}

pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(SHORT_SHA_LEN) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

/// First line of a commit message, if it has any content.
pub fn commit_title(message: &str) -> Option<&str> {
    message.lines().next().map(str::trim_end).filter(|line| !line.is_empty())
}
