use std::time::{Duration, Instant};

use maud::{DOCTYPE, Markup, PreEscaped, html};
use resume_site_core::{config::SiteConfig, util::parse_timestamp};
use time::OffsetDateTime;

pub fn timeago(value: &str) -> String {
    let Some(value) = parse_timestamp(value) else {
        return format!("[invalid {}]", value);
    };
    let Ok(duration) = Duration::try_from(OffsetDateTime::now_utc() - value) else {
        return "[out of range]".to_string();
    };
    timeago::Formatter::new().convert(duration)
}

pub fn header() -> Markup {
    html! {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1.0";
        meta name="color-scheme" content="dark light";
        link rel="stylesheet" href="/site.css";
        script { (PreEscaped(r#"let t;try{t=localStorage.getItem("theme")}catch(_){}if(t)document.documentElement.setAttribute("data-theme",t);"#)) }
    }
}

/// Inline handler for the theme toggle link rendered by [`nav_links`].
fn theme_toggle_script() -> Markup {
    html! {
        script { (PreEscaped(r#"document.getElementById("theme-toggle").addEventListener("click",e=>{e.preventDefault();const r=document.documentElement;const t=r.getAttribute("data-theme")==="dark"?"light":"dark";r.setAttribute("data-theme",t);try{localStorage.setItem("theme",t)}catch(_){}});"#)) }
    }
}

pub fn nav_links() -> Markup {
    html! {
        ul {
            li {
                a href="/" { "Resume" }
            }
            li {
                a href="/workflows" { "Workflows" }
            }
            li {
                a #theme-toggle .icon-theme-light-dark href="#" title="Toggle theme" { "Theme" }
            }
        }
    }
}

pub fn footer(start: Instant, site: &SiteConfig) -> Markup {
    let elapsed = start.elapsed();
    let year = OffsetDateTime::now_utc().year();
    html! {
        footer {
            span class="section" {
                small class="muted" { "© " (year) " " (site.owner_name) }
                " | "
                small class="muted" { "Generated in " (elapsed.as_millis()) "ms" }
            }
            span class="section" {
                @if let Some(email) = &site.email {
                    small class="muted" {
                        a href=(format!("mailto:{email}")) { "Contact" }
                    }
                    " | "
                }
                small class="muted" {
                    a href="/resume.pdf" download { "Download Resume" }
                }
            }
        }
        (theme_toggle_script())
    }
}

/// Full HTML document around a page body.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                title { (title) }
                (header())
            }
            body {
                (body)
            }
        }
    }
}
