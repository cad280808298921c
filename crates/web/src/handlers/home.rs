use std::{sync::Arc, time::Instant};

use axum::extract::State;
use maud::{Markup, html};
use resume_site_core::config::Config;

use crate::handlers::common::{footer, nav_links, page};

pub async fn home(State(config): State<Arc<Config>>) -> Markup {
    let start = Instant::now();
    let site = &config.site;
    let body = html! {
        header {
            nav {
                ul {
                    li {
                        a href="/" { strong { (site.owner_name) } }
                    }
                    li {
                        a href="#about" { "About" }
                    }
                    li {
                        a href="/resume.pdf" target="_blank" { "Download PDF" }
                    }
                }
                (nav_links())
            }
            .title-group {
                h1 { (site.owner_name) }
                p.tagline { (site.tagline) }
                @if let Some(location) = &site.location {
                    small.muted { (location) }
                }
                @if let Some(email) = &site.email {
                    " | "
                    small.muted {
                        a href=(format!("mailto:{email}")) { (email) }
                    }
                }
            }
        }
        main {
            section #about {
                h2 { "About" }
                @for paragraph in &site.about {
                    p { (paragraph) }
                }
            }
            @if !site.skills.is_empty() {
                section #skills {
                    h2 { "Skills" }
                    ul.skills {
                        @for skill in &site.skills {
                            li { (skill) }
                        }
                    }
                }
            }
            section #resume {
                h2 { "Resume" }
                object.resume-viewer data="/resume.pdf" type="application/pdf" {
                    p {
                        "Your browser can't display the resume inline. "
                        a href="/resume.pdf" download { "Download it instead" }
                        "."
                    }
                }
            }
        }
        (footer(start, site))
    };
    page(&format!("{} • Resume", site.owner_name), body)
}
