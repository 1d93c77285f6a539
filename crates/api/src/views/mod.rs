//! Server-rendered HTML views (maud).

pub mod sign_in;

use axum::response::Html;
use maud::{html, Markup, DOCTYPE};

/// Wrap page content in the shared document shell.
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                main { (content) }
            }
        }
    }
}

/// Convert rendered markup into an axum HTML response body.
pub fn render(markup: Markup) -> Html<String> {
    Html(markup.into_string())
}
