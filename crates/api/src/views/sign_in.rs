use maud::{html, Markup};

use super::layout;

pub const TITLE: &str = "Sign in to Luminar";

/// Where the card footer sends visitors without an account.
pub const SIGN_UP_PATH: &str = "/signup";

/// Values echoed back into the form after a failed attempt.
#[derive(Debug, Default)]
pub struct SignInForm<'a> {
    pub email: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub fn page(form: SignInForm<'_>) -> Markup {
    layout(
        TITLE,
        html! {
            section class="card" {
                header {
                    h1 { "Sign In" }
                    p { "Sign in with your email address to continue." }
                }
                @if let Some(error) = form.error {
                    p class="error" role="alert" { (error) }
                }
                form method="post" action="/login" {
                    label for="email" { "Email" }
                    input id="email" name="email" type="email" autocomplete="email" required
                        value=(form.email.unwrap_or_default());
                    label for="password" { "Password" }
                    input id="password" name="password" type="password"
                        autocomplete="current-password" required;
                    button type="submit" { "Sign In" }
                }
                footer {
                    p {
                        "Don't have an account? "
                        a href=(SIGN_UP_PATH) { "Sign Up" }
                    }
                }
            }
        },
    )
}
