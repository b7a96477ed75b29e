// --- File: crates/safari_auth/src/views.rs ---
use leptos::prelude::*;
use safari_common::ui::components::FormError;

#[component]
pub fn LoginPage(
    email: String,
    next: Option<String>,
    notice: Option<String>,
    errors: Vec<String>,
) -> impl IntoView {
    let notice = notice.map(|text| view! { <p class="notice">{text}</p> });
    let next = next.map(|path| view! { <input type="hidden" name="next" value=path/> });

    view! {
        <section class="auth-card">
            <h1>"Sign in"</h1>
            {notice}
            <FormError errors=errors/>
            <form method="post" action="/login" class="stacked-form">
                {next}
                <label for="email">"Email"</label>
                <input id="email" name="email" type="email" value=email autocomplete="email" required=true/>
                <label for="password">"Password"</label>
                <input id="password" name="password" type="password" autocomplete="current-password" required=true/>
                <button type="submit" class="button">"Sign in"</button>
            </form>
            <p><a href="/forgot-password">"Forgot your password?"</a></p>
            <p>"New here? "<a href="/register">"Create an account"</a></p>
        </section>
    }
}

#[component]
pub fn RegisterPage(name: String, email: String, errors: Vec<String>) -> impl IntoView {
    view! {
        <section class="auth-card">
            <h1>"Create your account"</h1>
            <FormError errors=errors/>
            <form method="post" action="/register" class="stacked-form">
                <label for="name">"Full name"</label>
                <input id="name" name="name" type="text" value=name autocomplete="name" required=true/>
                <label for="email">"Email"</label>
                <input id="email" name="email" type="email" value=email autocomplete="email" required=true/>
                <label for="password">"Password"</label>
                <input id="password" name="password" type="password" autocomplete="new-password" required=true/>
                <p class="hint">"At least 8 characters, including a letter and a number."</p>
                <label for="confirm_password">"Confirm password"</label>
                <input id="confirm_password" name="confirm_password" type="password" autocomplete="new-password" required=true/>
                <button type="submit" class="button">"Register"</button>
            </form>
            <p>"Already registered? "<a href="/login">"Sign in"</a></p>
        </section>
    }
}

#[component]
pub fn VerifyEmailPage(verified: bool, message: String) -> impl IntoView {
    let (heading, action) = if verified {
        ("Email verified", view! { <a href="/login" class="button">"Sign in"</a> }.into_any())
    } else {
        (
            "Verification failed",
            view! { <a href="/register" class="button button-secondary">"Register again"</a> }.into_any(),
        )
    };

    view! {
        <section class="auth-card">
            <h1>{heading}</h1>
            <p>{message}</p>
            {action}
        </section>
    }
}

#[component]
pub fn ForgotPasswordPage(email: String, errors: Vec<String>) -> impl IntoView {
    view! {
        <section class="auth-card">
            <h1>"Reset your password"</h1>
            <p>"Enter the email address you registered with and we will send you a reset link."</p>
            <FormError errors=errors/>
            <form method="post" action="/forgot-password" class="stacked-form">
                <label for="email">"Email"</label>
                <input id="email" name="email" type="email" value=email autocomplete="email" required=true/>
                <button type="submit" class="button">"Send reset link"</button>
            </form>
            <p><a href="/login">"Back to sign in"</a></p>
        </section>
    }
}

#[component]
pub fn ResetPasswordPage(token: String, errors: Vec<String>) -> impl IntoView {
    let action = format!("/reset-password/{}", token);
    view! {
        <section class="auth-card">
            <h1>"Choose a new password"</h1>
            <FormError errors=errors/>
            <form method="post" action=action class="stacked-form">
                <label for="password">"New password"</label>
                <input id="password" name="password" type="password" autocomplete="new-password" required=true/>
                <label for="confirm_password">"Confirm new password"</label>
                <input id="confirm_password" name="confirm_password" type="password" autocomplete="new-password" required=true/>
                <button type="submit" class="button">"Update password"</button>
            </form>
        </section>
    }
}
