//! Server-rendered HTML pages for the registration form.
//!
//! Pages are plain strings built with `format!`. Everything that came from a
//! user or from storage goes through [`escape`] first.

use crate::domain::profile::{Profile, ProfileRecord};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Profile Registration</title>
</head>
<body>
<nav>
<a href="/profile">Home</a> |
<a href="/profile/register">Register</a> |
<a href="/profile/all">All Profiles</a>
</nav>
<main>
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
        content = content,
    )
}

fn alert(class: &str, message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div class="alert alert-{}">{}</div>"#, class, escape(m)))
        .unwrap_or_default()
}

/// Landing page, showing a one-shot flash message if there is one.
pub fn index(flash: Option<&str>) -> String {
    let content = format!(
        r#"<h1>Profile Registration</h1>
{flash}
<p>Register your profile or browse the profiles registered so far.</p>
<p><a href="/profile/register">Register a profile</a></p>
<p><a href="/profile/all">View all profiles</a></p>"#,
        flash = alert("success", flash),
    );
    layout("Home", &content)
}

/// Registration form, pre-filled with `profile` and showing `error` above it.
pub fn register(profile: &Profile, error: Option<&str>) -> String {
    let field = |id: &str, label: &str, kind: &str, value: &str| {
        format!(
            r#"<div>
<label for="{id}">{label}</label>
<input type="{kind}" id="{id}" name="{id}" value="{value}">
</div>"#,
            id = id,
            label = label,
            kind = kind,
            value = escape(value),
        )
    };

    let content = format!(
        r#"<h1>Register Profile</h1>
{error}
<form method="post" action="/profile/register">
{name}
{surname}
{email}
{age}
<button type="submit">Register</button>
</form>"#,
        error = alert("danger", error),
        name = field("Name", "Name", "text", &profile.name),
        surname = field("Surname", "Surname", "text", &profile.surname),
        email = field("Email", "Email", "email", &profile.email),
        age = field("Age", "Age", "text", &profile.age),
    );
    layout("Register", &content)
}

/// Table of every stored profile.
pub fn all_profiles(records: &[ProfileRecord], error: Option<&str>) -> String {
    let body = if records.is_empty() {
        "<p>No profiles have been registered yet.</p>".to_string()
    } else {
        let rows: String = records
            .iter()
            .map(|record| {
                let profile = record.profile();
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    escape(&profile.name),
                    escape(&profile.surname),
                    escape(&profile.email),
                    escape(&profile.age),
                    record.created_date().as_datetime().format("%Y-%m-%d %H:%M UTC"),
                )
            })
            .collect();
        format!(
            r#"<p>{count} profile(s)</p>
<table>
<thead><tr><th>Name</th><th>Surname</th><th>Email</th><th>Age</th><th>Registered</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#,
            count = records.len(),
            rows = rows,
        )
    };

    let content = format!(
        "<h1>All Profiles</h1>\n{}\n{}",
        alert("danger", error),
        body
    );
    layout("All Profiles", &content)
}
