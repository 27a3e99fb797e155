//! HTML views.
//!
//! Pure functions from data to markup. Record pages take rows as
//! field-name to string mappings, so any serializable row type can be shown.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// A row as rendered: field name to display string
pub type ViewRow = IndexMap<String, String>;

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Flatten serializable rows into view rows.
///
/// Non-string scalars are rendered with their JSON text.
pub fn to_rows<T: Serialize>(items: &[T]) -> Vec<ViewRow> {
    items
        .iter()
        .filter_map(|item| match serde_json::to_value(item) {
            Ok(Value::Object(map)) => Some(
                map.into_iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::String(s) => s,
                            Value::Null => String::new(),
                            other => other.to_string(),
                        };
                        (k, text)
                    })
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/css/style.css">
</head>
<body>
<nav><a href="/">Home</a><a href="/books">Books</a><a href="/authors">Authors</a><a href="/years">Years</a><a href="/search">Search</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

pub fn index_page() -> String {
    layout(
        "Bookshelf",
        "<p>Browse the catalog by <a href=\"/books\">book</a>, \
         <a href=\"/authors\">author</a> or <a href=\"/years\">year</a>.</p>",
    )
}

/// Search shell; filtering happens in the browser against `/api/books`
pub fn search_page() -> String {
    layout(
        "Search",
        r#"<form id="search" onsubmit="return false;">
<input type="search" name="q" placeholder="Title, author or year">
</form>
<table id="results"></table>
<script>
const input = document.querySelector('#search input');
const table = document.getElementById('results');
let books = [];
fetch('/api/books').then(r => r.json()).then(data => { books = data || []; });
input.addEventListener('input', () => {
  const q = input.value.toLowerCase();
  table.replaceChildren();
  if (!q) return;
  for (const b of books) {
    if (![b.title, b.author, b.year].some(v => (v || '').toLowerCase().includes(q))) continue;
    const row = table.insertRow();
    for (const v of [b.title, b.author, b.year]) row.insertCell().textContent = v;
  }
});
</script>"#,
    )
}

/// Table of records with the given columns, in order
pub fn records_page(title: &str, columns: &[&str], rows: &[ViewRow]) -> String {
    let mut body = String::from("<table>\n<thead><tr>");
    for column in columns {
        body.push_str(&format!("<th>{}</th>", escape(column)));
    }
    body.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        body.push_str("<tr>");
        for column in columns {
            let value = row.get(*column).map(String::as_str).unwrap_or_default();
            body.push_str(&format!("<td>{}</td>", escape(value)));
        }
        body.push_str("</tr>\n");
    }
    body.push_str("</tbody>\n</table>");
    if rows.is_empty() {
        body.push_str("\n<p>No records.</p>");
    }
    layout(title, &body)
}
