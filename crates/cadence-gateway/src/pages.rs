//! HTML pages served by the console.

const STYLE: &str = r#"
    body { background:#111; color:#0f0; font-family:monospace; padding:10px; font-size:14px; }
    h2 { text-align:center; font-size:18px; }
    form { background:#000; padding:12px; border-radius:10px; }
    label { font-size:14px; display:block; margin-top:8px; }
    input {
      width:100%; padding:8px; margin-top:5px;
      border-radius:6px; border:1px solid #0f0;
      background:#111; color:#0f0; font-size:14px;
    }
    button {
      width:100%; padding:10px; margin-top:12px;
      border:none; border-radius:6px;
      background:#0f0; color:#000; font-weight:bold; font-size:15px;
    }
    .log-box {
      background:#000; border:1px solid #0f0; border-radius:8px;
      padding:8px; margin-bottom:15px;
      max-height:250px; overflow-y:auto; white-space:pre-wrap; font-size:12px;
    }
    a.button {
      display:block; text-align:center; padding:10px; background:#e00; color:#fff;
      border-radius:6px; text-decoration:none; font-size:14px;
    }
"#;

/// Seconds between automatic reloads of the logs page.
pub const LOGS_REFRESH_SECS: u64 = 2;

/// Escape text for safe inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<html>
<head>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>{STYLE}</style>
  {head_extra}
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
    )
}

/// Submission form.
pub fn form_page(default_interval_secs: u64) -> String {
    let body = format!(
        r#"  <h2>⏰ Cadence</h2>
  <form method="post" enctype="multipart/form-data">
    <label>📂 Credentials file</label>
    <input type="file" name="tokens" required>
    <label>📂 Messages file</label>
    <input type="file" name="comments" required>
    <label>🆔 Target ID</label>
    <input type="text" name="post_id" required>
    <label>🔖 Prefix</label>
    <input type="text" name="prefix">
    <label>⏱ Interval (seconds)</label>
    <input type="number" name="interval" min="0" value="{default_interval_secs}">
    <button type="submit">🚀 Start</button>
  </form>"#
    );
    layout("Cadence", "", &body)
}

/// Confirmation after a task is created.
pub fn started_page(id: &str) -> String {
    let id = escape_html(id);
    format!("✅ Task started! ID: <b>{id}</b><br><a href='/logs/{id}'>📜 View Logs</a>")
}

/// Live logs for one task. `None` renders the empty state for an unknown id.
pub fn logs_page(id: &str, logs: Option<(&[String], &[String])>) -> String {
    let safe_id = escape_html(id);
    let head = format!(
        "<script>setTimeout(function(){{ window.location.reload(); }}, {});</script>",
        LOGS_REFRESH_SECS * 1000
    );

    let (events, actions, notice) = match logs {
        Some((events, actions)) => (join_lines(events), join_lines(actions), String::new()),
        None => (
            String::new(),
            String::new(),
            "  <p>❌ Unknown task ID — nothing to show.</p>\n".to_string(),
        ),
    };

    let body = format!(
        r#"  <h2>📝 Logs - {safe_id}</h2>
{notice}  <div class="log-box">{events}</div>

  <h2>💬 Delivered Messages</h2>
  <div class="log-box">{actions}</div>

  <a href="/stop/{safe_id}" class="button">⛔ Stop Task</a>"#
    );
    layout(&format!("Logs {id}"), &head, &body)
}

/// Response to a stop request.
pub fn stopped_page(id: &str, known: bool) -> String {
    if known {
        let id = escape_html(id);
        format!("⛔ Task {id} stopped.<br><a href='/logs/{id}'>🔙 Back</a>")
    } else {
        "❌ Invalid Task ID<br><a href='/'>🔙 Back</a>".to_string()
    }
}

/// Rejected submission.
pub fn error_page(message: &str) -> String {
    format!("❌ {}<br><a href='/'>🔙 Back</a>", escape_html(message))
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| escape_html(l))
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_form_has_expected_fields() {
        let html = form_page(10);
        for name in ["tokens", "comments", "post_id", "prefix", "interval"] {
            assert!(html.contains(&format!("name=\"{name}\"")), "missing field {name}");
        }
        assert!(html.contains("value=\"10\""));
    }

    #[test]
    fn test_logs_page_escapes_and_joins() {
        let events = vec!["[10:00:00] ✅ A (1) → <hi>".to_string(), "two".to_string()];
        let actions = vec!["[10:00:00] <hi>".to_string()];
        let html = logs_page("abc123", Some((events.as_slice(), actions.as_slice())));
        assert!(html.contains("&lt;hi&gt;<br>two"));
        assert!(html.contains("/stop/abc123"));
        assert!(html.contains("window.location.reload"));
        assert!(!html.contains("Unknown task"));
    }

    #[test]
    fn test_logs_page_empty_state() {
        let html = logs_page("zzz", None);
        assert!(html.contains("Unknown task ID"));
    }

    #[test]
    fn test_stopped_page() {
        assert!(stopped_page("abc123", true).contains("Task abc123 stopped"));
        let unknown = stopped_page("abc123", false);
        assert!(unknown.starts_with("❌ Invalid Task ID"));
        assert!(unknown.contains("href='/'"));
    }
}
