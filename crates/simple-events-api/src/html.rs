//! HTML building blocks. Every dynamic value goes through `escape`.

use std::fmt::Write;

use crate::LOGIN_PAGE;

/// Encodes `& < > " '` so text is inert in both element content and
/// quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "
body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 2rem; color: #1d2327; }
.wrap { max-width: 960px; }
.notice { padding: .5rem 1rem; margin: 1rem 0; border-left: 4px solid; background: #fff; }
.notice-success { border-color: #00a32a; }
.notice-error { border-color: #d63638; }
table.widefat { width: 100%; border-collapse: collapse; }
table.widefat th, table.widefat td { border: 1px solid #c3c4c7; padding: .5rem; text-align: left; vertical-align: top; }
td.description { white-space: pre-wrap; }
.form-table th { text-align: left; padding-right: 1rem; }
.topbar { display: flex; justify-content: space-between; }
";

pub fn layout(title: &str, body: &str) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    );
    out
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!("<div class=\"wrap\"><h1>Error</h1><p>{}</p></div>", escape(message)),
    )
}

pub fn login_page(error: Option<&str>) -> String {
    let mut body = String::from("<div class=\"wrap\">\n<h1>Log In</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, "<div class=\"notice notice-error\"><p>{}</p></div>", escape(error));
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"{action}\">
<p><label for=\"username\">Username</label><br><input type=\"text\" id=\"username\" name=\"username\" required></p>
<p><label for=\"password\">Password</label><br><input type=\"password\" id=\"password\" name=\"password\" required></p>
<p><input type=\"submit\" value=\"Log In\"></p>
</form>
</div>",
        action = escape(LOGIN_PAGE)
    );
    layout("Log In", &body)
}
