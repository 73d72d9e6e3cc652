//! Server-rendered HTML for the login page and the card board
//!
//! Two self-contained pages, no template engine: the board page carries
//! inline style and a small script that drives the JSON endpoints and
//! reloads. Everything interpolated from config or the card file is
//! escaped.

use crate::card::Card;
use crate::config::BoardConfig;

const STYLE: &str = "\
:root { color-scheme: light dark; }
* { box-sizing: border-box; }
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 64rem; padding: 0 1rem; }
header { display: flex; justify-content: space-between; align-items: baseline; gap: 1rem; }
form.card-add { display: flex; gap: 0.5rem; margin: 1rem 0; }
form.card-add input[name=data] { flex: 1; }
.board { display: grid; grid-template-columns: repeat(auto-fit, minmax(14rem, 1fr)); gap: 1rem; }
.column { border: 1px solid #8884; border-radius: 6px; padding: 0.25rem 1rem 0.75rem; }
.column ul { list-style: none; padding: 0; margin: 0; }
.column li { display: flex; gap: 0.5rem; align-items: center; margin: 0.5rem 0; }
.card-data { flex: 1; overflow-wrap: anywhere; }
";

const SCRIPT: &str = "\
const send = (method, url, body) =>
  fetch(url, {
    method,
    headers: { 'Content-Type': 'application/json' },
    body: body === undefined ? undefined : JSON.stringify(body),
  }).then(() => location.reload());

document.querySelector('.card-add').addEventListener('submit', (event) => {
  event.preventDefault();
  const form = event.target;
  const data = form.elements.data.value.trim();
  if (data === '') return;
  send('POST', '/todos', { data, type: form.elements.type.value });
});

for (const select of document.querySelectorAll('.card-type')) {
  select.addEventListener('change', () => {
    send('PUT', '/todos/' + encodeURIComponent(select.dataset.id), { type: select.value });
  });
}

for (const button of document.querySelectorAll('.card-delete')) {
  button.addEventListener('click', () => {
    send('DELETE', '/todos/' + encodeURIComponent(button.dataset.id));
  });
}
";

/// Escape text for HTML body and double-quoted attribute positions.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn document(title: &str, style: &str, body: &str, script: &str) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(&format!("<style>\n{style}</style>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if !script.is_empty() {
        html.push_str(&format!("<script>\n{script}</script>\n"));
    }
    html.push_str("</body>\n</html>\n");
    html
}

/// Sign-in page shown to visitors without a session.
pub fn login(title: &str) -> String {
    let mut body = String::new();
    body.push_str("<main class=\"login\">\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    body.push_str("<form method=\"post\" action=\"/login\">\n");
    body.push_str("<input type=\"text\" name=\"user\" placeholder=\"your name\" autofocus>\n");
    body.push_str("<button type=\"submit\">sign in</button>\n");
    body.push_str("</form>\n</main>\n");
    document(title, "", &body, "")
}

/// The board: one column per configured status, cards in file order.
///
/// Cards whose status is not configured (hand-edited file) still render,
/// in extra columns after the configured ones.
pub fn board(config: &BoardConfig, cards: &[Card]) -> String {
    let mut columns: Vec<(&str, Vec<&Card>)> = config
        .statuses
        .iter()
        .map(|status| (status.as_str(), Vec::new()))
        .collect();
    for card in cards {
        match columns.iter().position(|(name, _)| *name == card.status) {
            Some(pos) => columns[pos].1.push(card),
            None => columns.push((card.status.as_str(), vec![card])),
        }
    }

    let mut body = String::new();
    body.push_str("<main>\n<header>\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape(&config.title)));
    body.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">sign out</button></form>\n",
    );
    body.push_str("</header>\n");

    body.push_str("<form class=\"card-add\">\n");
    body.push_str("<input type=\"text\" name=\"data\" placeholder=\"new card\" autofocus>\n");
    body.push_str(&format!(
        "<select name=\"type\">{}</select>\n",
        status_options(&config.statuses, &config.default_status)
    ));
    body.push_str("<button type=\"submit\">add</button>\n");
    body.push_str("</form>\n");

    body.push_str("<div class=\"board\">\n");
    for (status, bucket) in &columns {
        body.push_str(&format!(
            "<section class=\"column\" data-status=\"{}\">\n",
            escape(status)
        ));
        body.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape(status)));
        for card in bucket {
            body.push_str(&card_item(card, &config.statuses));
        }
        body.push_str("</ul>\n</section>\n");
    }
    body.push_str("</div>\n</main>\n");

    document(&config.title, STYLE, &body, SCRIPT)
}

fn card_item(card: &Card, statuses: &[String]) -> String {
    let id = escape(&card.id);
    let mut item = String::new();
    item.push_str(&format!("<li data-id=\"{id}\">\n"));
    item.push_str(&format!(
        "<span class=\"card-data\">{}</span>\n",
        escape(&card.data)
    ));
    item.push_str(&format!(
        "<select class=\"card-type\" data-id=\"{id}\">{}</select>\n",
        status_options(statuses, &card.status)
    ));
    item.push_str(&format!(
        "<button class=\"card-delete\" data-id=\"{id}\">delete</button>\n"
    ));
    item.push_str("</li>\n");
    item
}

fn status_options(statuses: &[String], selected: &str) -> String {
    let mut html = String::new();
    let mut matched = false;
    for status in statuses {
        let mark = if status == selected {
            matched = true;
            " selected"
        } else {
            ""
        };
        let status = escape(status);
        html.push_str(&format!("<option value=\"{status}\"{mark}>{status}</option>"));
    }
    // A stray status stays visible (and re-selectable) in its own card
    if !matched {
        let selected = escape(selected);
        html.push_str(&format!(
            "<option value=\"{selected}\" selected>{selected}</option>"
        ));
    }
    html
}
