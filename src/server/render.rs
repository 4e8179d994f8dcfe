//! HTML adapters over [`TeamView`]. The full page and the embeddable page
//! share every piece of markup except the outer container.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use itertools::Itertools;

use crate::model::{
    Alliance, Fingerprint, MatchRecord, MatchStatus, TeamNumber, TeamPage, TeamView,
};
use crate::refresh::RefreshPolicy;

pub const DEFAULT_EMBED_HEIGHT: u32 = 600;

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; background: #f4f4f4; color: #222; }
.container { max-width: 720px; margin: 0 auto; padding: 16px; }
.embed { overflow-y: auto; box-sizing: border-box; background: #fff; }
.header { display: flex; justify-content: space-between; align-items: baseline; }
.now-queuing { font-weight: bold; color: #0277bd; }
.match-group-title { font-size: 1.1em; font-weight: bold; margin: 16px 0 8px; }
.match-card { background: #fff; border-radius: 6px; margin-bottom: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.2); }
.match-card summary { display: flex; gap: 8px; align-items: center; padding: 10px; cursor: pointer; }
.match-time { margin-left: auto; color: #555; }
.alliance-dot { width: 12px; height: 12px; border-radius: 50%; }
.red-alliance { background: #d32f2f; }
.blue-alliance { background: #1976d2; }
.match-status { font-size: 0.85em; padding: 2px 6px; border-radius: 4px; background: #e0e0e0; }
.status-queuing { background: #fff59d; }
.status-on-deck { background: #ffcc80; }
.status-on-field { background: #a5d6a7; }
.status-completed { background: #cfd8dc; }
.match-details { padding: 0 10px 10px; }
.team-chip { display: inline-block; padding: 2px 6px; margin: 2px; border-radius: 4px; }
.red-team { background: #ffebee; }
.blue-team { background: #e3f2fd; }
.highlight { font-weight: bold; outline: 2px solid #333; }
.break-indicator { margin-top: 6px; font-style: italic; }
.empty { color: #555; }
.footer { margin-top: 16px; font-size: 0.8em; color: #777; text-align: center; }
"#;

const REFRESH_SCRIPT: &str = r#"
(function () {
  var eventKey = __EVENT_KEY__, last = __FINGERPRINT__;
  var interval = __INTERVAL_MS__, backoff = __BACKOFF__, maxInterval = __MAX_INTERVAL_MS__;
  var delay = interval, timer = null;
  var storageKey = "openMatches:" + eventKey;
  var updateStatus = document.getElementById("update-status");
  var hashDisplay = document.getElementById("hash-display");
  var rendered = updateStatus.textContent;

  function cards() { return document.querySelectorAll("details.match-card"); }
  function saveOpen() {
    var open = [];
    cards().forEach(function (card) { if (card.open) { open.push(card.id); } });
    try { localStorage.setItem(storageKey, JSON.stringify(open)); } catch (e) {}
  }
  function restoreOpen() {
    var open = [];
    try { open = JSON.parse(localStorage.getItem(storageKey) || "[]"); } catch (e) {}
    open.forEach(function (id) {
      var card = document.getElementById(id);
      if (card) { card.open = true; }
    });
  }
  function schedule(ms) { clearTimeout(timer); timer = setTimeout(check, ms); }
  function check() {
    updateStatus.textContent = "Checking for updates...";
    fetch("/api/data-check?eventKey=" + encodeURIComponent(eventKey) + "&lastUpdate=" + encodeURIComponent(last))
      .then(function (r) { if (!r.ok) { throw new Error("status " + r.status); } return r.json(); })
      .then(function (d) {
        if (d.changed) {
          saveOpen();
          updateStatus.textContent = "New data available! Refreshing...";
          setTimeout(function () { window.location.reload(); }, 500);
          return;
        }
        last = d.fingerprint;
        hashDisplay.textContent = "Hash: " + last.substring(0, 8);
        updateStatus.textContent = rendered + " • Last checked: " + new Date().toLocaleTimeString();
        delay = interval;
        schedule(delay);
      })
      .catch(function () {
        updateStatus.textContent = "Update check failed. Retrying soon...";
        delay = Math.min(delay * backoff, maxInterval);
        schedule(delay);
      });
  }

  restoreOpen();
  cards().forEach(function (card) { card.addEventListener("toggle", saveOpen); });
  document.addEventListener("visibilitychange", function () {
    if (document.visibilityState === "visible") { schedule(0); }
  });
  schedule(__INITIAL_DELAY_MS__);
})();
"#;

/// Display settings shared by both page variants.
#[derive(Debug, Clone, Copy)]
pub struct Presentation {
    pub timezone: Tz,
    pub refresh: RefreshPolicy,
}

/// Form asking for the team and event keys.
pub fn parameter_form() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Enter Team and Event Keys</title>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
<h2>Enter Details</h2>
<form method="get" action="/">
<label for="teamKey">Team Key:</label>
<input type="text" name="teamKey" id="teamKey" required placeholder="ex: frc254" />
<label for="eventKey">Event Key:</label>
<input type="text" name="eventKey" id="eventKey" required placeholder="ex: 2025miket" />
<button type="submit">Submit</button>
</form>
</div>
</body>
</html>"#
    )
}

pub fn full_page(page: &TeamPage, presentation: &Presentation) -> String {
    let body = format!(
        r#"<div class="container">{}{}</div>"#,
        view_body(&page.view, presentation),
        footer(page, presentation.timezone)
    );
    document(page, presentation, &body)
}

pub fn embed_page(page: &TeamPage, presentation: &Presentation, height: u32) -> String {
    let body = format!(
        r#"<div class="container embed" style="height: {height}px">{}{}</div>"#,
        view_body(&page.view, presentation),
        footer(page, presentation.timezone)
    );
    document(page, presentation, &body)
}

/// Parse the embed height hint; anything but a positive integer falls back
/// to the default.
pub fn embed_height(raw: Option<&str>) -> u32 {
    raw.and_then(|h| h.trim().parse::<u32>().ok())
        .filter(|h| *h > 0)
        .unwrap_or(DEFAULT_EMBED_HEIGHT)
}

fn document(page: &TeamPage, presentation: &Presentation, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Team {team} Matches</title>
<style>{STYLE}</style>
</head>
<body>
{body}
<script>{script}</script>
</body>
</html>"#,
        team = escape(page.view.team.as_str()),
        script = refresh_script(&page.view.event_key, &page.fingerprint, &presentation.refresh),
    )
}

fn footer(page: &TeamPage, timezone: Tz) -> String {
    format!(
        r#"<div class="footer"><div id="update-status">Data provided by FIRST Nexus API &bull; Last updated: {updated}</div><div id="hash-display">Hash: {hash}</div></div>"#,
        updated = page
            .fetched_at
            .with_timezone(&timezone)
            .format("%b %-d, %Y %-I:%M:%S %p"),
        hash = escape(page.fingerprint.short()),
    )
}

fn view_body(view: &TeamView, presentation: &Presentation) -> String {
    let mut html = format!(
        r#"<div class="header"><h2>Team {team} at {event}</h2><span class="now-queuing">Now Queuing: {queuing}</span></div>"#,
        team = escape(view.team.as_str()),
        event = escape(&view.event_key),
        queuing = escape(view.now_queuing.as_deref().unwrap_or("N/A")),
    );

    if view.is_empty() {
        html.push_str(r#"<p class="empty">No matches found for this team.</p>"#);
        return html;
    }

    for (phase, matches) in &view.active {
        html.push_str(&match_group(
            &format!("{phase} Matches"),
            matches,
            &view.team,
            presentation,
        ));
    }
    if !view.completed.is_empty() {
        html.push_str(&match_group(
            "Completed Matches",
            &view.completed,
            &view.team,
            presentation,
        ));
    }
    html
}

fn match_group(
    title: &str,
    matches: &[MatchRecord],
    team: &TeamNumber,
    presentation: &Presentation,
) -> String {
    let cards: String = matches
        .iter()
        .map(|m| match_card(m, team, presentation))
        .collect();
    format!(
        r#"<div class="match-group"><div class="match-group-title">{}</div>{cards}</div>"#,
        escape(title)
    )
}

fn match_card(record: &MatchRecord, team: &TeamNumber, presentation: &Presentation) -> String {
    let alliance = record.alliance_of(team).unwrap_or(Alliance::Blue);
    let estimated = record
        .estimated_start_time
        .map(|t| {
            format!(
                r#"<div class="time-row">Estimated: {}</div>"#,
                format_time(Some(t), presentation.timezone)
            )
        })
        .unwrap_or_default();
    let break_after = record
        .break_after
        .as_deref()
        .map(|b| {
            format!(
                r#"<div class="break-indicator">Break after this match: {}</div>"#,
                escape(b)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<details class="match-card" id="match-{id}">
<summary><span class="alliance-dot {alliance}-alliance"></span><span class="match-number">{label}</span><span class="match-status {status_class}">{status}</span><span class="match-time">{time}</span></summary>
<div class="match-details">
<div class="alliance-section"><div class="alliance-title">Red Alliance</div>{red}</div>
<div class="alliance-section"><div class="alliance-title">Blue Alliance</div>{blue}</div>
<div class="time-section"><div class="time-row">Scheduled: {time}</div>{estimated}</div>
{break_after}
</div>
</details>"#,
        id = escape(&record.label.as_str().split_whitespace().join("-")),
        label = escape(record.label.as_str()),
        status_class = status_class(record.status),
        status = escape(&record.status_text),
        time = format_time(record.scheduled_start_time, presentation.timezone),
        red = team_chips(&record.red_teams, Alliance::Red, team),
        blue = team_chips(&record.blue_teams, Alliance::Blue, team),
    )
}

fn team_chips(teams: &[String], alliance: Alliance, highlight: &TeamNumber) -> String {
    teams
        .iter()
        .map(|t| {
            let class = if t == highlight.as_str() {
                " highlight"
            } else {
                ""
            };
            format!(
                r#"<span class="team-chip {alliance}-team{class}">Team {}</span>"#,
                escape(t)
            )
        })
        .collect()
}

fn status_class(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Queuing => "status-queuing",
        MatchStatus::OnDeck => "status-on-deck",
        MatchStatus::OnField => "status-on-field",
        MatchStatus::Completed => "status-completed",
        MatchStatus::Scheduled | MatchStatus::Unknown => "status-default",
    }
}

fn format_time(time: Option<DateTime<Utc>>, timezone: Tz) -> String {
    match time {
        Some(t) => t.with_timezone(&timezone).format("%-I:%M %p").to_string(),
        None => "TBD".to_string(),
    }
}

fn refresh_script(event_key: &str, fingerprint: &Fingerprint, policy: &RefreshPolicy) -> String {
    REFRESH_SCRIPT
        .replace("__EVENT_KEY__", &js_string(event_key))
        .replace("__FINGERPRINT__", &js_string(fingerprint.as_str()))
        .replace(
            "__INITIAL_DELAY_MS__",
            &policy.initial_delay.as_millis().to_string(),
        )
        .replace("__INTERVAL_MS__", &policy.interval.as_millis().to_string())
        .replace("__BACKOFF__", &policy.backoff.to_string())
        .replace(
            "__MAX_INTERVAL_MS__",
            &policy.max_interval.as_millis().to_string(),
        )
}

// A JSON string is a valid JS string literal; `<` is escaped so the value
// cannot close the script element.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
