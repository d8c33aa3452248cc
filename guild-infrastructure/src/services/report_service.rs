use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use tracing::{error, info};

use guild_application::AppState;
use guild_domain::{today, DailyActivityRecord, ReportSummary, RuntimeConfig};

use crate::utils::write_atomic;

pub async fn schedule_reports(state: AppState) {
    loop {
        let next = match next_report_time(&state.config, Local::now()) {
            Ok(next) => next,
            Err(err) => {
                error!("report schedule unavailable: {}", err);
                return;
            }
        };
        let duration = next.signed_duration_since(Local::now());
        let sleep_ms = duration.num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        if let Err(err) = generate_daily_reports(&state).await {
            error!("report generation failed: {}", err);
        }
    }
}

/// Writes one report per known guild for today and posts the webhook
/// summary when configured.
pub async fn generate_daily_reports(state: &AppState) -> Result<()> {
    let date = today();
    let mut guilds: Vec<String> = state.guild_settings.read().await.keys().cloned().collect();
    if !guilds.contains(&state.config.default_guild_id) {
        guilds.push(state.config.default_guild_id.clone());
    }
    guilds.sort();

    for guild_id in guilds {
        let records = state.daily_log_repo.list_records(&guild_id, &date, &date).await?;
        if records.is_empty() {
            continue;
        }
        let summary = ReportSummary::from_records(&records);
        let path = Path::new(&state.config.report_dir)
            .join(&guild_id)
            .join(format!("{}.html", date));
        write_atomic(&path, render_report(&guild_id, &date, &summary, &records).as_bytes()).await?;
        info!("wrote report {}", path.display());

        if let Some(url) = &state.config.webhook_url {
            let link = format!(
                "{}/reports/{}/{}.html",
                state.config.public_base_url.trim_end_matches('/'),
                guild_id,
                date
            );
            let payload = render_webhook_payload(
                state.config.webhook_template.as_deref(),
                &guild_id,
                &date,
                &summary,
                &link,
            );
            if let Err(err) = send_webhook(url, payload, state.config.request_timeout_seconds).await {
                error!("report webhook for {} failed: {}", guild_id, err);
            }
        }
    }
    Ok(())
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
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

pub fn render_report(guild_id: &str, date: &str, summary: &ReportSummary, records: &[DailyActivityRecord]) -> String {
    let mut sorted: Vec<&DailyActivityRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.met_requirement
            .cmp(&b.met_requirement)
            .then_with(|| b.total_gold.cmp(&a.total_gold))
    });

    let mut rows = String::new();
    for record in sorted {
        let status = if record.met_requirement { "met" } else { "missed" };
        let best_item = record
            .donations
            .iter()
            .max_by_key(|donation| donation.percentage_of_initial)
            .map(|donation| format!("{} ({}%)", escape_html(&donation.item), donation.percentage_of_initial))
            .unwrap_or_else(|| "-".to_string());
        let reasons = [
            (record.meets_gold_requirement, "gold"),
            (record.meets_item_requirement, "item"),
            (record.manual_override.is_some(), "override"),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| *label)
        .collect::<Vec<_>>()
        .join(", ");
        rows.push_str(&format!(
            "<tr data-status=\"{status}\">\
            <td class=\"ign\">{ign}</td>\
            <td class=\"num\">{raids}</td>\
            <td class=\"num\">{challenge}</td>\
            <td class=\"num\">{deposits}</td>\
            <td class=\"num\">{total}</td>\
            <td>{best_item}</td>\
            <td><span class=\"badge {status}\">{status}</span> {reasons}</td>\
            </tr>",
            status = status,
            ign = escape_html(&record.ign),
            raids = record.raids,
            challenge = record.challenge_gold,
            deposits = record.deposits_gold,
            total = record.total_gold,
            best_item = best_item,
            reasons = reasons,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{guild} activity {date}</title>
<style>
body {{ margin: 0; font-family: "IBM Plex Sans", "Source Sans 3", sans-serif; background: #0f172a; color: #e2e8f0; }}
.page {{ max-width: 1100px; margin: 0 auto; padding: 32px 20px 48px; }}
.summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; margin: 18px 0; }}
.card {{ background: #ffffff; color: #0f172a; padding: 14px 16px; border-radius: 12px; }}
.card .label {{ font-size: 11px; text-transform: uppercase; letter-spacing: 0.12em; color: #64748b; }}
.card .value {{ font-size: 22px; font-weight: 700; margin-top: 6px; }}
.controls {{ margin: 12px 0; }}
.controls input {{ padding: 8px 10px; border-radius: 8px; border: 1px solid #cbd5e1; width: 260px; }}
table {{ width: 100%; border-collapse: collapse; background: #ffffff; color: #0f172a; border-radius: 12px; overflow: hidden; font-size: 14px; }}
th {{ text-align: left; font-size: 11px; text-transform: uppercase; letter-spacing: 0.1em; background: #f1f5f9; color: #64748b; padding: 10px 12px; }}
td {{ padding: 10px 12px; border-bottom: 1px solid #e2e8f0; }}
td.num {{ text-align: right; font-variant-numeric: tabular-nums; }}
.badge {{ padding: 3px 9px; border-radius: 999px; font-size: 12px; font-weight: 600; color: #ffffff; }}
.badge.met {{ background: #16a34a; }}
.badge.missed {{ background: #dc2626; }}
</style>
</head>
<body>
<div class="page">
  <h1>{guild} daily activity</h1>
  <p>Date: {date}</p>
  <div class="summary">
    <div class="card"><div class="label">Members</div><div class="value">{members}</div></div>
    <div class="card"><div class="label">Met</div><div class="value">{met}</div></div>
    <div class="card"><div class="label">Missed</div><div class="value">{not_met}</div></div>
    <div class="card"><div class="label">Total gold</div><div class="value">{total_gold}</div></div>
  </div>
  <div class="controls"><input id="search" type="search" placeholder="Filter by name" /></div>
  <table>
    <thead><tr>
      <th>Member</th><th>Raids</th><th>Challenge gold</th><th>Deposits</th><th>Total</th><th>Best item</th><th>Status</th>
    </tr></thead>
    <tbody id="rows">
    {rows}
    </tbody>
  </table>
</div>
<script>
  const search = document.getElementById('search');
  const rows = Array.from(document.querySelectorAll('#rows tr'));
  search.addEventListener('input', () => {{
    const keyword = search.value.trim().toLowerCase();
    rows.forEach(row => {{
      row.style.display = !keyword || row.textContent.toLowerCase().includes(keyword) ? '' : 'none';
    }});
  }});
</script>
</body>
</html>"#,
        guild = escape_html(guild_id),
        date = date,
        members = summary.members,
        met = summary.met,
        not_met = summary.not_met,
        total_gold = summary.total_gold,
        rows = rows,
    )
}

pub fn render_webhook_payload(
    template: Option<&str>,
    guild_id: &str,
    date: &str,
    summary: &ReportSummary,
    link: &str,
) -> String {
    let template = template
        .unwrap_or(r#"{"message":"{guild} {date}: {met}/{members} met requirement, {total_gold} gold {link}"}"#);
    template
        .replace("{guild}", guild_id)
        .replace("{date}", date)
        .replace("{members}", &summary.members.to_string())
        .replace("{met}", &summary.met.to_string())
        .replace("{not_met}", &summary.not_met.to_string())
        .replace("{total_gold}", &summary.total_gold.to_string())
        .replace("{link}", link)
}

async fn send_webhook(url: &str, payload: String, timeout_seconds: u64) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds.max(3)))
        .build()?;
    client
        .post(url)
        .header("Content-Type", "application/json")
        .body(payload)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

pub fn next_report_time(config: &RuntimeConfig, now: DateTime<Local>) -> Result<DateTime<Local>> {
    let today = now.date_naive();
    let at = |day: NaiveDate| -> Result<DateTime<Local>> {
        let target = day
            .and_hms_opt(config.report_hour, config.report_minute, 0)
            .ok_or_else(|| anyhow!("invalid report time {}:{}", config.report_hour, config.report_minute))?;
        Local
            .from_local_datetime(&target)
            .earliest()
            .ok_or_else(|| anyhow!("report time {} does not exist locally", target))
    };
    let dt = at(today)?;
    if dt > now {
        return Ok(dt);
    }
    let next = today.succ_opt().ok_or_else(|| anyhow!("date out of range"))?;
    at(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guild_domain::{ManualOverride, PricedDonation};

    fn record(ign: &str, total_gold: i64, met: bool) -> DailyActivityRecord {
        DailyActivityRecord {
            id: ign.to_string(),
            guild_id: "ember".to_string(),
            ign: ign.to_string(),
            date: "2024-03-09".to_string(),
            raids: 2,
            challenge_gold: total_gold,
            deposits_gold: 0,
            total_gold,
            donations: vec![PricedDonation::new("Maple Log", 60, 5, 100)],
            meets_gold_requirement: false,
            meets_item_requirement: met,
            manual_override: None,
            met_requirement: met,
            updated_at: 0,
        }
    }

    #[test]
    fn test_render_report_escapes_and_summarizes() {
        let records = vec![record("<Ann>", 300, true), record("Ben", 100, false)];
        let summary = ReportSummary::from_records(&records);
        let html = render_report("ember", "2024-03-09", &summary, &records);
        assert!(html.contains("&lt;Ann&gt;"));
        assert!(!html.contains("<Ann>"));
        assert!(html.contains("Maple Log (60%)"));
        assert!(html.contains("<div class=\"label\">Met</div><div class=\"value\">1</div>"));
        // missed rows come first
        let ben = html.find("Ben").unwrap();
        let ann = html.find("&lt;Ann&gt;").unwrap();
        assert!(ben < ann);
    }

    #[test]
    fn test_override_reason_is_listed() {
        let mut excused = record("Cy", 0, true);
        excused.meets_item_requirement = false;
        excused.manual_override = Some(ManualOverride {
            set_by: "lead".to_string(),
            note: None,
            set_at: 0,
        });
        let summary = ReportSummary::from_records(std::slice::from_ref(&excused));
        let html = render_report("ember", "2024-03-09", &summary, &[excused]);
        assert!(html.contains("</span> override</td>"));
    }

    #[test]
    fn test_webhook_payload_placeholders() {
        let summary = ReportSummary {
            members: 10,
            met: 7,
            not_met: 3,
            total_gold: 42000,
        };
        let payload = render_webhook_payload(
            Some("{guild}|{date}|{met}/{members}|{not_met}|{total_gold}|{link}"),
            "ember",
            "2024-03-09",
            &summary,
            "http://x/r",
        );
        assert_eq!(payload, "ember|2024-03-09|7/10|3|42000|http://x/r");
    }

    #[test]
    fn test_next_report_time_rolls_to_tomorrow() {
        let mut config = test_config();
        config.report_hour = 9;
        config.report_minute = 0;
        let morning = Local.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).earliest().unwrap();
        let evening = Local.with_ymd_and_hms(2024, 3, 9, 18, 0, 0).earliest().unwrap();
        assert_eq!(next_report_time(&config, morning).unwrap().date_naive(), morning.date_naive());
        assert_eq!(
            next_report_time(&config, evening).unwrap().date_naive(),
            evening.date_naive().succ_opt().unwrap()
        );
    }

    fn test_config() -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            default_guild_id: "ember".to_string(),
            access_tokens: Vec::new(),
            data_dir: "./data".to_string(),
            settings_path: "./settings.yaml".to_string(),
            report_dir: "./reports".to_string(),
            public_base_url: "http://localhost".to_string(),
            market_api_url: None,
            market_api_key: None,
            price_cache_ttl_hours: 24,
            price_lookup_delay_ms: 0,
            default_donation_threshold: 5000,
            inactivity_days: 3,
            webhook_url: None,
            webhook_template: None,
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
            report_hour: 0,
            report_minute: 0,
        }
    }
}
