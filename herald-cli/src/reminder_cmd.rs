use anyhow::{anyhow, Context, Result};
use clap::Args;
use herald_core::{compose, resolve_in, Clock, EventInfo, NotificationMessage, TIMESTAMP_LAYOUT};
use herald_webhook::{encode, DeliveryTarget, Dispatcher};

use crate::config::Config;

#[derive(Args, Debug, Clone)]
pub struct ReminderArgs {
    /// Webhook URL to post to (default: [delivery].webhook_url from config)
    #[arg(long)]
    pub webhook_url: Option<String>,

    /// CTF name
    #[arg(long, default_value = "")]
    pub ctf_name: String,

    /// CTF url
    #[arg(long, default_value = "")]
    pub ctf_url: String,

    /// Start date. Format should be 'YYYY-MM-DD HH:MM:SS'
    #[arg(long)]
    pub ctf_date_start: String,

    /// End date. Format should be 'YYYY-MM-DD HH:MM:SS'
    #[arg(long)]
    pub ctf_date_end: String,

    /// Timezone of the dates above, e.g. 'Europe/London' (default: [reporting].input_timezone)
    #[arg(long)]
    pub ctf_date_tz: Option<String>,

    /// Team name for this CTF
    #[arg(long, default_value = "")]
    pub team_name: String,

    /// Team password for this CTF
    #[arg(long, default_value = "")]
    pub team_password: String,
}

/// Everything needed to either send or display a reminder.
#[derive(Debug)]
pub struct PreparedReminder {
    pub message: NotificationMessage,
    /// Exact request body.
    pub body: String,
    pub target: Option<DeliveryTarget>,
}

/// Resolve, compose and encode. No network.
pub fn prepare(args: &ReminderArgs, cfg: &Config, clock: &dyn Clock) -> Result<PreparedReminder> {
    let reporting = cfg.reporting_tz()?;
    let tz = args
        .ctf_date_tz
        .as_deref()
        .unwrap_or(&cfg.reporting.input_timezone);

    let window = resolve_in(
        tz,
        &args.ctf_date_start,
        &args.ctf_date_end,
        TIMESTAMP_LAYOUT,
        reporting,
    )
    .context("failed to create a new challenge")?;
    tracing::debug!(
        start = %window.start().to_rfc3339(),
        end = %window.end().to_rfc3339(),
        input_tz = tz,
        "resolved challenge window"
    );

    let event = EventInfo {
        name: args.ctf_name.clone(),
        url: args.ctf_url.clone(),
        team_name: args.team_name.clone(),
        team_credential: args.team_password.clone(),
    };
    let message = compose(&event, &window, clock);
    let body = encode(&message).context("failed to encode reminder")?;

    let target = args
        .webhook_url
        .clone()
        .or_else(|| cfg.delivery.webhook_url.clone())
        .filter(|u| !u.trim().is_empty())
        .map(DeliveryTarget::new);

    Ok(PreparedReminder {
        message,
        body,
        target,
    })
}

pub async fn run(args: &ReminderArgs, cfg: &Config, dry_run: bool, clock: &dyn Clock) -> Result<()> {
    tracing::info!(dry_run, "reminder command called");
    let prepared = prepare(args, cfg, clock)?;

    if dry_run {
        tracing::info!(
            remaining = %prepared.message.sections[0].value,
            "dry-run enabled, skipping send"
        );
        print!("{}", render_dry_run(&prepared));
        return Ok(());
    }

    let target = prepared.target.ok_or_else(|| {
        anyhow!("no webhook URL: pass --webhook-url or set [delivery].webhook_url in config")
    })?;

    let dispatcher = Dispatcher::new(cfg.status_policy());
    tracing::info!(policy = ?dispatcher.status_policy(), "sending reminder message");
    dispatcher
        .send_encoded(&target, prepared.body)
        .await
        .context("failed to send message")?;

    tracing::info!("reminder sent");
    Ok(())
}

/// What would have been posted, byte for byte.
pub fn render_dry_run(prepared: &PreparedReminder) -> String {
    let url = prepared
        .target
        .as_ref()
        .map(|t| t.endpoint_url.as_str())
        .unwrap_or("<not set>");
    format!("Webhook URL: {url}\nPayload: {}\n", prepared.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use herald_core::FixedClock;

    fn args() -> ReminderArgs {
        ReminderArgs {
            webhook_url: Some("https://discord.com/api/webhooks/id/pwd".to_string()),
            ctf_name: "punkctf".to_string(),
            ctf_url: "https://ctf.example.com".to_string(),
            ctf_date_start: "2024-01-01 00:00:00".to_string(),
            ctf_date_end: "2024-02-01 00:00:00".to_string(),
            ctf_date_tz: Some("UTC".to_string()),
            team_name: "teamName".to_string(),
            team_password: "teamPassword".to_string(),
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn prepare_encodes_the_composed_message() {
        let prepared = prepare(&args(), &Config::default(), &clock()).unwrap();

        assert_eq!(prepared.body, encode(&prepared.message).unwrap());
        assert_eq!(
            prepared.message.content,
            "punkctf incoming. Register to teamName team"
        );
        assert_eq!(prepared.message.sections[0].value, "744h0m0s");
        assert_eq!(
            prepared.target,
            Some(DeliveryTarget::new("https://discord.com/api/webhooks/id/pwd"))
        );
    }

    #[test]
    fn input_zone_falls_back_to_config() {
        let mut a = args();
        a.ctf_date_tz = None;
        let mut cfg = Config::default();
        cfg.reporting.input_timezone = "Asia/Tokyo".to_string();
        cfg.reporting.timezone = "UTC".to_string();

        let prepared = prepare(&a, &cfg, &clock()).unwrap();
        let timeline = &prepared.message.sections[2].value;
        assert!(timeline.starts_with("Start at: Sun, 31 Dec 2023 15:00:00 UTC"), "{timeline}");
    }

    #[test]
    fn webhook_url_falls_back_to_config() {
        let mut a = args();
        a.webhook_url = None;
        let mut cfg = Config::default();
        cfg.delivery.webhook_url = Some("https://example.org/hook".to_string());

        let prepared = prepare(&a, &cfg, &clock()).unwrap();
        assert_eq!(prepared.target.unwrap().endpoint_url, "https://example.org/hook");
    }

    #[test]
    fn invalid_window_is_reported_with_cause() {
        let mut a = args();
        a.ctf_date_end = "2023-01-01 00:00:00".to_string();

        let err = prepare(&a, &Config::default(), &clock()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("failed to create a new challenge"), "{chain}");
        assert!(chain.contains("should be after start date"), "{chain}");
    }

    #[test]
    fn dry_run_shows_exact_body() {
        let prepared = prepare(&args(), &Config::default(), &clock()).unwrap();
        let shown = render_dry_run(&prepared);

        assert!(shown.starts_with("Webhook URL: https://discord.com/api/webhooks/id/pwd\n"));
        assert!(shown.contains(&format!("Payload: {}\n", prepared.body)));
    }

    #[test]
    fn dry_run_without_url() {
        let mut a = args();
        a.webhook_url = None;
        let prepared = prepare(&a, &Config::default(), &clock()).unwrap();
        assert!(render_dry_run(&prepared).starts_with("Webhook URL: <not set>\n"));
    }

    #[tokio::test]
    async fn dry_run_succeeds_without_network() {
        let mut a = args();
        // unroutable; a real send would fail
        a.webhook_url = Some("http://127.0.0.1:9/hook".to_string());
        run(&a, &Config::default(), true, &clock()).await.unwrap();
    }

    #[tokio::test]
    async fn send_without_url_fails_before_network() {
        let mut a = args();
        a.webhook_url = None;
        let err = run(&a, &Config::default(), false, &clock()).await.unwrap_err();
        assert!(err.to_string().contains("no webhook URL"), "{err}");
    }
}
