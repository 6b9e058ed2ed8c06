//! Digest rendering and SMTP delivery.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use listings::JobRecord;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("SMTP_USER/SMTP_PASS are not configured")]
    MissingCredentials,

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("send task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Render the digest as an HTML table, or a "no matches" note.
pub fn render_digest(
    company_name: &str,
    keywords: &[String],
    max_age_days: i64,
    jobs: &[JobRecord],
) -> String {
    if jobs.is_empty() {
        return format!("<h2>No recent matches (≤ {max_age_days} days) for {company_name}</h2>");
    }

    let rows: String = jobs
        .iter()
        .map(|job| {
            format!(
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
                job.link, job.title, job.location, job.posted_text
            )
        })
        .collect();

    let filter = if keywords.is_empty() {
        "(none)".to_string()
    } else {
        keywords.join(", ")
    };

    format!(
        "<h2>{company_name} careers (last {max_age_days} days)</h2>\
         <p>Filter: {filter}</p>\
         <table border=\"1\" cellpadding=\"6\" cellspacing=\"0\">\
         <tr><th>Title</th><th>Location</th><th>Posted / Updated</th></tr>\
         {rows}\
         </table>\
         <p>Total (fresh): {count}</p>",
        count = jobs.len()
    )
}

/// Send an HTML digest to `recipient` over SMTP.
///
/// Port 465 means implicit TLS; anything else uses STARTTLS. The blocking
/// lettre transport runs on the blocking pool and the result is surfaced,
/// so callers can report delivery failures.
pub async fn send_digest(
    config: &Config,
    recipient: &str,
    subject: &str,
    html: String,
) -> Result<(), DeliveryError> {
    let user = config
        .smtp_user
        .clone()
        .ok_or(DeliveryError::MissingCredentials)?;
    let pass = config
        .smtp_pass
        .clone()
        .ok_or(DeliveryError::MissingCredentials)?;

    let from: Mailbox = user.parse()?;
    let to: Mailbox = recipient.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(MultiPart::alternative_plain_html(
            "Your client does not support HTML.".to_string(),
            html,
        ))?;

    let host = config.smtp_host.clone();
    let port = config.smtp_port;
    // Gmail app passwords are shown with spaces
    let credentials = Credentials::new(user, pass.replace(' ', ""));

    let recipient = recipient.to_string();
    tokio::task::spawn_blocking(move || -> Result<(), DeliveryError> {
        let builder = if port == 465 {
            SmtpTransport::relay(&host)?
        } else {
            SmtpTransport::starttls_relay(&host)?
        };
        let mailer = builder.port(port).credentials(credentials).build();
        mailer.send(&message)?;
        Ok(())
    })
    .await??;

    info!(%recipient, "digest sent");
    Ok(())
}
