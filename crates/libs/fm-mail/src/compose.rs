//! Building the report e-mail.

use fm_config::MailConfig;
use fm_report::Report;
use lettre::{
    Message,
    message::{Attachment, Mailbox, MultiPart, header::ContentType},
};

use crate::prelude::*;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Builds the report message.
///
/// The body is a `multipart/alternative` with the plain-text and HTML
/// renderings, followed by the CSV export as a named attachment.
pub fn compose(report: &Report, settings: &MailConfig) -> Result<Message> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&settings.sender)?)
        .subject(settings.subject.clone())
        .user_agent(concat!("failman/", env!("CARGO_PKG_VERSION")).to_string());
    for recipient in &settings.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let attachment = Attachment::new(settings.attachment_name.clone())
        .body(report.csv.clone(), ContentType::parse(CSV_CONTENT_TYPE)?);

    let body = MultiPart::mixed()
        .multipart(MultiPart::alternative_plain_html(
            report.text.clone(),
            report.html.clone(),
        ))
        .singlepart(attachment);

    Ok(builder.multipart(body)?)
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address.parse().map_err(|source| Error::Address {
        address: address.to_string(),
        source,
    })
}
