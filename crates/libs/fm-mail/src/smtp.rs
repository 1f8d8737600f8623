//! Delivery through an SMTP relay that trusts us by source address.

use fm_config::{MailConfig, SmtpSecurity};
use fm_report::Report;
use lettre::{AsyncSmtpTransport, AsyncTransport as _, Tokio1Executor};
use tracing::info;

use crate::{ReportMailer, compose::compose, prelude::*};

/// Sends reports through the configured relay.
///
/// No credentials are ever presented; the relay is expected to allow the
/// sender by IP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    fn transport(settings: &MailConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let smtp_error = |source| Error::Smtp {
            relay: settings.relay.clone(),
            port: settings.port,
            source,
        };
        let builder = match settings.security {
            SmtpSecurity::Tls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.relay).map_err(smtp_error)?
            }
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.relay)
                    .map_err(smtp_error)?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.relay.as_str())
            }
        };
        Ok(builder
            .port(settings.port)
            .timeout(Some(settings.timeout))
            .build())
    }
}

impl ReportMailer for SmtpMailer {
    async fn send(&self, report: &Report, settings: &MailConfig) -> Result<()> {
        let message = compose(report, settings)?;
        let transport = Self::transport(settings)?;

        info!(
            "Sending report to {} via {}:{}",
            settings.recipients.join(", "),
            settings.relay,
            settings.port
        );
        let response = transport
            .send(message)
            .await
            .map_err(|source| Error::Smtp {
                relay: settings.relay.clone(),
                port: settings.port,
                source,
            })?;
        info!("Relay accepted the report ({})", response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::tests::settings;
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
        sync::oneshot,
    };

    fn report() -> Report {
        Report {
            html: "<p>1 failure</p>".to_string(),
            csv: b"Branch,Builder\nmain,linux\n".to_vec(),
            text: "1 failure".to_string(),
            failures: 1,
        }
    }

    /// Minimal plaintext SMTP server accepting one message.
    ///
    /// Answers `RCPT TO` with `rcpt_reply` and hands the received envelope
    /// commands and data back through the returned channel.
    async fn fake_relay(rcpt_reply: &'static str) -> (u16, oneshot::Receiver<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut lines = BufReader::new(reader).lines();
            let mut received = Vec::new();
            let mut in_data = false;

            writer.write_all(b"220 localhost ESMTP fake\r\n").await.unwrap();
            while let Ok(Some(line)) = lines.next_line().await {
                if in_data {
                    if line == "." {
                        writer.write_all(b"250 2.0.0 queued\r\n").await.unwrap();
                        let _ = tx.send(std::mem::take(&mut received));
                        break;
                    }
                    received.push(line);
                    continue;
                }
                received.push(line.clone());
                let upper = line.to_uppercase();
                let reply: &[u8] = if upper.starts_with("EHLO") || upper.starts_with("HELO") {
                    b"250 localhost\r\n"
                } else if upper.starts_with("MAIL FROM") {
                    b"250 2.1.0 ok\r\n"
                } else if upper.starts_with("RCPT TO") {
                    rcpt_reply.as_bytes()
                } else if upper == "DATA" {
                    in_data = true;
                    b"354 go ahead\r\n"
                } else if upper == "QUIT" {
                    b"221 bye\r\n"
                } else {
                    b"250 ok\r\n"
                };
                writer.write_all(reply).await.unwrap();
            }
        });

        (port, rx)
    }

    fn plaintext_settings(port: u16) -> MailConfig {
        let mut settings = settings();
        settings.security = SmtpSecurity::None;
        settings.port = port;
        settings
    }

    #[tokio::test]
    async fn sends_report_through_relay() -> Result<()> {
        let (port, received) = fake_relay("250 2.1.5 ok\r\n").await;

        SmtpMailer.send(&report(), &plaintext_settings(port)).await?;

        let lines = received.await.unwrap();
        assert!(lines.iter().any(|l| l.to_uppercase().starts_with("MAIL FROM:<CI@EXAMPLE.ORG>")));
        assert_eq!(
            lines.iter().filter(|l| l.to_uppercase().starts_with("RCPT TO")).count(),
            2
        );
        assert!(!lines.iter().any(|l| l.to_uppercase().starts_with("AUTH")));
        assert!(lines.iter().any(|l| l.contains("failed_builds.csv")));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_recipient_is_an_error() {
        let (port, _received) = fake_relay("550 5.7.1 relaying denied\r\n").await;

        let err = SmtpMailer
            .send(&report(), &plaintext_settings(port))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Smtp { .. }));
    }

    #[tokio::test]
    async fn unreachable_relay_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = SmtpMailer
            .send(&report(), &plaintext_settings(port))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Smtp { port: p, .. } if p == port));
    }
}
