use anyhow::Context;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::config::Config;
use crate::models::booking::Booking;

pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Returns None if SMTP is not fully configured.
    pub fn new(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let username = config.smtp_username.clone()?;
        let password = config.smtp_password.clone()?;
        let from_addr = config.smtp_from.as_deref()?;

        let port = config.smtp_port.unwrap_or(587);
        let creds = Credentials::new(username, password);

        let transport = if port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .ok()?
                .credentials(creds)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .ok()?
                .credentials(creds)
                .build()
        };

        let from: Mailbox = from_addr.parse().ok()?;

        Some(Self { transport, from })
    }

    // ─── Private helpers ─────────────────────────────────────────────────────

    fn new_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }

    /// Wraps inner HTML content in the restaurant's email layout.
    fn wrap_html(restaurant_name: &str, restaurant_address: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="it">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <title>{restaurant_name}</title>
</head>
<body style="margin:0;padding:0;background-color:#f5f5f5;font-family:Georgia,serif">
  <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#f5f5f5;padding:40px 16px">
    <tr>
      <td align="center">
        <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="max-width:560px">
          <tr>
            <td align="center" style="padding:32px 24px;background-color:#3d1a1a;border-radius:12px 12px 0 0">
              <p style="margin:0;font-size:26px;letter-spacing:2px;color:#fecddd">{restaurant_name}</p>
              <p style="margin:8px 0 0 0;font-size:13px;letter-spacing:3px;color:#fecddd;opacity:0.8">RISTORANTE</p>
            </td>
          </tr>
          <tr>
            <td style="background:#4a1f1f;padding:36px 32px;color:#fecddd">
              {content}
            </td>
          </tr>
          <tr>
            <td align="center" style="padding:24px;background-color:#3d1a1a;border-radius:0 0 12px 12px">
              <p style="margin:0 0 6px 0;font-size:13px;color:#ffa6b8">{restaurant_address}</p>
              <p style="margin:0;font-size:11px;color:#cc8899">Messaggio generato automaticamente dal sistema prenotazioni</p>
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#
        )
    }

    /// The booking detail rows shared by both messages.
    fn booking_rows(booking: &Booking, day_name: &str) -> String {
        let when = format!(
            "{} {} · ore {}",
            day_name,
            booking.date.format("%d/%m/%Y"),
            booking.time
        );
        let guests = format!(
            "{} {}",
            booking.guests,
            if booking.guests == 1 { "persona" } else { "persone" }
        );
        let notes_row = match booking.notes.as_deref() {
            Some(notes) => format!(
                r#"<tr><td style="padding:6px 0;color:#ffa6b8;vertical-align:top">Note:</td><td style="padding:6px 0;color:#ffffff">{}</td></tr>"#,
                notes.replace('<', "&lt;")
            ),
            None => String::new(),
        };
        format!(
            r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background:#5a2828;border:1px solid #8a4a4a;border-radius:8px;padding:8px 16px;font-size:15px">
  <tr><td style="padding:6px 0;width:100px;color:#ffa6b8">Nome:</td><td style="padding:6px 0;color:#ffffff">{name}</td></tr>
  <tr><td style="padding:6px 0;color:#ffa6b8">Data:</td><td style="padding:6px 0;color:#ffffff">{when}</td></tr>
  <tr><td style="padding:6px 0;color:#ffa6b8">Ospiti:</td><td style="padding:6px 0;color:#ffffff">{guests}</td></tr>
  <tr><td style="padding:6px 0;color:#ffa6b8">Telefono:</td><td style="padding:6px 0;color:#ffffff">{phone}</td></tr>
  <tr><td style="padding:6px 0;color:#ffa6b8">Email:</td><td style="padding:6px 0;color:#ffffff">{email}</td></tr>
  {notes_row}
</table>"#,
            name = booking.customer_name,
            when = when,
            guests = guests,
            phone = booking.customer_phone,
            email = booking.customer_email,
            notes_row = notes_row,
        )
    }

    fn booking_text(booking: &Booking, day_name: &str) -> String {
        format!(
            "Nome: {}\nData: {} {} · ore {}\nOspiti: {}\nTelefono: {}\nEmail: {}\n{}",
            booking.customer_name,
            day_name,
            booking.date.format("%d/%m/%Y"),
            booking.time,
            booking.guests,
            booking.customer_phone,
            booking.customer_email,
            booking
                .notes
                .as_deref()
                .map(|n| format!("Note: {n}\n"))
                .unwrap_or_default(),
        )
    }

    async fn send_email(
        &self,
        from: Mailbox,
        to: Mailbox,
        subject: &str,
        text: &str,
        html: &str,
    ) -> anyhow::Result<()> {
        let email = Message::builder()
            .message_id(Some(self.new_message_id()))
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )
            .context("Failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("Failed to send email")?;

        Ok(())
    }

    // ─── Public methods ───────────────────────────────────────────────────────

    /// Confirmation to the customer that their request was received.
    pub async fn send_booking_confirmation(
        &self,
        config: &Config,
        booking: &Booking,
        day_name: &str,
    ) -> anyhow::Result<()> {
        let restaurant = &config.restaurant_name;
        let from = Mailbox::new(Some(restaurant.clone()), self.from.email.clone());
        let to: Mailbox = format!("{} <{}>", booking.customer_name, booking.customer_email)
            .parse()
            .or_else(|_| booking.customer_email.parse())?;

        let subject = format!("Conferma prenotazione — {restaurant}");

        let text = format!(
            "Gentile {},\n\n\
            grazie per aver scelto {restaurant}. La tua richiesta di prenotazione \
            è stata ricevuta con successo.\n\n\
            {}\n\
            Per qualsiasi modifica o annullamento, rispondi a questa email o \
            telefona al ristorante.\n\n\
            {restaurant}",
            booking.customer_name,
            Self::booking_text(booking, day_name),
        );

        let content = format!(
            r#"<h1 style="margin:0 0 8px 0;font-size:22px;font-weight:normal;color:#ffa6b8">Prenotazione Ricevuta</h1>
<p style="margin:0 0 24px 0;font-size:15px;line-height:1.6">Grazie per aver scelto {restaurant}. La tua richiesta di prenotazione è stata ricevuta con successo.</p>
{rows}
<p style="margin:24px 0 0 0;font-size:13px;line-height:1.6;color:#ffa6b8">Per qualsiasi modifica o annullamento, rispondi a questa email o telefona al ristorante. Ti aspettiamo.</p>"#,
            rows = Self::booking_rows(booking, day_name),
        );

        let html = Self::wrap_html(restaurant, &config.restaurant_address, &content);
        self.send_email(from, to, &subject, &text, &html).await
    }

    /// Notification to the restaurant that a new request arrived.
    pub async fn send_booking_notification(
        &self,
        config: &Config,
        booking: &Booking,
        day_name: &str,
        to_email: &str,
    ) -> anyhow::Result<()> {
        let restaurant = &config.restaurant_name;
        let from = Mailbox::new(Some(restaurant.clone()), self.from.email.clone());
        let to: Mailbox = to_email.parse()?;

        let subject = format!("Nuova prenotazione — {}", booking.customer_name);

        let text = format!(
            "Nuova richiesta di prenotazione ricevuta.\n\n{}",
            Self::booking_text(booking, day_name),
        );

        let content = format!(
            r#"<h1 style="margin:0 0 8px 0;font-size:22px;font-weight:normal;color:#ffa6b8">Nuova Prenotazione Ricevuta</h1>
<p style="margin:0 0 24px 0;font-size:15px;line-height:1.6">È stata ricevuta una nuova richiesta di prenotazione. Verifica i dettagli qui sotto.</p>
{rows}"#,
            rows = Self::booking_rows(booking, day_name),
        );

        let html = Self::wrap_html(restaurant, &config.restaurant_address, &content);
        self.send_email(from, to, &subject, &text, &html).await
    }
}
