//! E-mail confirmation via AWS SES

use super::{Notifier, NotifyError};
use crate::db::models::{DiningTable, Reservation, User};
use crate::utils::time::millis_to_local;
use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use chrono_tz::Tz;

const SUBJECT: &str = "Confirmación de reserva / Reservation confirmation";

#[derive(Clone)]
pub struct SesNotifier {
    ses: SesClient,
    from: String,
    tz: Tz,
}

impl SesNotifier {
    pub fn new(ses: SesClient, from: impl Into<String>, tz: Tz) -> Self {
        Self {
            ses,
            from: from.into(),
            tz,
        }
    }

    /// Build the SES client from the default AWS credential chain
    ///
    /// `SES_REGION` overrides the region when set.
    pub async fn from_env(from: impl Into<String>, tz: Tz) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let ses = match std::env::var("SES_REGION") {
            Ok(region) => {
                let ses_config = aws_config
                    .to_builder()
                    .region(aws_config::Region::new(region))
                    .build();
                SesClient::new(&ses_config)
            }
            Err(_) => SesClient::new(&aws_config),
        };
        Self::new(ses, from, tz)
    }
}

/// Plain-text confirmation body
pub fn render_confirmation(user: &User, reservation: &Reservation, table: &DiningTable, tz: Tz) -> String {
    let when = millis_to_local(reservation.reserved_at, tz)
        .map(|dt| dt.format("%B %-d, %Y %-I:%M %p").to_string())
        .unwrap_or_else(|| reservation.reserved_at.to_string());

    format!(
        "Hola {name},\n\
         ¡Gracias por elegir nuestro restaurante! Su reserva ha sido registrada.\n\
         Número de mesa: {number}\n\
         Fecha y hora: {when}\n\
         Comensales: {guests}\n\n\
         Hello {name},\n\
         Thank you for choosing our restaurant! Your reservation has been received.\n\
         Table number: {number}\n\
         Date and time: {when}\n\
         Guests: {guests}\n",
        name = user.name,
        number = table.table_number,
        guests = reservation.guests,
    )
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn reservation_created(
        &self,
        user: &User,
        reservation: &Reservation,
        table: &DiningTable,
    ) -> Result<(), NotifyError> {
        let subject = Content::builder()
            .data(SUBJECT)
            .build()
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let body_text = render_confirmation(user, reservation, table, self.tz);
        let body = Body::builder()
            .text(
                Content::builder()
                    .data(body_text)
                    .build()
                    .map_err(|e| NotifyError::Build(e.to_string()))?,
            )
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(&user.email).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        tracing::info!(to = %user.email, reservation = %reservation.id, "Reservation confirmation sent");
        Ok(())
    }
}
