//! Email delivery for transactional notifications.
//!
//! Uses SMTP via lettre with Askama templates for the bodies. When SMTP is
//! not configured the service runs in simulation mode: every send is logged
//! at info level instead of delivered, so development environments work
//! without a relay.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::MultiPart,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// HTML template for the purchase confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    name: &'a str,
    order_id: &'a str,
    products: &'a str,
    total: &'a str,
}

/// Plain text template for the purchase confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    name: &'a str,
    order_id: &'a str,
    products: &'a str,
    total: &'a str,
}

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeHtml<'a> {
    name: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeText<'a> {
    name: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional emails.
///
/// `transport` is `None` in simulation mode.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl EmailService {
    /// Create an email service from optional SMTP configuration.
    ///
    /// With no configuration the service logs sends instead of delivering.
    ///
    /// # Errors
    ///
    /// Returns `SmtpError` if the relay address is invalid.
    pub fn new(config: Option<&EmailConfig>, from_address: &str) -> Result<Self, SmtpError> {
        let transport = match config {
            Some(config) => {
                let credentials = Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.expose_secret().to_owned(),
                );
                let transport =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                        .port(config.smtp_port)
                        .credentials(credentials)
                        .build();
                Some(transport)
            }
            None => {
                tracing::info!("SMTP not configured; emails will be logged, not sent");
                None
            }
        };

        Ok(Self {
            transport,
            from_address: from_address.to_owned(),
        })
    }

    /// Send the purchase confirmation for a placed order.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if a template fails to render or SMTP delivery
    /// fails.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order: &Order,
    ) -> Result<(), EmailError> {
        let order_id = order.id.to_string();
        let products = order.product_summary();
        let total = format!("${}", order.total_amount);

        let html = OrderConfirmationHtml {
            name,
            order_id: &order_id,
            products: &products,
            total: &total,
        }
        .render()?;
        let text = OrderConfirmationText {
            name,
            order_id: &order_id,
            products: &products,
            total: &total,
        }
        .render()?;

        self.send_multipart(to, "¡Gracias por tu compra en Punto y Lana!", &text, &html)
            .await
    }

    /// Send the welcome email after registration.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if a template fails to render or SMTP delivery
    /// fails.
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), EmailError> {
        let html = WelcomeHtml { name }.render()?;
        let text = WelcomeText { name }.render()?;

        self.send_multipart(to, "Bienvenida a Punto y Lana", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let Some(transport) = &self.transport else {
            tracing::info!(to, subject, "Simulated email (SMTP not configured)");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_owned()))?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text_body.to_owned(),
                html_body.to_owned(),
            ))?;

        transport.send(message).await?;
        tracing::info!(to, subject, "Email sent");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use punto_y_lana_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};
    use rust_decimal::Decimal;

    use crate::models::OrderItem;

    fn order() -> Order {
        Order {
            id: OrderId::new(7),
            user_id: UserId::new(1),
            date: Utc::now(),
            total_amount: Decimal::new(3550, 2),
            status: OrderStatus::Pending,
            shipping_address: None,
            shipping_phone: None,
            notes: None,
            payment_method: None,
            shipping_company: None,
            tracking_number: None,
            tracking_url: None,
            shipped_at: None,
            delivered_at: None,
            items: vec![OrderItem {
                id: OrderItemId::new(1),
                product_id: ProductId::new(3),
                product_name: "Kit amigurumi gato".to_owned(),
                quantity: 1,
                price: Decimal::new(3550, 2),
            }],
        }
    }

    #[test]
    fn test_order_confirmation_templates_render() {
        let order = order();
        let html = OrderConfirmationHtml {
            name: "Carla",
            order_id: "7",
            products: &order.product_summary(),
            total: "$35.50",
        }
        .render()
        .unwrap();

        assert!(html.contains("Carla"));
        assert!(html.contains("Kit amigurumi gato"));
        assert!(html.contains("$35.50"));

        let text = OrderConfirmationText {
            name: "Carla",
            order_id: "7",
            products: &order.product_summary(),
            total: "$35.50",
        }
        .render()
        .unwrap();
        assert!(text.contains("#7"));
    }

    #[test]
    fn test_welcome_templates_render() {
        assert!(WelcomeHtml { name: "Carla" }.render().unwrap().contains("Carla"));
        assert!(WelcomeText { name: "Carla" }.render().unwrap().contains("Carla"));
    }

    #[tokio::test]
    async fn test_simulation_mode_send_succeeds() {
        let service = EmailService::new(None, "noreply@puntoylana.com").unwrap();
        service
            .send_order_confirmation("carla@puntoylana.com", "Carla", &order())
            .await
            .unwrap();
    }
}
