use chrono::{DateTime, Local, Utc};
use log::{error, info};
use serde::Serialize;

use crate::{
    api::Mailer,
    config::Config,
    model::{DeliveryRecord, OrderItem, OrderNumber},
};

pub const DELIVERY_FAILED_MESSAGE: &str =
    "We encountered an issue sending your order confirmation. Please contact our support team.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str =
    "An unexpected error occurred. Please try again or contact our support team.";

/// Параметры письма клиенту.
#[derive(Debug, Serialize)]
struct CustomerParams<'a> {
    to_email: &'a str,
    to_name: &'a str,
    order_number: &'a str,
    order_date: &'a str,
    order_time: &'a str,
    order_summary: &'a str,
    order_pdf: &'a str,
}

/// Параметры письма отделу продаж.
#[derive(Debug, Serialize)]
struct SalesParams<'a> {
    to_email: &'a str,
    order_number: &'a str,
    order_date: &'a str,
    customer_name: &'a str,
    company_name: &'a str,
    customer_email: &'a str,
    customer_phone: &'a str,
    delivery_address: &'a str,
    delivery_date: &'a str,
    delivery_time: &'a str,
    crane_truck: &'a str,
    order_summary: &'a str,
    order_pdf: &'a str,
}

/// Текстовая сводка заказа: по строке на позицию.
pub fn order_summary(items: &[OrderItem]) -> String {
    items
        .iter()
        .map(OrderItem::summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Рассылает два письма по одному заказу: клиенту и в отдел продаж.
pub struct Dispatcher<'a, M: Mailer> {
    mailer: &'a M,
    cfg: &'a Config,
}

impl<'a, M: Mailer> Dispatcher<'a, M> {
    pub fn new(mailer: &'a M, cfg: &'a Config) -> Self {
        Self { mailer, cfg }
    }

    /// Отправляет оба письма и возвращает номер заказа.
    ///
    /// Номер заказа и дата в письмах берутся из `now`. Письма независимы:
    /// неудача одного не отменяет попытку отправить другое. Успех только
    /// если ушли оба.
    pub fn dispatch(
        &self,
        now: DateTime<Utc>,
        record: &DeliveryRecord,
        items: &[OrderItem],
        pdf_base64: &str,
    ) -> DispatchResult {
        let order_number = OrderNumber::generate(now);
        let order_date = now.with_timezone(&Local).format("%d/%m/%Y").to_string();
        let summary = order_summary(items);

        let customer = serde_json::to_value(CustomerParams {
            to_email: &record.email,
            to_name: &record.site_contact_name,
            order_number: order_number.as_str(),
            order_date: &order_date,
            order_time: &record.delivery_time,
            order_summary: &summary,
            order_pdf: pdf_base64,
        })?;

        let sales = serde_json::to_value(SalesParams {
            to_email: &self.cfg.sales_email,
            order_number: order_number.as_str(),
            order_date: &order_date,
            customer_name: &record.site_contact_name,
            company_name: &record.company_name,
            customer_email: &record.email,
            customer_phone: &record.phone_number,
            delivery_address: &record.delivery_address,
            delivery_date: &record.delivery_date,
            delivery_time: &record.delivery_time,
            crane_truck: &record.crane_truck,
            order_summary: &summary,
            order_pdf: pdf_base64,
        })?;

        let customer_sent = self.send("customer", &self.cfg.customer_template_id, &customer);
        let sales_sent = self.send("sales", &self.cfg.sales_template_id, &sales);

        if customer_sent && sales_sent {
            info!("Order {} confirmation sent to customer and sales team", order_number);
            return Ok(order_number);
        }

        let err = DispatchError::Delivery {
            order_number,
            customer_sent,
            sales_sent,
        };
        error!("{}", err);
        Err(err)
    }

    fn send(&self, recipient: &str, template_id: &str, params: &serde_json::Value) -> bool {
        match self.mailer.send(template_id, params) {
            Ok(()) => {
                info!("Email to {} sent", recipient);
                true
            }
            Err(e) => {
                error!("Failed to send email to {}: {:#}", recipient, e);
                false
            }
        }
    }
}

pub type DispatchResult = std::result::Result<OrderNumber, DispatchError>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("order {order_number}: customer email sent: {customer_sent}, sales email sent: {sales_sent}")]
    Delivery {
        order_number: OrderNumber,
        customer_sent: bool,
        sales_sent: bool,
    },

    #[error("build template params: {0}")]
    Params(#[from] serde_json::Error),
}

impl DispatchError {
    /// Сообщение для пользователя. Причины намеренно не различаются.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Delivery { .. } => DELIVERY_FAILED_MESSAGE,
            Self::Params(_) => UNEXPECTED_FAILURE_MESSAGE,
        }
    }
}
