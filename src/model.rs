use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{catalog, newtype};

/// Все поля клиента, которые заполняются в форме.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, std::hash::Hash, derive_more::Display, enum_iterator::Sequence,
)]
pub enum CustomerField {
    #[display(fmt = "Company Name")]
    CompanyName,
    #[display(fmt = "Site Contact Person")]
    ContactPerson,
    #[display(fmt = "Phone")]
    Phone,
    #[display(fmt = "Email")]
    Email,
    #[display(fmt = "Delivery Address")]
    DeliveryAddress,
    #[display(fmt = "Delivery Date")]
    DeliveryDate,
    #[display(fmt = "Delivery Time")]
    DeliveryTime,
    #[display(fmt = "Crane Truck Request")]
    CraneTruck,
}

impl FromStr for CustomerField {
    type Err = anyhow::Error;

    /// Разбирает имя поля в том виде, в каком оно приходит из файла заказа.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "companyName" | "company_name" => Self::CompanyName,
            "contactPerson" | "contact_person" => Self::ContactPerson,
            "phone" => Self::Phone,
            "email" => Self::Email,
            "deliveryAddress" | "delivery_address" => Self::DeliveryAddress,
            "deliveryDate" | "delivery_date" => Self::DeliveryDate,
            "deliveryTime" | "delivery_time" => Self::DeliveryTime,
            "craneTruck" | "crane_truck" | "craneTrackRequest" => Self::CraneTruck,
            _ => return Err(anyhow!("unknown customer field \"{}\"", s)),
        };
        Ok(field)
    }
}

/// Нужен ли кран-манипулятор при доставке.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum CraneTruck {
    #[serde(rename = "YES")]
    #[display(fmt = "YES")]
    Yes,

    #[serde(rename = "NO")]
    #[display(fmt = "NO")]
    No,
}

impl FromStr for CraneTruck {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            _ => Err(anyhow!("expected YES or NO, got \"{}\"", s)),
        }
    }
}

/// Данные клиента и доставки в том виде, в каком их ввёл пользователь.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub company_name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub delivery_address: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub crane_truck: Option<CraneTruck>,
}

impl CustomerInfo {
    /// Возвращает текущее значение поля как строку.
    pub fn get(&self, field: CustomerField) -> String {
        match field {
            CustomerField::CompanyName => self.company_name.clone(),
            CustomerField::ContactPerson => self.contact_person.clone(),
            CustomerField::Phone => self.phone.clone(),
            CustomerField::Email => self.email.clone(),
            CustomerField::DeliveryAddress => self.delivery_address.clone(),
            CustomerField::DeliveryDate => self.delivery_date.clone(),
            CustomerField::DeliveryTime => self.delivery_time.clone(),
            CustomerField::CraneTruck => self
                .crane_truck
                .map(|c| c.to_string())
                .unwrap_or_default(),
        }
    }

    /// Проверяет, что данные пригодны для оформления заказа.
    ///
    /// Флаг крана не обязателен, всё остальное должно быть заполнено.
    pub fn validate(&self) -> ValidateResult {
        for field in enum_iterator::all::<CustomerField>() {
            if field == CustomerField::CraneTruck {
                continue;
            }
            let value = self.get(field);
            if value.trim().is_empty() {
                return Err(ValidateError::new(field, "is required"));
            }
        }

        EmailAddress::new(&self.email)
            .map_err(|e| ValidateError::new(CustomerField::Email, e))?;
        PhoneNumber::new(&self.phone)
            .map_err(|e| ValidateError::new(CustomerField::Phone, e))?;
        delivery_date_validate(&self.delivery_date)
            .map_err(|e| ValidateError::new(CustomerField::DeliveryDate, e))?;

        if !catalog::is_delivery_time(self.delivery_time.trim()) {
            return Err(ValidateError::new(
                CustomerField::DeliveryTime,
                "is not one of the offered delivery times",
            ));
        }

        Ok(())
    }
}

pub type ValidateResult = std::result::Result<(), ValidateError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{field} {reason}")]
pub struct ValidateError {
    pub field: CustomerField,
    pub reason: String,
}

impl ValidateError {
    fn new(field: CustomerField, reason: impl Display) -> Self {
        Self {
            field,
            reason: reason.to_string(),
        }
    }
}

newtype!(EmailAddress, String, email_validate);

fn email_validate(value: &str) -> anyhow::Result<()> {
    let (local, domain) = value
        .split_once('@')
        .ok_or(anyhow!("should contain @"))?;

    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return Err(anyhow!("is not a valid email address"));
    }

    let labels_ok = domain.split('.').count() >= 2 && domain.split('.').all(|l| !l.is_empty());
    if !labels_ok {
        return Err(anyhow!("should have a domain like example.com"));
    }

    Ok(())
}

newtype!(PhoneNumber, String, phone_validate);

fn phone_validate(value: &str) -> anyhow::Result<()> {
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(anyhow!("should contain only digits, spaces and + - ( )"));
    }

    if value.chars().filter(char::is_ascii_digit).count() < 6 {
        return Err(anyhow!("should contain at least 6 digits"));
    }

    Ok(())
}

pub fn delivery_date_validate(value: &str) -> anyhow::Result<()> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| anyhow!("should be a date in YYYY-MM-DD format"))
}

/// Формат даты доставки, так же как у `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Количество, введённое пользователем.
///
/// Храним исходный текст как есть, а числовое значение выводим из него один
/// раз при создании. Нечисловой текст даёт пустое значение.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quantity {
    raw: String,
    value: Option<f64>,
}

impl Quantity {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_owned();
        let value = raw.parse::<f64>().ok().filter(|v| v.is_finite());
        Self { raw, value }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Попадает ли позиция в заказ.
    pub fn is_positive(&self) -> bool {
        matches!(self.value(), Some(v) if v > 0.0)
    }

    /// Проверка ввода на уровне поля: пусто или неотрицательное число.
    pub fn validate_input(raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(());
        }
        match raw.parse::<f64>() {
            Ok(v) if !v.is_finite() => Err("should be a number".into()),
            Ok(v) if v < 0.0 => Err("should not be negative".into()),
            Ok(_) => Ok(()),
            Err(_) => Err("should be a number".into()),
        }
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Строка каталога с введённым количеством.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLine {
    pub product: catalog::Product,
    pub quantity: Quantity,
}

/// Стулья одного размера с введённым количеством.
#[derive(Debug, Clone, PartialEq)]
pub struct ChairLine {
    pub size: u32,
    pub quantity: Quantity,
}

/// Нормализованная позиция заказа: либо товар из каталога, либо стулья.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub name: &'static str,
    pub detail: Option<&'static str>,
    pub selected_size: Option<u32>,
    pub quantity: Quantity,
    pub unit: &'static str,
}

impl OrderItem {
    pub fn from_product(line: &ProductLine) -> Self {
        Self {
            name: line.product.name,
            detail: line.product.detail,
            selected_size: None,
            quantity: line.quantity.clone(),
            unit: line.product.unit,
        }
    }

    pub fn from_chair(line: &ChairLine) -> Self {
        Self {
            name: catalog::CHAIR_NAME,
            detail: None,
            selected_size: Some(line.size),
            quantity: line.quantity.clone(),
            unit: catalog::CHAIR_UNIT,
        }
    }

    /// Значение колонки "Detail" в документе.
    pub fn detail_column(&self) -> String {
        match (self.selected_size, self.detail) {
            (Some(size), _) => format!("{}mm", size),
            (None, Some(d)) if !d.is_empty() => d.to_owned(),
            _ => catalog::DETAIL_PLACEHOLDER.to_owned(),
        }
    }

    /// Строка для текстовой сводки в письме.
    pub fn summary_line(&self) -> String {
        let size = self
            .selected_size
            .map(|s| format!(" ({}mm)", s))
            .unwrap_or_default();
        format!("{}{}: {} {}", self.name, size, self.quantity, self.unit)
    }
}

/// Плоская запись о клиенте и доставке в словаре документа и писем.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub company_name: String,
    pub site_contact_name: String,
    pub phone_number: String,
    pub email: String,
    pub delivery_address: String,
    pub delivery_date: String,
    pub delivery_time: String,
    pub crane_truck: String,
}

/// Номер заказа. Получается из времени оформления и нигде не хранится.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("ORD-{}", now.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled() -> CustomerInfo {
        CustomerInfo {
            company_name: "Acme Co".into(),
            contact_person: "Jane Doe".into(),
            phone: "+64 21 555 0199".into(),
            email: "jane@acme.co.nz".into(),
            delivery_address: "1 Quay St, Auckland".into(),
            delivery_date: "2026-11-02".into(),
            delivery_time: "8:00".into(),
            crane_truck: None,
        }
    }

    #[cfg(test)]
    mod quantity {
        use super::*;

        macro_rules! is_positive_tests {
            ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (expected, input) = $value;
                    assert_eq!(expected, Quantity::parse(input).is_positive());
                }
            )*
            }
        }

        is_positive_tests! {
            empty_is_not_positive: (false, ""),
            blank_is_not_positive: (false, "   "),
            zero_is_not_positive: (false, "0"),
            zero_fraction_is_not_positive: (false, "0.0"),
            negative_is_not_positive: (false, "-3"),
            text_is_not_positive: (false, "abc"),
            infinity_is_not_positive: (false, "inf"),
            integer_is_positive: (true, "2"),
            fraction_is_positive: (true, "0.5"),
            padded_is_positive: (true, " 5 "),
        }

        #[test]
        fn keeps_entered_text() {
            let q = Quantity::parse(" 2.50 ");
            assert_eq!(q.to_string(), "2.50");
            assert_eq!(q.value(), Some(2.5));
        }

        #[test]
        fn validate_input() {
            assert!(Quantity::validate_input("").is_ok());
            assert!(Quantity::validate_input("12").is_ok());
            assert!(Quantity::validate_input("-1").is_err());
            assert!(Quantity::validate_input("ten").is_err());
        }

        macro_rules! validate_input_tests_fail {
            ($($name:ident: $value:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let (expected, input) = $value;
                    assert_eq!(Err(String::from(expected)), Quantity::validate_input(input));
                }
            )*
            }
        }

        validate_input_tests_fail! {
            negative_should_not_be_negative: ("should not be negative", "-1"),
            negative_infinity_is_not_a_number: ("should be a number", "-inf"),
            infinity_is_not_a_number: ("should be a number", "inf"),
            nan_is_not_a_number: ("should be a number", "NaN"),
            word_is_not_a_number: ("should be a number", "ten"),
        }
    }

    #[test]
    fn customer_info_valid() {
        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn customer_info_requires_fields() {
        let info = CustomerInfo {
            contact_person: " ".into(),
            ..filled()
        };
        let err = info.validate().unwrap_err();
        assert_eq!(err.field, CustomerField::ContactPerson);
    }

    #[test]
    fn customer_info_rejects_bad_values() {
        let cases = [
            (CustomerInfo { email: "jane.acme.co".into(), ..filled() }, CustomerField::Email),
            (CustomerInfo { email: "jane@acme".into(), ..filled() }, CustomerField::Email),
            (CustomerInfo { phone: "call me".into(), ..filled() }, CustomerField::Phone),
            (CustomerInfo { delivery_date: "02/11/2026".into(), ..filled() }, CustomerField::DeliveryDate),
            (CustomerInfo { delivery_time: "midnight".into(), ..filled() }, CustomerField::DeliveryTime),
        ];

        for (info, field) in cases {
            assert_eq!(info.validate().unwrap_err().field, field);
        }
    }

    #[test]
    fn crane_truck_from_str() {
        assert_eq!("YES".parse::<CraneTruck>().unwrap(), CraneTruck::Yes);
        assert_eq!("no".parse::<CraneTruck>().unwrap(), CraneTruck::No);
        assert!("maybe".parse::<CraneTruck>().is_err());
    }

    #[test]
    fn order_item_columns() {
        let chair = OrderItem::from_chair(&ChairLine {
            size: 40,
            quantity: Quantity::parse("5"),
        });
        assert_eq!(chair.detail_column(), "40mm");
        assert_eq!(chair.summary_line(), "Chair (40mm): 5 bag");

        let staple = OrderItem::from_product(&ProductLine {
            product: *catalog::product(9).unwrap(),
            quantity: Quantity::parse("3"),
        });
        assert_eq!(staple.detail_column(), "N/A");
        assert_eq!(staple.summary_line(), "Staple: 3 Box");
    }

    #[test]
    fn order_number_from_timestamp() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(OrderNumber::generate(now).as_str(), "ORD-1700000000123");
    }
}
