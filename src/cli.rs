use chrono::{Local, NaiveDate};
use enum_iterator::all;
use inquire::validator::Validation;
use inquire::{Confirm, DateSelect, MultiSelect, Select, Text};

use crate::{
    catalog,
    form::FormStore,
    model::{self, CustomerField, EmailAddress, PhoneNumber, Quantity},
};

const CRANE_TRUCK_OPTIONS: [&str; 3] = ["YES", "NO", "Not specified"];

/// Запрашивает у пользователя все поля формы. Текущие значения предлагаются
/// для редактирования.
pub fn ask(form: &mut FormStore) -> anyhow::Result<()> {
    println!("Customer Information");
    for field in all::<CustomerField>() {
        let value = ask_customer_field(form, field)?;
        form.set_customer_field(field, &value);
    }

    println!("Product Order");
    ask_products(form)?;

    ask_chairs(form)?;

    Ok(())
}

fn ask_customer_field(form: &FormStore, field: CustomerField) -> anyhow::Result<String> {
    let current = form.snapshot().customer.get(field);
    let title = field.to_string();

    let value = match field {
        CustomerField::DeliveryDate => {
            let today = Local::now().date_naive();
            let start = NaiveDate::parse_from_str(&current, model::DATE_FORMAT).unwrap_or(today);

            DateSelect::new(&title)
                .with_min_date(today)
                .with_starting_date(start.max(today))
                .prompt()?
                .format(model::DATE_FORMAT)
                .to_string()
        }
        CustomerField::DeliveryTime => {
            let options = catalog::DELIVERY_TIMES.to_vec();
            let cursor = options.iter().position(|o| o.value == current).unwrap_or(0);

            Select::new(&title, options)
                .with_starting_cursor(cursor)
                .prompt()?
                .value
                .to_owned()
        }
        CustomerField::CraneTruck => {
            let options = CRANE_TRUCK_OPTIONS.to_vec();
            let cursor = options.iter().position(|o| *o == current).unwrap_or(2);

            let choice = Select::new(&title, options)
                .with_starting_cursor(cursor)
                .prompt()?;

            match choice {
                "YES" | "NO" => choice.to_owned(),
                _ => String::new(),
            }
        }
        _ => ask_text(&title, field, &current)?,
    };

    Ok(value)
}

fn ask_text(title: &str, field: CustomerField, current: &str) -> anyhow::Result<String> {
    let mut prompt = Text::new(title);

    if !current.is_empty() {
        prompt = prompt.with_initial_value(current);
    }

    // Все текстовые поля обязательны, как `required` у полей в браузере.
    prompt = prompt.with_validator(move |s: &str| {
        if s.trim().is_empty() {
            return Ok(Validation::Invalid("required".into()));
        }

        let checked = match field {
            CustomerField::Email => EmailAddress::new(s).map(|_| ()),
            CustomerField::Phone => PhoneNumber::new(s).map(|_| ()),
            _ => Ok(()),
        };

        match checked {
            Ok(()) => Ok(Validation::Valid),
            Err(e) => Ok(Validation::Invalid(e.to_string().into())),
        }
    });

    Ok(prompt.prompt()?)
}

fn ask_products(form: &mut FormStore) -> anyhow::Result<()> {
    let lines = form.snapshot().products.clone();

    for line in lines {
        let p = line.product;
        let title = format!(
            "{} ({}), {}",
            p.name,
            p.detail.unwrap_or(catalog::DETAIL_PLACEHOLDER),
            p.unit
        );

        let value = ask_quantity(&title, &line.quantity)?;
        form.set_product_quantity(p.id, &value);
    }

    Ok(())
}

/// Таблица стульев по-умолчанию свёрнута: сначала спрашиваем, нужна ли она,
/// потом какие размеры заполнять.
fn ask_chairs(form: &mut FormStore) -> anyhow::Result<()> {
    let open = Confirm::new("Open the chair order?")
        .with_default(false)
        .prompt()?;

    if !open {
        return Ok(());
    }

    let lines = form.snapshot().chairs.clone();
    let sizes: Vec<u32> = lines.iter().map(|l| l.size).collect();
    let preselected: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.quantity.is_empty())
        .map(|(n, _)| n)
        .collect();

    let selected = MultiSelect::new("Chair sizes (mm)", sizes)
        .with_default(&preselected)
        .prompt()?;

    for line in lines {
        let value = if selected.contains(&line.size) {
            let title = format!("Chair {}mm, {}", line.size, catalog::CHAIR_UNIT);
            ask_quantity(&title, &line.quantity)?
        } else {
            String::new()
        };
        form.set_chair_quantity(line.size, &value);
    }

    Ok(())
}

fn ask_quantity(title: &str, current: &Quantity) -> anyhow::Result<String> {
    let current = current.to_string();
    let mut prompt = Text::new(title).with_validator(|s: &str| {
        Ok(match Quantity::validate_input(s) {
            Ok(()) => Validation::Valid,
            Err(e) => Validation::Invalid(e.into()),
        })
    });

    if !current.is_empty() {
        prompt = prompt.with_initial_value(&current);
    }

    Ok(prompt.prompt()?)
}

/// Показывает подтверждение и ждёт, пока пользователь его закроет.
pub fn show_confirmation(order_number: &model::OrderNumber) -> anyhow::Result<()> {
    println!();
    println!("Order Completed!");
    println!(
        "Your order has been successfully placed and a confirmation has been sent to your email."
    );
    println!("Order Number: {}", order_number);

    Text::new("Press Enter to close").prompt()?;

    Ok(())
}

pub fn show_alert(message: &str) {
    eprintln!();
    eprintln!("{}", message);
}

pub fn ask_retry() -> anyhow::Result<bool> {
    Ok(Confirm::new("Submit the order again?")
        .with_default(true)
        .prompt()?)
}

pub fn ask_edit() -> anyhow::Result<bool> {
    Ok(Confirm::new("Edit the order before submitting?")
        .with_default(false)
        .prompt()?)
}

pub fn ask_another() -> anyhow::Result<bool> {
    Ok(Confirm::new("Place another order?")
        .with_default(false)
        .prompt()?)
}
