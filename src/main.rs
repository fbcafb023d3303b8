mod api;
mod assembler;
mod catalog;
mod cli;
mod config;
mod dispatcher;
mod document;
mod form;
mod macros;
mod model;
mod order_file;
mod submission;

use std::{error::Error, path::PathBuf};

use anyhow::anyhow;
use api::EmailClient;
use clap::Parser;
use dispatcher::Dispatcher;
use log::debug;
use submission::{Outcome, Session};

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(bin_name = env!("CARGO_BIN_NAME"))]
enum Cli {
    #[command(about = "Prints tool version")]
    #[command(long_about = None)]
    Version,

    #[command(about = "Prints products and chair sizes available for order")]
    #[command(long_about = None)]
    Catalog,

    #[command(about = "Fill in an order interactively and submit it")]
    #[command(long_about = None)]
    Order(OrderArgs),

    #[command(about = "Submit an order prepared in a JSON file")]
    #[command(long_about = None)]
    Submit(SubmitArgs),
}

#[derive(clap::Args)]
struct OrderArgs {
    #[arg(short='c', long, default_value=Some("./config.toml"))]
    config_path: PathBuf,
}

#[derive(clap::Args)]
struct SubmitArgs {
    #[arg(short='c', long, default_value=Some("./config.toml"))]
    config_path: PathBuf,

    #[arg()]
    order_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Cli::parse() {
        Cli::Version => {
            println!(env!("CARGO_PKG_VERSION"));
        }
        Cli::Catalog => {
            print_catalog();
        }
        Cli::Order(args) => {
            debug!("Подгружаем конфиг из {:?}", args.config_path);
            let cfg = config::load(args.config_path)?;

            // Клиент один на весь процесс.
            let client = EmailClient::new(&cfg)?;
            let dispatcher = Dispatcher::new(&client, &cfg);

            run_interactive(&dispatcher)?;
        }
        Cli::Submit(args) => {
            debug!("Подгружаем конфиг из {:?}", args.config_path);
            let cfg = config::load(args.config_path)?;

            debug!("Подгружаем заказ из {:?}", args.order_path);
            let order = order_file::load(&args.order_path)?;

            let client = EmailClient::new(&cfg)?;
            let dispatcher = Dispatcher::new(&client, &cfg);

            let mut session = Session::new();
            if let Some(form) = session.form_mut() {
                order.apply(form)?;
            }
            debug!("Заказ из файла: {:?}", session.form().snapshot());

            if let Outcome::Failed(message) = session.submit(&dispatcher) {
                return Err(anyhow!(message).into());
            }

            if let Some(order_number) = session.confirmation() {
                println!("Order Number: {}", order_number);
            }
            session.dismiss();
        }
    };

    Ok(())
}

fn run_interactive(dispatcher: &Dispatcher<'_, EmailClient>) -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut edit = true;

    loop {
        if edit {
            if let Some(form) = session.form_mut() {
                cli::ask(form)?;
            }
        }

        let outcome = session.submit(dispatcher);
        debug!("Этап после отправки: {:?}", session.phase());

        match outcome {
            Outcome::Confirmed(_) => {
                if let Some(order_number) = session.confirmation() {
                    cli::show_confirmation(order_number)?;
                }
                session.dismiss();

                if !cli::ask_another()? {
                    return Ok(());
                }
                edit = true;
            }
            Outcome::Failed(message) => {
                cli::show_alert(&message);

                if !cli::ask_retry()? {
                    return Err(anyhow!(message));
                }
                edit = cli::ask_edit()?;
            }
        }
    }
}

fn print_catalog() {
    println!("Products:");
    for p in catalog::PRODUCTS.iter() {
        println!(
            "{:>3}  {:<25} {:<25} {}",
            p.id,
            p.name,
            p.detail.unwrap_or(catalog::DETAIL_PLACEHOLDER),
            p.unit
        );
    }

    let sizes: Vec<String> = catalog::CHAIR_SIZES.iter().map(|s| s.to_string()).collect();
    println!();
    println!("Chair sizes (mm, {}): {}", catalog::CHAIR_UNIT, sizes.join(", "));
}
