use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

// Порт 9 (discard) закрыт, соединение отклоняется сразу.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api/v1.0/email/send";

const ORDER: &str = r#"{
    "customer": {
        "companyName": "Acme Co",
        "contactPerson": "Jane Doe",
        "phone": "021 555 0199",
        "email": "jane@acme.co",
        "deliveryAddress": "1 Quay St, Auckland",
        "deliveryDate": "2026-11-02",
        "deliveryTime": "8:00",
        "craneTruck": "YES"
    },
    "products": { "1": 2 },
    "chairs": { "40": "5" }
}"#;

#[test]
fn version() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("order_intake")?
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    Ok(())
}

#[test]
fn catalog() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("order_intake")?
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("PC Strand"))
        .stdout(predicate::str::contains("Staple"))
        .stdout(predicate::str::contains("25, 30, 40"))
        .stdout(predicate::str::contains("480"));

    Ok(())
}

#[test]
fn submit_fails_when_emails_are_not_sent() -> Result<(), Box<dyn std::error::Error>> {
    let config = config_file()?;
    let order = order_file(ORDER)?;

    submit(&config, &order)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please contact our support team"));

    Ok(())
}

#[test]
fn submit_rejects_invalid_email() -> Result<(), Box<dyn std::error::Error>> {
    let config = config_file()?;
    let order = order_file(&ORDER.replace("jane@acme.co", "jane-at-acme"))?;

    submit(&config, &order)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please check the form: Email"));

    Ok(())
}

#[test]
fn submit_rejects_unknown_product() -> Result<(), Box<dyn std::error::Error>> {
    let config = config_file()?;
    let order = order_file(&ORDER.replace(r#""1": 2"#, r#""99": 2"#))?;

    submit(&config, &order)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownProduct(99)"));

    Ok(())
}

fn submit(config: &NamedTempFile, order: &NamedTempFile) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("order_intake")?;

    cmd.arg("submit")
        .arg("--config-path")
        .arg(config.path())
        .arg(order.path());

    Ok(cmd)
}

fn config_file() -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;

    writeln!(
        file,
        r#"user_id = "user"
service_id = "service"
sales_email = "sales@supplier.example"
customer_template_id = "customer_tpl"
sales_template_id = "sales_tpl"
api_url = "{}"
timeout_secs = 2"#,
        UNREACHABLE_API
    )?;

    Ok(file)
}

fn order_file(content: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}
