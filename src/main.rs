use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};

use revalidate::rules::builtin::{equals_field, has_capital_letter, is_not_empty, length_greater_than};
use revalidate::{AsyncRuleError, AsyncRuleSet, FormBuilder, FormOptions, FormState, Message, Rule, RuleSet};

/// Fill in a registration form and submit it.
#[derive(Debug, Parser)]
#[command(name = "revalidate", version)]
struct Args {
    /// TOML file with form options
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    password: String,

    #[arg(long, default_value = "")]
    repeat_password: String,

    #[arg(long, default_value = "")]
    random: String,

    /// Names the availability check reports as taken
    #[arg(long, value_delimiter = ',', default_value = "admin,root")]
    taken: Vec<String>,

    /// Simulated latency of the availability check, in milliseconds
    #[arg(long, default_value_t = 50)]
    lookup_ms: u64,
}

fn min_length(field: &str, len: usize) -> Rule {
    Rule::new(
        length_greater_than(len - 1),
        format!("Minimum {field} length of {len} is required."),
    )
}

fn capital_letter(field: &str) -> Rule {
    Rule::new(
        has_capital_letter,
        format!("{field} should contain at least one uppercase letter."),
    )
}

fn registration_rules() -> RuleSet {
    RuleSet::new()
        .rule("name", Rule::new(is_not_empty, "Name should not be empty."))
        .field(
            "random",
            [
                Rule::new(length_greater_than(7), "Minimum Random length of 8 is required."),
                capital_letter("Random"),
            ],
        )
        .field("password", [min_length("Password", 6), capital_letter("Password")])
        .field(
            "repeatPassword",
            [
                min_length("RepeatedPassword", 6),
                capital_letter("RepeatedPassword"),
                Rule::new(
                    equals_field("password"),
                    "RepeatPassword should be equal with Password",
                ),
            ],
        )
}

fn availability_rules(taken: Vec<String>, latency: Duration) -> AsyncRuleSet {
    AsyncRuleSet::new().field("name", move |value: Value, _state: FormState| {
        let taken = taken.clone();
        async move {
            tokio::time::sleep(latency).await;
            let name = value.as_str().unwrap_or_default();
            let messages: Vec<Message> = if taken.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                vec![format!("Name '{name}' is already taken.")]
            } else {
                Vec::new()
            };
            Ok::<_, AsyncRuleError>(messages)
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    revalidate::logging::init_tracing();
    let args = Args::parse();

    let options = match &args.options {
        Some(path) => FormOptions::load(path)?,
        None => FormOptions::default(),
    };

    let initial = json!({"name": "", "password": "", "repeatPassword": "", "random": ""});
    let (handle, controller) = FormBuilder::new(initial)
        .rules(registration_rules())
        .async_rules(availability_rules(
            args.taken.clone(),
            Duration::from_millis(args.lookup_ms),
        ))
        .options(options)
        .spawn()?;

    handle.on_change("name", json!(args.name))?;
    handle.on_change("password", json!(args.password))?;
    handle.on_change("repeatPassword", json!(args.repeat_password))?;
    handle.on_change("random", json!(args.random))?;

    let submitted = handle.submit(None).await?;
    let snapshot = handle.snapshot().await?;
    drop(handle);
    controller.await??;

    let report = json!({
        "submitted": submitted,
        "snapshot": snapshot,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
