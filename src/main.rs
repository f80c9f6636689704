use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use volunteer_checkout::application::checkout::CheckoutFlow;
use volunteer_checkout::config::CheckoutConfig;
use volunteer_checkout::domain::ports::PaymentBackendRef;
use volunteer_checkout::domain::transaction::{
    ContactDetails, OrderId, PayerType, TransactionRequest, TransactionType,
};
use volunteer_checkout::infrastructure::console::ConsoleNavigator;
use volunteer_checkout::infrastructure::http::HttpPaymentBackend;
use volunteer_checkout::infrastructure::in_memory::{ScriptedPaymentBackend, ScriptedStatus};
use volunteer_checkout::infrastructure::simulated_widget::{SimulatedOutcome, SimulatedWidget};

#[derive(Parser)]
#[command(author, version, about = "Run a sponsorship or donation checkout", long_about = None)]
struct Cli {
    /// Amount to charge, e.g. 1500.00
    #[arg(long)]
    amount: Decimal,

    #[arg(long, default_value = "LKR")]
    currency: String,

    /// SPONSOR or VOLUNTEER
    #[arg(long)]
    payer_type: PayerType,

    #[arg(long)]
    payer_id: String,

    #[arg(long)]
    event_id: String,

    /// SPONSORSHIP or DONATION
    #[arg(long, default_value = "SPONSORSHIP")]
    transaction_type: TransactionType,

    /// Order id to use instead of a generated one
    #[arg(long)]
    order_id: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    anonymous: bool,

    /// Outcome the simulated widget reports: completed, dismissed or error
    #[arg(long, default_value = "completed", value_parser = parse_outcome)]
    simulate: SimulatedOutcome,

    /// Delay before the simulated widget reports back
    #[arg(long, default_value_t = 100)]
    widget_delay_ms: u64,

    /// Payment backend base URL. Without it an in-memory backend replays --script.
    #[arg(long)]
    backend_url: Option<String>,

    /// Status answers for the in-memory backend (PENDING, SUCCESS, FAILED, ERROR)
    #[arg(long, value_delimiter = ',', value_parser = parse_scripted_status)]
    script: Vec<ScriptedStatus>,

    #[arg(long)]
    max_attempts: Option<u32>,

    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

fn parse_outcome(raw: &str) -> std::result::Result<SimulatedOutcome, String> {
    match raw.to_ascii_lowercase().as_str() {
        "completed" => Ok(SimulatedOutcome::Completed),
        "dismissed" => Ok(SimulatedOutcome::Dismissed),
        "error" => Ok(SimulatedOutcome::Error),
        other => Err(format!("unknown outcome '{other}'")),
    }
}

fn parse_scripted_status(raw: &str) -> std::result::Result<ScriptedStatus, String> {
    if raw.trim().eq_ignore_ascii_case("ERROR") {
        return Ok(ScriptedStatus::TransportError);
    }
    raw.parse()
        .map(ScriptedStatus::Status)
        .map_err(|e: volunteer_checkout::error::BackendError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CheckoutConfig::from_env().into_diagnostic()?;
    if let Some(url) = cli.backend_url {
        config.http.backend_url = Some(url);
    }
    if let Some(max) = cli.max_attempts {
        config.reconcile.max_attempts = max;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.reconcile.interval = Duration::from_millis(ms);
    }
    config.validate().into_diagnostic()?;

    let backend: PaymentBackendRef = if let Some(url) = &config.http.backend_url {
        Arc::new(HttpPaymentBackend::new(url, config.http.request_timeout).into_diagnostic()?)
    } else {
        info!("No backend URL configured; replaying scripted statuses in memory");
        Arc::new(ScriptedPaymentBackend::with_statuses(cli.script))
    };

    let order_id = cli.order_id.map(OrderId::new).unwrap_or_else(OrderId::generate);
    let request = TransactionRequest::builder(order_id)
        .amount(cli.amount)
        .currency(cli.currency)
        .payer(cli.payer_type, cli.payer_id)
        .event(cli.event_id)
        .transaction_type(cli.transaction_type)
        .contact(ContactDetails {
            first_name: cli.first_name,
            last_name: cli.last_name,
            email: cli.email,
            phone: cli.phone,
            ..Default::default()
        })
        .anonymous(cli.anonymous)
        .build()
        .into_diagnostic()?;

    let widget = SimulatedWidget::new(cli.simulate, Duration::from_millis(cli.widget_delay_ms));
    let flow = CheckoutFlow::new(backend, Arc::new(widget), Arc::new(ConsoleNavigator), &config);

    let report = flow.run(request).await.into_diagnostic()?;
    match &report.failure {
        Some(failure) => eprintln!("Checkout {} failed: {}", report.order_id, failure),
        None => eprintln!(
            "Checkout {} succeeded after {} status queries",
            report.order_id, report.status_queries
        ),
    }

    Ok(())
}
