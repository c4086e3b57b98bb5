//! Closura closed-account notifier batch runtime.

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use closura_application::{
    DeliveryGateway, DeliveryPolicy, MailTransport, MessageComposer, NotificationService, RunArgs,
    RunConfig, SmtpParams,
};
use closura_core::{AppError, AppResult};
use closura_infrastructure::{
    ConsoleMailTransport, CsvReportWriter, FileAuditSink, PostgresAccountSource, SmtpMailTransport,
    TeraTemplateRenderer,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable whose presence marks the production batch host.
const PRODUCTION_ENV: &str = "BATCH_HOME";

/// Environment variable selecting the mail transport, `smtp` or `console`.
const MAIL_PROVIDER_ENV: &str = "MAIL_PROVIDER";

#[derive(Parser, Debug)]
#[command(
    name = "closura-notifier",
    version,
    about = "Sends closure notices for accounts closed on an effective date"
)]
struct Cli {
    #[arg(long, help = "Closing date the run covers, mm-dd-yyyy or yyyy-mm-dd")]
    effective_date: String,
    #[arg(long, help = "Path of the YAML run configuration")]
    config: PathBuf,
    #[arg(long, help = "Directory receiving the CSV extract and audit log")]
    output_path: PathBuf,
    #[arg(long, help = "CSV extract file name, must end in .csv")]
    output_file: String,
    #[arg(long, help = "Overrides the configured sender address")]
    from_address: Option<String>,
    #[arg(long, help = "Overrides the configured minor codes, comma separated")]
    minor_codes: Option<String>,
    #[arg(long, help = "Overrides the report timezone, an IANA name")]
    timezone: Option<String>,
    #[arg(long, help = "SMTP relay host")]
    smtp_host: String,
    #[arg(long, default_value_t = 587, help = "SMTP relay port")]
    smtp_port: u16,
    #[arg(long, help = "SMTP login user")]
    smtp_user: String,
    #[arg(long, help = "SMTP login password")]
    smtp_password: String,
    #[arg(long, help = "Dispatches mail for real; omitted means a dry run")]
    send_email: bool,
    #[arg(long, help = "Redirects every notice to this address")]
    test_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let args = RunArgs {
        config_path: cli.config,
        effective_date: cli.effective_date,
        output_path: cli.output_path,
        output_file: cli.output_file,
        from_address: cli.from_address,
        minor_codes: cli.minor_codes,
        timezone: cli.timezone,
        smtp: SmtpParams {
            host: cli.smtp_host,
            port: cli.smtp_port,
            username: cli.smtp_user,
            password: cli.smtp_password,
        },
        send_email: cli.send_email,
        test_address: cli.test_address,
        production: env::var(PRODUCTION_ENV).is_ok(),
    };
    let config = RunConfig::resolve(&args)?;

    // The template and the database are both fatal before any fetch; a
    // missing template must not cost a connection.
    let renderer = Arc::new(TeraTemplateRenderer::load(
        &config.template_directory,
        &config.template_file,
    )?);

    let database_url = required_env("DATABASE_URL")?;
    let pool = connect_pool(database_url.as_str()).await?;
    let transport = build_transport(&config)?;

    let service = NotificationService::new(
        Arc::new(PostgresAccountSource::new(pool)),
        MessageComposer::new(renderer, config.subject.clone(), config.timezone),
        DeliveryGateway::new(transport, DeliveryPolicy::from_config(&config)),
        Arc::new(CsvReportWriter::new(config.csv_path.clone())),
        Arc::new(FileAuditSink::new(
            config.audit_path.clone(),
            config.timezone,
        )),
    );

    let report = service.run(&config).await?;
    info!(
        csv = %config.csv_path.display(),
        audit = %config.audit_path.display(),
        processed = report.counts.processed(),
        would_have_sent = report.counts.would_have_sent(),
        "run outputs written"
    );

    Ok(())
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::DataSource(format!("failed to connect to database: {error}")))
}

fn build_transport(config: &RunConfig) -> AppResult<Arc<dyn MailTransport>> {
    let provider = env::var(MAIL_PROVIDER_ENV).unwrap_or_else(|_| "smtp".to_owned());
    match provider.trim().to_lowercase().as_str() {
        "console" => Ok(Arc::new(ConsoleMailTransport::new())),
        "smtp" => Ok(Arc::new(SmtpMailTransport::new(&config.smtp)?)),
        other => Err(AppError::Config(format!(
            "unsupported {MAIL_PROVIDER_ENV} value '{other}', expected smtp or console"
        ))),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Config(format!("{name} is required")))
}
