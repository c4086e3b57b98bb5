//! Run configuration: a YAML job document plus invocation arguments resolve
//! into one validated, immutable [`RunConfig`] before any account is fetched.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use closura_core::{AppError, AppResult};
use closura_domain::{CsvColumn, EmailAddress, MinorCodeSet};

/// Timezone used when neither the document nor the CLI names one.
const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Subject line used when the document omits one.
const DEFAULT_SUBJECT: &str = "Your Closed Account";

/// Job-level settings read from the YAML config file.
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    template_directory: String,
    template_file: String,
    csv_header: Vec<String>,
    get_closed_accounts: String,
    minor_codes: String,
    from_address: String,
    from_name: Option<String>,
    subject: Option<String>,
    timezone: Option<String>,
}

/// SMTP connection parameters supplied on the command line.
#[derive(Debug, Clone)]
pub struct SmtpParams {
    /// Relay host name.
    pub host: String,
    /// Relay port, typically 587 for STARTTLS.
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
}

/// Raw invocation arguments gathered by the binary before validation.
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Path of the YAML config file.
    pub config_path: PathBuf,
    /// Effective date, `mm-dd-yyyy` (separators `-`, `/`, `.`) or `yyyy-mm-dd`.
    pub effective_date: String,
    /// Directory the CSV extract is written into.
    pub output_path: PathBuf,
    /// CSV extract file name; must end in `.csv`.
    pub output_file: String,
    /// Overrides the document's from-address.
    pub from_address: Option<String>,
    /// Overrides the document's minor code list.
    pub minor_codes: Option<String>,
    /// Overrides the document's timezone.
    pub timezone: Option<String>,
    /// SMTP connection parameters.
    pub smtp: SmtpParams,
    /// Enables real dispatch; off means a dry run.
    pub send_email: bool,
    /// Redirects every message to this address when set.
    pub test_address: Option<String>,
    /// Whether the process runs in the production batch environment.
    pub production: bool,
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Date whose closures the run covers.
    pub effective_date: NaiveDate,
    /// Minor codes bound into the retrieval query.
    pub minor_codes: MinorCodeSet,
    /// Retrieval query text binding `$1` (effective date) and `$2` (codes).
    pub query: String,
    /// Directory holding the notice template.
    pub template_directory: PathBuf,
    /// Template file name within the template directory.
    pub template_file: String,
    /// Columns of the CSV extract, in output order.
    pub csv_header: Vec<CsvColumn>,
    /// Sender address.
    pub from_address: EmailAddress,
    /// Display name stamped on the sender mailbox, when configured.
    pub from_name: Option<String>,
    /// Subject line for every notice in the run.
    pub subject: String,
    /// Redirect recipient for test runs.
    pub test_address: Option<EmailAddress>,
    /// Whether dispatch is enabled.
    pub send_enabled: bool,
    /// Whether the process runs in the production batch environment.
    pub production: bool,
    /// Timezone for the run date and the rendered year.
    pub timezone: Tz,
    /// Full path of the CSV extract.
    pub csv_path: PathBuf,
    /// Full path of the audit report, derived from the CSV path.
    pub audit_path: PathBuf,
    /// SMTP connection parameters.
    pub smtp: SmtpParams,
}

impl RunConfig {
    /// Loads the YAML document and resolves it against the invocation
    /// arguments. CLI values beat document defaults.
    ///
    /// Fails with a config error naming the offending key on a missing or
    /// malformed entry, a malformed date or address, an unknown CSV column,
    /// or an output file left behind by an earlier run.
    pub fn resolve(args: &RunArgs) -> AppResult<Self> {
        let raw = std::fs::read_to_string(&args.config_path).map_err(|error| {
            AppError::Config(format!(
                "failed to read config file {}: {error}",
                args.config_path.display()
            ))
        })?;
        let document: ConfigDocument = serde_yaml::from_str(&raw).map_err(|error| {
            AppError::Config(format!(
                "malformed config file {}: {error}",
                args.config_path.display()
            ))
        })?;

        let effective_date = parse_effective_date(&args.effective_date)?;
        let minor_codes =
            MinorCodeSet::parse(args.minor_codes.as_deref().unwrap_or(&document.minor_codes))?;

        let query = document.get_closed_accounts.trim().to_owned();
        if query.is_empty() {
            return Err(AppError::Config(
                "get_closed_accounts query must not be empty".to_owned(),
            ));
        }
        if !query.contains("$1") || !query.contains("$2") {
            return Err(AppError::Config(
                "get_closed_accounts query must bind $1 (effective date) and $2 (minor codes)"
                    .to_owned(),
            ));
        }

        if document.csv_header.is_empty() {
            return Err(AppError::Config(
                "csv_header must list at least one column".to_owned(),
            ));
        }
        let csv_header = document
            .csv_header
            .iter()
            .map(|name| CsvColumn::from_config_name(name))
            .collect::<AppResult<Vec<CsvColumn>>>()?;

        let from_raw = args
            .from_address
            .as_deref()
            .unwrap_or(&document.from_address);
        let from_address = EmailAddress::new(from_raw).map_err(|error| {
            AppError::Config(format!("invalid from_address '{from_raw}': {error}"))
        })?;

        let test_address = args
            .test_address
            .as_deref()
            .map(|value| {
                EmailAddress::new(value).map_err(|error| {
                    AppError::Config(format!("invalid test address '{value}': {error}"))
                })
            })
            .transpose()?;

        let timezone_raw = args
            .timezone
            .as_deref()
            .or(document.timezone.as_deref())
            .unwrap_or(DEFAULT_TIMEZONE);
        let timezone = Tz::from_str(timezone_raw).map_err(|error| {
            AppError::Config(format!("invalid timezone '{timezone_raw}': {error}"))
        })?;

        if !args.output_file.to_lowercase().ends_with(".csv") {
            return Err(AppError::Config(format!(
                "output file '{}' must end in .csv",
                args.output_file
            )));
        }
        let csv_path = args.output_path.join(&args.output_file);
        if csv_path.exists() {
            return Err(AppError::Config(format!(
                "output file {} already exists; a finished run must not be overwritten",
                csv_path.display()
            )));
        }
        let audit_path = csv_path.with_extension("audit.log");

        let subject = document
            .subject
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_owned());

        let from_name = document
            .from_name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            effective_date,
            minor_codes,
            query,
            template_directory: PathBuf::from(document.template_directory),
            template_file: document.template_file,
            csv_header,
            from_address,
            from_name,
            subject,
            test_address,
            send_enabled: args.send_email,
            production: args.production,
            timezone,
            csv_path,
            audit_path,
            smtp: args.smtp.clone(),
        })
    }
}

/// Parses an effective date in `mm-dd-yyyy` (separators `-`, `/`, `.`) or
/// ISO `yyyy-mm-dd` form.
fn parse_effective_date(raw: &str) -> AppResult<NaiveDate> {
    let normalized = raw.trim().replace(['/', '.'], "-");
    NaiveDate::parse_from_str(&normalized, "%m-%d-%Y")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%Y-%m-%d"))
        .map_err(|_| {
            AppError::Config(format!(
                "invalid effective date '{raw}': expected mm-dd-yyyy or yyyy-mm-dd"
            ))
        })
}
