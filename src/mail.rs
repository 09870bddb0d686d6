use crate::error::CheckError;
use crate::report::HtmlReport;
use lettre::message::{Mailbox, Mailboxes, MultiPart};
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const CONFIG_FILE: &str = "mail.properties";
pub const REPORT_FILE: &str = "result.html";

/// Contents of `mail.properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp: String,
    pub smtp_port: u16,
    pub from: String,
    pub to: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp: "yourserver".to_string(),
            smtp_port: 25,
            from: "from@server.com".to_string(),
            to: "to@server.com".to_string(),
        }
    }
}

impl MailConfig {
    pub fn load(dir: &Path) -> Result<Self, CheckError> {
        let path = dir.join(CONFIG_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(CheckError::MailConfigMissing { path, source }),
        };
        serde_json::from_str(&contents)
            .map_err(|source| CheckError::MailConfigInvalid { path, source })
    }
}

/// Writes a template `mail.properties` into `dir` for the user to edit,
/// keeping any previous file as `mail.properties.old`.
pub fn init_email_config(dir: &Path) -> Result<PathBuf, CheckError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| CheckError::ConfigDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let path = dir.join(CONFIG_FILE);
    if path.is_file() {
        backup(&path, "old")?;
    }

    let mut contents = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut contents, formatter);
    MailConfig::default()
        .serialize(&mut ser)
        .map_err(|e| CheckError::ConfigWrite {
            path: path.clone(),
            source: e.into(),
        })?;

    fs::write(&path, contents).map_err(|source| CheckError::ConfigWrite {
        path: path.clone(),
        source,
    })?;

    info!("Wrote mail config template to {}", path.display());
    Ok(path)
}

fn backup(src: &Path, suffix: &str) -> Result<(), CheckError> {
    let mut target = src.as_os_str().to_owned();
    target.push(format!(".{suffix}"));
    fs::rename(src, &target).map_err(|source| CheckError::Backup {
        path: src.to_path_buf(),
        source,
    })
}

/// Saves `report` as `result.html` in `dir` and mails it.
///
/// Only a missing or unreadable config is an error; problems talking to
/// the SMTP server are printed and swallowed.
pub fn send_report(dir: &Path, report: &HtmlReport) -> Result<(), CheckError> {
    let config = MailConfig::load(dir)?;
    let document = report.to_document();

    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, &document)?;
    println!("File saved under {}", report_path.display());

    println!("Sending email to {}", config.to);
    if let Err(e) = deliver(&config, report, document) {
        error!("SMTP delivery failed: {}", e);
        println!("Error sending email : {}", e);
    }

    Ok(())
}

fn deliver(config: &MailConfig, report: &HtmlReport, document: String) -> anyhow::Result<()> {
    let email = build_message(config, report, document)?;

    debug!("Connecting to {}:{}", config.smtp, config.smtp_port);
    let mailer = SmtpTransport::builder_dangerous(&config.smtp)
        .port(config.smtp_port)
        .build();
    mailer.send(&email)?;
    Ok(())
}

fn build_message(
    config: &MailConfig,
    report: &HtmlReport,
    document: String,
) -> anyhow::Result<Message> {
    let from: Mailbox = config.from.parse()?;
    let to: Mailboxes = config.to.parse()?;

    let mut builder = Message::builder()
        .from(from)
        .subject(format!("Gitcheck Report ({})", report.path()));
    for mailbox in to {
        builder = builder.to(mailbox);
    }

    let body = MultiPart::alternative_plain_html(report.to_plain_text(), document);
    Ok(builder.multipart(body)?)
}
