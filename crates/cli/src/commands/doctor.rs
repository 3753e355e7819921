//! Doctor command - validate configuration and show status

use anyhow::Result;
use pkg_fingerprint_adapters::diff::GitDiffRunner;
use pkg_fingerprint_domain::DiffRunner;
use serde::Serialize;

use super::hash::build_identity;
use crate::args::DoctorArgs;
use crate::config::{AppConfig, IdentitySource};

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    diff: CheckResult,
    identity: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub fn execute(args: DoctorArgs, config: Result<AppConfig>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        diff: CheckResult::error("Not checked"),
        identity: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    match config {
        Ok(config) => {
            report.config = CheckResult::ok(format!(
                "Configuration loaded, manifest: {}",
                config.general.manifest_name
            ));
            report.diff = check_diff(&config);
            report.identity = check_identity(config.general.identity);
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
        }
    }

    let checks = [&report.config, &report.diff, &report.identity];
    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_diff(config: &AppConfig) -> CheckResult {
    if !config.diff.enabled {
        return CheckResult::ok("Diff disabled, working tree changes are ignored");
    }

    let runner = GitDiffRunner::detect(config.diff.to_runner_config());
    let effective = runner.config();
    let details = serde_json::json!({
        "command": effective.command,
        "args": effective.args,
        "timeout_ms": effective.timeout.map(|t| t.as_millis() as u64),
    });

    if runner.capability().is_available() {
        CheckResult::ok(format!("Diff command available: {}", effective.command))
            .with_details(details)
    } else {
        CheckResult::warn(format!(
            "Diff command not runnable: {}, working tree changes are ignored",
            effective.command
        ))
        .with_details(details)
    }
}

fn check_identity(source: IdentitySource) -> CheckResult {
    let identity = build_identity(source);
    let name = match source {
        IdentitySource::Sources => "sources",
        IdentitySource::Executable => "executable",
    };

    match identity.get() {
        Ok(digest) => {
            let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
            CheckResult::ok(format!("Self fingerprint ({}): {}", name, hex))
                .with_details(serde_json::json!({ "source": name, "digest": hex }))
        }
        Err(e) => CheckResult::error(format!("Self fingerprint ({}) failed: {}", name, e)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("pkg-fingerprint Doctor Report");
    println!("=============================");
    println!();

    print_check("Config", &report.config);
    print_check("Diff", &report.diff);
    print_check("Identity", &report.identity);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
