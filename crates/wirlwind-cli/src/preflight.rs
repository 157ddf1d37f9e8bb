//! `--preflight-only` template-resolution report: one status line per
//! item, rendered through `owo-colors`, exit code reflects overall
//! health.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use wirlwind_core::TemplateResolver;
use wirlwind_engine::CollectionRegistry;
use wirlwind_providers::DriverRegistry;
use wirlwind_types::{ParserSpec, ResolutionTier};

/// Apply `f` only when stdout is a terminal; plain text otherwise
/// (piped/redirected output shouldn't carry ANSI escapes).
fn style(color: bool, text: &str, f: impl FnOnce(&str) -> String) -> String {
    if color {
        f(text)
    } else {
        text.to_string()
    }
}

/// One collection's resolution outcome.
struct CollectionReport {
    name: String,
    resolutions: Vec<TemplateLine>,
    schema_missing: bool,
}

struct TemplateLine {
    engine: &'static str,
    filename: String,
    outcome: Result<ResolutionTier, String>,
}

/// Runs every collection's declared templates through the resolver and
/// prints one line per template plus a final summary. Returns `true` if
/// every template resolved and every driver self-check passed — the
/// caller maps that to the process exit code.
pub fn run_preflight(
    registry: &CollectionRegistry,
    textfsm_resolver: &TemplateResolver,
    ttp_resolver: Option<&TemplateResolver>,
    drivers: &DriverRegistry,
    vendor_id: &str,
) -> bool {
    let mut all_resolved = true;
    let color = std::io::stdout().is_terminal();

    println!("{}", style(color, "Preflight report", |s| s.bold().to_string()));
    println!("vendor: {vendor_id}");
    println!();

    let mut reports: Vec<CollectionReport> = registry
        .all()
        .map(|def| {
            let mut resolutions = Vec::new();
            for spec in &def.parsers {
                match spec {
                    ParserSpec::TextFsm { templates } => {
                        for filename in templates {
                            let outcome = textfsm_resolver
                                .resolve(filename)
                                .map(|(_, resolution)| resolution.tier.unwrap_or(ResolutionTier::System))
                                .map_err(|e| e.to_string());
                            resolutions.push(TemplateLine { engine: "textfsm", filename: filename.clone(), outcome });
                        }
                    }
                    ParserSpec::Ttp { templates } => {
                        for filename in templates {
                            let outcome = match ttp_resolver {
                                Some(resolver) => resolver
                                    .resolve(filename)
                                    .map(|(_, resolution)| resolution.tier.unwrap_or(ResolutionTier::System))
                                    .map_err(|e| e.to_string()),
                                None => Err("ttp adapter not available at runtime".to_string()),
                            };
                            resolutions.push(TemplateLine { engine: "ttp", filename: filename.clone(), outcome });
                        }
                    }
                    ParserSpec::Regex { .. } => {}
                }
            }
            CollectionReport {
                name: def.name.clone(),
                resolutions,
                schema_missing: registry.missing_schema().iter().any(|n| n == &def.name),
            }
        })
        .collect();
    reports.sort_by(|a, b| a.name.cmp(&b.name));

    for report in &reports {
        println!("{}", style(color, &report.name, |s| s.cyan().bold().to_string()));
        if report.resolutions.is_empty() {
            println!("  (no template-based parsers declared)");
        }
        for line in &report.resolutions {
            match &line.outcome {
                Ok(tier) => {
                    let mark = style(color, "\u{2713}", |s| s.green().to_string());
                    println!("  {mark} {} [{}] -> {:?}", line.engine, line.filename, tier);
                }
                Err(reason) => {
                    all_resolved = false;
                    let mark = style(color, "\u{2717}", |s| s.red().to_string());
                    let reason_styled = style(color, reason, |s| s.red().to_string());
                    println!("  {mark} {} [{}] -> {reason_styled}", line.engine, line.filename);
                }
            }
        }
        if report.schema_missing {
            let label = style(color, "warning:", |s| s.yellow().to_string());
            println!("  {label} no _schema.yaml present (coercion skipped, not fatal)");
        }
    }

    println!();
    let warnings = drivers.self_check_all();
    if !warnings.is_empty() {
        println!("{}", style(color, "Driver warnings:", |s| s.yellow().bold().to_string()));
        for (vendor, warning) in &warnings {
            let label = style(color, "warning:", |s| s.yellow().to_string());
            println!("  {label} [{vendor}] {warning}");
        }
        println!();
    }

    if all_resolved {
        println!("{}", style(color, "All templates resolved.", |s| s.green().bold().to_string()));
    } else {
        println!("{}", style(color, "One or more templates failed to resolve.", |s| s.red().bold().to_string()));
    }

    all_resolved
}
