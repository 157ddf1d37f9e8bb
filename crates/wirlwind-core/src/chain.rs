use crate::error::Error;
use crate::regex_parser::RegexParserSpec;
use crate::resolver::TemplateResolver;
use crate::textfsm::TextFsmTemplate;
use crate::ttp::TtpTemplate;
use wirlwind_types::{AttemptOutcome, ParserAttempt, ParserKind, ParserSpec, Row};

/// Final result of running a collection's declared parser stack over one
/// command's sanitized output (§4.3).
pub enum ChainOutcome {
    Success {
        kind: ParserKind,
        template: Option<String>,
        rows: Vec<Row>,
    },
    AllFailed,
}

/// Runs the configured parsers in declared order, stopping at the first to
/// yield a non-empty row list (§4.3, §8 property 8). Never returns a hard
/// error itself — every failure mode is captured as a `ParserAttempt` in
/// the returned trace so the caller always has something to record (§3
/// invariant: "a parse cycle always produces a trace entry").
pub struct ParserChain<'a> {
    pub textfsm_resolver: &'a TemplateResolver,
    /// `None` models the TTP adapter being absent at runtime (§4.3): every
    /// TTP parser spec is then silently skipped rather than failed.
    pub ttp_resolver: Option<&'a TemplateResolver>,
}

impl<'a> ParserChain<'a> {
    pub fn run(&self, parsers: &[ParserSpec], text: &str) -> (ChainOutcome, Vec<ParserAttempt>) {
        let mut attempts = Vec::new();

        for spec in parsers {
            match spec {
                ParserSpec::TextFsm { templates } => {
                    if let Some(outcome) = self.run_textfsm_templates(templates, text, &mut attempts) {
                        return (outcome, attempts);
                    }
                }
                ParserSpec::Ttp { templates } => {
                    let Some(resolver) = self.ttp_resolver else {
                        for filename in templates {
                            attempts.push(ParserAttempt {
                                kind: ParserKind::Ttp,
                                template: Some(filename.clone()),
                                resolution: None,
                                outcome: AttemptOutcome::Skipped {
                                    reason: "ttp adapter not available at runtime".to_string(),
                                },
                            });
                        }
                        continue;
                    };
                    if let Some(outcome) = self.run_ttp_templates(templates, text, resolver, &mut attempts) {
                        return (outcome, attempts);
                    }
                }
                ParserSpec::Regex { pattern, flags, groups } => {
                    match RegexParserSpec::compile(pattern, flags, groups.clone()) {
                        Ok(compiled) => match compiled.parse(text) {
                            Ok(rows) if !rows.is_empty() => {
                                let field_count = rows.first().map(|r| r.len()).unwrap_or(0);
                                attempts.push(ParserAttempt {
                                    kind: ParserKind::Regex,
                                    template: None,
                                    resolution: None,
                                    outcome: AttemptOutcome::Matched {
                                        row_count: rows.len(),
                                        field_count,
                                    },
                                });
                                return (
                                    ChainOutcome::Success {
                                        kind: ParserKind::Regex,
                                        template: None,
                                        rows,
                                    },
                                    attempts,
                                );
                            }
                            Ok(_) => attempts.push(ParserAttempt {
                                kind: ParserKind::Regex,
                                template: None,
                                resolution: None,
                                outcome: AttemptOutcome::Empty,
                            }),
                            Err(e) => attempts.push(ParserAttempt {
                                kind: ParserKind::Regex,
                                template: None,
                                resolution: None,
                                outcome: AttemptOutcome::Failed { reason: e.to_string() },
                            }),
                        },
                        Err(e) => attempts.push(ParserAttempt {
                            kind: ParserKind::Regex,
                            template: None,
                            resolution: None,
                            outcome: AttemptOutcome::Failed { reason: e.to_string() },
                        }),
                    }
                }
            }
        }

        (ChainOutcome::AllFailed, attempts)
    }

    fn run_textfsm_templates(
        &self,
        templates: &[String],
        text: &str,
        attempts: &mut Vec<ParserAttempt>,
    ) -> Option<ChainOutcome> {
        for filename in templates {
            let resolution_result = self.textfsm_resolver.resolve(filename);
            let (path, resolution) = match resolution_result {
                Ok((path, resolution)) => (path, resolution),
                Err(Error::TemplateNotFound {
                    filename,
                    local_path_searched,
                    system_path_searched,
                }) => {
                    attempts.push(ParserAttempt {
                        kind: ParserKind::TextFsm,
                        template: Some(filename.clone()),
                        resolution: None,
                        outcome: AttemptOutcome::Failed {
                            reason: format!(
                                "TemplateNotFound: '{filename}' not in '{local_path_searched}' or '{system_path_searched}'"
                            ),
                        },
                    });
                    continue;
                }
                Err(e) => {
                    attempts.push(ParserAttempt {
                        kind: ParserKind::TextFsm,
                        template: Some(filename.clone()),
                        resolution: None,
                        outcome: AttemptOutcome::Failed { reason: e.to_string() },
                    });
                    continue;
                }
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(s) => s,
                Err(e) => {
                    attempts.push(ParserAttempt {
                        kind: ParserKind::TextFsm,
                        template: Some(filename.clone()),
                        resolution: Some(resolution),
                        outcome: AttemptOutcome::Failed {
                            reason: format!("could not read template file: {e}"),
                        },
                    });
                    continue;
                }
            };

            match TextFsmTemplate::compile(&source).and_then(|tmpl| tmpl.parse(text)) {
                Ok(rows) if !rows.is_empty() => {
                    let field_count = rows.first().map(|r| r.len()).unwrap_or(0);
                    attempts.push(ParserAttempt {
                        kind: ParserKind::TextFsm,
                        template: Some(filename.clone()),
                        resolution: Some(resolution),
                        outcome: AttemptOutcome::Matched {
                            row_count: rows.len(),
                            field_count,
                        },
                    });
                    return Some(ChainOutcome::Success {
                        kind: ParserKind::TextFsm,
                        template: Some(filename.clone()),
                        rows,
                    });
                }
                Ok(_) => attempts.push(ParserAttempt {
                    kind: ParserKind::TextFsm,
                    template: Some(filename.clone()),
                    resolution: Some(resolution),
                    outcome: AttemptOutcome::Empty,
                }),
                Err(e) => attempts.push(ParserAttempt {
                    kind: ParserKind::TextFsm,
                    template: Some(filename.clone()),
                    resolution: Some(resolution),
                    outcome: AttemptOutcome::Failed { reason: e.to_string() },
                }),
            }
        }
        None
    }

    fn run_ttp_templates(
        &self,
        templates: &[String],
        text: &str,
        resolver: &TemplateResolver,
        attempts: &mut Vec<ParserAttempt>,
    ) -> Option<ChainOutcome> {
        for filename in templates {
            let (path, resolution) = match resolver.resolve(filename) {
                Ok(v) => v,
                Err(e) => {
                    attempts.push(ParserAttempt {
                        kind: ParserKind::Ttp,
                        template: Some(filename.clone()),
                        resolution: None,
                        outcome: AttemptOutcome::Failed { reason: e.to_string() },
                    });
                    continue;
                }
            };
            let source = match std::fs::read_to_string(&path) {
                Ok(s) => s,
                Err(e) => {
                    attempts.push(ParserAttempt {
                        kind: ParserKind::Ttp,
                        template: Some(filename.clone()),
                        resolution: Some(resolution),
                        outcome: AttemptOutcome::Failed {
                            reason: format!("could not read template file: {e}"),
                        },
                    });
                    continue;
                }
            };
            match TtpTemplate::compile(&source).and_then(|tmpl| tmpl.parse(text)) {
                Ok(rows) if !rows.is_empty() => {
                    let field_count = rows.first().map(|r| r.len()).unwrap_or(0);
                    attempts.push(ParserAttempt {
                        kind: ParserKind::Ttp,
                        template: Some(filename.clone()),
                        resolution: Some(resolution),
                        outcome: AttemptOutcome::Matched {
                            row_count: rows.len(),
                            field_count,
                        },
                    });
                    return Some(ChainOutcome::Success {
                        kind: ParserKind::Ttp,
                        template: Some(filename.clone()),
                        rows,
                    });
                }
                Ok(_) => attempts.push(ParserAttempt {
                    kind: ParserKind::Ttp,
                    template: Some(filename.clone()),
                    resolution: Some(resolution),
                    outcome: AttemptOutcome::Empty,
                }),
                Err(e) => attempts.push(ParserAttempt {
                    kind: ParserKind::Ttp,
                    template: Some(filename.clone()),
                    resolution: Some(resolution),
                    outcome: AttemptOutcome::Failed { reason: e.to_string() },
                }),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CPU_TEMPLATE: &str = r#"Value FIVE_SEC_TOTAL (\d+)
Value ONE_MIN (\d+)
Value FIVE_MIN (\d+)

Start
  ^CPU utilization for five seconds: ${FIVE_SEC_TOTAL}%.*one minute: ${ONE_MIN}%; five minutes: ${FIVE_MIN}% -> Record
"#;

    #[test]
    fn first_template_with_rows_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.textfsm"), "Value BAD (unterminated\n\nStart\n").unwrap();
        fs::write(dir.path().join("good.textfsm"), CPU_TEMPLATE).unwrap();

        let resolver = TemplateResolver::new(dir.path(), None);
        let chain = ParserChain {
            textfsm_resolver: &resolver,
            ttp_resolver: None,
        };
        let parsers = vec![ParserSpec::TextFsm {
            templates: vec!["bad.textfsm".to_string(), "good.textfsm".to_string()],
        }];
        let (outcome, attempts) = chain.run(
            &parsers,
            "CPU utilization for five seconds: 13%/2%; one minute: 11%; five minutes: 10%",
        );
        match outcome {
            ChainOutcome::Success { template, rows, .. } => {
                assert_eq!(template.as_deref(), Some("good.textfsm"));
                assert_eq!(rows.len(), 1);
            }
            ChainOutcome::AllFailed => panic!("expected success"),
        }
        assert_eq!(attempts.len(), 2);
        assert!(matches!(attempts[0].outcome, AttemptOutcome::Failed { .. }));
        assert!(matches!(attempts[1].outcome, AttemptOutcome::Matched { .. }));
    }

    #[test]
    fn all_parsers_failing_yields_all_failed() {
        let dir = tempdir().unwrap();
        let resolver = TemplateResolver::new(dir.path(), None);
        let chain = ParserChain {
            textfsm_resolver: &resolver,
            ttp_resolver: None,
        };
        let parsers = vec![ParserSpec::TextFsm {
            templates: vec!["missing.textfsm".to_string()],
        }];
        let (outcome, attempts) = chain.run(&parsers, "%Invalid input detected");
        assert!(matches!(outcome, ChainOutcome::AllFailed));
        assert_eq!(attempts.len(), 1);
    }

    #[test]
    fn ttp_absent_is_silently_skipped() {
        let dir = tempdir().unwrap();
        let resolver = TemplateResolver::new(dir.path(), None);
        let chain = ParserChain {
            textfsm_resolver: &resolver,
            ttp_resolver: None,
        };
        let parsers = vec![ParserSpec::Ttp {
            templates: vec!["whatever.ttp".to_string()],
        }];
        let (outcome, attempts) = chain.run(&parsers, "anything");
        assert!(matches!(outcome, ChainOutcome::AllFailed));
        assert!(matches!(attempts[0].outcome, AttemptOutcome::Skipped { .. }));
    }
}
