use super::problems::{Extreme, ProblemSection};
use super::variance::VarianceReport;
use super::{StatsReport, Summary};
use crate::model::verdict_label;

pub fn render_text(report: &StatsReport) -> String {
    let mut s = String::new();
    render_summary(&mut s, &report.summary);
    if let Some(problems) = &report.problems {
        s.push('\n');
        render_problems(&mut s, problems);
    }
    if let Some(variance) = &report.variance {
        s.push('\n');
        render_variance(&mut s, variance);
    }
    s
}

fn render_summary(s: &mut String, summary: &Summary) {
    s.push_str(&format!(
        "Judgings: {} ({} submissions, {} problems)\n",
        summary.judgings, summary.submissions, summary.problems
    ));
    for (verdict, n) in &summary.verdicts {
        s.push_str(&format!("  {:<16} {}\n", verdict, n));
    }
}

fn render_problems(s: &mut String, sections: &[ProblemSection]) {
    s.push_str("Per-problem runtimes (correct judgings)\n");
    s.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    for section in sections {
        match section {
            ProblemSection::NoCorrect { problem_id, name } => {
                s.push_str(&format!("p{} {}: no correct judgings\n", problem_id, name));
            }
            ProblemSection::NoRuntimeData {
                problem_id,
                name,
                correct_count,
            } => {
                s.push_str(&format!(
                    "p{} {}: {} correct judgings, no runtime data\n",
                    problem_id, name, correct_count
                ));
            }
            ProblemSection::Extremes(e) => {
                let timelimit = e
                    .timelimit
                    .map(|t| format!("{:.3}s", t))
                    .unwrap_or_else(|| "?".into());
                let ratio = e
                    .timelimit_ratio
                    .map(|r| format!(" ({:.0}% of limit)", r * 100.0))
                    .unwrap_or_default();
                let (lo, hi) = e.range();
                s.push_str(&format!(
                    "p{} {}: timelimit {}, runtimes [{:.3}s, {:.3}s]{}, {} correct judgings\n",
                    e.problem_id, e.name, timelimit, lo, hi, ratio, e.correct_count
                ));
                render_extreme(s, "best", &e.best);
                render_extreme(s, "worst", &e.worst);
            }
        }
    }
}

fn render_extreme(s: &mut String, label: &str, e: &Extreme) {
    s.push_str(&format!(
        "  {:<5} {:.3}s  s{} j{}  {:<8} {:<12} spread {}\n",
        label,
        e.runtime,
        e.submission_id,
        e.judging_id,
        e.language_id,
        e.host.as_deref().unwrap_or("-"),
        e.spread
    ));
}

fn render_variance(s: &mut String, report: &VarianceReport) {
    s.push_str(&format!(
        "Submissions with diverging verdicts: {}\n",
        report.divergent.len()
    ));
    for d in &report.divergent {
        let groups: Vec<String> = d
            .groups
            .iter()
            .map(|g| {
                let ids: Vec<String> = g.judging_ids.iter().map(|id| format!("j{}", id)).collect();
                format!("{}: [{}]", verdict_label(g.verdict), ids.join(", "))
            })
            .collect();
        s.push_str(&format!("  s{} {{{}}}\n", d.submission_id, groups.join(", ")));
    }

    s.push_str(&format!(
        "\nTop {} submissions by testcase runtime spread\n",
        report.top().len()
    ));
    s.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    for e in report.top() {
        let testcase = e
            .worst_testcase
            .map(|tc| format!("  (testcase {})", tc))
            .unwrap_or_default();
        s.push_str(&format!(
            "  s{:<8} spread {:<9} judgings {:<3} {}{}\n",
            e.submission_id,
            e.spread.to_string(),
            e.judging_count,
            e.verdict,
            testcase
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Spread, Verdict};
    use crate::report::problems::ProblemExtremes;
    use crate::report::variance::{
        DivergentSubmission, SubmissionSpread, VerdictGroup, VerdictSummary,
    };
    use std::collections::BTreeMap;

    fn extreme(judging_id: i64, runtime: f64) -> Extreme {
        Extreme {
            judging_id,
            submission_id: 1,
            runtime,
            language_id: "cpp".into(),
            host: Some("judge-a".into()),
            spread: Spread::new(0.3),
        }
    }

    #[test]
    fn test_render_full_report() {
        let report = StatsReport {
            summary: Summary {
                judgings: 3,
                submissions: 2,
                problems: 1,
                verdicts: BTreeMap::from([("correct".to_string(), 2), ("wrong-answer".to_string(), 1)]),
            },
            problems: Some(vec![ProblemSection::Extremes(ProblemExtremes {
                problem_id: 1,
                name: "hello".into(),
                timelimit: Some(2.0),
                correct_count: 2,
                best: extreme(1, 1.2),
                worst: extreme(2, 1.5),
                timelimit_ratio: Some(0.75),
            })]),
            variance: Some(VarianceReport {
                divergent: vec![DivergentSubmission {
                    submission_id: 2,
                    groups: vec![
                        VerdictGroup {
                            verdict: Some(Verdict::Correct),
                            judging_ids: vec![3],
                        },
                        VerdictGroup {
                            verdict: Some(Verdict::WrongAnswer),
                            judging_ids: vec![4],
                        },
                    ],
                }],
                ranked: vec![SubmissionSpread {
                    submission_id: 2,
                    spread: Spread::UNKNOWN,
                    judging_count: 2,
                    verdict: VerdictSummary::Multiple,
                    worst_testcase: None,
                }],
                top_n: 10,
            }),
        };

        let out = render_text(&report);
        assert!(out.contains("Judgings: 3 (2 submissions, 1 problems)"));
        assert!(out.contains("p1 hello: timelimit 2.000s, runtimes [1.200s, 1.500s] (75% of limit), 2 correct judgings"));
        assert!(out.contains("best  1.200s  s1 j1"));
        assert!(out.contains("spread 0.300s"));
        assert!(out.contains("s2 {correct: [j3], wrong-answer: [j4]}"));
        assert!(out.contains("*multiple*"));
        assert!(out.contains("Top 1 submissions"));
    }

    #[test]
    fn test_render_summary_only() {
        let report = StatsReport {
            summary: Summary {
                judgings: 1,
                submissions: 1,
                problems: 1,
                verdicts: BTreeMap::from([("pending".to_string(), 1)]),
            },
            problems: None,
            variance: None,
        };
        let out = render_text(&report);
        assert!(out.starts_with("Judgings: 1"));
        assert!(!out.contains("Per-problem"));
        assert!(!out.contains("diverging"));
    }
}
