use super::{CoachingReport, ExportError};
use std::io::Write;
use std::path::Path;

use crate::models::PerformanceMetric;
use crate::scoring::classify;

/// Export a coaching report to human-readable text format
pub fn export_report<P: AsRef<Path>>(
    report: &CoachingReport,
    output_path: P,
) -> Result<(), ExportError> {
    let mut file = std::fs::File::create(output_path)?;
    write_report(report, &mut file)?;
    Ok(())
}

/// Report as a plain string
pub fn render_report(report: &CoachingReport) -> String {
    let mut buffer = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_report(report, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Write a coaching report to any writer
pub fn write_report<W: Write>(report: &CoachingReport, out: &mut W) -> std::io::Result<()> {
    let analysis = &report.analysis;

    // Header
    writeln!(out, "=")?;
    writeln!(out, "RUN REPORT")?;
    writeln!(out, "=")?;
    writeln!(out)?;

    writeln!(out, "Run: {}", report.run_id)?;
    writeln!(out, "Date: {}", report.run_timestamp.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out, "Mode: {:?} on {:?}", report.mode, report.terrain)?;
    writeln!(
        out,
        "Distance: {}  Time: {}  Pace: {}",
        report.distance, report.duration, report.pace
    )?;
    writeln!(out, "Snapshot: {}", report.snapshot_number)?;
    writeln!(out)?;

    // Overall verdict
    writeln!(
        out,
        "{} {} ({})",
        analysis.overall_status.symbol(),
        analysis.overall_status.title(),
        analysis.average_score
    )?;
    writeln!(out, "{}", analysis.summary_message)?;
    writeln!(out)?;

    // Performance
    writeln!(out, "PERFORMANCE")?;
    writeln!(out, "-")?;
    writeln!(out, "{:<12} {:>5}  {}", "Metric", "Score", "Tier")?;
    writeln!(out, "{:-<30}", "")?;
    for metric in PerformanceMetric::ALL {
        let score = report.performance.get(metric);
        writeln!(out, "{:<12} {:>5}  {}", metric.to_string(), score, classify(score))?;
    }
    writeln!(
        out,
        "{:<12} {:>5}  {}",
        "Overall", report.performance_overall, report.performance_tier
    )?;
    writeln!(out)?;

    // Injury
    writeln!(out, "INJURY RISK")?;
    writeln!(out, "-")?;
    writeln!(out, "Hip Mobility: {}", report.injury.hip_mobility)?;
    writeln!(out, "Hip Stability: {}", report.injury.hip_stability)?;
    writeln!(out, "Symmetry: {}", report.injury.symmetry)?;
    writeln!(out, "Risk Level: {}", report.injury.risk_level)?;
    writeln!(out)?;

    // Gait
    writeln!(out, "GAIT CYCLE")?;
    writeln!(out, "-")?;
    writeln!(out, "Cadence: {} spm", report.gait.cadence)?;
    writeln!(out, "Contact Time: {:.0} ms", report.gait.contact_time_ms)?;
    writeln!(out, "Flight Time: {:.0} ms", report.gait.flight_time_ms)?;
    writeln!(out, "Symmetry: {}", report.gait.symmetry)?;
    if !report.gait.phases_valid {
        writeln!(out, "Note: gait phases do not add up to 100%")?;
    }
    writeln!(out)?;

    // Focus areas are omitted entirely when none were triggered
    if analysis.has_focus_areas() {
        writeln!(out, "FOCUS AREAS")?;
        writeln!(out, "-")?;
        for (index, focus) in analysis.focus_areas.iter().enumerate() {
            writeln!(
                out,
                "{}. {} (score {}, {} priority)",
                index + 1,
                focus.title,
                focus.score,
                focus.severity
            )?;
            writeln!(out, "   {}", focus.explanation)?;
            writeln!(out, "   Tip: {}", focus.quick_tip)?;
            for exercise in &focus.exercises {
                writeln!(
                    out,
                    "   • {} [{}] - {}",
                    exercise.name, exercise.difficulty, exercise.duration
                )?;
            }
        }
        writeln!(out)?;
    }

    if !analysis.strengths.is_empty() {
        writeln!(out, "STRENGTHS")?;
        writeln!(out, "-")?;
        for strength in &analysis.strengths {
            writeln!(out, "• {}", strength)?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::CoachingEngine;
    use crate::export::test_support::sample_run;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_report() {
        let run = sample_run();
        let report = CoachingReport::build(&run, None, &CoachingEngine::new()).unwrap();
        let text = render_report(&report);

        assert!(text.contains("RUN REPORT"));
        assert!(text.contains("Pace: 5:30/km"));
        assert!(text.contains("Risk Level: Moderate"));
        assert!(text.contains("1. Lateral Sway (score 48, High priority)"));
        assert!(text.contains("2. High Impact Forces (score 55, Medium priority)"));
        assert!(!text.contains("STRENGTHS"));
    }

    #[test]
    fn test_focus_section_omitted_when_empty() {
        let run = sample_run();
        let report = CoachingReport::build(&run, Some(1), &CoachingEngine::new()).unwrap();
        let text = render_report(&report);
        assert!(!text.contains("FOCUS AREAS"));
    }

    #[test]
    fn test_export_report_to_file() {
        let run = sample_run();
        let report = CoachingReport::build(&run, None, &CoachingEngine::new()).unwrap();
        let temp_file = NamedTempFile::new().unwrap();

        export_report(&report, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, render_report(&report));
    }
}
