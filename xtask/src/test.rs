use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// Integration test targets per crate.
const INTEGRATION: &[(&str, &str)] = &[("platform", "dcs"), ("nt35950", "lifecycle")];

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        println!("{}", "  Running unit tests...".cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .args(["test", "--lib", "--workspace"])
            .output()
            .context("Failed to run unit tests")?;
        report("Unit tests", &output, start)?;
    }

    if !unit_only {
        for &(package, target) in INTEGRATION {
            println!(
                "{}",
                format!("  Running {package} integration tests ({target})...").cyan()
            );
            let start = Instant::now();

            let output = Command::new("cargo")
                .args(["test", "-p", package, "--test", target])
                .output()
                .with_context(|| format!("Failed to run {package}/{target}"))?;
            report("Integration tests", &output, start)?;
        }
    }

    println!("{}", "  Running doc tests...".cyan());
    let doc_start = Instant::now();

    let doc_output = Command::new("cargo")
        .args(["test", "--doc", "--workspace"])
        .output()
        .context("Failed to run doc tests")?;

    if doc_output.status.success() {
        let summary = extract_test_summary(&String::from_utf8_lossy(&doc_output.stdout));
        println!(
            "{}",
            format!(
                "  ✓ Doc tests passed {} in {:.2}s",
                summary,
                doc_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Doc tests failed".yellow().bold());
        // Don't fail on doc test failures
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn report(what: &str, output: &Output, start: Instant) -> Result<()> {
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {what} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        anyhow::bail!("{what} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {what} passed {} in {:.2}s",
            extract_test_summary(&stdout),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

fn extract_test_summary(output: &str) -> String {
    // "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out"
    output
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .map(str::trim)
        .last()
        .map_or_else(|| "(summary not available)".to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::extract_test_summary;

    #[test]
    fn summary_is_taken_from_the_result_line() {
        let out = "running 3 tests\ntest a ... ok\n\ntest result: ok. 3 passed; 0 failed\n";
        assert_eq!(extract_test_summary(out), "ok. 3 passed; 0 failed");
    }

    #[test]
    fn missing_summary_is_reported() {
        assert_eq!(extract_test_summary("nothing here"), "(summary not available)");
    }
}
