use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    // `std` pulls the platform mocks into the docs so the crate-level
    // example links resolve.
    let mut cmd = Command::new("cargo");
    cmd.args(["doc", "--no-deps", "-p", "platform", "-p", "nt35950"])
        .args(["--features", "nt35950/std,nt35950/tracing"]);

    if open {
        cmd.arg("--open");
    }

    let output = cmd.output().context("Failed to build documentation")?;

    if !output.status.success() {
        eprintln!("{}", "✗ Documentation build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Documentation build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Documentation built in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );

    if !open {
        println!();
        println!(
            "   {}",
            "Open target/doc/nt35950/index.html in your browser".dimmed()
        );
        println!("   {}", "Or run 'cargo run -p xtask -- doc --open'".dimmed());
    }

    println!();

    Ok(())
}
