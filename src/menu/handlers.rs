use crate::component::{BatchReport, QuarantineReport, Workspace};
use crate::config::Config;
use crate::config::save::set_last_used_dir;
use crate::menu::review::run_review_loop;
use crate::pause;
use crate::tools::FfmpegDecoder;
use anyhow::{Context, Result};
use console::{Term, style};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_bulk_generation(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    if let Err(e) = generate(shutdown_signal, config) {
        eprintln!("{} {e:#}", style("Error:").red().bold());
    }

    pause(term)?;
    Ok(())
}

pub fn run_review(term: &Term, config: &mut Config) -> Result<()> {
    if let Err(e) = review(term, config) {
        eprintln!("{} {e:#}", style("Error:").red().bold());
    }

    pause(term)?;
    Ok(())
}

fn generate(shutdown_signal: &Arc<AtomicBool>, config: &mut Config) -> Result<()> {
    let workspace = open_workspace(config)?;

    let candidates = workspace.list_candidates();
    println!(
        "\n{} {} video file(s) under {}",
        style("Found").cyan(),
        candidates.len(),
        workspace.layout().root().display()
    );

    let progress_bar = ProgressBar::new(candidates.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Generating mosaics...");

    let report = workspace.generate_all(Arc::clone(shutdown_signal), progress_bar)?;
    print_batch_summary(&report);
    Ok(())
}

fn review(term: &Term, config: &mut Config) -> Result<()> {
    let workspace = open_workspace(config)?;
    let mut session = workspace.start_review()?;

    if session.is_empty() {
        println!(
            "\n{}",
            style("The catalog is empty. Generate thumbnails first.").yellow()
        );
        return Ok(());
    }

    if let Some(report) = run_review_loop(term, &workspace, &mut session)? {
        print_quarantine_summary(&report);
    }
    Ok(())
}

/// Asks for the root, remembers it, and opens the catalog for this phase.
fn open_workspace(config: &mut Config) -> Result<Workspace> {
    let root = prompt_root(config)?;

    let decoder = Arc::new(FfmpegDecoder);
    let workspace = Workspace::open(&root, &config.settings, decoder)
        .with_context(|| format!("cannot open library at {}", root.display()))?;

    set_last_used_dir(&mut config.settings, workspace.layout().root());
    config.save()?;
    Ok(workspace)
}

fn prompt_root(config: &Config) -> Result<PathBuf> {
    let mut input = Input::<String>::new().with_prompt("Video library root");
    if let Some(last) = &config.settings.last_used_dir {
        input = input.default(last.clone());
    }
    let path: String = input.interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

fn print_batch_summary(report: &BatchReport) {
    info!(
        "Batch finished: {} new, {} failed, {} cancelled",
        report.newly_catalogued(),
        report.failures.len(),
        report.cancelled
    );

    println!("\n{}", style("=== Generation summary ===").cyan().bold());
    println!("  Candidates:         {}", report.total_candidates);
    println!("  Created:            {}", style(report.created.len()).green());
    println!("  Adopted:            {}", report.adopted.len());
    println!("  Already catalogued: {}", report.already_catalogued);
    if report.healed > 0 {
        println!("  Regenerated:        {}", report.healed);
    }
    if report.stale_temp_files_removed > 0 {
        println!("  Stale temp removed: {}", report.stale_temp_files_removed);
    }
    if report.cancelled > 0 {
        println!("  Cancelled:          {}", style(report.cancelled).yellow());
    }
    if report.has_failures() {
        println!("  Failed:             {}", style(report.failures.len()).red());
        for failure in &report.failures {
            println!(
                "    {} {}: {}",
                style("x").red(),
                failure.video_path.display(),
                failure.error
            );
        }
    }
}

fn print_quarantine_summary(report: &QuarantineReport) {
    println!("\n{}", style("=== Quarantine summary ===").cyan().bold());
    for entry in &report.moved {
        println!(
            "  {} {} -> {}",
            style("moved").green(),
            entry.video_path.display(),
            entry.quarantined_video.display()
        );
    }
    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            style("failed").red(),
            failure.video_path.display(),
            failure.error
        );
    }
    println!(
        "\n  {} moved, {} failed",
        report.moved.len(),
        report.failures.len()
    );
}
