use crate::config::{Config, GridShape, MAX_GRID_SIDE};
use crate::menu::handlers::{run_bulk_generation, run_review};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const ESC_HINT: &str = "(Esc to go back)";

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== Video Triage ===").cyan().bold());
    println!("{}", style(ESC_HINT).dim());

    let options = [
        "Generate thumbnails",
        "Review & quarantine",
        "Settings",
        "Exit",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose an action")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_bulk_generation(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_review(term, config)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false),
        _ => unreachable!(),
    }
}

fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== Settings ===").cyan().bold());
        println!("{}", style(ESC_HINT).dim());

        let settings = &config.settings;
        let options = [
            format!("Mosaic grid: {}", settings.grid),
            format!(
                "Workers: {}",
                if settings.worker_count == 0 {
                    "auto".to_string()
                } else {
                    settings.worker_count.to_string()
                }
            ),
            format!(
                "Resolve quarantine name collisions: {}",
                on_off(settings.resolve_collisions)
            ),
            format!(
                "Regenerate missing thumbnails: {}",
                on_off(settings.revalidate_thumbnails)
            ),
            "Back".to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Choose a setting")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let changed = match selection {
            Some(0) => prompt_grid(config)?,
            Some(1) => prompt_worker_count(config)?,
            Some(2) => {
                config.settings.resolve_collisions = !config.settings.resolve_collisions;
                true
            }
            Some(3) => {
                config.settings.revalidate_thumbnails = !config.settings.revalidate_thumbnails;
                true
            }
            Some(4) | None => break,
            _ => unreachable!(),
        };

        if changed {
            config.save()?;
            println!("\n{}", style("Settings saved").green());
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
    }

    Ok(())
}

fn prompt_grid(config: &mut Config) -> Result<bool> {
    let current = config.settings.grid;
    let cols: u32 = Input::new()
        .with_prompt("Columns")
        .default(current.cols)
        .validate_with(|value: &u32| grid_side(*value))
        .interact_text()?;
    let rows: u32 = Input::new()
        .with_prompt("Rows")
        .default(current.rows)
        .validate_with(|value: &u32| grid_side(*value))
        .interact_text()?;

    let grid = GridShape::new(rows, cols);
    if grid == current {
        return Ok(false);
    }
    config.settings.grid = grid;
    Ok(true)
}

fn prompt_worker_count(config: &mut Config) -> Result<bool> {
    let workers: usize = Input::new()
        .with_prompt("Workers (0 = one per core)")
        .default(config.settings.worker_count)
        .interact_text()?;

    if workers == config.settings.worker_count {
        return Ok(false);
    }
    config.settings.worker_count = workers;
    Ok(true)
}

fn grid_side(value: u32) -> std::result::Result<(), String> {
    if (1..=MAX_GRID_SIDE).contains(&value) {
        Ok(())
    } else {
        Err(format!("must be within 1..={MAX_GRID_SIDE}"))
    }
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
