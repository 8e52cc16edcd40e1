use crate::component::{QuarantineReport, ReviewSession, Workspace};
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use log::warn;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Clone, Copy)]
enum ReviewAction {
    Next,
    Previous,
    ToggleDelete,
    Refresh,
    Quarantine,
    Abort,
}

impl ReviewAction {
    const ALL: [Self; 6] = [
        Self::Next,
        Self::Previous,
        Self::ToggleDelete,
        Self::Refresh,
        Self::Quarantine,
        Self::Abort,
    ];

    const fn label(self, selected: bool) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Previous => "Previous",
            Self::ToggleDelete if selected => "Unmark",
            Self::ToggleDelete => "Mark for deletion",
            Self::Refresh => "Refresh mosaic",
            Self::Quarantine => "Quarantine marked videos and finish",
            Self::Abort => "Finish without changes",
        }
    }
}

/// Walks the snapshot until the user quarantines or aborts.
///
/// Returns the quarantine report, or `None` when the session ended without moving anything.
pub fn run_review_loop(
    term: &Term,
    workspace: &Workspace,
    session: &mut ReviewSession,
) -> Result<Option<QuarantineReport>> {
    loop {
        let Some(entry) = session.current().cloned() else {
            return Ok(None);
        };
        let selected = session.is_selected(&entry.video_path);

        term.clear_screen()?;
        println!("{}", style("=== Review ===").cyan().bold());

        let size_gb = workspace
            .video_size(&entry.video_path)
            .map_or(0.0, |size| size as f64 / BYTES_PER_GB);
        let marker = if selected {
            style("[DELETE]").red().bold().to_string()
        } else {
            String::new()
        };
        println!(
            "\n[{}/{}] {size_gb:.4}GB {marker}",
            session.position().map_or(0, |i| i + 1),
            session.len()
        );
        println!("  video:  {}", entry.video_path.display());
        println!("  mosaic: {}", style(entry.thumbnail_path.display()).dim());
        println!("  marked: {}\n", session.selected().len());

        let items: Vec<&str> = ReviewAction::ALL
            .iter()
            .map(|action| action.label(selected))
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Action")
            .items(&items)
            .default(0)
            .interact_on_opt(term)?;

        let Some(index) = selection else {
            return Ok(None);
        };

        match ReviewAction::ALL[index] {
            ReviewAction::Next => {
                session.next();
            }
            ReviewAction::Previous => {
                session.previous();
            }
            ReviewAction::ToggleDelete => {
                session.toggle_current();
            }
            ReviewAction::Refresh => {
                if let Err(e) = workspace.refresh_current(session) {
                    warn!("Refresh failed for {}: {e}", entry.video_path.display());
                    eprintln!("{} {e}", style("Refresh failed:").red().bold());
                    pause(term)?;
                }
            }
            ReviewAction::Quarantine => {
                if session.selected().is_empty() {
                    return Ok(None);
                }
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Move {} video(s) to {}?",
                        session.selected().len(),
                        workspace.layout().quarantine_dir().display()
                    ))
                    .default(false)
                    .interact_on(term)?;
                if confirmed {
                    return Ok(Some(workspace.quarantine_selected(session)?));
                }
            }
            ReviewAction::Abort => return Ok(None),
        }
    }
}
