use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use video_triage::config::Config;
use video_triage::init;
use video_triage::menu::show_main_menu;
use video_triage::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal()?;

    let mut config = Config::new()?;

    loop {
        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("Bye.").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e:#}");
                eprintln!("{} {e:#}", style("Error:").red().bold());
                break;
            }
        }
    }

    Ok(())
}
