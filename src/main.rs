mod bar;
mod command;
mod config;
mod error;
mod events;
mod focus;
mod keys;
mod launcher;
mod layout;
mod state;
mod window;
mod workspace;
mod xconn;

#[cfg(test)]
mod testing;

use bar::Bar;
use events::WmEvent;
use launcher::ForkLauncher;
use layout::Screen;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use state::{Flow, WindowManager};
use std::fs::{self, OpenOptions};
use xconn::{X11Conn, XConn};

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    // The log file is optional; without it we only log to the terminal.
    if let Some(path) = dirs::home_dir().map(|home| home.join(config::LOG_FILE)) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
            loggers.push(WriteLogger::new(LevelFilter::Info, log_config, file));
        }
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

/// What to print instead of running, if the arguments ask for it. Only a
/// lone `-v` prints the version; anything else besides no arguments at all
/// prints usage.
fn cli_message(args: &[String]) -> Option<String> {
    match args {
        [] => None,
        [flag] if flag == "-v" => Some(format!(
            "{}-{}, {}",
            config::NAME,
            config::VERSION,
            config::COPYRIGHT
        )),
        _ => Some(format!("usage: {} [-v]", config::NAME)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(message) = cli_message(&args) {
        println!("{}", message);
        return Ok(());
    }

    init_logging()?;

    let conn = X11Conn::connect()?;
    conn.become_wm()?;
    conn.grab_keys(config::KEYBINDS)?;
    conn.grab_buttons()?;
    conn.announce()?;

    let x_screen = conn.screen();
    log::info!(
        "{} started on {}x{}",
        config::NAME,
        x_screen.width_in_pixels,
        x_screen.height_in_pixels
    );
    let bar = Bar::new(conn.conn(), x_screen)?;

    let screen = Screen {
        width: i32::from(x_screen.width_in_pixels),
        height: i32::from(x_screen.height_in_pixels),
        bar_height: i32::from(config::BAR_HEIGHT),
        border: config::BORDER_WIDTH as i32,
        master_ratio: config::TILE_MASTER_RATIO,
    };
    let mut wm = WindowManager::new(
        screen,
        config::WORKSPACES,
        config::DEFAULT_LAYOUT,
        Box::new(ForkLauncher),
    );

    loop {
        conn.flush()?;
        let event = conn.wait_for_event()?;
        let Some(event) = WmEvent::from_x11(event) else {
            continue;
        };
        if wm.handle_event(&conn, event)? == Flow::Quit {
            log::info!("quitting");
            break;
        }
        conn.flush()?;
        if wm.take_bar_dirty() {
            bar.draw(conn.conn(), &wm)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn no_arguments_runs_the_window_manager() {
        assert_eq!(cli_message(&[]), None);
    }

    #[test]
    fn lone_version_flag_prints_version() {
        let message = cli_message(&args(&["-v"])).unwrap();
        assert!(message.starts_with(&format!("tfwm-{},", config::VERSION)));
        assert!(message.ends_with("MIT License"));
    }

    #[test]
    fn anything_else_prints_usage() {
        for list in [&["-v", "extra"][..], &["-h"][..], &["x", "-v"][..]] {
            assert_eq!(
                cli_message(&args(list)).as_deref(),
                Some("usage: tfwm [-v]")
            );
        }
    }
}
