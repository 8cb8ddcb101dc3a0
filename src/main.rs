//! Entry point for the **monswitch** binary.
//!
//! Runs exactly one [`Command`](monswitch::command::Command) and exits.  The
//! exit status tells the failure kinds apart:
//!
//! | Status | Meaning                                   |
//! |--------|-------------------------------------------|
//! | 0      | success                                   |
//! | 1      | usage error or unsupported platform       |
//! | 2      | cursor position could not be read         |
//! | 3      | cursor could not be moved                 |
//! | 4      | internal geometry contract violated       |
//! | 5      | no displays found                         |
//! | 6      | display details could not be queried      |

use log::{error, info, warn};
use monswitch::command::{Command, Strategy, USAGE};
use monswitch::config::{config_path, Config};
use monswitch::switcher::{MonitorSwitcher, SwitchOutcome};
use monswitch::traits::DisplayPlatform;

/// Exit status when no displays are known.
#[cfg_attr(not(windows), allow(dead_code))]
const EXIT_NO_DISPLAYS: i32 = 5;

/// Try to load the config file, falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_path();
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();
    let command = match Command::from_args(std::env::args().skip(1), config.strategy) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    #[cfg(windows)]
    {
        let platform = monswitch::win32::platform::Win32Platform::new();
        let switcher = MonitorSwitcher::new(platform, config.enumeration);
        std::process::exit(run(&switcher, command));
    }

    #[cfg(not(windows))]
    {
        let status = match command {
            Command::Help => usage(),
            _ => {
                error!("monswitch needs the Win32 display APIs; this platform is not supported");
                1
            }
        };
        std::process::exit(status);
    }
}

fn usage() -> i32 {
    println!("{}", USAGE);
    0
}

/// Execute `command` and return the process exit status.
#[cfg_attr(not(windows), allow(dead_code))]
fn run<P: DisplayPlatform>(switcher: &MonitorSwitcher<P>, command: Command) -> i32 {
    match command {
        Command::ListAndSwitch(strategy) => {
            let listed = list(switcher);
            if listed != 0 {
                warn!("listing failed, switching anyway");
            }
            switch(switcher, strategy)
        }
        Command::Switch(strategy) => switch(switcher, strategy),
        Command::List => list(switcher),
        Command::Info => info_cmd(switcher),
        Command::Help => usage(),
    }
}

//  Commands

#[cfg_attr(not(windows), allow(dead_code))]
fn list<P: DisplayPlatform>(switcher: &MonitorSwitcher<P>) -> i32 {
    let current = switcher.current_display().ok();
    match switcher.snapshot() {
        Ok(snapshot) => {
            println!("{} display(s):", snapshot.len());
            for (i, block) in snapshot.blocks().iter().enumerate() {
                println!(
                    "  [{}] handle {}  rect {}  center {}",
                    i,
                    block.handle(),
                    block.bounds(),
                    block.center()
                );
            }
            if let Some(block) = current.and_then(|handle| snapshot.find(handle)) {
                println!("cursor is on display {}", block.handle());
            }
            if snapshot.is_empty() {
                EXIT_NO_DISPLAYS
            } else {
                0
            }
        }
        Err(e) => {
            error!("{}", e);
            EXIT_NO_DISPLAYS
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn switch<P: DisplayPlatform>(switcher: &MonitorSwitcher<P>, strategy: Strategy) -> i32 {
    let outcome = match strategy {
        Strategy::Enumeration => switcher.switch_to_next(),
        Strategy::Clockwise => switcher.switch_clockwise(),
    };
    match outcome {
        Ok(SwitchOutcome::Moved { to, position, .. }) => {
            info!("cursor moved to {} on display {}", position, to);
            0
        }
        Ok(SwitchOutcome::NoDisplays { enumeration_failed }) => {
            if enumeration_failed {
                error!("display enumeration failed, cursor not moved");
            } else {
                error!("no displays found, cursor not moved");
            }
            EXIT_NO_DISPLAYS
        }
        Err(e) => {
            error!("switch failed: {}", e);
            e.exit_code()
        }
    }
}

#[cfg_attr(not(windows), allow(dead_code))]
fn info_cmd<P: DisplayPlatform>(switcher: &MonitorSwitcher<P>) -> i32 {
    match switcher.current_display_info() {
        Ok((cursor, display, meta)) => {
            if !meta.bounds.contains(cursor) {
                warn!("cursor {} lies outside the reported bounds {}", cursor, meta.bounds);
            }
            println!("Cursor at {} is on display {}:", cursor, display);
            println!("  Bounds:    {}", meta.bounds);
            println!("  Work area: {}", meta.work_area);
            println!("  Primary:   {}", meta.primary);
            0
        }
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}
