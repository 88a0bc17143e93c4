use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Installs the process-wide logger. Calling it again is a no-op.
pub fn init(level: LevelFilter) {
    let installed = Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} | {:<8} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, level)
        .try_init()
        .is_ok();

    if installed {
        log::debug!("Logger initialized at {}", level);
    }
}
