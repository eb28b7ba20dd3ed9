pub mod config;
pub mod log;
pub mod report;
pub mod run;
pub mod settings;
pub mod sites;

/// `42s`, `25m`, `1h 05m`.
pub fn format_duration(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3600 => format!("{}m", s / 60),
        s => format!("{}h {:02}m", s / 3600, (s % 3600) / 60),
    }
}
