mod checksum;
mod run;
mod watch;

pub use checksum::run_checksum;
pub use run::run_once;
pub use watch::run_watch;
