use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};

/// Initialise console logging for an embedding application that does not
/// bring its own log4rs config file. Returns the handle so the caller can
/// swap the config later.
pub fn init_console_logging(level: LevelFilter) -> Result<Handle, log::SetLoggerError> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .expect("Console-only config is valid");
    log4rs::init_config(config)
}
