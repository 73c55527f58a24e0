use env_logger::Builder;
use log::LevelFilter;

pub fn init_logging(debug: bool) {
    let default_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::from_default_env()
        .filter_level(LevelFilter::Off)
        .filter_module("pulsetalk", default_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
