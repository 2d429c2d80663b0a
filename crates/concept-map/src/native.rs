use crate::{Config, create_app};

/// Entry point used by the native executable.
pub fn run(config: Config) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Concept Map",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc, config)))),
    )
}
