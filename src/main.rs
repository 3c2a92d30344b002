// Prevent a console window next to the app in Windows release builds.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod chrome;
mod image_ops;
mod settings;
mod state;
mod theme;
mod unsplash;
mod wallpaper;
mod worker;

use std::sync::Arc;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cfg!(debug_assertions) {
            "warn,splashpaper=debug"
        } else {
            "warn,splashpaper=info"
        },
    ))
    .init();

    let settings = settings::load();
    let source = Arc::new(unsplash::UnsplashClient::new(&settings)?);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(app::APP_TITLE)
            .with_decorations(false)
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        app::APP_TITLE,
        native_options,
        Box::new(move |cc| Box::new(app::SplashPaperApp::new(cc, settings, source))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start the window: {err}"))?;
    Ok(())
}
