pub mod actions;
pub mod ai_client;
pub mod app;
pub mod cache;
pub mod config;
pub mod effects;
pub mod link_dialog;
pub mod map_view;
pub mod memoized;
pub mod native;
pub mod node_shapes;
pub mod outline_view;
pub mod selection;
pub mod settings;
pub mod shortcuts;
pub mod state;
pub mod store;
pub mod text_surface;

pub use app::ConceptMapApp;
pub use config::Config;

/// Build the app for a freshly created eframe window.
pub fn create_app(cc: &eframe::CreationContext<'_>, config: Config) -> ConceptMapApp {
    cc.egui_ctx.set_visuals(eframe::egui::Visuals::light());
    ConceptMapApp::new(config)
}
