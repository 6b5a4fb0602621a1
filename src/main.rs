mod api;
mod app;
mod logging;
mod render;
mod samples;
mod state;
mod ui;
mod utils;
mod view;

use adw::prelude::*;
use adw::Application;

fn main() -> glib::ExitCode {
    crate::logging::init();
    let app = Application::builder()
        .application_id("com.example.SpamDetector")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run()
}
