use glib::{GlibLogger, GlibLoggerDomain, GlibLoggerFormat};

static GLIB_LOGGER: GlibLogger =
    GlibLogger::new(GlibLoggerFormat::Plain, GlibLoggerDomain::CrateTarget);

/// Route `log` records into GLib's logger so they are filtered by
/// `G_MESSAGES_DEBUG` alongside GTK's own messages.
pub fn init() {
    if log::set_logger(&GLIB_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }
}
