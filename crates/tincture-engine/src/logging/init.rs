use std::sync::Once;

/// Directives appended when `quiet_gpu` is set; wgpu logs every resource
/// creation at info.
const GPU_QUIET_DIRECTIVES: &str = "wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "tincture_engine=trace").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Caps the wgpu crates at `warn` unless the filter names them itself.
    pub quiet_gpu: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_gpu: true,
        }
    }
}

impl LoggingConfig {
    #[inline]
    pub fn with_filter(filter: String) -> Self {
        Self {
            env_filter: Some(filter),
            ..Self::default()
        }
    }

    /// Final filter string: explicit filter, then `rust_log`, then `info`,
    /// followed by the GPU directives when enabled.
    pub fn directives(&self, rust_log: Option<&str>) -> String {
        let base = self.env_filter.as_deref().or(rust_log).unwrap_or("info");
        if !self.quiet_gpu || base.contains("wgpu") || base.contains("naga") {
            return base.to_owned();
        }
        format!("{base},{GPU_QUIET_DIRECTIVES}")
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` once. Later calls are ignored, as is a logger already
/// installed by a host application.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let directives = config.directives(rust_log.as_deref());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&directives);
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({directives})");
        }
    });
}
