pub mod devices;
pub mod settings;

pub use devices::{ControllerList, OsvrController};
pub use settings::{DriverSettings, SettingsError};

use std::io::Write;
use std::sync::Once;

const LOG_ENV: &str = "DRIVER_OSVR_LOG";

pub fn init_logging() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(log::LevelFilter::Info);
        if let Ok(filters) = std::env::var(LOG_ENV) {
            builder.parse_filters(&filters);
        }

        let format = time::macros::format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        );
        builder.format(move |buf, record| {
            let now = time::OffsetDateTime::now_local()
                .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
            let stamp = now.format(format).unwrap_or_default();
            writeln!(
                buf,
                "[{stamp} {:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        });
        builder.is_test(cfg!(test));

        if builder.try_init().is_err() {
            // Someone else (the host, or another driver) already owns the logger.
            return;
        }

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log::error!("{info}");
            default_hook(info);
        }));
    });
}

#[macro_export]
macro_rules! warn_once {
    ($($arg:tt)+) => {{
        static ONCE: std::sync::Once = std::sync::Once::new();
        ONCE.call_once(|| log::warn!($($arg)+));
    }};
}

#[macro_export]
macro_rules! warn_unimplemented {
    ($function:literal) => {
        $crate::warn_once!(concat!($function, " unimplemented"))
    };
}

#[macro_export]
macro_rules! tracy_span {
    () => {
        $crate::tracy_span!(concat!(module_path!(), ":", line!()))
    };
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), "", file!(), line!(), 0));
    };
}
