use env_logger::{Builder, Env};

/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`, but
/// respects `RUST_LOG`. The HTTP stack is very chatty at debug level, so it's capped at `warn`
/// unless explicitly requested.
pub fn setup() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if std::env::var("RUST_LOG").is_err() {
        builder
            .filter_module("hyper", log::LevelFilter::Warn)
            .filter_module("reqwest", log::LevelFilter::Warn)
            .filter_module("rustls", log::LevelFilter::Warn);
    }
    // Tests and repeated CLI invocations in one process may call this more than once
    let _ = builder.try_init();
}
