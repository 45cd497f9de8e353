//! Build metadata generated by build.rs

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Consumer API version from `[package.metadata]`, with a stable fallback
pub fn consumer_api_version() -> u32 {
    CONSUMER_API_VERSION.parse().unwrap_or(20250727)
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Version line shown by `--version`
pub fn long_version() -> String {
    format!(
        "{} (consumer API {}, built {})",
        env!("CARGO_PKG_VERSION"),
        consumer_api_version(),
        build_time()
    )
}
