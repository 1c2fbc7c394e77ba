//! Typed error enum for the `tonic-transcode-cli` library API.
//!
//! The binary (`main.rs`) converts these to `anyhow::Error` at the boundary
//! for richer context messages.

/// Errors produced while loading project config or rendering reports.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading a config file).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// TOML parsing failure.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Config file extension is neither YAML nor TOML.
    #[error("unsupported config format '{extension}'; expected .yaml, .yml or .toml")]
    UnsupportedConfigFormat {
        /// The file extension found (empty when missing).
        extension: String,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `Error` is `Send + Sync`.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    };

    #[test]
    fn unsupported_format_message() {
        let err = Error::UnsupportedConfigFormat {
            extension: "ini".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported config format 'ini'; expected .yaml, .yml or .toml"
        );
    }
}
