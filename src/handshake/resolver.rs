//! Argument and stdin resolution.
//!
//! See the [module docs](super) for the two handshake paths.

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::ffi::OsString;
use std::io::Read;

use serde::Deserialize;
use serde_json::Deserializer;
use tracing::debug;

use crate::error::{Error, Result};

use super::ConnectionParameters;

// ============================================================================
// StdinConfig
// ============================================================================

/// Configuration object the shell writes to the extension's stdin.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StdinConfig {
    /// Shell WebSocket port.
    pub nl_port: String,
    /// Access token for outbound envelopes.
    pub nl_token: String,
    /// One-time token proving the extension was spawned by the shell.
    pub nl_connect_token: String,
    /// Extension id.
    pub nl_extension_id: String,
}

// ============================================================================
// ConnectionParameters Resolution
// ============================================================================

impl ConnectionParameters {
    /// Resolves parameters from positional launch arguments.
    ///
    /// `args` excludes the program name and must hold `port=..`,
    /// `token=..` and `extensionId=..` in that order. Keys are not checked;
    /// the value is everything after the first `=`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a value is missing or empty, or the port
    /// is not a valid `u16`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let value = |index: usize| {
            args.get(index)
                .and_then(|arg| arg.as_ref().split_once('='))
                .map(|(_, value)| value)
                .filter(|value| !value.is_empty())
        };

        let (Some(port), Some(token), Some(extension_id)) = (value(0), value(1), value(2)) else {
            return Err(Error::config(
                "Missing required arguments: port, token, or extensionId",
            ));
        };

        Ok(Self::new(parse_port(port)?, token, None, extension_id))
    }

    /// Resolves parameters from the JSON object on `reader`.
    ///
    /// Only the first JSON value is consumed; the stream need not reach EOF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the stream ends first, the JSON is
    /// malformed, or a field is missing or empty.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config = Deserializer::from_reader(reader)
            .into_iter::<StdinConfig>()
            .next()
            .ok_or_else(|| Error::config("stdin closed before configuration was received"))?
            .map_err(|e| Error::config(format!("Invalid stdin configuration: {e}")))?;

        Self::from_config(config)
    }

    /// Resolves parameters from an already-parsed stdin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required field is empty or the port
    /// is invalid.
    pub fn from_config(config: StdinConfig) -> Result<Self> {
        for (field, value) in [
            ("nlPort", &config.nl_port),
            ("nlToken", &config.nl_token),
            ("nlConnectToken", &config.nl_connect_token),
            ("nlExtensionId", &config.nl_extension_id),
        ] {
            if value.is_empty() {
                return Err(Error::config(format!("Missing required field: {field}")));
            }
        }

        Ok(Self::new(
            parse_port(&config.nl_port)?,
            config.nl_token,
            Some(config.nl_connect_token),
            config.nl_extension_id,
        ))
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Picks the handshake path: arguments when any are present, else `stdin`.
///
/// `args` excludes the program name.
///
/// # Errors
///
/// Returns [`Error::Config`] if the chosen path fails.
pub fn resolve<S: AsRef<str>, R: Read>(args: &[S], stdin: R) -> Result<ConnectionParameters> {
    let params = if args.is_empty() {
        ConnectionParameters::from_reader(stdin)?
    } else {
        ConnectionParameters::from_args(args)?
    };

    debug!(
        port = params.port(),
        extension_id = params.extension_id(),
        via_stdin = args.is_empty(),
        "Handshake resolved"
    );

    Ok(params)
}

/// Resolves parameters from this process's arguments and stdin.
///
/// The blocking stdin read runs on the blocking thread pool.
///
/// # Errors
///
/// Returns [`Error::Config`] if the handshake fails.
pub async fn resolve_from_process() -> Result<ConnectionParameters> {
    let args = process_args(env::args_os().skip(1))?;

    tokio::task::spawn_blocking(move || resolve(&args, std::io::stdin().lock()))
        .await
        .map_err(|e| Error::config(format!("Handshake task failed: {e}")))?
}

/// Converts raw launch arguments, rejecting any that are not UTF-8.
fn process_args(args: impl IntoIterator<Item = OsString>) -> Result<Vec<String>> {
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                Error::config(format!("Launch argument is not valid UTF-8: {}", arg.display()))
            })
        })
        .collect()
}

fn parse_port(port: &str) -> Result<u16> {
    port.trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid port: {port}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use tokio_test::{assert_err, assert_ok};

    fn empty_stdin() -> Cursor<&'static [u8]> {
        Cursor::new(&b""[..])
    }

    #[test]
    fn test_from_args() {
        let params =
            ConnectionParameters::from_args(&["port=5000", "token=abc", "extensionId=extBun"])
                .unwrap();

        assert_eq!(params.port(), 5000);
        assert_eq!(params.access_token(), "abc");
        assert_eq!(params.extension_id(), "extBun");
        assert_eq!(params.connect_token(), None);
    }

    #[test]
    fn test_from_args_keeps_equals_in_value() {
        let params =
            ConnectionParameters::from_args(&["port=1", "token=a=b", "extensionId=x"]).unwrap();
        assert_eq!(params.access_token(), "a=b");
    }

    #[test]
    fn test_from_args_missing_value() {
        for args in [
            vec!["port=5000"],
            vec!["port=5000", "token=abc"],
            vec!["port=5000", "token=", "extensionId=x"],
            vec!["port=5000", "token", "extensionId=x"],
        ] {
            let err = ConnectionParameters::from_args(args.as_slice()).unwrap_err();
            assert!(err.is_config_error(), "{args:?}");
        }
    }

    #[test]
    fn test_from_args_bad_port() {
        let err = ConnectionParameters::from_args(&["port=http", "token=t", "extensionId=x"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Invalid port: http");
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{"nlPort":"6000","nlToken":"tok","nlConnectToken":"ct","nlExtensionId":"extBun","extra":1}"#;
        let params = ConnectionParameters::from_reader(json.as_bytes()).unwrap();

        assert_eq!(params.port(), 6000);
        assert_eq!(params.access_token(), "tok");
        assert_eq!(params.connect_token(), Some("ct"));
        assert_eq!(
            params.ws_url(),
            "ws://127.0.0.1:6000/?extensionId=extBun&connectToken=ct"
        );
    }

    #[test]
    fn test_from_reader_stops_after_first_value() {
        let input = "{\"nlPort\":\"1\",\"nlToken\":\"t\",\"nlConnectToken\":\"c\",\"nlExtensionId\":\"e\"}\nnot json";
        assert!(ConnectionParameters::from_reader(input.as_bytes()).is_ok());
    }

    #[test]
    fn test_from_reader_failures() {
        for input in [
            "",
            "garbage",
            r#"{"nlPort":"1","nlToken":"t","nlExtensionId":"e"}"#,
            r#"{"nlPort":"","nlToken":"t","nlConnectToken":"c","nlExtensionId":"e"}"#,
            r#"{"nlPort":"1","nlToken":"t","nlConnectToken":"","nlExtensionId":"e"}"#,
        ] {
            let err = ConnectionParameters::from_reader(input.as_bytes()).unwrap_err();
            assert!(err.is_config_error(), "{input}");
        }
    }

    #[test]
    fn test_from_reader_empty_connect_token() {
        let json = r#"{"nlPort":"6000","nlToken":"tok","nlConnectToken":"","nlExtensionId":"extBun"}"#;
        let err = assert_err!(ConnectionParameters::from_reader(json.as_bytes()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: nlConnectToken"
        );
    }

    #[test]
    fn test_process_args() {
        let args = assert_ok!(process_args([OsString::from("port=1"), OsString::from("token=t")]));
        assert_eq!(args, ["port=1", "token=t"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_process_args_rejects_invalid_utf8() {
        use std::os::unix::ffi::OsStringExt;

        let invalid = OsString::from_vec(vec![b'p', b'=', 0xff]);
        let err = assert_err!(process_args([OsString::from("port=1"), invalid]));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_resolve_prefers_args() {
        let stdin = Cursor::new(b"never read".as_slice());
        let params = resolve(&["port=1", "token=t", "extensionId=e"], stdin).unwrap();
        assert_eq!(params.connect_token(), None);
    }

    #[test]
    fn test_resolve_falls_back_to_stdin() {
        let args: [&str; 0] = [];
        assert!(resolve(&args, empty_stdin()).unwrap_err().is_config_error());
    }
}
