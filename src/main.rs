//! http-exec
//!
//! Sends one HTTP request with a chosen protocol version ceiling and prints
//! the decoded response body to stdout. Trace lines and logs go to stderr.
//!
//! ```text
//! http-exec https://example.com/api -X POST -d '{"a":1}' \
//!     --content-type application/json --http-version 2.0 --timeout 10 \
//!     -H 'Accept: application/json' -b session=abc --raw
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use http_exec::config::{load_config, load_request_spec, ExecutorConfig, SinkKind};
use http_exec::lifecycle::Cancellation;
use http_exec::observability::init_logging;
use http_exec::request::{ProxyDescriptor, RequestSpec};
use http_exec::trace::{NoopSink, TraceSink, TracingSink, WriterSink};
use http_exec::RequestExecutor;

#[derive(Parser, Debug)]
#[command(name = "http-exec")]
#[command(about = "Send a single HTTP request with a chosen protocol version", long_about = None)]
struct Cli {
    /// Target URL (overrides the request file)
    url: Option<String>,

    /// Request method
    #[arg(short = 'X', long)]
    method: Option<String>,

    /// Request body
    #[arg(short = 'd', long)]
    body: Option<String>,

    /// Header as 'Name: value' (repeatable, order kept)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Cookie as 'name=value' (repeatable, order kept)
    #[arg(short = 'b', long = "cookie", value_parser = parse_cookie)]
    cookies: Vec<(String, String)>,

    /// Content type of the body
    #[arg(long)]
    content_type: Option<String>,

    /// Timeout in seconds; zero or negative selects the default
    #[arg(short, long, allow_negative_numbers = true)]
    timeout: Option<i64>,

    /// Version ceiling: 1.1, 2.0 or 3.0
    #[arg(long = "http-version")]
    http_version: Option<String>,

    /// Return 3xx responses instead of following them
    #[arg(long)]
    no_redirect: bool,

    /// Also trace the raw response bytes as hex
    #[arg(long)]
    raw: bool,

    /// Proxy as host:port, http://host:port or socks5://host:port
    #[arg(long)]
    proxy: Option<ProxyDescriptor>,

    #[arg(long, requires = "proxy")]
    proxy_user: Option<String>,

    #[arg(long, requires = "proxy_user")]
    proxy_pass: Option<String>,

    /// Request description file (.toml or .json)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Executor configuration file (.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => ExecutorConfig::default(),
    };

    if let Err(e) = init_logging(&config.observability.log_level) {
        eprintln!("warning: logging not initialized: {}", e);
    }

    let spec = match build_spec(&cli) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };
    let proxy = build_proxy(&cli);

    tracing::info!(
        method = %spec.method,
        url = %spec.url,
        ceiling = %spec.protocol_version(),
        proxy = proxy.is_some(),
        "http-exec v0.1.0 starting"
    );

    let executor = RequestExecutor::from_config(&config, sink_for(config.trace.sink));

    let cancellation = Arc::new(Cancellation::new());
    let token = cancellation.token();
    tokio::spawn({
        let cancellation = Arc::clone(&cancellation);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, cancelling request");
                cancellation.cancel();
            }
        }
    });

    match executor.execute_with_cancel(&spec, proxy.as_ref(), &token).await {
        Ok(body) => {
            print!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error [{}]: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

fn sink_for(kind: SinkKind) -> Arc<dyn TraceSink> {
    match kind {
        SinkKind::Log => Arc::new(TracingSink),
        SinkKind::Stderr => Arc::new(WriterSink::new(std::io::stderr())),
        SinkKind::None => Arc::new(NoopSink),
    }
}

/// Start from the request file (if any) and apply command-line overrides.
fn build_spec(cli: &Cli) -> Result<RequestSpec, Box<dyn Error>> {
    let mut spec = match &cli.request {
        Some(path) => load_request_spec(path)?,
        None => RequestSpec::default(),
    };

    if let Some(url) = &cli.url {
        spec.url = url.clone();
    }
    if let Some(method) = &cli.method {
        spec.method = method.clone();
    }
    if let Some(body) = &cli.body {
        spec.body = body.clone();
    }
    if let Some(content_type) = &cli.content_type {
        spec.content_type = Some(content_type.clone());
    }
    if let Some(timeout) = cli.timeout {
        spec.timeout_secs = timeout;
    }
    if let Some(version) = &cli.http_version {
        spec.version = Some(version.clone());
    }
    if cli.no_redirect {
        spec.auto_redirect = false;
    }
    if cli.raw {
        spec.raw_output = true;
    }
    for (name, value) in &cli.headers {
        spec.headers.insert(name.as_str(), value.as_str());
    }
    for (name, value) in &cli.cookies {
        spec.cookies.insert(name.as_str(), value.as_str());
    }

    if spec.url.is_empty() {
        return Err("no URL given (pass one or use --request)".into());
    }
    Ok(spec)
}

fn build_proxy(cli: &Cli) -> Option<ProxyDescriptor> {
    let proxy = cli.proxy.clone()?;
    Some(match (&cli.proxy_user, &cli.proxy_pass) {
        (Some(user), Some(pass)) => proxy.with_credentials(user.as_str(), pass.as_str()),
        (Some(user), None) => proxy.with_credentials(user.as_str(), ""),
        _ => proxy,
    })
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("header '{}' must look like 'Name: value'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header '{}' has an empty name", s));
    }
    Ok((name.to_string(), value.trim_start().to_string()))
}

fn parse_cookie(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("cookie '{}' must look like 'name=value'", s))?;
    if name.is_empty() {
        return Err(format!("cookie '{}' has an empty name", s));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(parse_header("Accept: */*").unwrap(), ("Accept".into(), "*/*".into()));
        assert_eq!(
            parse_header("X-Time:12:30").unwrap(),
            ("X-Time".into(), "12:30".into())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": v").is_err());
    }

    #[test]
    fn test_parse_cookie() {
        assert_eq!(parse_cookie("a=b=c").unwrap(), ("a".into(), "b=c".into()));
        assert!(parse_cookie("novalue").is_err());
    }

    #[test]
    fn test_flags_build_spec() {
        let cli = Cli::parse_from([
            "http-exec",
            "https://example.com/api",
            "-X",
            "POST",
            "-d",
            r#"{"a":1}"#,
            "--content-type",
            "application/json",
            "--http-version",
            "2.0",
            "--timeout",
            "-1",
            "-H",
            "B: 2",
            "-H",
            "A: 1",
            "-b",
            "sid=1",
            "--no-redirect",
            "--raw",
        ]);
        let spec = build_spec(&cli).unwrap();

        assert_eq!(spec.method, "POST");
        assert_eq!(spec.timeout_secs, -1);
        assert!(!spec.auto_redirect);
        assert!(spec.raw_output);
        assert_eq!(spec.protocol_version(), http_exec::ProtocolVersion::Http2);
        let names: Vec<&str> = spec.headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(spec.cookie_header().as_deref(), Some("sid=1"));
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let cli = Cli::parse_from(["http-exec", "-X", "GET"]);
        assert!(build_spec(&cli).is_err());
    }

    #[test]
    fn test_proxy_with_credentials() {
        let cli = Cli::parse_from([
            "http-exec",
            "http://example.com/",
            "--proxy",
            "127.0.0.1:3128",
            "--proxy-user",
            "u",
            "--proxy-pass",
            "p",
        ]);
        let proxy = build_proxy(&cli).unwrap();
        assert_eq!(proxy.port, 3128);
        assert!(proxy.needs_authentication());
    }
}
