//! CLI TOML configuration tests
//!
//! Configuration files fill what the command line leaves unset.

use std::io::Write;
use std::time::Duration;
use streamlag::app::cli::Args;
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_config_supplies_stream_and_url() {
    let file = write_config(
        r#"
url = "nats://from-config:4222"
stream = "ORDERS"
timeout = 5
"#,
    );
    let path = file.path().to_str().unwrap().to_string();
    let mut args = Args::try_parse_from_iter(["streamlag", "-c", path.as_str()]).unwrap();

    Args::load_config_file(&mut args, None).await.unwrap();
    assert!(args.validate().is_ok());

    let options = args.session_options().unwrap();
    assert_eq!(options.connection.url, "nats://from-config:4222");
    assert_eq!(options.timeout, Duration::from_secs(5));
    assert_eq!(args.stream_name(), "ORDERS");
}

#[tokio::test]
async fn test_command_line_overrides_config() {
    let file = write_config("url = \"nats://from-config:4222\"\nstream = \"ORDERS\"\ntimeout = 5\n");
    let path = file.path().to_str().unwrap().to_string();
    let mut args = Args::try_parse_from_iter([
        "streamlag",
        "-c",
        path.as_str(),
        "-u",
        "nats://from-cli:4222",
        "-s",
        "INVOICES",
        "-t",
        "2",
    ])
    .unwrap();

    Args::load_config_file(&mut args, None).await.unwrap();
    let options = args.session_options().unwrap();

    assert_eq!(options.connection.url, "nats://from-cli:4222");
    assert_eq!(options.timeout, Duration::from_secs(2));
    assert_eq!(args.stream_name(), "INVOICES");
}

#[tokio::test]
async fn test_bad_config_value_is_reported() {
    let file = write_config("format = 3\n");
    let mut args = Args::new();
    args.config_file = Some(file.path().to_path_buf());

    let err = Args::load_config_file(&mut args, None).await.unwrap_err();
    assert!(err.details().contains("format"));
}
