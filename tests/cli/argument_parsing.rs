//! Core CLI argument parsing tests

use streamlag::app::cli::{Args, ReportFormat};
use streamlag::lag::api::ReportOrder;
use std::time::Duration;

#[test]
fn test_original_flag_set() {
    let args = Args::try_parse_from_iter(["streamlag", "-u", "nats://n1:4222", "-s", "ORDERS"]).unwrap();
    assert!(args.validate().is_ok());

    let options = args.session_options().unwrap();
    assert_eq!(options.connection.url, "nats://n1:4222");
    assert_eq!(options.timeout, Duration::from_secs(10));
    assert_eq!(options.order, ReportOrder::Broker);
}

#[test]
fn test_url_precedence() {
    let args = Args::try_parse_from_iter([
        "streamlag",
        "--url",
        "nats://long:4222",
        "-u",
        "nats://short:4222",
        "-s",
        "ORDERS",
    ])
    .unwrap();
    assert_eq!(args.session_options().unwrap().connection.url, "nats://long:4222");
}

#[test]
fn test_cluster_url_list() {
    let args = Args::try_parse_from_iter([
        "streamlag",
        "--url",
        "nats://a:4222,tls://b:4222",
        "-s",
        "ORDERS",
    ])
    .unwrap();
    assert!(args.validate().is_ok());
}

#[test]
fn test_output_flags() {
    let args = Args::try_parse_from_iter([
        "streamlag",
        "-s",
        "ORDERS",
        "--format",
        "table",
        "--order",
        "name",
        "--clamp-negative",
        "--no-color",
    ])
    .unwrap();
    assert_eq!(args.report_format().unwrap(), ReportFormat::Table);
    assert_eq!(args.report_order().unwrap(), ReportOrder::Name);
    assert!(args.clamp_negative);
    assert!(!args.use_color(true));
}

#[test]
fn test_missing_stream_fails_validation() {
    let args = Args::try_parse_from_iter(["streamlag", "-u", "nats://n1:4222"]).unwrap();
    assert!(args.validate().is_err());
}
