use std::path::PathBuf;

use clap::Parser;

use crate::method::Method;

#[derive(Parser, Debug)]
#[command(version, about = "Send one HTTP/1.1 request and print the response body")]
pub struct Args {
    /// Absolute URL of the request
    pub url: String,

    #[clap(long, short = 'X', default_value = "GET", value_parser = parse_method)]
    pub method: Method,

    /// Header field as `Name: value`; may be repeated
    #[clap(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[clap(long, short = 'd', conflicts_with = "data_file")]
    pub data: Option<String>,

    /// File containing the request body, or `-` for standard input
    #[clap(long)]
    pub data_file: Option<PathBuf>,

    /// Print the response head before the body
    #[clap(long, short = 'i')]
    pub include: bool,

    /// Print the response head as JSON instead of the body
    #[clap(long)]
    pub head_json: bool,

    /// Accept any status phrase starting with a three digit code
    #[clap(long)]
    pub code_fallback: bool,

    /// Seconds to wait for the connection to be established
    #[clap(long)]
    pub connect_timeout: Option<f64>,

    /// Seconds to wait on each read or write
    #[clap(long)]
    pub timeout: Option<f64>,

    #[clap(long, default_value = "warn")]
    pub log_level: super::logging::Level,

    #[clap(long)]
    pub log_file: Option<PathBuf>,

    #[clap(long)]
    pub log_json: bool,
}

fn parse_method(value: &str) -> Result<Method, String> {
    value
        .to_ascii_uppercase()
        .parse()
        .map_err(|error: crate::method::UnknownMethod| error.to_string())
}

fn parse_header(value: &str) -> Result<(String, String), String> {
    match value.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected `Name: value`, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: text/html").unwrap(),
            ("Accept".to_string(), "text/html".to_string())
        );
        assert_eq!(
            parse_header("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert!(parse_header("no colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), Method::Post);
        assert!(parse_method("fake").is_err());
    }
}
