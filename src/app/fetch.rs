use std::{
    fs::File,
    io::{Cursor, Write},
    path::Path,
    time::Duration,
};

use anyhow::Context;

use crate::{
    client::{Client, ClientConfig},
    header::Headers,
    request::{Request, RequestBody},
    status::StatusLookup,
};

use super::{arg::Args, model::Head};

pub fn fetch(args: &Args) -> anyhow::Result<()> {
    let span = tracing::info_span!("fetch", url = %args.url);
    let _span_guard = span.enter();

    let client = Client::new(client_config(args)?);

    let headers = args.headers.iter().cloned().collect::<Headers>();
    let mut request = Request::new(args.method, &args.url, Some(headers))?;

    if let Some(body) = open_body(args)? {
        request = request.with_body(body);
    }

    let response = client.send(request).context("request failed")?;
    let (head, mut body) = response.into_parts();

    tracing::info!(status = %head.status, "received response");

    let mut stdout = std::io::stdout().lock();

    if args.head_json {
        serde_json::to_writer(&mut stdout, &Head::from(&head))?;
        stdout.write_all(b"\n")?;
        body.close()?;
        return Ok(());
    }

    if args.include {
        write!(stdout, "HTTP/{} {}\n{}\n", head.version, head.status, head.headers)?;
    }

    let body_len = std::io::copy(&mut body, &mut stdout).context("reading body failed")?;
    stdout.flush()?;

    tracing::info!(body_len, "read body");

    Ok(())
}

fn client_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig {
        terminate_head: true,
        connect_timeout: args.connect_timeout.map(seconds).transpose()?,
        read_timeout: args.timeout.map(seconds).transpose()?,
        write_timeout: args.timeout.map(seconds).transpose()?,
        ..Default::default()
    };

    if args.code_fallback {
        config.parser.status_lookup = StatusLookup::CodeFallback;
    }

    Ok(config)
}

fn seconds(value: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .ok()
        .filter(|duration| !duration.is_zero())
        .with_context(|| format!("invalid timeout {}", value))
}

fn open_body(args: &Args) -> anyhow::Result<Option<RequestBody>> {
    let body: RequestBody = if let Some(data) = &args.data {
        Box::new(Cursor::new(data.clone().into_bytes()))
    } else if let Some(path) = args.data_file.as_deref() {
        if path == Path::new("-") {
            Box::new(std::io::stdin())
        } else {
            Box::new(File::open(path).context("opening body file failed")?)
        }
    } else {
        return Ok(None);
    };

    Ok(Some(body))
}
