//! Native tracing setup shared by the binaries

use anyhow::Context;
use std::{
    fs::{create_dir_all, File},
    path::{Path, PathBuf},
};
use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Folder trace files are written to, relative to the working directory
pub const TRACE_FOLDER: &str = "traces";

/// Used when `RUST_LOG` is not set
pub const DEFAULT_ENV_FILTER: &str = "info";

/// Compose the layers used by the clients into a `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_env_filter_directive`. For the
/// accepted syntax see <https://docs.rs/tracing-subscriber/0.3.19/tracing_subscriber/filter/struct.EnvFilter.html#directives>
pub fn get_subscriber<Sink, S>(
    name: String,
    default_env_filter_directive: S,
    sink: Sink,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    S: AsRef<str>,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_env_filter_directive));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Register a subscriber as global default and forward `log` records to it.
///
/// It should only be called once!
pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) -> anyhow::Result<()> {
    LogTracer::init().context("Failed to set logger")?;
    set_global_default(subscriber).context("Failed to set subscriber")?;
    Ok(())
}

fn gen_log_filename(app_name: &str, now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}_{app_name}.log", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Creates a new trace file inside of `log_folder` (created if missing)
///
/// Returns a handle to the file created and the file path
pub fn create_trace_file_in(log_folder: &Path, app_name: &str) -> anyhow::Result<(File, PathBuf)> {
    create_dir_all(log_folder)
        .with_context(|| format!("Failed to create logging folder: {log_folder:?}"))?;
    let filename = gen_log_filename(app_name, chrono::Local::now());
    let file_path = log_folder.join(&filename);
    let file = File::create(&file_path)
        .with_context(|| format!("Failed to create log file: {filename:?}"))?;
    Ok((file, file_path))
}

/// Same as [`create_trace_file_in`] using [`TRACE_FOLDER`]
pub fn create_trace_file(app_name: &str) -> anyhow::Result<(File, PathBuf)> {
    create_trace_file_in(Path::new(TRACE_FOLDER), app_name)
}

/// Sends JSON traces to a new file under [`TRACE_FOLDER`]
///
/// Returns the path of the file. Fails if a global subscriber is already set.
pub fn init_to_file(app_name: &str) -> anyhow::Result<PathBuf> {
    let (file, path) = create_trace_file(app_name)?;
    init_subscriber(get_subscriber(app_name.into(), DEFAULT_ENV_FILTER, file))
        .context("Failed to start tracing to file")?;
    Ok(path)
}

/// Sends JSON traces to stderr, leaving stdout for program output
pub fn init_to_stderr(app_name: &str) -> anyhow::Result<()> {
    init_subscriber(get_subscriber(
        app_name.into(),
        DEFAULT_ENV_FILTER,
        std::io::stderr,
    ))
    .context("Failed to start tracing to stderr")
}
