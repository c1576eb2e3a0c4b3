use eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::{MakeWriter, TestWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// The statemon subscriber stack: env filter, span traces for errors, formatted output to `writer`.
fn layered<W>(writer: W) -> impl SubscriberInitExt
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    Registry::default()
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
}

/// Initializes a tracing Subscriber for logging.
///
/// Panics if a global subscriber has already been installed.
pub fn subscriber() {
    layered(std::io::stderr).init()
}

/// Same as [`subscriber`], but returns an error instead of panicking when a global subscriber is
/// already set, and writes through the test harness's captured output.
pub fn try_subscriber() -> Result<()> {
    layered(TestWriter::new()).try_init()?;
    Ok(())
}
