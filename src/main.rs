use tracing_subscriber::EnvFilter;
use wayback_relay::application::Backends;
use wayback_relay::config::{Options, load_from_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let options = load_from_env()?;
    init_tracing(&options);
    options.print_summary();

    // Provider clients are linked by embedding binaries; the bare relay
    // answers every enabled slot with an "unavailable" record.
    let backends = Backends::new();

    wayback_relay::server::run(options, backends).await
}

fn init_tracing(options: &Options) {
    let filter = EnvFilter::try_new(&options.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if options.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
