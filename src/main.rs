use logclean::{
    args::{usage, value_or_env_or, Opt, DEFAULT_ELASTICSEARCH_ADDR},
    date::Retention,
    es,
    purge::purge,
    sink::Sink,
};
use std::{sync::Arc, time::Duration};
use structopt::StructOpt;

const NAME: &str = env!("CARGO_PKG_NAME");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let sink = if opt.log {
        match Sink::syslog(NAME, opt.log_level()) {
            Ok(sink) => sink,
            Err(e) => {
                let sink = Sink::stdout(opt.log_level());
                sink.error(format_args!("Error: {}", e));
                sink
            }
        }
    } else {
        Sink::stdout(opt.log_level())
    };
    let sink = Arc::new(sink);

    sink.info(format_args!(
        "{} - version: {}",
        NAME,
        env!("CARGO_PKG_VERSION")
    ));
    let family = match opt.index.as_deref() {
        Some(family) => family,
        None => {
            sink.info(format_args!("{}", usage()?));
            sink.flush();
            return Ok(());
        }
    };

    let es_addr = value_or_env_or(
        "ELASTICSEARCH_ADDR",
        opt.elasticsearch_addr.clone(),
        DEFAULT_ELASTICSEARCH_ADDR,
    );
    sink.info(format_args!(
        "Command parameters: index: {} age: {} elasticsearch: {} \
         max_concurrency: {:?}",
        family,
        opt.age,
        es_addr,
        opt.max_concurrency
    ));
    sink.info(format_args!("Begin processing"));

    let timeout = Duration::from_secs(opt.timeout);
    let client = es::create_client(&es_addr, timeout)?;
    let summary = purge(
        &client,
        family,
        Retention::new(opt.age),
        sink.clone(),
        opt.max_concurrency,
    )
    .await;

    sink.info(format_args!(
        "End processing: {} deleted, {} failed, {} listing errors",
        summary.deleted, summary.failed, summary.listing_errors
    ));
    sink.flush();

    Ok(())
}
