use std::sync::Arc;

use mirrorbot_core::{
    config::Config,
    console::{self, Terminal},
    db::{backup, Database, DatabaseOptions},
    dispatch::Logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mirrorbot_core::logging::init("mirrorbot")?;

    let cfg = Config::load()?;
    let db = Arc::new(Database::open(
        &cfg.database_file,
        DatabaseOptions {
            first_run: cfg.first_run,
            log_queries: cfg.log_queries,
        },
    )?);
    if cfg.log_queries {
        db.set_query_log(Box::new(|statement| {
            println!("{}", console::add_quotes(statement));
        }));
    }

    let logger = Arc::new(Logger::new(Box::new(Terminal)));
    logger
        .info(&["database ready, logging locally until a channel connects".into()])
        .await?;

    // The chat client adapter wires itself in here: once its log channels are
    // up it implements RemoteSink and calls logger.set_remote_sink(...), after
    // which every log call is mirrored to the platform.

    if let Some(file) = backup::create_backup(&cfg.database_file, &cfg.backups_dir).await {
        logger
            .log(&[format!("daily backup written: {} ({} bytes)", file.path.display(), file.size)
                .into()])
            .await?;
    }

    Ok(())
}
