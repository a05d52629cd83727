use google_ip_sync::{run_every, run_once, Config, SyncError};

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())
        .map_err(|e| format!("Error initializing log4rs: {e}"))?;
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let config = Config::from_env()?;
    log::debug!("{config:?}");

    match config.interval {
        Some(period) => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Error listening for ctrl-c: {e}");
                    std::future::pending::<()>().await;
                }
            };
            let started = run_every(config, period, shutdown).await;
            log::info!("#End main() after {started} sync run(s)");
        }
        None => {
            let outcome = run_once(config).await?;
            log::info!("#End main() {outcome}");
        }
    }

    Ok(())
}
// cargo watch -x 'fmt' -x 'run'
