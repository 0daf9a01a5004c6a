use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wcsig::cli::Cli;
use wcsig_broker::{replay::ReplaySource, BatchSource};
use wcsig_pipeline::{outcome::RecordOutcome, Pipeline};
use wcsig_storage::AuditTrail;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    let _ = dotenvy::dotenv();

    // Set the default log level to `info` if not set
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.pipeline_config()?;

    if !config.check_signature {
        warn!("signature verification is DISABLED; records are accepted on signing-root equality alone");
    }
    info!(
        replay_file = %cli.replay_file.display(),
        output_file = %cli.output_file.display(),
        expected_total = config.expected_total,
        "starting verification run"
    );

    let source = ReplaySource::open(&cli.replay_file)
        .await
        .context("could not open replay file")?;
    let mut audit = AuditTrail::open(&cli.output_file).await?;
    let mut pipeline = Pipeline::new(config)?;

    tokio::select! {
        result = run(source, &mut pipeline, &mut audit) => result?,
        _ = tokio::signal::ctrl_c() => info!("received shutdown signal"),
    }

    Ok(())
}

/// Reads messages one at a time, fully processing each before committing its
/// offset. Only transport faults and audit-trail write failures escape.
async fn run<S: BatchSource>(
    mut source: S,
    pipeline: &mut Pipeline,
    audit: &mut AuditTrail,
) -> anyhow::Result<()> {
    loop {
        let Some(message) = source
            .next_message()
            .await
            .context("failed to read message from source")?
        else {
            info!(accepted = pipeline.accepted(), "source drained");
            return Ok(());
        };

        match pipeline.process_message(&message.payload, message.offset) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    if let RecordOutcome::Accepted(accepted) = outcome {
                        audit
                            .append(
                                accepted.validator_index,
                                &accepted.signature,
                                accepted.signing_root.as_slice(),
                            )
                            .await?;
                    }
                }
            }
            // Malformed envelopes are committed and skipped, never retried.
            Err(err) => {
                warn!(offset = message.offset, error = %err, "skipping undecodable message")
            }
        }

        source
            .commit(message.offset)
            .await
            .context("failed to commit message offset")?;
    }
}
