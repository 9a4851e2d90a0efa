//! # Session Runtime
//!
//! Demo entry point: authorizes a session on Ethereum mainnet with an
//! in-process wallet, signs a thread and verifies the result the way a
//! backend would.

use anyhow::{Context, Result};
use session_runtime::{RuntimeConfig, SessionContainer};
use session_telemetry::{encode_metrics, init_telemetry};
use shared_types::ChainBase;
use sk_02_chain_signers::verify_signed_action;
use sk_03_session_orchestrator::{ActiveChain, LocalWallet};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let _telemetry = init_telemetry(&config.telemetry).context("telemetry initialization failed")?;

    let wallet = LocalWallet::generate();
    let address = wallet.address(ChainBase::Ethereum, "1")?;

    let container =
        SessionContainer::build(&config, wallet).context("failed to open session store")?;
    container.set_active_chain(ActiveChain::new(ChainBase::Ethereum, "1"));

    let signed = container
        .orchestrator()
        .sign_thread(&address, "ethereum", "Hello", "First post", "", None)
        .await?;
    info!(hash = %signed.hash, "Thread signed");

    let session = signed.decode_session()?;
    let action = signed.decode_action()?;
    verify_signed_action(&session, &action).context("signed action failed verification")?;
    info!(session_address = %session.payload.session_address, wallet = %action.session, "Signed action verified");

    println!("{}", signed.session);
    println!("{}", signed.action);
    println!("{}", signed.hash);
    print!("{}", encode_metrics()?);

    Ok(())
}
