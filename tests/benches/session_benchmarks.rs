//! # Session-Key Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Action hash | < 50µs |
//! | Sign + self-verify, per family | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shared_types::{action_hash, Action, ActionPayload, CallArgs, SessionPayload};
use sk_01_session_store::InMemorySessionStore;
use sk_02_chain_signers::{
    ChainSigner, CosmosKey, EthereumKey, NearKey, SessionKey, SessionSigner, SolanaKey,
    SubstrateKey,
};
use sk_03_session_orchestrator::LocalWallet;
use std::sync::Arc;
use std::time::Duration;

fn call_args() -> CallArgs {
    [
        ("community", json!("ethereum")),
        ("title", json!("Benchmark%20thread")),
        ("body", json!("x".repeat(512))),
        ("link", json!("")),
        ("topic", json!(7)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn bench_action_hash(c: &mut Criterion) {
    let action = Action::new(
        ActionPayload {
            app: "commonwealth".to_string(),
            block: Some("0xabc".to_string()),
            call: "thread".to_string(),
            call_args: call_args(),
            chain: "eip155:1".to_string(),
            from: "0xwallet".to_string(),
            timestamp: 1,
        },
        "0xwallet",
        "0xsig",
    );
    c.bench_function("action_hash", |b| {
        b.iter(|| black_box(action_hash(&action).is_ok()))
    });
}

fn authorized<K: SessionKey>(
    runtime: &tokio::runtime::Runtime,
    wallet: &LocalWallet,
    chain_id: &str,
) -> ChainSigner<K> {
    let signer = ChainSigner::<K>::new(Arc::new(InMemorySessionStore::new()));
    runtime.block_on(async {
        let session_address = signer.get_or_create_address(chain_id).await.ok()?;
        let payload = SessionPayload {
            app: "commonwealth".to_string(),
            block: None,
            chain: K::FAMILY.qualified_chain(chain_id),
            from: wallet.address(K::FAMILY, chain_id).ok()?,
            session_address,
            session_duration: 86_400_000,
            session_issued: 1,
        };
        let signature = wallet.sign_payload(K::FAMILY, &payload).ok()?;
        signer.auth_session(chain_id, payload, signature).await.ok()
    });
    signer
}

fn bench_sign<K: SessionKey>(
    c: &mut Criterion,
    runtime: &tokio::runtime::Runtime,
    wallet: &LocalWallet,
    chain_id: &str,
) {
    let signer = authorized::<K>(runtime, wallet, chain_id);
    let mut group = c.benchmark_group("sign_action");
    group.measurement_time(Duration::from_secs(5));
    group.bench_with_input(BenchmarkId::from_parameter(K::FAMILY), &chain_id, |b, chain_id| {
        b.iter(|| runtime.block_on(signer.sign(chain_id, "thread", call_args())).is_ok())
    });
    group.finish();
}

fn bench_signers(c: &mut Criterion) {
    let Ok(runtime) = tokio::runtime::Runtime::new() else {
        return;
    };
    let wallet = LocalWallet::generate();

    bench_sign::<EthereumKey>(c, &runtime, &wallet, "1");
    bench_sign::<SubstrateKey>(c, &runtime, &wallet, "edgeware");
    bench_sign::<CosmosKey>(c, &runtime, &wallet, "cosmos");
    bench_sign::<SolanaKey>(c, &runtime, &wallet, "mainnet-beta");
    bench_sign::<NearKey>(c, &runtime, &wallet, "mainnet");
}

criterion_group!(benches, bench_action_hash, bench_signers);
criterion_main!(benches);
