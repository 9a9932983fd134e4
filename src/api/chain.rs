use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::{HttpResponse, get, post, rt::time::timeout, web};
use log::{debug, info, warn};

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::blockchain::{MAX_MINE_ATTEMPTS, MINING_REWARD, ProofOfWork};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: ledger.chain(),
        length: ledger.len(),
    })
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> HttpResponse {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        is_valid: ledger.is_valid(),
        length: ledger.len(),
    })
}

/// Mine a new block from the pending pool:
/// - Snapshot the tip and release the ledger lock
/// - Solve PoW on the blocking pool, bounded by the mine timeout
/// - Re-lock, add the reward transaction and commit if the tip did not move
/// - Retry from a fresh snapshot when another commit got there first
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    for attempt in 1..=MAX_MINE_ATTEMPTS {
        let (previous_proof, previous_hash) = {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            let last = ledger.latest_block()?;
            (last.proof, last.digest()?)
        };
        debug!("MINER - attempt {attempt}: solving on top of proof {previous_proof}");

        let proof = solve_off_thread(previous_proof, state.config.mine_timeout).await?;
        let reward = Transaction::new(
            state.config.node_address.as_str(),
            state.config.reward_recipient.as_str(),
            MINING_REWARD,
        );

        let sealed = {
            let mut ledger = state.ledger.lock().expect("mutex poisoned");
            ledger.seal_block(proof, previous_hash, reward)
        };
        match sealed {
            Ok(block) => {
                info!(
                    "MINER - sealed block #{} (proof={}, txs={})",
                    block.index,
                    block.proof,
                    block.transactions.len()
                );
                return Ok(HttpResponse::Ok().json(MineResponse::from(block)));
            }
            Err(LedgerError::StaleTip) => {
                warn!("MINER - tip moved during attempt {attempt}, starting over");
            }
            Err(e) => return Err(e),
        }
    }
    Err(LedgerError::StaleTip)
}

/* -------------------- Helpers -------------------- */

/// Run the puzzle search off the request thread. On timeout the search is
/// told to stop so the worker thread is released.
async fn solve_off_thread(previous_proof: u64, limit: Duration) -> Result<u64, LedgerError> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let search = web::block(move || ProofOfWork::solve_cancellable(previous_proof, &flag));

    match timeout(limit, search).await {
        Ok(Ok(Some(proof))) => Ok(proof),
        Ok(Ok(None)) => Err(LedgerError::MiningTimedOut),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => {
            cancel.store(true, Ordering::Relaxed);
            Err(LedgerError::MiningTimedOut)
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use crate::api::{AppState, init_routes};
    use crate::blockchain::ProofOfWork;
    use crate::config::NodeConfig;

    fn state() -> web::Data<AppState> {
        let config = NodeConfig {
            node_address: "node-under-test".into(),
            ..NodeConfig::default()
        };
        web::Data::new(AppState::new(config).unwrap())
    }

    #[actix_web::test]
    async fn mine_appends_block_with_reward() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["index"], 2);
        assert_eq!(body["transactions"][0]["sender"], "node-under-test");
        assert_eq!(body["transactions"][0]["receiver"], "Kevin");
        assert_eq!(body["transactions"][0]["amount"], 1.0);
        let proof = body["proof"].as_u64().unwrap();
        assert!(ProofOfWork::is_valid_proof(1, proof));

        let ledger = state.ledger.lock().unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.pending().is_empty());
    }

    #[actix_web::test]
    async fn mining_twice_then_chain_and_validate() {
        let state = state();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        for _ in 0..2 {
            let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get().uri("/api/v1/chain/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["length"], 3);
        assert_eq!(body["chain"].as_array().unwrap().len(), 3);

        {
            let ledger = state.ledger.lock().unwrap();
            let chain = ledger.chain();
            assert_eq!(chain[2].previous_hash, chain[1].digest().unwrap());
        }

        let req = test::TestRequest::get().uri("/api/v1/validate/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["length"], 3);
    }
}
