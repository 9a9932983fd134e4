use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, ConnectRequest, ConsensusResponse, NodesResponse};
use crate::error::LedgerError;
use crate::network::reconcile;

/// Register peers. Either every address is accepted or none is.
#[post("/nodes/")]
pub async fn connect_nodes(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> Result<HttpResponse, LedgerError> {
    let nodes = body
        .into_inner()
        .nodes
        .filter(|n| !n.is_empty())
        .ok_or(LedgerError::MissingField("nodes"))?;

    let total_nodes = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        let mut updated = peers.clone();
        for address in &nodes {
            updated.add(address)?;
        }
        *peers = updated;
        peers.to_vec()
    };
    info!("NODES - registry now holds {} peers", total_nodes.len());

    Ok(HttpResponse::Created().json(NodesResponse {
        message: "All the nodes are now connected.".to_string(),
        total_nodes,
    }))
}

/// List known peers.
#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> HttpResponse {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        message: format!("{} known nodes", peers.len()),
        total_nodes: peers.to_vec(),
    })
}

/// Run the longest-valid-chain rule against every known peer.
/// No lock is held while peers are queried.
#[post("/consensus/")]
pub async fn replace_chain(state: web::Data<AppState>) -> HttpResponse {
    let peers = state.peers.lock().expect("mutex poisoned").to_vec();
    let local = state.ledger.lock().expect("mutex poisoned").chain().to_vec();

    let outcome = reconcile(&state.chain_source, &peers, &local).await;

    let (replaced, chain) = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        // The local chain may have grown while peers were queried.
        let replaced = outcome.adopted && ledger.replace_chain(outcome.chain);
        (replaced, ledger.chain().to_vec())
    };

    let message = if replaced {
        "The node had different chains so the chain was replaced by the longest one."
    } else {
        "All good. The chain is the largest one."
    };
    HttpResponse::Ok().json(ConsensusResponse {
        replaced,
        message: message.to_string(),
        length: chain.len(),
        chain,
    })
}
