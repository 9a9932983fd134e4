use actix_web::{HttpResponse, get, post, web};
use log::{debug, info};

use super::models::{AppState, MempoolResponse, NewTxRequest, NewTxResponse};
use crate::error::LedgerError;

/// Submit a new transaction into the pending pool.
/// All three fields are required; nothing else is checked.
#[post("/tx/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, LedgerError> {
    let NewTxRequest {
        sender,
        receiver,
        amount,
    } = body.into_inner();
    let sender = sender.ok_or(LedgerError::MissingField("sender"))?;
    let receiver = receiver.ok_or(LedgerError::MissingField("receiver"))?;
    let amount = amount.ok_or(LedgerError::MissingField("amount"))?;
    debug!("POST /tx/ - {sender} -> {receiver} ({amount})");

    let index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.add_transaction(sender, receiver, amount)?
    };
    info!("POST /tx/ - queued for block #{index}");

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to Block {index}"),
        index,
    }))
}

/// List the pending pool.
#[get("/mempool/")]
pub async fn get_mempool(state: web::Data<AppState>) -> HttpResponse {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
