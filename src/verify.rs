// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Verification of a fetched chain transaction against a tip claim.
//!
//! Every check is a total function of the transaction record. Order only
//! decides which rejection is reported first:
//! status, type, contract, function, then arguments.

use serde::{Deserialize, Serialize};

use crate::clarity::FunctionArg;
use crate::error::Rejection;
use crate::types::{MicroStx, PostId, TxId};

pub const STATUS_SUCCESS: &str = "success";
pub const TX_TYPE_CONTRACT_CALL: &str = "contract_call";

/// The subset of `GET /extended/v1/tx/{txid}` this service reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTx {
    #[serde(default)]
    pub tx_id: Option<String>,
    pub tx_status: String,
    pub tx_type: String,
    #[serde(default)]
    pub contract_call: Option<ContractCall>,
    #[serde(default)]
    pub block_height: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub contract_id: String,
    pub function_name: String,
    #[serde(default)]
    pub function_args: Vec<FunctionArg>,
}

/// What the transaction must prove.
#[derive(Clone, Copy, Debug)]
pub struct TipExpectation<'a> {
    pub contract_id: &'a str,
    pub function_name: &'a str,
    pub post_id: PostId,
    pub amount: MicroStx,
}

/// A transaction that passed every check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedTip {
    pub txid: TxId,
    pub block_height: Option<u64>,
}

pub fn verify_tip_tx(
    tx: &ChainTx,
    requested: &TxId,
    expect: &TipExpectation<'_>,
) -> Result<VerifiedTip, Rejection> {
    if tx.tx_status != STATUS_SUCCESS {
        return Err(Rejection::NotSuccessful {
            status: tx.tx_status.clone(),
        });
    }

    let call = match (&tx.contract_call, tx.tx_type.as_str()) {
        (Some(call), TX_TYPE_CONTRACT_CALL) => call,
        _ => {
            return Err(Rejection::WrongTxType {
                tx_type: tx.tx_type.clone(),
            })
        }
    };

    if call.contract_id != expect.contract_id {
        return Err(Rejection::ContractMismatch {
            expected: expect.contract_id.to_string(),
            got: call.contract_id.clone(),
        });
    }

    if call.function_name != expect.function_name {
        return Err(Rejection::FunctionMismatch {
            expected: expect.function_name.to_string(),
            got: call.function_name.clone(),
        });
    }

    let got_post_id = call.function_args.first().and_then(FunctionArg::as_uint);
    if got_post_id != Some(expect.post_id.get()) {
        return Err(Rejection::PostIdMismatch {
            expected: expect.post_id.get(),
            got: got_post_id,
        });
    }

    let got_amount = call.function_args.get(1).and_then(FunctionArg::as_uint);
    if got_amount != Some(expect.amount.get()) {
        return Err(Rejection::AmountMismatch {
            expected: expect.amount.get(),
            got: got_amount,
        });
    }

    // The record's own id wins when it is well-formed.
    let txid = tx
        .tx_id
        .as_deref()
        .and_then(|raw| TxId::from_chain(raw).ok())
        .unwrap_or_else(|| requested.clone());

    Ok(VerifiedTip {
        txid,
        block_height: tx.block_height,
    })
}
