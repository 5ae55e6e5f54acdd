pub mod ledger;
pub mod typed_data;
pub mod types;

pub use ledger::{BalanceResponse, LedgerExecuteMsg, LedgerQueryMsg};
pub use typed_data::{
    decode_signer_pubkey, recover_signer, signing_digest, verify_authorization, PassReq,
    PubkeyError, TypedDataDomain,
};
pub use types::Phase;
