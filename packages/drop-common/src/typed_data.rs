use cosmwasm_schema::cw_serde;
use cosmwasm_std::Api;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Type string of the signing domain, EIP-712 layout.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,string chainId,address verifyingContract)";

/// Type string of an allowlist authorization.
pub const PASS_REQ_TYPE: &str = "PassReq(address receiver,uint256 amount)";

/// Version string every domain in this workspace signs under.
pub const DOMAIN_VERSION: &str = "1";

/// Domain that binds an authorization to one contract on one chain.
#[cw_serde]
pub struct TypedDataDomain {
    pub name: String,
    pub version: String,
    pub chain_id: String,
    pub verifying_contract: String,
}

impl TypedDataDomain {
    pub fn new(name: &str, chain_id: &str, verifying_contract: &str) -> Self {
        Self {
            name: name.to_string(),
            version: DOMAIN_VERSION.to_string(),
            chain_id: chain_id.to_string(),
            verifying_contract: verifying_contract.to_string(),
        }
    }

    /// `sha256( typeHash || H(name) || H(version) || H(chainId) || H(verifyingContract) )`
    pub fn separator(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(Sha256::digest(DOMAIN_TYPE.as_bytes()));
        hasher.update(Sha256::digest(self.name.as_bytes()));
        hasher.update(Sha256::digest(self.version.as_bytes()));
        hasher.update(Sha256::digest(self.chain_id.as_bytes()));
        hasher.update(Sha256::digest(self.verifying_contract.as_bytes()));
        hasher.finalize().into()
    }
}

/// Off-chain issued entitlement: `receiver` may take up to `amount` units.
#[cw_serde]
pub struct PassReq {
    pub receiver: String,
    pub amount: u128,
}

impl PassReq {
    /// `sha256( typeHash || H(receiver) || uint256_be(amount) )`
    ///
    /// Bech32 addresses are variable length, so the receiver is hashed
    /// instead of left-padded.
    pub fn struct_hash(&self) -> [u8; 32] {
        let mut amount_word = [0u8; 32];
        amount_word[16..].copy_from_slice(&self.amount.to_be_bytes());

        let mut hasher = Sha256::new();
        hasher.update(Sha256::digest(PASS_REQ_TYPE.as_bytes()));
        hasher.update(Sha256::digest(self.receiver.as_bytes()));
        hasher.update(amount_word);
        hasher.finalize().into()
    }
}

/// The 32-byte digest that gets signed: `sha256( 0x19 0x01 || domainSeparator || structHash )`.
pub fn signing_digest(domain: &TypedDataDomain, message: &PassReq) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([0x19, 0x01]);
    hasher.update(domain.separator());
    hasher.update(message.struct_hash());
    hasher.finalize().into()
}

/// Recover the uncompressed secp256k1 public key that signed `message`.
///
/// `signature` is 65 bytes `r || s || v` with `v` in {0, 1, 27, 28}.
/// Returns `None` for malformed signatures or failed recovery; never
/// touches state.
pub fn recover_signer(
    api: &dyn Api,
    domain: &TypedDataDomain,
    message: &PassReq,
    signature: &[u8],
) -> Option<Vec<u8>> {
    if signature.len() != 65 {
        return None;
    }
    let recovery_param = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return None,
    };
    let digest = signing_digest(domain, message);
    api.secp256k1_recover_pubkey(&digest, &signature[..64], recovery_param)
        .ok()
}

/// True when `signature` over `message` recovers to `expected_signer`.
pub fn verify_authorization(
    api: &dyn Api,
    domain: &TypedDataDomain,
    message: &PassReq,
    signature: &[u8],
    expected_signer: &[u8],
) -> bool {
    match recover_signer(api, domain, message, signature) {
        Some(signer) => signer.as_slice() == expected_signer,
        None => false,
    }
}

/// Errors from decoding a configured signer key.
#[derive(Error, Debug, PartialEq)]
pub enum PubkeyError {
    #[error("signer pubkey is not valid hex")]
    InvalidHex,

    #[error("signer pubkey must be 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("signer pubkey must be uncompressed (0x04 prefix)")]
    NotUncompressed,
}

/// Decode a hex-encoded uncompressed secp256k1 key (65 bytes, `0x04` prefix),
/// the form `secp256k1_recover_pubkey` returns.
pub fn decode_signer_pubkey(pubkey_hex: &str) -> Result<Vec<u8>, PubkeyError> {
    let bytes = hex::decode(pubkey_hex.trim_start_matches("0x"))
        .map_err(|_| PubkeyError::InvalidHex)?;
    if bytes.len() != 65 {
        return Err(PubkeyError::InvalidLength(bytes.len()));
    }
    if bytes[0] != 0x04 {
        return Err(PubkeyError::NotUncompressed);
    }
    Ok(bytes)
}
