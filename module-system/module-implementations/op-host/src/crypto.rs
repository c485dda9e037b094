use tiny_keccak::{Hasher, Sha3};

use crate::types::{BridgeId, Digest};

/// SHA3-256 (FIPS 202) of the concatenation of `parts`.
pub fn sha3_256(parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha3::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    Digest(output)
}

/// Child-chain denom minted for `l1_denom` on `bridge_id`.
///
/// `"l2/" || hex(sha3_256(bridge_id as big-endian u64 || l1_denom))`
pub fn l2_denom(bridge_id: BridgeId, l1_denom: &str) -> String {
    let hash = sha3_256(&[&bridge_id.to_be_bytes(), l1_denom.as_bytes()]);
    format!("l2/{}", hex::encode(hash.as_bytes()))
}
