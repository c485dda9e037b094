//! Withdrawal commitments.
//!
//! The child chain collects the withdrawals of an output's block range into a
//! binary Merkle tree and folds its root into the output root. The host chain
//! only ever sees a leaf and its path, so both sides must agree on every byte:
//!
//! - leaf: `sha3_256(bcs(bridge_id, l2_sequence, sender, receiver, amount, denom))`
//!   with addresses as raw 32 bytes and the amount as 32 little-endian bytes;
//! - parent: `sha3_256(left || right)`;
//! - a level with an odd number of nodes promotes its last node unchanged.

use borsh::{BorshDeserialize, BorshSerialize};
use op_modules_api::Address;
use serde::{Deserialize, Serialize};

use crate::crypto::sha3_256;
use crate::types::{Amount, BridgeId, Digest, Sequence};

/// The fields a child-chain withdrawal commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalLeaf {
    pub bridge_id: BridgeId,
    pub l2_sequence: Sequence,
    pub sender: Address,
    pub receiver: Address,
    pub amount: Amount,
    pub denom: String,
}

impl WithdrawalLeaf {
    /// BCS encoding of the leaf fields, in declaration order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        bcs::to_bytes(self)
    }

    pub fn hash(&self) -> Result<Digest, bcs::Error> {
        Ok(sha3_256(&[&self.to_bytes()?]))
    }
}

/// Which side of the parent the sibling sits on.
#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// One level of an inclusion proof, from the leaf upward.
#[derive(
    BorshDeserialize, BorshSerialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ProofStep {
    pub sibling: Digest,
    pub side: Side,
}

fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    sha3_256(&[left.as_bytes(), right.as_bytes()])
}

/// Folds `proof` onto `leaf` and returns the resulting root.
pub fn fold_proof(leaf: Digest, proof: &[ProofStep]) -> Digest {
    proof.iter().fold(leaf, |node, step| match step.side {
        Side::Left => hash_pair(&step.sibling, &node),
        Side::Right => hash_pair(&node, &step.sibling),
    })
}

/// Returns `true` if `proof` links `leaf` to `root`.
pub fn verify_proof(root: &Digest, leaf: Digest, proof: &[ProofStep]) -> bool {
    &fold_proof(leaf, proof) == root
}

/// A complete withdrawal tree, as built by the child chain for one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalTree {
    /// `levels[0]` holds the leaves, the last level holds the root.
    levels: Vec<Vec<Digest>>,
}

impl WithdrawalTree {
    pub fn new(leaves: Vec<Digest>) -> Self {
        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    /// Hashes `leaves` and builds the tree over them.
    pub fn from_withdrawals(leaves: &[WithdrawalLeaf]) -> Result<Self, bcs::Error> {
        let hashes = leaves
            .iter()
            .map(WithdrawalLeaf::hash)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(hashes))
    }

    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root, or `None` for a tree without leaves.
    pub fn root(&self) -> Option<Digest> {
        self.levels.last().and_then(|level| level.first()).copied()
    }

    /// Inclusion proof of the leaf at `index`.
    pub fn proof(&self, mut index: usize) -> Option<Vec<ProofStep>> {
        if index >= self.len() {
            return None;
        }
        let mut proof = Vec::new();
        for level in &self.levels[..self.levels.len() - 1] {
            let step = if index % 2 == 1 {
                Some(ProofStep {
                    sibling: level[index - 1],
                    side: Side::Left,
                })
            } else {
                level.get(index + 1).map(|sibling| ProofStep {
                    sibling: *sibling,
                    side: Side::Right,
                })
            };
            proof.extend(step);
            index /= 2;
        }
        Some(proof)
    }
}
