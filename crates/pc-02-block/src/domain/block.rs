//! Block entity: header, transactions and producer signature

use super::header::HEADER_ENCODED_LEN;
use super::{BlockError, BlockHeader, BlockResult, BLOCK_VERSION};
use pc_01_authority::Authority;
use shared_crypto::{merkle_root, sha256_many};
use shared_types::{short_hex, Address, Hash, Signature, Timestamp, Transaction, ZERO_HASH};
use std::sync::OnceLock;
use tracing::debug;

/// Merkle root over the per-transaction digests, in block order.
pub fn compute_transaction_root(transactions: &[Transaction]) -> Hash {
    let leaves: Vec<Hash> = transactions.iter().map(Transaction::digest).collect();
    merkle_root(&leaves)
}

/// A block: header, ordered transactions and the producer's signature.
#[derive(Clone, Debug)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<Transaction>,
    signature: Option<Signature>,
    /// Memoized `SHA256(header_digest || signature)`.
    cached_hash: OnceLock<Hash>,
}

impl Block {
    /// Build and sign an empty block.
    pub fn new(
        height: u64,
        prev_hash: Hash,
        state_root: Hash,
        gas_limit: u64,
        timestamp: Timestamp,
        signer: &Authority,
    ) -> BlockResult<Self> {
        let header = BlockHeader {
            version: BLOCK_VERSION,
            timestamp,
            prev_hash,
            height,
            state_root,
            transaction_root: compute_transaction_root(&[]),
            receipt_root: ZERO_HASH,
            gas_limit,
            gas_used: 0,
            validator_address: *signer.address(),
        };
        let mut block = Self {
            header,
            transactions: Vec::new(),
            signature: None,
            cached_hash: OnceLock::new(),
        };
        block.sign(signer)?;
        Ok(block)
    }

    /// Reassemble a block received from elsewhere.
    ///
    /// Checks that the header commits to `transactions`; the signature is
    /// checked later against the producer's key.
    pub fn from_parts(
        header: BlockHeader,
        transactions: Vec<Transaction>,
        signature: Option<Signature>,
    ) -> BlockResult<Self> {
        if header.is_empty() {
            return Err(BlockError::EmptyHeader);
        }

        let computed = compute_transaction_root(&transactions);
        if computed != header.transaction_root {
            return Err(BlockError::TransactionRootMismatch {
                header: header.transaction_root,
                computed,
            });
        }

        let gas_used = transactions
            .iter()
            .fold(0u64, |acc, tx| acc.saturating_add(tx.gas_used));
        if gas_used != header.gas_used {
            return Err(BlockError::GasUsedMismatch {
                header: header.gas_used,
                computed: gas_used,
            });
        }

        Ok(Self {
            header,
            transactions,
            signature,
            cached_hash: OnceLock::new(),
        })
    }

    /// Append a transaction and charge its full gas limit.
    ///
    /// Checked in order: remaining gas, non-negative value, unique
    /// `(from, nonce)`. A rejected transaction leaves the block untouched.
    /// The existing signature no longer covers the header afterwards; call
    /// [`Block::sign`] before appending to a ledger.
    pub fn add_transaction(&mut self, mut tx: Transaction) -> BlockResult<()> {
        let remaining = self.remaining_gas();
        if tx.gas_limit > remaining {
            return Err(BlockError::GasLimitExceeded {
                requested: tx.gas_limit,
                remaining,
            });
        }

        if tx.has_negative_value() {
            return Err(BlockError::NegativeValue(tx.hash));
        }

        if self
            .transactions
            .iter()
            .any(|existing| existing.from == tx.from && existing.nonce == tx.nonce)
        {
            return Err(BlockError::DuplicateNonce {
                from: tx.from,
                nonce: tx.nonce,
            });
        }

        tx.gas_used = tx.gas_limit;
        self.header.gas_used += tx.gas_used;
        self.transactions.push(tx);
        self.header.transaction_root = compute_transaction_root(&self.transactions);
        self.cached_hash = OnceLock::new();

        debug!(
            height = self.header.height,
            transactions = self.transactions.len(),
            gas_used = self.header.gas_used,
            "Transaction added to block"
        );
        Ok(())
    }

    /// Sign the finalized header with `signer`, which becomes the producer.
    pub fn sign(&mut self, signer: &Authority) -> BlockResult<()> {
        self.header.validator_address = *signer.address();
        let signature = signer.sign(&self.header.digest())?;
        self.signature = Some(signature);
        self.cached_hash = OnceLock::new();
        Ok(())
    }

    /// True if the block carries a valid signature by `signer` and names
    /// `signer` as its producer.
    pub fn verify(&self, signer: &Authority) -> bool {
        let Some(signature) = &self.signature else {
            return false;
        };
        self.header.validator_address == *signer.address()
            && signer.verify(&self.header.digest(), signature)
    }

    /// `SHA256(header_digest || signature)`, memoized.
    ///
    /// An unsigned block hashes the header digest alone.
    pub fn hash(&self) -> Hash {
        *self.cached_hash.get_or_init(|| {
            let digest = self.header.digest();
            match &self.signature {
                Some(signature) => sha256_many(&[digest.as_slice(), signature.as_slice()]),
                None => sha256_many(&[digest.as_slice()]),
            }
        })
    }

    /// Look up an included transaction by hash.
    pub fn transaction_by_hash(&self, hash: &Hash) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| &tx.hash == hash)
    }

    /// Approximate encoded size: header, signature and each transaction's
    /// [`Transaction::encoded_size`].
    pub fn size_bytes(&self) -> u64 {
        let signature = self.signature.map_or(0, |s| s.len() as u64);
        let transactions: u64 = self.transactions.iter().map(Transaction::encoded_size).sum();
        HEADER_ENCODED_LEN as u64 + signature + transactions
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }

    pub fn prev_hash(&self) -> &Hash {
        &self.header.prev_hash
    }

    pub fn validator_address(&self) -> &Address {
        &self.header.validator_address
    }

    pub fn gas_limit(&self) -> u64 {
        self.header.gas_limit
    }

    pub fn gas_used(&self) -> u64 {
        self.header.gas_used
    }

    /// Gas still available for transactions.
    pub fn remaining_gas(&self) -> u64 {
        self.header.gas_limit.saturating_sub(self.header.gas_used)
    }

    pub fn is_genesis(&self) -> bool {
        self.header.is_genesis()
    }

    /// Consume the block into its parts.
    pub fn into_parts(self) -> (BlockHeader, Vec<Transaction>, Option<Signature>) {
        (self.header, self.transactions, self.signature)
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block #{} {} ({} txs)",
            self.header.height,
            short_hex(&self.hash()),
            self.transactions.len()
        )
    }
}
