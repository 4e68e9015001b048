//! Signing-File Validation
//!
//! Checks that the supplied signing files correspond to the transaction
//! before anything is sent to the device. Two operations exist:
//! - signing: ordinary transactions, never pool registrations
//! - witnessing: exactly one pool registration, as owner or operator
//!
//! Each violated rule yields its own error. Unique witnesses are not
//! counted and inputs are not checked beyond their number.

use crate::error::{SignerError, SignerResult};
use crate::tx::types::{Certificate, UnsignedTransaction};
use crate::wallet::{partition, SigningFile};

/// Validate files for a full signature of an ordinary transaction
pub fn validate_signing(tx: &UnsignedTransaction, files: &[SigningFile]) -> SignerResult<()> {
    if tx.has_pool_registration() {
        return Err(SignerError::CantSignTxWithPoolRegistration);
    }
    validate_without_pool_registration(tx, files)
}

/// Validate files for witnessing a pool registration
pub fn validate_witnessing(tx: &UnsignedTransaction, files: &[SigningFile]) -> SignerResult<()> {
    if !tx.has_pool_registration() {
        return Err(SignerError::CantWitnessTxWithoutPoolRegistration);
    }
    validate_with_pool_registration(tx, files)
}

fn validate_without_pool_registration(
    tx: &UnsignedTransaction,
    files: &[SigningFile],
) -> SignerResult<()> {
    let parts = partition(files);

    if parts.payment.is_empty() {
        return Err(SignerError::MissingPaymentSigningFile);
    }
    if parts.payment.len() > tx.inputs.len() {
        return Err(SignerError::TooManyPaymentSigningFiles);
    }

    let stake_witnesses = tx.withdrawals.len()
        + tx
            .certificates
            .iter()
            .filter(|c| c.needs_stake_witness())
            .count();
    let pool_cold_witnesses = tx
        .certificates
        .iter()
        .filter(|c| matches!(c, Certificate::PoolRetirement { .. }))
        .count();

    if stake_witnesses > 0 && parts.stake.is_empty() {
        return Err(SignerError::MissingStakeSigningFile);
    }
    if parts.stake.len() > stake_witnesses {
        return Err(SignerError::TooManyStakeSigningFiles);
    }

    if pool_cold_witnesses > 0 && parts.pool_cold.is_empty() {
        return Err(SignerError::MissingPoolColdSigningFile);
    }
    if parts.pool_cold.len() > pool_cold_witnesses {
        return Err(SignerError::TooManyPoolColdSigningFiles);
    }

    Ok(())
}

fn validate_with_pool_registration(
    tx: &UnsignedTransaction,
    files: &[SigningFile],
) -> SignerResult<()> {
    let parts = partition(files);

    if tx.inputs.is_empty() {
        return Err(SignerError::MissingInput);
    }
    if tx.certificates.len() != 1 {
        return Err(SignerError::MultipleCertificatesWithPoolRegistration);
    }
    if !tx.withdrawals.is_empty() {
        return Err(SignerError::WithdrawalIncludedWithPoolRegistration);
    }
    if parts.pool_cold.len() > 1 {
        return Err(SignerError::TooManyPoolColdSigningFiles);
    }

    let is_operator = !parts.pool_cold.is_empty();
    if is_operator {
        if !parts.stake.is_empty() {
            return Err(SignerError::TooManyStakeSigningFiles);
        }
    } else {
        if !parts.payment.is_empty() {
            return Err(SignerError::TooManyPaymentFilesWithPoolRegistration);
        }
        if parts.stake.is_empty() {
            return Err(SignerError::MissingStakeSigningFile);
        }
        if parts.stake.len() > 1 {
            return Err(SignerError::TooManyStakeSigningFiles);
        }
    }

    Ok(())
}
