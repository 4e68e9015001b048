//! Signing Orchestration Tests

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};

    use crate::device::*;
    use crate::error::SignerError;
    use crate::signing::*;
    use crate::tx::*;
    use crate::types::{ExtendedPublicKey, Network};
    use crate::wallet::*;

    fn file(role: SigningRole, path: &str, key_byte: u8) -> SigningFile {
        SigningFile::new(
            role,
            DerivationPath::parse(path).unwrap(),
            ExtendedPublicKey::new([key_byte; 32], [key_byte ^ 0xff; 32]),
        )
    }

    fn payment() -> SigningFile {
        file(SigningRole::Payment, "1852H/1815H/0H/0/0", 1)
    }

    fn stake() -> SigningFile {
        file(SigningRole::Stake, "1852H/1815H/0H/2/0", 2)
    }

    fn other_stake() -> SigningFile {
        file(SigningRole::Stake, "1852H/1815H/1H/2/0", 3)
    }

    fn pool_cold() -> SigningFile {
        file(SigningRole::PoolCold, "1853H/1815H/0H/0H", 4)
    }

    fn base_tx() -> UnsignedTransaction {
        UnsignedTransaction::new(vec![0xa1, 0x02, 0x19, 0x03, 0xe8])
            .with_input(TxInput::new(vec![0x11; 32], 0))
            .with_output(TxOutput::new(vec![0x61; 29], 2_000_000))
            .with_fee(1000)
            .with_ttl(5_000_000)
    }

    fn pool_cert(pool_key_hash: Vec<u8>, owners: Vec<Vec<u8>>) -> Certificate {
        Certificate::PoolRegistration(PoolRegistrationCert {
            pool_key_hash,
            vrf_pub_key_hash: vec![0x22; 32],
            pledge: 50_000_000_000,
            cost: 340_000_000,
            margin: Margin {
                numerator: 3,
                denominator: 100,
            },
            reward_account: vec![0xe1; 29],
            pool_owners_pub_key_hashes: owners,
            relays: vec![PoolRelay::SingleHostName {
                port: Some(3001),
                dns_name: "relay.example.io".to_string(),
            }],
            metadata: Some(PoolMetadata {
                url: "https://example.io/pool.json".to_string(),
                hash: vec![0x33; 32],
            }),
        })
    }

    // === Use case ===

    #[test]
    fn test_ordinary_without_pool_registration() {
        let certs = vec![Certificate::StakeRegistration {
            pub_key_hash: stake().key_hash(),
        }];
        assert_eq!(determine_use_case(&certs, &[pool_cold(), stake()]), SigningMode::Ordinary);
        assert_eq!(determine_use_case(&[], &[]), SigningMode::Ordinary);
    }

    #[test]
    fn test_operator_versus_owner() {
        let as_operator = vec![pool_cert(pool_cold().key_hash(), vec![stake().key_hash()])];
        assert_eq!(
            determine_use_case(&as_operator, &[pool_cold()]),
            SigningMode::PoolRegistrationAsOperator
        );
        assert_eq!(
            determine_use_case(&as_operator, &[stake()]),
            SigningMode::PoolRegistrationAsOwner
        );
    }

    // === Firmware gating ===

    #[test]
    fn test_firmware_gates() {
        let old = DeviceVersion::new(2, 0, 5);
        assert!(ensure_firmware_supports_params(&base_tx(), &[payment()], &old).is_ok());

        let mut no_ttl = base_tx();
        no_ttl.ttl = None;
        assert!(matches!(
            ensure_firmware_supports_params(&no_ttl, &[payment()], &old),
            Err(SignerError::FeatureNotSupported {
                feature: Feature::OptionalTtl,
                ..
            })
        ));

        let with_start = base_tx().with_validity_interval_start(10);
        assert!(matches!(
            ensure_firmware_supports_params(&with_start, &[payment()], &old),
            Err(SignerError::FeatureNotSupported {
                feature: Feature::ValidityIntervalStart,
                ..
            })
        ));

        let tokens = base_tx().with_output(TxOutput::new(vec![0x61; 29], 1).with_tokens(vec![
            MultiAsset {
                policy_id: vec![0x44; 28],
                assets: vec![Asset {
                    asset_name: b"TOKEN".to_vec(),
                    amount: 7,
                }],
            },
        ]));
        assert!(matches!(
            ensure_firmware_supports_params(&tokens, &[payment()], &DeviceVersion::new(2, 1, 0)),
            Err(SignerError::FeatureNotSupported {
                feature: Feature::MultiAsset,
                ..
            })
        ));
        assert!(ensure_firmware_supports_params(&tokens, &[payment()], &DeviceVersion::new(2, 2, 0)).is_ok());

        let operator = base_tx().with_certificate(pool_cert(pool_cold().key_hash(), vec![]));
        assert!(matches!(
            ensure_firmware_supports_params(&operator, &[pool_cold()], &DeviceVersion::new(2, 3, 0)),
            Err(SignerError::FeatureNotSupported {
                feature: Feature::PoolRegistrationOperator,
                ..
            })
        ));
        assert!(ensure_firmware_supports_params(&operator, &[stake()], &DeviceVersion::new(2, 3, 0)).is_ok());
    }

    // === Builder ===

    #[test]
    fn test_simple_transfer_request() {
        let request = build_signing_request(&base_tx(), &[payment()], &Network::mainnet(), &[]).unwrap();
        assert_eq!(request.signing_mode, SigningMode::Ordinary);
        assert_eq!(request.tx.inputs.len(), 1);
        assert_eq!(request.tx.inputs[0].path, Some(payment().path));
        assert_eq!(request.tx.inputs[0].tx_hash_hex, "11".repeat(32));
        assert_eq!(
            request.tx.outputs[0].destination,
            OutputDestination::ThirdParty {
                address_hex: "61".repeat(29)
            }
        );
        assert_eq!(request.tx.outputs[0].amount, "2000000");
        assert_eq!(request.tx.fee, "1000");
        assert_eq!(request.tx.ttl.as_deref(), Some("5000000"));
        assert!(request.tx.auxiliary_data.is_none());
    }

    #[test]
    fn test_input_path_fallback_when_files_are_short() {
        let tx = base_tx()
            .with_input(TxInput::new(vec![0x12; 32], 1))
            .with_input(TxInput::new(vec![0x13; 32], 2));
        let second = file(SigningRole::Payment, "1852H/1815H/0H/0/1", 9);
        let request =
            build_signing_request(&tx, &[payment(), second.clone()], &Network::mainnet(), &[]).unwrap();
        let paths: Vec<_> = request.tx.inputs.iter().map(|i| i.path.clone()).collect();
        assert_eq!(paths, vec![Some(payment().path), Some(second.path), Some(payment().path)]);
    }

    #[test]
    fn test_change_output_is_device_owned() {
        let network = Network::testnet(1_097_911_063);
        let change = pack_base_address(&payment().key_hash(), &stake().key_hash(), network.network_id);
        let tx = base_tx().with_output(TxOutput::new(change, 500));
        let request = build_signing_request(&tx, &[payment()], &network, &[payment(), stake()]).unwrap();

        assert!(!request.tx.outputs[0].is_device_owned());
        assert_eq!(
            request.tx.outputs[1].destination,
            OutputDestination::DeviceOwned(DeviceOwnedAddress {
                address_type: AddressType::Base,
                spending_path: Some(payment().path),
                staking_path: Some(stake().path),
            })
        );
    }

    #[test]
    fn test_change_on_other_network_is_third_party() {
        let change = pack_base_address(&payment().key_hash(), &stake().key_hash(), 0);
        let output = TxOutput::new(change, 500);
        let prepared = prepare_output(&output, &[payment(), stake()], &Network::mainnet());
        assert!(!prepared.is_device_owned());
    }

    #[test]
    fn test_token_amounts_are_decimal_strings() {
        let bundle = prepare_token_bundle(&[MultiAsset {
            policy_id: vec![0xaa; 28],
            assets: vec![Asset {
                asset_name: vec![0x01, 0x02],
                amount: u64::MAX,
            }],
        }]);
        assert_eq!(bundle[0].policy_id_hex, "aa".repeat(28));
        assert_eq!(bundle[0].tokens[0].asset_name_hex, "0102");
        assert_eq!(bundle[0].tokens[0].amount, "18446744073709551615");
    }

    #[test]
    fn test_stake_certificates_resolve_paths() {
        let files = [stake(), other_stake()];
        let registration = Certificate::StakeRegistration {
            pub_key_hash: other_stake().key_hash(),
        };
        assert_eq!(
            prepare_certificate(&registration, &files).unwrap(),
            CertificateRequest::StakeRegistration {
                path: other_stake().path
            }
        );

        let delegation = Certificate::Delegation {
            pub_key_hash: stake().key_hash(),
            pool_hash: vec![0x55; 28],
        };
        assert_eq!(
            prepare_certificate(&delegation, &files).unwrap(),
            CertificateRequest::StakeDelegation {
                path: stake().path,
                pool_key_hash_hex: "55".repeat(28),
            }
        );

        let unknown_key = Certificate::StakeDeregistration {
            pub_key_hash: vec![0u8; 28],
        };
        assert!(matches!(
            prepare_certificate(&unknown_key, &files),
            Err(SignerError::MissingSigningFileForCertificate)
        ));
    }

    #[test]
    fn test_unsupported_certificates() {
        let retirement = Certificate::PoolRetirement {
            pool_key_hash: pool_cold().key_hash(),
            retirement_epoch: 250,
        };
        assert!(matches!(
            prepare_certificate(&retirement, &[pool_cold()]),
            Err(SignerError::UnsupportedProviderCall(_))
        ));
        assert!(matches!(
            prepare_certificate(&Certificate::Unknown { cert_type: 7 }, &[]),
            Err(SignerError::UnknownCertificate(7))
        ));
    }

    #[test]
    fn test_pool_registration_as_owner() {
        let third_party_owner = vec![0x66; 28];
        let cert = pool_cert(vec![0x77; 28], vec![third_party_owner, stake().key_hash()]);
        let CertificateRequest::PoolRegistration(params) =
            prepare_certificate(&cert, &[stake()]).unwrap()
        else {
            panic!("expected pool registration");
        };

        assert_eq!(params.pledge, "50000000000");
        assert_eq!(params.margin.numerator, "3");
        assert_eq!(
            params.pool_owners,
            vec![
                PoolOwnerRequest::ThirdParty {
                    staking_key_hash_hex: "66".repeat(28)
                },
                PoolOwnerRequest::DeviceOwned {
                    staking_path: stake().path
                },
            ]
        );
        assert_eq!(params.metadata.unwrap().hash_hex, "33".repeat(32));
    }

    #[test]
    fn test_pool_registration_as_operator_owners_are_third_party() {
        let cert = pool_cert(pool_cold().key_hash(), vec![stake().key_hash()]);
        let CertificateRequest::PoolRegistration(params) =
            prepare_certificate(&cert, &[stake(), pool_cold()]).unwrap()
        else {
            panic!("expected pool registration");
        };
        assert!(matches!(params.pool_owners[0], PoolOwnerRequest::ThirdParty { .. }));
    }

    #[test]
    fn test_owner_listed_twice() {
        let owners = vec![stake().key_hash(), other_stake().key_hash()];
        assert!(matches!(
            prepare_pool_owners(
                SigningMode::PoolRegistrationAsOwner,
                &owners,
                &[stake(), other_stake()]
            ),
            Err(SignerError::OwnerMultipleTimesInTx)
        ));
        assert!(prepare_pool_owners(
            SigningMode::PoolRegistrationAsOperator,
            &owners,
            &[stake(), other_stake()]
        )
        .is_ok());
    }

    #[test]
    fn test_relays() {
        let relays = prepare_relays(&[
            PoolRelay::SingleHostIp {
                port: Some(3000),
                ipv4: Some(vec![10, 0, 0, 1]),
                ipv6: None,
            },
            PoolRelay::MultiHostName {
                dns_name: "pool.example.io".to_string(),
            },
        ])
        .unwrap();
        assert_eq!(
            relays[0],
            RelayRequest::SingleHostIp {
                port: Some(3000),
                ipv4: Some("10.0.0.1".to_string()),
                ipv6: None,
            }
        );
        assert!(matches!(
            prepare_relays(&[PoolRelay::Other { relay_type: 5 }]),
            Err(SignerError::UnsupportedRelayType(5))
        ));
    }

    #[test]
    fn test_withdrawals() {
        let reward = pack_reward_address(&stake().key_hash(), 1);
        let withdrawal = Withdrawal {
            address: reward,
            coins: 42,
        };
        let request = prepare_withdrawal(&withdrawal, &[other_stake(), stake()]).unwrap();
        assert_eq!(request.path, stake().path);
        assert_eq!(request.amount, "42");

        assert!(matches!(
            prepare_withdrawal(&withdrawal, &[other_stake()]),
            Err(SignerError::MissingSigningFileForWithdrawal)
        ));
    }

    #[test]
    fn test_owner_witness_request_has_no_input_paths() {
        let tx = base_tx().with_certificate(pool_cert(vec![0x77; 28], vec![stake().key_hash()]));
        let request = build_signing_request(&tx, &[stake()], &Network::mainnet(), &[]).unwrap();
        assert_eq!(request.signing_mode, SigningMode::PoolRegistrationAsOwner);
        assert!(request.tx.inputs.iter().all(|i| i.path.is_none()));
    }

    #[test]
    fn test_metadata_hash_is_forwarded() {
        let tx = base_tx().with_metadata_hash(vec![0x99; 32]);
        let request = build_signing_request(&tx, &[payment()], &Network::mainnet(), &[]).unwrap();
        assert_eq!(
            request.tx.auxiliary_data,
            Some(AuxiliaryDataRequest::ArbitraryHash {
                hash_hex: "99".repeat(32)
            })
        );
    }

    // === Reconciliation ===

    #[test]
    fn test_tx_id_must_match_exactly() {
        let tx = base_tx();
        assert!(verify_tx_id(&tx, &tx.id()).is_ok());
        assert!(verify_tx_id(&tx, &tx.id().to_uppercase()).is_ok());

        let mut tampered = tx.id_bytes();
        tampered[31] ^= 0x01;
        assert!(matches!(
            verify_tx_id(&tx, &hex::encode(tampered)),
            Err(SignerError::TxSerializationMismatch)
        ));
        assert!(verify_tx_id(&tx, "not hex").is_err());
        assert!(verify_tx_id(&tx, "").is_err());
    }

    #[test]
    fn test_witness_kinds_follow_path_role() {
        let byron = file(SigningRole::Payment, "44H/1815H/0H/0/0", 8);
        let witnesses = vec![
            DeviceWitness {
                path: byron.path.clone(),
                signature: vec![1u8; 64],
            },
            DeviceWitness {
                path: stake().path,
                signature: vec![2u8; 64],
            },
            DeviceWitness {
                path: pool_cold().path,
                signature: vec![3u8; 64],
            },
        ];
        let set = create_witnesses(&witnesses, &[byron.clone(), stake(), pool_cold()], None).unwrap();
        assert_eq!(set.byron.len(), 1);
        assert_eq!(set.shelley.len(), 2);
        assert_eq!(set.byron[0].chain_code, byron.xpub.chain_code);
        assert_eq!(set.byron[0].attributes, vec![0xa0]);

        let typed = set.into_typed();
        assert!(!typed[0].is_byron());
        assert!(typed[2].is_byron());
    }

    #[test]
    fn test_witness_without_signing_file() {
        let witnesses = vec![DeviceWitness {
            path: other_stake().path,
            signature: vec![0u8; 64],
        }];
        assert!(matches!(
            create_witnesses(&witnesses, &[stake()], None),
            Err(SignerError::MissingSigningDataAtPath(p)) if p == "1852H/1815H/1H/2/0"
        ));
    }

    #[test]
    fn test_witness_signature_verification() {
        let key = SigningKey::from_bytes(&[21u8; 32]);
        let signer_file = SigningFile::new(
            SigningRole::Payment,
            DerivationPath::parse("1852H/1815H/0H/0/0").unwrap(),
            ExtendedPublicKey::new(key.verifying_key().to_bytes(), [0u8; 32]),
        );
        let tx = base_tx();
        let good = DeviceWitness {
            path: signer_file.path.clone(),
            signature: key.sign(&tx.id_bytes()).to_bytes().to_vec(),
        };
        let set = create_witnesses(&[good], &[signer_file.clone()], Some(&tx.id_bytes()[..])).unwrap();
        assert_eq!(set.len(), 1);

        let bad = DeviceWitness {
            path: signer_file.path.clone(),
            signature: key.sign(b"something else").to_bytes().to_vec(),
        };
        assert!(matches!(
            create_witnesses(&[bad.clone()], &[signer_file.clone()], Some(&tx.id_bytes()[..])),
            Err(SignerError::InvalidWitnessSignature(_))
        ));
        assert!(create_witnesses(&[bad], &[signer_file], None).is_ok());
    }
}
