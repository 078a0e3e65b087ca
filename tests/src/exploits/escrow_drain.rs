//! # Escrow Drain Attempts
//!
//! Packets crafted to pay out more than a channel's escrow holds, or to pay
//! out of the wrong channel's escrow. Each attempt must fail with the
//! ledger untouched.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ics20_transfer::{
        Amount, DecodeError, PayloadEncoding, Role, TransferConfig, TransferError,
    };
    use primitive_types::U256;
    use proptest::prelude::*;

    /// Origin chain with ETH escrowed on `channel-0` and an empty escrow on
    /// `channel-2`.
    fn funded_origin() -> (TestChain, ics20_transfer::Address) {
        let chain = TestChain::new(TransferConfig::new(TRANSPORT).with_release_unprefixed(true));
        let escrow = chain.open("channel-0", "channel-1");
        chain.open("channel-2", "channel-3");
        chain.fund(&ALICE, "ETH", 1000u64);
        chain.send(&ALICE, "channel-0", "ETH", 1000, &BOB).unwrap();
        (chain, escrow)
    }

    #[test]
    fn test_cross_channel_drain_rejected() {
        let (chain, escrow) = funded_origin();
        let events_before = chain.ledger.events().len();

        // Claims to return ETH over channel-2, whose escrow never received any.
        let packet = inbound_packet(
            "channel-3",
            "channel-2",
            chain.encode("transfer/channel-3/ETH", 1000, "attacker", &BOB),
        );
        let result = chain.deliver(&packet);

        match result {
            Err(TransferError::InsufficientEscrowBalance { channel, .. }) => {
                assert_eq!(channel, "channel-2");
            }
            other => panic!("expected escrow shortfall, got {:?}", other),
        }
        assert_eq!(chain.balance(&escrow, "ETH"), Amount::from(1000));
        assert_eq!(chain.ledger.events().len(), events_before);
    }

    #[test]
    fn test_foreign_prefix_mints_voucher_not_native() {
        let (chain, escrow) = funded_origin();

        // Prefix names channel-1, which is not the packet's source channel:
        // the token is foreign and only a voucher can result.
        let packet = inbound_packet(
            "channel-1",
            "channel-0",
            chain.encode("transfer/channel-9/ETH", 1000, "attacker", &BOB),
        );
        let event = chain.deliver(&packet).unwrap();

        assert!(event.is_mint());
        assert_eq!(event.denom, "transfer/channel-0/transfer/channel-9/ETH");
        assert_eq!(chain.balance(&escrow, "ETH"), Amount::from(1000));
        assert_eq!(chain.balance(&BOB, "ETH"), Amount::zero());
    }

    proptest! {
        #[test]
        fn prop_over_release_rejected(excess in 1u64..1_000_000) {
            let (chain, escrow) = funded_origin();
            let packet = inbound_packet(
                "channel-1",
                "channel-0",
                chain.encode("transfer/channel-1/ETH", 1000 + excess, "attacker", &BOB),
            );

            let result = chain.deliver(&packet);

            prop_assert!(
                matches!(result, Err(TransferError::InsufficientEscrowBalance { .. })),
                "unexpected: {:?}",
                result
            );
            prop_assert_eq!(chain.balance(&escrow, "ETH"), Amount::from(1000));
            prop_assert_eq!(chain.balance(&BOB, "ETH"), Amount::zero());
        }

        #[test]
        fn prop_release_never_exceeds_escrow(first in 1u64..1000, second in 1u64..1000) {
            let (chain, escrow) = funded_origin();
            let claim = |amount: u64| {
                inbound_packet(
                    "channel-1",
                    "channel-0",
                    chain.encode("transfer/channel-1/ETH", amount, "remote", &BOB),
                )
            };

            let first_ok = chain.deliver(&claim(first)).is_ok();
            let second_ok = chain.deliver(&claim(second)).is_ok();

            prop_assert!(first_ok);
            prop_assert_eq!(second_ok, first + second <= 1000);
            let paid = chain.balance(&BOB, "ETH");
            prop_assert_eq!(paid + chain.balance(&escrow, "ETH"), Amount::from(1000));
        }
    }

    #[test]
    fn test_zero_amount_rejected() {
        let chain = TestChain::new(
            TransferConfig::new(TRANSPORT).with_encoding(PayloadEncoding::Json),
        );
        chain.open("channel-0", "channel-1");
        let receiver = format!("0x{}", hex::encode(BOB));
        let data = format!(
            r#"{{"denom":"ETH","amount":"0","sender":"remote","receiver":"{}"}}"#,
            receiver
        );

        let result = chain.deliver(&inbound_packet("channel-1", "channel-0", data.into_bytes()));

        assert_eq!(
            result,
            Err(TransferError::MalformedPayload(DecodeError::ZeroAmount))
        );
        assert!(chain.ledger.events().is_empty());
    }

    #[test]
    fn test_voucher_mint_overflow_rejected() {
        let chain = TestChain::with_defaults();
        chain.open("channel-0", "channel-1");
        chain.fund(&BOB, "transfer/channel-0/ETH", U256::MAX);
        let packet = inbound_packet(
            "channel-1",
            "channel-0",
            chain.encode("ETH", 1, "remote", &BOB),
        );

        let events_before = chain.ledger.events().len();

        let result = chain.deliver(&packet);

        assert!(matches!(result, Err(TransferError::Overflow { .. })));
        assert_eq!(chain.balance(&BOB, "transfer/channel-0/ETH"), U256::MAX);
        assert_eq!(chain.ledger.events().len(), events_before);
    }

    #[test]
    fn test_zero_receiver_rejected() {
        let chain = TestChain::with_defaults();
        chain.open("channel-0", "channel-1");
        let packet = inbound_packet(
            "channel-1",
            "channel-0",
            chain.encode("ETH", 1, "remote", &[0u8; 20]),
        );

        let result = chain.deliver(&packet);

        assert!(matches!(
            result,
            Err(TransferError::MalformedPayload(DecodeError::BadAddress(_)))
        ));
        assert!(chain.ledger.events().is_empty());
    }

    #[test]
    fn test_release_without_operator_rights_rejected() {
        let (chain, escrow) = funded_origin();
        chain.ledger.set_operator(&OWNER, ALICE).unwrap();
        let packet = inbound_packet(
            "channel-1",
            "channel-0",
            chain.encode("transfer/channel-1/ETH", 10, "remote", &BOB),
        );

        let result = chain.deliver(&packet);

        assert!(matches!(
            result,
            Err(TransferError::Unauthorized {
                role: Role::Operator,
                ..
            })
        ));
        assert_eq!(chain.balance(&escrow, "ETH"), Amount::from(1000));
    }

    #[test]
    fn test_replayed_refund_cannot_double_pay() {
        let chain = TestChain::with_defaults();
        let escrow = chain.open("channel-0", "channel-1");
        chain.fund(&ALICE, "ETH", 100u64);
        // Someone else's funds share the escrow.
        chain.fund(&BOB, "ETH", 100u64);
        let victim = chain.send(&BOB, "channel-0", "ETH", 100, &ALICE).unwrap();
        let sent = chain.send(&ALICE, "channel-0", "ETH", 100, &BOB).unwrap();

        chain.timeout(&sent.packet).unwrap();
        for _ in 0..3 {
            assert!(matches!(
                chain.timeout(&sent.packet),
                Err(TransferError::PacketAlreadySettled { .. })
            ));
        }

        assert_eq!(chain.balance(&ALICE, "ETH"), Amount::from(100));
        assert_eq!(chain.balance(&escrow, "ETH"), Amount::from(100));
        assert!(chain.app.in_flight(&victim.packet.id()).is_some());
    }
}
