//! # Authorization Bypass Attempts
//!
//! Every state-changing entry point sits behind exactly one principal:
//!
//! | Entry point | Principal |
//! |-------------|-----------|
//! | recv / ack / timeout callbacks | transport |
//! | mint / burn / transfer on the ledger | operator (the app) |
//! | escrow, channel, operator configuration | owner |
//!
//! The relayer argument of a callback is informational and grants nothing.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ics20_transfer::{
        Acknowledgement, Address, Amount, ChannelId, EscrowResolver, Owned, PortId, Role,
        TokenLedger, TransferError, TransferModule,
    };
    use proptest::prelude::*;

    fn non_principal(reserved: Address) -> impl Strategy<Value = Address> {
        any::<[u8; 20]>().prop_filter("must not be the principal", move |a| *a != reserved)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_recv_rejects_any_non_transport(caller in non_principal(TRANSPORT)) {
            let chain = TestChain::with_defaults();
            let packet = inbound_packet(
                "channel-9",
                "channel-0",
                chain.encode("ETH", 1, "attacker", &ALICE),
            );

            let result = chain.app.on_recv_packet(&caller, &packet, &TRANSPORT);

            prop_assert!(
                matches!(result, Err(TransferError::Unauthorized { role: Role::Transport, .. })),
                "unexpected: {:?}",
                result
            );
            prop_assert!(chain.ledger.events().is_empty());
        }

        #[test]
        fn prop_refund_callbacks_reject_non_transport(caller in non_principal(TRANSPORT)) {
            let chain = TestChain::with_defaults();
            chain.open("channel-0", "channel-1");
            chain.fund(&ALICE, "ETH", 10u64);
            let sent = chain.send(&ALICE, "channel-0", "ETH", 10, &BOB).unwrap();
            let events_before = chain.ledger.events().len();

            let failure = Acknowledgement::Error("forged".to_string()).to_bytes();
            prop_assert!(chain
                .app
                .on_acknowledgement_packet(&caller, &sent.packet, &failure, &TRANSPORT)
                .is_err());
            prop_assert!(chain.app.on_timeout_packet(&caller, &sent.packet, &TRANSPORT).is_err());

            prop_assert_eq!(chain.ledger.events().len(), events_before);
            prop_assert_eq!(chain.app.pending_transfers(), 1);
        }

        #[test]
        fn prop_ledger_rejects_non_operator(caller in non_principal(APP)) {
            let chain = TestChain::with_defaults();
            chain.fund(&ALICE, "ETH", 10u64);

            prop_assert!(chain.ledger.mint(&caller, &caller, "ETH", Amount::from(1)).is_err());
            prop_assert!(chain.ledger.burn(&caller, &ALICE, "ETH", Amount::from(1)).is_err());
            prop_assert!(chain
                .ledger
                .transfer(&caller, &ALICE, &caller, "ETH", Amount::from(1))
                .is_err());
            prop_assert_eq!(chain.balance(&ALICE, "ETH"), Amount::from(10));
        }

        #[test]
        fn prop_configuration_rejects_non_owner(caller in non_principal(OWNER)) {
            let chain = TestChain::with_defaults();
            let escrow = chain.open("channel-0", "channel-1");

            let redirect = chain.escrows.set_escrow_address(&caller, ChannelId::from("channel-0"), caller);
            prop_assert!(
                matches!(redirect, Err(TransferError::Unauthorized { role: Role::Owner, .. })),
                "unexpected: {:?}",
                redirect
            );
            prop_assert!(chain.ledger.set_operator(&caller, caller).is_err());
            prop_assert!(chain.channels.bind_port(&caller, PortId::from("evil")).is_err());
            prop_assert!(chain.escrows.transfer_ownership(&caller, caller).is_err());

            prop_assert_eq!(chain.ledger.operator(), APP);
            prop_assert_eq!(chain.escrows.owner(), OWNER);
            prop_assert_eq!(chain.escrows.escrow_address(&ChannelId::from("channel-0")), Some(escrow));
        }
    }

    #[test]
    fn test_relayer_argument_grants_nothing() {
        let chain = TestChain::with_defaults();
        let packet = inbound_packet(
            "channel-9",
            "channel-0",
            chain.encode("ETH", 1, "attacker", &ALICE),
        );

        // Attacker names the transport as relayer while calling as itself.
        let result = chain.app.on_recv_packet(&RELAYER, &packet, &TRANSPORT);
        assert!(result.is_err());

        // The genuine transport may name anyone as relayer.
        assert!(chain.app.on_recv_packet(&TRANSPORT, &packet, &RELAYER).is_ok());
    }

    #[test]
    fn test_revoked_operator_blocks_callbacks() {
        let chain = TestChain::with_defaults();
        chain.ledger.set_operator(&OWNER, [0u8; 20]).unwrap();
        let packet = inbound_packet(
            "channel-9",
            "channel-0",
            chain.encode("ETH", 1, "remote", &ALICE),
        );

        let result = chain.deliver(&packet);

        assert!(matches!(
            result,
            Err(TransferError::Unauthorized {
                role: Role::Operator,
                ..
            })
        ));
        assert!(chain.ledger.events().is_empty());
    }

    #[test]
    fn test_ownership_handover() {
        let chain = TestChain::with_defaults();
        let new_owner: Address = [0x77; 20];

        chain.escrows.transfer_ownership(&OWNER, new_owner).unwrap();

        assert!(chain
            .escrows
            .set_escrow_address(&OWNER, ChannelId::from("channel-0"), ALICE)
            .is_err());
        chain
            .escrows
            .set_escrow_address(&new_owner, ChannelId::from("channel-0"), ALICE)
            .unwrap();
    }
}
