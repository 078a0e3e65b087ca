//! # Reference Packet Scenarios
//!
//! The four canonical outcomes of the transfer module, each driven through
//! the public callback surface of a fully wired chain:
//!
//! 1. **Mint**: a foreign token arrives and a voucher is minted
//! 2. **Escrow release**: a returning token is paid out of the channel escrow
//! 3. **Rejected release**: an empty escrow rejects the packet untouched
//! 4. **Refund**: a failure acknowledgement restores a burned voucher

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ics20_transfer::{
        Acknowledgement, Amount, ChannelId, Packet, PortId, TransferError, TransferEvent,
        ZERO_ADDRESS,
    };

    /// Packet from `port/channel` as seen by a chain bound to `transfer`.
    fn scenario_packet(chain: &TestChain, denom: &str, destination_channel: &str) -> Packet {
        let mut packet = inbound_packet(
            "channel",
            destination_channel,
            chain.encode(denom, 1000, "remote-sender", &ALICE),
        );
        packet.source_port = PortId::from("port");
        packet
    }

    #[test]
    fn test_scenario_mint_voucher() {
        let chain = TestChain::with_defaults();
        let packet = scenario_packet(&chain, "ETH", "destChannel");

        let event = chain.deliver(&packet).unwrap();

        assert_eq!(
            event,
            TransferEvent::mint(ALICE, "transfer/destChannel/ETH", Amount::from(1000))
        );
        assert_eq!(
            chain.balance(&ALICE, "transfer/destChannel/ETH"),
            Amount::from(1000)
        );
        assert_eq!(chain.ledger.events(), vec![event]);
    }

    #[test]
    fn test_scenario_escrow_release() {
        let chain = TestChain::with_defaults();
        let escrow = chain.open("channel", "channel-9");
        chain.fund(&escrow, "port/channel/ETH", 1000u64);
        let packet = scenario_packet(&chain, "port/channel/ETH", "channel");

        let event = chain.deliver(&packet).unwrap();

        assert_eq!(
            event,
            TransferEvent::transfer(escrow, ALICE, "port/channel/ETH", Amount::from(1000))
        );
        assert_eq!(chain.balance(&escrow, "port/channel/ETH"), Amount::zero());
        assert_eq!(chain.balance(&ALICE, "port/channel/ETH"), Amount::from(1000));
    }

    #[test]
    fn test_scenario_release_rejected_on_empty_escrow() {
        let chain = TestChain::with_defaults();
        chain.open("channel", "channel-9");
        let packet = scenario_packet(&chain, "port/channel/ETH", "channel");

        let result = chain.deliver(&packet);

        match result {
            Err(TransferError::InsufficientEscrowBalance {
                channel,
                required,
                available,
                ..
            }) => {
                assert_eq!(channel, "channel");
                assert_eq!(required, Amount::from(1000));
                assert_eq!(available, Amount::zero());
            }
            other => panic!("expected escrow shortfall, got {:?}", other),
        }
        assert!(chain.ledger.events().is_empty());
    }

    #[test]
    fn test_scenario_refund_on_failure_ack() {
        let chain = TestChain::with_defaults();
        chain.open("channel-0", "channel-5");
        chain.fund(&BOB, "transfer/channel-0/USDT", 1000u64);

        let sent = chain
            .send(&BOB, "channel-0", "transfer/channel-0/USDT", 1000, &ALICE)
            .unwrap();
        assert!(sent.event.is_burn());
        assert_eq!(chain.supply("transfer/channel-0/USDT"), Amount::zero());

        let refund = chain
            .acknowledge(&sent.packet, &Acknowledgement::Error("rejected".to_string()))
            .unwrap();

        assert_eq!(
            refund,
            Some(TransferEvent {
                from: ZERO_ADDRESS,
                to: BOB,
                denom: "transfer/channel-0/USDT".to_string(),
                amount: Amount::from(1000),
            })
        );
        assert_eq!(
            chain.balance(&BOB, "transfer/channel-0/USDT"),
            Amount::from(1000)
        );
    }

    #[test]
    fn test_escrow_is_per_channel() {
        let chain = TestChain::with_defaults();
        let first = chain.open("channel-0", "channel-5");
        let second = chain.open("channel-1", "channel-6");
        assert_ne!(first, second);

        chain.fund(&ALICE, "ETH", 10u64);
        chain.send(&ALICE, "channel-0", "ETH", 4, &BOB).unwrap();
        chain.send(&ALICE, "channel-1", "ETH", 6, &BOB).unwrap();

        assert_eq!(chain.balance(&first, "ETH"), Amount::from(4));
        assert_eq!(chain.balance(&second, "ETH"), Amount::from(6));
        assert_eq!(
            chain
                .app
                .next_sequence(&PortId::from(TRANSFER_PORT), &ChannelId::from("channel-0")),
            2
        );
    }
}
