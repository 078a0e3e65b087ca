//! Transfer Application - packet lifecycle business logic
//!
//! Decides, for every packet callback, which single ledger mutation to
//! apply. All checks run before that mutation, so a failed call leaves
//! the ledger untouched.

use crate::algorithms::{
    classify, sender_chain_is_source, unprefixed_denomination, voucher_denomination, DenomClass,
    PacketDataCodec,
};
use crate::config::TransferConfig;
use crate::domain::{
    invariant_authorized, invariant_escrow_covers, invariant_positive_amount, Acknowledgement,
    Address, Amount, ChannelId, DecodeError, Debit, FungibleTokenPacketData, InFlightTransfer,
    MsgTransfer, Packet, PacketId, PortId, Role, Signer, TransferError, TransferEvent,
    ZERO_ADDRESS,
};
use crate::ports::inbound::{SentPacket, TransferModule};
use crate::ports::outbound::{ChannelReader, EscrowResolver, TokenLedger};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;
use transfer_telemetry::{
    log_packet_event, metric_inc, time_callback, ACKNOWLEDGEMENTS, PACKETS_RECEIVED, PACKETS_SENT, REFUNDS,
    TRANSFER_ERRORS,
};

/// Settled sequences of one source channel.
///
/// Every sequence below `watermark` is settled. `ahead` holds the settled
/// sequences above it and drains into the watermark as gaps close, so its
/// size is bounded by the packets settled out of order.
#[derive(Debug)]
struct SettledWindow {
    watermark: u64,
    ahead: BTreeSet<u64>,
}

impl Default for SettledWindow {
    fn default() -> Self {
        Self {
            watermark: 1,
            ahead: BTreeSet::new(),
        }
    }
}

impl SettledWindow {
    fn contains(&self, sequence: u64) -> bool {
        sequence < self.watermark || self.ahead.contains(&sequence)
    }

    fn insert(&mut self, sequence: u64) {
        self.ahead.insert(sequence);
        while self.ahead.remove(&self.watermark) {
            self.watermark = self.watermark.saturating_add(1);
        }
    }
}

/// Outbound bookkeeping: sequences and unsettled transfers.
#[derive(Default)]
struct OutboundState {
    /// (source port, source channel) -> next sequence.
    next_sequence: HashMap<(PortId, ChannelId), u64>,
    /// Sent packets awaiting acknowledgement or timeout.
    in_flight: HashMap<PacketId, InFlightTransfer>,
    /// (source port, source channel) -> sequences already acknowledged or
    /// timed out.
    settled: HashMap<(PortId, ChannelId), SettledWindow>,
}

impl OutboundState {
    fn ensure_unsettled(&self, packet: &Packet) -> Result<(), TransferError> {
        let key = (packet.source_port.clone(), packet.source_channel.clone());
        if self
            .settled
            .get(&key)
            .map_or(false, |window| window.contains(packet.sequence))
        {
            return Err(TransferError::PacketAlreadySettled {
                port: packet.source_port.to_string(),
                channel: packet.source_channel.to_string(),
                sequence: packet.sequence,
            });
        }
        Ok(())
    }

    fn settle(&mut self, packet: &Packet) {
        self.in_flight.remove(&packet.id());
        self.settled
            .entry((packet.source_port.clone(), packet.source_channel.clone()))
            .or_default()
            .insert(packet.sequence);
    }

    /// Settled sequences held above the watermark of `port/channel`.
    fn settled_out_of_order(&self, port: &PortId, channel: &ChannelId) -> usize {
        self.settled
            .get(&(port.clone(), channel.clone()))
            .map_or(0, |window| window.ahead.len())
    }
}

/// ICS20 transfer application.
///
/// Acts towards the ledger as `identity`, which the ledger owner must
/// configure as the ledger operator.
pub struct TransferApplication<L, E, C>
where
    L: TokenLedger,
    E: EscrowResolver,
    C: ChannelReader,
{
    config: TransferConfig,
    codec: PacketDataCodec,
    identity: Address,
    ledger: Arc<L>,
    escrows: Arc<E>,
    channels: Arc<C>,
    state: RwLock<OutboundState>,
}

impl<L, E, C> TransferApplication<L, E, C>
where
    L: TokenLedger,
    E: EscrowResolver,
    C: ChannelReader,
{
    /// Create a transfer application.
    pub fn new(
        config: TransferConfig,
        identity: Address,
        ledger: Arc<L>,
        escrows: Arc<E>,
        channels: Arc<C>,
    ) -> Self {
        Self {
            codec: PacketDataCodec::new(config.payload_encoding),
            config,
            identity,
            ledger,
            escrows,
            channels,
            state: RwLock::new(OutboundState::default()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Principal the application acts as towards the ledger.
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Payload codec in use.
    pub fn codec(&self) -> PacketDataCodec {
        self.codec
    }

    /// Unsettled record of a sent packet.
    pub fn in_flight(&self, id: &PacketId) -> Option<InFlightTransfer> {
        self.state.read().in_flight.get(id).cloned()
    }

    /// Number of sent packets awaiting acknowledgement or timeout.
    pub fn pending_transfers(&self) -> usize {
        self.state.read().in_flight.len()
    }

    /// Settled sequences on `port/channel` still tracked one by one because
    /// an earlier sequence is unsettled.
    pub fn settled_out_of_order(&self, port: &PortId, channel: &ChannelId) -> usize {
        self.state.read().settled_out_of_order(port, channel)
    }

    /// Sequence the next packet on `port/channel` will carry.
    pub fn next_sequence(&self, port: &PortId, channel: &ChannelId) -> u64 {
        self.state
            .read()
            .next_sequence
            .get(&(port.clone(), channel.clone()))
            .copied()
            .unwrap_or(1)
    }

    fn ensure_transport(&self, caller: &Address) -> Result<(), TransferError> {
        invariant_authorized(caller, &self.config.transport, Role::Transport)
    }

    fn ensure_bound_port(&self, port: &PortId) -> Result<(), TransferError> {
        match self.channels.bound_port() {
            Some(bound) if &bound != port => Err(TransferError::InvalidPort {
                expected: bound.to_string(),
                got: port.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Move `amount` out of an escrow, reporting any shortfall against the
    /// escrow's channel.
    fn release_from_escrow(
        &self,
        channel: &ChannelId,
        escrow: Option<Address>,
        to: &Address,
        denom: &str,
        amount: Amount,
    ) -> Result<TransferEvent, TransferError> {
        let shortfall = |available: Amount| TransferError::InsufficientEscrowBalance {
            channel: channel.to_string(),
            denom: denom.to_string(),
            required: amount,
            available,
        };

        let escrow = escrow.ok_or_else(|| shortfall(Amount::zero()))?;
        let available = self.ledger.balance_of(&escrow, denom);
        invariant_escrow_covers(channel.as_str(), denom, available, amount)?;

        self.ledger
            .transfer(&self.identity, &escrow, to, denom, amount)
            .map_err(|e| match e {
                TransferError::InsufficientBalance { available, .. } => shortfall(available),
                other => other,
            })
    }

    fn recv_packet(&self, caller: &Address, packet: &Packet) -> Result<TransferEvent, TransferError> {
        self.ensure_transport(caller)?;
        if !self.config.receive_enabled {
            return Err(TransferError::ReceiveDisabled);
        }
        self.ensure_bound_port(&packet.destination_port)?;

        let data = self.codec.decode(&packet.data)?;
        let receiver = data.receiver.to_address()?;
        if receiver == ZERO_ADDRESS {
            return Err(DecodeError::BadAddress(data.receiver.as_str().to_string()).into());
        }

        match classify(&packet.source_port, &packet.source_channel, &data.denom) {
            DenomClass::NativeReturning => {
                let denom = if self.config.release_unprefixed {
                    unprefixed_denomination(&packet.source_port, &packet.source_channel, &data.denom)
                        .unwrap_or(data.denom.as_str())
                } else {
                    data.denom.as_str()
                };
                debug!(
                    "[ics20] Releasing {} {} from escrow of '{}'",
                    data.amount, denom, packet.destination_channel
                );
                self.release_from_escrow(
                    &packet.destination_channel,
                    self.escrows.escrow_address(&packet.destination_channel),
                    &receiver,
                    denom,
                    data.amount,
                )
            }
            DenomClass::ForwardedVoucher => {
                let voucher = voucher_denomination(
                    &packet.destination_port,
                    &packet.destination_channel,
                    &data.denom,
                );
                debug!("[ics20] Minting {} {}", data.amount, voucher);
                self.ledger
                    .mint(&self.identity, &receiver, &voucher, data.amount)
            }
        }
    }

    /// Debit record of a packet this application has no entry for,
    /// reconstructed from its payload.
    fn reconstruct_debit(&self, packet: &Packet) -> Result<InFlightTransfer, TransferError> {
        let data = self.codec.decode(&packet.data)?;
        let sender = data.sender.to_address()?;
        if sender == ZERO_ADDRESS {
            return Err(DecodeError::BadAddress(data.sender.as_str().to_string()).into());
        }

        let debit = if sender_chain_is_source(&packet.source_port, &packet.source_channel, &data.denom)
        {
            let escrow = self
                .escrows
                .escrow_address(&packet.source_channel)
                .ok_or_else(|| TransferError::InsufficientEscrowBalance {
                    channel: packet.source_channel.to_string(),
                    denom: data.denom.clone(),
                    required: data.amount,
                    available: Amount::zero(),
                })?;
            Debit::Escrowed { escrow }
        } else {
            Debit::Burned
        };

        Ok(InFlightTransfer {
            sender,
            denom: data.denom,
            amount: data.amount,
            debit,
        })
    }

    /// Restore the sender of `packet`, mirroring its debit.
    fn refund(&self, packet: &Packet, trigger: &str) -> Result<TransferEvent, TransferError> {
        let mut state = self.state.write();

        state.ensure_unsettled(packet)?;

        let record = match state.in_flight.get(&packet.id()) {
            Some(record) => record.clone(),
            None => {
                debug!(
                    "[ics20] No record of packet {} on {}/{}, reconstructing from payload",
                    packet.sequence, packet.source_port, packet.source_channel
                );
                self.reconstruct_debit(packet)?
            }
        };

        let (event, mechanism) = match record.debit {
            Debit::Escrowed { escrow } => (
                self.release_from_escrow(
                    &packet.source_channel,
                    Some(escrow),
                    &record.sender,
                    &record.denom,
                    record.amount,
                )?,
                "release",
            ),
            Debit::Burned => (
                self.ledger
                    .mint(&self.identity, &record.sender, &record.denom, record.amount)?,
                "mint",
            ),
        };

        state.settle(packet);
        metric_inc!(REFUNDS, &[trigger, mechanism]);
        Ok(event)
    }

    fn send(&self, caller: &Address, msg: MsgTransfer) -> Result<SentPacket, TransferError> {
        if !self.config.send_enabled {
            return Err(TransferError::SendDisabled);
        }
        self.ensure_bound_port(&msg.source_port)?;

        let (destination_port, destination_channel) = self
            .channels
            .counterparty(&msg.source_port, &msg.source_channel)
            .ok_or_else(|| TransferError::ChannelNotFound {
                port: msg.source_port.to_string(),
                channel: msg.source_channel.to_string(),
            })?;
        invariant_positive_amount(msg.amount)?;

        let debit = if sender_chain_is_source(&msg.source_port, &msg.source_channel, &msg.denom) {
            let escrow = self
                .escrows
                .escrow_address(&msg.source_channel)
                .ok_or_else(|| TransferError::EscrowNotConfigured {
                    channel: msg.source_channel.to_string(),
                })?;
            Debit::Escrowed { escrow }
        } else {
            Debit::Burned
        };

        let data = FungibleTokenPacketData {
            denom: msg.denom.clone(),
            amount: msg.amount,
            sender: Signer::from_address(caller),
            receiver: msg.receiver,
            memo: msg.memo,
        };
        let payload = self.codec.encode(&data)?;

        let mut state = self.state.write();
        let key = (msg.source_port.clone(), msg.source_channel.clone());
        let sequence = state.next_sequence.get(&key).copied().unwrap_or(1);

        let event = match debit {
            Debit::Escrowed { escrow } => {
                self.ledger
                    .transfer(&self.identity, caller, &escrow, &msg.denom, msg.amount)?
            }
            Debit::Burned => self
                .ledger
                .burn(&self.identity, caller, &msg.denom, msg.amount)?,
        };

        state.next_sequence.insert(key, sequence.saturating_add(1));
        let packet = Packet {
            sequence,
            source_port: msg.source_port,
            source_channel: msg.source_channel,
            destination_port,
            destination_channel,
            data: payload,
            timeout_height: msg.timeout_height,
            timeout_timestamp: msg.timeout_timestamp,
        };
        state.in_flight.insert(
            packet.id(),
            InFlightTransfer {
                sender: *caller,
                denom: msg.denom,
                amount: msg.amount,
                debit,
            },
        );

        Ok(SentPacket { packet, event })
    }
}

impl<L, E, C> TransferModule for TransferApplication<L, E, C>
where
    L: TokenLedger,
    E: EscrowResolver,
    C: ChannelReader,
{
    fn on_recv_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        relayer: &Address,
    ) -> Result<TransferEvent, TransferError> {
        let _timer = time_callback("recv");

        let result = self.recv_packet(caller, packet);
        match &result {
            Ok(event) => {
                let action = if event.is_mint() { "mint" } else { "release" };
                metric_inc!(PACKETS_RECEIVED, &["success", action]);
                log_packet_event!(
                    info,
                    "[ics20] Packet received",
                    packet,
                    relayer = %hex::encode(relayer),
                    action = action,
                    denom = %event.denom,
                    amount = %event.amount
                );
            }
            Err(e) => {
                metric_inc!(PACKETS_RECEIVED, &["error", "none"]);
                metric_inc!(TRANSFER_ERRORS, &[e.kind()]);
                log_packet_event!(warn, "[ics20] Packet rejected", packet, error = %e);
            }
        }
        result
    }

    fn on_acknowledgement_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        acknowledgement: &[u8],
        relayer: &Address,
    ) -> Result<Option<TransferEvent>, TransferError> {
        let _timer = time_callback("ack");

        let result = self.ensure_transport(caller).and_then(|()| {
            let ack = Acknowledgement::from_bytes(acknowledgement);
            if ack.is_success() {
                let mut state = self.state.write();
                state.ensure_unsettled(packet)?;
                state.settle(packet);
                metric_inc!(ACKNOWLEDGEMENTS, &["success"]);
                return Ok(None);
            }
            metric_inc!(ACKNOWLEDGEMENTS, &["failure"]);
            self.refund(packet, "ack").map(Some)
        });

        match &result {
            Ok(Some(event)) => log_packet_event!(
                info,
                "[ics20] Refunded after failure acknowledgement",
                packet,
                relayer = %hex::encode(relayer),
                denom = %event.denom,
                amount = %event.amount
            ),
            Ok(None) => log_packet_event!(debug, "[ics20] Packet acknowledged", packet),
            Err(e) => {
                metric_inc!(TRANSFER_ERRORS, &[e.kind()]);
                log_packet_event!(warn, "[ics20] Acknowledgement rejected", packet, error = %e);
            }
        }
        result
    }

    fn on_timeout_packet(
        &self,
        caller: &Address,
        packet: &Packet,
        relayer: &Address,
    ) -> Result<TransferEvent, TransferError> {
        let _timer = time_callback("timeout");

        let result = self
            .ensure_transport(caller)
            .and_then(|()| self.refund(packet, "timeout"));

        match &result {
            Ok(event) => log_packet_event!(
                info,
                "[ics20] Refunded after timeout",
                packet,
                relayer = %hex::encode(relayer),
                denom = %event.denom,
                amount = %event.amount
            ),
            Err(e) => {
                metric_inc!(TRANSFER_ERRORS, &[e.kind()]);
                log_packet_event!(warn, "[ics20] Timeout rejected", packet, error = %e);
            }
        }
        result
    }

    fn send_transfer(
        &self,
        caller: &Address,
        msg: MsgTransfer,
    ) -> Result<SentPacket, TransferError> {
        let _timer = time_callback("send");

        let result = self.send(caller, msg);
        match &result {
            Ok(sent) => {
                let debit = if sent.event.is_burn() { "burn" } else { "escrow" };
                metric_inc!(PACKETS_SENT, &[debit]);
                log_packet_event!(
                    info,
                    "[ics20] Packet sent",
                    sent.packet,
                    sender = %hex::encode(caller),
                    debit = debit,
                    denom = %sent.event.denom,
                    amount = %sent.event.amount
                );
            }
            Err(e) => {
                metric_inc!(TRANSFER_ERRORS, &[e.kind()]);
                debug!("[ics20] Send rejected for 0x{}: {}", hex::encode(caller), e);
            }
        }
        result
    }
}
