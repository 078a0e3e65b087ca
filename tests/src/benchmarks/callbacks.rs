//! # Packet Callback Benchmarks
//!
//! End-to-end cost of the receive path (decode, classify, ledger mutation)
//! and of a send followed by its refund.

use crate::fixtures::{inbound_packet, TestChain, ALICE, BOB, TRANSPORT};
use criterion::{black_box, Criterion};
use ics20_transfer::{Acknowledgement, TransferConfig};

fn bench_chain() -> TestChain {
    TestChain::silent(TransferConfig::new(TRANSPORT))
}

pub fn bench_recv_packet(c: &mut Criterion) {
    let mut group = c.benchmark_group("ics20-recv-packet");

    let mint_chain = bench_chain();
    let mint_packet = inbound_packet(
        "channel-1",
        "channel-0",
        mint_chain.encode("uatom", 1, "remote", &ALICE),
    );
    group.bench_function("mint_voucher", |b| {
        b.iter(|| mint_chain.deliver(black_box(&mint_packet)))
    });

    let release_chain = bench_chain();
    let escrow = release_chain.open("channel-0", "channel-1");
    release_chain.fund(&escrow, "transfer/channel-1/uatom", u64::MAX);
    let release_packet = inbound_packet(
        "channel-1",
        "channel-0",
        release_chain.encode("transfer/channel-1/uatom", 1, "remote", &ALICE),
    );
    group.bench_function("release_escrow", |b| {
        b.iter(|| release_chain.deliver(black_box(&release_packet)))
    });

    group.finish();
}

pub fn bench_send_and_refund(c: &mut Criterion) {
    let mut group = c.benchmark_group("ics20-send-refund");

    let chain = bench_chain();
    chain.open("channel-0", "channel-1");
    chain.fund(&ALICE, "uatom", 1_000u64);
    let failure = Acknowledgement::Error("bench".to_string());

    group.bench_function("escrow_then_failure_ack", |b| {
        b.iter(|| {
            if let Ok(sent) = chain.send(&ALICE, "channel-0", "uatom", 1, &BOB) {
                let _ = chain.acknowledge(black_box(&sent.packet), &failure);
            }
        })
    });

    group.finish();
}
