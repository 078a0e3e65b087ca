//! # ICS20 Transfer Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | ics20-codec-decode | Payload decode per wire profile |
//! | ics20-codec-trace-depth | Decode cost against denomination hops |
//! | ics20-recv-packet | Full receive callback, mint and release paths |
//! | ics20-send-refund | Escrowing send followed by failure-ack refund |

use criterion::{criterion_group, criterion_main};
use ics20_tests::benchmarks::{callbacks, codec};

criterion_group!(
    benches,
    codec::bench_decode_profiles,
    codec::bench_decode_trace_depth,
    callbacks::bench_recv_packet,
    callbacks::bench_send_and_refund,
);

criterion_main!(benches);
